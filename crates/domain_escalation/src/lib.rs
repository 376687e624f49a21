//! Escalation Domain
//!
//! Decides, at any point in time, who must act next on a pending case and
//! whether they get a first reminder or an overdue follow-up. Recipients are
//! resolved through role spots in the organizational hierarchy: verification
//! is owned by the reporting unit itself, everything after it by the parent
//! unit's family coordinator.

pub mod error;
pub mod org;
pub mod ports;
pub mod role;
pub mod router;

pub use error::EscalationError;
pub use org::{OrgUnit, UnitType};
pub use ports::{OrgHierarchy, RoleLookup, RoleQuery};
pub use role::{Person, Role, RoleStatus, Spot};
pub use router::{Escalation, EscalationRouter, NotificationKind};
