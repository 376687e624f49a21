//! Signal Case Domain
//!
//! This crate implements the case record and its status state machine. A
//! reported signal becomes a case that moves through the stage sequence of
//! its family:
//!
//! ```text
//! CEBS/HEBS/VEBS: verify -> investigate -> respond -> (lab -> summary) -> escalate
//! LEBS:           verify -> investigate -> (summary) -> respond
//! ```
//!
//! The lab and summary stages only exist for version 2 cases. Whether a case
//! is still pending is derived from which stage forms exist and their
//! answers, never from a separate status flag.

pub mod case;
pub mod error;
pub mod forms;
pub mod signal;
pub mod stages;
pub mod status;

pub use case::{Case, CaseForms, CaseState, CaseVersion, EventForms, LebsForms, StagePatch};
pub use error::SignalError;
pub use forms::{
    Channel, Contact, EscalationForm, FormMeta, InvestigationForm, LabForm,
    LebsInvestigationForm, LebsVerificationForm, ResponseForm, SummaryForm, VerificationForm,
    YesNo, ESCALATE_RECOMMENDATION,
};
pub use signal::{Family, SignalCode};
pub use stages::{walk, Progress, Stage};
pub use status::{derive_status, CaseStatus};
