//! Core Kernel - Foundational types and utilities for the surveillance workflow
//!
//! This crate provides the fundamental building blocks used across all domain
//! modules:
//! - Strongly-typed identifiers for cases, units, roles, and people
//! - Port infrastructure for external collaborators
//! - Temporal helpers for localized timestamps and configurable intervals

pub mod identifiers;
pub mod ports;
pub mod temporal;

pub use identifiers::{CaseId, PersonId, RoleId, UnitId};
pub use ports::{DomainPort, PortError};
pub use temporal::{TemporalError, TimeUnit, Timezone};
