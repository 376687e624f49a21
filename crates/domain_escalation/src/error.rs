//! Escalation domain errors

use thiserror::Error;

use core_kernel::{PortError, UnitId};

use crate::role::Spot;

/// Errors that can occur while routing an escalation
#[derive(Debug, Error)]
pub enum EscalationError {
    /// Not a retryable failure: the scheduler must stop reminding
    #[error("Task has been completed")]
    AlreadyCompleted,

    #[error("Unit {0} has no parent to escalate to")]
    OrphanUnit(UnitId),

    #[error("No active role-holder for spots {spots:?} at unit {unit}")]
    NoActiveRole { unit: UnitId, spots: Vec<Spot> },

    #[error(transparent)]
    Port(#[from] PortError),
}

impl EscalationError {
    /// True when the error is a stop signal rather than a failure to retry
    pub fn is_terminal(&self) -> bool {
        matches!(self, EscalationError::AlreadyCompleted)
    }
}
