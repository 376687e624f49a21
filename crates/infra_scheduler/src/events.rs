//! Case lifecycle events
//!
//! Typed events delivered by direct call from the service layer when a case
//! is created, updated, or deleted. Creation and update re-arm the case's
//! reminder; deletion cancels it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::CaseId;

/// A case lifecycle event consumed by the scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CaseEvent {
    /// A case was created
    CaseCreated {
        case_id: CaseId,
        timestamp: DateTime<Utc>,
    },

    /// A stage form was submitted on a case
    CaseUpdated {
        case_id: CaseId,
        timestamp: DateTime<Utc>,
    },

    /// A case was deleted; no further reminders may fire
    CaseDeleted {
        case_id: CaseId,
        timestamp: DateTime<Utc>,
    },
}

impl CaseEvent {
    pub fn created(case_id: CaseId) -> Self {
        CaseEvent::CaseCreated {
            case_id,
            timestamp: Utc::now(),
        }
    }

    pub fn updated(case_id: CaseId) -> Self {
        CaseEvent::CaseUpdated {
            case_id,
            timestamp: Utc::now(),
        }
    }

    pub fn deleted(case_id: CaseId) -> Self {
        CaseEvent::CaseDeleted {
            case_id,
            timestamp: Utc::now(),
        }
    }

    /// Returns the case id associated with this event
    pub fn case_id(&self) -> CaseId {
        match self {
            CaseEvent::CaseCreated { case_id, .. } => *case_id,
            CaseEvent::CaseUpdated { case_id, .. } => *case_id,
            CaseEvent::CaseDeleted { case_id, .. } => *case_id,
        }
    }

    /// Returns the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            CaseEvent::CaseCreated { .. } => "CaseCreated",
            CaseEvent::CaseUpdated { .. } => "CaseUpdated",
            CaseEvent::CaseDeleted { .. } => "CaseDeleted",
        }
    }
}
