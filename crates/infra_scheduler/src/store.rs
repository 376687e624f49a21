//! Case store port
//!
//! Persistent storage of cases is an external collaborator; the scheduler
//! only needs lookups and typed stage-patch updates.

use async_trait::async_trait;

use core_kernel::{CaseId, DomainPort, PortError};
use domain_signal::{Case, StagePatch};

/// Read/update access to persisted cases
#[async_trait]
pub trait CaseStore: DomainPort {
    /// Fetches a case by id; NotFound when the id is unknown
    async fn find_by_id(&self, id: CaseId) -> Result<Case, PortError>;

    /// Fetches a case by its human-readable case number
    async fn find_by_case_number(&self, case_number: &str) -> Result<Case, PortError>;

    /// Applies a stage form to a case and returns the updated case
    ///
    /// Fails with NotFound when the id is unknown, or Validation when the
    /// patch violates the family's submission order.
    async fn update(&self, id: CaseId, patch: StagePatch) -> Result<Case, PortError>;
}
