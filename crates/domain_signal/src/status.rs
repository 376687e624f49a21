//! Status derivation
//!
//! Whether a case is pending or completed is a pure function of its form
//! content. No wall-clock input, no side effects, no stored status flag.

use serde::{Deserialize, Serialize};

use crate::case::Case;
use crate::stages::{walk, Progress};

/// Derived case status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Pending,
    Completed,
}

/// Derives the status of a case from its stage forms
pub fn derive_status(case: &Case) -> CaseStatus {
    match walk(case) {
        Progress::AwaitingStage(_) => CaseStatus::Pending,
        Progress::Completed => CaseStatus::Completed,
    }
}
