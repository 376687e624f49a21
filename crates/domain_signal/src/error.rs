//! Signal domain errors

use thiserror::Error;

use crate::case::CaseVersion;
use crate::signal::Family;
use crate::stages::Stage;

/// Errors that can occur in the signal case domain
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("Unknown signal code: {0}")]
    UnknownSignal(String),

    #[error("Submit {required} before {attempted}")]
    OutOfOrder { required: Stage, attempted: Stage },

    #[error("Stage {stage} is not part of the {family} {version:?} workflow")]
    StageNotInWorkflow {
        stage: Stage,
        family: Family,
        version: CaseVersion,
    },

    #[error("Form for stage {stage} does not match the {family} form shape")]
    FormShapeMismatch { stage: Stage, family: Family },
}
