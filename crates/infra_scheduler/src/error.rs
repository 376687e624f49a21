//! Scheduler errors

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur in the reminder scheduler
///
/// Routing and notification failures are handled inside the poll loop and
/// never surface here; this covers startup and configuration problems.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Scheduler is already running")]
    AlreadyRunning,

    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    #[error(transparent)]
    Port(#[from] PortError),
}
