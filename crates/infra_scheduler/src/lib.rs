//! Reminder Scheduling Infrastructure
//!
//! A periodic poller re-evaluates every armed case against the escalation
//! router until the case completes or the stop-after horizon passes. At most
//! one live reminder job exists per case id; arming again replaces the
//! existing job.

pub mod config;
pub mod error;
pub mod events;
pub mod queue;
pub mod scheduler;
pub mod store;

pub use config::SchedulerConfig;
pub use error::SchedulerError;
pub use events::CaseEvent;
pub use queue::ReminderQueue;
pub use scheduler::ReminderScheduler;
pub use store::CaseStore;
