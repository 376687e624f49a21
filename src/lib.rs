//! Event-based surveillance case workflow engine
//!
//! Facade crate re-exporting the workspace members. A reported signal becomes
//! a multi-stage case that is verified, investigated, responded to, and
//! optionally escalated by role-holders in an organizational hierarchy; this
//! workspace implements the status state machine, the escalation router, the
//! recurring reminder scheduler, and the best-effort notifier.

pub use core_kernel;
pub use domain_escalation;
pub use domain_notify;
pub use domain_signal;
pub use infra_scheduler;
