//! Scheduler configuration

use chrono::Duration;
use serde::Deserialize;

use core_kernel::{TimeUnit, Timezone};

/// Scheduler configuration
///
/// The three workflow durations are value + unit pairs so operators can run
/// drills in minutes and production in hours or days.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Gap between reminder evaluations for a case
    pub reminder_interval: i64,
    pub reminder_interval_unit: TimeUnit,
    /// Window after creation during which verification stays with the
    /// reporting unit
    pub escalate_after: i64,
    pub escalate_after_unit: TimeUnit,
    /// Horizon after creation past which no reminder ever fires
    pub stop_after: i64,
    pub stop_after_unit: TimeUnit,
    /// Poll tick for the due-job scan; firing jitter is bounded by this
    pub poll_interval_secs: u64,
    /// Per-job budget for routing plus notification
    pub job_budget_secs: u64,
    /// Timezone for localized timestamps in messages
    pub timezone: Timezone,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            reminder_interval: 2,
            reminder_interval_unit: TimeUnit::Hours,
            escalate_after: 24,
            escalate_after_unit: TimeUnit::Hours,
            stop_after: 7,
            stop_after_unit: TimeUnit::Days,
            poll_interval_secs: 60,
            job_budget_secs: 30,
            timezone: Timezone::new(chrono_tz::Africa::Nairobi),
        }
    }
}

impl SchedulerConfig {
    /// Loads configuration from environment variables prefixed `SCHEDULER_`
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("SCHEDULER"))
            .build()?
            .try_deserialize()
    }

    pub fn reminder_interval(&self) -> Duration {
        self.reminder_interval_unit.duration_of(self.reminder_interval)
    }

    pub fn escalate_after(&self) -> Duration {
        self.escalate_after_unit.duration_of(self.escalate_after)
    }

    pub fn stop_after(&self) -> Duration {
        self.stop_after_unit.duration_of(self.stop_after)
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.poll_interval_secs)
    }

    pub fn job_budget(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.job_budget_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_durations() {
        let cfg = SchedulerConfig::default();
        assert_eq!(cfg.reminder_interval(), Duration::hours(2));
        assert_eq!(cfg.escalate_after(), Duration::hours(24));
        assert_eq!(cfg.stop_after(), Duration::days(7));
        assert_eq!(cfg.poll_interval().as_secs(), 60);
    }
}
