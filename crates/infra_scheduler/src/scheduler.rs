//! Reminder scheduler
//!
//! Per-case state machine: armed -> fired -> rescheduled | stopped. Jobs are
//! drained by a periodic scan rather than per-job timers, so actual firing
//! jitter is bounded by one poll interval. A fired job stops for exactly two
//! reasons: the case completed, or the stop-after horizon passed. Every
//! other failure is logged and the job re-armed for the next interval.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use core_kernel::CaseId;
use domain_escalation::{EscalationError, EscalationRouter};
use domain_notify::Notifier;

use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::events::CaseEvent;
use crate::queue::ReminderQueue;
use crate::store::CaseStore;

pub struct ReminderScheduler {
    store: Arc<dyn CaseStore>,
    router: EscalationRouter,
    notifier: Notifier,
    config: SchedulerConfig,
    queue: Mutex<ReminderQueue>,
    running: RwLock<bool>,
}

impl ReminderScheduler {
    pub fn new(
        store: Arc<dyn CaseStore>,
        router: EscalationRouter,
        notifier: Notifier,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            store,
            router,
            notifier,
            config,
            queue: Mutex::new(ReminderQueue::new()),
            running: RwLock::new(false),
        }
    }

    /// Reacts to a case lifecycle event
    pub async fn handle_event(&self, event: CaseEvent) {
        match event {
            CaseEvent::CaseCreated { case_id, .. } | CaseEvent::CaseUpdated { case_id, .. } => {
                self.arm(case_id, Utc::now()).await;
            }
            CaseEvent::CaseDeleted { case_id, .. } => {
                let cancelled = self.queue.lock().await.cancel(case_id);
                debug!(case_id = %case_id, cancelled, "case deleted");
            }
        }
    }

    /// Due time of the live job for a case, if any
    pub async fn live_job(&self, case_id: CaseId) -> Option<DateTime<Utc>> {
        self.queue.lock().await.live_job(case_id)
    }

    /// Drains and processes every job due at `now`; returns how many fired
    pub async fn process_due(&self, now: DateTime<Utc>) -> usize {
        let due = self.queue.lock().await.drain_due(now);
        let fired = due.len();
        for case_id in due {
            // A slow collaborator must not stall the scan indefinitely
            let outcome = tokio::time::timeout(
                self.config.job_budget(),
                self.process_case(case_id, now),
            )
            .await;
            if outcome.is_err() {
                warn!(case_id = %case_id, "reminder evaluation exceeded job budget");
                self.arm(case_id, now).await;
            }
        }
        fired
    }

    /// Starts the periodic poll loop
    pub async fn start(self: Arc<Self>) -> Result<(), SchedulerError> {
        {
            let mut running = self.running.write().await;
            if *running {
                return Err(SchedulerError::AlreadyRunning);
            }
            *running = true;
        }

        info!(
            poll_interval_secs = self.config.poll_interval_secs,
            "starting reminder scheduler"
        );

        let scheduler = Arc::clone(&self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(scheduler.config.poll_interval());
            loop {
                interval.tick().await;

                if !*scheduler.running.read().await {
                    info!("reminder scheduler stopped");
                    break;
                }

                let fired = scheduler.process_due(Utc::now()).await;
                if fired > 0 {
                    debug!(fired, "processed due reminders");
                }
            }
        });

        Ok(())
    }

    /// Stops the poll loop; in-flight evaluations finish on their own
    pub async fn stop(&self) {
        let mut running = self.running.write().await;
        *running = false;
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    async fn arm(&self, case_id: CaseId, now: DateTime<Utc>) {
        let due_at = now + self.config.reminder_interval();
        self.queue.lock().await.arm(case_id, due_at);
        debug!(case_id = %case_id, due_at = %due_at, "reminder armed");
    }

    async fn process_case(&self, case_id: CaseId, now: DateTime<Utc>) {
        let case = match self.store.find_by_id(case_id).await {
            Ok(case) => case,
            Err(e) if e.is_not_found() => {
                debug!(case_id = %case_id, "case no longer exists; dropping job");
                return;
            }
            Err(e) => {
                warn!(case_id = %case_id, error = %e, "case lookup failed; will retry");
                self.arm(case_id, now).await;
                return;
            }
        };

        if now >= case.created_at + self.config.stop_after() {
            info!(case = %case.case_number, "stop-after horizon passed; dropping job");
            return;
        }

        match self.router.route(&case, now).await {
            Ok(escalation) => {
                self.notifier.dispatch(&case, &escalation).await;
                self.arm(case_id, now).await;
            }
            Err(EscalationError::AlreadyCompleted) => {
                debug!(case = %case.case_number, "case completed; dropping job");
            }
            Err(e) => {
                warn!(case = %case.case_number, error = %e, "routing failed; will retry");
                self.arm(case_id, now).await;
            }
        }
    }
}
