//! Reminder queue
//!
//! A min-heap of (due_at, generation, case_id) with a per-case generation
//! index. Arming a case bumps its generation and pushes a fresh heap entry;
//! stale entries are skipped lazily when they surface. The index is what
//! enforces the invariant: at most one live job per case id.

use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use core_kernel::CaseId;

#[derive(Debug, Clone, Copy)]
struct LiveJob {
    generation: u64,
    due_at: DateTime<Utc>,
}

/// Due-time index of armed reminder jobs
#[derive(Debug, Default)]
pub struct ReminderQueue {
    heap: BinaryHeap<Reverse<(DateTime<Utc>, u64, CaseId)>>,
    live: HashMap<CaseId, LiveJob>,
    next_generation: u64,
}

impl ReminderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms (or re-arms) the reminder for a case
    ///
    /// Idempotent with respect to liveness: any existing job for the case is
    /// replaced, never duplicated.
    pub fn arm(&mut self, case_id: CaseId, due_at: DateTime<Utc>) {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.live.insert(case_id, LiveJob { generation, due_at });
        self.heap.push(Reverse((due_at, generation, case_id)));
    }

    /// Cancels the live job for a case, if any
    ///
    /// Returns true when a job was live. The heap entry is left behind and
    /// skipped when it surfaces.
    pub fn cancel(&mut self, case_id: CaseId) -> bool {
        self.live.remove(&case_id).is_some()
    }

    /// Due time of the live job for a case, if any
    pub fn live_job(&self, case_id: CaseId) -> Option<DateTime<Utc>> {
        self.live.get(&case_id).map(|j| j.due_at)
    }

    /// Number of live jobs
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Pops every job due at or before `now`
    ///
    /// Fired jobs leave the live index; whoever drains them decides whether
    /// to re-arm.
    pub fn drain_due(&mut self, now: DateTime<Utc>) -> Vec<CaseId> {
        let mut due = Vec::new();
        while let Some(Reverse((due_at, generation, case_id))) = self.heap.peek().copied() {
            if due_at > now {
                break;
            }
            self.heap.pop();
            match self.live.get(&case_id) {
                Some(job) if job.generation == generation => {
                    self.live.remove(&case_id);
                    due.push(case_id);
                }
                // Cancelled or superseded by a later arm
                _ => {}
            }
        }
        due
    }
}
