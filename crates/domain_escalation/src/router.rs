//! Escalation router
//!
//! Given a pending case and the current time, resolves the stage that needs
//! action, who should be told, and whether they get a first reminder or an
//! overdue follow-up.
//!
//! Verification is the only stage with a time-gated audience switch: within
//! the escalate-after window the reporting unit's own verifiers are reminded;
//! once it elapses the parent unit's family coordinator gets a follow-up.
//! Every later stage always targets the parent-unit coordinator with a
//! reminder, notifying a single owner rather than broadcasting.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::debug;

use core_kernel::UnitId;
use domain_signal::{walk, Case, Family, Progress, Stage};

use crate::error::EscalationError;
use crate::org::OrgUnit;
use crate::ports::{OrgHierarchy, RoleLookup, RoleQuery};
use crate::role::{Person, Spot};

/// Whether the audience gets a first reminder or an overdue follow-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Reminder,
    FollowUp,
}

/// The router's answer: who must act next, and how to address them
#[derive(Debug, Clone)]
pub struct Escalation {
    pub stage: Stage,
    pub kind: NotificationKind,
    pub recipients: Vec<Person>,
}

/// Resolves the next actionable stage and its recipients
pub struct EscalationRouter {
    org: Arc<dyn OrgHierarchy>,
    roles: Arc<dyn RoleLookup>,
    /// Window after case creation during which verification stays with the
    /// reporting unit
    escalate_after: Duration,
}

impl EscalationRouter {
    pub fn new(
        org: Arc<dyn OrgHierarchy>,
        roles: Arc<dyn RoleLookup>,
        escalate_after: Duration,
    ) -> Self {
        Self {
            org,
            roles,
            escalate_after,
        }
    }

    /// Routes a case to its next actionable stage
    ///
    /// Fails with [`EscalationError::AlreadyCompleted`] when there is nothing
    /// left to act on; the scheduler treats that as a stop signal.
    pub async fn route(
        &self,
        case: &Case,
        now: DateTime<Utc>,
    ) -> Result<Escalation, EscalationError> {
        let stage = match walk(case) {
            Progress::Completed => return Err(EscalationError::AlreadyCompleted),
            Progress::AwaitingStage(stage) => stage,
        };
        let family = case.family();

        let escalation = if stage == Stage::Verification {
            if now < case.created_at + self.escalate_after {
                let recipients = self.unit_verifiers(case.reporting_unit, family).await?;
                Escalation {
                    stage,
                    kind: NotificationKind::Reminder,
                    recipients,
                }
            } else {
                // Verification is overdue: hand it to the parent coordinator
                let recipients = self.parent_coordinator(case.reporting_unit, family).await?;
                Escalation {
                    stage,
                    kind: NotificationKind::FollowUp,
                    recipients,
                }
            }
        } else {
            let recipients = self.parent_coordinator(case.reporting_unit, family).await?;
            Escalation {
                stage,
                kind: NotificationKind::Reminder,
                recipients,
            }
        };

        debug!(
            case = %case.case_number,
            stage = %escalation.stage,
            kind = ?escalation.kind,
            recipients = escalation.recipients.len(),
            "routed case"
        );
        Ok(escalation)
    }

    /// All active verifier role-holders at the reporting unit itself
    async fn unit_verifiers(
        &self,
        unit: UnitId,
        family: Family,
    ) -> Result<Vec<Person>, EscalationError> {
        let spots = Spot::verifier_spots(family);
        let roles = self
            .roles
            .find_active_roles(RoleQuery::new(unit, spots), None)
            .await?;
        if roles.is_empty() {
            return Err(EscalationError::NoActiveRole {
                unit,
                spots: spots.to_vec(),
            });
        }
        Ok(roles.into_iter().map(|r| r.person).collect())
    }

    /// The single family coordinator at the parent unit
    ///
    /// Tries the family spot first, then broadens to the cross-family EBS
    /// spot. Only the first match is notified.
    async fn parent_coordinator(
        &self,
        unit: UnitId,
        family: Family,
    ) -> Result<Vec<Person>, EscalationError> {
        let parent = self.parent_of(unit).await?;

        let primary = RoleQuery::new(parent.id, [Spot::coordinator_spot(family)]);
        let mut roles = self.roles.find_active_roles(primary, Some(1)).await?;

        if roles.is_empty() {
            let broadened = RoleQuery::new(parent.id, Spot::coordinator_fallback(family));
            roles = self.roles.find_active_roles(broadened, Some(1)).await?;
        }

        match roles.into_iter().next() {
            Some(role) => Ok(vec![role.person]),
            None => Err(EscalationError::NoActiveRole {
                unit: parent.id,
                spots: Spot::coordinator_fallback(family).to_vec(),
            }),
        }
    }

    async fn parent_of(&self, unit: UnitId) -> Result<OrgUnit, EscalationError> {
        self.org
            .parent_of(unit)
            .await?
            .ok_or(EscalationError::OrphanUnit(unit))
    }
}
