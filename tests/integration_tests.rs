//! Integration Tests for the Surveillance Workflow
//!
//! These tests verify cross-domain scenarios end to end: status derivation,
//! escalation routing, reminder scheduling, and notification delivery working
//! together against in-memory adapters.

use std::sync::Arc;

use chrono::{Duration, Utc};

use core_kernel::Timezone;
use domain_escalation::{
    EscalationError, EscalationRouter, NotificationKind, OrgHierarchy, Person, Role, RoleLookup,
    Spot,
};
use domain_notify::Notifier;
use domain_signal::{
    derive_status, CaseStatus, CaseVersion, Stage, StagePatch, YesNo,
};
use infra_scheduler::{CaseEvent, CaseStore, ReminderScheduler, SchedulerConfig};
use test_utils::{
    init_tracing, CaseBuilder, FormFixtures, InMemoryCaseStore, InMemoryOrgHierarchy,
    InMemoryRoleLookup, OrgTreeFixture, RecordingGateway,
};

/// Everything a scenario needs, wired against in-memory adapters
struct Harness {
    tree: OrgTreeFixture,
    store: Arc<InMemoryCaseStore>,
    sms: Arc<RecordingGateway>,
    whatsapp: Arc<RecordingGateway>,
    scheduler: Arc<ReminderScheduler>,
}

fn harness_with_roles(tree: OrgTreeFixture, roles: Vec<Role>) -> Harness {
    init_tracing();

    let org: Arc<dyn OrgHierarchy> = Arc::new(InMemoryOrgHierarchy::with_units(tree.units()));
    let lookup: Arc<dyn RoleLookup> = Arc::new(InMemoryRoleLookup::with_roles(roles));
    let store = Arc::new(InMemoryCaseStore::new());
    let sms = Arc::new(RecordingGateway::new());
    let whatsapp = Arc::new(RecordingGateway::new());

    let config = SchedulerConfig::default();
    let router = EscalationRouter::new(Arc::clone(&org), lookup, config.escalate_after());
    let notifier = Notifier::new(
        sms.clone(),
        whatsapp.clone(),
        Arc::clone(&org),
        Timezone::default(),
    );
    let scheduler = Arc::new(ReminderScheduler::new(
        store.clone(),
        router,
        notifier,
        config,
    ));

    Harness {
        tree,
        store,
        sms,
        whatsapp,
        scheduler,
    }
}

fn harness() -> Harness {
    let tree = OrgTreeFixture::kenya();
    let roles = tree.default_roles();
    harness_with_roles(tree, roles)
}

mod status_workflow {
    use super::*;

    /// A fresh CEBS case is pending; a non-matching verification completes it
    #[test]
    fn test_cebs_verification_resolves_case() {
        let case = CaseBuilder::new().with_signal("1").build();
        assert_eq!(derive_status(&case), CaseStatus::Pending);

        let mut resolved = case.clone();
        resolved
            .apply_stage_patch(StagePatch::Verification(FormFixtures::verification(true)))
            .expect("verification applies");
        assert_eq!(derive_status(&resolved), CaseStatus::Completed);
    }

    /// With samples collected, a HEBS v2 case awaits the lab stage before the
    /// summary, even though the response form already arrived
    #[test]
    fn test_hebs_v2_lab_gate_precedes_summary() {
        let mut case = CaseBuilder::new()
            .with_signal("H1")
            .with_version(CaseVersion::V2)
            .with_patch(StagePatch::Verification(FormFixtures::verification(false)))
            .with_patch(StagePatch::Investigation(FormFixtures::investigation(
                YesNo::Yes,
            )))
            .with_patch(StagePatch::Response(FormFixtures::response(false)))
            .build();
        assert_eq!(derive_status(&case), CaseStatus::Pending);
        assert!(matches!(
            domain_signal::walk(&case),
            domain_signal::Progress::AwaitingStage(Stage::Lab)
        ));

        case.apply_stage_patch(StagePatch::Lab(FormFixtures::lab()))
            .expect("lab applies");
        assert!(matches!(
            domain_signal::walk(&case),
            domain_signal::Progress::AwaitingStage(Stage::Summary)
        ));

        case.apply_stage_patch(StagePatch::Summary(FormFixtures::summary()))
            .expect("summary applies");
        assert_eq!(derive_status(&case), CaseStatus::Completed);
    }

    /// A response recommending escalation keeps the case open until the
    /// escalation form arrives
    #[test]
    fn test_escalation_recommendation_keeps_case_pending() {
        let mut case = CaseBuilder::new()
            .with_signal("V2")
            .with_patch(StagePatch::Verification(FormFixtures::verification(false)))
            .with_patch(StagePatch::Investigation(FormFixtures::investigation(
                YesNo::No,
            )))
            .with_patch(StagePatch::Response(FormFixtures::response(true)))
            .build();
        assert!(matches!(
            domain_signal::walk(&case),
            domain_signal::Progress::AwaitingStage(Stage::Escalation)
        ));

        case.apply_stage_patch(StagePatch::Escalation(FormFixtures::escalation()))
            .expect("escalation applies");
        assert_eq!(derive_status(&case), CaseStatus::Completed);
    }

    /// A LEBS response completes the case unconditionally
    #[test]
    fn test_lebs_response_is_terminal() {
        let case = CaseBuilder::new()
            .with_signal("L1")
            .with_patch(StagePatch::LebsVerification(FormFixtures::lebs_verification(
                false,
            )))
            .with_patch(StagePatch::LebsInvestigation(
                FormFixtures::lebs_investigation(),
            ))
            .with_patch(StagePatch::Response(FormFixtures::response(false)))
            .build();
        assert_eq!(derive_status(&case), CaseStatus::Completed);
    }
}

mod escalation_routing {
    use super::*;

    /// Inside the escalate-after window, verification reminders go to every
    /// active verifier at the reporting unit
    #[tokio::test]
    async fn test_fresh_case_reminds_unit_verifiers() {
        let tree = OrgTreeFixture::kenya();
        let roles = tree.default_roles();
        let unit = tree.community_unit.id;

        let org: Arc<dyn OrgHierarchy> =
            Arc::new(InMemoryOrgHierarchy::with_units(tree.units()));
        let lookup: Arc<dyn RoleLookup> = Arc::new(InMemoryRoleLookup::with_roles(roles));
        let router = EscalationRouter::new(org, lookup, Duration::hours(24));

        let case = CaseBuilder::new()
            .with_signal("1")
            .with_reporting_unit(unit)
            .build();

        let escalation = router.route(&case, Utc::now()).await.expect("routes");
        assert_eq!(escalation.stage, Stage::Verification);
        assert_eq!(escalation.kind, NotificationKind::Reminder);

        // Both the CHA and the AHA are reminded
        let names: Vec<&str> = escalation
            .recipients
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Mary Wanjiku", "John Mwangi"]);
    }

    /// Once the window elapses, the same unverified case is handed to the
    /// parent unit's family coordinator as a follow-up
    #[tokio::test]
    async fn test_overdue_verification_follows_up_with_coordinator() {
        let tree = OrgTreeFixture::kenya();
        let roles = tree.default_roles();
        let unit = tree.community_unit.id;

        let org: Arc<dyn OrgHierarchy> =
            Arc::new(InMemoryOrgHierarchy::with_units(tree.units()));
        let lookup: Arc<dyn RoleLookup> = Arc::new(InMemoryRoleLookup::with_roles(roles));
        let router = EscalationRouter::new(org, lookup, Duration::hours(24));

        let case = CaseBuilder::new()
            .with_signal("1")
            .with_reporting_unit(unit)
            .created_at(Utc::now() - Duration::hours(25))
            .build();

        let escalation = router.route(&case, Utc::now()).await.expect("routes");
        assert_eq!(escalation.stage, Stage::Verification);
        assert_eq!(escalation.kind, NotificationKind::FollowUp);

        // Exactly one owner: the subcounty CEBS coordinator
        assert_eq!(escalation.recipients.len(), 1);
        assert_eq!(escalation.recipients[0].name, "Peter Otieno");
    }

    /// The VEBS spot acts as both unit verifier and parent coordinator: the
    /// audience and kind switch exactly as the window elapses
    #[tokio::test]
    async fn test_vebs_audience_switch_across_window() {
        let tree = OrgTreeFixture::kenya();
        let unit = tree.health_facility.id;
        let roles = vec![
            Role::new(
                Person::new("Esther Muthoni", "+254711000007"),
                unit,
                Spot::Vebs,
            ),
            Role::new(
                Person::new("James Kamau", "+254711000008"),
                tree.subcounty.id,
                Spot::Vebs,
            ),
        ];

        let org: Arc<dyn OrgHierarchy> =
            Arc::new(InMemoryOrgHierarchy::with_units(tree.units()));
        let lookup: Arc<dyn RoleLookup> = Arc::new(InMemoryRoleLookup::with_roles(roles));
        let escalate_after = Duration::hours(24);
        let router = EscalationRouter::new(org, lookup, escalate_after);

        let created = Utc::now() - Duration::hours(12);
        let case = CaseBuilder::new()
            .with_signal("V1")
            .with_reporting_unit(unit)
            .created_at(created)
            .build();

        let before = router.route(&case, Utc::now()).await.expect("routes");
        assert_eq!(before.kind, NotificationKind::Reminder);
        assert_eq!(before.recipients[0].name, "Esther Muthoni");

        // Exactly at the boundary the follow-up audience takes over
        let at_boundary = created + escalate_after;
        let after = router.route(&case, at_boundary).await.expect("routes");
        assert_eq!(after.kind, NotificationKind::FollowUp);
        assert_eq!(after.recipients[0].name, "James Kamau");
    }

    /// Stages after verification always target the parent coordinator with a
    /// reminder, regardless of elapsed time
    #[tokio::test]
    async fn test_later_stage_targets_coordinator() {
        let tree = OrgTreeFixture::kenya();
        let roles = tree.default_roles();
        let unit = tree.health_facility.id;

        let org: Arc<dyn OrgHierarchy> =
            Arc::new(InMemoryOrgHierarchy::with_units(tree.units()));
        let lookup: Arc<dyn RoleLookup> = Arc::new(InMemoryRoleLookup::with_roles(roles));
        let router = EscalationRouter::new(org, lookup, Duration::hours(24));

        let case = CaseBuilder::new()
            .with_signal("H2")
            .with_reporting_unit(unit)
            .created_at(Utc::now() - Duration::hours(48))
            .with_patch(StagePatch::Verification(FormFixtures::verification(false)))
            .build();

        let escalation = router.route(&case, Utc::now()).await.expect("routes");
        assert_eq!(escalation.stage, Stage::Investigation);
        assert_eq!(escalation.kind, NotificationKind::Reminder);
        assert_eq!(escalation.recipients[0].name, "Susan Njeri");
    }

    /// Without a family coordinator at the parent, the cross-family EBS
    /// coordinator is the fallback owner
    #[tokio::test]
    async fn test_coordinator_fallback_to_ebs_spot() {
        let tree = OrgTreeFixture::kenya();
        let unit = tree.health_facility.id;
        let roles = vec![Role::new(
            Person::new("Daniel Kiprop", "+254711000009"),
            tree.subcounty.id,
            Spot::Ebs,
        )];

        let org: Arc<dyn OrgHierarchy> =
            Arc::new(InMemoryOrgHierarchy::with_units(tree.units()));
        let lookup: Arc<dyn RoleLookup> = Arc::new(InMemoryRoleLookup::with_roles(roles));
        let router = EscalationRouter::new(org, lookup, Duration::hours(24));

        let case = CaseBuilder::new()
            .with_signal("H1")
            .with_reporting_unit(unit)
            .created_at(Utc::now() - Duration::hours(48))
            .build();

        let escalation = router.route(&case, Utc::now()).await.expect("routes");
        assert_eq!(escalation.recipients[0].name, "Daniel Kiprop");
    }

    /// A completed case routes to nothing
    #[tokio::test]
    async fn test_completed_case_yields_terminal_error() {
        let tree = OrgTreeFixture::kenya();
        let roles = tree.default_roles();
        let unit = tree.community_unit.id;

        let org: Arc<dyn OrgHierarchy> =
            Arc::new(InMemoryOrgHierarchy::with_units(tree.units()));
        let lookup: Arc<dyn RoleLookup> = Arc::new(InMemoryRoleLookup::with_roles(roles));
        let router = EscalationRouter::new(org, lookup, Duration::hours(24));

        let case = CaseBuilder::new()
            .with_signal("1")
            .with_reporting_unit(unit)
            .with_patch(StagePatch::Verification(FormFixtures::verification(true)))
            .build();

        let err = router.route(&case, Utc::now()).await.unwrap_err();
        assert!(matches!(err, EscalationError::AlreadyCompleted));
        assert!(err.is_terminal());
        assert_eq!(err.to_string(), "Task has been completed");
    }
}

mod reminder_scheduling {
    use super::*;

    /// Creation arms a reminder; repeated update events replace it instead of
    /// stacking a second live job
    #[tokio::test]
    async fn test_rearming_is_idempotent() {
        let h = harness();
        let case = CaseBuilder::new()
            .with_reporting_unit(h.tree.community_unit.id)
            .build();
        let id = case.id;
        h.store.insert(case);

        h.scheduler.handle_event(CaseEvent::created(id)).await;
        let first_due = h.scheduler.live_job(id).await.expect("job armed");

        h.scheduler.handle_event(CaseEvent::updated(id)).await;
        h.scheduler.handle_event(CaseEvent::updated(id)).await;
        let latest_due = h.scheduler.live_job(id).await.expect("still one job");
        assert!(latest_due >= first_due);

        // Nothing fires before the due time
        assert_eq!(h.scheduler.process_due(Utc::now()).await, 0);
        assert_eq!(h.sms.sent_count(), 0);
    }

    /// A due reminder notifies on both channels and re-arms for the next
    /// interval
    #[tokio::test]
    async fn test_due_reminder_fires_and_rearms() {
        let h = harness();
        let case = CaseBuilder::new()
            .with_signal("1")
            .with_reporting_unit(h.tree.community_unit.id)
            .build();
        let id = case.id;
        let number = case.case_number.clone();
        h.store.insert(case);

        h.scheduler.handle_event(CaseEvent::created(id)).await;
        let fired = h.scheduler.process_due(Utc::now() + Duration::hours(3)).await;
        assert_eq!(fired, 1);

        let sms_sent = h.sms.sent();
        assert_eq!(sms_sent.len(), 1);
        assert_eq!(
            sms_sent[0].0,
            vec!["+254711000001".to_string(), "+254711000002".to_string()]
        );
        assert!(sms_sent[0].1.contains(&number));
        assert_eq!(h.whatsapp.sent_count(), 1);

        assert!(h.scheduler.live_job(id).await.is_some());
    }

    /// Completing the case makes the next firing drop the job silently
    #[tokio::test]
    async fn test_completed_case_stops_reminders() {
        let h = harness();
        let case = CaseBuilder::new()
            .with_reporting_unit(h.tree.community_unit.id)
            .with_patch(StagePatch::Verification(FormFixtures::verification(true)))
            .build();
        let id = case.id;
        h.store.insert(case);

        h.scheduler.handle_event(CaseEvent::created(id)).await;
        let fired = h.scheduler.process_due(Utc::now() + Duration::hours(3)).await;
        assert_eq!(fired, 1);

        assert_eq!(h.sms.sent_count(), 0);
        assert!(h.scheduler.live_job(id).await.is_none());
    }

    /// Past the stop-after horizon no reminder is sent and the job is not
    /// re-armed
    #[tokio::test]
    async fn test_stop_after_horizon_silences_case() {
        let h = harness();
        let case = CaseBuilder::new()
            .with_reporting_unit(h.tree.community_unit.id)
            .created_at(Utc::now() - Duration::days(8))
            .build();
        let id = case.id;
        h.store.insert(case);

        h.scheduler.handle_event(CaseEvent::updated(id)).await;
        let fired = h.scheduler.process_due(Utc::now() + Duration::hours(3)).await;
        assert_eq!(fired, 1);

        assert_eq!(h.sms.sent_count(), 0);
        assert_eq!(h.whatsapp.sent_count(), 0);
        assert!(h.scheduler.live_job(id).await.is_none());
    }

    /// A routing failure (no active role-holder anywhere) is transient: the
    /// evaluation is skipped but the job is re-armed for the next interval
    #[tokio::test]
    async fn test_routing_failure_rearms_job() {
        let tree = OrgTreeFixture::kenya();
        let h = harness_with_roles(tree, Vec::new());
        let case = CaseBuilder::new()
            .with_reporting_unit(h.tree.community_unit.id)
            .build();
        let id = case.id;
        h.store.insert(case);

        h.scheduler.handle_event(CaseEvent::created(id)).await;
        let fired = h.scheduler.process_due(Utc::now() + Duration::hours(3)).await;
        assert_eq!(fired, 1);

        // Nothing was sent, but the reminder keeps retrying
        assert_eq!(h.sms.sent_count(), 0);
        assert_eq!(h.whatsapp.sent_count(), 0);
        assert!(h.scheduler.live_job(id).await.is_some());
    }

    /// Even when every earlier fire failed, no reminder survives past the
    /// stop-after horizon
    #[tokio::test]
    async fn test_failed_fires_still_respect_horizon() {
        let tree = OrgTreeFixture::kenya();
        let h = harness_with_roles(tree, Vec::new());
        let case = CaseBuilder::new()
            .with_reporting_unit(h.tree.community_unit.id)
            .created_at(Utc::now() - Duration::days(6))
            .build();
        let id = case.id;
        h.store.insert(case);

        h.scheduler.handle_event(CaseEvent::created(id)).await;

        // Inside the horizon the failed evaluation re-arms
        assert_eq!(h.scheduler.process_due(Utc::now() + Duration::hours(3)).await, 1);
        assert!(h.scheduler.live_job(id).await.is_some());

        // Past the horizon the job is dropped without a send
        assert_eq!(h.scheduler.process_due(Utc::now() + Duration::days(2)).await, 1);
        assert!(h.scheduler.live_job(id).await.is_none());
        assert_eq!(h.sms.sent_count(), 0);
        assert_eq!(h.whatsapp.sent_count(), 0);
    }

    /// Deleting a case cancels its pending reminder
    #[tokio::test]
    async fn test_deletion_cancels_job() {
        let h = harness();
        let case = CaseBuilder::new()
            .with_reporting_unit(h.tree.community_unit.id)
            .build();
        let id = case.id;
        h.store.insert(case);

        h.scheduler.handle_event(CaseEvent::created(id)).await;
        assert!(h.scheduler.live_job(id).await.is_some());

        h.store.remove(id);
        h.scheduler.handle_event(CaseEvent::deleted(id)).await;
        assert!(h.scheduler.live_job(id).await.is_none());

        assert_eq!(h.scheduler.process_due(Utc::now() + Duration::hours(3)).await, 0);
        assert_eq!(h.sms.sent_count(), 0);
    }

    /// A job whose case vanished from the store is dropped, not retried
    #[tokio::test]
    async fn test_missing_case_drops_job() {
        let h = harness();
        let case = CaseBuilder::new()
            .with_reporting_unit(h.tree.community_unit.id)
            .build();
        let id = case.id;
        h.store.insert(case);

        h.scheduler.handle_event(CaseEvent::created(id)).await;
        h.store.remove(id);

        let fired = h.scheduler.process_due(Utc::now() + Duration::hours(3)).await;
        assert_eq!(fired, 1);
        assert!(h.scheduler.live_job(id).await.is_none());
        assert_eq!(h.sms.sent_count(), 0);
    }

    /// The poll loop refuses to start twice
    #[tokio::test]
    async fn test_start_is_exclusive() {
        let h = harness();
        Arc::clone(&h.scheduler).start().await.expect("first start");
        assert!(h.scheduler.is_running().await);

        let err = Arc::clone(&h.scheduler).start().await.unwrap_err();
        assert!(matches!(
            err,
            infra_scheduler::SchedulerError::AlreadyRunning
        ));

        h.scheduler.stop().await;
        assert!(!h.scheduler.is_running().await);
    }
}

mod notification_delivery {
    use super::*;

    /// One broken channel neither blocks the other nor fails the reminder
    #[tokio::test]
    async fn test_channel_failure_is_isolated() {
        let h = harness();
        h.sms.set_failing(true);

        let case = CaseBuilder::new()
            .with_reporting_unit(h.tree.community_unit.id)
            .build();
        let id = case.id;
        h.store.insert(case);

        h.scheduler.handle_event(CaseEvent::created(id)).await;
        let fired = h.scheduler.process_due(Utc::now() + Duration::hours(3)).await;
        assert_eq!(fired, 1);

        assert_eq!(h.sms.sent_count(), 0);
        assert_eq!(h.whatsapp.sent_count(), 1);

        // The failure did not stop the reminder cycle
        assert!(h.scheduler.live_job(id).await.is_some());
    }

    /// Updating the case through the store keeps the workflow moving: the
    /// next firing reminds about the following stage
    #[tokio::test]
    async fn test_reminder_follows_workflow_progress() {
        let h = harness();
        let case = CaseBuilder::new()
            .with_signal("1")
            .with_reporting_unit(h.tree.community_unit.id)
            .build();
        let id = case.id;
        h.store.insert(case);

        h.scheduler.handle_event(CaseEvent::created(id)).await;
        h.scheduler.process_due(Utc::now() + Duration::hours(3)).await;
        assert!(h.sms.sent()[0].1.contains("Please verify"));

        h.store
            .update(id, StagePatch::Verification(FormFixtures::verification(false)))
            .await
            .expect("update applies");
        h.scheduler.handle_event(CaseEvent::updated(id)).await;
        h.scheduler.process_due(Utc::now() + Duration::hours(6)).await;

        let sent = h.sms.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[1].1.contains("awaiting risk investigation"));
        // Investigation reminders go to the single coordinator
        assert_eq!(sent[1].0, vec!["+254711000004".to_string()]);
    }
}
