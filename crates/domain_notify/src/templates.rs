//! Message templates
//!
//! Message text is a deterministic template per (family, stage, kind). Every
//! message carries the case number, signal code, reporting-unit name, the
//! person who completed the previous stage (the reporter, for a fresh case),
//! and the case creation time rendered in the configured timezone.

use core_kernel::Timezone;
use domain_signal::{Case, Stage};

use domain_escalation::NotificationKind;

/// Everything the template needs beyond the case itself
#[derive(Debug, Clone)]
pub struct MessageContext<'a> {
    pub case: &'a Case,
    pub unit_name: &'a str,
    pub timezone: Timezone,
}

/// Renders the notification text for a stage and kind
pub fn render_message(stage: Stage, kind: NotificationKind, ctx: &MessageContext<'_>) -> String {
    let case = ctx.case;
    let family = case.family();
    let reported_at = ctx.timezone.format_local(case.created_at);

    // Whoever completed the previous stage; the reporter for a fresh case
    let (actor_name, actor_phone) = match case.latest_form_meta() {
        Some(meta) => (meta.submitter.name.as_str(), meta.submitter.phone.as_str()),
        None => (case.reporter.name.as_str(), case.reporter.phone.as_str()),
    };

    let action = action_line(stage, kind);

    format!(
        "{family} signal {signal}: case {number} at {unit}, reported {reported_at} \
         (last action by {actor_name}, {actor_phone}). {action}",
        family = family.code(),
        signal = case.signal,
        number = case.case_number,
        unit = ctx.unit_name,
        reported_at = reported_at,
        actor_name = actor_name,
        actor_phone = actor_phone,
        action = action,
    )
}

fn action_line(stage: Stage, kind: NotificationKind) -> &'static str {
    match (stage, kind) {
        (Stage::Verification, NotificationKind::Reminder) => {
            "Please verify this signal."
        }
        (Stage::Verification, NotificationKind::FollowUp) => {
            "Verification is overdue. Please follow up with the reporting unit."
        }
        (Stage::Investigation, NotificationKind::Reminder) => {
            "The signal is verified and awaiting risk investigation."
        }
        (Stage::Investigation, NotificationKind::FollowUp) => {
            "Risk investigation is overdue. Please follow up."
        }
        (Stage::Response, NotificationKind::Reminder) => {
            "Investigation is complete and a response is awaited."
        }
        (Stage::Response, NotificationKind::FollowUp) => {
            "The response is overdue. Please follow up."
        }
        (Stage::Lab, NotificationKind::Reminder) => {
            "Lab samples were collected and lab results are awaited."
        }
        (Stage::Lab, NotificationKind::FollowUp) => {
            "Lab results are overdue. Please follow up with the laboratory."
        }
        (Stage::Summary, NotificationKind::Reminder) => {
            "Please submit the event summary."
        }
        (Stage::Summary, NotificationKind::FollowUp) => {
            "The event summary is overdue. Please follow up."
        }
        (Stage::Escalation, NotificationKind::Reminder) => {
            "The response recommends escalation to the next level. Please escalate."
        }
        (Stage::Escalation, NotificationKind::FollowUp) => {
            "Escalation is overdue. Please follow up."
        }
    }
}
