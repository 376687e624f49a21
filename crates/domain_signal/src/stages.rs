//! Stage sequences and the workflow walker
//!
//! Families differ only in their stage tables, not in algorithm: a single
//! walker evaluates a declarative per-family plan and reports either the
//! first unmet stage or completion. Both the status deriver and the
//! escalation router consume this walker, so the two can never disagree
//! about stage ordering.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::case::{Case, CaseVersion};
use crate::signal::Family;

/// A named step in a family's workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Verification,
    Investigation,
    Response,
    Lab,
    Summary,
    Escalation,
}

impl Stage {
    /// All stages, in canonical order
    pub const ALL: [Stage; 6] = [
        Stage::Verification,
        Stage::Investigation,
        Stage::Response,
        Stage::Lab,
        Stage::Summary,
        Stage::Escalation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Verification => "verification",
            Stage::Investigation => "investigation",
            Stage::Response => "response",
            Stage::Lab => "lab",
            Stage::Summary => "summary",
            Stage::Escalation => "escalation",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a case stands in its family's workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// The first unmet stage
    AwaitingStage(Stage),
    /// Nothing left to act on
    Completed,
}

/// One entry in a family's stage plan
struct StageRule {
    stage: Stage,
    /// Whether this stage participates for the given case
    applies: fn(&Case) -> bool,
    /// Whether the stage form has been submitted
    submitted: fn(&Case) -> bool,
    /// Whether the submitted form already resolves the case
    resolves: fn(&Case) -> bool,
}

const NEVER: fn(&Case) -> bool = |_| false;
const ALWAYS: fn(&Case) -> bool = |_| true;

fn shared_plan(version: CaseVersion) -> Vec<StageRule> {
    let mut rules = vec![
        StageRule {
            stage: Stage::Verification,
            applies: ALWAYS,
            submitted: |c| c.forms.has_stage(Stage::Verification),
            resolves: |c| {
                c.forms
                    .event()
                    .and_then(|f| f.verification.as_ref())
                    .is_some_and(|v| v.resolves_case())
            },
        },
        StageRule {
            stage: Stage::Investigation,
            applies: ALWAYS,
            submitted: |c| c.forms.has_stage(Stage::Investigation),
            resolves: NEVER,
        },
        StageRule {
            stage: Stage::Response,
            applies: ALWAYS,
            submitted: |c| c.forms.has_stage(Stage::Response),
            resolves: NEVER,
        },
    ];

    if version == CaseVersion::V2 {
        // The lab gate is checked before the summary gate, and both before
        // the terminal escalate check, regardless of which forms already
        // arrived.
        rules.push(StageRule {
            stage: Stage::Lab,
            applies: |c| c.lab_required(),
            submitted: |c| c.forms.has_stage(Stage::Lab),
            resolves: NEVER,
        });
        rules.push(StageRule {
            stage: Stage::Summary,
            applies: ALWAYS,
            submitted: |c| c.forms.has_stage(Stage::Summary),
            resolves: NEVER,
        });
    }

    // Without an escalate recommendation the response closes the case; with
    // one, the case awaits the escalation form.
    rules.push(StageRule {
        stage: Stage::Escalation,
        applies: |c| {
            c.forms
                .event()
                .and_then(|f| f.response.as_ref())
                .is_some_and(|r| r.recommends_escalation())
        },
        submitted: |c| c.forms.has_stage(Stage::Escalation),
        resolves: ALWAYS,
    });

    rules
}

fn lebs_plan(version: CaseVersion) -> Vec<StageRule> {
    let mut rules = vec![
        StageRule {
            stage: Stage::Verification,
            applies: ALWAYS,
            submitted: |c| c.forms.has_stage(Stage::Verification),
            resolves: |c| {
                c.forms
                    .lebs()
                    .and_then(|f| f.verification.as_ref())
                    .is_some_and(|v| v.resolves_case())
            },
        },
        StageRule {
            stage: Stage::Investigation,
            applies: ALWAYS,
            submitted: |c| c.forms.has_stage(Stage::Investigation),
            resolves: |c| {
                c.forms
                    .lebs()
                    .and_then(|f| f.investigation.as_ref())
                    .is_some_and(|i| i.is_covid19_working_case_definition_met.is_no())
            },
        },
    ];

    if version == CaseVersion::V2 {
        rules.push(StageRule {
            stage: Stage::Summary,
            applies: ALWAYS,
            submitted: |c| c.forms.has_stage(Stage::Summary),
            resolves: NEVER,
        });
    }

    // A response closes a LEBS case unconditionally
    rules.push(StageRule {
        stage: Stage::Response,
        applies: ALWAYS,
        submitted: |c| c.forms.has_stage(Stage::Response),
        resolves: ALWAYS,
    });

    rules
}

fn plan(family: Family, version: CaseVersion) -> Vec<StageRule> {
    match family {
        Family::Cebs | Family::Hebs | Family::Vebs => shared_plan(version),
        Family::Lebs => lebs_plan(version),
    }
}

/// Walks the case through its family's stage plan
///
/// Returns the first unmet stage, or `Completed` when a short-circuit answer
/// resolved the case or no stage remains. An escalation form (or, for LEBS,
/// a response form) is terminal wherever it appears.
pub fn walk(case: &Case) -> Progress {
    let family = case.family();

    let terminal = match family {
        Family::Lebs => case.forms.has_stage(Stage::Response),
        _ => case.forms.has_stage(Stage::Escalation),
    };
    if terminal {
        return Progress::Completed;
    }

    for rule in plan(family, case.version) {
        if !(rule.applies)(case) {
            continue;
        }
        if !(rule.submitted)(case) {
            return Progress::AwaitingStage(rule.stage);
        }
        if (rule.resolves)(case) {
            return Progress::Completed;
        }
    }

    Progress::Completed
}

/// Canonical submission order for a family and version
///
/// Used to re-derive the "submit X before Y" precondition when a stage patch
/// arrives. The lab entry is conditional on samples having been collected;
/// the caller skips it when the gate is off.
pub fn submission_order(family: Family, version: CaseVersion) -> &'static [Stage] {
    match (family, version) {
        (Family::Lebs, CaseVersion::V1) => {
            &[Stage::Verification, Stage::Investigation, Stage::Response]
        }
        (Family::Lebs, CaseVersion::V2) => &[
            Stage::Verification,
            Stage::Investigation,
            Stage::Summary,
            Stage::Response,
        ],
        (_, CaseVersion::V1) => &[
            Stage::Verification,
            Stage::Investigation,
            Stage::Response,
            Stage::Escalation,
        ],
        (_, CaseVersion::V2) => &[
            Stage::Verification,
            Stage::Investigation,
            Stage::Response,
            Stage::Lab,
            Stage::Summary,
            Stage::Escalation,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Verification.name(), "verification");
        assert_eq!(Stage::Lab.to_string(), "lab");
    }

    #[test]
    fn test_submission_order_v2_inserts_lab_and_summary() {
        let order = submission_order(Family::Hebs, CaseVersion::V2);
        let lab = order.iter().position(|s| *s == Stage::Lab).unwrap();
        let summary = order.iter().position(|s| *s == Stage::Summary).unwrap();
        let escalation = order.iter().position(|s| *s == Stage::Escalation).unwrap();
        assert!(lab < summary && summary < escalation);
    }

    #[test]
    fn test_lebs_has_no_lab_or_escalation() {
        for version in [CaseVersion::V1, CaseVersion::V2] {
            let order = submission_order(Family::Lebs, version);
            assert!(!order.contains(&Stage::Lab));
            assert!(!order.contains(&Stage::Escalation));
        }
    }
}
