//! Case aggregate
//!
//! A case is created once from a reported signal and mutated in place as
//! stage forms are appended; it never returns to a prior stage. Forms are
//! held in a per-family store so that a CEBS case can never carry a LEBS
//! form, and patches are applied through a single typed entry point instead
//! of dynamic field paths.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CaseId, UnitId};

use crate::error::SignalError;
use crate::forms::{
    Channel, Contact, EscalationForm, FormMeta, InvestigationForm, LabForm,
    LebsInvestigationForm, LebsVerificationForm, ResponseForm, SummaryForm, VerificationForm,
};
use crate::signal::{Family, SignalCode};
use crate::stages::{submission_order, Stage};

/// Workflow version of a case
///
/// Version 2 adds the lab and summary stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseVersion {
    V1,
    V2,
}

/// Test/live partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseState {
    Test,
    Live,
}

/// Stage forms for CEBS/HEBS/VEBS cases
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventForms {
    pub verification: Option<VerificationForm>,
    pub investigation: Option<InvestigationForm>,
    pub response: Option<ResponseForm>,
    pub lab: Option<LabForm>,
    pub summary: Option<SummaryForm>,
    pub escalation: Option<EscalationForm>,
}

/// Stage forms for LEBS cases
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LebsForms {
    pub verification: Option<LebsVerificationForm>,
    pub investigation: Option<LebsInvestigationForm>,
    pub summary: Option<SummaryForm>,
    pub response: Option<ResponseForm>,
}

/// Per-family form store, keyed by the case's family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "UPPERCASE")]
pub enum CaseForms {
    Cebs(EventForms),
    Hebs(EventForms),
    Vebs(EventForms),
    Lebs(LebsForms),
}

impl CaseForms {
    fn empty(family: Family) -> Self {
        match family {
            Family::Cebs => CaseForms::Cebs(EventForms::default()),
            Family::Hebs => CaseForms::Hebs(EventForms::default()),
            Family::Vebs => CaseForms::Vebs(EventForms::default()),
            Family::Lebs => CaseForms::Lebs(LebsForms::default()),
        }
    }

    /// Returns the family this form store belongs to
    pub fn family(&self) -> Family {
        match self {
            CaseForms::Cebs(_) => Family::Cebs,
            CaseForms::Hebs(_) => Family::Hebs,
            CaseForms::Vebs(_) => Family::Vebs,
            CaseForms::Lebs(_) => Family::Lebs,
        }
    }

    /// Shared-shape forms, if this is a CEBS/HEBS/VEBS case
    pub fn event(&self) -> Option<&EventForms> {
        match self {
            CaseForms::Cebs(f) | CaseForms::Hebs(f) | CaseForms::Vebs(f) => Some(f),
            CaseForms::Lebs(_) => None,
        }
    }

    /// LEBS forms, if this is a LEBS case
    pub fn lebs(&self) -> Option<&LebsForms> {
        match self {
            CaseForms::Lebs(f) => Some(f),
            _ => None,
        }
    }

    /// Whether the form for the given stage has been submitted
    pub fn has_stage(&self, stage: Stage) -> bool {
        match self {
            CaseForms::Cebs(f) | CaseForms::Hebs(f) | CaseForms::Vebs(f) => match stage {
                Stage::Verification => f.verification.is_some(),
                Stage::Investigation => f.investigation.is_some(),
                Stage::Response => f.response.is_some(),
                Stage::Lab => f.lab.is_some(),
                Stage::Summary => f.summary.is_some(),
                Stage::Escalation => f.escalation.is_some(),
            },
            CaseForms::Lebs(f) => match stage {
                Stage::Verification => f.verification.is_some(),
                Stage::Investigation => f.investigation.is_some(),
                Stage::Summary => f.summary.is_some(),
                Stage::Response => f.response.is_some(),
                Stage::Lab | Stage::Escalation => false,
            },
        }
    }

    /// Submission metadata of the given stage's form, if present
    pub fn meta_of(&self, stage: Stage) -> Option<&FormMeta> {
        match self {
            CaseForms::Cebs(f) | CaseForms::Hebs(f) | CaseForms::Vebs(f) => match stage {
                Stage::Verification => f.verification.as_ref().map(|x| &x.meta),
                Stage::Investigation => f.investigation.as_ref().map(|x| &x.meta),
                Stage::Response => f.response.as_ref().map(|x| &x.meta),
                Stage::Lab => f.lab.as_ref().map(|x| &x.meta),
                Stage::Summary => f.summary.as_ref().map(|x| &x.meta),
                Stage::Escalation => f.escalation.as_ref().map(|x| &x.meta),
            },
            CaseForms::Lebs(f) => match stage {
                Stage::Verification => f.verification.as_ref().map(|x| &x.meta),
                Stage::Investigation => f.investigation.as_ref().map(|x| &x.meta),
                Stage::Summary => f.summary.as_ref().map(|x| &x.meta),
                Stage::Response => f.response.as_ref().map(|x| &x.meta),
                Stage::Lab | Stage::Escalation => None,
            },
        }
    }
}

/// A typed form submission for one stage
///
/// This replaces nested dynamic field-path patches: the patch names the stage
/// and carries the full typed form for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum StagePatch {
    Verification(VerificationForm),
    LebsVerification(LebsVerificationForm),
    Investigation(InvestigationForm),
    LebsInvestigation(LebsInvestigationForm),
    Response(ResponseForm),
    Lab(LabForm),
    Summary(SummaryForm),
    Escalation(EscalationForm),
}

impl StagePatch {
    /// The stage this patch submits
    pub fn stage(&self) -> Stage {
        match self {
            StagePatch::Verification(_) | StagePatch::LebsVerification(_) => Stage::Verification,
            StagePatch::Investigation(_) | StagePatch::LebsInvestigation(_) => {
                Stage::Investigation
            }
            StagePatch::Response(_) => Stage::Response,
            StagePatch::Lab(_) => Stage::Lab,
            StagePatch::Summary(_) => Stage::Summary,
            StagePatch::Escalation(_) => Stage::Escalation,
        }
    }
}

/// A surveillance case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    /// Unique identifier
    pub id: CaseId,
    /// Human-readable case number
    pub case_number: String,
    /// The reported signal code
    pub signal: SignalCode,
    /// Workflow version
    pub version: CaseVersion,
    /// Leaf org unit the signal was reported from
    pub reporting_unit: UnitId,
    /// Who reported the signal
    pub reporter: Contact,
    /// Channel the report arrived through
    pub via: Channel,
    /// Test/live partition
    pub state: CaseState,
    /// Stage forms, keyed by family
    pub forms: CaseForms,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Case {
    /// Creates a new case from a reported signal
    ///
    /// Fails with [`SignalError::UnknownSignal`] when the code is outside the
    /// family membership tables. There is deliberately no fallback for
    /// unknown signals.
    pub fn new(
        signal: &str,
        version: CaseVersion,
        reporting_unit: UnitId,
        reporter: Contact,
        via: Channel,
        state: CaseState,
    ) -> Result<Self, SignalError> {
        let signal = SignalCode::new(signal)?;
        let family = signal.family();
        let now = Utc::now();

        Ok(Self {
            id: CaseId::new_v7(),
            case_number: generate_case_number(),
            signal,
            version,
            reporting_unit,
            reporter,
            via,
            state,
            forms: CaseForms::empty(family),
            created_at: now,
            updated_at: now,
        })
    }

    /// The family this case belongs to
    pub fn family(&self) -> Family {
        self.forms.family()
    }

    /// Applies a stage form to the case
    ///
    /// Re-derives the submission ordering defensively even though the calling
    /// layer validates it: every unconditionally required stage strictly
    /// before the patched one must already exist, the stage must belong to
    /// this case's family and version, and the form shape must match the
    /// family.
    pub fn apply_stage_patch(&mut self, patch: StagePatch) -> Result<(), SignalError> {
        let stage = patch.stage();
        let family = self.family();
        let order = submission_order(family, self.version);

        let position = order.iter().position(|s| *s == stage).ok_or(
            SignalError::StageNotInWorkflow {
                stage,
                family,
                version: self.version,
            },
        )?;

        for required in &order[..position] {
            if *required == Stage::Lab && !self.lab_required() {
                continue;
            }
            if !self.forms.has_stage(*required) {
                return Err(SignalError::OutOfOrder {
                    required: *required,
                    attempted: stage,
                });
            }
        }

        self.store_patch(patch)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Whether the lab stage is gated on for this case
    pub fn lab_required(&self) -> bool {
        if self.version != CaseVersion::V2 {
            return false;
        }
        self.forms
            .event()
            .and_then(|f| f.investigation.as_ref())
            .is_some_and(|inv| inv.is_lab_samples_collected.is_yes())
    }

    /// Metadata of the most recently submitted form, if any
    ///
    /// Used by the notifier to name whoever completed the previous stage.
    pub fn latest_form_meta(&self) -> Option<&FormMeta> {
        Stage::ALL
            .iter()
            .filter_map(|s| self.forms.meta_of(*s))
            .max_by_key(|m| m.submitted_at)
    }

    fn store_patch(&mut self, patch: StagePatch) -> Result<(), SignalError> {
        let family = self.family();
        let mismatch = |patch: &StagePatch| SignalError::FormShapeMismatch {
            stage: patch.stage(),
            family,
        };

        match &mut self.forms {
            CaseForms::Cebs(f) | CaseForms::Hebs(f) | CaseForms::Vebs(f) => match patch {
                StagePatch::Verification(form) => f.verification = Some(form),
                StagePatch::Investigation(form) => f.investigation = Some(form),
                StagePatch::Response(form) => f.response = Some(form),
                StagePatch::Lab(form) => f.lab = Some(form),
                StagePatch::Summary(form) => f.summary = Some(form),
                StagePatch::Escalation(form) => f.escalation = Some(form),
                other => return Err(mismatch(&other)),
            },
            CaseForms::Lebs(f) => match patch {
                StagePatch::LebsVerification(form) => f.verification = Some(form),
                StagePatch::LebsInvestigation(form) => f.investigation = Some(form),
                StagePatch::Summary(form) => f.summary = Some(form),
                StagePatch::Response(form) => f.response = Some(form),
                other => return Err(mismatch(&other)),
            },
        }
        Ok(())
    }
}

fn generate_case_number() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("SIG-{}", duration.as_millis() % 10_000_000_000)
}
