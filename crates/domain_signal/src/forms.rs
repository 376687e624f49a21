//! Stage forms
//!
//! Each workflow stage is recorded as a typed form. Every form carries a
//! `FormMeta` with its submitter and arrival channel; the answers drive the
//! status state machine in [`crate::stages`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Recommendation text that requires the escalation stage to follow
pub const ESCALATE_RECOMMENDATION: &str = "Escalate to higher level";

/// A yes/no answer as captured on the reporting forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn is_yes(&self) -> bool {
        matches!(self, YesNo::Yes)
    }

    pub fn is_no(&self) -> bool {
        matches!(self, YesNo::No)
    }
}

/// Channel a report or form arrived through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Sms,
    Whatsapp,
    Web,
}

/// A named, reachable person attached to a case or form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
}

impl Contact {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }
}

/// Submission metadata recorded on every stage form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormMeta {
    /// Who submitted the form
    pub submitter: Contact,
    /// Channel the form arrived through
    pub via: Channel,
    /// When the form was received
    pub submitted_at: DateTime<Utc>,
}

impl FormMeta {
    pub fn new(submitter: Contact, via: Channel) -> Self {
        Self {
            submitter,
            via,
            submitted_at: Utc::now(),
        }
    }
}

/// Verification form for CEBS/HEBS/VEBS cases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationForm {
    pub meta: FormMeta,
    /// Does the reported event match the signal definition?
    pub is_matching_signal: YesNo,
    /// Has this event already been reported?
    pub is_reported_before: YesNo,
    /// Is the threat still present?
    pub is_threat_still_existing: YesNo,
    pub description: Option<String>,
}

impl VerificationForm {
    /// True when the answers already resolve the case without further stages
    pub fn resolves_case(&self) -> bool {
        self.is_matching_signal.is_no()
            || self.is_reported_before.is_yes()
            || self.is_threat_still_existing.is_no()
    }
}

/// Verification form for LEBS cases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LebsVerificationForm {
    pub meta: FormMeta,
    pub is_matching_signal: YesNo,
    /// Is the event still happening at the institution?
    pub is_still_happening: YesNo,
    pub is_reported_before: YesNo,
    pub description: Option<String>,
}

impl LebsVerificationForm {
    pub fn resolves_case(&self) -> bool {
        self.is_matching_signal.is_no()
            || self.is_still_happening.is_no()
            || self.is_reported_before.is_yes()
    }
}

/// Investigation form for CEBS/HEBS/VEBS cases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestigationForm {
    pub meta: FormMeta,
    pub date_investigation_started: Option<NaiveDate>,
    /// Were lab samples collected? Gates the lab stage on version 2 cases.
    pub is_lab_samples_collected: YesNo,
    pub symptoms: Option<String>,
    pub notes: Option<String>,
}

/// Investigation form for LEBS cases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LebsInvestigationForm {
    pub meta: FormMeta,
    /// Does the event meet the COVID-19 working case definition?
    pub is_covid19_working_case_definition_met: YesNo,
    pub date_investigation_started: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Response form (all families)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseForm {
    pub meta: FormMeta,
    pub date_of_response: Option<NaiveDate>,
    /// Recommendations selected by the responder
    pub recommendations: Vec<String>,
    pub notes: Option<String>,
}

impl ResponseForm {
    /// True when the responder asked for escalation to the next level
    pub fn recommends_escalation(&self) -> bool {
        self.recommendations
            .iter()
            .any(|r| r == ESCALATE_RECOMMENDATION)
    }
}

/// Lab form (version 2, CEBS/HEBS/VEBS)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabForm {
    pub meta: FormMeta,
    pub date_sample_collected: Option<NaiveDate>,
    pub lab_results: Option<String>,
}

/// Summary form (version 2)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryForm {
    pub meta: FormMeta,
    pub event_status: Option<String>,
    pub notes: Option<String>,
}

/// Escalation form (CEBS/HEBS/VEBS)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationForm {
    pub meta: FormMeta,
    pub reason: Option<String>,
    pub date_escalated: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> FormMeta {
        FormMeta::new(Contact::new("Jane Chebet", "+254700000001"), Channel::Sms)
    }

    #[test]
    fn test_yes_no_serializes_as_form_values() {
        assert_eq!(serde_json::to_string(&YesNo::Yes).unwrap(), "\"Yes\"");
        assert_eq!(serde_json::to_string(&YesNo::No).unwrap(), "\"No\"");
    }

    #[test]
    fn test_verification_resolves_case() {
        let mut form = VerificationForm {
            meta: meta(),
            is_matching_signal: YesNo::Yes,
            is_reported_before: YesNo::No,
            is_threat_still_existing: YesNo::Yes,
            description: None,
        };
        assert!(!form.resolves_case());

        form.is_matching_signal = YesNo::No;
        assert!(form.resolves_case());

        form.is_matching_signal = YesNo::Yes;
        form.is_reported_before = YesNo::Yes;
        assert!(form.resolves_case());

        form.is_reported_before = YesNo::No;
        form.is_threat_still_existing = YesNo::No;
        assert!(form.resolves_case());
    }

    #[test]
    fn test_response_recommends_escalation() {
        let form = ResponseForm {
            meta: meta(),
            date_of_response: None,
            recommendations: vec![
                "Community sensitization".to_string(),
                ESCALATE_RECOMMENDATION.to_string(),
            ],
            notes: None,
        };
        assert!(form.recommends_escalation());

        let quiet = ResponseForm {
            meta: meta(),
            date_of_response: None,
            recommendations: vec!["Community sensitization".to_string()],
            notes: None,
        };
        assert!(!quiet.recommends_escalation());
    }
}
