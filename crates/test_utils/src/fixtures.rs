//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for forms, people, and organizational
//! trees. These fixtures are designed to be consistent and predictable for
//! unit and integration tests.

use chrono::NaiveDate;

use domain_escalation::{OrgUnit, Person, Role, Spot, UnitType};
use domain_signal::{
    Channel, Contact, EscalationForm, FormMeta, InvestigationForm, LabForm,
    LebsInvestigationForm, LebsVerificationForm, ResponseForm, SummaryForm, VerificationForm,
    YesNo, ESCALATE_RECOMMENDATION,
};

/// Fixture for contacts and form metadata
pub struct ContactFixtures;

impl ContactFixtures {
    /// The default signal reporter
    pub fn reporter() -> Contact {
        Contact::new("Amos Kipruto", "+254700000010")
    }

    /// The default form submitter
    pub fn submitter() -> Contact {
        Contact::new("Jane Chebet", "+254700000001")
    }

    /// Standard submission metadata (web channel)
    pub fn meta() -> FormMeta {
        FormMeta::new(Self::submitter(), Channel::Web)
    }
}

/// Fixture for stage forms
pub struct FormFixtures;

impl FormFixtures {
    /// A verification form; `resolves` controls whether the answers close
    /// the case outright
    pub fn verification(resolves: bool) -> VerificationForm {
        VerificationForm {
            meta: ContactFixtures::meta(),
            is_matching_signal: if resolves { YesNo::No } else { YesNo::Yes },
            is_reported_before: YesNo::No,
            is_threat_still_existing: YesNo::Yes,
            description: Some("Verified on site".to_string()),
        }
    }

    /// A LEBS verification form
    pub fn lebs_verification(resolves: bool) -> LebsVerificationForm {
        LebsVerificationForm {
            meta: ContactFixtures::meta(),
            is_matching_signal: if resolves { YesNo::No } else { YesNo::Yes },
            is_still_happening: YesNo::Yes,
            is_reported_before: YesNo::No,
            description: None,
        }
    }

    /// An investigation form; `samples` gates the lab stage on v2 cases
    pub fn investigation(samples: YesNo) -> InvestigationForm {
        InvestigationForm {
            meta: ContactFixtures::meta(),
            date_investigation_started: NaiveDate::from_ymd_opt(2024, 3, 12),
            is_lab_samples_collected: samples,
            symptoms: Some("Fever, vomiting".to_string()),
            notes: None,
        }
    }

    /// A LEBS investigation form
    pub fn lebs_investigation() -> LebsInvestigationForm {
        LebsInvestigationForm {
            meta: ContactFixtures::meta(),
            is_covid19_working_case_definition_met: YesNo::Yes,
            date_investigation_started: NaiveDate::from_ymd_opt(2024, 3, 12),
            notes: None,
        }
    }

    /// A response form; `escalate` adds the escalate-to-higher-level
    /// recommendation
    pub fn response(escalate: bool) -> ResponseForm {
        let mut recommendations = vec!["Community sensitization".to_string()];
        if escalate {
            recommendations.push(ESCALATE_RECOMMENDATION.to_string());
        }
        ResponseForm {
            meta: ContactFixtures::meta(),
            date_of_response: NaiveDate::from_ymd_opt(2024, 3, 13),
            recommendations,
            notes: None,
        }
    }

    pub fn lab() -> LabForm {
        LabForm {
            meta: ContactFixtures::meta(),
            date_sample_collected: NaiveDate::from_ymd_opt(2024, 3, 13),
            lab_results: Some("Negative".to_string()),
        }
    }

    pub fn summary() -> SummaryForm {
        SummaryForm {
            meta: ContactFixtures::meta(),
            event_status: Some("Controlled".to_string()),
            notes: None,
        }
    }

    pub fn escalation() -> EscalationForm {
        EscalationForm {
            meta: ContactFixtures::meta(),
            reason: Some("Beyond subcounty capacity".to_string()),
            date_escalated: NaiveDate::from_ymd_opt(2024, 3, 14),
        }
    }
}

/// A small but complete organizational tree
///
/// Country -> county -> subcounty, with a community unit and a health
/// facility hanging off the subcounty as leaves.
pub struct OrgTreeFixture {
    pub country: OrgUnit,
    pub county: OrgUnit,
    pub subcounty: OrgUnit,
    pub community_unit: OrgUnit,
    pub health_facility: OrgUnit,
}

impl OrgTreeFixture {
    pub fn kenya() -> Self {
        let country = OrgUnit::new("Kenya", UnitType::Country, None);
        let county = OrgUnit::new("Nakuru", UnitType::County, Some(country.id));
        let subcounty = OrgUnit::new("Naivasha", UnitType::Subcounty, Some(county.id));
        let community_unit = OrgUnit::new(
            "Karagita Community Unit",
            UnitType::CommunityUnit,
            Some(subcounty.id),
        );
        let health_facility = OrgUnit::new(
            "Naivasha District Hospital",
            UnitType::HealthFacility,
            Some(subcounty.id),
        );
        Self {
            country,
            county,
            subcounty,
            community_unit,
            health_facility,
        }
    }

    /// All units, root first
    pub fn units(&self) -> Vec<OrgUnit> {
        vec![
            self.country.clone(),
            self.county.clone(),
            self.subcounty.clone(),
            self.community_unit.clone(),
            self.health_facility.clone(),
        ]
    }

    /// Standard role assignments for the tree
    ///
    /// CHA + AHA at the community unit, an SFP at the health facility, and a
    /// CEBS plus a HEBS coordinator at the subcounty.
    pub fn default_roles(&self) -> Vec<Role> {
        vec![
            Role::new(
                Person::new("Mary Wanjiku", "+254711000001"),
                self.community_unit.id,
                Spot::Cha,
            ),
            Role::new(
                Person::new("John Mwangi", "+254711000002"),
                self.community_unit.id,
                Spot::Aha,
            ),
            Role::new(
                Person::new("Grace Akinyi", "+254711000003"),
                self.health_facility.id,
                Spot::Sfp,
            ),
            Role::new(
                Person::new("Peter Otieno", "+254711000004"),
                self.subcounty.id,
                Spot::Cebs,
            ),
            Role::new(
                Person::new("Susan Njeri", "+254711000005"),
                self.subcounty.id,
                Spot::Hebs,
            ),
        ]
    }
}
