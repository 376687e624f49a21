//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible
//! defaults. These builders allow tests to specify only the relevant fields
//! while using defaults for everything else.

use chrono::{DateTime, Utc};

use core_kernel::UnitId;
use domain_signal::{Case, CaseState, CaseVersion, Channel, Contact, StagePatch};

use crate::fixtures::ContactFixtures;

/// Builder for constructing test cases
pub struct CaseBuilder {
    signal: String,
    version: CaseVersion,
    reporting_unit: UnitId,
    reporter: Contact,
    via: Channel,
    state: CaseState,
    created_at: Option<DateTime<Utc>>,
    patches: Vec<StagePatch>,
}

impl Default for CaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CaseBuilder {
    /// Creates a new builder with default values (live CEBS v1 case)
    pub fn new() -> Self {
        Self {
            signal: "1".to_string(),
            version: CaseVersion::V1,
            reporting_unit: UnitId::new(),
            reporter: ContactFixtures::reporter(),
            via: Channel::Sms,
            state: CaseState::Live,
            created_at: None,
            patches: Vec::new(),
        }
    }

    /// Sets the signal code
    pub fn with_signal(mut self, signal: impl Into<String>) -> Self {
        self.signal = signal.into();
        self
    }

    /// Sets the workflow version
    pub fn with_version(mut self, version: CaseVersion) -> Self {
        self.version = version;
        self
    }

    /// Sets the reporting unit
    pub fn with_reporting_unit(mut self, unit: UnitId) -> Self {
        self.reporting_unit = unit;
        self
    }

    /// Sets the reporter
    pub fn with_reporter(mut self, reporter: Contact) -> Self {
        self.reporter = reporter;
        self
    }

    /// Sets the reporting channel
    pub fn with_channel(mut self, via: Channel) -> Self {
        self.via = via;
        self
    }

    /// Marks the case as a test signal
    pub fn as_test(mut self) -> Self {
        self.state = CaseState::Test;
        self
    }

    /// Backdates the creation timestamp
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Queues a stage form to be applied in order after construction
    pub fn with_patch(mut self, patch: StagePatch) -> Self {
        self.patches.push(patch);
        self
    }

    /// Builds the case, panicking on invalid test data
    pub fn build(self) -> Case {
        let mut case = Case::new(
            &self.signal,
            self.version,
            self.reporting_unit,
            self.reporter,
            self.via,
            self.state,
        )
        .expect("valid test signal");

        if let Some(at) = self.created_at {
            case.created_at = at;
            case.updated_at = at;
        }
        for patch in self.patches {
            case.apply_stage_patch(patch).expect("valid test patch");
        }
        case
    }
}
