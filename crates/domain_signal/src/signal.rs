//! Signal codes and reporting families
//!
//! Every reportable event carries a short signal code. Each code belongs to
//! exactly one reporting family, and the family determines the stage sequence
//! the case walks through. Membership is a static table; a signal never
//! changes family.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SignalError;

/// Community event-based surveillance signal codes
const CEBS_SIGNALS: &[&str] = &["1", "2", "3", "4", "5", "6"];
/// Health-facility event-based surveillance signal codes
const HEBS_SIGNALS: &[&str] = &["H1", "H2", "H3"];
/// Veterinary event-based surveillance signal codes
const VEBS_SIGNALS: &[&str] = &["V1", "V2", "V3", "V4", "V5"];
/// Learning-institution event-based surveillance signal codes
const LEBS_SIGNALS: &[&str] = &["L1", "L2", "L3", "L4", "L5", "L6"];

/// A reporting family (pipeline) for surveillance signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Family {
    /// Community event-based surveillance
    Cebs,
    /// Health-facility event-based surveillance
    Hebs,
    /// Veterinary event-based surveillance
    Vebs,
    /// Learning-institution event-based surveillance
    Lebs,
}

impl Family {
    /// Resolves the family a signal code belongs to
    pub fn of_signal(code: &str) -> Option<Family> {
        if CEBS_SIGNALS.contains(&code) {
            Some(Family::Cebs)
        } else if HEBS_SIGNALS.contains(&code) {
            Some(Family::Hebs)
        } else if VEBS_SIGNALS.contains(&code) {
            Some(Family::Vebs)
        } else if LEBS_SIGNALS.contains(&code) {
            Some(Family::Lebs)
        } else {
            None
        }
    }

    /// Returns the signal codes belonging to this family
    pub fn signals(&self) -> &'static [&'static str] {
        match self {
            Family::Cebs => CEBS_SIGNALS,
            Family::Hebs => HEBS_SIGNALS,
            Family::Vebs => VEBS_SIGNALS,
            Family::Lebs => LEBS_SIGNALS,
        }
    }

    /// Returns the family code used in messages and role spots
    pub fn code(&self) -> &'static str {
        match self {
            Family::Cebs => "CEBS",
            Family::Hebs => "HEBS",
            Family::Vebs => "VEBS",
            Family::Lebs => "LEBS",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A validated signal code
///
/// Construction fails for codes outside the static membership tables, so a
/// `SignalCode` always maps to exactly one family. Deserialization routes
/// through the same validation, so a stored case can never carry an unknown
/// code either.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct SignalCode(String);

impl TryFrom<String> for SignalCode {
    type Error = SignalError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(&raw)
    }
}

impl SignalCode {
    /// Parses and validates a signal code
    ///
    /// Codes are normalized to uppercase with surrounding whitespace removed.
    pub fn new(raw: &str) -> Result<Self, SignalError> {
        let code = raw.trim().to_ascii_uppercase();
        if Family::of_signal(&code).is_none() {
            return Err(SignalError::UnknownSignal(raw.to_string()));
        }
        Ok(Self(code))
    }

    /// Returns the family this signal belongs to
    pub fn family(&self) -> Family {
        // Membership was verified at construction and deserialization
        Family::of_signal(&self.0).unwrap_or(Family::Cebs)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SignalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
