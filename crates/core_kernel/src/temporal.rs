//! Temporal helpers
//!
//! This module provides:
//! - A `Timezone` wrapper for rendering case timestamps in the local zone of
//!   the reporting jurisdiction
//! - A `TimeUnit` for the configurable reminder intervals (the operators tune
//!   these in minutes during drills and in hours or days in production)

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// Timezone wrapper for reporting jurisdictions
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Tz::from_str(&s)
            .map(Timezone)
            .map_err(|_| serde::de::Error::custom(format!("Invalid timezone: {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Converts a UTC datetime to the local timezone
    pub fn to_local(&self, utc: DateTime<Utc>) -> DateTime<Tz> {
        utc.with_timezone(&self.0)
    }

    /// Renders a UTC timestamp as a human-readable local string
    ///
    /// Used when interpolating the case creation time into notification
    /// messages.
    pub fn format_local(&self, utc: DateTime<Utc>) -> String {
        self.to_local(utc).format("%d/%m/%Y %H:%M").to_string()
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}

impl FromStr for Timezone {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tz::from_str(s)
            .map(Timezone)
            .map_err(|_| TemporalError::InvalidTimezone(s.to_string()))
    }
}

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid time unit: {0}")]
    InvalidTimeUnit(String),
}

/// Unit for configurable workflow intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Returns the duration of `count` of this unit
    pub fn duration_of(&self, count: i64) -> Duration {
        match self {
            TimeUnit::Minutes => Duration::minutes(count),
            TimeUnit::Hours => Duration::hours(count),
            TimeUnit::Days => Duration::days(count),
        }
    }
}

impl FromStr for TimeUnit {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minutes" | "minute" | "min" => Ok(TimeUnit::Minutes),
            "hours" | "hour" | "h" => Ok(TimeUnit::Hours),
            "days" | "day" | "d" => Ok(TimeUnit::Days),
            other => Err(TemporalError::InvalidTimeUnit(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_time_unit_durations() {
        assert_eq!(TimeUnit::Minutes.duration_of(30), Duration::minutes(30));
        assert_eq!(TimeUnit::Hours.duration_of(24), Duration::days(1));
        assert_eq!(TimeUnit::Days.duration_of(2), Duration::hours(48));
    }

    #[test]
    fn test_time_unit_parsing() {
        assert_eq!("hours".parse::<TimeUnit>().unwrap(), TimeUnit::Hours);
        assert_eq!("MIN".parse::<TimeUnit>().unwrap(), TimeUnit::Minutes);
        assert!("weeks".parse::<TimeUnit>().is_err());
    }

    #[test]
    fn test_timezone_format_local() {
        let tz = Timezone::new(chrono_tz::Africa::Nairobi);
        let utc = Utc.with_ymd_and_hms(2024, 3, 10, 9, 30, 0).unwrap();
        // Nairobi is UTC+3
        assert_eq!(tz.format_local(utc), "10/03/2024 12:30");
    }

    #[test]
    fn test_timezone_serde_round_trip() {
        let tz = Timezone::new(chrono_tz::Africa::Nairobi);
        let json = serde_json::to_string(&tz).unwrap();
        assert_eq!(json, "\"Africa/Nairobi\"");
        let back: Timezone = serde_json::from_str(&json).unwrap();
        assert_eq!(tz, back);
    }
}
