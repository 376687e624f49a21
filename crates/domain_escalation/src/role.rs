//! Roles and spots
//!
//! A role is a (person, unit, spot) triple. The spot names the person's
//! function at that unit; which spots act at which workflow stage is a
//! static per-family table.

use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{PersonId, RoleId, UnitId};
use domain_signal::Family;

/// Role label denoting a person's function at an organizational unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Spot {
    /// Community health assistant (CEBS verifier)
    Cha,
    /// Animal health assistant (CEBS verifier alongside the CHA)
    Aha,
    /// Surveillance focal person at a health facility (HEBS verifier)
    Sfp,
    /// CEBS coordinator
    Cebs,
    /// HEBS coordinator
    Hebs,
    /// VEBS coordinator and unit-level verifier
    Vebs,
    /// LEBS coordinator and unit-level verifier
    Lebs,
    /// Cross-family event-based surveillance coordinator
    Ebs,
}

impl Spot {
    pub fn code(&self) -> &'static str {
        match self {
            Spot::Cha => "CHA",
            Spot::Aha => "AHA",
            Spot::Sfp => "SFP",
            Spot::Cebs => "CEBS",
            Spot::Hebs => "HEBS",
            Spot::Vebs => "VEBS",
            Spot::Lebs => "LEBS",
            Spot::Ebs => "EBS",
        }
    }

    /// Spots that verify a fresh signal at the reporting unit itself
    pub fn verifier_spots(family: Family) -> &'static [Spot] {
        match family {
            Family::Cebs => &[Spot::Cha, Spot::Aha],
            Family::Hebs => &[Spot::Sfp],
            Family::Vebs => &[Spot::Vebs],
            Family::Lebs => &[Spot::Lebs],
        }
    }

    /// The family coordinator spot at the parent unit
    pub fn coordinator_spot(family: Family) -> Spot {
        match family {
            Family::Cebs => Spot::Cebs,
            Family::Hebs => Spot::Hebs,
            Family::Vebs => Spot::Vebs,
            Family::Lebs => Spot::Lebs,
        }
    }

    /// Coordinator spot set broadened with the cross-family EBS spot
    pub fn coordinator_fallback(family: Family) -> [Spot; 2] {
        [Spot::coordinator_spot(family), Spot::Ebs]
    }
}

impl fmt::Display for Spot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Whether a role-holder may currently act
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleStatus {
    Active,
    Blocked,
}

/// A reachable person holding one or more roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub phone: String,
}

impl Person {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: PersonId::new(),
            name: name.into(),
            phone: phone.into(),
        }
    }
}

/// A (person, unit, spot) assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub person: Person,
    pub unit: UnitId,
    pub spot: Spot,
    pub status: RoleStatus,
}

impl Role {
    pub fn new(person: Person, unit: UnitId, spot: Spot) -> Self {
        Self {
            id: RoleId::new(),
            person,
            unit,
            spot,
            status: RoleStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == RoleStatus::Active
    }
}
