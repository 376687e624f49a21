//! Organizational units
//!
//! Units form a strict tree: country at the root, counties and subcounties
//! below it, and leaf units (community units, facilities, schools) at the
//! bottom. Upward walks are bounded by the tree height, typically four hops
//! or fewer.

use serde::{Deserialize, Serialize};

use core_kernel::UnitId;

/// Level/kind of an organizational unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Country,
    County,
    Subcounty,
    Ward,
    CommunityUnit,
    HealthFacility,
    School,
    VetFacility,
}

impl UnitType {
    /// True for unit types that can be a case's reporting unit
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            UnitType::Ward
                | UnitType::CommunityUnit
                | UnitType::HealthFacility
                | UnitType::School
                | UnitType::VetFacility
        )
    }
}

/// A node in the organizational tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgUnit {
    pub id: UnitId,
    pub name: String,
    pub unit_type: UnitType,
    /// Single parent; None only for the root
    pub parent: Option<UnitId>,
}

impl OrgUnit {
    pub fn new(
        name: impl Into<String>,
        unit_type: UnitType,
        parent: Option<UnitId>,
    ) -> Self {
        Self {
            id: UnitId::new(),
            name: name.into(),
            unit_type,
            parent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_types() {
        assert!(UnitType::CommunityUnit.is_leaf());
        assert!(UnitType::School.is_leaf());
        assert!(!UnitType::County.is_leaf());
        assert!(!UnitType::Country.is_leaf());
    }

    #[test]
    fn test_root_has_no_parent() {
        let root = OrgUnit::new("Kenya", UnitType::Country, None);
        assert!(root.parent.is_none());

        let county = OrgUnit::new("Nakuru", UnitType::County, Some(root.id));
        assert_eq!(county.parent, Some(root.id));
    }
}
