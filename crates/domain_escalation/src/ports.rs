//! Ports to the org registry and role store
//!
//! Both are read-only collaborators: the hierarchy is synchronized from an
//! external registry and roles are managed by the surrounding service layer.

use async_trait::async_trait;

use core_kernel::{DomainPort, PortError, UnitId};

use crate::org::OrgUnit;
use crate::role::{Role, Spot};

/// Read access to the organizational tree
#[async_trait]
pub trait OrgHierarchy: DomainPort {
    /// Fetches a unit by id
    async fn unit(&self, id: UnitId) -> Result<OrgUnit, PortError>;

    /// Fetches a unit's parent, None for the root
    async fn parent_of(&self, id: UnitId) -> Result<Option<OrgUnit>, PortError>;

    /// Fetches a unit's direct children
    async fn children_of(&self, id: UnitId) -> Result<Vec<OrgUnit>, PortError>;
}

/// Query for active role-holders at a unit
#[derive(Debug, Clone)]
pub struct RoleQuery {
    pub unit: UnitId,
    pub spot_in: Vec<Spot>,
}

impl RoleQuery {
    pub fn new(unit: UnitId, spot_in: impl Into<Vec<Spot>>) -> Self {
        Self {
            unit,
            spot_in: spot_in.into(),
        }
    }
}

/// Read access to role assignments
#[async_trait]
pub trait RoleLookup: DomainPort {
    /// Finds active role-holders matching the query
    ///
    /// Returns at most `limit` matches (all matches when None) in a stable
    /// order.
    async fn find_active_roles(
        &self,
        query: RoleQuery,
        limit: Option<usize>,
    ) -> Result<Vec<Role>, PortError>;
}
