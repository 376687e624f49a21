//! In-memory Port Adapters
//!
//! Implements every domain port against plain in-memory state so the
//! workflow can be exercised end to end without external collaborators.
//! Gateways record what they were asked to send and can be flipped into a
//! failing mode for channel-isolation tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use core_kernel::{CaseId, DomainPort, PortError, UnitId};
use domain_escalation::{OrgHierarchy, OrgUnit, Role, RoleLookup, RoleQuery};
use domain_notify::{SmsGateway, WhatsappGateway};
use domain_signal::{Case, StagePatch};
use infra_scheduler::CaseStore;

/// In-memory case store
#[derive(Default)]
pub struct InMemoryCaseStore {
    cases: Mutex<HashMap<CaseId, Case>>,
}

impl InMemoryCaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, case: Case) {
        self.cases.lock().unwrap().insert(case.id, case);
    }

    pub fn remove(&self, id: CaseId) -> Option<Case> {
        self.cases.lock().unwrap().remove(&id)
    }
}

impl DomainPort for InMemoryCaseStore {}

#[async_trait]
impl CaseStore for InMemoryCaseStore {
    async fn find_by_id(&self, id: CaseId) -> Result<Case, PortError> {
        self.cases
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Case", id))
    }

    async fn find_by_case_number(&self, case_number: &str) -> Result<Case, PortError> {
        self.cases
            .lock()
            .unwrap()
            .values()
            .find(|c| c.case_number == case_number)
            .cloned()
            .ok_or_else(|| PortError::not_found("Case", case_number))
    }

    async fn update(&self, id: CaseId, patch: StagePatch) -> Result<Case, PortError> {
        let mut cases = self.cases.lock().unwrap();
        let case = cases
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("Case", id))?;
        case.apply_stage_patch(patch)
            .map_err(|e| PortError::validation(e.to_string()))?;
        Ok(case.clone())
    }
}

/// In-memory organizational tree
#[derive(Default)]
pub struct InMemoryOrgHierarchy {
    units: HashMap<UnitId, OrgUnit>,
}

impl InMemoryOrgHierarchy {
    pub fn with_units(units: Vec<OrgUnit>) -> Self {
        Self {
            units: units.into_iter().map(|u| (u.id, u)).collect(),
        }
    }
}

impl DomainPort for InMemoryOrgHierarchy {}

#[async_trait]
impl OrgHierarchy for InMemoryOrgHierarchy {
    async fn unit(&self, id: UnitId) -> Result<OrgUnit, PortError> {
        self.units
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("OrgUnit", id))
    }

    async fn parent_of(&self, id: UnitId) -> Result<Option<OrgUnit>, PortError> {
        let unit = self.unit(id).await?;
        match unit.parent {
            Some(parent_id) => Ok(Some(self.unit(parent_id).await?)),
            None => Ok(None),
        }
    }

    async fn children_of(&self, id: UnitId) -> Result<Vec<OrgUnit>, PortError> {
        Ok(self
            .units
            .values()
            .filter(|u| u.parent == Some(id))
            .cloned()
            .collect())
    }
}

/// In-memory role registry
///
/// Matches are returned in insertion order, so tests control which role wins
/// a limit-1 query.
#[derive(Default)]
pub struct InMemoryRoleLookup {
    roles: Mutex<Vec<Role>>,
}

impl InMemoryRoleLookup {
    pub fn with_roles(roles: Vec<Role>) -> Self {
        Self {
            roles: Mutex::new(roles),
        }
    }

    pub fn add(&self, role: Role) {
        self.roles.lock().unwrap().push(role);
    }
}

impl DomainPort for InMemoryRoleLookup {}

#[async_trait]
impl RoleLookup for InMemoryRoleLookup {
    async fn find_active_roles(
        &self,
        query: RoleQuery,
        limit: Option<usize>,
    ) -> Result<Vec<Role>, PortError> {
        let mut matches: Vec<Role> = self
            .roles
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.unit == query.unit && r.is_active() && query.spot_in.contains(&r.spot))
            .cloned()
            .collect();
        if let Some(limit) = limit {
            matches.truncate(limit);
        }
        Ok(matches)
    }
}

/// A gateway that records every send and can be made to fail
///
/// Implements both transport traits; tests construct one instance per
/// channel.
#[derive(Default)]
pub struct RecordingGateway {
    sent: Mutex<Vec<(Vec<String>, String)>>,
    failing: AtomicBool,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent send fail with a connection error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Everything sent so far, as (recipients, message) pairs
    pub fn sent(&self) -> Vec<(Vec<String>, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    fn record(&self, to: &[String], message: &str) -> Result<(), PortError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PortError::connection("gateway down"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_vec(), message.to_string()));
        Ok(())
    }
}

impl DomainPort for RecordingGateway {}

#[async_trait]
impl SmsGateway for RecordingGateway {
    async fn send(&self, to: &[String], message: &str) -> Result<(), PortError> {
        self.record(to, message)
    }
}

#[async_trait]
impl WhatsappGateway for RecordingGateway {
    async fn send(&self, to: &[String], message: &str) -> Result<(), PortError> {
        self.record(to, message)
    }
}
