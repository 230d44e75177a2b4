//! In-memory [`SecurePlatform`] for reconciler tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::Result;
use crate::http::{RawResponse, RequestError};
use crate::model::{CreateZone, Entity, Team, UpdateZone, Zone};
use crate::platform::SecurePlatform;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    CreateZone(CreateZone),
    UpdateZone(UpdateZone),
    FindTeam(String),
    CreateTeam(Team),
    UpdateTeam(i64, Team),
}

#[derive(Default)]
struct State {
    zones: BTreeMap<String, Zone>,
    teams: Vec<Team>,
    next_id: i64,
    calls: Vec<Call>,
    reject: HashSet<String>,
}

#[derive(Default)]
pub(crate) struct FakePlatform {
    state: Mutex<State>,
}

impl FakePlatform {
    pub fn new() -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().next_id = 100;
        fake
    }

    pub fn with_zone(self, id: i64, name: &str, scopes: Vec<crate::model::ScopeRule>) -> Self {
        self.state.lock().unwrap().zones.insert(
            name.to_string(),
            Zone {
                id: Some(id),
                name: name.to_string(),
                scopes,
                ..Default::default()
            },
        );
        self
    }

    pub fn with_team(self, id: i64, name: &str) -> Self {
        self.state.lock().unwrap().teams.push(Team {
            id: Some(id),
            name: name.to_string(),
            ..Default::default()
        });
        self
    }

    /// Any write to a resource with this name answers `400`.
    pub fn rejecting(self, name: &str) -> Self {
        self.state.lock().unwrap().reject.insert(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn zones(&self) -> Vec<Zone> {
        self.state.lock().unwrap().zones.values().cloned().collect()
    }

    fn rejection() -> crate::Error {
        RequestError::RemoteRejection {
            response: RawResponse {
                status: StatusCode::BAD_REQUEST,
                body: "rejected".to_string(),
            },
        }
        .into()
    }
}

#[async_trait]
impl SecurePlatform for FakePlatform {
    async fn fetch_entities(&self) -> Result<Vec<Entity>> {
        Ok(Vec::new())
    }

    async fn fetch_zones(&self) -> Result<Vec<Zone>> {
        Ok(self.zones())
    }

    async fn create_zone(&self, zone: &CreateZone) -> Result<Zone> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateZone(zone.clone()));
        state.next_id += 1;
        let created = Zone {
            id: Some(state.next_id),
            name: zone.name.clone(),
            description: zone.description.clone(),
            scopes: zone.scopes.clone(),
            ..Default::default()
        };
        state.zones.insert(zone.name.clone(), created.clone());
        Ok(created)
    }

    async fn update_zone(&self, zone: &UpdateZone) -> Result<Zone> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::UpdateZone(zone.clone()));
        if state.reject.contains(&zone.name) {
            return Err(Self::rejection());
        }
        let updated = Zone {
            id: Some(zone.id),
            name: zone.name.clone(),
            description: zone.description.clone(),
            scopes: zone.scopes.clone(),
            ..Default::default()
        };
        state.zones.insert(zone.name.clone(), updated.clone());
        Ok(updated)
    }

    async fn find_team(&self, name: &str) -> Result<Option<Team>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::FindTeam(name.to_string()));
        Ok(state.teams.iter().find(|t| t.name == name).cloned())
    }

    async fn create_team(&self, team: &Team) -> Result<Team> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateTeam(team.clone()));
        if state.reject.contains(&team.name) {
            return Err(Self::rejection());
        }
        state.next_id += 1;
        let created = Team {
            id: Some(state.next_id),
            ..team.clone()
        };
        state.teams.push(created.clone());
        Ok(created)
    }

    async fn update_team(&self, id: i64, team: &Team) -> Result<Team> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::UpdateTeam(id, team.clone()));
        if state.reject.contains(&team.name) {
            return Err(Self::rejection());
        }
        Ok(team.clone())
    }
}
