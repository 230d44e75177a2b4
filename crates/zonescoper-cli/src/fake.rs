//! Recording [`SecurePlatform`] for command tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use zonescoper_core::grouping::{DEFAULT_CLUSTER_LABEL, DEFAULT_NAMESPACE_LABEL};
use zonescoper_core::model::{CreateZone, UpdateZone};
use zonescoper_core::{Entity, Result, SecurePlatform, Team, Zone};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateZone(String),
    UpdateZone(String),
    FindTeam(String),
    CreateTeam(String),
    UpdateTeam(String),
}

impl Call {
    pub fn is_write(&self) -> bool {
        !matches!(self, Self::FindTeam(_))
    }
}

#[derive(Default)]
pub struct RecordingPlatform {
    entities: Vec<Entity>,
    teams: Vec<Team>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingPlatform {
    /// One namespace labelled `product=<product>`.
    pub fn with_namespace(mut self, product: &str, cluster: &str, namespace: &str) -> Self {
        let labels = HashMap::from([
            ("product".to_string(), product.to_string()),
            (DEFAULT_CLUSTER_LABEL.to_string(), cluster.to_string()),
            (DEFAULT_NAMESPACE_LABEL.to_string(), namespace.to_string()),
        ]);
        self.entities.push(Entity {
            uid: format!("{cluster}/{namespace}"),
            entity_type: "k8s_namespace".into(),
            name: namespace.into(),
            labels,
            ..Default::default()
        });
        self
    }

    pub fn with_team(mut self, id: i64, name: &str) -> Self {
        self.teams.push(Team {
            id: Some(id),
            name: name.into(),
            ..Default::default()
        });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SecurePlatform for RecordingPlatform {
    async fn fetch_entities(&self) -> Result<Vec<Entity>> {
        Ok(self.entities.clone())
    }

    async fn fetch_zones(&self) -> Result<Vec<Zone>> {
        Ok(Vec::new())
    }

    async fn create_zone(&self, zone: &CreateZone) -> Result<Zone> {
        self.record(Call::CreateZone(zone.name.clone()));
        let mut created = Zone::default();
        created.id = Some(1);
        created.name = zone.name.clone();
        created.scopes = zone.scopes.clone();
        Ok(created)
    }

    async fn update_zone(&self, zone: &UpdateZone) -> Result<Zone> {
        self.record(Call::UpdateZone(zone.name.clone()));
        let mut created = Zone::default();
        created.id = Some(zone.id);
        created.name = zone.name.clone();
        created.scopes = zone.scopes.clone();
        Ok(created)
    }

    async fn find_team(&self, name: &str) -> Result<Option<Team>> {
        self.record(Call::FindTeam(name.into()));
        Ok(self.teams.iter().find(|t| t.name == name).cloned())
    }

    async fn create_team(&self, team: &Team) -> Result<Team> {
        self.record(Call::CreateTeam(team.name.clone()));
        Ok(Team {
            id: Some(2),
            ..team.clone()
        })
    }

    async fn update_team(&self, _id: i64, team: &Team) -> Result<Team> {
        self.record(Call::UpdateTeam(team.name.clone()));
        Ok(team.clone())
    }
}
