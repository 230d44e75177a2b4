//! Remote operations against the security platform.
//!
//! [`SecurePlatform`] is the seam the reconcilers depend on. [`HttpPlatform`]
//! implements it over the request layer; every method builds a fresh
//! [`RequestConfig`] from the platform's base config.

use async_trait::async_trait;
use reqwest::Method;

use crate::Result;
use crate::http::{self, RequestConfig};
use crate::model::{CreateZone, Entity, EntityPage, Team, TeamPage, UpdateZone, Zone, ZonePage};

pub const ENTITIES_PATH: &str = "/api/mds/getEntities";
pub const ZONES_PATH: &str = "/platform/v1/zones";
pub const TEAMS_PATH: &str = "/platform/v1/teams";

const NAMESPACE_ENTITY_TYPE: &str = "k8s_namespace";

#[async_trait]
pub trait SecurePlatform: Send + Sync {
    /// All namespace entities known to the metadata service.
    async fn fetch_entities(&self) -> Result<Vec<Entity>>;

    /// All zones currently defined.
    async fn fetch_zones(&self) -> Result<Vec<Zone>>;

    async fn create_zone(&self, zone: &CreateZone) -> Result<Zone>;

    async fn update_zone(&self, zone: &UpdateZone) -> Result<Zone>;

    /// The team named exactly `name`, if any.
    async fn find_team(&self, name: &str) -> Result<Option<Team>>;

    async fn create_team(&self, team: &Team) -> Result<Team>;

    async fn update_team(&self, id: i64, team: &Team) -> Result<Team>;
}

/// [`SecurePlatform`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPlatform {
    base: RequestConfig,
}

impl HttpPlatform {
    /// `base` supplies endpoint, token, TLS and retry settings for every call.
    pub fn new(base: RequestConfig) -> Self {
        Self { base }
    }

    pub fn endpoint(&self) -> &str {
        &self.base.endpoint
    }

    fn request(&self, method: Method, path: impl Into<String>) -> RequestConfig {
        self.base.clone().with_method(method).with_path(path)
    }
}

#[async_trait]
impl SecurePlatform for HttpPlatform {
    async fn fetch_entities(&self) -> Result<Vec<Entity>> {
        let config = self
            .request(Method::GET, ENTITIES_PATH)
            .with_param("type", NAMESPACE_ENTITY_TYPE);
        let page: EntityPage = http::execute_json(&config).await?;
        tracing::debug!(count = page.entities.len(), "Retrieved namespace entities");
        Ok(page.entities)
    }

    async fn fetch_zones(&self) -> Result<Vec<Zone>> {
        let config = self.request(Method::GET, ZONES_PATH);
        let page: ZonePage = http::execute_json(&config).await?;
        tracing::debug!(count = page.data.len(), "Retrieved zones");
        Ok(page.data)
    }

    async fn create_zone(&self, zone: &CreateZone) -> Result<Zone> {
        let config = self.request(Method::POST, ZONES_PATH).with_json(zone)?;
        Ok(http::execute_json(&config).await?)
    }

    async fn update_zone(&self, zone: &UpdateZone) -> Result<Zone> {
        let config = self
            .request(Method::PUT, format!("{ZONES_PATH}/{}", zone.id))
            .with_json(zone)?;
        Ok(http::execute_json(&config).await?)
    }

    async fn find_team(&self, name: &str) -> Result<Option<Team>> {
        let config = self
            .request(Method::GET, TEAMS_PATH)
            .with_param("filter", format!("name:{name}"));
        let page: TeamPage = http::execute_json(&config).await?;
        Ok(page.into_exact(name))
    }

    async fn create_team(&self, team: &Team) -> Result<Team> {
        let config = self
            .request(Method::POST, TEAMS_PATH)
            .with_header("Content-Type", "application/json")
            .with_json(team)?;
        Ok(http::execute_json(&config).await?)
    }

    async fn update_team(&self, id: i64, team: &Team) -> Result<Team> {
        let config = self
            .request(Method::PUT, format!("{TEAMS_PATH}/{id}"))
            .with_header("Content-Type", "application/json")
            .with_json(team)?;
        Ok(http::execute_json(&config).await?)
    }
}
