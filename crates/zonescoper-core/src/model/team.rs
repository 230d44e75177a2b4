use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::null_as_default;

/// Team name → zone names, in mapping-file order.
pub type TeamZoneMapping = IndexMap<String, Vec<String>>;

/// Response body of `GET /platform/v1/teams`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Team>,
    #[serde(default)]
    pub page: Option<Value>,
}

impl TeamPage {
    /// The team whose name is exactly `name`.
    ///
    /// The platform's name filter is a prefix/substring match, so the
    /// listing can include other teams.
    pub fn into_exact(self, name: &str) -> Option<Team> {
        self.data.into_iter().find(|t| t.name == name)
    }
}

/// A role/zone binding on the platform.
///
/// Fields this crate does not model are kept in `extra` so a template team
/// can be cloned without losing anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub zone_ids: Vec<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scopes: Vec<TeamScope>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_all_zones: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_default_team: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_team_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_team_role_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_settings: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub additional_team_permissions: AdditionalPermissions,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Team {
    /// Clones this team as the payload for a new team.
    ///
    /// Identity (`id`, `version`) is cleared and the clone is never the
    /// default team. Everything else (role, permissions, UI settings,
    /// scopes) is inherited.
    pub fn instantiate(&self, name: &str, description: &str, zone_ids: Vec<i64>) -> Team {
        Team {
            id: None,
            version: None,
            name: name.to_string(),
            description: description.to_string(),
            zone_ids,
            is_default_team: false,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScope {
    #[serde(default, deserialize_with = "null_as_default")]
    pub expression: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub scope_type: String,
}

impl TeamScope {
    pub fn new(expression: impl Into<String>, scope_type: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            scope_type: scope_type.into(),
        }
    }

    /// `container` / `HOST_CONTAINER`: all hosts and containers.
    pub fn host_container() -> Self {
        Self::new("container", "HOST_CONTAINER")
    }

    /// Agent scope asserting `label = "value"`.
    pub fn agent_label(label: &str, value: &str) -> Self {
        Self::new(format!("{label} = \"{value}\""), "AGENT")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdditionalPermissions {
    pub has_agent_cli: bool,
    pub has_aws_data: bool,
    pub has_beacon_metrics: bool,
    pub has_infrastructure_events: bool,
    pub has_rapid_response: bool,
    pub has_sysdig_captures: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
