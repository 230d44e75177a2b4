use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Response body of `GET /platform/v1/zones`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZonePage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Zone>,
    #[serde(default)]
    pub page: Option<PageInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub total: Option<i64>,
}

/// A scope-based access boundary on the platform.
///
/// `keep` is a per-run marker and is never sent to or read from the platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Zone {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_system: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub scopes: Vec<ScopeRule>,
    #[serde(skip)]
    pub(crate) keep: bool,
}

impl Zone {
    pub fn is_kept(&self) -> bool {
        self.keep
    }

    /// Marks the zone as retained for this run. There is no way back.
    pub fn mark_kept(&mut self) {
        self.keep = true;
    }
}

/// A boolean membership expression scoped to one target type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeRule {
    #[serde(default, deserialize_with = "null_as_default")]
    pub rules: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub target_type: String,
}

impl ScopeRule {
    pub fn new(rules: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self {
            rules: rules.into(),
            target_type: target_type.into(),
        }
    }
}

/// Body of `POST /platform/v1/zones`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateZone {
    pub name: String,
    pub description: String,
    pub scopes: Vec<ScopeRule>,
}

/// Body of `PUT /platform/v1/zones/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateZone {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub scopes: Vec<ScopeRule>,
}

/// The run's in-memory view of the platform's zones, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ZoneTable {
    zones: BTreeMap<String, Zone>,
}

impl ZoneTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Zone> {
        self.zones.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.zones.contains_key(name)
    }

    pub fn zone_id(&self, name: &str) -> Option<i64> {
        self.zones.get(name).and_then(|z| z.id)
    }

    /// Inserts or replaces the zone stored under `name`.
    ///
    /// A zone already marked kept stays kept after replacement.
    pub fn insert(&mut self, name: impl Into<String>, mut zone: Zone) {
        let name = name.into();
        if self.zones.get(&name).is_some_and(Zone::is_kept) {
            zone.mark_kept();
        }
        self.zones.insert(name, zone);
    }

    /// Marks `name` as kept. Returns `false` if no such zone exists.
    pub fn mark_kept(&mut self, name: &str) -> bool {
        match self.zones.get_mut(name) {
            Some(zone) => {
                zone.mark_kept();
                true
            }
            None => false,
        }
    }

    /// Zones nobody marked as kept, in name order.
    pub fn prune_candidates(&self) -> Vec<&Zone> {
        self.zones.values().filter(|z| !z.is_kept()).collect()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

impl FromIterator<Zone> for ZoneTable {
    fn from_iter<I: IntoIterator<Item = Zone>>(iter: I) -> Self {
        let mut table = Self::new();
        for zone in iter {
            table.insert(zone.name.clone(), zone);
        }
        table
    }
}
