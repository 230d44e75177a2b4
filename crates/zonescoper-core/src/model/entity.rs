use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Response body of the metadata service's entity listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub entities: Vec<Entity>,
}

/// One observed Kubernetes namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Entity {
    #[serde(deserialize_with = "null_as_default")]
    pub uid: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub entity_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub customer_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp_ns: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub labels: HashMap<String, String>,
}

impl Entity {
    /// Value of `key`, or `""` when the label is absent.
    pub fn label(&self, key: &str) -> &str {
        self.labels.get(key).map_or("", String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterNamespace {
    pub cluster: String,
    pub namespace: String,
}

impl ClusterNamespace {
    pub fn new(cluster: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            namespace: namespace.into(),
        }
    }
}
