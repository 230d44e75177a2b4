//! Grouping of namespace entities by a label value.

use std::collections::BTreeMap;

use indexmap::IndexSet;

use crate::model::{ClusterNamespace, Entity};

pub const DEFAULT_CLUSTER_LABEL: &str = "kubernetes.cluster.name";
pub const DEFAULT_NAMESPACE_LABEL: &str = "kubernetes.namespace.name";

/// Which labels carry the group key, the cluster and the namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingLabels {
    pub group: String,
    pub cluster: String,
    pub namespace: String,
}

impl GroupingLabels {
    /// Groups by `group`, reading cluster and namespace from the standard
    /// Kubernetes labels.
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            cluster: DEFAULT_CLUSTER_LABEL.to_string(),
            namespace: DEFAULT_NAMESPACE_LABEL.to_string(),
        }
    }

    #[must_use]
    pub fn with_cluster_label(mut self, label: impl Into<String>) -> Self {
        self.cluster = label.into();
        self
    }

    #[must_use]
    pub fn with_namespace_label(mut self, label: impl Into<String>) -> Self {
        self.namespace = label.into();
        self
    }
}

/// Group key → distinct (cluster, namespace) pairs observed for it.
///
/// Keys iterate in sorted order; members keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grouping {
    groups: BTreeMap<String, IndexSet<ClusterNamespace>>,
}

impl Grouping {
    /// Builds the grouping from `entities`.
    ///
    /// Entities with an empty group key are ignored silently; entities with
    /// a key but no cluster or namespace are ignored with a diagnostic.
    pub fn from_entities<'a, I>(entities: I, labels: &GroupingLabels) -> Self
    where
        I: IntoIterator<Item = &'a Entity>,
    {
        let mut groups: BTreeMap<String, IndexSet<ClusterNamespace>> = BTreeMap::new();

        for entity in entities {
            let key = entity.label(&labels.group);
            if key.is_empty() {
                continue;
            }

            let cluster = entity.label(&labels.cluster);
            let namespace = entity.label(&labels.namespace);
            if cluster.is_empty() || namespace.is_empty() {
                tracing::info!(
                    entity = %entity.name,
                    cluster,
                    namespace,
                    "Missing cluster or namespace, skipping"
                );
                continue;
            }

            let members = groups.entry(key.to_string()).or_default();
            if members.insert(ClusterNamespace::new(cluster, namespace)) {
                tracing::debug!(group = key, cluster, namespace, "Added cluster/namespace to group");
            }
        }

        Self { groups }
    }

    pub fn get(&self, key: &str) -> Option<&IndexSet<ClusterNamespace>> {
        self.groups.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSet<ClusterNamespace>)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
