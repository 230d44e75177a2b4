//! Scope-rule construction for zones.
//!
//! A group is encoded as a single combined rule:
//!
//! ```text
//! clusterId in ("c1","c2") and namespace in ("a","b")
//! ```
//!
//! Each list holds the distinct values of that dimension in first-seen order.

use crate::model::{ClusterNamespace, ScopeRule};

/// Target type of the rules this crate manages. Rules of any other target
/// type are left untouched.
pub const KUBERNETES_TARGET: &str = "kubernetes";

/// Distinct clusters and namespaces of one group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeDimensions {
    pub clusters: Vec<String>,
    pub namespaces: Vec<String>,
}

impl ScopeDimensions {
    pub fn from_members<'a, I>(members: I) -> Self
    where
        I: IntoIterator<Item = &'a ClusterNamespace>,
    {
        let mut dims = Self::default();
        for cn in members {
            if !dims.clusters.contains(&cn.cluster) {
                dims.clusters.push(cn.cluster.clone());
            }
            if !dims.namespaces.contains(&cn.namespace) {
                dims.namespaces.push(cn.namespace.clone());
            }
        }
        dims
    }

    /// `clusterId in (...) and namespace in (...)`
    pub fn expression(&self) -> String {
        format!(
            "clusterId in ({}) and namespace in ({})",
            quoted_list(&self.clusters),
            quoted_list(&self.namespaces)
        )
    }

    /// Plain comma-joined clusters, for reports.
    pub fn joined_clusters(&self) -> String {
        self.clusters.join(",")
    }

    /// Plain comma-joined namespaces, for reports.
    pub fn joined_namespaces(&self) -> String {
        self.namespaces.join(",")
    }
}

fn quoted_list(values: &[String]) -> String {
    format!("\"{}\"", values.join("\",\""))
}

/// The managed rule for a group's members.
pub fn kubernetes_rule<'a, I>(members: I) -> ScopeRule
where
    I: IntoIterator<Item = &'a ClusterNamespace>,
{
    ScopeRule::new(
        ScopeDimensions::from_members(members).expression(),
        KUBERNETES_TARGET,
    )
}

/// The empty rule a freshly created zone starts with.
pub fn placeholder_rule() -> ScopeRule {
    ScopeRule::new("", KUBERNETES_TARGET)
}

/// Drops every rule of `rule.target_type` from `existing` and appends `rule`.
pub fn replace_rules(existing: &[ScopeRule], rule: ScopeRule) -> Vec<ScopeRule> {
    let mut rules: Vec<ScopeRule> = existing
        .iter()
        .filter(|r| r.target_type != rule.target_type)
        .cloned()
        .collect();
    rules.push(rule);
    rules
}
