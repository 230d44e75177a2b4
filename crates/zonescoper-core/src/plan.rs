//! Dry-run plan: what the zone reconciler would do, before it does it.

use std::fmt;

use crate::grouping::Grouping;
use crate::model::ZoneTable;
use crate::scope::ScopeDimensions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedAction {
    Create,
    Update,
}

impl fmt::Display for PlannedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("Create"),
            Self::Update => f.write_str("Update"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedZone {
    pub action: PlannedAction,
    pub zone_name: String,
    /// Comma-joined distinct clusters.
    pub clusters: String,
    /// Comma-joined distinct namespaces.
    pub namespaces: String,
}

/// One entry per group key, in key order.
pub fn plan_zones(grouping: &Grouping, zones: &ZoneTable) -> Vec<PlannedZone> {
    grouping
        .iter()
        .map(|(key, members)| {
            let dims = ScopeDimensions::from_members(members);
            PlannedZone {
                action: if zones.contains(key) {
                    PlannedAction::Update
                } else {
                    PlannedAction::Create
                },
                zone_name: key.to_string(),
                clusters: dims.joined_clusters(),
                namespaces: dims.joined_namespaces(),
            }
        })
        .collect()
}
