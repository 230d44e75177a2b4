//! Reconciliation passes.
//!
//! Each pass walks its desired resources one at a time. A failure on one
//! zone or team is logged, recorded in the report and skipped; only the
//! caller decides what is fatal.

mod monitor;
mod teams;
mod zones;

pub use monitor::{MonitorOptions, MonitorTeamReconciler, monitor_team_name};
pub use teams::{MappedTeamReconciler, resolve_zone_ids};
pub use zones::ZoneReconciler;

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneAction {
    Created,
    Updated,
    Failed(String),
}

impl fmt::Display for ZoneAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Updated => f.write_str("updated"),
            Self::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneOutcome {
    pub name: String,
    pub action: ZoneAction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneReport {
    /// One entry per group key, in key order.
    pub outcomes: Vec<ZoneOutcome>,
    /// Zones nobody marked as kept. Reported only, never deleted.
    pub prune_candidates: Vec<String>,
}

impl ZoneReport {
    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.action, ZoneAction::Failed(_)))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamAction {
    Created,
    Updated,
    /// Already exists and this pass never updates it.
    Skipped,
    WouldCreate,
    WouldUpdate,
    Failed(String),
}

impl fmt::Display for TeamAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Updated => f.write_str("updated"),
            Self::Skipped => f.write_str("skipped"),
            Self::WouldCreate => f.write_str("would create"),
            Self::WouldUpdate => f.write_str("would update"),
            Self::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamOutcome {
    pub name: String,
    pub action: TeamAction,
    pub zone_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamReport {
    pub outcomes: Vec<TeamOutcome>,
}

impl TeamReport {
    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.action, TeamAction::Failed(_)))
            .count()
    }
}

#[cfg(test)]
pub(crate) mod fake;
