//! # zonescoper-core
//!
//! Keeps Sysdig Secure zones and teams in line with the Kubernetes namespaces
//! the platform already knows about.
//!
//! Namespaces are fetched as entities, grouped by a label value, and every
//! group becomes one zone scoped to exactly its clusters and namespaces.
//! Teams are then bound to zones from an explicit mapping, or created per
//! group as agent-scoped monitoring teams.
//!
//! ## Modules
//!
//! - [`http`] - Request layer with bounded retry and error classification
//! - [`platform`] - Remote operations, behind the [`SecurePlatform`] trait
//! - [`model`] - Wire types for entities, zones and teams
//! - [`normalize`] - Label value rewrites applied before grouping
//! - [`grouping`] - Entity grouping by label
//! - [`scope`] - Zone scope rule construction
//! - [`retention`] - Zones that are never prune candidates
//! - [`plan`] - Dry-run plan of zone writes
//! - [`reconcile`] - Zone, mapped-team and monitor-team passes
//!
//! ## Example
//!
//! ```ignore
//! use zonescoper_core::{
//!     Grouping, GroupingLabels, HttpPlatform, RequestConfig, RetentionSet, SecurePlatform,
//!     ZoneReconciler, ZoneTable,
//! };
//!
//! let platform = HttpPlatform::new(RequestConfig::new("https://secure.sysdig.com", token));
//! let mut zones: ZoneTable = platform.fetch_zones().await?.into_iter().collect();
//! let entities = platform.fetch_entities().await?;
//! let grouping = Grouping::from_entities(&entities, &GroupingLabels::new("product"));
//!
//! let report = ZoneReconciler::new(&platform)
//!     .reconcile(&grouping, &mut zones, &RetentionSet::default())
//!     .await;
//! ```

pub mod error;
pub mod grouping;
pub mod http;
pub mod model;
pub mod normalize;
pub mod plan;
pub mod platform;
pub mod reconcile;
pub mod retention;
pub mod scope;

pub use error::{Error, ResourceKind, Result};
pub use grouping::{Grouping, GroupingLabels};
pub use http::{QueryValue, RawResponse, RequestConfig, RequestError};
pub use model::{ClusterNamespace, Entity, Team, TeamZoneMapping, Zone, ZoneTable};
pub use normalize::{LabelRule, Replacement, normalize_entities};
pub use plan::{PlannedAction, PlannedZone, plan_zones};
pub use platform::{HttpPlatform, SecurePlatform};
pub use reconcile::{
    MappedTeamReconciler, MonitorOptions, MonitorTeamReconciler, TeamAction, TeamReport,
    ZoneAction, ZoneReconciler, ZoneReport,
};
pub use retention::RetentionSet;
