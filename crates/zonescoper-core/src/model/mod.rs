//! Wire and in-memory types for entities, zones and teams.

mod entity;
mod team;
mod zone;

pub use entity::{ClusterNamespace, Entity, EntityPage};
pub use team::{AdditionalPermissions, Team, TeamPage, TeamScope, TeamZoneMapping};
pub use zone::{CreateZone, PageInfo, ScopeRule, UpdateZone, Zone, ZonePage, ZoneTable};

use serde::{Deserialize, Deserializer};

/// Treats an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
