use indexmap::IndexSet;

use super::{ZoneAction, ZoneOutcome, ZoneReport};
use crate::error::{Error, ResourceKind, Result};
use crate::grouping::Grouping;
use crate::model::{ClusterNamespace, CreateZone, UpdateZone, Zone, ZoneTable};
use crate::platform::SecurePlatform;
use crate::retention::RetentionSet;
use crate::scope;

/// Converges one zone per group key.
///
/// Missing zones are created with a placeholder rule, then scoped. Existing
/// zones get their `kubernetes` rules replaced; rules of other target types
/// are kept verbatim. Every desired zone and every retained zone is marked
/// kept; the rest are reported as prune candidates and left in place.
pub struct ZoneReconciler<'a> {
    platform: &'a dyn SecurePlatform,
}

impl<'a> ZoneReconciler<'a> {
    pub fn new(platform: &'a dyn SecurePlatform) -> Self {
        Self { platform }
    }

    pub async fn reconcile(
        &self,
        grouping: &Grouping,
        zones: &mut ZoneTable,
        retention: &RetentionSet,
    ) -> ZoneReport {
        let mut outcomes = Vec::with_capacity(grouping.len());

        for (key, members) in grouping.iter() {
            let result = match zones.get(key).cloned() {
                Some(existing) => {
                    tracing::info!(zone = key, "Zone exists, updating");
                    zones.mark_kept(key);
                    self.apply_scope(&existing, members, zones)
                        .await
                        .map(|()| ZoneAction::Updated)
                }
                None => {
                    tracing::debug!(zone = key, "Zone does not exist, creating");
                    self.create_and_scope(key, members, zones)
                        .await
                        .map(|()| ZoneAction::Created)
                }
            };

            let action = result.unwrap_or_else(|e| {
                let err = Error::partial(ResourceKind::Zone, key, e);
                tracing::error!(zone = key, error = %err, "Could not reconcile zone");
                ZoneAction::Failed(err.to_string())
            });
            outcomes.push(ZoneOutcome {
                name: key.to_string(),
                action,
            });
        }

        for name in retention.iter() {
            if zones.mark_kept(name) {
                tracing::debug!(zone = name, "Static zone marked as kept");
            }
        }

        let prune_candidates: Vec<String> = zones
            .prune_candidates()
            .into_iter()
            .map(|z| z.name.clone())
            .collect();
        for name in &prune_candidates {
            tracing::info!(zone = %name, "Zone not marked to keep, prune candidate (not deleted)");
        }

        ZoneReport {
            outcomes,
            prune_candidates,
        }
    }

    async fn create_and_scope(
        &self,
        key: &str,
        members: &IndexSet<ClusterNamespace>,
        zones: &mut ZoneTable,
    ) -> Result<()> {
        let request = CreateZone {
            name: key.to_string(),
            description: format!("Zone for '{key}'"),
            scopes: vec![scope::placeholder_rule()],
        };
        tracing::info!(zone = key, "Creating zone");
        let created = self.platform.create_zone(&request).await?;

        zones.insert(key, created.clone());
        zones.mark_kept(key);

        self.apply_scope(&created, members, zones).await
    }

    async fn apply_scope(
        &self,
        zone: &Zone,
        members: &IndexSet<ClusterNamespace>,
        zones: &mut ZoneTable,
    ) -> Result<()> {
        let id = zone
            .id
            .ok_or_else(|| Error::missing_id(ResourceKind::Zone, &zone.name))?;
        let rule = scope::kubernetes_rule(members);
        tracing::debug!(zone = %zone.name, zone_id = id, rules = %rule.rules, "Updating zone scope");

        let update = UpdateZone {
            id,
            name: zone.name.clone(),
            description: zone.description.clone(),
            scopes: scope::replace_rules(&zone.scopes, rule),
        };
        let updated = self.platform.update_zone(&update).await?;
        zones.insert(zone.name.clone(), updated);

        tracing::debug!(zone = %zone.name, "Zone updated and marked as kept");
        Ok(())
    }
}
