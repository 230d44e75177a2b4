use super::{TeamAction, TeamOutcome, TeamReport};
use crate::error::{Error, ResourceKind, Result};
use crate::model::{Team, TeamZoneMapping, ZoneTable};
use crate::platform::SecurePlatform;

/// Resolves zone names to ids. Names with no zone are dropped.
pub fn resolve_zone_ids(names: &[String], zones: &ZoneTable) -> Vec<i64> {
    names
        .iter()
        .filter_map(|name| {
            let id = zones.zone_id(name);
            if id.is_none() {
                tracing::debug!(zone = %name, "No zone with this name, dropping from mapping");
            }
            id
        })
        .collect()
}

/// Creates or updates one team per mapping entry.
///
/// Existing teams get their zone-id list replaced; missing teams are cloned
/// from the template.
pub struct MappedTeamReconciler<'a> {
    platform: &'a dyn SecurePlatform,
    template: &'a Team,
    dry_run: bool,
}

impl<'a> MappedTeamReconciler<'a> {
    pub fn new(platform: &'a dyn SecurePlatform, template: &'a Team) -> Self {
        Self {
            platform,
            template,
            dry_run: false,
        }
    }

    /// Check existence and log, but never write.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn reconcile(&self, mapping: &TeamZoneMapping, zones: &ZoneTable) -> TeamReport {
        let mut outcomes = Vec::with_capacity(mapping.len());

        for (team_name, zone_names) in mapping {
            let zone_ids = resolve_zone_ids(zone_names, zones);
            tracing::info!(team = %team_name, zone_ids = ?zone_ids, "Reconciling team");

            let action = match self.apply(team_name, zone_ids.clone()).await {
                Ok(action) => action,
                Err(e) => {
                    let err = Error::partial(ResourceKind::Team, team_name, e);
                    tracing::error!(team = %team_name, error = %err, "Could not create or update team");
                    TeamAction::Failed(err.to_string())
                }
            };
            outcomes.push(TeamOutcome {
                name: team_name.clone(),
                action,
                zone_ids,
            });
        }

        TeamReport { outcomes }
    }

    async fn apply(&self, name: &str, zone_ids: Vec<i64>) -> Result<TeamAction> {
        match self.platform.find_team(name).await? {
            Some(mut existing) => {
                let id = existing
                    .id
                    .ok_or_else(|| Error::missing_id(ResourceKind::Team, name))?;
                existing.name = name.to_string();
                existing.zone_ids = zone_ids;

                if self.dry_run {
                    tracing::info!(team = name, team_id = id, "Dry run, would update team");
                    return Ok(TeamAction::WouldUpdate);
                }
                tracing::info!(team = name, team_id = id, "Updating team");
                self.platform.update_team(id, &existing).await?;
                Ok(TeamAction::Updated)
            }
            None => {
                let team = self.template.instantiate(name, name, zone_ids);

                if self.dry_run {
                    tracing::info!(team = name, "Dry run, would create team");
                    return Ok(TeamAction::WouldCreate);
                }
                tracing::info!(team = name, "Creating team");
                self.platform.create_team(&team).await?;
                Ok(TeamAction::Created)
            }
        }
    }
}
