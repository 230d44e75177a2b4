use super::{TeamAction, TeamOutcome, TeamReport};
use crate::error::{Error, ResourceKind, Result};
use crate::grouping::Grouping;
use crate::model::{Team, TeamScope};
use crate::platform::SecurePlatform;

/// Settings for the monitor-team pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorOptions {
    /// Prepended to each group key to form the team name.
    pub prefix: String,
    /// Agent label the team's scope asserts on.
    pub grouping_label: String,
    pub dry_run: bool,
}

pub fn monitor_team_name(prefix: &str, key: &str) -> String {
    format!("{prefix}{key}")
}

/// Ensures one monitoring team per group key.
///
/// Teams that already exist are left untouched. New teams are cloned from
/// the template with no zones and an agent scope on the grouping label.
pub struct MonitorTeamReconciler<'a> {
    platform: &'a dyn SecurePlatform,
    template: &'a Team,
    options: MonitorOptions,
}

impl<'a> MonitorTeamReconciler<'a> {
    pub fn new(platform: &'a dyn SecurePlatform, template: &'a Team, options: MonitorOptions) -> Self {
        Self {
            platform,
            template,
            options,
        }
    }

    pub async fn reconcile(&self, grouping: &Grouping) -> TeamReport {
        let mut outcomes = Vec::with_capacity(grouping.len());

        for key in grouping.keys() {
            let name = monitor_team_name(&self.options.prefix, key);
            let action = match self.ensure(&name, key).await {
                Ok(action) => action,
                Err(e) => {
                    let err = Error::partial(ResourceKind::Team, &name, e);
                    tracing::error!(team = %name, error = %err, "Could not create monitor team");
                    TeamAction::Failed(err.to_string())
                }
            };
            outcomes.push(TeamOutcome {
                name,
                action,
                zone_ids: Vec::new(),
            });
        }

        TeamReport { outcomes }
    }

    async fn ensure(&self, name: &str, key: &str) -> Result<TeamAction> {
        if self.platform.find_team(name).await?.is_some() {
            tracing::info!(team = name, "Monitor team exists, skipping");
            return Ok(TeamAction::Skipped);
        }

        let mut team = self.template.instantiate(name, name, Vec::new());
        team.scopes.push(TeamScope::host_container());
        team.scopes
            .push(TeamScope::agent_label(&self.options.grouping_label, key));

        if self.options.dry_run {
            tracing::info!(team = name, "Dry run, would create monitor team");
            return Ok(TeamAction::WouldCreate);
        }
        tracing::info!(team = name, "Creating monitor team");
        self.platform.create_team(&team).await?;
        Ok(TeamAction::Created)
    }
}
