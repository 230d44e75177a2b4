pub mod monitor;
pub mod teams;
pub mod zones;

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use zonescoper_core::{Error, Grouping, SecurePlatform, Team, ZoneTable, normalize_entities};

use crate::config::Settings;
use crate::output::{print_section, print_success};
use zones::ZoneRun;

/// Runs the selected passes in order: zones, mapped teams, monitor teams.
///
/// A declined zone prompt ends the run before any later pass.
pub async fn run_passes<R: BufRead, W: Write>(
    platform: &dyn SecurePlatform,
    settings: &Settings,
    plan_path: &Path,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    // Both the zone and the team passes need the current zones.
    tracing::info!("Getting list of zones");
    let mut zones: ZoneTable = platform
        .fetch_zones()
        .await
        .context("Failed to retrieve zones")?
        .into_iter()
        .collect();
    tracing::info!(count = zones.len(), "Retrieved zones");

    let grouping = if settings.modes.zone || settings.modes.monitor {
        Some(load_grouping(platform, settings).await?)
    } else {
        None
    };

    let mut failures = 0;

    if let Some(grouping) = grouping.as_ref().filter(|_| settings.modes.zone) {
        print_section("Zones");
        let run = zones::run(platform, settings, grouping, &mut zones, plan_path, input, output);
        match run.await? {
            ZoneRun::Applied(report) => failures += report.failures(),
            ZoneRun::DryRun => {}
            ZoneRun::Declined => return Ok(()),
        }
    }

    if settings.modes.team {
        print_section("Teams");
        failures += teams::run(platform, settings, &zones).await?.failures();
    }

    if let Some(grouping) = grouping.as_ref().filter(|_| settings.modes.monitor) {
        print_section("Monitor teams");
        failures += monitor::run(platform, settings, grouping).await?.failures();
    }

    if failures > 0 {
        anyhow::bail!("Finished with {failures} failed operation(s), see log for details");
    }
    print_success("Finished");
    Ok(())
}

/// Fetches namespace entities, applies the label rules and groups them.
pub async fn load_grouping(platform: &dyn SecurePlatform, settings: &Settings) -> Result<Grouping> {
    tracing::info!("Getting namespace entities");
    let mut entities = platform
        .fetch_entities()
        .await
        .context("Failed to retrieve namespace entities")?;

    let changed = normalize_entities(&mut entities, &settings.label_rules);
    if changed > 0 {
        tracing::info!(changed, "Applied label rules");
    }

    let grouping = Grouping::from_entities(&entities, &settings.labels);
    tracing::info!(
        entities = entities.len(),
        groups = grouping.len(),
        label = %settings.labels.group,
        "Grouped namespaces"
    );
    Ok(grouping)
}

/// The team every new team is cloned from. Missing is fatal.
pub async fn load_template(platform: &dyn SecurePlatform, name: &str) -> Result<Team> {
    let template = platform
        .find_team(name)
        .await
        .with_context(|| format!("Could not retrieve team template '{name}'"))?;
    template.ok_or_else(|| Error::configuration(format!("Team template '{name}' not found")).into())
}
