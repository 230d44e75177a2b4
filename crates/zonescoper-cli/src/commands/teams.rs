use anyhow::Result;
use zonescoper_core::{MappedTeamReconciler, SecurePlatform, TeamReport, ZoneTable};

use super::load_template;
use crate::config::Settings;
use crate::mapping::load_mapping;
use crate::output::print_team_report;

pub async fn run(
    platform: &dyn SecurePlatform,
    settings: &Settings,
    zones: &ZoneTable,
) -> Result<TeamReport> {
    let template = load_template(platform, settings.template_name()?).await?;
    let mapping = load_mapping(settings.mapping_file()?)?;

    let report = MappedTeamReconciler::new(platform, &template)
        .with_dry_run(settings.dry_run)
        .reconcile(&mapping, zones)
        .await;
    print_team_report(&report);
    Ok(report)
}
