use anyhow::Result;
use zonescoper_core::{Grouping, MonitorOptions, MonitorTeamReconciler, SecurePlatform, TeamReport};

use super::load_template;
use crate::config::Settings;
use crate::output::print_team_report;

pub async fn run(
    platform: &dyn SecurePlatform,
    settings: &Settings,
    grouping: &Grouping,
) -> Result<TeamReport> {
    let template = load_template(platform, settings.template_name()?).await?;
    let options = MonitorOptions {
        prefix: settings.team_prefix.clone(),
        grouping_label: settings.labels.group.clone(),
        dry_run: settings.dry_run,
    };

    let report = MonitorTeamReconciler::new(platform, &template, options)
        .reconcile(grouping)
        .await;
    print_team_report(&report);
    Ok(report)
}
