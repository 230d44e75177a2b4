use std::fs::File;
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use zonescoper_core::{
    Grouping, PlannedZone, SecurePlatform, ZoneReconciler, ZoneReport, ZoneTable, plan_zones,
};

use crate::config::Settings;
use crate::output::{print_plan, print_success, print_zone_report};
use crate::prompt::confirm_twice;

pub const DRY_RUN_FILE: &str = "dry-run.csv";

/// How the zone pass ended.
#[derive(Debug)]
pub enum ZoneRun {
    Applied(ZoneReport),
    /// Plan written, nothing changed.
    DryRun,
    /// The operator did not confirm.
    Declined,
}

/// Plans, writes the plan to `plan_path`, then applies it once confirmed.
///
/// The confirmation is read from `input` unless `silent` is set.
pub async fn run<R: BufRead, W: Write>(
    platform: &dyn SecurePlatform,
    settings: &Settings,
    grouping: &Grouping,
    zones: &mut ZoneTable,
    plan_path: &Path,
    input: &mut R,
    output: &mut W,
) -> Result<ZoneRun> {
    let plan = plan_zones(grouping, zones);
    write_plan_file(plan_path, &plan)?;
    print_plan(&plan);

    let artifact = plan_path.display().to_string();
    if settings.dry_run {
        print_success(&format!("\"{artifact}\" has been written, skipping zone changes"));
        return Ok(ZoneRun::DryRun);
    }
    if !settings.silent {
        let confirmed =
            confirm_twice(input, output, &artifact).context("Could not read confirmation")?;
        if !confirmed {
            return Ok(ZoneRun::Declined);
        }
    }

    let report = ZoneReconciler::new(platform)
        .reconcile(grouping, zones, &settings.retention)
        .await;
    print_zone_report(&report);
    Ok(ZoneRun::Applied(report))
}

pub fn write_plan<W: Write>(writer: W, plan: &[PlannedZone]) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["Mode", "Zone Name", "Cluster", "Namespace"])?;
    for entry in plan {
        writer.write_record([
            entry.action.to_string().as_str(),
            entry.zone_name.as_str(),
            entry.clusters.as_str(),
            entry.namespaces.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_plan_file(path: &Path, plan: &[PlannedZone]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
    write_plan(file, plan).with_context(|| format!("Cannot write {}", path.display()))?;
    tracing::info!(path = %path.display(), zones = plan.len(), "Wrote zone plan");
    Ok(())
}
