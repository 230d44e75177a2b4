use colored::Colorize;
use tabled::builder::Builder;
use tabled::settings::Style;
use zonescoper_core::{PlannedZone, TeamReport, ZoneReport};

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "!".yellow(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

pub fn plan_table(plan: &[PlannedZone]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Mode", "Zone Name", "Cluster", "Namespace"]);
    for entry in plan {
        builder.push_record([
            entry.action.to_string(),
            entry.zone_name.clone(),
            entry.clusters.clone(),
            entry.namespaces.clone(),
        ]);
    }
    builder.build().with(Style::rounded()).to_string()
}

pub fn print_plan(plan: &[PlannedZone]) {
    if plan.is_empty() {
        println!("No zones to create or update.");
        return;
    }
    println!("{}", plan_table(plan));
}

pub fn print_zone_report(report: &ZoneReport) {
    if !report.outcomes.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Zone", "Result"]);
        for outcome in &report.outcomes {
            builder.push_record([outcome.name.clone(), outcome.action.to_string()]);
        }
        println!("{}", builder.build().with(Style::rounded()));
    }

    let failures = report.failures();
    let succeeded = report.outcomes.len() - failures;
    if failures == 0 {
        print_success(&format!("{succeeded} zone(s) reconciled"));
    } else {
        print_warning(&format!("{succeeded} zone(s) reconciled, {failures} failed"));
    }
    for name in &report.prune_candidates {
        print_warning(&format!("Zone '{name}' is not managed or retained (not deleted)"));
    }
}

pub fn print_team_report(report: &TeamReport) {
    if report.outcomes.is_empty() {
        println!("No teams to reconcile.");
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(["Team", "Zone IDs", "Result"]);
    for outcome in &report.outcomes {
        let ids = outcome
            .zone_ids
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        builder.push_record([outcome.name.clone(), ids, outcome.action.to_string()]);
    }
    println!("{}", builder.build().with(Style::rounded()));

    let failures = report.failures();
    if failures == 0 {
        print_success(&format!("{} team(s) processed", report.outcomes.len()));
    } else {
        print_warning(&format!(
            "{} team(s) processed, {failures} failed",
            report.outcomes.len()
        ));
    }
}
