use std::path::PathBuf;

use clap::Parser;
use clap::builder::BoolishValueParser;

#[derive(Parser, Debug, Default)]
#[command(name = "zone-scoper")]
#[command(about = "Scope Sysdig Secure zones and teams from Kubernetes namespace labels")]
#[command(version)]
pub struct Cli {
    /// Secure API token
    #[arg(long, env = "SECURE_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// API endpoint (e.g. https://secure.sysdig.com)
    #[arg(short, long, env = "SYSDIG_API_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Namespace label whose value names the zone
    #[arg(short = 'l', long, env = "GROUPING_LABEL")]
    pub grouping_label: Option<String>,

    /// Comma-separated zones that are never prune candidates
    #[arg(long, env = "STATIC_ZONES")]
    pub static_zones: Option<String>,

    /// Which passes to run: any combination of zone, team, monitor
    #[arg(short, long, env = "MODE")]
    pub mode: Option<String>,

    /// Existing team cloned for every new team
    #[arg(long, env = "TEAM_TEMPLATE_NAME")]
    pub team_template_name: Option<String>,

    /// CSV file mapping team names to zone names
    #[arg(long, env = "TEAM_ZONE_MAPPING_FILE")]
    pub team_zone_mapping_file: Option<PathBuf>,

    /// Prefix for monitor team names
    #[arg(long, env = "TEAM_PREFIX")]
    pub team_prefix: Option<String>,

    /// Write the plan and exit without changing zones; teams are only looked up
    #[arg(long, env = "DRY_RUN", value_parser = BoolishValueParser::new())]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long, env = "SILENT", value_parser = BoolishValueParser::new())]
    pub silent: bool,

    /// Log level: info, debug or error (RUST_LOG overrides)
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Config file (defaults to ~/.zone-scoper/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
