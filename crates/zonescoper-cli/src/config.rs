use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use zonescoper_core::grouping::{DEFAULT_CLUSTER_LABEL, DEFAULT_NAMESPACE_LABEL};
use zonescoper_core::http::{DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT};
use zonescoper_core::{Error, GroupingLabels, LabelRule, RequestConfig, RetentionSet};

use crate::cli::Cli;

const DEFAULT_MODE: &str = "zone";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub endpoint: Option<String>,
    pub grouping_label: Option<String>,
    pub cluster_label: Option<String>,
    pub namespace_label: Option<String>,
    pub static_zones: Vec<String>,
    pub mode: Option<String>,
    pub team_template_name: Option<String>,
    pub team_zone_mapping_file: Option<PathBuf>,
    pub team_prefix: Option<String>,
    pub dry_run: Option<bool>,
    pub silent: Option<bool>,
    pub log_level: Option<String>,
    pub request: RequestTuning,
    pub label_rules: Vec<LabelRule>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RequestTuning {
    pub max_retries: Option<u32>,
    pub base_delay_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub verify_tls: Option<bool>,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".zone-scoper").join("config.toml"))
}

/// Reads `path`, or the default location when `path` is `None`.
///
/// An explicit path must exist. A missing default file yields an empty config.
pub fn load_file(path: Option<&Path>) -> Result<FileConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(FileConfig::default()),
        },
    };
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Cannot read config file {}", path.display()))?;
    let cfg: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(cfg)
}

/// Passes selected by the mode string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modes {
    pub zone: bool,
    pub team: bool,
    pub monitor: bool,
}

impl Modes {
    /// Case-insensitive substring match, so `zone,team` enables both.
    pub fn parse(mode: &str) -> Self {
        let mode = mode.to_uppercase();
        Self {
            zone: mode.contains("ZONE"),
            team: mode.contains("TEAM"),
            monitor: mode.contains("MONITOR"),
        }
    }

    pub fn any(&self) -> bool {
        self.zone || self.team || self.monitor
    }
}

/// Fully resolved run settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub token: String,
    pub endpoint: String,
    pub labels: GroupingLabels,
    pub retention: RetentionSet,
    pub modes: Modes,
    pub team_template_name: Option<String>,
    pub team_zone_mapping_file: Option<PathBuf>,
    pub team_prefix: String,
    pub dry_run: bool,
    pub silent: bool,
    pub log_level: String,
    pub max_retries: u32,
    pub base_delay: Duration,
    pub timeout: Duration,
    pub verify_tls: bool,
    pub label_rules: Vec<LabelRule>,
}

impl Settings {
    /// Layers CLI/env over `file` over built-in defaults.
    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self> {
        let token = non_empty(cli.token.clone())
            .ok_or_else(|| missing("--token", "SECURE_API_TOKEN"))?;
        let endpoint = non_empty(cli.endpoint.clone().or(file.endpoint))
            .ok_or_else(|| missing("--endpoint", "SYSDIG_API_ENDPOINT"))?;

        let mode = non_empty(cli.mode.clone().or(file.mode)).unwrap_or_else(|| DEFAULT_MODE.into());
        let modes = Modes::parse(&mode);
        if !modes.any() {
            return Err(Error::configuration(format!(
                "Mode '{mode}' selects nothing. Use zone, team, monitor or a combination"
            ))
            .into());
        }

        let grouping_label = non_empty(cli.grouping_label.clone().or(file.grouping_label));
        let grouping_label = match grouping_label {
            Some(label) => label,
            None if modes.zone || modes.monitor => {
                return Err(missing("--grouping-label", "GROUPING_LABEL").into());
            }
            None => String::new(),
        };
        let labels = GroupingLabels::new(grouping_label)
            .with_cluster_label(
                file.cluster_label
                    .unwrap_or_else(|| DEFAULT_CLUSTER_LABEL.into()),
            )
            .with_namespace_label(
                file.namespace_label
                    .unwrap_or_else(|| DEFAULT_NAMESPACE_LABEL.into()),
            );

        let retention = match &cli.static_zones {
            Some(list) => RetentionSet::parse(list),
            None => RetentionSet::new(file.static_zones),
        };

        let log_level = non_empty(cli.log_level.clone().or(file.log_level))
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.into())
            .to_lowercase();

        Ok(Self {
            token,
            endpoint,
            labels,
            retention,
            modes,
            team_template_name: non_empty(
                cli.team_template_name.clone().or(file.team_template_name),
            ),
            team_zone_mapping_file: cli
                .team_zone_mapping_file
                .clone()
                .or(file.team_zone_mapping_file),
            team_prefix: cli.team_prefix.clone().or(file.team_prefix).unwrap_or_default(),
            dry_run: cli.dry_run || file.dry_run.unwrap_or(false),
            silent: cli.silent || file.silent.unwrap_or(false),
            log_level,
            max_retries: file.request.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            base_delay: file
                .request
                .base_delay_secs
                .map_or(DEFAULT_BASE_DELAY, Duration::from_secs),
            timeout: file
                .request
                .timeout_secs
                .map_or(DEFAULT_TIMEOUT, Duration::from_secs),
            verify_tls: file.request.verify_tls.unwrap_or(false),
            label_rules: file.label_rules,
        })
    }

    /// Base request every platform call is derived from.
    pub fn request_config(&self) -> RequestConfig {
        RequestConfig::new(&self.endpoint, &self.token)
            .with_verify_tls(self.verify_tls)
            .with_max_retries(self.max_retries)
            .with_base_delay(self.base_delay)
            .with_timeout(self.timeout)
    }

    pub fn template_name(&self) -> Result<&str> {
        self.team_template_name
            .as_deref()
            .ok_or_else(|| missing("--team-template-name", "TEAM_TEMPLATE_NAME").into())
    }

    pub fn mapping_file(&self) -> Result<&Path> {
        self.team_zone_mapping_file
            .as_deref()
            .ok_or_else(|| missing("--team-zone-mapping-file", "TEAM_ZONE_MAPPING_FILE").into())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn missing(flag: &str, env: &str) -> Error {
    Error::configuration(format!("Missing {flag} (or {env} environment variable)"))
}
