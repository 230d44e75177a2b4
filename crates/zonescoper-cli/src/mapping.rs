//! Team → zone mapping file.
//!
//! A CSV with one header row. The first column is the team name, every
//! further column a zone name. Rows may have any number of columns and a
//! team listed on several rows collects all their zones.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Result;
use zonescoper_core::{Error, TeamZoneMapping};

pub fn parse_mapping<R: Read>(reader: R) -> Result<TeamZoneMapping, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut mapping = TeamZoneMapping::new();
    for record in reader.records() {
        let record = record?;
        let mut fields = record.iter();
        let Some(team) = fields.next().filter(|t| !t.is_empty()) else {
            continue;
        };
        mapping
            .entry(team.to_string())
            .or_default()
            .extend(fields.filter(|z| !z.is_empty()).map(str::to_string));
    }
    Ok(mapping)
}

pub fn load_mapping(path: &Path) -> Result<TeamZoneMapping> {
    let file = File::open(path).map_err(|e| {
        Error::configuration(format!(
            "Cannot open team zone mapping file {}: {e}",
            path.display()
        ))
    })?;
    let mapping = parse_mapping(file).map_err(|e| {
        Error::configuration(format!(
            "Cannot parse team zone mapping file {}: {e}",
            path.display()
        ))
    })?;

    for (team, zones) in &mapping {
        tracing::info!(team = %team, zones = ?zones, "Loaded team zone mapping");
    }
    Ok(mapping)
}
