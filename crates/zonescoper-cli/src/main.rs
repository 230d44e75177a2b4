mod cli;
mod commands;
mod config;
#[cfg(test)]
mod fake;
mod logging;
mod mapping;
mod output;
mod prompt;

use std::io;
use std::path::Path;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use commands::zones::DRY_RUN_FILE;
use config::Settings;
use output::print_error;
use zonescoper_core::{Error, HttpPlatform, RequestError};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        if let Some(body) = remote_body(&e) {
            print_error(&format!("Response body: {body}"));
        }
        std::process::exit(1);
    }
}

/// What the platform answered, when a request was the cause.
fn remote_body(error: &anyhow::Error) -> Option<&str> {
    let response = error
        .downcast_ref::<Error>()
        .and_then(Error::request_error)
        .and_then(RequestError::response)?;
    Some(response.body.as_str()).filter(|body| !body.trim().is_empty())
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let file = config::load_file(cli.config.as_deref())?;
    let settings = Settings::resolve(&cli, file)?;
    logging::init_tracing_with_level(&settings.log_level);

    let platform = HttpPlatform::new(settings.request_config());
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        endpoint = platform.endpoint(),
        modes = ?settings.modes,
        dry_run = settings.dry_run,
        "Starting zone-scoper"
    );

    commands::run_passes(
        &platform,
        &settings,
        Path::new(DRY_RUN_FILE),
        &mut io::stdin().lock(),
        &mut io::stdout(),
    )
    .await
}
