use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use invest_compare::api::{Cli, Command, run_http_server, state_from_json};
use invest_compare::core::run_comparison;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { port } => {
            run_http_server(port)
                .await
                .with_context(|| format!("HTTP server on port {port} failed"))?;
        }
        Command::Compare { input, pretty } => {
            let json = read_scenario(input.as_deref())?;
            let state = state_from_json(&json)?;
            let report = run_comparison(&state);
            info!(vehicles = report.results.len(), "comparison finished");

            let out = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{out}");
        }
    }

    Ok(())
}

fn read_scenario(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read scenario from stdin")?;
            if buf.trim().is_empty() {
                buf = "{}".to_string();
            }
            Ok(buf)
        }
    }
}
