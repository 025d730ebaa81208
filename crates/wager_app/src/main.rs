//! `wager-scrape`: replays captured bet-history pages and exports the bets as CSV.
mod cli;
mod logging;
mod settings;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use engine_logging::engine_info;
use wager_core::RunFailure;
use wager_engine::{
    export_filename, write_export, CsvExporter, LogProgressSink, Orchestrator, ReplayPage,
    SiteRegistry,
};

use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log);

    let settings = settings::load(cli.settings.as_deref())?;
    let frames = cli
        .frames
        .iter()
        .map(|path| {
            fs::read_to_string(path).with_context(|| format!("reading frame {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    engine_info!("Replaying {} frames of {}", frames.len(), cli.url);

    let host = ReplayPage::new(cli.url.clone(), frames);
    let orchestrator = Orchestrator::new(SiteRegistry::default(), settings.scroll);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("starting runtime")?;
    let report =
        runtime.block_on(orchestrator.run_and_export(&host, &LogProgressSink, &CsvExporter))?;

    let out_dir = cli
        .out
        .or(settings.output_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    let filename = export_filename(&report.site, Utc::now());
    let content = report.export.unwrap_or_default();
    let path = write_export(&out_dir, &filename, &content).map_err(|err| {
        RunFailure::ExportFailure {
            message: err.to_string(),
        }
    })?;

    println!("{} bets exported to {}", report.records.len(), path.display());
    Ok(())
}
