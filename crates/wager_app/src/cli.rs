use std::path::PathBuf;

use clap::Parser;

use crate::logging::LogDestination;

#[derive(Debug, Parser)]
#[command(name = "wager-scrape", version)]
#[command(about = "Export FanDuel and DraftKings bet history to CSV")]
pub struct Cli {
    /// Address of the page the frames were captured from
    #[arg(long)]
    pub url: String,

    /// Captured page HTML, one file per scroll position, in scroll order
    #[arg(long = "frame", value_name = "FILE", required = true)]
    pub frames: Vec<PathBuf>,

    /// Directory receiving the CSV file (default: settings file, then cwd)
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// RON settings file
    #[arg(long, value_name = "RON")]
    pub settings: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    pub log: LogDestination,
}
