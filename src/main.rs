use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod combine;
mod extract;
mod fetch;
mod normalize;
mod scrape;
mod sink;
mod types;
mod validate;

pub use types::*;

/// Standings page URL, completed with `/{season}`.
pub const BASE_URL: &str =
    "https://espndeportes.espn.com/futbol/posiciones/_/liga/ESP.1/temporada";
/// La Liga fields 20 teams per season.
pub const EXPECTED_TEAMS: usize = 20;

#[derive(Parser)]
#[command(name = "laliga-standings")]
#[command(about = "La Liga standings scraper (ESPN Deportes)")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape standings for one or more seasons into per-season CSV files
    Scrape {
        /// Season year(s), e.g. "2019" or "2017,2018,2019"
        #[arg(value_name = "SEASONS", default_value = "2019")]
        seasons: String,
        /// Directory to write the CSV files into
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Combine per-season CSV files into a single file
    Combine {
        /// Directory to scan for *.csv files
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
        /// Combined output file
        #[arg(short, long, default_value = "combined.csv")]
        output: PathBuf,
        /// Tag each row with its originating filename
        #[arg(short, long)]
        source_column: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "info,html5ever=error,selectors=error,reqwest=info",
                )
            }),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scrape { seasons, out_dir } => scrape::run_scrape(&seasons, &out_dir),
        Commands::Combine {
            dir,
            output,
            source_column,
        } => combine::run_combine(&dir, &output, source_column),
    }
}
