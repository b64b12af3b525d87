//! Command line interface.

pub mod command;

use std::path::PathBuf;
use std::time::Duration;

use clap::{command, Parser, Subcommand};
use indicatif::ProgressBar;

use crate::reading::DEFAULT_BASELINE_TEMP;

const AFTER_HELP: &str = "\
Examples:
  # Basic usage (saves to the platform data directory)
  degreedays collect --apikey YOUR_KEY --coords \"51.5074,-0.1278\"

  # Custom output directory, short flags
  degreedays collect -k YOUR_KEY -c \"51.5074,-0.1278\" -o ./data

Scheduling:
  # Linux/Mac (crontab -e):
  0 9 * * * degreedays collect -k YOUR_KEY -c \"51.5074,-0.1278\"

  # Windows Task Scheduler:
  Program: degreedays
  Arguments: collect -k YOUR_KEY -c \"51.5074,-0.1278\"";

#[derive(Parser)]
#[command(version, about, long_about = None, after_help = AFTER_HELP)]
/// Contains the commands
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect today's degree days and append them to the CSV log
    Collect {
        /// Met Office Weather DataHub API key
        #[arg(short = 'k', long = "apikey")]
        api_key: String,

        /// Location coordinates (latitude,longitude), e.g. "51.5074,-0.1278" for London
        #[arg(short, long)]
        coords: String,

        /// Output directory for CSV files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Baseline temperature for degree day calculations (°C)
        #[arg(long, default_value_t = DEFAULT_BASELINE_TEMP)]
        baseline: f64,
    },
    /// List the CSV logs in the data directory
    List {
        /// Output directory for CSV files
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a CSV log
    Show {
        /// Log file name (defaults to the collector's log)
        file: Option<String>,

        /// Output directory for CSV files
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}
