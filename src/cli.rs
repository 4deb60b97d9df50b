use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::version;

#[derive(Parser)]
#[command(author, version = version(), about, long_about = None)]
#[command(subcommand_value_name = "SUBCOMMAND")]
#[command(subcommand_help_heading = "Subcommands")]
pub struct Cli {
    /// Path to config file (default: `$XDG_CONFIG_HOME/bakesale/config.kdl`).
    ///
    /// This can also be set with the `BAKESALE_CONFIG` environment variable. If both are set, the
    /// command line argument takes precedence.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub subcommand: Sub,
}

#[derive(Subcommand)]
pub enum Sub {
    /// Browse deals from a fixture file, replaying recorded input.
    Run {
        /// JSON file with the full deal records to serve.
        #[arg(short, long)]
        deals: PathBuf,
        /// JSON file with timed input events to replay.
        #[arg(short, long)]
        script: Option<PathBuf>,
        /// Width of the viewport in logical pixels.
        #[arg(long, default_value_t = 400.)]
        viewport_width: f64,
    },
    /// Validate the config file.
    Validate,
}
