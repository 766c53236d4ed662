//! Command-line argument definition.

use std::path::PathBuf;

use clap::Parser;

/// starter - loads and repairs its configuration, then gets to work
#[derive(Parser, Debug)]
#[command(name = "starter")]
#[command(version)]
#[command(about = "Loads, validates and repairs the starter configuration", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// Repair missing configured directories without asking
    #[arg(long)]
    pub autoconfig: bool,

    /// Lists all configuration values
    #[arg(short, long)]
    pub list: bool,

    /// Use this configuration file instead of ~/.starter/starter_configuration.ini
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Enable verbose output (equivalent to --log-level debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
