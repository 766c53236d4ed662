//! starter binary entrypoint kept minimal. The configuration core lives in `starter::config`.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use starter::args::{self, Args};
use starter::config::{AppDirs, Cause, Config, ConfigOptions, ConfigurationError};
use starter::logging::highlight::{Highlight, Highlighter};
use starter::logging::{self, CONSOLE_TARGET, LoggingOptions};
use starter::menu::TerminalInput;

/// What: Report a fatal configuration error to the user.
///
/// Inputs:
/// - `err`: Error returned by `Config::open`.
/// - `file`: Configuration file the user should look at.
///
/// Details:
/// - Ctrl-C during a prompt is reported as a keyboard interrupt only.
/// - Otherwise the message, the cause kind and text, then the standard advice.
fn report(err: &ConfigurationError, file: &Path, highlighter: &Highlighter) {
    if let Some(Cause::Input(e)) = err.cause()
        && e.kind() == std::io::ErrorKind::Interrupted
    {
        tracing::error!(target: CONSOLE_TARGET, "Keyboard Interrupt");
        return;
    }
    tracing::trace!("handling configuration error");
    match err.cause() {
        Some(cause) => tracing::error!(
            target: CONSOLE_TARGET,
            "{}: {} {cause}",
            err.message(),
            cause.kind()
        ),
        None => tracing::error!(target: CONSOLE_TARGET, "{}", err.message()),
    }
    tracing::error!(
        target: CONSOLE_TARGET,
        "Correct {} manually or delete it to create a default one.",
        highlighter.paint(Highlight::Path, &file.display().to_string())
    );
}

fn main() -> ExitCode {
    let args = Args::parse();
    let dirs = AppDirs::resolve();
    let mut log = logging::init(&LoggingOptions {
        log_dir: Some(dirs.app_dir.clone()),
        console_level: args::determine_log_level(&args),
        colored: args::use_color(&args),
    });
    tracing::debug!(?args, "parsed arguments");
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "starter starting");

    let file = args.config.clone().unwrap_or_else(|| dirs.config_file());
    let options = ConfigOptions::new(&dirs.data_home, args.autoconfig);
    let mut input = TerminalInput;
    let code = match Config::open(&file, &options, &mut input, log.highlighter()) {
        Ok(config) => {
            log.set_palette(config.palette());
            if args.list {
                args::list::handle_list(&config, log.highlighter());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(&err, &file, log.highlighter());
            ExitCode::FAILURE
        }
    };
    tracing::debug!("starter exited");
    log.shutdown();
    code
}
