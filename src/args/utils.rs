//! Shared utilities for argument processing.

use std::io::IsTerminal;

/// What: Determine the console log level based on command-line arguments.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - Log level string (trace, debug, info, warn, error).
///
/// Details:
/// - Verbose flag overrides the `--log-level` argument.
/// - `RUST_LOG`, when set, still takes precedence inside the logging setup.
#[must_use]
pub fn determine_log_level(args: &crate::args::Args) -> String {
    if args.verbose {
        "debug".to_string()
    } else {
        args.log_level.clone()
    }
}

/// What: Decide whether the console gets ANSI colours.
///
/// Output:
/// - `false` with `--no-color`, when `NO_COLOR` is set, or when stdout is not a terminal.
#[must_use]
pub fn use_color(args: &crate::args::Args) -> bool {
    !args.no_color
        && std::env::var_os("NO_COLOR").is_none_or(|v| v.is_empty())
        && std::io::stdout().is_terminal()
}
