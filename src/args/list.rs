//! Command-line listing of the loaded configuration.

use crate::config::Config;
use crate::config::skeleton::LOCAL_PATHS_SECTION;
use crate::config::validate::{COLORS_SECTION, VALUES_SECTION};
use crate::logging::CONSOLE_TARGET;
use crate::logging::highlight::{Highlight, Highlighter, format_color};

/// What: Render every effective configuration value, grouped by section.
///
/// Inputs:
/// - `config`: Loaded configuration.
/// - `highlighter`: Console formatting.
///
/// Output:
/// - Lines of the form `[Section]` and `    key = value`.
///
/// Details:
/// - Values absent from the file are shown with their defaults; an unset URL is `(unset)`.
#[must_use]
pub fn list_lines(config: &Config, highlighter: &Highlighter) -> Vec<String> {
    let key = |k: &str| highlighter.paint(Highlight::Key, k);
    let mut lines = vec![format!("[{LOCAL_PATHS_SECTION}]")];
    for path in config.paths() {
        lines.push(format!(
            "    {} = {}",
            key(&path.internal_name),
            highlighter.paint(Highlight::Path, &path.current_path.display().to_string())
        ));
    }

    let values = config.values();
    lines.push(format!("[{VALUES_SECTION}]"));
    lines.push(format!("    {} = {}", key("repeat_count"), values.repeat_count));
    lines.push(format!(
        "    {} = {}",
        key("project_url"),
        values
            .project_url
            .as_ref()
            .map_or_else(|| "(unset)".to_string(), ToString::to_string)
    ));

    lines.push(format!("[{COLORS_SECTION}]"));
    for (name, color) in config.palette().entries() {
        lines.push(format!("    {} = {}", key(name), format_color(color)));
    }
    lines
}

/// Print the configuration values to the console.
pub fn handle_list(config: &Config, highlighter: &Highlighter) {
    tracing::debug!(path = %config.path_to_config_file().display(), "listing configuration");
    for line in list_lines(config, highlighter) {
        tracing::info!(target: CONSOLE_TARGET, "{line}");
    }
}
