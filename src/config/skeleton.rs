use super::ini::{IniDocument, Section};
use super::paths::ConfiguredPath;

/// Name of the required section holding the directory settings.
pub const LOCAL_PATHS_SECTION: &str = "Local Paths";

/// Comment lines opening the `[Local Paths]` section.
pub const LOCAL_PATHS_HEADER: [&str; 4] = [
    "# You can write paths in Windows format or Linux/POSIX format.",
    "# A trailing '/' at the end of the final directory in a POSIX path",
    "# or a '\\' at the end of the final directory of a Windows path",
    "# does not interfere with the path parser.",
];

/// What: Build the `[Local Paths]` section from the configured paths.
///
/// Inputs:
/// - `paths`: Settings in prompt order.
///
/// Output:
/// - Section with the explanatory header, a blank line, then for every path a
///   `# Comment` line followed by `name = current path`.
#[must_use]
pub fn local_paths_section(paths: &[ConfiguredPath]) -> Section {
    let mut section = IniDocument::detached_section(LOCAL_PATHS_SECTION);
    for line in LOCAL_PATHS_HEADER {
        section.push_bare(line);
    }
    section.push_bare("");
    for path in paths {
        tracing::trace!(
            key = %path.internal_name,
            value = %path.current_path.display(),
            "writing path setting"
        );
        section.push_bare(&format!("# {}", path.display_comment()));
        section.set(&path.internal_name, &path.current_path.display().to_string());
    }
    section
}

/// Document written when no configuration file exists yet.
#[must_use]
pub fn default_document(paths: &[ConfiguredPath]) -> IniDocument {
    let mut doc = IniDocument::new();
    doc.replace_section(local_paths_section(paths));
    doc
}
