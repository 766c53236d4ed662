//! The configuration façade: read, validate, repair, persist, repeat.

use std::path::{Path, PathBuf};

use super::error::{Cause, ConfigurationError, IniError};
use super::ini::IniDocument;
use super::paths::{ConfiguredPath, default_configured_paths};
use super::provision::ensure_directory;
use super::skeleton::{default_document, local_paths_section};
use super::validate::{Values, generic_message, validate};
use super::wizard::{Wizard, WizardOutcome};
use crate::logging::CONSOLE_TARGET;
use crate::logging::highlight::{Highlight, Highlighter, Palette};
use crate::menu::UserInput;

/// How [`Config::open`] should behave.
#[derive(Debug, Clone)]
pub struct ConfigOptions {
    /// Repair bad paths without asking.
    pub autoconfig: bool,
    /// Directory settings to track, in file and prompt order.
    pub paths: Vec<ConfiguredPath>,
}

impl ConfigOptions {
    /// Options tracking the default paths below `data_home`.
    #[must_use]
    pub fn new(data_home: &Path, autoconfig: bool) -> Self {
        Self {
            autoconfig,
            paths: default_configured_paths(data_home),
        }
    }

    /// Replace the tracked directory settings.
    #[must_use]
    pub fn with_paths(mut self, paths: Vec<ConfiguredPath>) -> Self {
        self.paths = paths;
        self
    }
}

/// A configuration that passed validation and whose paths all exist.
#[derive(Debug, Clone)]
pub struct Config {
    file: PathBuf,
    document: IniDocument,
    paths: Vec<ConfiguredPath>,
    values: Values,
    palette: Palette,
}

/// Name used for `path` in messages: its file name, or the whole path if it has none.
fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}

/// What: Regenerate `[Local Paths]` from `paths` and write the document.
///
/// Details:
/// - Every other section is written back unchanged.
fn persist(
    file: &Path,
    mut document: IniDocument,
    paths: &[ConfiguredPath],
    file_name: &str,
) -> Result<(), ConfigurationError> {
    document.replace_section(local_paths_section(paths));
    document
        .write(file)
        .map_err(|e| ConfigurationError::new(generic_message(file_name), Some(e.into())))?;
    tracing::debug!(path = %file.display(), "configuration persisted");
    Ok(())
}

/// What: Map a failed read to the user-facing error.
///
/// Details:
/// - Encoding and syntax problems quote the reader's diagnosis; anything else gets
///   the generic advice.
fn read_failure(file_name: &str, error: IniError) -> ConfigurationError {
    let message = match &error {
        IniError::UnreadableEncoding { .. } | IniError::CorruptSyntax { .. } => format!(
            "{file_name}: {error}. Correct it manually or delete it to have it recreated."
        ),
        _ => generic_message(file_name),
    };
    ConfigurationError::new(message, Some(error.into()))
}

impl Config {
    /// What: Load the configuration at `file`, repairing missing directories until it is valid.
    ///
    /// Inputs:
    /// - `file`: Configuration file; created with defaults when absent.
    /// - `options`: Autoconfig flag and the tracked directory settings.
    /// - `input`: Keyboard source for the wizard (unused in autoconfig mode).
    /// - `highlighter`: Console formatting; the wizard uses its colour setting together
    ///   with the palette from the file's `[Colors]` section.
    ///
    /// Output:
    /// - `Ok(Config)` once every tracked path is an existing directory.
    /// - `Err(ConfigurationError)` for unreadable or malformed files, unacceptable values,
    ///   directories that cannot be created, or when the user quits the wizard.
    ///
    /// Details:
    /// - Each round re-reads the file from disk, so repairs are validated the same way
    ///   as hand edits.
    /// - After a wizard batch the file is rewritten, also when the user quit or the wizard
    ///   failed; the error is raised after that write so earlier repairs are kept.
    pub fn open(
        file: &Path,
        options: &ConfigOptions,
        input: &mut dyn UserInput,
        highlighter: &Highlighter,
    ) -> Result<Self, ConfigurationError> {
        let file_name = display_name(file);
        if let Some(parent) = file.parent()
            && !parent.as_os_str().is_empty()
        {
            ensure_directory(parent).map_err(|e| {
                ConfigurationError::new(generic_message(&file_name), Some(e.into()))
            })?;
        }

        let mut paths = options.paths.clone();
        let mut round = 0_usize;
        loop {
            round += 1;
            tracing::trace!(round, path = %file.display(), "loading configuration");
            let document = match IniDocument::read(file) {
                Ok(document) => document,
                Err(IniError::FileMissing { .. }) => {
                    tracing::info!(
                        target: CONSOLE_TARGET,
                        "Creating default configuration file {}",
                        highlighter.paint(Highlight::Path, &file.display().to_string())
                    );
                    default_document(&options.paths)
                        .write(file)
                        .map_err(|e| ConfigurationError::new(generic_message(&file_name), Some(e.into())))?;
                    continue;
                }
                Err(e) => return Err(read_failure(&file_name, e)),
            };

            let validated = validate(&document, &paths, &file_name)?;
            paths = validated.paths;
            let bad: Vec<usize> = paths
                .iter()
                .enumerate()
                .filter(|(_, p)| p.needs_repair())
                .map(|(i, _)| i)
                .collect();
            if bad.is_empty() {
                tracing::debug!(rounds = round, "configuration valid");
                return Ok(Self {
                    file: file.to_path_buf(),
                    document,
                    paths,
                    values: validated.values,
                    palette: validated.palette,
                });
            }
            tracing::debug!(bad = bad.len(), "paths need repair");

            let tinted = Highlighter::new(&validated.palette, highlighter.colored());
            let outcome = Wizard::new(&tinted, &file_name, options.autoconfig)
                .run(&mut paths, &bad, input);
            persist(file, document, &paths, &file_name)?;
            match outcome {
                Ok(WizardOutcome::Resolved) => {}
                Ok(WizardOutcome::QuitRequested) => {
                    return Err(ConfigurationError::user_abort(&file_name));
                }
                Err(cause) => return Err(wizard_failure(&file_name, cause)),
            }
        }
    }

    /// Path of the configuration file.
    #[must_use]
    pub fn path_to_config_file(&self) -> &Path {
        &self.file
    }

    /// Document as last read from disk.
    #[must_use]
    pub const fn document(&self) -> &IniDocument {
        &self.document
    }

    /// All tracked directory settings with their effective values.
    #[must_use]
    pub fn paths(&self) -> &[ConfiguredPath] {
        &self.paths
    }

    /// Effective value of the directory setting `internal_name`.
    #[must_use]
    pub fn path(&self, internal_name: &str) -> Option<&Path> {
        self.paths
            .iter()
            .find(|p| p.internal_name == internal_name)
            .map(|p| p.current_path.as_path())
    }

    /// The `local_sub_dir` setting.
    #[must_use]
    pub fn local_sub_dir(&self) -> Option<&Path> {
        self.path("local_sub_dir")
    }

    /// The `output_dir` setting.
    #[must_use]
    pub fn output_dir(&self) -> Option<&Path> {
        self.path("output_dir")
    }

    /// Settings from `[Values]`.
    #[must_use]
    pub const fn values(&self) -> &Values {
        &self.values
    }

    /// Palette with `[Colors]` overrides applied.
    #[must_use]
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }
}

/// Wrap a wizard failure, naming the file it was repairing.
fn wizard_failure(file_name: &str, cause: Cause) -> ConfigurationError {
    tracing::debug!(kind = cause.kind(), "wizard failed");
    ConfigurationError::new(format!("{file_name}: {cause}"), Some(cause))
}
