use std::env;
use std::path::{Path, PathBuf};

/// Program name; also names the data home and, dot-prefixed, the application directory.
pub const PROGRAM_NAME: &str = "starter";
/// File name of the configuration inside the application directory.
pub const CONFIG_FILE_NAME: &str = "starter_configuration.ini";

/// Resolve the user's home directory from `$HOME`, falling back to `.`.
#[must_use]
pub fn home_dir() -> PathBuf {
    match env::var("HOME") {
        Ok(h) if !h.trim().is_empty() => PathBuf::from(h),
        _ => PathBuf::from("."),
    }
}

/// Directories the starter works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    /// `~/.starter`: configuration file and log files.
    pub app_dir: PathBuf,
    /// `~/starter`: parent of the default configured paths.
    pub data_home: PathBuf,
}

impl AppDirs {
    /// What: Derive the application directories from a home directory.
    ///
    /// Inputs:
    /// - `home`: Base directory, normally `$HOME`.
    ///
    /// Output:
    /// - `AppDirs` with `app_dir = home/.starter` and `data_home = home/starter`.
    ///
    /// Details:
    /// - Nothing is created here; the façade and the logging setup provision directories.
    #[must_use]
    pub fn from_home(home: &Path) -> Self {
        Self {
            app_dir: home.join(format!(".{PROGRAM_NAME}")),
            data_home: home.join(PROGRAM_NAME),
        }
    }

    /// Application directories under the current user's home.
    #[must_use]
    pub fn resolve() -> Self {
        Self::from_home(&home_dir())
    }

    /// Default location of the configuration file.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.app_dir.join(CONFIG_FILE_NAME)
    }
}

/// A named directory setting with a built-in default and a wizard-repairable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredPath {
    /// Key used in the `[Local Paths]` section.
    pub internal_name: String,
    /// Human description, written above the key in the config file.
    pub comment: String,
    /// Built-in default.
    pub default_path: PathBuf,
    /// Value currently in effect (read from the file or repaired by the wizard).
    pub current_path: PathBuf,
}

impl ConfiguredPath {
    /// New setting whose current value starts out as the default.
    #[must_use]
    pub fn new(internal_name: &str, comment: &str, default_path: PathBuf) -> Self {
        Self {
            internal_name: internal_name.to_string(),
            comment: comment.to_string(),
            current_path: default_path.clone(),
            default_path,
        }
    }

    /// Comment with its first letter upper-cased, as shown to the user.
    #[must_use]
    pub fn display_comment(&self) -> String {
        capitalize_first(&self.comment)
    }

    /// A path needs repair when it is not an existing directory.
    #[must_use]
    pub fn needs_repair(&self) -> bool {
        !self.current_path.is_dir()
    }
}

/// Upper-case the first character of `s`, leaving the rest untouched.
#[must_use]
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// What: The directory settings the starter tracks, with their defaults.
///
/// Inputs:
/// - `data_home`: Parent of the default locations.
///
/// Output:
/// - Ordered list; the order is the order of keys in the config file and of wizard prompts.
#[must_use]
pub fn default_configured_paths(data_home: &Path) -> Vec<ConfiguredPath> {
    vec![
        ConfiguredPath::new(
            "local_sub_dir",
            "local subdirectory for working files",
            data_home.join("subdir"),
        ),
        ConfiguredPath::new(
            "output_dir",
            "directory where results are written",
            data_home.join("output"),
        ),
    ]
}
