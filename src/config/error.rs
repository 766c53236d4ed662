//! Error kinds raised while reading, validating and repairing the configuration.
//!
//! Everything fatal ends up as a [`ConfigurationError`]; the lower-level kinds
//! travel inside it as the [`Cause`] so the binary has one place to report them.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the INI reader/writer.
#[derive(Debug, Error)]
pub enum IniError {
    /// The file does not exist; the façade answers this by writing a default file.
    #[error("{} does not exist", path.display())]
    FileMissing {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The file is not valid UTF-8.
    #[error("{} is not valid UTF-8", path.display())]
    UnreadableEncoding {
        /// Path of the offending file.
        path: PathBuf,
        /// Decoder error.
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The content cannot be split into sections, keys and values.
    #[error("line {line}: {reason}")]
    CorruptSyntax {
        /// 1-based line number.
        line: usize,
        /// What is wrong with the line.
        reason: String,
    },

    /// Any other I/O failure while reading or writing.
    #[error("I/O error accessing {}: {source}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// A section or key the validator needed is not in the document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    /// Whole section absent.
    #[error("No section: '{section}'")]
    MissingSection {
        /// Section name.
        section: String,
    },

    /// Section present, key absent.
    #[error("No option '{key}' in section: '{section}'")]
    MissingKey {
        /// Section name.
        section: String,
        /// Key name.
        key: String,
    },
}

/// A literal that could not be converted to its target type.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{key}' in section '{section}' has an unacceptable value of {value} ({reason})")]
pub struct ValueError {
    /// Section holding the key.
    pub section: String,
    /// Key whose value failed.
    pub key: String,
    /// The literal as written in the file.
    pub value: String,
    /// Why the conversion failed.
    pub reason: String,
}

/// Failures of the path provisioner.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Something that is not a directory already occupies the path.
    #[error("{} already exists and is not a directory", path.display())]
    NotADirectory {
        /// The occupied path.
        path: PathBuf,
    },

    /// The filesystem refused to create a directory.
    #[error("could not create {}: {source}", path.display())]
    Io {
        /// Directory being created.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Lower-level error wrapped by a [`ConfigurationError`].
#[derive(Debug, Error)]
pub enum Cause {
    /// Reading or writing the file failed.
    #[error(transparent)]
    Ini(#[from] IniError),
    /// A required section or key is absent.
    #[error(transparent)]
    Lookup(#[from] LookupError),
    /// A value failed type conversion.
    #[error(transparent)]
    Value(#[from] ValueError),
    /// A directory could not be provided.
    #[error(transparent)]
    Provision(#[from] ProvisionError),
    /// Reading the user's answer failed.
    #[error("could not read input: {0}")]
    Input(#[source] std::io::Error),
}

impl Cause {
    /// Short name of the cause kind, shown next to the message.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Ini(IniError::FileMissing { .. }) => "FileMissing",
            Self::Ini(IniError::UnreadableEncoding { .. }) => "UnreadableEncoding",
            Self::Ini(IniError::CorruptSyntax { .. }) => "CorruptSyntax",
            Self::Ini(IniError::Io { .. }) => "IoError",
            Self::Lookup(LookupError::MissingSection { .. }) => "MissingSection",
            Self::Lookup(LookupError::MissingKey { .. }) => "MissingKey",
            Self::Value(_) => "InvalidValue",
            Self::Provision(ProvisionError::NotADirectory { .. }) => "PathExistsAsWrongType",
            Self::Provision(ProvisionError::Io { .. }) => "ProvisionError",
            Self::Input(_) => "InputError",
        }
    }
}

/// The one fatal error kind surfaced by [`crate::config::Config::open`].
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ConfigurationError {
    message: String,
    #[source]
    cause: Option<Cause>,
}

impl ConfigurationError {
    /// Build an error with a message and an optional wrapped cause.
    #[must_use]
    pub fn new(message: impl Into<String>, cause: Option<Cause>) -> Self {
        Self {
            message: message.into(),
            cause,
        }
    }

    /// Error raised when the user quits the wizard to edit `file_name` by hand.
    #[must_use]
    pub fn user_abort(file_name: &str) -> Self {
        Self::new(
            format!("Who needs a wizard, when you can edit `{file_name}` yourself, right?"),
            None,
        )
    }

    /// Human readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Wrapped lower-level error, if any.
    #[must_use]
    pub const fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }
}
