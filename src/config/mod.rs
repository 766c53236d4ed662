//! Configuration core of the starter.
//!
//! Reads the INI file, validates it, walks the user through repairing missing
//! directories and writes the result back. [`Config::open`] is the entry point;
//! the submodules are public so integration tests can drive each stage alone.

/// Error kinds and the fatal `ConfigurationError`.
pub mod error;
/// Order-preserving INI reader/writer.
pub mod ini;
/// The façade tying the stages together.
mod loader;
/// Application directories and configured paths.
pub mod paths;
/// Directory provisioning.
mod provision;
/// Default document content.
pub mod skeleton;
/// Typed getters and the validator.
pub mod validate;
/// Interactive repair of bad paths.
pub mod wizard;

pub use error::{Cause, ConfigurationError};
pub use loader::{Config, ConfigOptions};
pub use paths::{AppDirs, ConfiguredPath};
pub use provision::ensure_directory;
pub use validate::Values;
