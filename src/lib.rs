//! Library entry for starter exposing the configuration core for integration tests.

pub mod args;
pub mod config;
pub mod logging;
pub mod menu;
