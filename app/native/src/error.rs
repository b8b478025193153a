//! Error types for Autotile.
//!
//! This module provides the unified error type returned by the CLI and the
//! library entry points. It serializes as `{"kind": ..., "message": ...}` so
//! hosts can forward it as structured data.

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::tiling::{ActorError, TilingError};

/// Errors that can occur during application execution.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum AutotileError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Scenario file could not be used.
    #[error("Scenario error: {0}")]
    ScenarioError(String),
    /// Host call or tiling pass failed.
    #[error("Tiling error: {0}")]
    TilingError(String),
    /// Communication with the orchestrator failed.
    #[error("Orchestrator error: {0}")]
    ActorError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl From<std::io::Error> for AutotileError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for AutotileError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}

impl From<ConfigError> for AutotileError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<TilingError> for AutotileError {
    fn from(err: TilingError) -> Self { Self::TilingError(err.to_string()) }
}

impl From<ActorError> for AutotileError {
    fn from(err: ActorError) -> Self { Self::ActorError(err.to_string()) }
}

impl From<String> for AutotileError {
    fn from(msg: String) -> Self { Self::CommandError(msg) }
}

impl From<&str> for AutotileError {
    fn from(msg: &str) -> Self { Self::CommandError(msg.to_string()) }
}
