//! Error types for configuration and export.

use thiserror::Error;

/// Errors detected while validating a [`BridgeConfig`].
///
/// [`BridgeConfig`]: crate::config::BridgeConfig
#[derive(Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The bridge was asked to build its own tracer without a service name.
    #[error("service name is required when the bridge builds its own tracer")]
    MissingServiceName,
}

/// Errors returned by exporter sinks.
///
/// These are consumed by the export fan-out and logged; they never reach the
/// traced request path.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ExportError {
    /// The exporter was already shut down.
    #[error("exporter already shut down")]
    AlreadyShutdown,

    /// Other types of failures not covered by the variants above.
    #[error("{0}")]
    Internal(String),
}
