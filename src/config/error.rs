// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Fabric Client Authors
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientConfigError {
    // Error from the config crate
    #[error("settings backend error: {0}")]
    Backend(#[from] config::ConfigError),

    // Unrecognized value in client.logging.level
    #[error("unrecognized logging level '{level}'")]
    UnknownLogLevel { level: String },

    // The global logger was already installed
    #[error("failed to install the global logger")]
    LoggerInstall(#[from] log::SetLoggerError),

    // A peer entry is missing one of its required fields
    #[error("required field '{field}' not set or empty for peer '{label}'")]
    MissingPeerField { field: &'static str, label: String },

    // A peer entry is not a settings table in either supported shape
    #[error("peer entry '{label}' is not a settings table")]
    MalformedPeerEntry { label: String },

    // A peer entry carries no 'tls' table
    #[error("peer entry '{label}' is missing a 'tls' table")]
    MalformedTlsSection { label: String },

    // Error from serde_json while encoding the CA client configuration
    #[error("failed to serialize CA client configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    // Error writing the derived CA client configuration file
    #[error("failed to write derived CA client configuration to {path}")]
    WriteDerivedFile {
        path: String,
        source: std::io::Error,
    },
}
