// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Fabric Client Authors
use crate::config::ClientConfigError;
use config::{Config, File};
use log::{info, LevelFilter};
use std::{env, path::Path};

/// Token replaced with the value of the build-path environment variable in
/// every TLS certificate path handed out by this module.
pub static BUILD_PATH_PLACEHOLDER: &str = "$GOPATH";
static BUILD_PATH_ENV_VAR: &str = "GOPATH";

/// Hierarchical settings store for a Fabric client.
///
/// Wraps the settings document loaded at startup and exposes typed accessors
/// addressed by dotted path. The store is immutable after [`Settings::load`],
/// so accessors take `&self` and can be shared across threads. Keys are
/// matched case-insensitively by the backend.
#[derive(Debug, Clone)]
pub struct Settings {
    inner: Config,
}

impl Settings {
    /// Load the settings document from `config_file`.
    ///
    /// With `None`, the store is empty and every accessor yields its
    /// documented default. A file that cannot be read or parsed is an error;
    /// callers performing startup should treat it as fatal.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ClientConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = config_file {
            // Format is inferred from the file extension
            builder = builder.add_source(File::from(path).required(true));
        }
        let inner = builder.build()?;
        if let Some(path) = config_file {
            info!("Using config file: {}", path.display());
        }
        Ok(Settings { inner })
    }

    /// Load the settings document and install the logger in one step.
    ///
    /// Startup convenience mirroring the way clients boot: the store is
    /// populated first, then the sink severity is read from it. Because the
    /// logger registration is process-global, callers must invoke this
    /// exactly once.
    pub fn init(config_file: Option<&Path>) -> Result<Self, ClientConfigError> {
        let settings = Self::load(config_file)?;
        settings.init_logging()?;
        Ok(settings)
    }

    /// Install the process-wide stderr logger, filtered at the severity named
    /// by `client.logging.level`.
    ///
    /// Must be invoked exactly once; a second installation attempt surfaces
    /// the logger registration error. An unrecognized severity string is a
    /// configuration error the caller should treat as fatal, since later
    /// diagnostics would otherwise be dropped or miscategorized.
    pub fn init_logging(&self) -> Result<(), ClientConfigError> {
        let level = self.logging_level()?;
        pretty_env_logger::formatted_timed_builder()
            .filter_level(level)
            .try_init()?;
        info!("Logging level: {level}");
        Ok(())
    }

    /// Minimum severity from `client.logging.level`, defaulting to `Info`
    /// when the option is absent or empty.
    pub fn logging_level(&self) -> Result<LevelFilter, ClientConfigError> {
        let raw = self.get_string("client.logging.level");
        if raw.is_empty() {
            return Ok(LevelFilter::Info);
        }
        raw.parse()
            .map_err(|_| ClientConfigError::UnknownLogLevel { level: raw })
    }

    /// Whether TLS is globally enabled (`client.tls.enabled`).
    pub fn tls_enabled(&self) -> bool {
        self.get_bool("client.tls.enabled")
    }

    /// Whether security is enabled (`client.security.enabled`).
    pub fn security_enabled(&self) -> bool {
        self.get_bool("client.security.enabled")
    }

    /// Transaction certificate batch size (`client.tcert.batch.size`).
    pub fn tcert_batch_size(&self) -> i64 {
        self.get_int("client.tcert.batch.size")
    }

    /// Hash algorithm name (`client.security.hashAlgorithm`).
    pub fn security_algorithm(&self) -> String {
        self.get_string("client.security.hashAlgorithm")
    }

    /// Security strength level (`client.security.level`).
    pub fn security_level(&self) -> i64 {
        self.get_int("client.security.level")
    }

    /// Orderer host name (`client.orderer.host`).
    pub fn orderer_host(&self) -> String {
        self.get_string("client.orderer.host")
    }

    /// Orderer port (`client.orderer.port`), stringified from its integer
    /// setting.
    pub fn orderer_port(&self) -> String {
        self.get_int("client.orderer.port").to_string()
    }

    /// TLS server-name override for the orderer
    /// (`client.orderer.tls.serverhostoverride`).
    pub fn orderer_tls_server_host_override(&self) -> String {
        self.get_string("client.orderer.tls.serverhostoverride")
    }

    /// TLS certificate path for the orderer (`client.orderer.tls.certificate`)
    /// with the build-path placeholder expanded.
    pub fn orderer_tls_certificate(&self) -> String {
        expand_build_path(&self.get_string("client.orderer.tls.certificate"))
    }

    /// Identifier of the credential authority (`client.fabricCA.id`).
    pub fn ca_id(&self) -> String {
        self.get_string("client.fabricCA.id")
    }

    /// Local key store path (`client.keystore.path`).
    pub fn key_store_path(&self) -> String {
        self.get_string("client.keystore.path")
    }

    pub(crate) fn backend(&self) -> &Config {
        &self.inner
    }

    fn get_string(&self, key: &str) -> String {
        self.inner.get_string(key).unwrap_or_default()
    }

    fn get_int(&self, key: &str) -> i64 {
        self.inner.get_int(key).unwrap_or_default()
    }

    fn get_bool(&self, key: &str) -> bool {
        self.inner.get_bool(key).unwrap_or_default()
    }
}

/// Replace every occurrence of the build-path placeholder with the value of
/// the corresponding environment variable, or the empty string when unset.
pub(crate) fn expand_build_path(path: &str) -> String {
    path.replace(
        BUILD_PATH_PLACEHOLDER,
        &env::var(BUILD_PATH_ENV_VAR).unwrap_or_default(),
    )
}

// Serializes the tests that mutate the build-path environment variable
#[cfg(test)]
pub(crate) static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
