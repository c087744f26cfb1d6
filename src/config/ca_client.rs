// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Fabric Client Authors
use crate::config::{ClientConfigError, Settings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Fixed path of the generated CA client configuration file. The path is the
/// contract with the external CA client and is overwritten on every export.
pub static CA_CLIENT_CONFIG_PATH: &str = "/tmp/client-config.json";

/// Client configuration in the shape expected by the external
/// certificate-issuing service, mirrored from the `client.fabricCA`
/// sub-document.
///
/// The settings backend stores keys lowercased, so deserialization matches
/// `serverurl` while the JSON contract keeps the `serverURL` spelling.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CAClientConfig {
    #[serde(
        rename(serialize = "serverURL", deserialize = "serverurl"),
        default
    )]
    pub server_url: String,
    #[serde(default)]
    pub certfiles: Vec<String>,
    #[serde(default)]
    pub client: CAClientKeyPair,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CAClientKeyPair {
    #[serde(default)]
    pub keyfile: String,
    #[serde(default)]
    pub certfile: String,
}

impl Settings {
    /// Materialize the `client.fabricCA` sub-document as a JSON file in the
    /// format expected by the CA client and return its fixed path.
    ///
    /// The file is overwritten in place with mode 0644. An absent
    /// sub-document is not an error: the export falls back to the all-empty
    /// descriptor, matching the silent-default convention of the scalar
    /// accessors. Unlike the peer accessors, every failure here is an
    /// ordinary error for the caller to handle: the sub-document not
    /// decoding, the JSON encoding, or the write itself. Concurrent callers
    /// race on the shared path, last write wins.
    pub fn ca_client_config_path(&self) -> Result<PathBuf, ClientConfigError> {
        let ca_config: CAClientConfig =
            match self.backend().get("client.fabricCA") {
                Ok(ca_config) => ca_config,
                Err(config::ConfigError::NotFound(_)) => {
                    CAClientConfig::default()
                }
                Err(e) => return Err(e.into()),
            };
        let json = serde_json::to_vec(&ca_config)?;
        let path = Path::new(CA_CLIENT_CONFIG_PATH);
        let write_error = |source| ClientConfigError::WriteDerivedFile {
            path: CA_CLIENT_CONFIG_PATH.to_string(),
            source,
        };
        fs::write(path, &json).map_err(write_error)?;
        fs::set_permissions(path, fs::Permissions::from_mode(0o644))
            .map_err(write_error)?;
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Serializes the tests that write the shared fixed export path
    static EXPORT_MUTEX: Mutex<()> = Mutex::new(());

    fn settings_from(contents: &str) -> Settings {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&path)
            .expect("failed to create config file");
        write!(file, "{contents}").expect("failed to write config file");
        Settings::load(Some(&path)).expect("failed to load settings")
    }

    #[test]
    fn test_export_round_trip_and_idempotency() {
        let _guard = EXPORT_MUTEX.lock().expect("export mutex poisoned");
        let settings = settings_from(
            r#"
client:
  fabricCA:
    id: ca-org1
    serverURL: https://ca:7054
    certfiles:
      - a.pem
    client:
      keyfile: k.pem
      certfile: c.pem
"#,
        );
        let path = settings
            .ca_client_config_path()
            .expect("failed to export CA client config");
        assert_eq!(path, PathBuf::from(CA_CLIENT_CONFIG_PATH));

        let first = fs::read(&path).expect("failed to read exported file");
        let parsed: serde_json::Value =
            serde_json::from_slice(&first).expect("exported file is not JSON");
        assert_eq!(parsed["serverURL"], "https://ca:7054");
        assert_eq!(parsed["certfiles"], serde_json::json!(["a.pem"]));
        assert_eq!(parsed["client"]["keyfile"], "k.pem");
        assert_eq!(parsed["client"]["certfile"], "c.pem");

        let mode = fs::metadata(&path)
            .expect("failed to stat exported file")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o644);

        // A second export with unchanged settings is byte-identical
        let path = settings
            .ca_client_config_path()
            .expect("failed to re-export CA client config");
        let second = fs::read(&path).expect("failed to read exported file");
        assert_eq!(first, second);
    }

    #[test]
    fn test_absent_sub_document_exports_default_descriptor() {
        let _guard = EXPORT_MUTEX.lock().expect("export mutex poisoned");
        let settings = settings_from("client:\n  tls:\n    enabled: false\n");
        let path = settings
            .ca_client_config_path()
            .expect("failed to export default CA client config");
        let parsed: serde_json::Value = serde_json::from_slice(
            &fs::read(&path).expect("failed to read exported file"),
        )
        .expect("exported file is not JSON");
        assert_eq!(parsed["serverURL"], "");
        assert_eq!(parsed["certfiles"], serde_json::json!([]));
        assert_eq!(parsed["client"]["keyfile"], "");
        assert_eq!(parsed["client"]["certfile"], "");
    }

    #[test]
    fn test_mis_shaped_sub_document_is_an_error() {
        let settings = settings_from("client:\n  fabricCA: oops\n");
        let r = settings.ca_client_config_path();
        assert!(matches!(r, Err(ClientConfigError::Backend(_))));
    }

    #[test]
    fn test_partial_sub_document_uses_defaults() {
        let settings = settings_from(
            "client:\n  fabricCA:\n    serverURL: https://ca:7054\n",
        );
        let ca_config: CAClientConfig = settings
            .backend()
            .get("client.fabricCA")
            .expect("failed to decode CA client config");
        assert_eq!(
            ca_config,
            CAClientConfig {
                server_url: "https://ca:7054".to_string(),
                certfiles: Vec::new(),
                client: CAClientKeyPair::default(),
            }
        );
    }
}
