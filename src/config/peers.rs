// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Fabric Client Authors
use crate::config::{expand_build_path, ClientConfigError, Settings};
use config::{Map, Value};
use serde::Deserialize;

/// Resolved network and TLS descriptor for one ledger peer.
///
/// Ports are decimal strings coerced from their integer settings. The TLS
/// certificate path has the build-path placeholder already expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerEndpoint {
    pub host: String,
    pub port: String,
    pub event_host: String,
    pub event_port: String,
    pub tls_certificate: String,
    pub tls_server_host_override: String,
}

// First of the two encodings the settings backend may hand back for a peer
// entry: a value that deserializes directly into the expected shape. The
// `tls` table is mandatory in both encodings.
#[derive(Debug, Deserialize)]
struct RawPeerEntry {
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    port: Option<i64>,
    #[serde(default)]
    event_host: Option<String>,
    #[serde(default)]
    event_port: Option<i64>,
    tls: RawTlsSection,
}

#[derive(Debug, Deserialize)]
struct RawTlsSection {
    #[serde(default)]
    certificate: Option<String>,
    #[serde(default)]
    serverhostoverride: Option<String>,
}

// Fields pulled out of either encoding, before required-field validation.
struct PeerFields {
    host: String,
    port: Option<i64>,
    event_host: String,
    event_port: Option<i64>,
    tls_certificate: String,
    tls_server_host_override: String,
}

impl Settings {
    /// Extract every peer endpoint under `client.peers`.
    ///
    /// Entries are emitted in backend map-iteration order, which is
    /// unspecified. Field extraction is lenient, but an assembled record with
    /// an empty `host`, `port`, `event_host` or `event_port` is an error
    /// naming the offending entry, as is an empty `tls.certificate` while TLS
    /// is globally enabled. An absent `client.peers` table yields no peers.
    pub fn peers(&self) -> Result<Vec<PeerEndpoint>, ClientConfigError> {
        let tls_enabled = self.tls_enabled();
        let entries = self
            .backend()
            .get_table("client.peers")
            .unwrap_or_default();
        let mut peers = Vec::with_capacity(entries.len());
        for (label, value) in entries {
            let fields = decode_entry(&label, value)?;
            peers.push(assemble(&label, fields, tls_enabled)?);
        }
        Ok(peers)
    }
}

// Resolve the entry's encoding at read time: attempt the directly
// deserializable shape first and fall back to traversing a generic table,
// pulling each field leniently. A value that is no table at all, or whose
// `tls` key is missing or no table, is a malformed entry.
fn decode_entry(
    label: &str,
    value: Value,
) -> Result<PeerFields, ClientConfigError> {
    if let Ok(entry) = value.clone().try_deserialize::<RawPeerEntry>() {
        return Ok(PeerFields {
            host: entry.host.unwrap_or_default(),
            port: entry.port,
            event_host: entry.event_host.unwrap_or_default(),
            event_port: entry.event_port,
            tls_certificate: entry.tls.certificate.unwrap_or_default(),
            tls_server_host_override: entry
                .tls
                .serverhostoverride
                .unwrap_or_default(),
        });
    }

    let mut table = value.into_table().map_err(|_| {
        ClientConfigError::MalformedPeerEntry {
            label: label.to_string(),
        }
    })?;
    let mut tls = match table.remove("tls") {
        Some(section) => section.into_table().map_err(|_| {
            ClientConfigError::MalformedTlsSection {
                label: label.to_string(),
            }
        })?,
        None => {
            return Err(ClientConfigError::MalformedTlsSection {
                label: label.to_string(),
            })
        }
    };
    Ok(PeerFields {
        host: take_string(&mut table, "host"),
        port: take_int(&mut table, "port"),
        event_host: take_string(&mut table, "event_host"),
        event_port: take_int(&mut table, "event_port"),
        tls_certificate: take_string(&mut tls, "certificate"),
        tls_server_host_override: take_string(&mut tls, "serverhostoverride"),
    })
}

fn assemble(
    label: &str,
    fields: PeerFields,
    tls_enabled: bool,
) -> Result<PeerEndpoint, ClientConfigError> {
    let missing = |field| ClientConfigError::MissingPeerField {
        field,
        label: label.to_string(),
    };
    if fields.host.is_empty() {
        return Err(missing("host"));
    }
    let port = fields.port.ok_or_else(|| missing("port"))?;
    if fields.event_host.is_empty() {
        return Err(missing("event_host"));
    }
    let event_port = fields.event_port.ok_or_else(|| missing("event_port"))?;
    if tls_enabled && fields.tls_certificate.is_empty() {
        return Err(missing("tls.certificate"));
    }
    Ok(PeerEndpoint {
        host: fields.host,
        port: port.to_string(),
        event_host: fields.event_host,
        event_port: event_port.to_string(),
        tls_certificate: expand_build_path(&fields.tls_certificate),
        tls_server_host_override: fields.tls_server_host_override,
    })
}

fn take_string(table: &mut Map<String, Value>, key: &str) -> String {
    table
        .remove(key)
        .and_then(|v| v.into_string().ok())
        .unwrap_or_default()
}

fn take_int(table: &mut Map<String, Value>, key: &str) -> Option<i64> {
    table.remove(key).and_then(|v| v.into_int().ok())
}
