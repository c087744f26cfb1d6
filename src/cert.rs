// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Fabric Client Authors
use openssl::error::ErrorStack;
use openssl::x509::store::{X509Store, X509StoreBuilder};
use openssl::x509::X509;
use std::fs;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrustStoreError {
    /// Error reading the trust anchor file
    #[error("failed to read trust anchor file {path}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// Error parsing the trust anchor as an X509 certificate
    #[error("failed to parse trust anchor as an X509 certificate")]
    ParseCertificate(#[source] ErrorStack),

    /// Error assembling the openssl trust store
    #[error("failed to build X509 trust store")]
    Store(#[source] ErrorStack),
}

/// In-memory pool of trusted certificate authorities for validating TLS
/// peers. Never merged with the system trust store.
pub struct CertPool {
    anchors: Vec<X509>,
}

impl CertPool {
    pub fn empty() -> Self {
        CertPool {
            anchors: Vec::new(),
        }
    }

    pub fn add(&mut self, cert: X509) {
        self.anchors.push(cert);
    }

    pub fn anchors(&self) -> &[X509] {
        &self.anchors
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Assemble an openssl `X509Store` holding every anchor in the pool,
    /// suitable for TLS peer verification.
    pub fn into_store(self) -> Result<X509Store, TrustStoreError> {
        let mut builder =
            X509StoreBuilder::new().map_err(TrustStoreError::Store)?;
        for cert in self.anchors {
            builder.add_cert(cert).map_err(TrustStoreError::Store)?;
        }
        Ok(builder.build())
    }
}

impl Default for CertPool {
    fn default() -> Self {
        CertPool::empty()
    }
}

/// Build a trust pool from the PEM file at `tls_certificate`.
///
/// An empty path yields an empty pool. An unreadable file is an ordinary
/// error; a file whose content does not parse as a certificate is a
/// malformed trust anchor the caller has no reasonable fallback for and
/// should treat as fatal. Only the first PEM block is consumed; no chain
/// validation or expiry check is performed.
pub fn tls_ca_cert_pool(
    tls_certificate: &str,
) -> Result<CertPool, TrustStoreError> {
    let mut pool = CertPool::empty();
    if !tls_certificate.is_empty() {
        let contents = fs::read(tls_certificate).map_err(|source| {
            TrustStoreError::Read {
                path: tls_certificate.to_string(),
                source,
            }
        })?;
        pool.add(load_trust_anchor(&contents)?);
    }
    Ok(pool)
}

// Parse the first PEM block as a single X509 certificate
fn load_trust_anchor(raw: &[u8]) -> Result<X509, TrustStoreError> {
    X509::from_pem(raw).map_err(TrustStoreError::ParseCertificate)
}
