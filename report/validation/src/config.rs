// Copyright (c) 2018-2022 The MobileCoin Foundation

//! Trust configuration for attestation-evidence validation.

use displaydoc::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A 32-byte enclave measurement, displayed and serialized as hex.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Measurement(#[serde(with = "hex::serde")] pub [u8; 32]);

impl AsRef<[u8]> for Measurement {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Measurement {
    fn from(src: [u8; 32]) -> Self {
        Self(src)
    }
}

/// An error which can occur when loading trust anchors.
#[derive(Debug, Display)]
pub enum ConfigError {
    /// Could not parse the anchor PEM string: {0}
    Pem(pem::PemError),
    /// The anchor PEM string contains no certificates
    Empty,
}

impl From<pem::PemError> for ConfigError {
    fn from(src: pem::PemError) -> Self {
        Self::Pem(src)
    }
}

/// The trust parameters a verifier is configured with.
///
/// These are deployment policy, not wire data, and are therefore injected
/// by the caller rather than read from a report server response.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TrustConfig {
    /// DER-encoded certificates the evidence signing chain must root in.
    pub root_anchors: Vec<Vec<u8>>,
    /// Quote statuses which are acceptable in a report body.
    pub accepted_quote_statuses: BTreeSet<String>,
    /// Enclave measurements which are acceptable in a report body.
    pub allowed_measurements: Vec<Measurement>,
}

impl TrustConfig {
    /// Build a configuration from a PEM string containing one or more
    /// anchor certificates.
    pub fn from_pem_anchors(
        pem_string: &str,
        accepted_quote_statuses: BTreeSet<String>,
        allowed_measurements: Vec<Measurement>,
    ) -> Result<Self, ConfigError> {
        let root_anchors = pem::parse_many(pem_string)?
            .into_iter()
            .map(pem::Pem::into_contents)
            .collect::<Vec<_>>();
        if root_anchors.is_empty() {
            return Err(ConfigError::Empty);
        }

        Ok(Self {
            root_anchors,
            accepted_quote_statuses,
            allowed_measurements,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rcgen::{BasicConstraints, Certificate, CertificateParams, IsCa};

    fn anchor_pem() -> (String, Vec<Vec<u8>>) {
        let mut pem_string = String::default();
        let mut ders = Vec::default();
        for _ in 0..2 {
            let mut params = CertificateParams::new(Vec::<String>::new());
            params.alg = &rcgen::PKCS_ED25519;
            params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
            let cert = Certificate::from_params(params).expect("Could not create anchor");
            pem_string.push_str(&cert.serialize_pem().expect("Could not serialize anchor"));
            ders.push(cert.serialize_der().expect("Could not serialize anchor"));
        }
        (pem_string, ders)
    }

    #[test]
    fn pem_anchors_are_loaded_in_order() {
        let (pem_string, ders) = anchor_pem();
        let config = TrustConfig::from_pem_anchors(
            &pem_string,
            BTreeSet::from(["OK".to_owned()]),
            vec![Measurement([1u8; 32])],
        )
        .expect("Could not load anchors");
        assert_eq!(config.root_anchors, ders);
    }

    #[test]
    fn empty_pem_is_rejected() {
        assert!(matches!(
            TrustConfig::from_pem_anchors("", BTreeSet::default(), Vec::default()),
            Err(ConfigError::Empty)
        ));
    }

    #[test]
    fn measurement_serializes_as_hex() {
        let measurement = Measurement([0xabu8; 32]);
        let json = serde_json::to_string(&measurement).expect("Could not serialize");
        assert_eq!(json, format!("\"{}\"", "ab".repeat(32)));
        let parsed: Measurement = serde_json::from_str(&json).expect("Could not deserialize");
        assert_eq!(parsed, measurement);
    }
}
