// Copyright (c) 2018-2022 The MobileCoin Foundation

//! Validation of fog ingest attestation evidence at runtime.

use crate::{config::TrustConfig, traits::FullyValidatedFogPubkey};
use curve25519_dalek::ristretto::CompressedRistretto;
use displaydoc::Display;
use fog_report_types::AttestationEvidence;
use fog_x509_utils::{parse_chain, ChainError, X509CertificateChain};
use ring::signature::{UnparsedPublicKey, RSA_PKCS1_2048_8192_SHA256};
use serde::{Deserialize, Serialize};

/// The parsed contents of a signed report body.
///
/// Unknown fields are ignored so the attestation service can extend the
/// body without breaking deployed verifiers.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct AttestationReportData {
    /// Report ID issued by the attestation service
    pub id: String,
    /// Timestamp the report was generated, as a string
    pub timestamp: String,
    /// Quote status
    pub quote_status: String,
    /// The measurement of the enclave which generated the report
    #[serde(with = "hex::serde")]
    pub enclave_measurement: [u8; 32],
    /// The compressed Ristretto ingest public key attested to
    #[serde(with = "hex::serde")]
    pub pubkey: [u8; 32],
    /// The last block index the key is valid to encrypt hints for
    pub pubkey_expiry: u64,
}

/// An error that can occur when validating ingest attestation evidence
#[derive(Debug, Display, Eq, PartialEq)]
pub enum Error {
    /// Chain error: {0}
    Chain(ChainError),
    /// The signature over the report body does not verify
    BadSignature,
    /// The report body could not be parsed: {0}
    MalformedBody(String),
    /// The quote status is not accepted: {0}
    QuoteStatusRejected(String),
    /// The enclave measurement is not in the allowed list
    MeasurementMismatch,
    /// The report pubkey is not a valid compressed Ristretto point
    InvalidPubkey,
}

impl From<ChainError> for Error {
    fn from(src: ChainError) -> Self {
        Self::Chain(src)
    }
}

/// A structure that can validate ingest attestation evidence and
/// measurements at runtime.
///
/// This is expected to take the evidence bundled in a report and produce
/// the validated and decompressed ingest public key.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct IngestReportVerifier {
    trust_config: TrustConfig,
}

impl IngestReportVerifier {
    /// Validate remote ingest attestation evidence, and extract the pubkey
    /// from the report body.
    ///
    /// Checks run in trust order: the signing chain must anchor before the
    /// signature is checked, and the signature must verify before any of
    /// the body's contents are interpreted.
    pub fn validate_ingest_report(
        &self,
        evidence: &AttestationEvidence,
    ) -> Result<FullyValidatedFogPubkey, Error> {
        let certs = parse_chain(&evidence.chain)?;
        certs.verified_root(&self.trust_config.root_anchors)?;

        // The chain's leaf is the evidence signing certificate. Its SPKI
        // key contents are the PKCS#1 RSAPublicKey ring expects.
        let signer = certs.leaf()?;
        UnparsedPublicKey::new(
            &RSA_PKCS1_2048_8192_SHA256,
            signer.subject_public_key_info().key(),
        )
        .verify(&evidence.body, &evidence.sig)
        .map_err(|_e| Error::BadSignature)?;

        let report_data: AttestationReportData = serde_json::from_slice(&evidence.body)
            .map_err(|e| Error::MalformedBody(e.to_string()))?;

        if !self
            .trust_config
            .accepted_quote_statuses
            .contains(&report_data.quote_status)
        {
            return Err(Error::QuoteStatusRejected(report_data.quote_status));
        }

        if !self
            .trust_config
            .allowed_measurements
            .iter()
            .any(|measurement| measurement.0 == report_data.enclave_measurement)
        {
            return Err(Error::MeasurementMismatch);
        }

        let pubkey = CompressedRistretto(report_data.pubkey)
            .decompress()
            .ok_or(Error::InvalidPubkey)?;

        Ok(FullyValidatedFogPubkey {
            pubkey,
            pubkey_expiry: report_data.pubkey_expiry,
        })
    }
}

impl From<&TrustConfig> for IngestReportVerifier {
    fn from(src: &TrustConfig) -> Self {
        Self {
            trust_config: src.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Measurement;
    use curve25519_dalek::constants::RISTRETTO_BASEPOINT_COMPRESSED;
    use rcgen::{
        BasicConstraints, Certificate, CertificateParams, DistinguishedName, DnType, IsCa, KeyPair,
    };
    use rsa::{
        pkcs8::EncodePrivateKey,
        pkcs1v15::SigningKey,
        signature::{SignatureEncoding, Signer},
        RsaPrivateKey,
    };
    use sha2::Sha256;
    use std::{collections::BTreeSet, sync::OnceLock};

    const MEASUREMENT: [u8; 32] = [0x42u8; 32];
    const PUBKEY_EXPIRY: u64 = 10_000;

    struct EvidenceAuthority {
        root_der: Vec<u8>,
        signer_der: Vec<u8>,
        signing_key: SigningKey<Sha256>,
    }

    // An Ed25519 root certifying the RSA evidence signing cert. RSA
    // keygen is expensive, so every test shares one authority.
    fn authority() -> &'static EvidenceAuthority {
        static AUTHORITY: OnceLock<EvidenceAuthority> = OnceLock::new();
        AUTHORITY.get_or_init(|| {
            let mut root_params = CertificateParams::new(Vec::<String>::new());
            root_params.alg = &rcgen::PKCS_ED25519;
            root_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
            let mut dn = DistinguishedName::new();
            dn.push(DnType::CommonName, "Fog Evidence Root");
            root_params.distinguished_name = dn;
            let root = Certificate::from_params(root_params).expect("Could not create root");

            let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), 2048)
                .expect("Could not create RSA key");
            let pkcs8 = private_key
                .to_pkcs8_der()
                .expect("Could not encode RSA key");

            let mut params = CertificateParams::new(Vec::<String>::new());
            params.alg = &rcgen::PKCS_RSA_SHA256;
            let mut dn = DistinguishedName::new();
            dn.push(DnType::CommonName, "Fog Evidence Signer");
            params.distinguished_name = dn;
            params.key_pair =
                Some(KeyPair::from_der(pkcs8.as_bytes()).expect("Could not import RSA key"));
            let signer = Certificate::from_params(params).expect("Could not create signer cert");

            EvidenceAuthority {
                signer_der: signer
                    .serialize_der_with_signer(&root)
                    .expect("Could not sign signer cert"),
                root_der: root.serialize_der().expect("Could not serialize root"),
                signing_key: SigningKey::new(private_key),
            }
        })
    }

    fn report_body(quote_status: &str, measurement: [u8; 32], pubkey: [u8; 32]) -> Vec<u8> {
        serde_json::json!({
            "id": "165171271757108173876306223827987629752",
            "timestamp": "2022-06-22T21:40:12.821544",
            "quote_status": quote_status,
            "enclave_measurement": hex::encode(measurement),
            "pubkey": hex::encode(pubkey),
            "pubkey_expiry": PUBKEY_EXPIRY,
        })
        .to_string()
        .into_bytes()
    }

    fn signed_evidence(body: Vec<u8>) -> AttestationEvidence {
        let authority = authority();
        let sig = authority.signing_key.sign(&body).to_vec();
        AttestationEvidence {
            sig,
            chain: vec![authority.signer_der.clone(), authority.root_der.clone()],
            body,
        }
    }

    fn trust_config() -> TrustConfig {
        TrustConfig {
            root_anchors: vec![authority().root_der.clone()],
            accepted_quote_statuses: BTreeSet::from([
                "OK".to_owned(),
                "SW_HARDENING_NEEDED".to_owned(),
            ]),
            allowed_measurements: vec![Measurement(MEASUREMENT)],
        }
    }

    #[test]
    fn well_formed_evidence_validates() {
        let evidence = signed_evidence(report_body(
            "OK",
            MEASUREMENT,
            RISTRETTO_BASEPOINT_COMPRESSED.to_bytes(),
        ));
        let verifier = IngestReportVerifier::from(&trust_config());

        let validated = verifier
            .validate_ingest_report(&evidence)
            .expect("Could not validate evidence");
        assert_eq!(
            validated.pubkey.compress(),
            RISTRETTO_BASEPOINT_COMPRESSED
        );
        assert_eq!(validated.pubkey_expiry, PUBKEY_EXPIRY);
    }

    #[test]
    fn empty_chain_is_rejected() {
        let mut evidence = signed_evidence(report_body(
            "OK",
            MEASUREMENT,
            RISTRETTO_BASEPOINT_COMPRESSED.to_bytes(),
        ));
        evidence.chain.clear();
        let verifier = IngestReportVerifier::from(&trust_config());

        assert_eq!(
            verifier.validate_ingest_report(&evidence),
            Err(Error::Chain(ChainError::Empty))
        );
    }

    #[test]
    fn unanchored_signer_is_rejected() {
        let evidence = signed_evidence(report_body(
            "OK",
            MEASUREMENT,
            RISTRETTO_BASEPOINT_COMPRESSED.to_bytes(),
        ));
        let mut config = trust_config();
        config.root_anchors = vec![{
            let mut params = CertificateParams::new(Vec::<String>::new());
            params.alg = &rcgen::PKCS_ED25519;
            params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
            Certificate::from_params(params)
                .expect("Could not create anchor")
                .serialize_der()
                .expect("Could not serialize anchor")
        }];
        let verifier = IngestReportVerifier::from(&config);

        assert_eq!(
            verifier.validate_ingest_report(&evidence),
            Err(Error::Chain(ChainError::UntrustedRoot))
        );
    }

    #[test]
    fn tampered_body_fails_the_signature() {
        let mut evidence = signed_evidence(report_body(
            "OK",
            MEASUREMENT,
            RISTRETTO_BASEPOINT_COMPRESSED.to_bytes(),
        ));
        let index = evidence.body.len() - 2;
        evidence.body[index] ^= 0x01;
        let verifier = IngestReportVerifier::from(&trust_config());

        assert_eq!(
            verifier.validate_ingest_report(&evidence),
            Err(Error::BadSignature)
        );
    }

    #[test]
    fn signed_garbage_is_a_malformed_body() {
        let evidence = signed_evidence(b"not json at all".to_vec());
        let verifier = IngestReportVerifier::from(&trust_config());

        assert!(matches!(
            verifier.validate_ingest_report(&evidence),
            Err(Error::MalformedBody(_))
        ));
    }

    #[test]
    fn unaccepted_quote_status_is_rejected() {
        let evidence = signed_evidence(report_body(
            "GROUP_OUT_OF_DATE",
            MEASUREMENT,
            RISTRETTO_BASEPOINT_COMPRESSED.to_bytes(),
        ));
        let verifier = IngestReportVerifier::from(&trust_config());

        assert_eq!(
            verifier.validate_ingest_report(&evidence),
            Err(Error::QuoteStatusRejected("GROUP_OUT_OF_DATE".to_owned()))
        );
    }

    #[test]
    fn unknown_measurement_is_rejected() {
        let evidence = signed_evidence(report_body(
            "OK",
            [0x43u8; 32],
            RISTRETTO_BASEPOINT_COMPRESSED.to_bytes(),
        ));
        let verifier = IngestReportVerifier::from(&trust_config());

        assert_eq!(
            verifier.validate_ingest_report(&evidence),
            Err(Error::MeasurementMismatch)
        );
    }

    #[test]
    fn undecompressable_pubkey_is_rejected() {
        let evidence = signed_evidence(report_body("OK", MEASUREMENT, [0xffu8; 32]));
        let verifier = IngestReportVerifier::from(&trust_config());

        assert_eq!(
            verifier.validate_ingest_report(&evidence),
            Err(Error::InvalidPubkey)
        );
    }
}
