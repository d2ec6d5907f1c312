// Copyright (c) 2018-2022 The MobileCoin Foundation

//! This module provides traits and methods for the signing and
//! verification of report server responses, and the canonical
//! serialization of the report list the signature covers.

use ed25519_dalek::{Signature, SignatureError, Signer as DalekSigner, SigningKey, VerifyingKey};
use fog_report_types::Report;
use prost::Message;

/// The context tag/domain separator for report-list signatures
const DOMAIN_SEPARATOR: &[u8; 18] = b"Fog ingest reports";

/// Retrieve the domain separator used to sign a report server response
pub fn context() -> &'static [u8] {
    DOMAIN_SEPARATOR
}

/// The canonical byte string covered by the report-list signature: the
/// domain separator followed by each report's length-delimited prost
/// encoding, in list order.
///
/// Signature verification is byte-exact, so this encoding is fixed;
/// prost's output for a given message is deterministic and the length
/// delimiters make the framing unambiguous.
pub fn reports_message(reports: &[Report]) -> Vec<u8> {
    let mut message = Vec::from(context());
    for report in reports {
        message.extend_from_slice(&report.encode_length_delimited_to_vec());
    }
    message
}

/// A trait which private keyholders can implement to allow them to sign a
/// report list with the appropriate domain separator.
pub trait Signer {
    /// Sign a list of reports.
    fn sign_reports(&self, reports: &[Report]) -> Signature;
}

/// A trait which public keys can implement to allow them to verify a
/// signature over a report list with the appropriate domain separator.
pub trait Verifier {
    /// Verify the provided signature is valid over the reports.
    fn verify_reports(&self, reports: &[Report], sig: &Signature) -> Result<(), SignatureError>;
}

impl Signer for SigningKey {
    fn sign_reports(&self, reports: &[Report]) -> Signature {
        DalekSigner::sign(self, &reports_message(reports))
    }
}

impl Verifier for VerifyingKey {
    fn verify_reports(&self, reports: &[Report], sig: &Signature) -> Result<(), SignatureError> {
        self.verify_strict(&reports_message(reports), sig)
    }
}
