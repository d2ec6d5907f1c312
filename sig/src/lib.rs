// Copyright (c) 2018-2022 The MobileCoin Foundation

#![deny(missing_docs)]

//! Verification of the signatures bundled in a fog report-server response.
//!
//! A response is trusted when three links hold together: the certificate
//! chain validates against the configured trust anchors, the recipient's
//! view key signed the root of that chain (the authority signature), and
//! the chain's leaf key signed the report list.

pub mod authority;
pub mod report;

mod public_address;

use displaydoc::Display;
use fog_report_types::ReportResponse;
use fog_x509_utils::{ChainError, KeyError};

/// An enumeration of errors which can occur when verifying a signature set.
#[derive(Debug, Display)]
pub enum Error {
    /// The public address does not have a fog authority signature
    NoSignature,
    /// The signature or key material has an invalid length or encoding
    SignatureParse,
    /// There was an error verifying the authority signature: {0}
    Authority(schnorrkel::SignatureError),
    /// There was an error parsing or verifying the chain: {0}
    Chain(ChainError),
    /// The leaf certificate key type is not supported: {0}
    UnsupportedKeyType(KeyError),
    /// There was an error verifying the report signature: {0}
    Report(ed25519_dalek::SignatureError),
}

impl From<ChainError> for Error {
    fn from(src: ChainError) -> Self {
        Error::Chain(src)
    }
}

/// A trait which will verify the fog authority signature, the certificate
/// chain, and the signature over the report list.
pub trait Verifier {
    /// Verify the signatures and data bundled in the report server
    /// response, against the given DER-encoded trust anchors.
    fn verify_fog_sig(
        &self,
        report_response: &ReportResponse,
        anchors: &[Vec<u8>],
    ) -> Result<(), Error>;
}
