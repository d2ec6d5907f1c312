// Copyright (c) 2018-2022 The MobileCoin Foundation

use crate::ingest_report::Error as IngestReportError;
use curve25519_dalek::ristretto::RistrettoPoint;
use displaydoc::Display;
use fog_report_types::PublicAddress;
use fog_sig::Error as FogSigError;

/// Class that can resolve a public address to a fully-validated fog public
/// key structure, including the pubkey expiry data from the report server.
pub trait FogPubkeyResolver {
    /// Fetch and validate a fog public key, given a recipient's public
    /// address
    fn get_fog_pubkey(
        &self,
        recipient: &PublicAddress,
    ) -> Result<FullyValidatedFogPubkey, FogPubkeyError>;
}

/// Represents a fog public key validated to use for creating encrypted fog
/// hints. This object should be constructed only when the attestation
/// evidence has been validated, the chain of trust over the response has
/// been validated, and the fog user's fog_authority_sig over the root
/// subjectPublicKeyInfo in the signature chain has been validated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FullyValidatedFogPubkey {
    /// The ristretto curve point which was extracted from the report body
    /// after validation. This is the encryption key used to create
    /// encrypted fog hints. The corresponding private key lives only in
    /// ingest nodes.
    pub pubkey: RistrettoPoint,
    /// The pubkey_expiry value is the latest block that fog-service
    /// promises that is valid to encrypt fog hints using this key for.
    /// The client should obey this limit by not setting tombstone block
    /// for a transaction larger than this limit if the fog pubkey is used.
    pub pubkey_expiry: u64,
}

/// An error that can occur when trying to get a validated fog pubkey from
/// the FogResolver object
#[derive(Display, Debug)]
pub enum FogPubkeyError {
    /// No matching reports response for url = {0}
    NoMatchingReportResponse(String),
    /// No matching report id for url = {0}, report_id = {1}
    NoMatchingReportId(String, String),
    /// Multiple reports match url = {0}, report_id = {1}
    AmbiguousReportId(String, String),
    /// Address has no fog_report_url, cannot fetch fog pubkey
    NoFogReportUrl,
    /// Signature verification error: {0}
    FogSig(FogSigError),
    /// Ingest report verification error: {0}
    IngestReport(IngestReportError),
}

impl From<FogSigError> for FogPubkeyError {
    fn from(src: FogSigError) -> Self {
        Self::FogSig(src)
    }
}

impl From<IngestReportError> for FogPubkeyError {
    fn from(src: IngestReportError) -> Self {
        Self::IngestReport(src)
    }
}
