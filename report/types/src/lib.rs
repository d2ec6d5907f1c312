// Copyright (c) 2018-2022 The MobileCoin Foundation

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

//! This crate provides prost versions of the types exchanged with a fog
//! report server. Keeping these as a standalone prost layer means
//! `fog-report-validation` does not depend on any grpc transport crate.

extern crate alloc;

use alloc::{collections::BTreeMap, string::String, vec::Vec};
use prost::Message;
use serde::{Deserialize, Serialize};

/// Attestation evidence for a fog ingest enclave.
///
/// The body is a canonical JSON attestation report; the signature is made
/// by the leaf of the signing chain over the exact body bytes.
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize, Message)]
pub struct AttestationEvidence {
    /// Signature over `body`, made by the leaf of `chain`.
    #[prost(bytes, tag = "1")]
    pub sig: Vec<u8>,
    /// Report-signing certificate chain, as DER-encoded bytes, leaf first.
    #[prost(bytes, repeated, tag = "2")]
    pub chain: Vec<Vec<u8>>,
    /// The canonical JSON report body, as a byte sequence.
    #[prost(bytes, tag = "3")]
    pub body: Vec<u8>,
}

/// A fog report from the report server
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize, Message)]
pub struct Report {
    /// The fog_report_id of the report
    #[prost(string, tag = "1")]
    pub fog_report_id: String,
    /// The attestation evidence backing this report.
    ///
    /// The validated one-time pubkey and its expiry are embedded in the
    /// evidence body and extracted only after validation.
    #[prost(message, required, tag = "2")]
    pub report: AttestationEvidence,
}

/// An entire response from the report server
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize, Message)]
pub struct ReportResponse {
    /// A list of reports provided by the server.
    #[prost(message, repeated, tag = "1")]
    pub reports: Vec<Report>,
    /// A chain of DER-encoded X.509 certificates, from leaf to root.
    ///
    /// The key type of the leaf certificate determines the correct
    /// parsing of the signature.
    #[prost(bytes, repeated, tag = "2")]
    pub chain: Vec<Vec<u8>>,
    /// A signature over the canonical serialization of the reports,
    /// made by the leaf of `chain`.
    #[prost(bytes, tag = "3")]
    pub signature: Vec<u8>,
}

/// The public address of a fog recipient, trimmed to the fields the
/// report-resolution pipeline reads.
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize, Message)]
pub struct PublicAddress {
    /// The recipient's view public key (32 byte compressed Ristretto).
    #[prost(bytes, tag = "1")]
    pub view_public_key: Vec<u8>,
    /// The recipient's spend public key (32 byte compressed Ristretto).
    #[prost(bytes, tag = "2")]
    pub spend_public_key: Vec<u8>,
    /// The fog report server responsible for fog hints to this recipient,
    /// or empty if the recipient does not use a fog service.
    #[prost(string, tag = "3")]
    pub fog_report_url: String,
    /// The fog report id used to select a report from the server's
    /// response. Empty is a valid id.
    #[prost(string, tag = "4")]
    pub fog_report_id: String,
    /// The recipient's view-key signature over the root subjectPublicKeyInfo
    /// of the report server's certificate chain (64 bytes).
    #[prost(bytes, tag = "5")]
    pub fog_authority_sig: Vec<u8>,
}

impl PublicAddress {
    /// Get the fog report url, if any.
    pub fn fog_report_url(&self) -> Option<&str> {
        if self.fog_report_url.is_empty() {
            None
        } else {
            Some(&self.fog_report_url)
        }
    }

    /// Get the fog report id. The empty string is a valid id.
    pub fn fog_report_id(&self) -> &str {
        &self.fog_report_id
    }
}

/// Represents a set of unvalidated responses from fog report servers.
/// Key = fog url that was contacted, must match the string in the user's
/// public address. Value = the complete response from the report server.
///
/// When constructing a transaction, the fog url for each recipient should
/// be extracted from their public address, then a request to that report
/// server should be made, and the responses collected in this map. The map
/// is ultimately consumed by the resolver, which validates the responses
/// against the fog data in the public addresses.
///
/// This map should not be cached long-term: the fog pubkeys carry an
/// expiry, and a transaction built against an expired key will be rejected.
/// In the off-line transaction flow, the map is produced on the connected
/// machine and carried to the air-gapped one, which is why it is plain
/// serializable data rather than a live connection handle.
pub type FogReportResponses = BTreeMap<String, ReportResponse>;
