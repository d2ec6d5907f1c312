// Copyright (c) 2018-2022 The MobileCoin Foundation

#![deny(missing_docs)]

//! Logic for representing fog public keys from the fog-report server that
//! have been fully validated, and the associated metadata.

/// Trust configuration injected into verifiers
pub mod config;
/// Data structures for fog-ingest report validation
pub mod ingest_report;

mod traits;

pub use crate::{
    config::{ConfigError, Measurement, TrustConfig},
    ingest_report::{AttestationReportData, IngestReportVerifier},
    traits::{FogPubkeyError, FogPubkeyResolver, FullyValidatedFogPubkey},
};
