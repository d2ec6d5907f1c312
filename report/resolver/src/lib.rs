// Copyright (c) 2018-2022 The MobileCoin Foundation

//! Logic for representing fog public keys from the fog-report server
//! that have been fully validated, and the associated metadata.

#![deny(missing_docs)]

use fog_report_types::{FogReportResponses, PublicAddress};
use fog_report_validation::{
    FogPubkeyError, FogPubkeyResolver, FullyValidatedFogPubkey, IngestReportVerifier, TrustConfig,
};
use fog_sig::Verifier as FogSigVerifier;
use serde::{Deserialize, Serialize};

/// A collection of unvalidated fog reports, together with the trust
/// configuration used to validate them. This object is passed to the
/// transaction builder. When fog is not involved, it can simply be
/// defaulted.
///
/// Once constructed, this object can get validated fog pubkeys to build
/// fog hints for transactions, without talking to the internet. Only
/// getting the FogReportResponses requires an online connection.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct FogResolver {
    responses: FogReportResponses,
    verifier: IngestReportVerifier,
    root_anchors: Vec<Vec<u8>>,
}

impl FogResolver {
    /// Create a new FogResolver object, given (unverified) fog report
    /// server responses and the trust configuration for validating them.
    pub fn new(responses: FogReportResponses, config: &TrustConfig) -> Self {
        Self {
            responses,
            verifier: IngestReportVerifier::from(config),
            root_anchors: config.root_anchors.clone(),
        }
    }
}

impl FogPubkeyResolver for FogResolver {
    fn get_fog_pubkey(
        &self,
        recipient: &PublicAddress,
    ) -> Result<FullyValidatedFogPubkey, FogPubkeyError> {
        let url = recipient
            .fog_report_url()
            .ok_or(FogPubkeyError::NoFogReportUrl)?;
        if let Some(response) = self.responses.get(url) {
            // Verify the authority signature chain
            recipient.verify_fog_sig(response, &self.root_anchors)?;

            // Get the report corresponding to our ID. Report servers must
            // not serve duplicate IDs, so more than one match means the
            // response is not trustworthy.
            let report_id = recipient.fog_report_id();
            let mut matched = response
                .reports
                .iter()
                .filter(|report| report.fog_report_id == report_id);
            let report = matched.next().ok_or_else(|| {
                FogPubkeyError::NoMatchingReportId(url.to_owned(), report_id.to_owned())
            })?;
            if matched.next().is_some() {
                return Err(FogPubkeyError::AmbiguousReportId(
                    url.to_owned(),
                    report_id.to_owned(),
                ));
            }

            Ok(self.verifier.validate_ingest_report(&report.report)?)
        } else {
            Err(FogPubkeyError::NoMatchingReportResponse(url.to_owned()))
        }
    }
}
