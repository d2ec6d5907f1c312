// Copyright (c) 2018-2022 The MobileCoin Foundation

//! This module provides the implementation of the all-in-one verifier for
//! public addresses.

use crate::{authority::Verifier as AuthorityVerifier, report::Verifier as ReportVerifier, Error};
use ed25519_dalek::Signature as Ed25519Signature;
use fog_report_types::{PublicAddress, ReportResponse};
use fog_x509_utils::{parse_chain, PublicKeyType, X509CertificateChain, X509KeyExtractor};
use schnorrkel::{PublicKey as SchnorrkelPublic, Signature as SchnorrkelSignature};

impl crate::Verifier for PublicAddress {
    fn verify_fog_sig(
        &self,
        report_response: &ReportResponse,
        anchors: &[Vec<u8>],
    ) -> Result<(), Error> {
        // Verify the chain and locate the anchored root.
        let certs = parse_chain(&report_response.chain)?;
        let root = certs.verified_root(anchors)?;

        // Verify the authority signature over the root's raw
        // subjectPublicKeyInfo. The transcript must match the signer's
        // exactly, or every valid signature will be rejected.
        if self.fog_authority_sig.is_empty() {
            return Err(Error::NoSignature);
        }
        let view_key =
            SchnorrkelPublic::from_bytes(&self.view_public_key).map_err(|_e| Error::SignatureParse)?;
        let authority_sig = SchnorrkelSignature::from_bytes(&self.fog_authority_sig)
            .map_err(|_e| Error::SignatureParse)?;
        view_key
            .verify_authority_sig_bytes(root.subject_public_key_info().spki(), &authority_sig)
            .map_err(Error::Authority)?;

        // Verify the signature over the reports matches the leaf of the
        // verified chain.
        match certs
            .leaf()?
            .public_key()
            .map_err(Error::UnsupportedKeyType)?
        {
            PublicKeyType::Ed25519(pubkey) => {
                let sig = Ed25519Signature::from_slice(&report_response.signature)
                    .map_err(|_e| Error::SignatureParse)?;
                pubkey
                    .verify_reports(&report_response.reports, &sig)
                    .map_err(Error::Report)
            }
        }
    }
}
