// Copyright (c) 2018-2022 The MobileCoin Foundation

//! This module contains the traits for creating and verifying signatures
//! over fog authority public keys and the canonical signing
//! context/domain separator byte string.

use schnorrkel::{signing_context, Keypair, PublicKey, Signature, SignatureError};

/// The context tag/domain separator for fog authority signatures
const DOMAIN_SEPARATOR: &[u8; 23] = b"Fog authority signature";

/// Retrieve the canonical signing context byte string.
///
/// This is intended to be used by crate-remote implementations of the
/// signature who want a "standard" context.
pub fn context() -> &'static [u8] {
    DOMAIN_SEPARATOR
}

/// A trait used to monkey-patch authority signatures onto existing
/// private-key types.
pub trait Signer {
    /// Sign the raw bytes of a subjectPublicKeyInfo for a fog authority
    fn sign_authority_bytes(&self, spki_bytes: &[u8]) -> Signature;
}

/// A trait used to monkey-patch authority signature verification onto
/// existing public-key types.
pub trait Verifier {
    /// Verify a signature over the raw subjectPublicKeyInfo bytes.
    fn verify_authority_sig_bytes(
        &self,
        spki_bytes: &[u8],
        sig: &Signature,
    ) -> Result<(), SignatureError>;
}

impl Signer for Keypair {
    fn sign_authority_bytes(&self, spki_bytes: &[u8]) -> Signature {
        self.sign(signing_context(DOMAIN_SEPARATOR).bytes(spki_bytes))
    }
}

impl Verifier for PublicKey {
    fn verify_authority_sig_bytes(
        &self,
        spki_bytes: &[u8],
        sig: &Signature,
    ) -> Result<(), SignatureError> {
        self.verify(signing_context(DOMAIN_SEPARATOR).bytes(spki_bytes), sig)
    }
}
