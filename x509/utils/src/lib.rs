// Copyright (c) 2018-2022 The MobileCoin Foundation

#![deny(missing_docs)]

//! Utilities for handling X509 certificate chains

use displaydoc::Display;
use ed25519_dalek::VerifyingKey;
use std::time::{SystemTime, SystemTimeError};
use x509_signature::{Error as X509Error, X509Certificate};

// ASN.1 DER prefix of a SubjectPublicKeyInfo structure containing an
// Ed25519 public key:
//
//   SEQUENCE(30), Length = 2A
//     SEQUENCE(30), Length = 05
//        OBJECT IDENTIFIER(06), Length = 03
//           curveEd25519(1.3.101.112 = 2B 65 70)
//     BIT STRING(03), Length = 21, paddingBits = 00
//        actualKeyBitsGoHere
const ED25519_SPKI_DER_PREFIX: [u8; 12] = [
    0x30, 0x2A, 0x30, 0x05, 0x06, 0x03, 0x2B, 0x65, 0x70, 0x03, 0x21, 0x00,
];

// T and L octets of the outer TLV, plus the length of V.
const ED25519_SPKI_DER_LEN: usize = 0x02 + 0x2A;

/// An enumeration of chain-handling errors
#[derive(Debug, Display, Eq, PartialEq)]
pub enum ChainError {
    /// The chain slice is empty
    Empty,
    /**
     * Could not retrieve the current time: second time provided was later
     * than self
     */
    SystemTime,
    /// Could not parse a DER certificate: {0:?}
    Parse(X509Error),
    /// X509 error: {0:?}
    X509(X509Error),
    /// No certificate in the chain matches a configured trust anchor
    UntrustedRoot,
}

impl From<SystemTimeError> for ChainError {
    fn from(_src: SystemTimeError) -> ChainError {
        ChainError::SystemTime
    }
}

impl From<X509Error> for ChainError {
    fn from(src: X509Error) -> ChainError {
        ChainError::X509(src)
    }
}

/// Parse a sequence of DER-encoded certificates into certificate objects.
///
/// Unlike an iterator which silently drops malformed entries, any
/// unparseable certificate fails the whole chain.
pub fn parse_chain(der_chain: &[Vec<u8>]) -> Result<Vec<X509Certificate<'_>>, ChainError> {
    if der_chain.is_empty() {
        return Err(ChainError::Empty);
    }

    der_chain
        .iter()
        .map(|der| x509_signature::parse_certificate(der.as_slice()).map_err(ChainError::Parse))
        .collect()
}

/// A trait used to monkey-patch chain verification onto a slice of
/// X509Certificate objects, ordered from leaf to root.
pub trait X509CertificateChain<'a> {
    /// Verify the chain (checks validity, signatures, and the self-issued
    /// terminal certificate), returning the number of verified elements.
    fn verify_chain(&self) -> Result<usize, ChainError>;

    /// Get the leaf certificate
    fn leaf(&self) -> Result<&X509Certificate<'a>, ChainError>;

    /// Verify the chain and confirm it is anchored in one of the given
    /// DER-encoded trust anchors, returning the root certificate.
    ///
    /// A chain member whose subjectPublicKeyInfo matches an anchor's is
    /// considered anchored; this also covers cross-signed roots during an
    /// authority rotation.
    fn verified_root(&self, anchors: &[Vec<u8>]) -> Result<&X509Certificate<'a>, ChainError>;
}

impl<'a, T: AsRef<[X509Certificate<'a>]>> X509CertificateChain<'a> for T {
    fn verify_chain(&self) -> Result<usize, ChainError> {
        let mut previous: Option<&X509Certificate> = None;
        let mut cert_count = 0usize;

        if self.as_ref().is_empty() {
            return Err(ChainError::Empty);
        }

        for (index, cert) in self.as_ref().iter().enumerate() {
            // If we aren't the first cert in the chain, and there were no
            // errors before us, verify we signed the previous cert.
            if let Some(prev_cert) = previous {
                prev_cert.check_issued_by(cert)?;
            }

            let timestamp = SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)?
                .as_secs() as i64;

            // If the cert isn't valid (temporally), fail.
            cert.valid_at_timestamp(timestamp)?;

            previous = Some(cert);
            cert_count = index + 1;
        }

        // The last cert in the chain must be self-signed.
        if let Some(previous) = previous {
            previous.check_self_issued()?;
        }

        Ok(cert_count)
    }

    fn leaf(&self) -> Result<&X509Certificate<'a>, ChainError> {
        if self.as_ref().is_empty() {
            Err(ChainError::Empty)
        } else {
            let slice = self.as_ref();
            Ok(&slice[0])
        }
    }

    fn verified_root(&self, anchors: &[Vec<u8>]) -> Result<&X509Certificate<'a>, ChainError> {
        let cert_count = self.verify_chain()?;
        let certs = self.as_ref();

        let anchor_spkis = anchors
            .iter()
            .filter_map(|der| x509_signature::parse_certificate(der.as_slice()).ok())
            .map(|anchor| anchor.subject_public_key_info().spki())
            .collect::<Vec<&[u8]>>();

        if certs.iter().any(|cert| {
            let spki = cert.subject_public_key_info().spki();
            anchor_spkis.iter().any(|anchor| *anchor == spki)
        }) {
            Ok(&certs[cert_count - 1])
        } else {
            Err(ChainError::UntrustedRoot)
        }
    }
}

/// An enumeration of public-key extraction errors
#[derive(Debug, Display, Eq, PartialEq)]
pub enum KeyError {
    /// The key algorithm does not match the expected algorithm
    AlgorithmMismatch,
    /// The public key bytes do not form a valid key
    InvalidPublicKey,
}

/// A closed list of key types supported for report-list signatures.
pub enum PublicKeyType {
    /// The public key is Ed25519
    Ed25519(VerifyingKey),
}

/// A trait used to monkey-patch supported-key extraction onto X509
/// certificates.
pub trait X509KeyExtractor {
    /// Try to retrieve the public key.
    fn public_key(&self) -> Result<PublicKeyType, KeyError>;
}

impl X509KeyExtractor for X509Certificate<'_> {
    fn public_key(&self) -> Result<PublicKeyType, KeyError> {
        let spki = self.subject_public_key_info().spki();
        if spki.len() != ED25519_SPKI_DER_LEN || spki[..12] != ED25519_SPKI_DER_PREFIX {
            return Err(KeyError::AlgorithmMismatch);
        }

        let bytes: &[u8; 32] = spki[12..]
            .try_into()
            .map_err(|_e| KeyError::InvalidPublicKey)?;
        let pubkey = VerifyingKey::from_bytes(bytes).map_err(|_e| KeyError::InvalidPublicKey)?;
        Ok(PublicKeyType::Ed25519(pubkey))
    }
}
