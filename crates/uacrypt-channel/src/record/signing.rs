//! Chunk signatures: HMAC with derived keys, and asymmetric verification
//! of chunks signed with a certificate's private key.

use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Pkcs1v15Sign, Pss, RsaPublicKey};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uacrypt_pki::x509::CertificateInfo;
use uacrypt_types::{ChannelError, CryptoError, PkiError, SignatureAlgId};

use crate::crypt::derived_keys::DerivedKeys;
use crate::crypt::hmac_hash;

/// HMAC of `message` with the derived signing key.
///
/// The result always has `keys.signature_length()` bytes.
pub fn make_message_chunk_signature_with_derived_keys(
    message: &[u8],
    keys: &DerivedKeys,
) -> Result<Vec<u8>, CryptoError> {
    let signature = hmac_hash(keys.digest(), keys.signing_key(), &[message])?;
    if signature.len() != keys.signature_length() {
        return Err(CryptoError::SignatureLengthMismatch {
            expected: keys.signature_length(),
            got: signature.len(),
        });
    }
    Ok(signature)
}

/// Verify a chunk whose last `keys.signature_length()` bytes are the HMAC
/// of everything before them.
pub fn verify_chunk_signature_with_derived_keys(chunk: &[u8], keys: &DerivedKeys) -> bool {
    let Some(split) = chunk.len().checked_sub(keys.signature_length()) else {
        tracing::debug!(len = chunk.len(), "chunk shorter than its signature");
        return false;
    };
    let (message, signature) = chunk.split_at(split);
    let Ok(expected) = make_message_chunk_signature_with_derived_keys(message, keys) else {
        return false;
    };
    let ok = bool::from(expected.ct_eq(signature));
    if !ok {
        tracing::debug!(len = chunk.len(), "symmetric chunk signature mismatch");
    }
    ok
}

/// Length of the trailing signature of an asymmetrically signed chunk.
#[derive(Debug, Clone, Copy)]
pub enum SignatureLength<'a> {
    Explicit(usize),
    /// The signer's key size in bytes, taken from its certificate.
    InferFromKey(&'a CertificateInfo),
}

impl SignatureLength<'_> {
    pub fn resolve(&self) -> usize {
        match self {
            SignatureLength::Explicit(len) => *len,
            SignatureLength::InferFromKey(info) => info.public_key_length,
        }
    }
}

impl From<usize> for SignatureLength<'_> {
    fn from(len: usize) -> Self {
        SignatureLength::Explicit(len)
    }
}

impl<'a> From<&'a CertificateInfo> for SignatureLength<'a> {
    fn from(info: &'a CertificateInfo) -> Self {
        SignatureLength::InferFromKey(info)
    }
}

/// An asymmetric signature check over a message.
pub trait SignatureVerifier {
    /// Returns true if `signature` is valid for `message`.
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool;
}

/// RSA verifier for OpenSecureChannel chunks.
#[derive(Debug, Clone)]
pub struct RsaChunkVerifier {
    key: RsaPublicKey,
    algorithm: SignatureAlgId,
}

impl RsaChunkVerifier {
    /// Build from a big-endian modulus and public exponent.
    pub fn new(
        modulus: &[u8],
        public_exponent: &[u8],
        algorithm: SignatureAlgId,
    ) -> Result<Self, CryptoError> {
        let key = RsaPublicKey::new(
            BigUint::from_bytes_be(modulus),
            BigUint::from_bytes_be(public_exponent),
        )
        .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Ok(Self { key, algorithm })
    }

    /// Build from the RSA key of an explored certificate.
    pub fn from_certificate(
        info: &CertificateInfo,
        algorithm: SignatureAlgId,
    ) -> Result<Self, ChannelError> {
        let rsa = info.public_key.rsa.as_ref().ok_or_else(|| {
            PkiError::UnsupportedPublicKey(
                info.public_key.algorithm.identifier.display_name().to_string(),
            )
        })?;
        Ok(Self::new(&rsa.modulus, &rsa.public_exponent, algorithm)?)
    }

    pub fn algorithm(&self) -> SignatureAlgId {
        self.algorithm
    }

    /// Modulus size in bytes, which is also the signature size.
    pub fn key_size(&self) -> usize {
        self.key.size()
    }
}

impl SignatureVerifier for RsaChunkVerifier {
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let result = match self.algorithm {
            SignatureAlgId::RsaPkcs1Sha1 => {
                let hashed = Sha1::digest(message);
                self.key.verify(Pkcs1v15Sign::new::<Sha1>(), &hashed, signature)
            }
            SignatureAlgId::RsaPkcs1Sha256 => {
                let hashed = Sha256::digest(message);
                self.key.verify(Pkcs1v15Sign::new::<Sha256>(), &hashed, signature)
            }
            SignatureAlgId::RsaPssSha256 => {
                let hashed = Sha256::digest(message);
                self.key.verify(Pss::new::<Sha256>(), &hashed, signature)
            }
        };
        result.is_ok()
    }
}

/// Verify an asymmetrically signed chunk: `content || signature`.
///
/// A zero signature length, or one longer than the chunk, fails.
pub fn verify_chunk_signature<V: SignatureVerifier + ?Sized>(
    chunk: &[u8],
    signature_length: SignatureLength<'_>,
    verifier: &V,
) -> bool {
    let signature_length = signature_length.resolve();
    if signature_length == 0 || signature_length > chunk.len() {
        tracing::debug!(
            len = chunk.len(),
            signature_length,
            "chunk cannot hold its signature"
        );
        return false;
    }
    let (content, signature) = chunk.split_at(chunk.len() - signature_length);
    let ok = verifier.verify(content, signature);
    if !ok {
        tracing::debug!(len = chunk.len(), "asymmetric chunk signature rejected");
    }
    ok
}
