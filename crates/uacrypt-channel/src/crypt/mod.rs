//! Key schedule primitives for the secure channel.

pub mod derived_keys;
pub mod prf;

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;
use uacrypt_types::{CryptoError, HashAlgId};

/// One-shot HMAC over the concatenation of `parts`.
pub(crate) fn hmac_hash(
    hash: HashAlgId,
    key: &[u8],
    parts: &[&[u8]],
) -> Result<Vec<u8>, CryptoError> {
    match hash {
        HashAlgId::Sha1 => hmac_with::<Hmac<Sha1>>(key, parts),
        HashAlgId::Sha256 => hmac_with::<Hmac<Sha256>>(key, parts),
    }
}

fn hmac_with<M: Mac + KeyInit>(key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>, CryptoError> {
    let mut mac = <M as Mac>::new_from_slice(key)
        .map_err(|_| CryptoError::InvalidKey("HMAC key rejected".into()))?;
    for part in parts {
        mac.update(part);
    }
    Ok(mac.finalize().into_bytes().to_vec())
}
