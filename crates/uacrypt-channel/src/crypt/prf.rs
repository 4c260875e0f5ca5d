//! P_HASH pseudo-random function used by the OPC-UA secure channel
//! (RFC 5246 §5 without the label).
//!
//! ```text
//! P_hash(secret, seed) = HMAC_hash(secret, A(1) + seed) ||
//!                        HMAC_hash(secret, A(2) + seed) || ...
//! A(0) = seed
//! A(i) = HMAC_hash(secret, A(i-1))
//! ```

use super::hmac_hash;
use uacrypt_types::{CryptoError, HashAlgId};
use zeroize::Zeroize;

/// Derive exactly `min_length` bytes from `secret` and `seed` with P_hash.
///
/// The digest is always explicit; callers pick it from their policy.
pub fn make_pseudo_random_buffer(
    secret: &[u8],
    seed: &[u8],
    min_length: usize,
    digest: HashAlgId,
) -> Result<Vec<u8>, CryptoError> {
    let mut result = Vec::with_capacity(min_length + digest.output_size());

    // A(0) = seed
    let mut a = seed.to_vec();

    while result.len() < min_length {
        let next = hmac_hash(digest, secret, &[&a])?;
        a.zeroize();
        a = next;

        let block = hmac_hash(digest, secret, &[&a, seed])?;
        result.extend_from_slice(&block);
    }
    a.zeroize();

    result.truncate(min_length);
    tracing::trace!(%digest, length = min_length, "P_hash output generated");
    Ok(result)
}
