//! Chunk padding footer.
//!
//! ```text
//! padding_size = block_size - ((len + 1) % block_size)
//! footer       = [padding_size; padding_size + 1]
//! ```
//!
//! Unlike TLS, an already-aligned `len + 1` gets a full block of padding.

use subtle::{Choice, ConstantTimeEq, ConstantTimeGreater, ConstantTimeLess};

use crate::crypt::derived_keys::DerivedKeys;

/// Largest footer a single padding-size byte can describe.
const MAX_FOOTER_LEN: usize = 256;

fn padding_footer(data_len: usize, block_size: usize) -> Vec<u8> {
    let padding_size = block_size - ((data_len + 1) % block_size);
    vec![padding_size as u8; padding_size + 1]
}

/// Footer that brings `data` to a multiple of the keys' block size.
pub fn compute_padding_footer(data: &[u8], keys: &DerivedKeys) -> Vec<u8> {
    padding_footer(data.len(), keys.encrypting_block_size())
}

/// Footer for a chunk that is signed before encryption, so that
/// `data ++ footer ++ signature` fills whole blocks.
pub fn compute_padding_footer_before_signature(data: &[u8], keys: &DerivedKeys) -> Vec<u8> {
    padding_footer(
        data.len().saturating_add(keys.signature_length()),
        keys.encrypting_block_size(),
    )
}

/// Strip a padding footer, returning the payload.
///
/// Returns `None` when the footer does not fit in `data` or any footer byte
/// differs from the padding size. The scan over the trailing bytes does not
/// depend on where the footer starts.
pub fn remove_padding(data: &[u8]) -> Option<&[u8]> {
    let (&padding_size, _) = data.split_last()?;
    let footer_len = usize::from(padding_size) + 1;

    let mut ok: Choice = !(footer_len as u64).ct_gt(&(data.len() as u64));
    let window = data.len().min(MAX_FOOTER_LEN);
    for (i, b) in data[data.len() - window..].iter().rev().enumerate() {
        let in_footer = (i as u64).ct_lt(&(footer_len as u64));
        ok &= !in_footer | b.ct_eq(&padding_size);
    }

    if bool::from(ok) {
        Some(&data[..data.len() - footer_len])
    } else {
        tracing::debug!(len = data.len(), "padding check failed");
        None
    }
}

/// Drop the last `by` bytes, saturating at empty.
pub fn reduce_length(data: &[u8], by: usize) -> &[u8] {
    &data[..data.len().saturating_sub(by)]
}
