//! AES-CBC with externally computed padding.
//!
//! The cipher never pads: input must already be block-aligned, normally by
//! appending [`compute_padding_footer`](super::padding::compute_padding_footer).

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes256};
use uacrypt_types::{CipherAlgId, CryptoError};

use crate::crypt::derived_keys::DerivedKeys;

/// AES block size (16 bytes).
const AES_BLOCK_SIZE: usize = 16;

enum AesKey {
    Aes128(Aes128),
    Aes256(Aes256),
}

impl AesKey {
    fn new(algorithm: CipherAlgId, key: &[u8]) -> Result<Self, CryptoError> {
        let invalid = |_| CryptoError::InvalidKeyLength {
            expected: algorithm.key_len(),
            got: key.len(),
        };
        match algorithm {
            CipherAlgId::Aes128Cbc => Aes128::new_from_slice(key).map(Self::Aes128).map_err(invalid),
            CipherAlgId::Aes256Cbc => Aes256::new_from_slice(key).map(Self::Aes256).map_err(invalid),
        }
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        let block = GenericArray::from_mut_slice(block);
        match self {
            AesKey::Aes128(c) => c.encrypt_block(block),
            AesKey::Aes256(c) => c.encrypt_block(block),
        }
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        let block = GenericArray::from_mut_slice(block);
        match self {
            AesKey::Aes128(c) => c.decrypt_block(block),
            AesKey::Aes256(c) => c.decrypt_block(block),
        }
    }
}

fn check_input(data: &[u8], keys: &DerivedKeys) -> Result<[u8; AES_BLOCK_SIZE], CryptoError> {
    if data.len() % AES_BLOCK_SIZE != 0 {
        return Err(CryptoError::NotBlockAligned {
            len: data.len(),
            block_size: AES_BLOCK_SIZE,
        });
    }
    let iv = keys.initialization_vector();
    iv.try_into().map_err(|_| CryptoError::InvalidIvLength {
        expected: AES_BLOCK_SIZE,
        got: iv.len(),
    })
}

/// Encrypt a block-aligned buffer with the derived encrypting key and IV.
pub fn encrypt_buffer_with_derived_keys(
    data: &[u8],
    keys: &DerivedKeys,
) -> Result<Vec<u8>, CryptoError> {
    let mut prev = check_input(data, keys)?;
    let cipher = AesKey::new(keys.algorithm(), keys.encrypting_key())?;

    let mut out = data.to_vec();
    for chunk in out.chunks_exact_mut(AES_BLOCK_SIZE) {
        for (b, p) in chunk.iter_mut().zip(prev.iter()) {
            *b ^= p;
        }
        cipher.encrypt_block(chunk);
        prev.copy_from_slice(chunk);
    }
    Ok(out)
}

/// Decrypt a block-aligned buffer; the padding footer is left in place.
pub fn decrypt_buffer_with_derived_keys(
    data: &[u8],
    keys: &DerivedKeys,
) -> Result<Vec<u8>, CryptoError> {
    let mut prev = check_input(data, keys)?;
    let cipher = AesKey::new(keys.algorithm(), keys.encrypting_key())?;

    let mut out = data.to_vec();
    let mut saved = [0u8; AES_BLOCK_SIZE];
    for chunk in out.chunks_exact_mut(AES_BLOCK_SIZE) {
        saved.copy_from_slice(chunk);
        cipher.decrypt_block(chunk);
        for (b, p) in chunk.iter_mut().zip(prev.iter()) {
            *b ^= p;
        }
        prev = saved;
    }
    Ok(out)
}
