//! Slicing P_hash output into signing key, encrypting key and IV.

use std::fmt;

use uacrypt_types::{ChannelError, CipherAlgId, CryptoError, HashAlgId};
use zeroize::Zeroize;

use super::prf::make_pseudo_random_buffer;
use crate::config::DerivedKeyOptions;

/// Symmetric keys for one direction of a secure channel.
///
/// Layout of the P_hash output: `signing_key || encrypting_key || iv`.
pub struct DerivedKeys {
    signing_key: Vec<u8>,
    encrypting_key: Vec<u8>,
    initialization_vector: Vec<u8>,
    options: DerivedKeyOptions,
}

impl Drop for DerivedKeys {
    fn drop(&mut self) {
        self.signing_key.zeroize();
        self.encrypting_key.zeroize();
        self.initialization_vector.zeroize();
    }
}

impl fmt::Debug for DerivedKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKeys")
            .field("signing_key", &format_args!("[{} bytes]", self.signing_key.len()))
            .field(
                "encrypting_key",
                &format_args!("[{} bytes]", self.encrypting_key.len()),
            )
            .field(
                "initialization_vector",
                &format_args!("[{} bytes]", self.initialization_vector.len()),
            )
            .field("options", &self.options)
            .finish()
    }
}

impl DerivedKeys {
    /// Assemble keys obtained elsewhere, checking them against `options`.
    pub fn from_parts(
        signing_key: Vec<u8>,
        encrypting_key: Vec<u8>,
        initialization_vector: Vec<u8>,
        options: DerivedKeyOptions,
    ) -> Result<Self, ChannelError> {
        // owned from here on; Drop wipes them on early return
        let keys = Self {
            signing_key,
            encrypting_key,
            initialization_vector,
            options,
        };
        options.validate()?;
        if keys.signing_key.len() != options.signing_key_length {
            return Err(CryptoError::InvalidKeyLength {
                expected: options.signing_key_length,
                got: keys.signing_key.len(),
            }
            .into());
        }
        if keys.encrypting_key.len() != options.encrypting_key_length {
            return Err(CryptoError::InvalidKeyLength {
                expected: options.encrypting_key_length,
                got: keys.encrypting_key.len(),
            }
            .into());
        }
        if keys.initialization_vector.len() != options.encrypting_block_size {
            return Err(CryptoError::InvalidIvLength {
                expected: options.encrypting_block_size,
                got: keys.initialization_vector.len(),
            }
            .into());
        }
        Ok(keys)
    }

    pub fn signing_key(&self) -> &[u8] {
        &self.signing_key
    }

    pub fn encrypting_key(&self) -> &[u8] {
        &self.encrypting_key
    }

    pub fn initialization_vector(&self) -> &[u8] {
        &self.initialization_vector
    }

    pub fn options(&self) -> &DerivedKeyOptions {
        &self.options
    }

    pub fn signature_length(&self) -> usize {
        self.options.signature_length
    }

    pub fn signing_key_length(&self) -> usize {
        self.options.signing_key_length
    }

    pub fn encrypting_key_length(&self) -> usize {
        self.options.encrypting_key_length
    }

    pub fn encrypting_block_size(&self) -> usize {
        self.options.encrypting_block_size
    }

    pub fn algorithm(&self) -> CipherAlgId {
        self.options.algorithm
    }

    pub fn digest(&self) -> HashAlgId {
        self.options.digest
    }
}

/// Derive one direction's keys from `secret` and `seed`.
///
/// The options are validated before any key material is produced.
pub fn compute_derived_keys(
    secret: &[u8],
    seed: &[u8],
    options: &DerivedKeyOptions,
) -> Result<DerivedKeys, ChannelError> {
    options.validate()?;

    let mut buffer =
        make_pseudo_random_buffer(secret, seed, options.total_length()?, options.digest)?;
    let (signing_key, rest) = buffer.split_at(options.signing_key_length);
    let (encrypting_key, iv) = rest.split_at(options.encrypting_key_length);
    let keys = DerivedKeys {
        signing_key: signing_key.to_vec(),
        encrypting_key: encrypting_key.to_vec(),
        initialization_vector: iv.to_vec(),
        options: *options,
    };
    buffer.zeroize();

    tracing::trace!(
        signing_key_length = options.signing_key_length,
        encrypting_key_length = options.encrypting_key_length,
        algorithm = %options.algorithm,
        digest = %options.digest,
        "derived keys computed"
    );
    Ok(keys)
}

/// Both directions of a secure channel's symmetric keys.
#[derive(Debug)]
pub struct ChannelKeys {
    /// Keys the client signs/encrypts with and the server verifies/decrypts with.
    pub client: DerivedKeys,
    /// Keys the server signs/encrypts with and the client verifies/decrypts with.
    pub server: DerivedKeys,
}

/// Apply the OPC-UA key table to a pair of nonces.
///
/// Client keys use the server nonce as secret and the client nonce as seed;
/// server keys swap the two.
pub fn derive_channel_keys(
    options: &DerivedKeyOptions,
    client_nonce: &[u8],
    server_nonce: &[u8],
) -> Result<ChannelKeys, ChannelError> {
    Ok(ChannelKeys {
        client: compute_derived_keys(server_nonce, client_nonce, options)?,
        server: compute_derived_keys(client_nonce, server_nonce, options)?,
    })
}
