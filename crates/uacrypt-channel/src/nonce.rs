//! Secure channel nonces.

use std::fmt;

use subtle::ConstantTimeEq;
use uacrypt_types::{ChannelError, CryptoError};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Nonce bytes, local or received from the peer. Wiped on drop and never
/// printed. Equality runs in constant time for equal lengths.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Nonce(Vec<u8>);

impl Nonce {
    /// Fresh nonce of `len` bytes from the operating system RNG.
    pub fn random(len: usize) -> Result<Self, ChannelError> {
        if len == 0 {
            return Err(ChannelError::Config("nonce length must be non-zero".into()));
        }
        let mut bytes = vec![0u8; len];
        getrandom::getrandom(&mut bytes).map_err(|e| CryptoError::Rng(e.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Nonce {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Nonce {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl ConstantTimeEq for Nonce {
    fn ct_eq(&self, other: &Self) -> subtle::Choice {
        self.0.as_slice().ct_eq(other.0.as_slice())
    }
}

impl PartialEq for Nonce {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl Eq for Nonce {}

impl AsRef<[u8]> for Nonce {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce([{} bytes])", self.0.len())
    }
}
