/// Malformed DER encoding.
///
/// Every variant carries the absolute offset in the input buffer where
/// the problem was found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Asn1Error {
    #[error("truncated input at offset {offset}: need {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("indefinite length at offset {offset}")]
    IndefiniteLength { offset: usize },
    #[error("unsupported length encoding at offset {offset}: {octets} length octets")]
    UnsupportedLength { offset: usize, octets: usize },
    #[error("element at offset {offset} ends at {end}, past its parent end {parent_end}")]
    ChildOverrun {
        offset: usize,
        end: usize,
        parent_end: usize,
    },
    #[error("length overflow at offset {offset}")]
    LengthOverflow { offset: usize },
    #[error("unexpected tag at offset {offset}: expected 0x{expected:02X}, found 0x{found:02X}")]
    UnexpectedTag {
        offset: usize,
        expected: u8,
        found: u8,
    },
    #[error("invalid {what} at offset {offset}")]
    InvalidValue { offset: usize, what: &'static str },
}

impl Asn1Error {
    /// Offset in the input buffer where decoding failed.
    pub fn offset(&self) -> usize {
        match self {
            Asn1Error::Truncated { offset, .. }
            | Asn1Error::IndefiniteLength { offset }
            | Asn1Error::UnsupportedLength { offset, .. }
            | Asn1Error::ChildOverrun { offset, .. }
            | Asn1Error::LengthOverflow { offset }
            | Asn1Error::UnexpectedTag { offset, .. }
            | Asn1Error::InvalidValue { offset, .. } => *offset,
        }
    }
}

/// Certificate and CSR exploration errors.
#[derive(Debug, thiserror::Error)]
pub enum PkiError {
    #[error("malformed encoding: {0}")]
    Malformed(#[from] Asn1Error),
    #[error("unexpected structure: {0}")]
    UnexpectedStructure(String),
    #[error("unsupported public key: {0}")]
    UnsupportedPublicKey(String),
}

/// Symmetric and asymmetric primitive errors.
///
/// Failed verifications are not errors; they are reported as `false`
/// or `None` by the verifying operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },
    #[error("invalid iv length: expected {expected}, got {got}")]
    InvalidIvLength { expected: usize, got: usize },
    #[error("input length {len} is not a multiple of the block size {block_size}")]
    NotBlockAligned { len: usize, block_size: usize },
    #[error("signature length mismatch: expected {expected}, got {got}")]
    SignatureLengthMismatch { expected: usize, got: usize },
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("random number generator failure: {0}")]
    Rng(String),
}

/// Secure channel errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
    #[error("pki error: {0}")]
    Pki(#[from] PkiError),
}
