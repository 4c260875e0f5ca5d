//! Derived-key configuration with builder pattern, and the standard
//! OPC-UA security policies.

use std::fmt;
use std::str::FromStr;

use uacrypt_types::{ChannelError, CipherAlgId, HashAlgId, SignatureAlgId};

/// Upper bound on the HMAC signing key length.
pub const MAX_SIGNING_KEY_LENGTH: usize = 256;

/// Key lengths and algorithms for one directional key derivation.
///
/// All lengths are in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivedKeyOptions {
    /// HMAC key used to sign symmetric chunks.
    pub signing_key_length: usize,
    /// Cipher key; must match the cipher's key size.
    pub encrypting_key_length: usize,
    /// Cipher block size, which is also the IV length.
    pub encrypting_block_size: usize,
    /// HMAC output length; must match the digest's output size.
    pub signature_length: usize,
    pub algorithm: CipherAlgId,
    pub digest: HashAlgId,
}

impl DerivedKeyOptions {
    /// Create a builder for derived-key options.
    pub fn builder() -> DerivedKeyOptionsBuilder {
        DerivedKeyOptionsBuilder::default()
    }

    /// Number of P_hash bytes a derivation consumes.
    pub fn total_length(&self) -> Result<usize, ChannelError> {
        self.signing_key_length
            .checked_add(self.encrypting_key_length)
            .and_then(|n| n.checked_add(self.encrypting_block_size))
            .ok_or_else(|| ChannelError::Config("derived key length overflows".into()))
    }

    /// Check the options against their cipher and digest.
    pub fn validate(&self) -> Result<(), ChannelError> {
        if self.signing_key_length == 0 {
            return Err(ChannelError::Config("signing key length must be non-zero".into()));
        }
        if self.signing_key_length > MAX_SIGNING_KEY_LENGTH {
            return Err(ChannelError::Config(format!(
                "signing key length {} exceeds {MAX_SIGNING_KEY_LENGTH}",
                self.signing_key_length
            )));
        }
        if self.encrypting_key_length != self.algorithm.key_len() {
            return Err(ChannelError::Config(format!(
                "encrypting key length {} does not match {} ({} bytes)",
                self.encrypting_key_length,
                self.algorithm,
                self.algorithm.key_len()
            )));
        }
        if self.encrypting_block_size != self.algorithm.block_size() {
            return Err(ChannelError::Config(format!(
                "encrypting block size {} does not match {} ({} bytes)",
                self.encrypting_block_size,
                self.algorithm,
                self.algorithm.block_size()
            )));
        }
        if self.signature_length != self.digest.output_size() {
            return Err(ChannelError::Config(format!(
                "signature length {} does not match {} ({} bytes)",
                self.signature_length,
                self.digest,
                self.digest.output_size()
            )));
        }
        Ok(())
    }
}

/// Builder for `DerivedKeyOptions`.
///
/// Unset lengths default from the cipher and digest; the signing key length
/// has no default and must be set.
#[derive(Debug, Clone, Default)]
pub struct DerivedKeyOptionsBuilder {
    signing_key_length: Option<usize>,
    encrypting_key_length: Option<usize>,
    encrypting_block_size: Option<usize>,
    signature_length: Option<usize>,
    algorithm: Option<CipherAlgId>,
    digest: Option<HashAlgId>,
    algorithm_name: Option<String>,
    digest_name: Option<String>,
}

impl DerivedKeyOptionsBuilder {
    pub fn signing_key_length(mut self, len: usize) -> Self {
        self.signing_key_length = Some(len);
        self
    }

    pub fn encrypting_key_length(mut self, len: usize) -> Self {
        self.encrypting_key_length = Some(len);
        self
    }

    pub fn encrypting_block_size(mut self, len: usize) -> Self {
        self.encrypting_block_size = Some(len);
        self
    }

    pub fn signature_length(mut self, len: usize) -> Self {
        self.signature_length = Some(len);
        self
    }

    pub fn algorithm(mut self, algorithm: CipherAlgId) -> Self {
        self.algorithm = Some(algorithm);
        self.algorithm_name = None;
        self
    }

    pub fn digest(mut self, digest: HashAlgId) -> Self {
        self.digest = Some(digest);
        self.digest_name = None;
        self
    }

    /// Cipher by name (`"aes-128-cbc"` or `"aes-256-cbc"`), parsed by `build`.
    pub fn algorithm_name(mut self, name: impl Into<String>) -> Self {
        self.algorithm_name = Some(name.into());
        self.algorithm = None;
        self
    }

    /// Digest by name (`"SHA1"` or `"SHA256"`), parsed by `build`.
    pub fn digest_name(mut self, name: impl Into<String>) -> Self {
        self.digest_name = Some(name.into());
        self.digest = None;
        self
    }

    pub fn build(self) -> Result<DerivedKeyOptions, ChannelError> {
        let algorithm = match self.algorithm_name {
            Some(name) => name.parse::<CipherAlgId>().map_err(ChannelError::Config)?,
            None => self.algorithm.unwrap_or_default(),
        };
        let digest = match self.digest_name {
            Some(name) => name.parse::<HashAlgId>().map_err(ChannelError::Config)?,
            None => self.digest.unwrap_or_default(),
        };
        let signing_key_length = self
            .signing_key_length
            .ok_or_else(|| ChannelError::Config("signing key length not set".into()))?;

        let options = DerivedKeyOptions {
            signing_key_length,
            encrypting_key_length: self.encrypting_key_length.unwrap_or(algorithm.key_len()),
            encrypting_block_size: self.encrypting_block_size.unwrap_or(algorithm.block_size()),
            signature_length: self.signature_length.unwrap_or(digest.output_size()),
            algorithm,
            digest,
        };
        options.validate()?;
        Ok(options)
    }
}

const POLICY_URI_PREFIX: &str = "http://opcfoundation.org/UA/SecurityPolicy#";

/// The OPC-UA security policies that sign and encrypt with derived keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityPolicy {
    Basic128Rsa15,
    Basic256,
    Basic256Sha256,
    Aes128Sha256RsaOaep,
    Aes256Sha256RsaPss,
}

impl SecurityPolicy {
    pub const ALL: [SecurityPolicy; 5] = [
        SecurityPolicy::Basic128Rsa15,
        SecurityPolicy::Basic256,
        SecurityPolicy::Basic256Sha256,
        SecurityPolicy::Aes128Sha256RsaOaep,
        SecurityPolicy::Aes256Sha256RsaPss,
    ];

    /// Fragment of the policy URI after `#`.
    pub fn name(self) -> &'static str {
        match self {
            SecurityPolicy::Basic128Rsa15 => "Basic128Rsa15",
            SecurityPolicy::Basic256 => "Basic256",
            SecurityPolicy::Basic256Sha256 => "Basic256Sha256",
            SecurityPolicy::Aes128Sha256RsaOaep => "Aes128_Sha256_RsaOaep",
            SecurityPolicy::Aes256Sha256RsaPss => "Aes256_Sha256_RsaPss",
        }
    }

    pub fn uri(self) -> String {
        format!("{POLICY_URI_PREFIX}{}", self.name())
    }

    pub fn from_uri(uri: &str) -> Result<Self, ChannelError> {
        uri.strip_prefix(POLICY_URI_PREFIX)
            .and_then(|name| Self::ALL.into_iter().find(|p| p.name() == name))
            .ok_or_else(|| ChannelError::Config(format!("unknown security policy: {uri}")))
    }

    pub fn derived_key_options(self) -> DerivedKeyOptions {
        let (signing_key_length, algorithm, digest) = match self {
            SecurityPolicy::Basic128Rsa15 => (16, CipherAlgId::Aes128Cbc, HashAlgId::Sha1),
            SecurityPolicy::Basic256 => (24, CipherAlgId::Aes256Cbc, HashAlgId::Sha1),
            SecurityPolicy::Basic256Sha256 => (32, CipherAlgId::Aes256Cbc, HashAlgId::Sha256),
            SecurityPolicy::Aes128Sha256RsaOaep => (32, CipherAlgId::Aes128Cbc, HashAlgId::Sha256),
            SecurityPolicy::Aes256Sha256RsaPss => (32, CipherAlgId::Aes256Cbc, HashAlgId::Sha256),
        };
        DerivedKeyOptions {
            signing_key_length,
            encrypting_key_length: algorithm.key_len(),
            encrypting_block_size: algorithm.block_size(),
            signature_length: digest.output_size(),
            algorithm,
            digest,
        }
    }

    /// Scheme used for asymmetric (OpenSecureChannel) chunk signatures.
    pub fn asymmetric_signature_algorithm(self) -> SignatureAlgId {
        match self {
            SecurityPolicy::Basic128Rsa15 | SecurityPolicy::Basic256 => SignatureAlgId::RsaPkcs1Sha1,
            SecurityPolicy::Basic256Sha256 | SecurityPolicy::Aes128Sha256RsaOaep => {
                SignatureAlgId::RsaPkcs1Sha256
            }
            SecurityPolicy::Aes256Sha256RsaPss => SignatureAlgId::RsaPssSha256,
        }
    }

    pub fn secure_channel_nonce_length(self) -> usize {
        match self {
            SecurityPolicy::Basic128Rsa15 => 16,
            _ => 32,
        }
    }
}

impl fmt::Display for SecurityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SecurityPolicy {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uri(s)
    }
}
