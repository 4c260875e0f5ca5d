use std::fmt;
use std::str::FromStr;

/// Hash algorithm identifiers used by the secure channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgId {
    #[default]
    Sha1,
    Sha256,
}

impl HashAlgId {
    /// Digest output size in bytes.
    pub fn output_size(self) -> usize {
        match self {
            HashAlgId::Sha1 => 20,
            HashAlgId::Sha256 => 32,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HashAlgId::Sha1 => "SHA1",
            HashAlgId::Sha256 => "SHA256",
        }
    }
}

impl fmt::Display for HashAlgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "").as_str() {
            "SHA1" => Ok(HashAlgId::Sha1),
            "SHA256" => Ok(HashAlgId::Sha256),
            _ => Err(format!("unknown hash algorithm: {s}")),
        }
    }
}

/// Symmetric cipher identifiers (algorithm + mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CipherAlgId {
    #[default]
    Aes128Cbc,
    Aes256Cbc,
}

impl CipherAlgId {
    /// Key length in bytes.
    pub fn key_len(self) -> usize {
        match self {
            CipherAlgId::Aes128Cbc => 16,
            CipherAlgId::Aes256Cbc => 32,
        }
    }

    pub fn block_size(self) -> usize {
        16
    }

    pub fn name(self) -> &'static str {
        match self {
            CipherAlgId::Aes128Cbc => "aes-128-cbc",
            CipherAlgId::Aes256Cbc => "aes-256-cbc",
        }
    }
}

impl fmt::Display for CipherAlgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CipherAlgId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aes-128-cbc" => Ok(CipherAlgId::Aes128Cbc),
            "aes-256-cbc" => Ok(CipherAlgId::Aes256Cbc),
            _ => Err(format!("unknown cipher algorithm: {s}")),
        }
    }
}

/// Asymmetric signature schemes accepted for chunk verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgId {
    RsaPkcs1Sha1,
    RsaPkcs1Sha256,
    RsaPssSha256,
}

impl SignatureAlgId {
    pub fn hash(self) -> HashAlgId {
        match self {
            SignatureAlgId::RsaPkcs1Sha1 => HashAlgId::Sha1,
            SignatureAlgId::RsaPkcs1Sha256 | SignatureAlgId::RsaPssSha256 => HashAlgId::Sha256,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SignatureAlgId::RsaPkcs1Sha1 => "RSA-SHA1",
            SignatureAlgId::RsaPkcs1Sha256 => "RSA-SHA256",
            SignatureAlgId::RsaPssSha256 => "RSA-PSS-SHA256",
        }
    }
}

impl fmt::Display for SignatureAlgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SignatureAlgId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "RSA-SHA1" => Ok(SignatureAlgId::RsaPkcs1Sha1),
            "RSA-SHA256" => Ok(SignatureAlgId::RsaPkcs1Sha256),
            "RSA-PSS-SHA256" => Ok(SignatureAlgId::RsaPssSha256),
            _ => Err(format!("unknown signature algorithm: {s}")),
        }
    }
}
