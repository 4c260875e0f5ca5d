//! X.509 certificate and PKCS#10 request exploration.
//!
//! The explorers walk the DER tree with [`uacrypt_utils::asn1`] and resolve
//! identifiers through an injected [`OidTable`]; nothing here copies the
//! input until a field is materialized into an owned value.

mod certificate;
mod csr;
mod extensions;

pub use certificate::make_sha1_thumbprint;
pub use csr::{CertificateSigningRequestInfo, ExtensionRequest};
pub use extensions::{
    AuthorityKeyIdentifier, BasicConstraints, CertificateExtension, ExtensionValue, GeneralName,
    KeyUsage, SubjectAltName,
};

use std::fmt;
use uacrypt_types::PkiError;
use uacrypt_utils::oid::{ObjectIdentifier, OidTable};

static STANDARD_OIDS: OidTable = OidTable::standard();

/// Walks certificates and CSRs, resolving OIDs through one name table.
#[derive(Debug, Clone, Copy)]
pub struct CertificateExplorer<'t> {
    oids: &'t OidTable,
}

impl<'t> CertificateExplorer<'t> {
    pub fn new(oids: &'t OidTable) -> Self {
        Self { oids }
    }

    pub fn oids(&self) -> &'t OidTable {
        self.oids
    }
}

impl Default for CertificateExplorer<'static> {
    fn default() -> Self {
        Self::new(&STANDARD_OIDS)
    }
}

/// Explore a DER certificate with the built-in OID table.
pub fn explore_certificate(der: &[u8]) -> Result<Certificate, PkiError> {
    CertificateExplorer::default().explore_certificate(der)
}

/// Summarize a DER certificate with the built-in OID table.
pub fn explore_certificate_info(der: &[u8]) -> Result<CertificateInfo, PkiError> {
    CertificateExplorer::default().explore_certificate_info(der)
}

/// Explore a DER PKCS#10 request with the built-in OID table.
pub fn explore_certificate_signing_request(
    der: &[u8],
) -> Result<CertificateSigningRequestInfo, PkiError> {
    CertificateExplorer::default().explore_certificate_signing_request(der)
}

/// An explored X.509 certificate.
#[derive(Debug, Clone)]
pub struct Certificate {
    /// X.509 version number (1, 2 or 3).
    pub version: u32,
    /// Serial number, big-endian as encoded.
    pub serial_number: Vec<u8>,
    /// Signature algorithm declared inside the TBS part.
    pub signature: AlgorithmIdentifier,
    pub issuer: DistinguishedName,
    /// Not-before validity time (UNIX timestamp).
    pub not_before: i64,
    /// Not-after validity time (UNIX timestamp).
    pub not_after: i64,
    pub subject: DistinguishedName,
    pub subject_public_key_info: SubjectPublicKeyInfo,
    pub extensions: Vec<CertificateExtension>,
    /// Outer signatureAlgorithm field.
    pub signature_algorithm: AlgorithmIdentifier,
    pub signature_value: Vec<u8>,
}

/// The subset of a certificate needed during channel establishment.
#[derive(Debug, Clone)]
pub struct CertificateInfo {
    /// Public key size in bytes (modulus length for RSA).
    pub public_key_length: usize,
    pub not_before: i64,
    pub not_after: i64,
    pub public_key: SubjectPublicKeyInfo,
    pub subject: DistinguishedName,
}

/// An AlgorithmIdentifier with its resolved OID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmIdentifier {
    pub identifier: ObjectIdentifier,
    /// Complete DER encoding of the parameters; `None` when absent or NULL.
    pub parameters: Option<Vec<u8>>,
}

/// A distinguished name (DN).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    /// `(short name, value)` pairs in encoding order; attributes without a
    /// short name use their dotted OID.
    pub entries: Vec<(String, String)>,
}

impl DistinguishedName {
    /// Get the value for a given attribute short name (e.g., "CN").
    pub fn get(&self, attr: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == attr)
            .map(|(_, v)| v.as_str())
    }

    pub fn common_name(&self) -> Option<&str> {
        self.get("CN")
    }
}

impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Subject public key info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectPublicKeyInfo {
    pub algorithm: AlgorithmIdentifier,
    /// Content of the subjectPublicKey BIT STRING.
    pub public_key: Vec<u8>,
    /// Key size in bits.
    pub key_length: usize,
    /// Present for rsaEncryption keys.
    pub rsa: Option<RsaPublicKeyComponents>,
}

impl SubjectPublicKeyInfo {
    /// Key size in whole bytes.
    pub fn key_length_bytes(&self) -> usize {
        self.key_length.div_ceil(8)
    }
}

/// Modulus and public exponent of an RSA key, big-endian without sign octet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKeyComponents {
    pub modulus: Vec<u8>,
    pub public_exponent: Vec<u8>,
}
