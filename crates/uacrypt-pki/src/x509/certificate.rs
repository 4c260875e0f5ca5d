//! Certificate exploration and the shared Name / AlgorithmIdentifier /
//! SubjectPublicKeyInfo readers.

use sha1::{Digest, Sha1};
use uacrypt_types::{Asn1Error, PkiError};
use uacrypt_utils::asn1::{get_block, get_raw_block, read_tag, read_version_value, tags, Decoder};
use uacrypt_utils::oid::{dn_short_name, read_object_identifier, Oid, OidTable};

use super::extensions::{read_extensions, CertificateExtension, ExtensionValue};
use super::{
    AlgorithmIdentifier, BasicConstraints, Certificate, CertificateExplorer, CertificateInfo,
    DistinguishedName, KeyUsage, RsaPublicKeyComponents, SubjectAltName, SubjectPublicKeyInfo,
};

const RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.1";
const EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";

/// SHA-1 digest of the complete DER certificate.
pub fn make_sha1_thumbprint(der: &[u8]) -> [u8; 20] {
    Sha1::digest(der).into()
}

// ---------------------------------------------------------------------------
// AlgorithmIdentifier parsing
// ---------------------------------------------------------------------------

pub(crate) fn parse_algorithm_identifier(
    dec: &mut Decoder,
    oids: &OidTable,
) -> Result<AlgorithmIdentifier, PkiError> {
    let mut alg_dec = dec.read_sequence()?;
    let buf = alg_dec.data();
    let oid_block = alg_dec.expect(tags::OID)?;
    let identifier = read_object_identifier(buf, &oid_block, oids)?;
    let parameters = if alg_dec.is_empty() {
        None
    } else {
        let params = alg_dec.read_block()?;
        // NULL parameters carry nothing
        if params.is(tags::NULL) && params.content_length == 0 {
            None
        } else {
            Some(get_raw_block(buf, &params)?.to_vec())
        }
    };
    Ok(AlgorithmIdentifier {
        identifier,
        parameters,
    })
}

// ---------------------------------------------------------------------------
// Name / DN parsing
// ---------------------------------------------------------------------------

pub(crate) fn parse_name(
    dec: &mut Decoder,
    oids: &OidTable,
) -> Result<DistinguishedName, PkiError> {
    let mut name_dec = dec.read_sequence()?;
    let buf = name_dec.data();
    let mut entries = Vec::new();
    while !name_dec.is_empty() {
        let mut rdn_dec = name_dec.read_set()?;
        while !rdn_dec.is_empty() {
            let mut atav_dec = rdn_dec.read_sequence()?;
            let oid_block = atav_dec.expect(tags::OID)?;
            let attr = read_object_identifier(buf, &oid_block, oids)?;
            let attr_name = dn_short_name(&attr.value)
                .map(str::to_string)
                .unwrap_or(attr.value);
            let value = atav_dec.read_string()?;
            entries.push((attr_name, value));
        }
    }
    Ok(DistinguishedName { entries })
}

// ---------------------------------------------------------------------------
// Validity parsing
// ---------------------------------------------------------------------------

fn parse_validity(dec: &mut Decoder) -> Result<(i64, i64), PkiError> {
    let mut val_dec = dec.read_sequence()?;
    let not_before = val_dec.read_time()?;
    let not_after = val_dec.read_time()?;
    Ok((not_before, not_after))
}

// ---------------------------------------------------------------------------
// SubjectPublicKeyInfo parsing
// ---------------------------------------------------------------------------

pub(crate) fn parse_subject_public_key_info(
    dec: &mut Decoder,
    oids: &OidTable,
) -> Result<SubjectPublicKeyInfo, PkiError> {
    let mut spki_dec = dec.read_sequence()?;
    let buf = spki_dec.data();
    let algorithm = parse_algorithm_identifier(&mut spki_dec, oids)?;
    let key_offset = spki_dec.position();
    let (_, public_key) = spki_dec.read_bit_string()?;

    let (key_length, rsa) = match algorithm.identifier.value.as_str() {
        RSA_ENCRYPTION => {
            // the BIT STRING wraps RSAPublicKey; step past the unused-bits octet
            let bit_string = read_tag(buf, key_offset)?;
            let rsa = parse_rsa_public_key(buf, bit_string.content_offset + 1, bit_string.end())?;
            (bit_length(&rsa.modulus), Some(rsa))
        }
        EC_PUBLIC_KEY => (ec_key_length(&algorithm, public_key)?, None),
        _ => (public_key.len() * 8, None),
    };

    Ok(SubjectPublicKeyInfo {
        algorithm,
        public_key: public_key.to_vec(),
        key_length,
        rsa,
    })
}

/// `RSAPublicKey ::= SEQUENCE { modulus INTEGER, publicExponent INTEGER }`
fn parse_rsa_public_key(
    buf: &[u8],
    offset: usize,
    parent_end: usize,
) -> Result<RsaPublicKeyComponents, PkiError> {
    let block = read_tag(buf, offset)?;
    if block.end() > parent_end {
        return Err(Asn1Error::ChildOverrun {
            offset,
            end: block.end(),
            parent_end,
        }
        .into());
    }
    let mut dec = Decoder::over(buf, &block)?;
    let modulus = strip_sign_octet(dec.read_integer()?);
    let public_exponent = strip_sign_octet(dec.read_integer()?);
    if modulus.iter().all(|&b| b == 0) {
        return Err(PkiError::UnsupportedPublicKey("zero RSA modulus".into()));
    }
    Ok(RsaPublicKeyComponents {
        modulus: modulus.to_vec(),
        public_exponent: public_exponent.to_vec(),
    })
}

fn ec_key_length(algorithm: &AlgorithmIdentifier, point: &[u8]) -> Result<usize, PkiError> {
    let curve = match algorithm.parameters.as_deref() {
        Some(params) => {
            let block = read_tag(params, 0)?;
            if !block.is(tags::OID) {
                return Err(PkiError::UnsupportedPublicKey(
                    "EC key without a named curve".into(),
                ));
            }
            Oid::from_der_value(get_block(params, &block)?, block.content_offset)?.to_dot_string()
        }
        None => String::new(),
    };
    Ok(match curve.as_str() {
        "1.2.840.10045.3.1.7" => 256,
        "1.3.132.0.34" => 384,
        "1.3.132.0.35" => 521,
        // uncompressed point: 0x04 || X || Y
        _ => point.len().saturating_sub(1) / 2 * 8,
    })
}

fn strip_sign_octet(value: &[u8]) -> &[u8] {
    match value {
        [0, rest @ ..] if !rest.is_empty() => rest,
        _ => value,
    }
}

fn bit_length(value: &[u8]) -> usize {
    match value.iter().position(|&b| b != 0) {
        Some(i) => (value.len() - i) * 8 - value[i].leading_zeros() as usize,
        None => 0,
    }
}

// ---------------------------------------------------------------------------
// Certificate exploration
// ---------------------------------------------------------------------------

impl CertificateExplorer<'_> {
    /// Walk a DER certificate into a [`Certificate`].
    pub fn explore_certificate(&self, der: &[u8]) -> Result<Certificate, PkiError> {
        self.read_certificate(der).map_err(|e| {
            tracing::debug!(error = %e, "certificate exploration failed");
            e
        })
    }

    /// The facts needed for signature-length inference and peer checks.
    pub fn explore_certificate_info(&self, der: &[u8]) -> Result<CertificateInfo, PkiError> {
        let cert = self.explore_certificate(der)?;
        Ok(CertificateInfo {
            public_key_length: cert.subject_public_key_info.key_length_bytes(),
            not_before: cert.not_before,
            not_after: cert.not_after,
            public_key: cert.subject_public_key_info,
            subject: cert.subject,
        })
    }

    fn read_certificate(&self, der: &[u8]) -> Result<Certificate, PkiError> {
        let mut outer = Decoder::new(der).read_sequence()?;
        let mut tbs_dec = outer.read_sequence()?;

        // version [0] EXPLICIT INTEGER DEFAULT v1
        let version = match tbs_dec.try_read_context_specific(0)? {
            Some(block) => read_version_value(der, &block)?
                .checked_add(1)
                .ok_or(Asn1Error::InvalidValue {
                    offset: block.content_offset,
                    what: "version",
                })?,
            None => 1,
        };

        let serial_number = tbs_dec.read_integer()?.to_vec();

        // signature AlgorithmIdentifier (inner, should match outer)
        let signature = parse_algorithm_identifier(&mut tbs_dec, self.oids)?;
        let issuer = parse_name(&mut tbs_dec, self.oids)?;
        let (not_before, not_after) = parse_validity(&mut tbs_dec)?;
        let subject = parse_name(&mut tbs_dec, self.oids)?;
        let subject_public_key_info = parse_subject_public_key_info(&mut tbs_dec, self.oids)?;

        // issuerUniqueID [1] / subjectUniqueID [2], skipped
        tbs_dec.try_read_context_specific(1)?;
        tbs_dec.try_read_context_specific(2)?;

        // extensions [3] EXPLICIT Extensions OPTIONAL
        let extensions = match tbs_dec.try_read_context_specific(3)? {
            Some(block) => {
                let ext_seq = Decoder::over(der, &block)?.read_sequence()?;
                read_extensions(ext_seq, self.oids)?
            }
            None => Vec::new(),
        };

        let signature_algorithm = parse_algorithm_identifier(&mut outer, self.oids)?;
        let (_, signature_value) = outer.read_bit_string()?;

        Ok(Certificate {
            version,
            serial_number,
            signature,
            issuer,
            not_before,
            not_after,
            subject,
            subject_public_key_info,
            extensions,
            signature_algorithm,
            signature_value: signature_value.to_vec(),
        })
    }
}

impl Certificate {
    /// Look an extension up by its OID name (e.g. "keyUsage") or dotted value.
    pub fn extension(&self, name: &str) -> Option<&CertificateExtension> {
        self.extensions
            .iter()
            .find(|e| e.identifier.name == name || e.identifier.value == name)
    }

    pub fn basic_constraints(&self) -> Option<BasicConstraints> {
        self.extensions.iter().find_map(|e| match &e.value {
            ExtensionValue::BasicConstraints(bc) => Some(*bc),
            _ => None,
        })
    }

    pub fn key_usage(&self) -> Option<KeyUsage> {
        self.extensions.iter().find_map(|e| match &e.value {
            ExtensionValue::KeyUsage(ku) => Some(*ku),
            _ => None,
        })
    }

    pub fn subject_alt_name(&self) -> Option<&SubjectAltName> {
        self.extensions.iter().find_map(|e| match &e.value {
            ExtensionValue::SubjectAltName(san) => Some(san),
            _ => None,
        })
    }

    /// Returns true if issuer DN == subject DN.
    pub fn is_self_issued(&self) -> bool {
        self.issuer == self.subject
    }
}
