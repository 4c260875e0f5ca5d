//! X.509 extension types and their decoders.

use uacrypt_types::{Asn1Error, PkiError};
use uacrypt_utils::asn1::{get_block, tags, BlockInfo, Decoder, TagClass};
use uacrypt_utils::oid::{read_object_identifier, ObjectIdentifier, Oid, OidTable};

use super::certificate::parse_name;
use super::DistinguishedName;

/// An extension with its decoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateExtension {
    pub identifier: ObjectIdentifier,
    pub critical: bool,
    pub value: ExtensionValue,
}

/// Decoded extension payload, chosen by the extension's OID name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionValue {
    BasicConstraints(BasicConstraints),
    KeyUsage(KeyUsage),
    ExtKeyUsage(Vec<ObjectIdentifier>),
    SubjectAltName(SubjectAltName),
    SubjectKeyIdentifier(Vec<u8>),
    AuthorityKeyIdentifier(AuthorityKeyIdentifier),
    /// Content of the extnValue OCTET STRING for extensions with no decoder.
    Unknown(Vec<u8>),
}

/// Parsed BasicConstraints extension (RFC 5280 §4.2.1.9).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasicConstraints {
    pub ca: bool,
    pub path_len_constraint: Option<u32>,
}

/// Parsed KeyUsage extension (RFC 5280 §4.2.1.3) as a bit-flag mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyUsage(pub u16);

impl KeyUsage {
    // BIT STRING bit numbering: bit 0 = MSB of first byte (0x80).
    pub const DIGITAL_SIGNATURE: u16 = 0x0080;
    pub const NON_REPUDIATION: u16 = 0x0040;
    pub const KEY_ENCIPHERMENT: u16 = 0x0020;
    pub const DATA_ENCIPHERMENT: u16 = 0x0010;
    pub const KEY_AGREEMENT: u16 = 0x0008;
    pub const KEY_CERT_SIGN: u16 = 0x0004;
    pub const CRL_SIGN: u16 = 0x0002;
    pub const ENCIPHER_ONLY: u16 = 0x0001;
    pub const DECIPHER_ONLY: u16 = 0x8000;

    const NAMES: [(u16, &'static str); 9] = [
        (Self::DIGITAL_SIGNATURE, "digitalSignature"),
        (Self::NON_REPUDIATION, "nonRepudiation"),
        (Self::KEY_ENCIPHERMENT, "keyEncipherment"),
        (Self::DATA_ENCIPHERMENT, "dataEncipherment"),
        (Self::KEY_AGREEMENT, "keyAgreement"),
        (Self::KEY_CERT_SIGN, "keyCertSign"),
        (Self::CRL_SIGN, "cRLSign"),
        (Self::ENCIPHER_ONLY, "encipherOnly"),
        (Self::DECIPHER_ONLY, "decipherOnly"),
    ];

    pub fn has(&self, flag: u16) -> bool {
        self.0 & flag != 0
    }

    /// Names of the asserted bits, in RFC 5280 order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        Self::NAMES
            .iter()
            .filter(|(flag, _)| self.has(*flag))
            .map(|(_, name)| *name)
    }
}

/// A GeneralName value as used in SAN and AKI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneralName {
    /// `[0]` otherName, kept as its content bytes.
    OtherName(Vec<u8>),
    Rfc822Name(String),
    DnsName(String),
    DirectoryName(DistinguishedName),
    Uri(String),
    IpAddress(Vec<u8>),
    RegisteredId(String),
    /// x400Address / ediPartyName and anything unassigned.
    Other { tag: u32, value: Vec<u8> },
}

/// Parsed Subject Alternative Name extension (RFC 5280 §4.2.1.6).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectAltName {
    pub names: Vec<GeneralName>,
}

impl SubjectAltName {
    pub fn uris(&self) -> impl Iterator<Item = &str> {
        self.names.iter().filter_map(|n| match n {
            GeneralName::Uri(s) => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn dns_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().filter_map(|n| match n {
            GeneralName::DnsName(s) => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn ip_addresses(&self) -> impl Iterator<Item = &[u8]> {
        self.names.iter().filter_map(|n| match n {
            GeneralName::IpAddress(ip) => Some(ip.as_slice()),
            _ => None,
        })
    }
}

/// Parsed Authority Key Identifier extension (RFC 5280 §4.2.1.1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorityKeyIdentifier {
    pub key_identifier: Option<Vec<u8>>,
    pub authority_cert_issuer: Vec<GeneralName>,
    pub authority_cert_serial_number: Option<Vec<u8>>,
}

/// Decodes the extnValue content (the OCTET STRING block) of one extension.
type ExtensionDecoder = fn(&[u8], &BlockInfo, &OidTable) -> Result<ExtensionValue, PkiError>;

/// OID name → decoder. Names come from the OID table, so a table without
/// an entry leaves the extension as [`ExtensionValue::Unknown`].
const EXTENSION_DECODERS: &[(&str, ExtensionDecoder)] = &[
    ("basicConstraints", decode_basic_constraints),
    ("keyUsage", decode_key_usage),
    ("extKeyUsage", decode_ext_key_usage),
    ("subjectAltName", decode_subject_alt_name),
    ("subjectKeyIdentifier", decode_subject_key_identifier),
    ("authorityKeyIdentifier", decode_authority_key_identifier),
];

/// Read the extensions of a `SEQUENCE OF Extension` whose content `dec` covers.
pub(crate) fn read_extensions(
    mut dec: Decoder<'_>,
    oids: &OidTable,
) -> Result<Vec<CertificateExtension>, PkiError> {
    let mut extensions = Vec::new();
    while !dec.is_empty() {
        let ext_dec = dec.read_sequence()?;
        extensions.push(read_extension(ext_dec, oids)?);
    }
    Ok(extensions)
}

/// `Extension ::= SEQUENCE { extnID OID, critical BOOLEAN DEFAULT FALSE, extnValue OCTET STRING }`
fn read_extension(
    mut dec: Decoder<'_>,
    oids: &OidTable,
) -> Result<CertificateExtension, PkiError> {
    let buf = dec.data();
    let oid_block = dec.expect(tags::OID)?;
    let identifier = read_object_identifier(buf, &oid_block, oids)?;

    let critical = if !dec.is_empty() && dec.peek_block()?.is(tags::BOOLEAN) {
        dec.read_boolean()?
    } else {
        false
    };
    let value_block = dec.expect(tags::OCTET_STRING)?;

    let decoder = EXTENSION_DECODERS
        .iter()
        .find(|(name, _)| *name == identifier.name)
        .map(|(_, decode)| *decode);
    let value = match decoder {
        Some(decode) => decode(buf, &value_block, oids)?,
        None => ExtensionValue::Unknown(get_block(buf, &value_block)?.to_vec()),
    };

    Ok(CertificateExtension {
        identifier,
        critical,
        value,
    })
}

/// `SEQUENCE { cA BOOLEAN DEFAULT FALSE, pathLenConstraint INTEGER OPTIONAL }`
fn decode_basic_constraints(
    buf: &[u8],
    block: &BlockInfo,
    _oids: &OidTable,
) -> Result<ExtensionValue, PkiError> {
    let mut dec = Decoder::over(buf, block)?.read_sequence()?;
    let mut bc = BasicConstraints::default();
    if !dec.is_empty() && dec.peek_block()?.is(tags::BOOLEAN) {
        bc.ca = dec.read_boolean()?;
    }
    if !dec.is_empty() {
        let offset = dec.position();
        let path_len = dec.read_uint()?;
        bc.path_len_constraint = Some(u32::try_from(path_len).map_err(|_| {
            Asn1Error::InvalidValue {
                offset,
                what: "pathLenConstraint",
            }
        })?);
    }
    Ok(ExtensionValue::BasicConstraints(bc))
}

/// `BIT STRING`, bits numbered from the MSB of the first octet.
fn decode_key_usage(
    buf: &[u8],
    block: &BlockInfo,
    _oids: &OidTable,
) -> Result<ExtensionValue, PkiError> {
    let (_, data) = Decoder::over(buf, block)?.read_bit_string()?;
    let low = data.first().copied().unwrap_or(0) as u16;
    let high = data.get(1).copied().unwrap_or(0) as u16;
    Ok(ExtensionValue::KeyUsage(KeyUsage(low | (high << 8))))
}

/// `SEQUENCE OF KeyPurposeId`
fn decode_ext_key_usage(
    buf: &[u8],
    block: &BlockInfo,
    oids: &OidTable,
) -> Result<ExtensionValue, PkiError> {
    let mut dec = Decoder::over(buf, block)?.read_sequence()?;
    let mut purposes = Vec::new();
    while !dec.is_empty() {
        let oid_block = dec.expect(tags::OID)?;
        purposes.push(read_object_identifier(buf, &oid_block, oids)?);
    }
    Ok(ExtensionValue::ExtKeyUsage(purposes))
}

/// `SEQUENCE OF GeneralName`
fn decode_subject_alt_name(
    buf: &[u8],
    block: &BlockInfo,
    oids: &OidTable,
) -> Result<ExtensionValue, PkiError> {
    let dec = Decoder::over(buf, block)?.read_sequence()?;
    Ok(ExtensionValue::SubjectAltName(SubjectAltName {
        names: read_general_names(dec, oids)?,
    }))
}

/// `OCTET STRING`
fn decode_subject_key_identifier(
    buf: &[u8],
    block: &BlockInfo,
    _oids: &OidTable,
) -> Result<ExtensionValue, PkiError> {
    let ski = Decoder::over(buf, block)?.read_octet_string()?;
    Ok(ExtensionValue::SubjectKeyIdentifier(ski.to_vec()))
}

/// `SEQUENCE { [0] keyIdentifier OPTIONAL, [1] authorityCertIssuer OPTIONAL,
/// [2] authorityCertSerialNumber OPTIONAL }`
fn decode_authority_key_identifier(
    buf: &[u8],
    block: &BlockInfo,
    oids: &OidTable,
) -> Result<ExtensionValue, PkiError> {
    let mut dec = Decoder::over(buf, block)?.read_sequence()?;
    let mut aki = AuthorityKeyIdentifier::default();
    if let Some(b) = dec.try_read_context_specific(0)? {
        aki.key_identifier = Some(get_block(buf, &b)?.to_vec());
    }
    if let Some(b) = dec.try_read_context_specific(1)? {
        aki.authority_cert_issuer = read_general_names(Decoder::over(buf, &b)?, oids)?;
    }
    if let Some(b) = dec.try_read_context_specific(2)? {
        aki.authority_cert_serial_number = Some(get_block(buf, &b)?.to_vec());
    }
    Ok(ExtensionValue::AuthorityKeyIdentifier(aki))
}

fn read_general_names(
    mut dec: Decoder<'_>,
    oids: &OidTable,
) -> Result<Vec<GeneralName>, PkiError> {
    let mut names = Vec::new();
    while !dec.is_empty() {
        let offset = dec.position();
        let block = dec.read_block()?;
        if block.tag.class != TagClass::ContextSpecific {
            return Err(Asn1Error::UnexpectedTag {
                offset,
                expected: tags::CONTEXT_SPECIFIC,
                found: dec.data()[offset],
            }
            .into());
        }
        names.push(read_general_name(dec.data(), &block, oids)?);
    }
    Ok(names)
}

/// GeneralName ::= CHOICE {
///   otherName       [0], rfc822Name [1] IA5String, dNSName [2] IA5String,
///   x400Address     [3], directoryName [4] EXPLICIT Name,
///   ediPartyName    [5], uniformResourceIdentifier [6] IA5String,
///   iPAddress       [7] OCTET STRING, registeredID [8] OID
/// }
fn read_general_name(
    buf: &[u8],
    block: &BlockInfo,
    oids: &OidTable,
) -> Result<GeneralName, PkiError> {
    let value = get_block(buf, block)?;
    let ia5 = || {
        String::from_utf8(value.to_vec()).map_err(|_| Asn1Error::InvalidValue {
            offset: block.content_offset,
            what: "IA5String",
        })
    };
    let name = match block.tag.number {
        0 => GeneralName::OtherName(value.to_vec()),
        1 => GeneralName::Rfc822Name(ia5()?),
        2 => GeneralName::DnsName(ia5()?),
        4 => {
            let mut dec = Decoder::over(buf, block)?;
            GeneralName::DirectoryName(parse_name(&mut dec, oids)?)
        }
        6 => GeneralName::Uri(ia5()?),
        7 => GeneralName::IpAddress(value.to_vec()),
        8 => GeneralName::RegisteredId(
            Oid::from_der_value(value, block.content_offset)?.to_dot_string(),
        ),
        tag => GeneralName::Other {
            tag,
            value: value.to_vec(),
        },
    };
    Ok(name)
}
