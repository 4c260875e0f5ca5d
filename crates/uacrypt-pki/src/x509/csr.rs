//! PKCS#10 certification request exploration (RFC 2986).

use uacrypt_types::PkiError;
use uacrypt_utils::asn1::{find_block_at_index, read_struct, read_tag, tags, BlockInfo, Decoder};
use uacrypt_utils::oid::read_object_identifier;

use super::certificate::{parse_name, parse_subject_public_key_info};
use super::extensions::{read_extensions, CertificateExtension, ExtensionValue};
use super::{
    BasicConstraints, CertificateExplorer, DistinguishedName, KeyUsage, SubjectAltName,
    SubjectPublicKeyInfo,
};

/// Number of elements in a CertificationRequestInfo:
/// version, subject, subjectPKInfo, attributes.
const REQUEST_INFO_ARITY: usize = 4;

const EXTENSION_REQUEST: &str = "extensionRequest";

/// The extensions a requester asked to have in its certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionRequest {
    pub basic_constraints: Option<BasicConstraints>,
    pub key_usage: Option<KeyUsage>,
    pub subject_alt_name: Option<SubjectAltName>,
    /// Every requested extension, including the three above.
    pub extensions: Vec<CertificateExtension>,
}

impl ExtensionRequest {
    fn from_extensions(extensions: Vec<CertificateExtension>) -> Self {
        let mut request = Self::default();
        for ext in &extensions {
            match &ext.value {
                ExtensionValue::BasicConstraints(bc) => request.basic_constraints = Some(*bc),
                ExtensionValue::KeyUsage(ku) => request.key_usage = Some(*ku),
                ExtensionValue::SubjectAltName(san) => {
                    request.subject_alt_name = Some(san.clone())
                }
                _ => {}
            }
        }
        request.extensions = extensions;
        request
    }
}

/// An explored certification request.
#[derive(Debug, Clone)]
pub struct CertificateSigningRequestInfo {
    /// Raw version INTEGER (0 for RFC 2986 requests).
    pub version: u32,
    pub subject: DistinguishedName,
    pub public_key: SubjectPublicKeyInfo,
    pub extension_request: ExtensionRequest,
}

impl CertificateExplorer<'_> {
    /// Walk a DER CertificationRequest.
    ///
    /// Fails with [`PkiError::UnexpectedStructure`] when the request info does
    /// not have exactly four elements or carries no extensionRequest.
    pub fn explore_certificate_signing_request(
        &self,
        der: &[u8],
    ) -> Result<CertificateSigningRequestInfo, PkiError> {
        self.read_request(der).map_err(|e| {
            tracing::debug!(error = %e, "certificate signing request rejected");
            e
        })
    }

    fn read_request(&self, der: &[u8]) -> Result<CertificateSigningRequestInfo, PkiError> {
        let outer = read_tag(der, 0)?;
        if !outer.is(tags::SEQUENCE) {
            return Err(PkiError::UnexpectedStructure(
                "certification request is not a SEQUENCE".into(),
            ));
        }
        let blocks = read_struct(der, &outer)?;
        let info = blocks.first().ok_or_else(|| {
            PkiError::UnexpectedStructure("empty certification request".into())
        })?;
        self.read_certification_request_info(der, info)
    }

    /// Decode a CertificationRequestInfo block.
    pub fn read_certification_request_info(
        &self,
        buf: &[u8],
        block: &BlockInfo,
    ) -> Result<CertificateSigningRequestInfo, PkiError> {
        let blocks = read_struct(buf, block)?;
        if blocks.len() != REQUEST_INFO_ARITY {
            return Err(PkiError::UnexpectedStructure(format!(
                "certificationRequestInfo has {} elements, expected {REQUEST_INFO_ARITY}",
                blocks.len()
            )));
        }

        let mut dec = Decoder::over(buf, block)?;
        let version = u32::try_from(dec.read_uint()?).map_err(|_| {
            PkiError::UnexpectedStructure("certification request version out of range".into())
        })?;
        let subject = parse_name(&mut dec, self.oids)?;
        let public_key = parse_subject_public_key_info(&mut dec, self.oids)?;

        let attributes = find_block_at_index(&blocks, 0).ok_or_else(|| {
            PkiError::UnexpectedStructure("missing [0] attributes in request info".into())
        })?;
        let extension_request = self.read_extension_request(buf, attributes)?;

        Ok(CertificateSigningRequestInfo {
            version,
            subject,
            public_key,
            extension_request,
        })
    }

    /// `attributes [0] IMPLICIT SET OF Attribute`, where
    /// `Attribute ::= SEQUENCE { type OID, values SET OF ANY }`.
    ///
    /// Every attribute is scanned, not only the first, because PKCS#10 allows
    /// challengePassword and others alongside extensionRequest. A request
    /// where no attribute resolves to `extensionRequest` is still rejected.
    fn read_extension_request(
        &self,
        buf: &[u8],
        attributes: &BlockInfo,
    ) -> Result<ExtensionRequest, PkiError> {
        let mut attr_dec = Decoder::over(buf, attributes)?;
        while !attr_dec.is_empty() {
            let mut attr = attr_dec.read_sequence()?;
            let oid_block = attr.expect(tags::OID)?;
            let identifier = read_object_identifier(buf, &oid_block, self.oids)?;
            if identifier.name != EXTENSION_REQUEST {
                tracing::trace!(attribute = %identifier, "skipping request attribute");
                continue;
            }
            let mut values = attr.read_set()?;
            if values.is_empty() {
                return Err(PkiError::UnexpectedStructure(
                    "extensionRequest attribute has no value".into(),
                ));
            }
            let extensions = values.read_sequence()?;
            return Ok(ExtensionRequest::from_extensions(read_extensions(
                extensions, self.oids,
            )?));
        }
        Err(PkiError::UnexpectedStructure(
            "cannot find extensionRequest attribute".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::x509::{explore_certificate_signing_request, GeneralName};
    use uacrypt_types::Asn1Error;
    use uacrypt_utils::oid::{OidEntry, OidTable};

    const CLIENT_REQUEST: &[u8] =
        include_bytes!("../../../../tests/vectors/csr/opcua_client_request.der");

    // Offsets inside CLIENT_REQUEST
    const INFO_OFFSET: usize = 4;
    const ATTRIBUTES_OFFSET: usize = 382;

    /// Splice `replacement` over `der[start..end]`, fixing the two enclosing
    /// long-form lengths (outer at 0, info at 4).
    fn splice(start: usize, end: usize, replacement: &[u8]) -> Vec<u8> {
        let mut der = CLIENT_REQUEST[..start].to_vec();
        der.extend_from_slice(replacement);
        der.extend_from_slice(&CLIENT_REQUEST[end..]);
        let delta = replacement.len() as isize - (end - start) as isize;
        for len_at in [2, INFO_OFFSET + 2] {
            let len = u16::from_be_bytes([der[len_at], der[len_at + 1]]) as isize + delta;
            der[len_at..len_at + 2].copy_from_slice(&(len as u16).to_be_bytes());
        }
        der
    }

    #[test]
    fn test_explore_request() {
        let csr = explore_certificate_signing_request(CLIENT_REQUEST).unwrap();
        assert_eq!(csr.version, 0);
        assert_eq!(csr.subject.common_name(), Some("NodeOPCUA-Test"));
        assert_eq!(csr.public_key.key_length, 2048);

        let request = &csr.extension_request;
        assert_eq!(
            request.basic_constraints,
            Some(BasicConstraints {
                ca: true,
                path_len_constraint: Some(1)
            })
        );
        let ku = request.key_usage.unwrap();
        assert!(ku.has(KeyUsage::DIGITAL_SIGNATURE));
        assert!(ku.has(KeyUsage::KEY_CERT_SIGN));
        assert!(ku.has(KeyUsage::CRL_SIGN));
        assert!(!ku.has(KeyUsage::NON_REPUDIATION));
        assert_eq!(
            request.subject_alt_name.as_ref().unwrap().names,
            [
                GeneralName::Uri("urn:localhost:Client".into()),
                GeneralName::DnsName("opcua.example.org".into()),
            ]
        );
        assert_eq!(request.extensions.len(), 3);
        assert!(request.extensions.iter().all(|e| !e.critical));
    }

    #[test]
    fn test_request_info_with_three_elements_is_rejected() {
        // drop the [0] attributes element entirely
        let der = splice(ATTRIBUTES_OFFSET, 483, &[]);
        let err = explore_certificate_signing_request(&der).unwrap_err();
        assert!(
            matches!(&err, PkiError::UnexpectedStructure(msg) if msg.contains("3 elements")),
            "{err}"
        );
    }

    #[test]
    fn test_request_info_with_five_elements_is_rejected() {
        let der = splice(483, 483, &[0x05, 0x00]);
        assert!(matches!(
            explore_certificate_signing_request(&der),
            Err(PkiError::UnexpectedStructure(_))
        ));
    }

    #[test]
    fn test_attributes_not_context_tagged_is_rejected() {
        // turn the [0] attributes into a universal SET: arity is 4 but [0] is gone
        let mut der = CLIENT_REQUEST.to_vec();
        der[ATTRIBUTES_OFFSET] = 0x31;
        let err = explore_certificate_signing_request(&der).unwrap_err();
        assert!(
            matches!(&err, PkiError::UnexpectedStructure(msg) if msg.contains("[0]")),
            "{err}"
        );
    }

    #[test_log::test]
    fn test_missing_extension_request_is_rejected() {
        // only a challengePassword attribute
        let attrs = [
            0xA0, 0x14, 0x30, 0x12, 0x06, 0x09, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x09,
            0x07, 0x31, 0x05, 0x13, 0x03, b'p', b'w', b'd',
        ];
        let der = splice(ATTRIBUTES_OFFSET, 483, &attrs);
        let err = explore_certificate_signing_request(&der).unwrap_err();
        assert!(
            matches!(&err, PkiError::UnexpectedStructure(msg) if msg.contains("extensionRequest")),
            "{err}"
        );
    }

    #[test]
    fn test_extension_request_after_other_attribute() {
        let extension_request = &CLIENT_REQUEST[384..483];
        let mut attrs = vec![0xA0, 0x14 + extension_request.len() as u8];
        attrs.extend_from_slice(&[
            0x30, 0x12, 0x06, 0x09, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x09, 0x07, 0x31,
            0x05, 0x13, 0x03, b'p', b'w', b'd',
        ]);
        attrs.extend_from_slice(extension_request);
        let der = splice(ATTRIBUTES_OFFSET, 483, &attrs);
        let csr = explore_certificate_signing_request(&der).unwrap();
        assert_eq!(csr.extension_request.extensions.len(), 3);
    }

    #[test]
    fn test_extension_request_needs_table_name() {
        // a table that does not know 1.2.840.113549.1.9.14 cannot match it
        static ENTRIES: &[OidEntry] = &[OidEntry {
            oid: "2.5.4.3",
            name: "commonName",
            comment: "",
            deprecated: false,
        }];
        static TABLE: OidTable = OidTable::new(ENTRIES);
        let err = CertificateExplorer::new(&TABLE)
            .explore_certificate_signing_request(CLIENT_REQUEST)
            .unwrap_err();
        assert!(matches!(err, PkiError::UnexpectedStructure(_)));
    }

    #[test]
    fn test_read_certification_request_info_directly() {
        let info = read_tag(CLIENT_REQUEST, INFO_OFFSET).unwrap();
        let csr = CertificateExplorer::default()
            .read_certification_request_info(CLIENT_REQUEST, &info)
            .unwrap();
        assert_eq!(csr.subject.get("C"), Some("FR"));
    }

    #[test]
    fn test_truncated_request_is_malformed() {
        let err = explore_certificate_signing_request(&CLIENT_REQUEST[..300]).unwrap_err();
        assert!(matches!(
            err,
            PkiError::Malformed(Asn1Error::Truncated { offset: 4, .. })
        ));
    }
}
