//! Static OID name table.

/// One row of the name table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OidEntry {
    pub oid: &'static str,
    pub name: &'static str,
    pub comment: &'static str,
    pub deprecated: bool,
}

/// A read-only OID → name mapping.
///
/// Explorers take the table by reference so callers (and tests) can
/// substitute their own.
#[derive(Debug, Clone, Copy)]
pub struct OidTable {
    entries: &'static [OidEntry],
}

impl OidTable {
    pub const fn new(entries: &'static [OidEntry]) -> Self {
        Self { entries }
    }

    /// The built-in table covering PKCS #1/#9, X.520 attributes, X.509
    /// extensions and PKIX key purposes.
    pub const fn standard() -> Self {
        Self::new(STANDARD_ENTRIES)
    }

    pub fn lookup(&self, oid: &str) -> Option<&'static OidEntry> {
        self.entries.iter().find(|e| e.oid == oid)
    }

    pub fn entries(&self) -> &'static [OidEntry] {
        self.entries
    }
}

impl Default for OidTable {
    fn default() -> Self {
        Self::standard()
    }
}

macro_rules! entries {
    (@flag) => { false };
    (@flag $deprecated:literal) => { $deprecated };
    ($( $oid:literal => $name:literal, $comment:literal $(, $deprecated:literal)? ; )*) => {
        &[$(OidEntry {
            oid: $oid,
            name: $name,
            comment: $comment,
            deprecated: entries!(@flag $($deprecated)?),
        }),*]
    };
}

static STANDARD_ENTRIES: &[OidEntry] = entries! {
    "0.9.2342.19200300.100.1.1" => "userID", "RFC 4519 attribute";
    "0.9.2342.19200300.100.1.3" => "rfc822Mailbox", "RFC 4519 attribute";
    "0.9.2342.19200300.100.1.25" => "domainComponent", "RFC 4519 attribute";

    "1.2.840.10040.4.1" => "dsa", "ANSI X9.57 algorithm";
    "1.2.840.10040.4.3" => "dsaWithSha1", "ANSI X9.57 algorithm";
    "1.2.840.10045.2.1" => "ecPublicKey", "ANSI X9.62 public key type";
    "1.2.840.10045.3.1.7" => "prime256v1", "ANSI X9.62 named curve";
    "1.2.840.10045.4.1" => "ecdsaWithSHA1", "ANSI X9.62 ECDSA algorithm";
    "1.2.840.10045.4.3.2" => "ecdsaWithSHA256", "ANSI X9.62 ECDSA algorithm";
    "1.2.840.10045.4.3.3" => "ecdsaWithSHA384", "ANSI X9.62 ECDSA algorithm";
    "1.2.840.10045.4.3.4" => "ecdsaWithSHA512", "ANSI X9.62 ECDSA algorithm";

    "1.2.840.113549.1.1" => "pkcs-1", "";
    "1.2.840.113549.1.1.1" => "rsaEncryption", "PKCS #1";
    "1.2.840.113549.1.1.2" => "md2WithRSAEncryption", "PKCS #1";
    "1.2.840.113549.1.1.4" => "md5WithRSAEncryption", "PKCS #1";
    "1.2.840.113549.1.1.5" => "sha1WithRSAEncryption", "PKCS #1";
    "1.2.840.113549.1.1.7" => "rsaOAEP", "PKCS #1";
    "1.2.840.113549.1.1.8" => "pkcs1-MGF", "PKCS #1";
    "1.2.840.113549.1.1.10" => "rsaPSS", "PKCS #1";
    "1.2.840.113549.1.1.11" => "sha256WithRSAEncryption", "PKCS #1";
    "1.2.840.113549.1.1.12" => "sha384WithRSAEncryption", "PKCS #1";
    "1.2.840.113549.1.1.13" => "sha512WithRSAEncryption", "PKCS #1";
    "1.2.840.113549.1.1.14" => "sha224WithRSAEncryption", "PKCS #1";

    "1.2.840.113549.1.9.1" => "emailAddress", "PKCS #9, superseded by subjectAltName", true;
    "1.2.840.113549.1.9.2" => "unstructuredName", "PKCS #9";
    "1.2.840.113549.1.9.3" => "contentType", "PKCS #9";
    "1.2.840.113549.1.9.4" => "messageDigest", "PKCS #9";
    "1.2.840.113549.1.9.5" => "signingTime", "PKCS #9";
    "1.2.840.113549.1.9.7" => "challengePassword", "PKCS #9";
    "1.2.840.113549.1.9.8" => "unstructuredAddress", "PKCS #9";
    "1.2.840.113549.1.9.14" => "extensionRequest", "PKCS #9 via CRMF";

    "1.3.6.1.5.5.7.1.1" => "authorityInfoAccess", "PKIX private extension";
    "1.3.6.1.5.5.7.3.1" => "serverAuth", "PKIX key purpose";
    "1.3.6.1.5.5.7.3.2" => "clientAuth", "PKIX key purpose";
    "1.3.6.1.5.5.7.3.3" => "codeSigning", "PKIX key purpose";
    "1.3.6.1.5.5.7.3.4" => "emailProtection", "PKIX key purpose";
    "1.3.6.1.5.5.7.3.8" => "timeStamping", "PKIX key purpose";
    "1.3.6.1.5.5.7.3.9" => "ocspSigning", "PKIX key purpose";
    "1.3.6.1.5.5.7.48.1" => "ocsp", "PKIX access method";
    "1.3.6.1.5.5.7.48.2" => "caIssuers", "PKIX access method";

    "1.3.14.3.2.26" => "sha1", "OIW hash algorithm";
    "2.16.840.1.101.3.4.1.2" => "aes128-CBC", "NIST algorithm";
    "2.16.840.1.101.3.4.1.42" => "aes256-CBC", "NIST algorithm";
    "2.16.840.1.101.3.4.2.1" => "sha256", "NIST hash algorithm";
    "2.16.840.1.101.3.4.2.2" => "sha384", "NIST hash algorithm";
    "2.16.840.1.101.3.4.2.3" => "sha512", "NIST hash algorithm";
    "1.3.132.0.34" => "secp384r1", "SECG named curve";
    "1.3.132.0.35" => "secp521r1", "SECG named curve";
    "1.3.101.112" => "ed25519", "RFC 8410 algorithm";

    "2.5.4.3" => "commonName", "X.520 DN component";
    "2.5.4.4" => "surname", "X.520 DN component";
    "2.5.4.5" => "serialNumber", "X.520 DN component";
    "2.5.4.6" => "countryName", "X.520 DN component";
    "2.5.4.7" => "localityName", "X.520 DN component";
    "2.5.4.8" => "stateOrProvinceName", "X.520 DN component";
    "2.5.4.9" => "streetAddress", "X.520 DN component";
    "2.5.4.10" => "organizationName", "X.520 DN component";
    "2.5.4.11" => "organizationalUnitName", "X.520 DN component";
    "2.5.4.12" => "title", "X.520 DN component";
    "2.5.4.13" => "description", "X.520 DN component";
    "2.5.4.17" => "postalCode", "X.520 DN component";
    "2.5.4.41" => "name", "X.520 DN component";
    "2.5.4.42" => "givenName", "X.520 DN component";
    "2.5.4.43" => "initials", "X.520 DN component";
    "2.5.4.46" => "dnQualifier", "X.520 DN component";
    "2.5.4.65" => "pseudonym", "X.520 DN component";

    "2.5.29.1" => "authorityKeyIdentifier", "X.509 extension, superseded by 2.5.29.35", true;
    "2.5.29.7" => "subjectAltName", "X.509 extension, superseded by 2.5.29.17", true;
    "2.5.29.10" => "basicConstraints", "X.509 extension, superseded by 2.5.29.19", true;
    "2.5.29.14" => "subjectKeyIdentifier", "X.509 extension";
    "2.5.29.15" => "keyUsage", "X.509 extension";
    "2.5.29.16" => "privateKeyUsagePeriod", "X.509 extension";
    "2.5.29.17" => "subjectAltName", "X.509 extension";
    "2.5.29.18" => "issuerAltName", "X.509 extension";
    "2.5.29.19" => "basicConstraints", "X.509 extension";
    "2.5.29.20" => "cRLNumber", "X.509 extension";
    "2.5.29.21" => "cRLReason", "X.509 extension";
    "2.5.29.30" => "nameConstraints", "X.509 extension";
    "2.5.29.31" => "cRLDistributionPoints", "X.509 extension";
    "2.5.29.32" => "certificatePolicies", "X.509 extension";
    "2.5.29.32.0" => "anyPolicy", "X.509 certificate policy";
    "2.5.29.33" => "policyMappings", "X.509 extension";
    "2.5.29.35" => "authorityKeyIdentifier", "X.509 extension";
    "2.5.29.36" => "policyConstraints", "X.509 extension";
    "2.5.29.37" => "extKeyUsage", "X.509 extension";
    "2.5.29.37.0" => "anyExtendedKeyUsage", "X.509 extended key usage";
    "2.5.29.54" => "inhibitAnyPolicy", "X.509 extension";

    "2.16.840.1.113730.1.1" => "netscapeCertType", "Netscape certificate extension";
    "2.16.840.1.113730.1.13" => "netscapeComment", "Netscape certificate extension";
};
