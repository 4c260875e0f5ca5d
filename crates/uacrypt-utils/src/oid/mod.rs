//! Object identifier decoding and name resolution.

mod table;

pub use table::{OidEntry, OidTable};

use crate::asn1::{get_block, tags, BlockInfo};
use std::fmt;
use std::str::FromStr;
use uacrypt_types::Asn1Error;

/// A parsed OID represented as a sequence of arc values.
///
/// Arcs are 128 bits wide so UUID-derived identifiers (`2.25.<uuid>`) fit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Oid {
    arcs: Vec<u128>,
}

impl Oid {
    /// Create an OID from a slice of arc values.
    pub fn new(arcs: &[u128]) -> Self {
        Self {
            arcs: arcs.to_vec(),
        }
    }

    /// Return the arc values.
    pub fn arcs(&self) -> &[u128] {
        &self.arcs
    }

    /// Parse an OID from DER content bytes found at `offset`.
    pub fn from_der_value(data: &[u8], offset: usize) -> Result<Self, Asn1Error> {
        if data.is_empty() {
            return Err(Asn1Error::InvalidValue {
                offset,
                what: "empty OBJECT IDENTIFIER",
            });
        }

        let mut arcs = Vec::new();
        let mut i = 0;
        while i < data.len() {
            let (value, consumed) = decode_arc(&data[i..], offset + i)?;
            if i == 0 {
                // First subidentifier packs arc1 * 40 + arc2
                let (first, second) = match value {
                    0..=39 => (0, value),
                    40..=79 => (1, value - 40),
                    _ => (2, value - 80),
                };
                arcs.push(first);
                arcs.push(second);
            } else {
                arcs.push(value);
            }
            i += consumed;
        }

        Ok(Self { arcs })
    }

    /// Return the dotted-string representation (e.g., "1.2.840.113549.1.1.1").
    pub fn to_dot_string(&self) -> String {
        self.arcs
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dot_string())
    }
}

impl FromStr for Oid {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arcs = s
            .split('.')
            .map(|arc| arc.parse::<u128>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid OID {s:?}: {e}"))?;
        if arcs.len() < 2 {
            return Err(format!("invalid OID {s:?}: fewer than two arcs"));
        }
        Ok(Self { arcs })
    }
}

/// Decode one base-128 subidentifier; returns (value, octets consumed).
fn decode_arc(data: &[u8], offset: usize) -> Result<(u128, usize), Asn1Error> {
    if data.first() == Some(&0x80) {
        return Err(Asn1Error::InvalidValue {
            offset,
            what: "non-minimal OID arc",
        });
    }
    let mut value: u128 = 0;
    for (i, &byte) in data.iter().enumerate() {
        if value > (u128::MAX >> 7) {
            return Err(Asn1Error::InvalidValue {
                offset,
                what: "OID arc too large",
            });
        }
        value = (value << 7) | (byte & 0x7F) as u128;
        if (byte & 0x80) == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(Asn1Error::Truncated {
        offset: offset + data.len(),
        needed: 1,
        available: 0,
    })
}

/// An OID with its resolved friendly name.
///
/// `name` and `description` are empty when the table has no entry;
/// [`ObjectIdentifier::display_name`] then falls back to the dotted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectIdentifier {
    pub value: String,
    pub name: String,
    pub description: String,
}

impl ObjectIdentifier {
    /// Resolve a dotted OID string against `table`.
    pub fn resolve(value: String, table: &OidTable) -> Self {
        match table.lookup(&value) {
            Some(entry) => Self {
                value,
                name: entry.name.to_string(),
                description: entry.comment.to_string(),
            },
            None => Self {
                value,
                name: String::new(),
                description: String::new(),
            },
        }
    }

    /// True when the table knew this OID.
    pub fn is_known(&self) -> bool {
        !self.name.is_empty()
    }

    /// Friendly name, or the dotted value for unknown OIDs.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.value
        } else {
            &self.name
        }
    }
}

impl fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Decode the OBJECT IDENTIFIER `block` and look it up in `table`.
///
/// An OID missing from the table is not an error.
pub fn read_object_identifier(
    buf: &[u8],
    block: &BlockInfo,
    table: &OidTable,
) -> Result<ObjectIdentifier, Asn1Error> {
    if !block.is(tags::OID) {
        return Err(Asn1Error::UnexpectedTag {
            offset: block.start(),
            expected: tags::OID,
            found: buf.get(block.start()).copied().unwrap_or_default(),
        });
    }
    let oid = Oid::from_der_value(get_block(buf, block)?, block.content_offset)?;
    let value = oid.to_dot_string();
    if table.lookup(&value).is_none() {
        tracing::trace!(oid = %value, "OID not in name table");
    }
    Ok(ObjectIdentifier::resolve(value, table))
}

/// Map an attribute-type OID to its RFC 4514 short name (e.g. "CN").
pub fn dn_short_name(oid: &str) -> Option<&'static str> {
    match oid {
        "2.5.4.3" => Some("CN"),
        "2.5.4.4" => Some("SN"),
        "2.5.4.5" => Some("serialNumber"),
        "2.5.4.6" => Some("C"),
        "2.5.4.7" => Some("L"),
        "2.5.4.8" => Some("ST"),
        "2.5.4.9" => Some("street"),
        "2.5.4.10" => Some("O"),
        "2.5.4.11" => Some("OU"),
        "2.5.4.12" => Some("title"),
        "2.5.4.42" => Some("GN"),
        "0.9.2342.19200300.100.1.1" => Some("UID"),
        "0.9.2342.19200300.100.1.25" => Some("DC"),
        "1.2.840.113549.1.9.1" => Some("emailAddress"),
        _ => None,
    }
}
