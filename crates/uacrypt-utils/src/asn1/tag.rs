//! ASN.1 identifier-octet parsing.

use super::{Tag, TagClass};
use uacrypt_types::Asn1Error;

impl Tag {
    /// Parse the tag starting at `offset` in `buf`.
    /// Returns the tag and number of identifier octets consumed.
    pub fn from_bytes(buf: &[u8], offset: usize) -> Result<(Self, usize), Asn1Error> {
        let first = *buf.get(offset).ok_or(Asn1Error::Truncated {
            offset,
            needed: 1,
            available: 0,
        })?;

        let class = match first >> 6 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        };
        let constructed = (first & 0x20) != 0;

        let low_bits = first & 0x1F;
        if low_bits < 0x1F {
            return Ok((
                Tag {
                    class,
                    constructed,
                    number: low_bits as u32,
                },
                1,
            ));
        }

        // High tag number form: base-128 continuation octets
        let mut number: u32 = 0;
        let mut i = 1;
        loop {
            let pos = offset + i;
            let byte = *buf.get(pos).ok_or(Asn1Error::Truncated {
                offset: pos,
                needed: 1,
                available: 0,
            })?;
            if number > (u32::MAX >> 7) {
                return Err(Asn1Error::InvalidValue {
                    offset,
                    what: "tag number",
                });
            }
            number = (number << 7) | (byte & 0x7F) as u32;
            i += 1;
            if (byte & 0x80) == 0 {
                break;
            }
        }
        Ok((
            Tag {
                class,
                constructed,
                number,
            },
            i,
        ))
    }

    /// The single identifier octet for low tag numbers, `None` for the
    /// multi-octet form.
    pub fn identifier_octet(&self) -> Option<u8> {
        if self.number >= 0x1F {
            return None;
        }
        let class_bits = match self.class {
            TagClass::Universal => 0x00,
            TagClass::Application => 0x40,
            TagClass::ContextSpecific => 0x80,
            TagClass::Private => 0xC0,
        };
        let constructed_bit = if self.constructed { 0x20 } else { 0x00 };
        Some(class_bits | constructed_bit | self.number as u8)
    }
}
