//! ASN.1 DER decoder.
//!
//! All offsets are absolute positions in the caller's buffer. Every length
//! read from the input is checked against the buffer (and against the
//! enclosing element) before it is used to index anything.

use super::{tags, BlockInfo, Tag, TagClass};
use uacrypt_types::Asn1Error;

/// Maximum number of long-form length octets accepted.
const MAX_LENGTH_OCTETS: usize = 4;

/// Decode the TLV header at `offset`.
///
/// Fails if the header itself is cut short or if the declared content range
/// runs past the end of `buf`.
pub fn read_tag(buf: &[u8], offset: usize) -> Result<BlockInfo, Asn1Error> {
    let (tag, tag_len) = Tag::from_bytes(buf, offset)?;
    let length_offset = offset + tag_len;
    let (content_length, length_len) = read_length(buf, length_offset)?;
    let content_offset = length_offset + length_len;

    let end = content_offset
        .checked_add(content_length)
        .ok_or(Asn1Error::LengthOverflow { offset })?;
    if end > buf.len() {
        return Err(Asn1Error::Truncated {
            offset: content_offset,
            needed: content_length,
            available: buf.len() - content_offset,
        });
    }

    Ok(BlockInfo {
        tag,
        header_length: tag_len + length_len,
        content_offset,
        content_length,
    })
}

/// Parse a DER length at `offset`, returning `(length, octets consumed)`.
fn read_length(buf: &[u8], offset: usize) -> Result<(usize, usize), Asn1Error> {
    let first = *buf.get(offset).ok_or(Asn1Error::Truncated {
        offset,
        needed: 1,
        available: 0,
    })?;

    if first < 0x80 {
        return Ok((first as usize, 1));
    }
    if first == 0x80 {
        return Err(Asn1Error::IndefiniteLength { offset });
    }

    let octets = (first & 0x7F) as usize;
    if octets > MAX_LENGTH_OCTETS {
        // also covers the reserved 0xFF form
        return Err(Asn1Error::UnsupportedLength { offset, octets });
    }
    let available = buf.len() - offset - 1;
    if octets > available {
        return Err(Asn1Error::Truncated {
            offset: offset + 1,
            needed: octets,
            available,
        });
    }

    let length = buf[offset + 1..offset + 1 + octets]
        .iter()
        .fold(0usize, |acc, &b| (acc << 8) | b as usize);
    Ok((length, 1 + octets))
}

/// Decode the direct children of a constructed block, in encoding order.
///
/// The children must tile the parent's content exactly; one whose declared
/// length crosses the parent's end is a [`Asn1Error::ChildOverrun`].
pub fn read_struct(buf: &[u8], block: &BlockInfo) -> Result<Vec<BlockInfo>, Asn1Error> {
    let mut dec = Decoder::over(buf, block)?;
    let mut children = Vec::new();
    while !dec.is_empty() {
        children.push(dec.read_block()?);
    }
    Ok(children)
}

/// Borrow the content bytes of `block` without copying.
pub fn get_block<'a>(buf: &'a [u8], block: &BlockInfo) -> Result<&'a [u8], Asn1Error> {
    let end = block
        .content_offset
        .checked_add(block.content_length)
        .ok_or(Asn1Error::LengthOverflow {
            offset: block.content_offset,
        })?;
    buf.get(block.content_offset..end)
        .ok_or(Asn1Error::Truncated {
            offset: block.content_offset,
            needed: block.content_length,
            available: buf.len().saturating_sub(block.content_offset),
        })
}

/// Borrow the complete TLV encoding (header and content) of `block`.
pub fn get_raw_block<'a>(buf: &'a [u8], block: &BlockInfo) -> Result<&'a [u8], Asn1Error> {
    let start = block
        .content_offset
        .checked_sub(block.header_length)
        .ok_or(Asn1Error::InvalidValue {
            offset: block.content_offset,
            what: "block header",
        })?;
    let content = get_block(buf, block)?;
    Ok(&buf[start..block.content_offset + content.len()])
}

/// Find the context-specific child `[index]` (constructed or primitive).
///
/// Optional elements come and go between certificate profiles, so absence
/// is `None` rather than an error.
pub fn find_block_at_index(blocks: &[BlockInfo], index: u32) -> Option<&BlockInfo> {
    blocks.iter().find(|b| b.is_context(index))
}

/// Read the value of an explicit `[0] { INTEGER }` version wrapper.
///
/// Returns the raw INTEGER, so `0` is v1 and `2` is v3.
pub fn read_version_value(buf: &[u8], block: &BlockInfo) -> Result<u32, Asn1Error> {
    let mut dec = Decoder::over(buf, block)?;
    let offset = dec.position();
    let value = dec.read_uint()?;
    u32::try_from(value).map_err(|_| Asn1Error::InvalidValue {
        offset,
        what: "version",
    })
}

/// A cursor over the children of one element.
///
/// Positions reported in blocks and errors are absolute offsets into the
/// buffer passed to [`Decoder::new`] / [`Decoder::over`].
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> Decoder<'a> {
    /// Create a decoder over the whole buffer.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            end: data.len(),
        }
    }

    /// Create a decoder over the content of `block`.
    pub fn over(data: &'a [u8], block: &BlockInfo) -> Result<Self, Asn1Error> {
        let content = get_block(data, block)?;
        Ok(Self {
            data,
            pos: block.content_offset,
            end: block.content_offset + content.len(),
        })
    }

    /// The whole underlying buffer.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Absolute offset of the next element.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns true if all elements have been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.end
    }

    /// Content bytes of a block produced by this decoder.
    pub fn content(&self, block: &BlockInfo) -> Result<&'a [u8], Asn1Error> {
        get_block(self.data, block)
    }

    /// Parse the next element header and step over its content.
    pub fn read_block(&mut self) -> Result<BlockInfo, Asn1Error> {
        let block = self.peek_block()?;
        if block.end() > self.end {
            return Err(Asn1Error::ChildOverrun {
                offset: self.pos,
                end: block.end(),
                parent_end: self.end,
            });
        }
        self.pos = block.end();
        Ok(block)
    }

    /// Parse the next element header without consuming it.
    pub fn peek_block(&self) -> Result<BlockInfo, Asn1Error> {
        if self.is_empty() {
            return Err(Asn1Error::Truncated {
                offset: self.pos,
                needed: 1,
                available: 0,
            });
        }
        read_tag(self.data, self.pos)
    }

    /// Peek at the next tag without consuming it.
    pub fn peek_tag(&self) -> Result<Tag, Asn1Error> {
        Ok(self.peek_block()?.tag)
    }

    /// Read the next element and require its identifier octet.
    pub fn expect(&mut self, identifier: u8) -> Result<BlockInfo, Asn1Error> {
        let offset = self.pos;
        let block = self.read_block()?;
        if !block.is(identifier) {
            return Err(Asn1Error::UnexpectedTag {
                offset,
                expected: identifier,
                found: self.data[offset],
            });
        }
        Ok(block)
    }

    /// Read an INTEGER and return its content bytes (big-endian, two's complement).
    pub fn read_integer(&mut self) -> Result<&'a [u8], Asn1Error> {
        let block = self.expect(tags::INTEGER)?;
        let value = self.content(&block)?;
        if value.is_empty() {
            return Err(Asn1Error::InvalidValue {
                offset: block.content_offset,
                what: "INTEGER",
            });
        }
        Ok(value)
    }

    /// Read a non-negative INTEGER that fits in 64 bits.
    pub fn read_uint(&mut self) -> Result<u64, Asn1Error> {
        let offset = self.pos;
        let value = self.read_integer()?;
        if value[0] & 0x80 != 0 {
            return Err(Asn1Error::InvalidValue {
                offset,
                what: "negative INTEGER",
            });
        }
        let first_significant = value.iter().position(|&b| b != 0).unwrap_or(value.len());
        let significant = &value[first_significant..];
        if significant.len() > 8 {
            return Err(Asn1Error::InvalidValue {
                offset,
                what: "INTEGER larger than 64 bits",
            });
        }
        Ok(significant
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | b as u64))
    }

    /// Read a BOOLEAN value (DER: 0x00=false, 0xFF=true).
    pub fn read_boolean(&mut self) -> Result<bool, Asn1Error> {
        let block = self.expect(tags::BOOLEAN)?;
        match self.content(&block)? {
            [v] => Ok(*v != 0x00),
            _ => Err(Asn1Error::InvalidValue {
                offset: block.content_offset,
                what: "BOOLEAN",
            }),
        }
    }

    /// Read an OCTET STRING.
    pub fn read_octet_string(&mut self) -> Result<&'a [u8], Asn1Error> {
        let block = self.expect(tags::OCTET_STRING)?;
        self.content(&block)
    }

    /// Read a BIT STRING and return (unused_bits, data).
    pub fn read_bit_string(&mut self) -> Result<(u8, &'a [u8]), Asn1Error> {
        let block = self.expect(tags::BIT_STRING)?;
        match self.content(&block)? {
            [unused, data @ ..] if *unused < 8 && (*unused == 0 || !data.is_empty()) => {
                Ok((*unused, data))
            }
            _ => Err(Asn1Error::InvalidValue {
                offset: block.content_offset,
                what: "BIT STRING",
            }),
        }
    }

    /// Read a SEQUENCE, returning a sub-decoder over its contents.
    pub fn read_sequence(&mut self) -> Result<Decoder<'a>, Asn1Error> {
        let block = self.expect(tags::SEQUENCE)?;
        Decoder::over(self.data, &block)
    }

    /// Read a SET, returning a sub-decoder over its contents.
    pub fn read_set(&mut self) -> Result<Decoder<'a>, Asn1Error> {
        let block = self.expect(tags::SET)?;
        Decoder::over(self.data, &block)
    }

    /// Read the next element if it is the context-specific tag `[number]`.
    /// Returns `None` without consuming anything otherwise.
    pub fn try_read_context_specific(
        &mut self,
        number: u32,
    ) -> Result<Option<BlockInfo>, Asn1Error> {
        if self.is_empty() {
            return Ok(None);
        }
        let tag = self.peek_tag()?;
        if tag.class == TagClass::ContextSpecific && tag.number == number {
            Ok(Some(self.read_block()?))
        } else {
            Ok(None)
        }
    }

    /// Read a string value (UTF8String, PrintableString, IA5String,
    /// T61String, or BMPString) and return it as a Rust `String`.
    pub fn read_string(&mut self) -> Result<String, Asn1Error> {
        let offset = self.pos;
        let block = self.read_block()?;
        let value = self.content(&block)?;
        let invalid = Asn1Error::InvalidValue {
            offset: block.content_offset,
            what: "string",
        };
        match block.tag.identifier_octet() {
            Some(tags::UTF8_STRING | tags::PRINTABLE_STRING | tags::IA5_STRING) => {
                String::from_utf8(value.to_vec()).map_err(|_| invalid)
            }
            // TeletexString, treated as Latin-1
            Some(tags::T61_STRING) => Ok(value.iter().map(|&b| b as char).collect()),
            Some(tags::BMP_STRING) => {
                if value.len() % 2 != 0 {
                    return Err(invalid);
                }
                let units: Vec<u16> = value
                    .chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect();
                String::from_utf16(&units).map_err(|_| invalid)
            }
            _ => Err(Asn1Error::UnexpectedTag {
                offset,
                expected: tags::UTF8_STRING,
                found: self.data[offset],
            }),
        }
    }

    /// Read a Time value (UTCTime or GeneralizedTime) as a UNIX timestamp.
    pub fn read_time(&mut self) -> Result<i64, Asn1Error> {
        let offset = self.pos;
        let block = self.read_block()?;
        let value = self.content(&block)?;
        match block.tag.identifier_octet() {
            Some(tags::UTC_TIME) => parse_utc_time(value, block.content_offset),
            Some(tags::GENERALIZED_TIME) => parse_generalized_time(value, block.content_offset),
            _ => Err(Asn1Error::UnexpectedTag {
                offset,
                expected: tags::UTC_TIME,
                found: self.data[offset],
            }),
        }
    }
}

/// Decimal field `s[range]`, ASCII digits only.
fn digits(s: &[u8], start: usize, len: usize) -> Option<u32> {
    let field = s.get(start..start + len)?;
    field.iter().try_fold(0u32, |acc, &b| {
        b.is_ascii_digit().then(|| acc * 10 + (b - b'0') as u32)
    })
}

/// Parse UTCTime "YYMMDDHHMMSSZ" to a UNIX timestamp.
/// RFC 5280: 00-49 → 2000-2049, 50-99 → 1950-1999.
fn parse_utc_time(s: &[u8], offset: usize) -> Result<i64, Asn1Error> {
    let invalid = Asn1Error::InvalidValue {
        offset,
        what: "UTCTime",
    };
    let field = |start, len| digits(s, start, len).ok_or(invalid.clone());
    let yy = field(0, 2)?;
    let year = if yy < 50 { 2000 + yy } else { 1900 + yy };
    datetime_to_unix(year, field(2, 2)?, field(4, 2)?, field(6, 2)?, field(8, 2)?, field(10, 2)?)
        .ok_or(invalid)
}

/// Parse GeneralizedTime "YYYYMMDDHHMMSSZ" to a UNIX timestamp.
fn parse_generalized_time(s: &[u8], offset: usize) -> Result<i64, Asn1Error> {
    let invalid = Asn1Error::InvalidValue {
        offset,
        what: "GeneralizedTime",
    };
    let field = |start, len| digits(s, start, len).ok_or(invalid.clone());
    datetime_to_unix(
        field(0, 4)?,
        field(4, 2)?,
        field(6, 2)?,
        field(8, 2)?,
        field(10, 2)?,
        field(12, 2)?,
    )
    .ok_or(invalid)
}

/// Convert a date-time to a UNIX timestamp (seconds since 1970-01-01 00:00:00 UTC).
fn datetime_to_unix(year: u32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<i64> {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) || hour > 23 || min > 59 || sec > 60
    {
        return None;
    }
    let (year, month, day) = (year as i64, month as i64, day as i64);
    // Days since 0000-03-01, shifted so the epoch lands on zero
    let y = if month <= 2 { year - 1 } else { year };
    let m = if month <= 2 { month + 9 } else { month - 3 };
    let days = 365 * y + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400)
        + (m * 306 + 5) / 10
        + (day - 1)
        - 719468;
    Some(days * 86400 + hour as i64 * 3600 + min as i64 * 60 + sec as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use proptest::prelude::*;

    // SEQUENCE { INTEGER 5, [0] { INTEGER 2 }, OCTET STRING 'AB' }
    const NESTED: [u8; 14] = hex!("300C 020105 A003020102 04024142");

    #[test]
    fn test_read_tag_short_form() {
        let block = read_tag(&NESTED, 0).unwrap();
        assert_eq!(block.tag.number, 0x10);
        assert!(block.tag.constructed);
        assert_eq!(block.header_length, 2);
        assert_eq!(block.content_offset, 2);
        assert_eq!(block.content_length, 12);
        assert_eq!(block.start(), 0);
        assert_eq!(block.end(), 14);
    }

    #[test]
    fn test_read_tag_long_form() {
        let mut data = vec![0x04, 0x82, 0x01, 0x00];
        data.extend_from_slice(&[0xAA; 256]);
        let block = read_tag(&data, 0).unwrap();
        assert_eq!(block.header_length, 4);
        assert_eq!(block.content_length, 256);
        assert_eq!(block.end(), data.len());
    }

    #[test]
    fn test_read_tag_content_past_buffer() {
        let err = read_tag(&hex!("0405 0102"), 0).unwrap_err();
        assert_eq!(
            err,
            Asn1Error::Truncated {
                offset: 2,
                needed: 5,
                available: 2
            }
        );
    }

    #[test]
    fn test_read_tag_rejects_bad_lengths() {
        assert_eq!(
            read_tag(&hex!("3080 0000"), 0).unwrap_err(),
            Asn1Error::IndefiniteLength { offset: 1 }
        );
        assert_eq!(
            read_tag(&hex!("04FF"), 0).unwrap_err(),
            Asn1Error::UnsupportedLength {
                offset: 1,
                octets: 0x7F
            }
        );
        assert_eq!(
            read_tag(&hex!("0485 0000000001 00"), 0).unwrap_err(),
            Asn1Error::UnsupportedLength {
                offset: 1,
                octets: 5
            }
        );
        assert!(matches!(
            read_tag(&hex!("0482 01"), 0).unwrap_err(),
            Asn1Error::Truncated { offset: 2, needed: 2, .. }
        ));
        // missing length octet entirely
        assert!(read_tag(&hex!("30"), 0).is_err());
    }

    #[test]
    fn test_read_struct_children_in_order() {
        let outer = read_tag(&NESTED, 0).unwrap();
        let children = read_struct(&NESTED, &outer).unwrap();
        assert_eq!(children.len(), 3);
        assert!(children[0].is(tags::INTEGER));
        assert!(children[1].is_context(0));
        assert!(children[2].is(tags::OCTET_STRING));
        assert_eq!(children[0].content_offset, 4);
        assert_eq!(children[1].start(), children[0].end());
        assert_eq!(children[2].end(), outer.end());
        assert_eq!(get_block(&NESTED, &children[2]).unwrap(), b"AB");
    }

    #[test]
    fn test_read_struct_child_overrun() {
        // SEQUENCE of length 4 whose INTEGER child claims 3 content bytes
        let data = hex!("3004 0203 010203 FF");
        let outer = read_tag(&data, 0).unwrap();
        assert_eq!(
            read_struct(&data, &outer).unwrap_err(),
            Asn1Error::ChildOverrun {
                offset: 2,
                end: 7,
                parent_end: 6
            }
        );
    }

    #[test]
    fn test_read_struct_forged_block() {
        let forged = BlockInfo {
            content_length: 100,
            ..read_tag(&NESTED, 0).unwrap()
        };
        assert!(read_struct(&NESTED, &forged).is_err());
        assert!(get_block(&NESTED, &forged).is_err());
    }

    #[test]
    fn test_read_struct_empty() {
        let data = hex!("3000");
        let outer = read_tag(&data, 0).unwrap();
        assert!(read_struct(&data, &outer).unwrap().is_empty());
    }

    #[test]
    fn test_get_raw_block() {
        let outer = read_tag(&NESTED, 0).unwrap();
        let children = read_struct(&NESTED, &outer).unwrap();
        assert_eq!(
            get_raw_block(&NESTED, &children[1]).unwrap(),
            &hex!("A003020102")
        );
        assert_eq!(get_raw_block(&NESTED, &outer).unwrap(), &NESTED[..]);
    }

    #[test]
    fn test_find_block_at_index() {
        // [0] constructed, [1] primitive, [3] constructed
        let data = hex!("3009 A0020500 810100 A300");
        let outer = read_tag(&data, 0).unwrap();
        let children = read_struct(&data, &outer).unwrap();
        assert_eq!(find_block_at_index(&children, 0), Some(&children[0]));
        assert_eq!(find_block_at_index(&children, 1), Some(&children[1]));
        assert_eq!(find_block_at_index(&children, 3), Some(&children[2]));
        assert_eq!(find_block_at_index(&children, 2), None);
    }

    #[test]
    fn test_read_version_value() {
        let outer = read_tag(&NESTED, 0).unwrap();
        let children = read_struct(&NESTED, &outer).unwrap();
        assert_eq!(read_version_value(&NESTED, &children[1]).unwrap(), 2);
    }

    #[test]
    fn test_decoder_typed_reads() {
        let mut dec = Decoder::new(&NESTED);
        let mut seq = dec.read_sequence().unwrap();
        assert!(dec.is_empty());
        assert_eq!(seq.read_uint().unwrap(), 5);
        let version = seq.try_read_context_specific(0).unwrap().unwrap();
        assert_eq!(version.content_length, 3);
        assert!(seq.try_read_context_specific(1).unwrap().is_none());
        assert_eq!(seq.read_octet_string().unwrap(), b"AB");
        assert!(seq.is_empty());
        assert!(seq.try_read_context_specific(0).unwrap().is_none());
    }

    #[test]
    fn test_decoder_unexpected_tag() {
        let mut dec = Decoder::new(&hex!("020105"));
        assert_eq!(
            dec.read_octet_string().unwrap_err(),
            Asn1Error::UnexpectedTag {
                offset: 0,
                expected: tags::OCTET_STRING,
                found: tags::INTEGER
            }
        );
    }

    #[test]
    fn test_read_set() {
        // SET { INTEGER 42 }
        let data = hex!("3103 02012A");
        let mut dec = Decoder::new(&data);
        let mut set_dec = dec.read_set().unwrap();
        assert_eq!(set_dec.read_integer().unwrap(), &[0x2A]);
        assert!(set_dec.is_empty());
    }

    #[test]
    fn test_read_boolean() {
        assert!(Decoder::new(&hex!("0101FF")).read_boolean().unwrap());
        assert!(!Decoder::new(&hex!("010100")).read_boolean().unwrap());
        assert!(Decoder::new(&hex!("01020000")).read_boolean().is_err());
    }

    #[test]
    fn test_read_uint() {
        assert_eq!(Decoder::new(&hex!("0203 00FFFF")).read_uint().unwrap(), 0xFFFF);
        assert!(Decoder::new(&hex!("0201 80")).read_uint().is_err());
        assert!(Decoder::new(&hex!("0200")).read_uint().is_err());
        assert!(Decoder::new(&hex!("0209 010000000000000000"))
            .read_uint()
            .is_err());
    }

    #[test]
    fn test_read_bit_string() {
        let (unused, bits) = Decoder::new(&hex!("0302 0186")).read_bit_string().unwrap();
        assert_eq!(unused, 1);
        assert_eq!(bits, &[0x86]);
        assert!(Decoder::new(&hex!("0300")).read_bit_string().is_err());
        assert!(Decoder::new(&hex!("0302 0800")).read_bit_string().is_err());
    }

    #[test]
    fn test_read_string_variants() {
        assert_eq!(
            Decoder::new(&hex!("0C05 48656C6C6F")).read_string().unwrap(),
            "Hello"
        );
        assert_eq!(Decoder::new(&hex!("1302 434E")).read_string().unwrap(), "CN");
        assert_eq!(
            Decoder::new(&hex!("1E04 00480069")).read_string().unwrap(),
            "Hi"
        );
        assert_eq!(Decoder::new(&hex!("1401 E9")).read_string().unwrap(), "é");
        assert!(Decoder::new(&hex!("0201 00")).read_string().is_err());
    }

    #[test]
    fn test_read_time_utc() {
        let mut data = vec![0x17, 13];
        data.extend_from_slice(b"260207131915Z");
        let ts = Decoder::new(&data).read_time().unwrap();
        assert_eq!(ts, datetime_to_unix(2026, 2, 7, 13, 19, 15).unwrap());
    }

    #[test]
    fn test_read_time_generalized() {
        let mut data = vec![0x18, 15];
        data.extend_from_slice(b"21260114131915Z");
        let ts = Decoder::new(&data).read_time().unwrap();
        assert!(ts > 4_900_000_000);
    }

    #[test]
    fn test_read_time_rejects_garbage() {
        let mut data = vec![0x17, 13];
        data.extend_from_slice(b"2602071319\xC3\xA9Z");
        assert!(matches!(
            Decoder::new(&data).read_time(),
            Err(Asn1Error::InvalidValue { offset: 2, .. })
        ));
        let mut short = vec![0x17, 5];
        short.extend_from_slice(b"2602Z");
        assert!(Decoder::new(&short).read_time().is_err());
    }

    #[test]
    fn test_datetime_to_unix_known_dates() {
        assert_eq!(datetime_to_unix(1970, 1, 1, 0, 0, 0).unwrap(), 0);
        assert_eq!(datetime_to_unix(2000, 1, 1, 0, 0, 0).unwrap(), 946_684_800);
        assert_eq!(datetime_to_unix(2024, 2, 29, 12, 0, 0).unwrap(), 1_709_208_000);
        assert!(datetime_to_unix(2024, 13, 1, 0, 0, 0).is_none());
    }

    proptest! {
        #[test]
        fn prop_read_tag_stays_in_bounds(data in proptest::collection::vec(any::<u8>(), 0..64), offset in 0usize..64) {
            if let Ok(block) = read_tag(&data, offset) {
                prop_assert!(block.end() <= data.len());
                prop_assert_eq!(block.start(), offset);
                prop_assert!(get_block(&data, &block).is_ok());
            }
        }

        #[test]
        fn prop_read_struct_children_tile_parent(data in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut framed = vec![0x30, data.len() as u8];
            framed.extend_from_slice(&data);
            if let Ok(outer) = read_tag(&framed, 0) {
                if let Ok(children) = read_struct(&framed, &outer) {
                    let mut pos = outer.content_offset;
                    for child in &children {
                        prop_assert_eq!(child.start(), pos);
                        pos = child.end();
                    }
                    prop_assert_eq!(pos, outer.end());
                }
            }
        }
    }
}
