//! Zero-copy ASN.1 DER decoding.
//!
//! A [`BlockInfo`] never owns bytes: it records where a TLV element sits
//! inside the caller's buffer, and every operation that reads content takes
//! that buffer by reference again.

mod decoder;
mod tag;

pub use decoder::{
    find_block_at_index, get_block, get_raw_block, read_struct, read_tag, read_version_value,
    Decoder,
};

/// ASN.1 identifier octets for the universal types used by X.509 / PKCS#10.
pub mod tags {
    pub const BOOLEAN: u8 = 0x01;
    pub const INTEGER: u8 = 0x02;
    pub const BIT_STRING: u8 = 0x03;
    pub const OCTET_STRING: u8 = 0x04;
    pub const NULL: u8 = 0x05;
    pub const OID: u8 = 0x06;
    pub const UTF8_STRING: u8 = 0x0C;
    pub const PRINTABLE_STRING: u8 = 0x13;
    pub const T61_STRING: u8 = 0x14;
    pub const IA5_STRING: u8 = 0x16;
    pub const UTC_TIME: u8 = 0x17;
    pub const GENERALIZED_TIME: u8 = 0x18;
    pub const BMP_STRING: u8 = 0x1E;
    pub const SEQUENCE: u8 = 0x30;
    pub const SET: u8 = 0x31;
    pub const CONTEXT_SPECIFIC: u8 = 0x80;
    pub const CONSTRUCTED: u8 = 0x20;
}

/// Represents a parsed ASN.1 tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    pub class: TagClass,
    pub constructed: bool,
    pub number: u32,
}

/// ASN.1 tag class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClass {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

/// Position of one TLV element inside a borrowed buffer.
///
/// Invariant (established by [`read_tag`]): `content_offset + content_length`
/// does not exceed the length of the buffer the block was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    pub tag: Tag,
    pub header_length: usize,
    pub content_offset: usize,
    pub content_length: usize,
}

impl BlockInfo {
    /// Offset of the first identifier octet.
    pub fn start(&self) -> usize {
        self.content_offset - self.header_length
    }

    /// Offset one past the last content byte.
    pub fn end(&self) -> usize {
        self.content_offset + self.content_length
    }

    /// Header plus content length.
    pub fn total_length(&self) -> usize {
        self.header_length + self.content_length
    }

    /// True when the block's identifier octet equals `identifier`.
    pub fn is(&self, identifier: u8) -> bool {
        self.tag.identifier_octet() == Some(identifier)
    }

    /// True for a `[n]` context-specific tag, constructed or primitive.
    pub fn is_context(&self, number: u32) -> bool {
        self.tag.class == TagClass::ContextSpecific && self.tag.number == number
    }
}
