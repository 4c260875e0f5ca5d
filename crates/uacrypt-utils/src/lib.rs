#![forbid(unsafe_code)]
#![doc = "DER decoding and object identifier utilities for uacrypt."]

pub mod asn1;
pub mod oid;
