//! Message chunk protection: padding, AES-CBC and chunk signatures.

pub mod padding;
pub mod signing;
pub mod symmetric;
