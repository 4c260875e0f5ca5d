#![forbid(unsafe_code)]
#![doc = "OPC-UA secure channel cryptography for uacrypt: P_HASH key derivation, padding, AES-CBC and chunk signatures."]

pub mod config;
pub mod crypt;
pub mod nonce;
pub mod record;

pub use config::{DerivedKeyOptions, DerivedKeyOptionsBuilder, SecurityPolicy};
pub use crypt::derived_keys::{compute_derived_keys, derive_channel_keys, ChannelKeys, DerivedKeys};
pub use crypt::prf::make_pseudo_random_buffer;
pub use nonce::Nonce;
pub use record::padding::{
    compute_padding_footer, compute_padding_footer_before_signature, reduce_length, remove_padding,
};
pub use record::signing::{
    make_message_chunk_signature_with_derived_keys, verify_chunk_signature,
    verify_chunk_signature_with_derived_keys, RsaChunkVerifier, SignatureLength,
    SignatureVerifier,
};
pub use record::symmetric::{decrypt_buffer_with_derived_keys, encrypt_buffer_with_derived_keys};
