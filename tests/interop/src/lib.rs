//! Integration tests for uacrypt.
//! Cross-crate scenarios: certificate facts feeding chunk verification, and
//! the symmetric key schedule end to end.

use uacrypt_channel::{
    compute_padding_footer_before_signature, decrypt_buffer_with_derived_keys,
    encrypt_buffer_with_derived_keys, make_message_chunk_signature_with_derived_keys,
    reduce_length, remove_padding, verify_chunk_signature_with_derived_keys, DerivedKeys,
};
use uacrypt_types::ChannelError;

/// Self-signed RSA-2048 application instance certificate.
pub const SERVER_CERT: &[u8] = include_bytes!("../../vectors/x509/opcua_server_rsa2048.der");
/// PKCS#10 request with an extensionRequest attribute.
pub const CLIENT_REQUEST: &[u8] = include_bytes!("../../vectors/csr/opcua_client_request.der");
/// OpenSecureChannel chunks signed with the key of [`SERVER_CERT`].
pub const CHUNK_RSA_SHA1: &[u8] = include_bytes!("../../vectors/chunk/opn_rsa_sha1.bin");
pub const CHUNK_RSA_SHA256: &[u8] = include_bytes!("../../vectors/chunk/opn_rsa_sha256.bin");
pub const CHUNK_RSA_PSS_SHA256: &[u8] =
    include_bytes!("../../vectors/chunk/opn_rsa_pss_sha256.bin");

/// Pad, sign the padded body, then encrypt body, padding and signature
/// together.
pub fn seal_chunk(body: &[u8], keys: &DerivedKeys) -> Result<Vec<u8>, ChannelError> {
    let mut plain = body.to_vec();
    plain.extend_from_slice(&compute_padding_footer_before_signature(body, keys));
    let signature = make_message_chunk_signature_with_derived_keys(&plain, keys)?;
    plain.extend_from_slice(&signature);
    Ok(encrypt_buffer_with_derived_keys(&plain, keys)?)
}

/// Reverse of [`seal_chunk`]. `Ok(None)` means the chunk was rejected.
pub fn open_chunk(sealed: &[u8], keys: &DerivedKeys) -> Result<Option<Vec<u8>>, ChannelError> {
    let plain = decrypt_buffer_with_derived_keys(sealed, keys)?;
    if !verify_chunk_signature_with_derived_keys(&plain, keys) {
        return Ok(None);
    }
    let padded = reduce_length(&plain, keys.signature_length());
    Ok(remove_padding(padded).map(<[u8]>::to_vec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use uacrypt_channel::{
        derive_channel_keys, verify_chunk_signature, Nonce, RsaChunkVerifier, SecurityPolicy,
        SignatureLength,
    };
    use uacrypt_pki::x509::{
        explore_certificate, explore_certificate_info, explore_certificate_signing_request,
        make_sha1_thumbprint, CertificateExplorer,
    };
    use uacrypt_types::{PkiError, SignatureAlgId};
    use uacrypt_utils::asn1::{read_struct, read_tag};
    use uacrypt_utils::oid::OidTable;

    // -------------------------------------------------------
    // 1. Certificate → inferred signature length → RSA chunk verification
    // -------------------------------------------------------
    #[test]
    fn test_certificate_drives_chunk_verification() {
        let info = explore_certificate_info(SERVER_CERT).unwrap();
        assert_eq!(info.public_key_length, 256);

        let cases = [
            (SecurityPolicy::Basic128Rsa15, CHUNK_RSA_SHA1),
            (SecurityPolicy::Basic256, CHUNK_RSA_SHA1),
            (SecurityPolicy::Basic256Sha256, CHUNK_RSA_SHA256),
            (SecurityPolicy::Aes128Sha256RsaOaep, CHUNK_RSA_SHA256),
            (SecurityPolicy::Aes256Sha256RsaPss, CHUNK_RSA_PSS_SHA256),
        ];
        for (policy, chunk) in cases {
            let verifier =
                RsaChunkVerifier::from_certificate(&info, policy.asymmetric_signature_algorithm())
                    .unwrap();
            assert!(
                verify_chunk_signature(chunk, SignatureLength::InferFromKey(&info), &verifier),
                "{policy}"
            );
        }
    }

    #[test_log::test]
    fn test_tampered_opn_chunk_rejected() {
        let info = explore_certificate_info(SERVER_CERT).unwrap();
        let verifier =
            RsaChunkVerifier::from_certificate(&info, SignatureAlgId::RsaPssSha256).unwrap();
        for i in [0, 40, 79, 80, 335] {
            let mut chunk = CHUNK_RSA_PSS_SHA256.to_vec();
            chunk[i] ^= 0x04;
            assert!(
                !verify_chunk_signature(&chunk, SignatureLength::InferFromKey(&info), &verifier),
                "byte {i}"
            );
        }
    }

    // -------------------------------------------------------
    // 2. Certificate facts and thumbprint
    // -------------------------------------------------------
    #[test]
    fn test_certificate_thumbprint_and_identity() {
        assert_eq!(
            hex::encode_upper(make_sha1_thumbprint(SERVER_CERT)),
            "780FFD2404388E73925D5637A3095989D151C0FB"
        );
        let cert = explore_certificate(SERVER_CERT).unwrap();
        assert!(cert.is_self_issued());
        assert_eq!(
            cert.subject.to_string(),
            "CN=NodeOPCUA-Test, O=Sterfive, L=Orleans, C=FR"
        );
        let san = cert.subject_alt_name().unwrap();
        assert_eq!(
            san.uris().collect::<Vec<_>>(),
            ["urn:localhost:NodeOPCUA-Server"]
        );
        assert_eq!(san.ip_addresses().collect::<Vec<_>>(), [&[127u8, 0, 0, 1][..]]);
    }

    #[test]
    fn test_csr_and_certificate_share_subject_key_size() {
        let csr = explore_certificate_signing_request(CLIENT_REQUEST).unwrap();
        let cert = explore_certificate(SERVER_CERT).unwrap();
        assert_eq!(csr.subject, cert.subject);
        assert_eq!(
            csr.public_key.key_length,
            cert.subject_public_key_info.key_length
        );
        assert!(csr.extension_request.basic_constraints.unwrap().ca);
    }

    // -------------------------------------------------------
    // 3. Reduced OID table injected into the explorer
    // -------------------------------------------------------
    #[test]
    fn test_reduced_oid_table() {
        static EMPTY: OidTable = OidTable::new(&[]);
        let explorer = CertificateExplorer::new(&EMPTY);

        let cert = explorer.explore_certificate(SERVER_CERT).unwrap();
        // structure is still decoded; names fall back to dotted values
        assert_eq!(
            cert.signature_algorithm.identifier.display_name(),
            "1.2.840.113549.1.1.11"
        );
        assert_eq!(cert.subject.common_name(), Some("NodeOPCUA-Test"));
        assert!(cert.basic_constraints().is_none());

        assert!(matches!(
            explorer.explore_certificate_signing_request(CLIENT_REQUEST),
            Err(PkiError::UnexpectedStructure(_))
        ));
    }

    // -------------------------------------------------------
    // 4. Raw decoder over a full certificate
    // -------------------------------------------------------
    #[test]
    fn test_decoder_top_level_structure() {
        let outer = read_tag(SERVER_CERT, 0).unwrap();
        assert_eq!(outer.end(), SERVER_CERT.len());
        let parts = read_struct(SERVER_CERT, &outer).unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].content_length, 257);
    }

    // -------------------------------------------------------
    // 5. Full symmetric key schedule (Basic256Sha256)
    // -------------------------------------------------------
    #[test]
    fn test_basic256sha256_key_schedule() {
        let client_nonce: Vec<u8> = (0u8..32).collect();
        let server_nonce: Vec<u8> = (32u8..64).collect();
        let options = SecurityPolicy::Basic256Sha256.derived_key_options();
        let keys = derive_channel_keys(&options, &client_nonce, &server_nonce).unwrap();
        assert_eq!(
            keys.client.signing_key(),
            hex!("dd585db0c102dd1a4c1ed4dd195606dec3f7a1c789afca78f9479ed3a5d668af")
        );
        assert_eq!(
            keys.server.initialization_vector(),
            hex!("c513e9172274d5ed54e52a3552901ae0")
        );
    }

    // -------------------------------------------------------
    // 6. Client seals, server opens, every policy
    // -------------------------------------------------------
    #[test]
    fn test_seal_open_every_policy() {
        let body = b"MSGF request: Browse ns=0;i=85, maxReferences=1000";
        for policy in SecurityPolicy::ALL {
            let len = policy.secure_channel_nonce_length();
            let client_nonce = Nonce::random(len).unwrap();
            let server_nonce = Nonce::random(len).unwrap();
            let options = policy.derived_key_options();

            let client_side = derive_channel_keys(
                &options,
                client_nonce.as_bytes(),
                server_nonce.as_bytes(),
            )
            .unwrap();
            let server_side = derive_channel_keys(
                &options,
                client_nonce.as_bytes(),
                server_nonce.as_bytes(),
            )
            .unwrap();

            let sealed = seal_chunk(body, &client_side.client).unwrap();
            assert_eq!(
                open_chunk(&sealed, &server_side.client).unwrap().as_deref(),
                Some(&body[..]),
                "{policy}"
            );
            // the server's own keys cannot open client traffic
            assert_eq!(open_chunk(&sealed, &server_side.server).unwrap(), None);
        }
    }

    #[test_log::test]
    fn test_open_rejects_tampered_chunk() {
        let options = SecurityPolicy::Aes256Sha256RsaPss.derived_key_options();
        let keys = derive_channel_keys(&options, &[0xC1; 32], &[0x5E; 32]).unwrap();
        let mut sealed = seal_chunk(&[0x42; 100], &keys.server).unwrap();
        sealed[0x50..0x55].copy_from_slice(b"HELLO");
        assert_eq!(open_chunk(&sealed, &keys.server).unwrap(), None);
        // truncated ciphertext is no longer block aligned
        assert!(open_chunk(&sealed[..10], &keys.server).is_err());
    }

    #[test]
    fn test_sealed_chunk_is_block_aligned_with_signature_inside() {
        let options = SecurityPolicy::Basic256.derived_key_options();
        let keys = derive_channel_keys(&options, &[0x01; 32], &[0x02; 32]).unwrap();
        let body = [0x42u8; 30];
        let sealed = seal_chunk(&body, &keys.client).unwrap();
        // 30 body + 14 footer + 20 HMAC-SHA1
        assert_eq!(sealed.len(), 64);

        let plain = decrypt_buffer_with_derived_keys(&sealed, &keys.client).unwrap();
        assert!(verify_chunk_signature_with_derived_keys(&plain, &keys.client));
        assert_eq!(&plain[..30], &body[..]);
        assert_eq!(&plain[30..44], &[13u8; 14][..]);
    }
}
