#![no_main]
use libfuzzer_sys::fuzz_target;
use uacrypt_pki::x509::{explore_certificate, explore_certificate_info};

fuzz_target!(|data: &[u8]| {
    if let Ok(cert) = explore_certificate(data) {
        let _ = cert.basic_constraints();
        let _ = cert.key_usage();
        let _ = cert.subject.to_string();
    }
    let _ = explore_certificate_info(data);
});
