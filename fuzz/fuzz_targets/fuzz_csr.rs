#![no_main]
use libfuzzer_sys::fuzz_target;
use uacrypt_pki::x509::explore_certificate_signing_request;

fuzz_target!(|data: &[u8]| {
    let _ = explore_certificate_signing_request(data);
});
