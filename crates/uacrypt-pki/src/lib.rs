#![forbid(unsafe_code)]
#![doc = "Certificate and certificate-signing-request exploration for uacrypt."]

pub mod x509;
