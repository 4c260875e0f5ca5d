#![no_main]
use libfuzzer_sys::fuzz_target;
use uacrypt_channel::remove_padding;

fuzz_target!(|data: &[u8]| {
    if let Some(payload) = remove_padding(data) {
        let footer = &data[payload.len()..];
        assert_eq!(footer.len(), usize::from(data[data.len() - 1]) + 1);
        assert!(footer.iter().all(|&b| b == data[data.len() - 1]));
    }
});
