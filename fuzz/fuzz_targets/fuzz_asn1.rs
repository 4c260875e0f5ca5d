#![no_main]
use libfuzzer_sys::fuzz_target;
use uacrypt_utils::asn1::{read_struct, read_tag, Decoder};
use uacrypt_utils::oid::{read_object_identifier, OidTable};

static OIDS: OidTable = OidTable::standard();

fuzz_target!(|data: &[u8]| {
    let mut decoder = Decoder::new(data);
    while !decoder.is_empty() {
        let Ok(block) = decoder.read_block() else {
            break;
        };
        if let Ok(children) = read_struct(data, &block) {
            for child in &children {
                assert!(child.end() <= block.end());
                let _ = read_object_identifier(data, child, &OIDS);
            }
        }
    }
    if let Ok(block) = read_tag(data, 0) {
        assert!(block.end() <= data.len());
    }
});
