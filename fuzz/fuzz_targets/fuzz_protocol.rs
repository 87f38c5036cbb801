#![no_main]
use libfuzzer_sys::fuzz_target;
use tagsieve::{bad_protocol, AllowedProtocols};

fuzz_target!(|data: &[u8]| {
    // Fuzz the scheme filter with arbitrary attribute values
    let input = String::from_utf8_lossy(data);
    let allowed = AllowedProtocols::default();
    let _ = bad_protocol(&input, &allowed);
});
