#![no_main]
use libfuzzer_sys::fuzz_target;
use tagsieve::{tokenize_attrs, AllowedProtocols};

fuzz_target!(|data: &[u8]| {
    // Fuzz the attribute tokenizer with arbitrary attribute lists
    let input = String::from_utf8_lossy(data);
    let allowed = AllowedProtocols::default();
    let _ = tokenize_attrs(&input, &allowed);
});
