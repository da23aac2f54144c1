#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Complete pipeline: container -> scene document -> scene graph walk
    let _ = dsmap::parse_map(data);
});
