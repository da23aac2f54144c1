#![no_main]

use dsmap::archive::Archive;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Every record field is bounds-checked; malformed containers must error, not panic
    if let Ok(archive) = Archive::read(data) {
        for entry in archive.entries() {
            assert_eq!(entry.content().len(), entry.range.len());
            assert!(entry.range.end <= data.len());
        }
    }
});
