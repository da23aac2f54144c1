#![no_main]

use dsmap::{DecoderConfig, GraphWalker, SceneDocument};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(document) = SceneDocument::from_json(data) else {
        return;
    };
    let config = DecoderConfig::new().with_max_depth(64);
    let mut walker = GraphWalker::new(&document, &config);
    let _ = walker.walk();
    assert_eq!(walker.open_frames(), 0);
});
