#![no_main]

use homelinks::format::{deserialize, serialize};
use libfuzzer_sys::fuzz_target;
use std::panic::AssertUnwindSafe;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let result = std::panic::catch_unwind(AssertUnwindSafe(|| deserialize(content)));

        if let Ok(Ok(document)) = result {
            let text = serialize(&document);
            let reparsed = deserialize(&text).expect("serialized output must parse");
            assert!(reparsed == document, "round trip must preserve the document");
            assert!(
                serialize(&reparsed) == text,
                "serialization must be a fixed point"
            );
        }
    }
});
