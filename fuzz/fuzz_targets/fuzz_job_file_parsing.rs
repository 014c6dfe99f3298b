#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;

use voxgen::config::SpeechConfig;

/// The job file is user-controlled input. Parsing must reject garbage with
/// an error, never a panic, whatever bytes land in `speech.toml`.
///
/// This catches:
/// - Panics in the TOML parser on malformed documents
/// - Panics while mapping top-level values into job specs
/// - Pathological inputs (deep nesting, huge keys) blowing the stack
fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = SpeechConfig::from_toml(text, Path::new("speech.toml"));
    }
});
