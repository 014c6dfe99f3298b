#![no_main]

use libfuzzer_sys::fuzz_target;

use voxgen::azure::ssml;
use voxgen::config::Job;

/// SSML rendering runs on arbitrary job text. The escaper must keep every
/// XML special character out of the output, and rendering must never panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let escaped = ssml::escape_xml(text);
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('>'));
        assert!(!escaped.contains('"'));
        assert!(!escaped.contains('\''));

        let job = Job {
            name: "fuzz".to_string(),
            text: text.to_string(),
            voice_name: text.to_string(),
            language_code: text.to_string(),
            pitch: 1.0,
            speed: 1.0,
            style: text.to_string(),
        };
        let _ = ssml::render(&job);
    }
});
