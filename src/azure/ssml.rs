//! SSML document rendering.

use crate::config::Job;

/// Escape the five XML special characters.
pub fn escape_xml(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            _ => result.push(c),
        }
    }
    result
}

/// Render the SSML document for one job.
///
/// Pitch and speed are percentage deltas relative to the voice's default,
/// carried on a `<prosody>` element; `style` selects the speaking style for
/// neural voices that support one. Every interpolated string is XML-escaped,
/// attribute values included.
pub fn render(job: &Job) -> String {
    let language = escape_xml(&job.language_code);
    let voice = escape_xml(&job.voice_name);
    let style = escape_xml(&job.style);
    let text = escape_xml(&job.text);
    format!(
        r#"<speak version='1.0' xml:lang='{language}'>
    <voice xml:lang='{language}' name='{voice}' style='{style}'>
        <prosody pitch='{pitch}%' rate='{rate}%'>
            {text}
        </prosody>
    </voice>
</speak>"#,
        pitch = job.pitch,
        rate = job.speed,
    )
}
