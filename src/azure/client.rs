//! HTTP client for the synthesis and voice-list endpoints.

use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::debug;

use super::{ssml, Endpoints, Result, SynthesisError};
use crate::config::Job;
use crate::credentials::Credentials;

/// Subscription key header expected by every speech endpoint.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Header selecting the synthesis container and encoding.
pub const OUTPUT_FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";

/// Synthesis output format: plain RIFF/WAV.
pub const OUTPUT_FORMAT: &str = "riff-16khz-16bit-mono-pcm";

/// Request body content type for synthesis.
pub const SSML_CONTENT_TYPE: &str = "application/ssml+xml";

/// The service rejects requests without a User-Agent.
const USER_AGENT: &str = concat!("voxgen/", env!("CARGO_PKG_VERSION"));

/// Client for one speech resource.
///
/// Holds a connection-pooling [`reqwest::Client`]; clone-free sharing across
/// tasks goes through an `Arc` at the call site. Requests carry no timeout
/// and are never retried: a failed request fails that job only.
pub struct SpeechClient {
    http: reqwest::Client,
    key: String,
    endpoints: Endpoints,
}

impl SpeechClient {
    /// Client for the region named in `credentials`.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let endpoints = Endpoints::for_region(&credentials.region);
        Self::with_endpoints(credentials, endpoints)
    }

    /// Client against explicit endpoints.
    pub fn with_endpoints(credentials: &Credentials, endpoints: Endpoints) -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            key: credentials.key.clone(),
            endpoints,
        })
    }

    /// Synthesize one job, returning the audio bytes exactly as received.
    pub async fn synthesize(&self, job: &Job) -> Result<Vec<u8>> {
        let body = ssml::render(job);
        debug!(job = %job.name, bytes = body.len(), "sending synthesis request");

        let response = self
            .http
            .post(&self.endpoints.synthesize)
            .header(SUBSCRIPTION_KEY_HEADER, &self.key)
            .header(CONTENT_TYPE, SSML_CONTENT_TYPE)
            .header(OUTPUT_FORMAT_HEADER, OUTPUT_FORMAT)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = excerpt(response.text().await.unwrap_or_default().trim());
            return Err(SynthesisError::Service { status, detail });
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(SynthesisError::EmptyAudio { status });
        }
        Ok(audio.to_vec())
    }

    /// Fetch the voice catalogue for the region, as the service returns it.
    pub async fn voice_list(&self) -> Result<Value> {
        let response = self
            .http
            .get(&self.endpoints.voices)
            .header(SUBSCRIPTION_KEY_HEADER, &self.key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = excerpt(response.text().await.unwrap_or_default().trim());
            return Err(SynthesisError::Service { status, detail });
        }
        Ok(response.json().await?)
    }
}

/// Keep service error bodies short enough for one log line.
fn excerpt(body: &str) -> String {
    const LIMIT: usize = 200;
    if body.len() <= LIMIT {
        return body.to_string();
    }
    let mut end = LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_passes_short_bodies_through() {
        assert_eq!(excerpt("quota exceeded"), "quota exceeded");
    }

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        let long = "x".repeat(500);
        let short = excerpt(&long);
        assert_eq!(short.len(), 203);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        // 199 ASCII bytes followed by a two-byte char straddling the limit.
        let tricky = format!("{}é and more", "x".repeat(199));
        let short = excerpt(&tricky);
        assert!(short.ends_with("..."));
        assert!(!short.contains('\u{fffd}'));
    }
}
