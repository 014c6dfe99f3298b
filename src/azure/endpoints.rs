//! Region-derived service endpoints.

/// Resolved URLs for one speech resource.
///
/// Normally derived from the resource's region; [`Endpoints::with_base`]
/// exists for sovereign clouds and for tests that point the client at a
/// local server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Synthesis endpoint (POST, SSML body).
    pub synthesize: String,
    /// Voice catalogue endpoint (GET).
    pub voices: String,
}

impl Endpoints {
    /// Endpoints for a public-cloud region such as `westeurope`.
    pub fn for_region(region: &str) -> Self {
        Self::with_base(&format!("https://{region}.tts.speech.microsoft.com"))
    }

    /// Endpoints under an explicit base URL.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            synthesize: format!("{base}/cognitiveservices/v1"),
            voices: format!("{base}/cognitiveservices/voices/list"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_urls() {
        let endpoints = Endpoints::for_region("westeurope");
        assert_eq!(
            endpoints.synthesize,
            "https://westeurope.tts.speech.microsoft.com/cognitiveservices/v1"
        );
        assert_eq!(
            endpoints.voices,
            "https://westeurope.tts.speech.microsoft.com/cognitiveservices/voices/list"
        );
    }

    #[test]
    fn test_base_override_trims_trailing_slash() {
        let endpoints = Endpoints::with_base("http://127.0.0.1:9999/");
        assert_eq!(
            endpoints.synthesize,
            "http://127.0.0.1:9999/cognitiveservices/v1"
        );
        assert_eq!(
            endpoints.voices,
            "http://127.0.0.1:9999/cognitiveservices/voices/list"
        );
    }
}
