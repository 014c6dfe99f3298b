//! Azure Cognitive Services speech REST integration.
//!
//! Three pieces: region-derived [`Endpoints`], SSML document rendering in
//! [`ssml`], and the [`SpeechClient`] that performs synthesis and voice-list
//! requests.

pub mod client;
pub mod endpoints;
pub mod ssml;

pub use client::SpeechClient;
pub use endpoints::Endpoints;

use thiserror::Error;

/// Synthesis error types
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("service returned HTTP {status}: {detail}")]
    Service {
        status: reqwest::StatusCode,
        detail: String,
    },

    #[error("no audio returned from the service (HTTP {status})")]
    EmptyAudio { status: reqwest::StatusCode },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, SynthesisError>;
