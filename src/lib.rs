//! Batch text-to-speech generation against the Azure speech service.
//!
//! voxgen reads a TOML job file where every top-level table is one synthesis
//! job, renders each job as SSML, posts it to the Cognitive Services REST
//! endpoint, and writes one audio file per job. The `convert` module covers
//! the optional ffmpeg post-processing step; the `cli` module defines the
//! command surface.

pub mod azure;
pub mod batch;
pub mod cli;
pub mod config;
pub mod convert;
pub mod credentials;
