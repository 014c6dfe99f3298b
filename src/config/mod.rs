//! Job file loading and validation.
//!
//! The job file is TOML; every top-level table is one synthesis job, keyed by
//! the name of the audio file it produces:
//!
//! ```toml
//! [intro]
//! text = "Welcome back."
//! voice = "en-US-JennyNeural"
//! language = "en-US"
//! pitch = 2.5
//! speed = -5.0
//! style = "cheerful"
//! ```
//!
//! Only `text` and `language` are required. Jobs keep their declaration
//! order.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

/// Job names become file stems, so they must stay path-safe.
static VALID_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read job file {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse job file {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("job \"{name}\" in {}: {source}", .path.display())]
    BadJob {
        path: PathBuf,
        name: String,
        source: toml::de::Error,
    },
}

/// Why a job was rejected before synthesis.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum JobError {
    #[error("the name may only contain letters, digits, '_' and '-'")]
    InvalidName,

    #[error("there is no text to synthesize")]
    EmptyText,

    #[error("there is no language code")]
    EmptyLanguage,
}

/// One job as written in the job file, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct JobSpec {
    #[serde(default)]
    pub text: String,

    /// Service voice name, e.g. `en-US-JennyNeural`. Passed through as-is;
    /// the service reports unknown voices itself.
    #[serde(default, rename = "voice")]
    pub voice_name: String,

    /// BCP-47 tag such as `en-US`.
    #[serde(default, rename = "language")]
    pub language_code: String,

    /// Pitch delta in percent relative to the voice default.
    #[serde(default = "default_pitch")]
    pub pitch: f32,

    /// Speaking-rate delta in percent relative to the voice default.
    #[serde(default = "default_speed")]
    pub speed: f32,

    /// Speaking style for neural voices that support one.
    #[serde(default = "default_style")]
    pub style: String,
}

fn default_pitch() -> f32 {
    1.0
}

fn default_speed() -> f32 {
    1.0
}

fn default_style() -> String {
    "neutral".to_string()
}

impl JobSpec {
    /// Validate the declared fields under `name`, producing a synthesizable job.
    pub fn into_job(self, name: &str) -> Result<Job, JobError> {
        if !VALID_NAME.is_match(name) {
            return Err(JobError::InvalidName);
        }
        if self.text.is_empty() {
            return Err(JobError::EmptyText);
        }
        if self.language_code.is_empty() {
            return Err(JobError::EmptyLanguage);
        }
        Ok(Job {
            name: name.to_string(),
            text: self.text,
            voice_name: self.voice_name,
            language_code: self.language_code,
            pitch: self.pitch,
            speed: self.speed,
            style: self.style,
        })
    }
}

/// A validated job, ready for synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub name: String,
    pub text: String,
    pub voice_name: String,
    pub language_code: String,
    pub pitch: f32,
    pub speed: f32,
    pub style: String,
}

/// The parsed job file: named specs in declaration order.
#[derive(Debug, Clone, Default)]
pub struct SpeechConfig {
    pub jobs: Vec<(String, JobSpec)>,
}

impl SpeechConfig {
    /// Load and parse a job file from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw, path)
    }

    /// Parse job file contents. A field of the wrong type anywhere aborts
    /// the whole load; `path` only labels errors.
    pub fn from_toml(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(raw).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        let mut jobs = Vec::with_capacity(table.len());
        for (name, value) in table {
            let spec: JobSpec = value
                .try_into()
                .map_err(|source| ConfigError::BadJob {
                    path: path.to_path_buf(),
                    name: name.clone(),
                    source,
                })?;
            jobs.push((name, spec));
        }
        Ok(Self { jobs })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config = SpeechConfig::from_toml(
            r#"
            [intro]
            text = "hello"
            language = "en-US"
            "#,
            Path::new("speech.toml"),
        )
        .unwrap();

        let (name, spec) = &config.jobs[0];
        assert_eq!(name, "intro");
        assert_eq!(spec.voice_name, "");
        assert_eq!(spec.pitch, 1.0);
        assert_eq!(spec.speed, 1.0);
        assert_eq!(spec.style, "neutral");
    }

    #[test]
    fn test_explicit_fields_override_defaults() {
        let config = SpeechConfig::from_toml(
            r#"
            [promo]
            text = "buy now"
            voice = "en-US-JennyNeural"
            language = "en-US"
            pitch = 2.5
            speed = -5.0
            style = "cheerful"
            "#,
            Path::new("speech.toml"),
        )
        .unwrap();

        let spec = &config.jobs[0].1;
        assert_eq!(spec.voice_name, "en-US-JennyNeural");
        assert_eq!(spec.pitch, 2.5);
        assert_eq!(spec.speed, -5.0);
        assert_eq!(spec.style, "cheerful");
    }

    #[test]
    fn test_jobs_keep_declaration_order() {
        let config = SpeechConfig::from_toml(
            r#"
            [zulu]
            text = "z"
            [alpha]
            text = "a"
            [mike]
            text = "m"
            "#,
            Path::new("speech.toml"),
        )
        .unwrap();

        let names: Vec<&str> = config.jobs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["zulu", "alpha", "mike"]);
    }

    #[test]
    fn test_malformed_toml_is_rejected() {
        let err =
            SpeechConfig::from_toml("[broken\ntext = ", Path::new("speech.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }

    #[test]
    fn test_wrong_field_type_names_the_job() {
        let err = SpeechConfig::from_toml(
            r#"
            [outro]
            text = "bye"
            pitch = "high"
            "#,
            Path::new("speech.toml"),
        )
        .unwrap_err();

        match err {
            ConfigError::BadJob { name, .. } => assert_eq!(name, "outro"),
            other => panic!("Expected BadJob, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let config = SpeechConfig::from_toml(
            r#"
            [intro]
            text = "hello"
            language = "en-US"
            comment = "not a service field"
            "#,
            Path::new("speech.toml"),
        )
        .unwrap();
        assert_eq!(config.jobs.len(), 1);
    }

    #[test]
    fn test_parse_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episode1.toml");
        std::fs::write(&path, "[broken\ntext = ").unwrap();

        let message = SpeechConfig::load(&path).unwrap_err().to_string();
        assert!(message.contains("episode1.toml"), "message: {message}");
    }

    #[test]
    fn test_bad_field_errors_name_the_file_and_the_job() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episode1.toml");
        std::fs::write(&path, "[outro]\ntext = \"bye\"\npitch = \"high\"\n").unwrap();

        let message = SpeechConfig::load(&path).unwrap_err().to_string();
        assert!(message.contains("episode1.toml"), "message: {message}");
        assert!(message.contains("outro"), "message: {message}");
    }

    fn spec(text: &str, language: &str) -> JobSpec {
        JobSpec {
            text: text.to_string(),
            voice_name: String::new(),
            language_code: language.to_string(),
            pitch: default_pitch(),
            speed: default_speed(),
            style: default_style(),
        }
    }

    #[test]
    fn test_valid_job_passes_validation() {
        let job = spec("hello", "en-US").into_job("intro_01").unwrap();
        assert_eq!(job.name, "intro_01");
        assert_eq!(job.text, "hello");
        assert_eq!(job.language_code, "en-US");
    }

    #[test]
    fn test_invalid_name_is_rejected() {
        for name in ["bad name", "semi;colon", "dot.dot", "../escape", ""] {
            let err = spec("hello", "en-US").into_job(name).unwrap_err();
            assert_eq!(err, JobError::InvalidName, "name {:?}", name);
        }
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let err = spec("", "en-US").into_job("intro").unwrap_err();
        assert_eq!(err, JobError::EmptyText);
    }

    #[test]
    fn test_empty_language_is_rejected() {
        let err = spec("hello", "").into_job("intro").unwrap_err();
        assert_eq!(err, JobError::EmptyLanguage);
    }

    #[test]
    fn test_name_check_comes_first() {
        let err = spec("", "").into_job("bad name").unwrap_err();
        assert_eq!(err, JobError::InvalidName);
    }
}
