//! Concurrent batch synthesis driver.
//!
//! Validates every configured job, fans the valid ones out as tokio tasks,
//! and writes one `<name>.wav` per job into the output directory. A job that
//! fails is logged and counted; it never aborts the rest of the batch.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::azure::{SpeechClient, SynthesisError};
use crate::config::{Job, SpeechConfig};

/// Batch error types
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("could not create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Why one job failed.
#[derive(Debug, Error)]
enum JobFailure {
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error("could not write audio file: {0}")]
    Write(#[from] std::io::Error),
}

/// Counts for one batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Knobs for one batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory the `.wav` files land in; created if absent.
    pub output_dir: PathBuf,
    /// Cap on in-flight synthesis requests. `None` sends everything at once.
    pub concurrency: Option<usize>,
}

/// Run every job in `config` against `client`.
///
/// Skips are decided up front, before any request is made, so a config full
/// of invalid jobs produces no network traffic at all.
pub async fn run(
    client: Arc<SpeechClient>,
    config: SpeechConfig,
    options: &BatchOptions,
) -> Result<BatchSummary, BatchError> {
    tokio::fs::create_dir_all(&options.output_dir)
        .await
        .map_err(|source| BatchError::OutputDir {
            path: options.output_dir.clone(),
            source,
        })?;

    // A zero bound would deadlock; the tightest usable bound is one.
    let permits = Arc::new(Semaphore::new(
        options.concurrency.unwrap_or(Semaphore::MAX_PERMITS).max(1),
    ));
    let mut summary = BatchSummary::default();
    let mut tasks = JoinSet::new();

    for (name, spec) in config.jobs {
        let job = match spec.into_job(&name) {
            Ok(job) => job,
            Err(reason) => {
                warn!("skipping {name}: {reason}");
                summary.skipped += 1;
                continue;
            }
        };

        let client = Arc::clone(&client);
        let permits = Arc::clone(&permits);
        let path = options.output_dir.join(format!("{}.wav", job.name));
        tasks.spawn(async move {
            // The permit covers the file write as well as the request.
            let _permit = permits.acquire_owned().await;
            let outcome = synthesize_to_file(&client, &job, &path).await;
            (job.name, outcome)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(()))) => summary.written += 1,
            Ok((name, Err(failure))) => {
                error!("{name} failed: {failure}");
                summary.failed += 1;
            }
            Err(join_error) => {
                error!("synthesis task panicked: {join_error}");
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

/// Synthesize one job and write the returned bytes untouched.
async fn synthesize_to_file(
    client: &SpeechClient,
    job: &Job,
    path: &Path,
) -> Result<(), JobFailure> {
    let audio = client.synthesize(job).await?;
    info!("writing {}", path.display());
    tokio::fs::write(path, &audio).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azure::Endpoints;
    use crate::credentials::Credentials;

    /// A client whose endpoints are unreachable; good enough for runs that
    /// must never touch the network.
    fn offline_client() -> Arc<SpeechClient> {
        let credentials = Credentials {
            key: "test-key".to_string(),
            region: "nowhere".to_string(),
        };
        let endpoints = Endpoints::with_base("http://127.0.0.1:9");
        Arc::new(SpeechClient::with_endpoints(&credentials, endpoints).unwrap())
    }

    #[tokio::test]
    async fn test_all_invalid_jobs_skip_without_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let config = SpeechConfig::from_toml(
            r#"
            ["bad name"]
            text = "hello"
            language = "en-US"

            [no_text]
            language = "en-US"

            [no_language]
            text = "hello"
            "#,
            Path::new("speech.toml"),
        )
        .unwrap();

        let options = BatchOptions {
            output_dir: dir.path().join("output"),
            concurrency: None,
        };
        let summary = run(offline_client(), config, &options).await.unwrap();

        assert_eq!(
            summary,
            BatchSummary {
                written: 0,
                skipped: 3,
                failed: 0,
            }
        );
        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("output"))
            .unwrap()
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_output_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let options = BatchOptions {
            output_dir: nested.clone(),
            concurrency: Some(2),
        };

        let summary = run(offline_client(), SpeechConfig::default(), &options)
            .await
            .unwrap();
        assert_eq!(summary, BatchSummary::default());
        assert!(nested.is_dir());
    }
}
