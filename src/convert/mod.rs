//! Post-processing of generated audio through the `ffmpeg` executable.
//!
//! Converted files land next to their sources with the extension swapped:
//! `output/intro.wav` becomes `output/intro.ogg` and `output/intro.mp3`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Extensions this tool may have produced in the output directory.
pub const GENERATED_EXTENSIONS: &[&str] = &["wav", "ogg", "mp3"];

/// Conversion error types
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("ffmpeg not found on PATH; install it to transcode audio")]
    FfmpegMissing,

    #[error("could not run ffmpeg: {0}")]
    Spawn(std::io::Error),

    #[error("ffmpeg failed: {0}")]
    Ffmpeg(String),

    #[error("could not scan {}: {source}", .dir.display())]
    Scan {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error("could not remove {}: {source}", .path.display())]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Transcode targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    Ogg,
    Mp3,
}

impl TargetFormat {
    /// ffmpeg audio codec for this format.
    pub fn codec(self) -> &'static str {
        match self {
            TargetFormat::Ogg => "libvorbis",
            TargetFormat::Mp3 => "libmp3lame",
        }
    }

    /// Output file extension.
    pub fn extension(self) -> &'static str {
        match self {
            TargetFormat::Ogg => "ogg",
            TargetFormat::Mp3 => "mp3",
        }
    }
}

/// Counts for one conversion pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConvertReport {
    pub converted: usize,
    pub failed: usize,
}

/// Transcode every `.wav` in `dir` into each target format.
///
/// One bad file does not stop the pass: its ffmpeg stderr is logged and the
/// failure counted. A missing ffmpeg binary, on the other hand, is reported
/// before any file is touched.
pub async fn transcode(
    dir: &Path,
    formats: &[TargetFormat],
) -> Result<ConvertReport, ConvertError> {
    ensure_ffmpeg().await?;

    let mut report = ConvertReport::default();
    for input in scan(dir, &["wav"]).await? {
        for format in formats {
            match convert_file(&input, *format).await {
                Ok(output) => {
                    info!("converted {} to {}", input.display(), output.display());
                    report.converted += 1;
                }
                Err(err) => {
                    warn!("conversion of {} failed: {err}", input.display());
                    report.failed += 1;
                }
            }
        }
    }
    Ok(report)
}

/// Delete generated audio files by extension; returns how many were removed.
pub async fn remove_artifacts(dir: &Path, extensions: &[&str]) -> Result<usize, ConvertError> {
    let mut removed = 0;
    for path in scan(dir, extensions).await? {
        tokio::fs::remove_file(&path)
            .await
            .map_err(|source| ConvertError::Remove {
                path: path.clone(),
                source,
            })?;
        debug!("removed {}", path.display());
        removed += 1;
    }
    Ok(removed)
}

/// Check that ffmpeg is on PATH before a conversion pass starts.
async fn ensure_ffmpeg() -> Result<(), ConvertError> {
    match Command::new("ffmpeg").arg("-version").output().await {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(ConvertError::FfmpegMissing),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Err(ConvertError::FfmpegMissing)
        }
        Err(err) => Err(ConvertError::Spawn(err)),
    }
}

/// Run one ffmpeg conversion; the output lands beside the input.
async fn convert_file(input: &Path, format: TargetFormat) -> Result<PathBuf, ConvertError> {
    let output_path = input.with_extension(format.extension());
    let output = Command::new("ffmpeg")
        .args(ffmpeg_args(input, &output_path, format))
        .output()
        .await
        .map_err(ConvertError::Spawn)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(ConvertError::Ffmpeg(stderr));
    }
    Ok(output_path)
}

/// Argument list for one conversion.
fn ffmpeg_args(input: &Path, output: &Path, format: TargetFormat) -> Vec<OsString> {
    vec![
        OsString::from("-y"),
        OsString::from("-i"),
        input.as_os_str().to_os_string(),
        OsString::from("-acodec"),
        OsString::from(format.codec()),
        output.as_os_str().to_os_string(),
    ]
}

/// Files in `dir` (non-recursive, sorted) whose extension is listed.
///
/// A directory that does not exist scans as empty; `clean` before the first
/// run is not an error.
async fn scan(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, ConvertError> {
    let mut found = Vec::new();
    if !dir.exists() {
        return Ok(found);
    }

    let scan_err = |source| ConvertError::Scan {
        dir: dir.to_path_buf(),
        source,
    };
    let mut entries = tokio::fs::read_dir(dir).await.map_err(scan_err)?;
    while let Some(entry) = entries.next_entry().await.map_err(scan_err)? {
        let path = entry.path();
        let listed = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| extensions.contains(&e));
        let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
        if listed && is_file {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
