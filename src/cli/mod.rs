//! CLI subcommand definitions and handlers.
//!
//! Uses clap derive to define the subcommand hierarchy:
//! - `generate` (default) -- synthesize every configured job
//! - `convert` -- transcode existing .wav output with ffmpeg
//! - `voices` -- fetch the service voice catalogue into a JSON file
//! - `clean` -- delete generated audio from the output directory
//! - `version` -- print build/version info

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Batch text-to-speech generator for the Azure speech service.
#[derive(Parser, Debug)]
#[command(
    name = "voxgen",
    version = env!("CARGO_PKG_VERSION"),
    about = "voxgen -- batch text-to-speech against the Azure speech service"
)]
pub struct Cli {
    /// Job file describing what to synthesize.
    #[arg(short, long, default_value = "speech.toml")]
    pub config: PathBuf,

    /// Credentials file holding the service key and region.
    #[arg(long, default_value = crate::credentials::DEFAULT_CREDENTIALS_FILE)]
    pub credentials: PathBuf,

    /// Directory generated audio is written to.
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Synthesize every configured job (default when no subcommand is given).
    Generate {
        /// Also transcode to .ogg and .mp3 and drop the .wav intermediates.
        #[arg(long)]
        transcode: bool,

        /// With --transcode, keep the .wav files too.
        #[arg(long)]
        keep_wav: bool,

        /// Cap on simultaneous synthesis requests (unbounded if omitted).
        #[arg(short = 'j', long)]
        jobs: Option<usize>,
    },

    /// Transcode .wav files already in the output directory.
    Convert {
        /// Target format.
        #[arg(long, value_enum, default_value = "all")]
        to: ConvertTarget,

        /// Delete the .wav sources after a pass with no failures.
        #[arg(long)]
        remove_wav: bool,
    },

    /// Fetch the voice catalogue for the configured region.
    Voices {
        /// File the JSON listing is written to.
        #[arg(long, default_value = "voices.json")]
        out: PathBuf,
    },

    /// Delete generated .wav/.ogg/.mp3 files from the output directory.
    Clean,

    /// Print version, build date, and git commit information.
    Version,
}

/// What `convert` should produce.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConvertTarget {
    Ogg,
    Mp3,
    All,
}

impl ConvertTarget {
    fn formats(self) -> &'static [TargetFormat] {
        match self {
            ConvertTarget::Ogg => &[TargetFormat::Ogg],
            ConvertTarget::Mp3 => &[TargetFormat::Mp3],
            ConvertTarget::All => &[TargetFormat::Ogg, TargetFormat::Mp3],
        }
    }
}

// ---------------------------------------------------------------------------
// Subcommand handlers
// ---------------------------------------------------------------------------

use std::path::Path;
use std::sync::Arc;

use crate::azure::SpeechClient;
use crate::batch::{self, BatchOptions};
use crate::config::SpeechConfig;
use crate::convert::{self, TargetFormat};
use crate::credentials::{self, Credentials};

/// Load credentials or exit with guidance; nothing here works without them.
fn load_credentials(path: &Path) -> Credentials {
    match credentials::load_or_init(path) {
        Ok(credentials) => credentials,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

/// Run the `generate` subcommand (also the default invocation).
pub async fn handle_generate(
    cli: &Cli,
    transcode: bool,
    keep_wav: bool,
    jobs: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = load_credentials(&cli.credentials);
    let config = SpeechConfig::load(&cli.config)?;
    let client = Arc::new(SpeechClient::new(&credentials)?);

    let options = BatchOptions {
        output_dir: cli.output.clone(),
        concurrency: jobs,
    };
    let summary = batch::run(client, config, &options).await?;
    println!(
        "Wrote {} file(s) to {} ({} skipped, {} failed)",
        summary.written,
        cli.output.display(),
        summary.skipped,
        summary.failed
    );

    if transcode && summary.written > 0 {
        let report =
            convert::transcode(&cli.output, &[TargetFormat::Ogg, TargetFormat::Mp3]).await?;
        println!(
            "Converted {} file(s) ({} failed)",
            report.converted, report.failed
        );
        if !keep_wav {
            let removed = convert::remove_artifacts(&cli.output, &["wav"]).await?;
            println!("Removed {} intermediate .wav file(s)", removed);
        }
    }

    if summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Run the `convert` subcommand.
pub async fn handle_convert(
    cli: &Cli,
    to: ConvertTarget,
    remove_wav: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = convert::transcode(&cli.output, to.formats()).await?;
    println!(
        "Converted {} file(s) ({} failed)",
        report.converted, report.failed
    );

    if remove_wav {
        if report.failed > 0 {
            eprintln!("Keeping .wav sources: {} conversion(s) failed", report.failed);
            std::process::exit(1);
        }
        let removed = convert::remove_artifacts(&cli.output, &["wav"]).await?;
        println!("Removed {} .wav file(s)", removed);
    }
    Ok(())
}

/// Run the `voices` subcommand.
pub async fn handle_voices(cli: &Cli, out: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = load_credentials(&cli.credentials);
    let client = SpeechClient::new(&credentials)?;
    let voices = client.voice_list().await?;
    let pretty = serde_json::to_string_pretty(&voices)?;
    tokio::fs::write(out, pretty).await?;
    println!("Voices written to {}", out.display());
    Ok(())
}

/// Run the `clean` subcommand.
pub async fn handle_clean(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let removed = convert::remove_artifacts(&cli.output, convert::GENERATED_EXTENSIONS).await?;
    println!("Removed {} file(s) from {}", removed, cli.output.display());
    Ok(())
}

/// Run the `version` subcommand.
pub fn handle_version() {
    println!("voxgen {}", env!("CARGO_PKG_VERSION"));
    println!("  Build date: {}", env!("VOXGEN_BUILD_DATE"));
    println!("  Git commit: {}", env!("VOXGEN_GIT_HASH"));
    println!(
        "  Platform:   {} ({})",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
