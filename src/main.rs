//! Binary entrypoint: set up logging, parse the CLI, dispatch.

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use voxgen::cli::{self, Cli, Command};

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    if let Err(err) = run(&cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        // Bare `voxgen` behaves like `voxgen generate`.
        None => cli::handle_generate(cli, false, false, None).await,
        Some(Command::Generate {
            transcode,
            keep_wav,
            jobs,
        }) => cli::handle_generate(cli, *transcode, *keep_wav, *jobs).await,
        Some(Command::Convert { to, remove_wav }) => {
            cli::handle_convert(cli, *to, *remove_wav).await
        }
        Some(Command::Voices { out }) => cli::handle_voices(cli, out).await,
        Some(Command::Clean) => cli::handle_clean(cli).await,
        Some(Command::Version) => {
            cli::handle_version();
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout stays clean for command output; `RUST_LOG`
/// overrides the default `info` level.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    Registry::default()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
