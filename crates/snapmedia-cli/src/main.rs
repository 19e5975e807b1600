//! snapmedia: decode media attachments out of stored or live message payloads.
//!
//! - `decode <FILE> [--keys FILE]`: one payload, printed as JSON
//! - `batch <DIR>`: every file in a directory, one JSON line each, then metrics
//!
//! Logs go to stderr, filtered by `RUST_LOG`.

use std::path::PathBuf;
use std::process::ExitCode;

use bytes::Bytes;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use snapmedia_cli::{app::App, batch, config, input};
use snapmedia_core::error::Result;

#[derive(Parser)]
#[command(name = "snapmedia")]
#[command(about = "Decode media attachments from message payloads")]
struct Cli {
    /// Config file; defaults apply when it does not exist.
    #[arg(long, default_value = "snapmedia.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode one payload (JSON message form or binary).
    Decode {
        file: PathBuf,
        /// Key Ring for a binary content payload, one token per line.
        #[arg(long)]
        keys: Option<PathBuf>,
    },
    /// Decode every file in a directory concurrently.
    Batch { dir: PathBuf },
}

async fn run(cli: Cli) -> Result<()> {
    let cfg = config::load_from_file(&cli.config)?;
    let app = App::new(cfg)?;

    match cli.command {
        Command::Decode { file, keys } => {
            let keys = match keys {
                Some(path) => Some(input::parse_key_ring(&tokio::fs::read_to_string(path).await?)),
                None => None,
            };
            let raw = Bytes::from(tokio::fs::read(&file).await?);
            let report = app.decode(&file.display().to_string(), raw, keys)?;
            println!("{}", app.render(&report)?);
        }
        Command::Batch { dir } => {
            let lines = batch::run(app.clone(), &dir).await?;
            for line in &lines {
                println!("{}", app.render(line)?);
            }
            print!("{}", app.metrics().render());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), "{e}");
            ExitCode::FAILURE
        }
    }
}
