//! Command-line interface parsing and handling
//!
//! This module parses the two mode flags, starts the commentary client, and
//! runs the relay over the process stdio handles until end-of-stream or Ctrl+C.

use std::error::Error;
use std::io;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::core::commentary::GeminiClient;
use crate::core::config::secrets::load_api_key;
use crate::core::config::{resolve_base_url, BASE_URL_ENV_VAR};
use crate::core::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_MODEL};
use crate::core::relay::{run_relay, RelayOptions, RelaySummary};
use crate::utils::format::{format_bytes, format_duration, format_rate};
use crate::utils::logging::init_logging;

/// Exit status after a second Ctrl+C, matching shells' 128 + SIGINT.
pub const SECOND_INTERRUPT_EXIT_CODE: i32 = 130;

#[derive(Parser, Debug)]
#[command(name = "pvai", version)]
#[command(about = "Relay stdin to stdout like pv, sharing AI thoughts on the data in stderr")]
#[command(
    long_about = "pvai reads standard input and writes it to standard output unchanged, \
like the pv utility. Instead of showing transfer progress it sends the data to a \
Gemini model and prints the model's thoughts on it to standard error.\n\n\
Secrets:\n\
  The API key is read from secrets.yml in the working directory, or from the \
pvai config directory:\n\
    SECRETS:\n\
      - gemini_api_key: YOUR_API_KEY\n\n\
Environment Variables:\n\
  GEMINI_BASE_URL   Custom API base URL (optional)\n\
  PVAI_LOG          Log filter for diagnostics, e.g. debug (optional, defaults to error)\n\n\
Controls:\n\
  Ctrl+C            Stop reading and share the final thoughts\n\
  Ctrl+C (twice)    Quit immediately"
)]
pub struct Args {
    /// Continuously print AI thoughts as data comes in from stdin, instead of
    /// gathering the data first and sharing thoughts at the end
    #[arg(long)]
    pub follow: bool,

    /// Do not limit the AI response to a sentence or a paragraph
    #[arg(long)]
    pub unlimited: bool,
}

impl Args {
    pub fn relay_options(&self) -> RelayOptions {
        RelayOptions {
            chunk_size: DEFAULT_CHUNK_SIZE,
            follow: self.follow,
            unlimited: self.unlimited,
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging();

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(async_main(args));
    // A stdin read may still be parked on a blocking thread after Ctrl+C.
    runtime.shutdown_background();
    result
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let options = args.relay_options();

    let client = match connect().await {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };
    debug!(model = client.model(), ?options, "commentary client ready");

    let cancel = CancellationToken::new();
    spawn_interrupt_watcher(cancel.clone());

    let mut stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    let mut stderr = tokio::io::stderr();

    match run_relay(&mut stdin, &mut stdout, &mut stderr, &options, &client, &cancel).await {
        Ok(summary) => {
            log_summary(&summary);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            debug!("downstream reader closed the pipe");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn connect() -> Result<GeminiClient, Box<dyn Error>> {
    let api_key = load_api_key()?;
    let base_url = resolve_base_url(std::env::var(BASE_URL_ENV_VAR).ok().as_deref());
    debug!(%base_url, model = DEFAULT_MODEL, "connecting to Gemini");
    let client = GeminiClient::initialize(DEFAULT_MODEL, api_key, &base_url).await?;
    Ok(client)
}

/// First Ctrl+C cancels the relay; a second one exits immediately.
fn spawn_interrupt_watcher(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        cancel.cancel();
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(SECOND_INTERRUPT_EXIT_CODE);
        }
    });
}

fn log_summary(summary: &RelaySummary) {
    info!(
        chunks = summary.chunks,
        requests = summary.submissions,
        interrupted = summary.interrupted,
        "relayed {} [{}] in {}",
        format_bytes(summary.bytes_relayed as f64),
        format_rate(summary.bytes_relayed, summary.elapsed),
        format_duration(summary.elapsed),
    );
}
