//! The read / relay / comment loop.
//!
//! Every chunk read from the input is written to the output unchanged and
//! flushed before anything else happens. Commentary goes to the diagnostics
//! stream only, so nothing but input bytes ever reaches the output.
//!
//! In follow mode each chunk is sent with the prompt as soon as it is read,
//! decoded on its own so a partial character shows up as U+FFFD. In batch mode
//! chunks accumulate through a [`TextDecoder`] and a single request is made
//! after input ends.
//! Either way a finalization step runs after end-of-stream or interruption; in
//! follow mode it re-submits the last chunk, duplicating that chunk's
//! commentary.

use std::io;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::commentary::{Commentary, Commentator};
use crate::core::constants::DEFAULT_CHUNK_SIZE;
use crate::core::prompt::Prompt;
use crate::core::text::TextDecoder;

pub const FOLLOW_ANNOUNCEMENT: &str =
    "Data transfer started...sharing AI thoughts in stderr as we go!\n";
pub const BATCH_ANNOUNCEMENT: &str =
    "Data transfer started...sharing AI thoughts in stderr at the end after the data are through!\n";
pub const INTERRUPT_NOTICE: &str = "\nData transfer interrupted by user.\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayOptions {
    /// Maximum bytes taken from the input per read.
    pub chunk_size: usize,
    /// Comment on every chunk as it arrives instead of once at the end.
    pub follow: bool,
    /// Drop the one-sentence/one-paragraph limit from the prompt.
    pub unlimited: bool,
}

impl Default for RelayOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            follow: false,
            unlimited: false,
        }
    }
}

impl RelayOptions {
    pub fn announcement(&self) -> &'static str {
        if self.follow {
            FOLLOW_ANNOUNCEMENT
        } else {
            BATCH_ANNOUNCEMENT
        }
    }
}

/// Counters describing a finished relay run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelaySummary {
    pub bytes_relayed: u64,
    pub chunks: u64,
    pub submissions: u64,
    pub interrupted: bool,
    pub elapsed: Duration,
}

/// Relay `input` to `output` while writing commentary to `diagnostics`.
///
/// Cancelling `cancel` stops the loop at the next read or while a follow-mode
/// request is in flight; the interruption notice and the finalization request
/// are still written. Only I/O errors on the three streams are returned.
pub async fn run_relay<R, W, D, C>(
    input: &mut R,
    output: &mut W,
    diagnostics: &mut D,
    options: &RelayOptions,
    commentator: &C,
    cancel: &CancellationToken,
) -> io::Result<RelaySummary>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
    D: AsyncWrite + Unpin + ?Sized,
    C: Commentator + ?Sized,
{
    let started = Instant::now();
    let prompt = Prompt::new(options.unlimited);
    let mut summary = RelaySummary::default();

    write_diagnostics(diagnostics, options.announcement()).await?;

    let mut decoder = TextDecoder::new();
    let mut buffer = vec![0u8; options.chunk_size.max(1)];
    // Follow mode: text of the most recent chunk. Batch mode: everything so far.
    let mut last_chunk = String::new();
    let mut accumulated = String::new();

    loop {
        let read = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                summary.interrupted = true;
                break;
            }
            read = input.read(&mut buffer) => read?,
        };
        if read == 0 {
            break;
        }

        let chunk = &buffer[..read];
        output.write_all(chunk).await?;
        output.flush().await?;
        summary.bytes_relayed += read as u64;
        summary.chunks += 1;
        debug!(bytes = read, chunk = summary.chunks, "relayed chunk");

        if !options.follow {
            accumulated.push_str(&decoder.decode(chunk));
            continue;
        }

        // Lossy decoding of a non-empty chunk is never empty, so every chunk
        // yields a request.
        last_chunk = String::from_utf8_lossy(chunk).into_owned();
        if let Some(request) = prompt.request(&last_chunk) {
            summary.submissions += 1;
            let commentary = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    summary.interrupted = true;
                    break;
                }
                commentary = commentator.generate_content(&request) => commentary,
            };
            write_commentary(diagnostics, &commentary).await?;
        }
    }

    if summary.interrupted {
        debug!("relay interrupted");
        write_diagnostics(diagnostics, INTERRUPT_NOTICE).await?;
    }

    let final_request = if options.follow {
        prompt.request(&last_chunk)
    } else {
        accumulated.push_str(&decoder.finish());
        prompt.request(&accumulated)
    };
    if let Some(request) = final_request {
        summary.submissions += 1;
        let commentary = commentator.generate_content(&request).await;
        write_commentary(diagnostics, &commentary).await?;
    }

    summary.elapsed = started.elapsed();
    Ok(summary)
}

async fn write_diagnostics<D>(diagnostics: &mut D, text: &str) -> io::Result<()>
where
    D: AsyncWrite + Unpin + ?Sized,
{
    diagnostics.write_all(text.as_bytes()).await?;
    diagnostics.flush().await
}

/// Write one commentary block, ending it with a newline if it lacks one.
async fn write_commentary<D>(diagnostics: &mut D, commentary: &Commentary) -> io::Result<()>
where
    D: AsyncWrite + Unpin + ?Sized,
{
    let text = commentary.text();
    diagnostics.write_all(text.as_bytes()).await?;
    if !text.ends_with('\n') {
        diagnostics.write_all(b"\n").await?;
    }
    diagnostics.flush().await
}
