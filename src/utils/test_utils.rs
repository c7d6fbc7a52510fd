//! Scripted I/O and a recording commentator for relay tests.

use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::sync::Mutex;
use std::task::{Context, Poll};

use async_trait::async_trait;
use tokio::io::{AsyncRead, ReadBuf};
use tokio_util::sync::CancellationToken;

use crate::core::commentary::{Commentary, Commentator};

/// Reader that hands out one scripted segment per `read` call, then EOF.
///
/// A segment longer than the caller's buffer is split across reads.
pub struct ScriptedReader {
    reads: VecDeque<Vec<u8>>,
    interrupt_when_drained: Option<CancellationToken>,
}

impl ScriptedReader {
    pub fn new<I, B>(reads: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        Self {
            reads: reads
                .into_iter()
                .map(|read| read.as_ref().to_vec())
                .filter(|read| !read.is_empty())
                .collect(),
            interrupt_when_drained: None,
        }
    }

    /// Instead of EOF, cancel `token` once the script runs out and stay
    /// pending, like a terminal waiting on a user who hits Ctrl+C.
    pub fn interrupted_after<I, B>(reads: I, token: CancellationToken) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        Self {
            interrupt_when_drained: Some(token),
            ..Self::new(reads)
        }
    }
}

impl AsyncRead for ScriptedReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if let Some(mut next) = self.reads.pop_front() {
            let take = next.len().min(buf.remaining());
            buf.put_slice(&next[..take]);
            if take < next.len() {
                let rest = next.split_off(take);
                self.reads.push_front(rest);
            }
        } else if let Some(token) = &self.interrupt_when_drained {
            // The token wakes the relay; this read never completes.
            token.cancel();
            return Poll::Pending;
        }
        Poll::Ready(Ok(()))
    }
}

/// Commentator that records every request and answers `commentary N`.
#[derive(Default)]
pub struct RecordingCommentator {
    requests: Mutex<Vec<String>>,
    fail: bool,
    hang_on_call: Option<(usize, CancellationToken)>,
}

impl RecordingCommentator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request with a rendered failure instead.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// On the `call`-th request (1-based), cancel `token` and never answer.
    pub fn hanging_on(call: usize, token: CancellationToken) -> Self {
        Self {
            hang_on_call: Some((call, token)),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Commentator for RecordingCommentator {
    async fn generate_content(&self, text: &str) -> Commentary {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(text.to_string());
            requests.len()
        };

        if let Some((hang_call, token)) = &self.hang_on_call {
            if *hang_call == call {
                token.cancel();
                std::future::pending::<()>().await;
            }
        }

        if self.fail {
            Commentary::failed(format!("boom {call}"))
        } else {
            Commentary::Text(format!("commentary {call}"))
        }
    }
}
