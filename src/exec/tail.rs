// src/exec/tail.rs

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinHandle;
use tracing::debug;

/// Bounded buffer holding the most recent bytes written to a child's stderr.
///
/// Cloning shares the buffer, so the forwarding task and the runner see the
/// same bytes.
#[derive(Debug, Clone)]
pub struct StderrTail {
    buf: Arc<Mutex<VecDeque<u8>>>,
    capacity: usize,
}

impl StderrTail {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: Arc::new(Mutex::new(VecDeque::new())),
            capacity,
        }
    }

    /// Append bytes, dropping the oldest ones beyond capacity.
    pub fn push(&self, bytes: &[u8]) {
        if self.capacity == 0 {
            return;
        }
        let mut buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        let keep = &bytes[bytes.len().saturating_sub(self.capacity)..];
        let overflow = (buf.len() + keep.len()).saturating_sub(self.capacity);
        buf.drain(..overflow);
        buf.extend(keep);
    }

    /// Current contents, lossily decoded.
    pub fn snapshot(&self) -> String {
        let buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        let (a, b) = buf.as_slices();
        let mut bytes = Vec::with_capacity(a.len() + b.len());
        bytes.extend_from_slice(a);
        bytes.extend_from_slice(b);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Copy `reader` to `writer` chunk by chunk, recording everything in the
    /// tail. Ends when the reader hits EOF or fails.
    pub fn forward<R, W>(&self, mut reader: R, mut writer: W) -> JoinHandle<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let tail = self.clone();
        tokio::spawn(async move {
            let mut chunk = [0u8; 4096];
            loop {
                let n = match reader.read(&mut chunk).await {
                    Ok(0) => break,
                    Ok(n) => n,
                    Err(e) => {
                        debug!(error = %e, "stderr read failed; stop forwarding");
                        break;
                    }
                };
                tail.push(&chunk[..n]);
                // The terminal going away must not stop us from draining the
                // pipe, so write errors are only logged.
                if let Err(e) = writer.write_all(&chunk[..n]).await {
                    debug!(error = %e, "forwarding stderr failed");
                } else if let Err(e) = writer.flush().await {
                    debug!(error = %e, "flushing forwarded stderr failed");
                }
            }
        })
    }
}
