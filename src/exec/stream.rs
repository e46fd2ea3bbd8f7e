// src/exec/stream.rs

//! Per-stream read loops and line reassembly.
//!
//! Each child stream gets one read loop for the lifetime of its pipe; the
//! loop drains the pipe into mode-specific buffers and forwards events to
//! the runtime. End-of-file is the zero-byte read.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;

use crate::config::{Config, Mode};
use crate::engine::{RuntimeEvent, StreamKind};
use crate::errors::{Result, SshpError};
use crate::hosts::HostId;

/// Read buffer size for a single `read` call.
const READ_CHUNK: usize = 4096;

/// The slice of the configuration a stream reader needs.
#[derive(Debug, Clone, Copy)]
pub struct StreamOptions {
    pub mode: Mode,
    pub silent: bool,
    pub max_line_length: usize,
    pub max_output_length: usize,
}

impl StreamOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            mode: config.mode,
            silent: config.silent,
            max_line_length: config.max_line_length,
            max_output_length: config.max_output_length,
        }
    }
}

/// Reassembles a byte stream into lines bounded by a maximum length.
///
/// Emitted lines never contain the trailing newline. When the buffer holds
/// `max` bytes and another byte arrives, a real newline completes the line
/// as-is; any other byte forces the buffered content out as a line of its
/// own and then starts the next line. An over-long input line therefore
/// comes out as two or more lines, the first of exactly `max` bytes.
#[derive(Debug)]
pub struct LineAssembler {
    buf: Vec<u8>,
    max: usize,
}

impl LineAssembler {
    pub fn new(max: usize) -> Self {
        Self {
            buf: Vec::with_capacity(max),
            max,
        }
    }

    /// Feed a chunk; returns the complete lines it produced, in order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        let mut lines = Vec::new();

        for &b in chunk {
            if self.buf.len() == self.max {
                lines.push(self.take());
                if b == b'\n' {
                    continue;
                }
            } else if b == b'\n' {
                lines.push(self.take());
                continue;
            }
            self.buf.push(b);
        }

        lines
    }

    /// Flush any unterminated final line at end-of-stream.
    pub fn finish(&mut self) -> Option<Vec<u8>> {
        if self.buf.is_empty() {
            None
        } else {
            Some(self.take())
        }
    }

    fn take(&mut self) -> Vec<u8> {
        std::mem::replace(&mut self.buf, Vec::with_capacity(self.max))
    }
}

/// Line mode: drain the stream, emitting one event per complete line.
pub async fn read_lines<R: AsyncRead + Unpin>(
    mut reader: R,
    host: HostId,
    kind: StreamKind,
    opts: StreamOptions,
    events_tx: &mpsc::Sender<RuntimeEvent>,
) -> Result<()> {
    let mut assembler = LineAssembler::new(opts.max_line_length);
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        if opts.silent {
            continue;
        }
        for line in assembler.feed(&chunk[..n]) {
            send_event(events_tx, RuntimeEvent::Line { host, kind, line }).await?;
        }
    }

    if !opts.silent {
        if let Some(line) = assembler.finish() {
            send_event(events_tx, RuntimeEvent::Line { host, kind, line }).await?;
        }
    }

    Ok(())
}

/// Group mode: forward raw chunks as they are read.
pub async fn read_chunks<R: AsyncRead + Unpin>(
    mut reader: R,
    host: HostId,
    kind: StreamKind,
    opts: StreamOptions,
    events_tx: &mpsc::Sender<RuntimeEvent>,
) -> Result<()> {
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        if opts.silent {
            continue;
        }
        let bytes = chunk[..n].to_vec();
        send_event(events_tx, RuntimeEvent::Chunk { host, kind, bytes }).await?;
    }

    Ok(())
}

/// Join mode: accumulate the merged stream up to `max_output_length` bytes
/// (excess is dropped, not an error) and hand it over at end-of-file.
pub async fn read_merged<R: AsyncRead + Unpin>(
    mut reader: R,
    host: HostId,
    opts: StreamOptions,
    events_tx: &mpsc::Sender<RuntimeEvent>,
) -> Result<()> {
    let mut output: Vec<u8> = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        let room = opts.max_output_length - output.len();
        let keep = n.min(room);
        output.extend_from_slice(&chunk[..keep]);
    }

    send_event(events_tx, RuntimeEvent::Output {
        host,
        bytes: output,
    })
    .await
}

pub(crate) async fn send_event(
    events_tx: &mpsc::Sender<RuntimeEvent>,
    event: RuntimeEvent,
) -> Result<()> {
    events_tx
        .send(event)
        .await
        .map_err(|_| SshpError::Runner("runtime event channel closed".to_string()))
}
