// src/output/sink.rs

//! The three output disciplines, as pure formatting.
//!
//! The sink never writes anywhere: every method returns the bytes to put on
//! stdout, and the engine core wraps them into `Emit` commands. That keeps
//! the cursor bookkeeping (`last_host`, `newline_printed`) in one place and
//! makes the formatting directly assertable in tests.

use crate::engine::StreamKind;
use crate::hosts::HostId;

use super::Colors;

/// Formatting state shared by all output disciplines.
#[derive(Debug)]
pub struct OutputSink {
    colors: Colors,
    anonymous: bool,
    /// Host whose bytes were most recently emitted (group mode).
    last_host: Option<HostId>,
    /// True exactly when the most recent byte written to stdout was a
    /// newline, or nothing has been written yet.
    newline_printed: bool,
}

impl OutputSink {
    pub fn new(colors: Colors, anonymous: bool) -> Self {
        Self {
            colors,
            anonymous,
            last_host: None,
            newline_printed: true,
        }
    }

    pub fn colors(&self) -> &Colors {
        &self.colors
    }

    fn stream_color(&self, kind: StreamKind) -> &'static str {
        match kind {
            StreamKind::Out | StreamKind::Merged => self.colors.stdout,
            StreamKind::Err => self.colors.stderr,
        }
    }

    /// Line mode: one complete line, host-prefixed unless anonymous,
    /// colored by stream. The line must not contain its trailing newline.
    pub fn line(&mut self, host_name: &str, kind: StreamKind, line: &[u8]) -> Vec<u8> {
        let c = &self.colors;
        let mut out = Vec::with_capacity(line.len() + host_name.len() + 16);

        if !self.anonymous {
            out.extend_from_slice(
                format!("[{}{}{}] ", c.host, host_name, c.reset).as_bytes(),
            );
        }
        out.extend_from_slice(self.stream_color(kind).as_bytes());
        out.extend_from_slice(line);
        out.extend_from_slice(c.reset.as_bytes());
        out.push(b'\n');

        self.newline_printed = true;
        out
    }

    /// Group mode: raw chunk, preceded by a host header whenever the
    /// emitting host changes.
    pub fn chunk(
        &mut self,
        host: HostId,
        host_name: &str,
        kind: StreamKind,
        bytes: &[u8],
    ) -> Vec<u8> {
        let c = &self.colors;
        let mut out = Vec::with_capacity(bytes.len() + host_name.len() + 16);

        if self.last_host != Some(host) {
            if !self.newline_printed {
                out.push(b'\n');
                self.newline_printed = true;
            }
            if !self.anonymous {
                out.extend_from_slice(
                    format!("[{}{}{}]\n", c.host, host_name, c.reset).as_bytes(),
                );
            }
            self.last_host = Some(host);
        }

        out.extend_from_slice(self.stream_color(kind).as_bytes());
        out.extend_from_slice(bytes);
        out.extend_from_slice(c.reset.as_bytes());

        if let Some(&last) = bytes.last() {
            self.newline_printed = last == b'\n';
        }
        out
    }

    /// Per-host exit report, starting at column 0.
    pub fn exit_line(&mut self, host_name: &str, code: i32, delta_ms: u64) -> Vec<u8> {
        let c = &self.colors;
        let code_color = if code == 0 { c.value } else { c.important };
        let mut out = Vec::new();

        if !self.newline_printed {
            out.push(b'\n');
        }
        out.extend_from_slice(
            format!(
                "[{}{}{}] exited: {}{}{} ({}{}{} ms)\n",
                c.host, host_name, c.reset, code_color, code, c.reset, c.value,
                delta_ms, c.reset
            )
            .as_bytes(),
        );

        self.newline_printed = true;
        out
    }

    /// Join-mode progress line, rewritten in place via a carriage return.
    pub fn progress(&mut self, done: usize, total: usize) -> Vec<u8> {
        let c = &self.colors;
        let out = format!(
            "[{}sshp{}] finished {}{}{}/{}{}{}\r",
            c.log_id, c.reset, c.important, done, c.reset, c.important, total,
            c.reset
        )
        .into_bytes();

        self.newline_printed = false;
        out
    }
}
