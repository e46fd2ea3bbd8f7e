// src/engine/mod.rs

//! Orchestration engine for sshp.
//!
//! This module ties together:
//! - the bounded fan-out over the host list (at most `max_jobs` children)
//! - the event loop that reacts to:
//!   - child spawns
//!   - output lines / chunks / captured streams
//!   - child exits
//!   - host runner failures
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::hosts::HostId;

/// Which child stream a piece of output came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Out,
    Err,
    /// The single pipe carrying both streams in join mode.
    Merged,
}

/// A host the core wants the executor to spawn now.
///
/// `name` is the host name as parsed, and is what the argv is built from.
/// `--trim` only shortens the display name on the host record, after
/// dispatch.
#[derive(Debug, Clone)]
pub struct HostJob {
    pub host: HostId,
    pub name: String,
}

/// Events flowing into the runtime from host runners.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// The child process for a host has been spawned.
    Spawned { host: HostId, started_ms: u64 },
    /// A complete output line (line mode), without its trailing newline.
    Line {
        host: HostId,
        kind: StreamKind,
        line: Vec<u8>,
    },
    /// A raw chunk as read from the pipe (group mode).
    Chunk {
        host: HostId,
        kind: StreamKind,
        bytes: Vec<u8>,
    },
    /// The full captured merged stream (join mode), sent at end-of-file.
    Output { host: HostId, bytes: Vec<u8> },
    /// The child was reaped after all of its pipes hit end-of-file.
    Exited {
        host: HostId,
        exit_code: i32,
        finished_ms: u64,
    },
    /// A host runner hit an unrecoverable error (spawn, read, channel).
    Failed { host: HostId, error: String },
}

pub mod core;
pub mod runtime;

pub use self::core::{CoreCommand, CoreRuntime, CoreStep};
pub use self::runtime::Runtime;
