// src/errors.rs

//! Crate-wide error type and exit-code mapping.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SshpError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Hosts error: {0}")]
    Hosts(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("spawning child for host '{host}': {source}")]
    Spawn {
        host: String,
        source: std::io::Error,
    },

    #[error("Runner error: {0}")]
    Runner(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SshpError {
    /// The process exit code this error maps to: `2` for usage/validation
    /// problems, `3` for unrecoverable system errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            SshpError::Config(_) | SshpError::Hosts(_) => 2,
            _ => 3,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SshpError>;
