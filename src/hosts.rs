// src/hosts.rs

//! Host records and host-list parsing.
//!
//! Hosts are read from a file (`-f/--file`) or standard input, one per line.
//! Comment lines (leading `#`), lines starting with a space and blank lines
//! are skipped. Insertion order is preserved: the host list is the ordered
//! spine the scheduler walks exactly once.

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use tracing::debug;

use crate::errors::{Result, SshpError};

/// Index of a host in the run's host list.
pub type HostId = usize;

/// Record for a single target host and its eventual results.
///
/// The live child process and its pipe ends are owned by the host-runner
/// task for the duration of the run; results land here via runtime events.
#[derive(Debug, Clone)]
pub struct Host {
    pub name: String,
    /// Exit code once the child has been reaped.
    pub exit_code: Option<i32>,
    pub started_ms: Option<u64>,
    pub finished_ms: Option<u64>,
    /// Captured output (join mode only).
    pub output: Option<Vec<u8>>,
    /// Equivalence class assigned by join aggregation.
    pub output_class: Option<usize>,
}

impl Host {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exit_code: None,
            started_ms: None,
            finished_ms: None,
            output: None,
            output_class: None,
        }
    }
}

/// Parse a host list from any buffered reader.
///
/// Returns `Err` if no hosts remain after filtering.
pub fn parse_hosts(reader: impl BufRead) -> Result<Vec<Host>> {
    let mut hosts = Vec::new();

    for line in reader.lines() {
        let line = line?;

        // Skip comments and blank lines.
        match line.as_bytes().first() {
            None | Some(b'#') | Some(b' ') => continue,
            _ => {}
        }

        hosts.push(Host::new(line));
    }

    if hosts.is_empty() {
        return Err(SshpError::Hosts("no hosts specified".to_string()));
    }

    debug!(count = hosts.len(), "parsed host list");
    Ok(hosts)
}

/// Load the host list from the given file, or from stdin when `file` is
/// `None` or `"-"`.
pub fn load_hosts(file: Option<&str>) -> Result<Vec<Host>> {
    match file {
        Some(path) if path != "-" => {
            let f = File::open(path).map_err(|e| {
                SshpError::Hosts(format!("open {path}: {e}"))
            })?;
            parse_hosts(BufReader::new(f))
        }
        _ => {
            let stdin = io::stdin();
            parse_hosts(stdin.lock())
        }
    }
}
