// src/logging.rs

//! Diagnostics setup for `sshp`.
//!
//! Host output owns stdout, so the `tracing` stream goes to stderr. The
//! level comes from the first of:
//! 1. the `--log-level` flag
//! 2. the `SSHP_LOG` environment variable (anything `tracing::Level`
//!    parses; unparseable values are ignored)
//! 3. `--debug`, which implies `debug` so the prelude and the log stream
//!    arrive together
//! 4. `warn`

use std::io;

use tracing::Level;

use crate::cli::CliArgs;

/// Install the global subscriber. Call once, before any child is spawned.
pub fn init_logging(args: &CliArgs) {
    tracing_subscriber::fmt()
        .with_max_level(resolve_level(args))
        .with_writer(io::stderr)
        .init();
}

fn resolve_level(args: &CliArgs) -> Level {
    if let Some(cli) = args.log_level {
        return cli.into();
    }

    if let Ok(env) = std::env::var("SSHP_LOG") {
        if let Ok(level) = env.trim().parse() {
            return level;
        }
    }

    if args.debug {
        Level::DEBUG
    } else {
        Level::WARN
    }
}
