// tests/common/mod.rs

//! Shared test support: a one-time tracing guard plus builders for the
//! CLI, config, host and core-step values the tests poke at.

use std::sync::Once;

use clap::Parser;

use sshp::cli::CliArgs;
use sshp::config::Config;
use sshp::engine::{CoreCommand, CoreStep, HostJob};
use sshp::hosts::Host;

static TRACING: Once = Once::new();

/// Install the test subscriber once per test binary.
///
/// Honours `SSHP_LOG` the same way the real CLI does, defaulting to
/// `info`; output is captured per-test, so it only shows for failures
/// (or with `-- --nocapture`).
pub fn init_tracing() {
    TRACING.call_once(|| {
        let level = std::env::var("SSHP_LOG")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(tracing::Level::INFO);

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_test_writer()
            .init();
    });
}

/// Parse CLI arguments as `sshp <flags...> <command...>`.
pub fn cli_args(flags: &[&str], command: &[&str]) -> CliArgs {
    let mut argv: Vec<&str> = vec!["sshp"];
    argv.extend_from_slice(flags);
    argv.extend_from_slice(command);
    CliArgs::parse_from(argv)
}

/// Validated config from flags, with terminal-ness pinned off so tests do
/// not depend on how the harness runs.
pub fn config(flags: &[&str]) -> Config {
    let args = cli_args(flags, &["uname", "-v"]);
    Config::from_args_with_tty(&args, false).expect("valid test config")
}

pub fn hosts(names: &[&str]) -> Vec<Host> {
    names.iter().map(|n| Host::new(*n)).collect()
}

/// All bytes a core step wants written to stdout, concatenated.
pub fn emitted(step: &CoreStep) -> Vec<u8> {
    let mut out = Vec::new();
    for command in &step.commands {
        if let CoreCommand::Emit(bytes) = command {
            out.extend_from_slice(bytes);
        }
    }
    out
}

/// All hosts a core step wants dispatched, flattened in order.
pub fn dispatched(step: &CoreStep) -> Vec<HostJob> {
    let mut jobs = Vec::new();
    for command in &step.commands {
        if let CoreCommand::Dispatch(batch) = command {
            jobs.extend(batch.iter().cloned());
        }
    }
    jobs
}
