// src/lib.rs

pub mod cli;
pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod hosts;
pub mod logging;
pub mod output;

use tokio::sync::mpsc;
use tracing::debug;

use crate::cli::CliArgs;
use crate::clock::Clock;
use crate::command::CommandLine;
use crate::config::Config;
use crate::engine::{CoreRuntime, Runtime, RuntimeEvent};
use crate::errors::Result;
use crate::exec::RealExecutorBackend;
use crate::hosts::Host;
use crate::output::Colors;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config validation (terminal-ness, colors)
/// - host-list loading
/// - the base ssh command
/// - executor / core / runtime
pub async fn run(args: CliArgs) -> Result<()> {
    let clock = Clock::new();
    let config = Config::from_args(&args)?;
    let command_line = CommandLine::from_args(&args);
    let hosts = hosts::load_hosts(args.file.as_deref())?;

    let colors = Colors::new(config.color);
    if config.debug || args.dry_run {
        print_prelude(&colors, &config, &command_line, &hosts);
    }
    if args.dry_run {
        debug!("dry-run complete (no execution)");
        return Ok(());
    }

    // Runtime event channel: host runners on one side, the single
    // consuming loop on the other.
    let (events_tx, events_rx) = mpsc::channel::<RuntimeEvent>(64);

    let executor =
        RealExecutorBackend::new(events_tx, command_line, &config, clock);
    let core = CoreRuntime::new(config.clone(), hosts);
    let runtime = Runtime::new(core, events_rx, executor);

    runtime.run().await?;

    if config.debug {
        println!(
            "[{}sshp{}] finished ({}{}{} ms)",
            colors.log_id,
            colors.reset,
            colors.important,
            clock.now_ms(),
            colors.reset
        );
    }

    Ok(())
}

/// Debug/dry-run prelude: the base command, the hosts, the remote command
/// and the parallelism bound.
fn print_prelude(
    colors: &Colors,
    config: &Config,
    command_line: &CommandLine,
    hosts: &[Host],
) {
    let tag = format!("[{}sshp{}]", colors.log_id, colors.reset);

    print!("{tag} ssh command: [ ");
    for arg in command_line.base() {
        print!("{}'{}'{} ", colors.value, arg, colors.reset);
    }
    println!("]");

    print!(
        "{tag} hosts ({}{}{}): [ ",
        colors.important,
        hosts.len(),
        colors.reset
    );
    for host in hosts {
        print!("{}'{}'{} ", colors.value, host.name, colors.reset);
    }
    println!("]");

    print!("{tag} remote command: [ ");
    for arg in command_line.remote() {
        print!("{}'{}'{} ", colors.value, arg, colors.reset);
    }
    println!("]");

    println!(
        "{tag} max-jobs: {}{}{}",
        colors.important, config.max_jobs, colors.reset
    );
}
