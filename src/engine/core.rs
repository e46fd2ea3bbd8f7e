// src/engine/core.rs

//! Pure core state machine of the orchestrator.
//!
//! This module contains a synchronous, deterministic core that consumes
//! [`RuntimeEvent`]s and produces:
//! - updated host records (timings, exit codes, captured output)
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible
//! for:
//! - reading events from the channel
//! - handing `Dispatch` batches to the executor backend
//! - writing `Emit` bytes to stdout
//!
//! The core is intended to be extensively tested without any Tokio,
//! channels, pipes, or processes.

use tracing::{debug, info, warn};

use crate::config::{Config, Mode};
use crate::engine::{HostJob, RuntimeEvent};
use crate::hosts::{Host, HostId};
use crate::output::sink::OutputSink;
use crate::output::{join, Colors};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone)]
pub enum CoreCommand {
    /// Spawn children for these hosts.
    Dispatch(Vec<HostJob>),
    /// Write these bytes to stdout.
    Emit(Vec<u8>),
    /// Unrecoverable failure; the shell turns this into an error.
    Abort(String),
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn running(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

/// Pure core runtime state.
///
/// Owns the host list, the spawn cursor, the outstanding/done counters and
/// the output sink. It has no channels, no Tokio types, and performs no IO.
#[derive(Debug)]
pub struct CoreRuntime {
    config: Config,
    hosts: Vec<Host>,
    sink: OutputSink,
    /// Next host to spawn.
    cursor: usize,
    /// Currently running, not-yet-reaped children.
    outstanding: usize,
    /// Reaped children.
    done: usize,
}

impl CoreRuntime {
    pub fn new(config: Config, hosts: Vec<Host>) -> Self {
        let colors = Colors::new(config.color);
        let sink = OutputSink::new(colors, config.anonymous);
        Self {
            config,
            hosts,
            sink,
            cursor: 0,
            outstanding: 0,
            done: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.hosts.len()
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn done(&self) -> usize {
        self.done
    }

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    /// Consume the core and hand back the host records for inspection.
    pub fn into_hosts(self) -> Vec<Host> {
        self.hosts
    }

    /// Initial fill up to `max_jobs`. Called once before the event loop.
    pub fn start(&mut self) -> CoreStep {
        let jobs = self.fill();
        info!(
            total = self.hosts.len(),
            dispatched = jobs.len(),
            max_jobs = self.config.max_jobs,
            "starting run"
        );

        let mut commands = Vec::new();
        if !jobs.is_empty() {
            commands.push(CoreCommand::Dispatch(jobs));
        }
        CoreStep {
            commands,
            keep_running: self.done < self.hosts.len(),
        }
    }

    /// Handle a single runtime event, updating host records and returning
    /// the resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::Spawned { host, started_ms } => {
                if let Some(h) = self.hosts.get_mut(host) {
                    h.started_ms = Some(started_ms);
                    debug!(host = %h.name, started_ms, "child spawned");
                } else {
                    warn!(host, "spawn report for unknown host; ignoring");
                }
                CoreStep::running(Vec::new())
            }

            RuntimeEvent::Line { host, kind, line } => {
                let Some(name) = self.host_name(host) else {
                    return CoreStep::running(Vec::new());
                };
                let bytes = self.sink.line(&name, kind, &line);
                CoreStep::running(vec![CoreCommand::Emit(bytes)])
            }

            RuntimeEvent::Chunk { host, kind, bytes } => {
                let Some(name) = self.host_name(host) else {
                    return CoreStep::running(Vec::new());
                };
                let bytes = self.sink.chunk(host, &name, kind, &bytes);
                CoreStep::running(vec![CoreCommand::Emit(bytes)])
            }

            RuntimeEvent::Output { host, bytes } => {
                if let Some(h) = self.hosts.get_mut(host) {
                    debug!(host = %h.name, len = bytes.len(), "captured output");
                    h.output = Some(bytes);
                } else {
                    warn!(host, "output for unknown host; ignoring");
                }
                CoreStep::running(Vec::new())
            }

            RuntimeEvent::Exited {
                host,
                exit_code,
                finished_ms,
            } => self.handle_exit(host, exit_code, finished_ms),

            RuntimeEvent::Failed { host, error } => {
                let name = self
                    .host_name(host)
                    .unwrap_or_else(|| format!("#{host}"));
                CoreStep {
                    commands: vec![CoreCommand::Abort(format!(
                        "host '{name}': {error}"
                    ))],
                    keep_running: false,
                }
            }
        }
    }

    fn host_name(&self, host: HostId) -> Option<String> {
        match self.hosts.get(host) {
            Some(h) => Some(h.name.clone()),
            None => {
                warn!(host, "event for unknown host; ignoring");
                None
            }
        }
    }

    /// Spawn-queue fill: dispatch hosts from the cursor while capacity
    /// remains. The argv is built from the name as parsed; `--trim` then
    /// shortens the record's name, which only the display paths read.
    fn fill(&mut self) -> Vec<HostJob> {
        let mut jobs = Vec::new();

        while self.cursor < self.hosts.len()
            && self.outstanding < self.config.max_jobs
        {
            let id = self.cursor;
            let host = &mut self.hosts[id];

            jobs.push(HostJob {
                host: id,
                name: host.name.clone(),
            });

            if self.config.trim {
                if let Some(dot) = host.name.find('.') {
                    host.name.truncate(dot);
                }
            }

            self.cursor += 1;
            self.outstanding += 1;
        }

        jobs
    }

    fn handle_exit(&mut self, host: HostId, exit_code: i32, finished_ms: u64) -> CoreStep {
        let Some(h) = self.hosts.get_mut(host) else {
            warn!(host, "exit report for unknown host; ignoring");
            return CoreStep::running(Vec::new());
        };
        if h.exit_code.is_some() {
            warn!(host = %h.name, "duplicate exit report; ignoring");
            return CoreStep::running(Vec::new());
        }

        h.exit_code = Some(exit_code);
        h.finished_ms = Some(finished_ms);
        let started_ms = h.started_ms.unwrap_or(finished_ms);
        let delta_ms = finished_ms.saturating_sub(started_ms);
        let name = h.name.clone();

        info!(host = %name, exit_code, delta_ms, "host finished");

        self.outstanding -= 1;
        self.done += 1;

        let mut commands = Vec::new();

        if self.config.exit_codes || self.config.debug {
            commands.push(CoreCommand::Emit(self.sink.exit_line(
                &name, exit_code, delta_ms,
            )));
        }

        // Refill the slot this exit freed before anything else.
        let jobs = self.fill();
        if !jobs.is_empty() {
            commands.push(CoreCommand::Dispatch(jobs));
        }

        let show_progress =
            self.config.mode == Mode::Join && self.config.tty_stdout;
        if show_progress {
            commands.push(CoreCommand::Emit(
                self.sink.progress(self.done, self.hosts.len()),
            ));
        }

        let mut keep_running = true;
        if self.done == self.hosts.len() {
            if self.config.mode == Mode::Join {
                if show_progress {
                    commands.push(CoreCommand::Emit(vec![b'\n']));
                }
                let num_classes = join::assign_classes(&mut self.hosts);
                commands.push(CoreCommand::Emit(join::render_report(
                    &self.hosts,
                    num_classes,
                    self.sink.colors(),
                )));
            }
            keep_running = false;
        }

        CoreStep {
            commands,
            keep_running,
        }
    }
}
