// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The runtime talks to an `ExecutorBackend` instead of spawning children
//! itself. This makes it easy to swap in a fake executor in tests while
//! keeping the production implementation in [`runner`](crate::exec::runner).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::clock::Clock;
use crate::command::CommandLine;
use crate::config::Config;
use crate::engine::{HostJob, RuntimeEvent};
use crate::errors::Result;
use crate::exec::runner::run_host;
use crate::exec::stream::StreamOptions;

/// Trait abstracting how dispatched hosts are executed.
///
/// Production code uses [`RealExecutorBackend`]; tests can provide their
/// own implementation that doesn't spawn real processes.
pub trait ExecutorBackend: Send {
    /// Spawn children for the given hosts.
    ///
    /// The implementation is free to:
    /// - fork real child processes (production)
    /// - simulate output and exits by emitting `RuntimeEvent`s (tests)
    fn spawn_hosts(
        &mut self,
        jobs: Vec<HostJob>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Real executor backend used in production.
///
/// Each dispatched host gets its own Tokio task running
/// [`run_host`]; the task reports everything back through the runtime
/// event channel.
pub struct RealExecutorBackend {
    events_tx: mpsc::Sender<RuntimeEvent>,
    command_line: Arc<CommandLine>,
    options: StreamOptions,
    clock: Clock,
}

impl RealExecutorBackend {
    pub fn new(
        events_tx: mpsc::Sender<RuntimeEvent>,
        command_line: CommandLine,
        config: &Config,
        clock: Clock,
    ) -> Self {
        Self {
            events_tx,
            command_line: Arc::new(command_line),
            options: StreamOptions::from_config(config),
            clock,
        }
    }
}

impl ExecutorBackend for RealExecutorBackend {
    fn spawn_hosts(
        &mut self,
        jobs: Vec<HostJob>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.events_tx.clone();
        let command_line = Arc::clone(&self.command_line);
        let options = self.options;
        let clock = self.clock;

        Box::pin(async move {
            for job in jobs {
                let argv = command_line.build_argv(&job.name);
                tokio::spawn(run_host(job, argv, options, clock, tx.clone()));
            }
            Ok(())
        })
    }
}
