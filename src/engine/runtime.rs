// src/engine/runtime.rs

use std::fmt;
use std::io::Write;

use tokio::sync::mpsc;
use tracing::{info, trace};

use crate::errors::{Result, SshpError};
use crate::exec::ExecutorBackend;
use crate::hosts::Host;

use super::core::CoreRuntime;
use super::{CoreCommand, RuntimeEvent};

/// Drives the orchestration core in response to [`RuntimeEvent`]s and
/// delegates child spawning to an [`ExecutorBackend`].
///
/// This is a pure IO shell around [`CoreRuntime`], which contains all the
/// scheduling and formatting semantics. This struct handles async IO:
/// reading events from the channel, dispatching hosts to the executor and
/// writing emitted bytes to stdout.
pub struct Runtime<E: ExecutorBackend> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    executor: E,
}

impl<E: ExecutorBackend> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend> Runtime<E> {
    pub fn new(
        core: CoreRuntime,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        executor: E,
    ) -> Self {
        Self {
            core,
            event_rx,
            executor,
        }
    }

    /// Main event loop.
    ///
    /// - Performs the initial fill.
    /// - Consumes [`RuntimeEvent`]s from `event_rx`.
    /// - Feeds them into the pure core.
    /// - Executes the commands returned by the core.
    ///
    /// Returns the final host records once every child has been reaped.
    pub async fn run(mut self) -> Result<Vec<Host>> {
        info!("sshp runtime started");

        let step = self.core.start();
        let mut keep_running = self.execute(step).await?;

        while keep_running {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            trace!(?event, "runtime received event");

            let step = self.core.step(event);
            keep_running = self.execute(step).await?;
        }

        info!("runtime exiting");
        Ok(self.core.into_hosts())
    }

    /// Execute the commands of a single core step; returns whether the
    /// loop should keep running.
    async fn execute(&mut self, step: super::CoreStep) -> Result<bool> {
        for command in step.commands {
            match command {
                CoreCommand::Dispatch(jobs) => {
                    self.executor.spawn_hosts(jobs).await?;
                }
                CoreCommand::Emit(bytes) => {
                    write_stdout(&bytes)?;
                }
                CoreCommand::Abort(message) => {
                    return Err(SshpError::Runner(message));
                }
            }
        }
        Ok(step.keep_running)
    }
}

/// Write host data to stdout unbuffered; partial progress lines must reach
/// the terminal immediately.
fn write_stdout(bytes: &[u8]) -> Result<()> {
    let mut out = std::io::stdout().lock();
    out.write_all(bytes)?;
    out.flush()?;
    Ok(())
}
