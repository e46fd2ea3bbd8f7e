// src/exec/runner.rs

//! Individual host process runner.

use std::process::Stdio;

use tokio::net::unix::pipe;
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::clock::Clock;
use crate::config::Mode;
use crate::engine::{HostJob, RuntimeEvent, StreamKind};
use crate::errors::{Result, SshpError};
use crate::exec::stream::{
    read_chunks, read_lines, read_merged, send_event, StreamOptions,
};

/// Run a single host's child process, forwarding its output and exit
/// status to the runtime as events.
///
/// Any unrecoverable error is reported as a `Failed` event; the runtime
/// treats that as fatal for the whole run.
pub async fn run_host(
    job: HostJob,
    argv: Vec<String>,
    opts: StreamOptions,
    clock: Clock,
    events_tx: mpsc::Sender<RuntimeEvent>,
) {
    let host = job.host;
    let name = job.name.clone();

    if let Err(err) = run_host_inner(job, argv, opts, clock, &events_tx).await {
        error!(host = %name, error = %err, "host execution error");
        let _ = events_tx
            .send(RuntimeEvent::Failed {
                host,
                error: err.to_string(),
            })
            .await;
    }
}

async fn run_host_inner(
    job: HostJob,
    argv: Vec<String>,
    opts: StreamOptions,
    clock: Clock,
    events_tx: &mpsc::Sender<RuntimeEvent>,
) -> Result<()> {
    debug!(host = %job.name, ?argv, "starting child process");

    match opts.mode {
        Mode::Join => run_merged(job, argv, opts, clock, events_tx).await,
        Mode::Line | Mode::Group => {
            run_piped(job, argv, opts, clock, events_tx).await
        }
    }
}

/// Line/group modes: separate stdout and stderr pipes.
async fn run_piped(
    job: HostJob,
    argv: Vec<String>,
    opts: StreamOptions,
    clock: Clock,
    events_tx: &mpsc::Sender<RuntimeEvent>,
) -> Result<()> {
    let mut child = Command::new(&argv[0])
        .args(&argv[1..])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| SshpError::Spawn {
            host: job.name.clone(),
            source: e,
        })?;

    send_event(
        events_tx,
        RuntimeEvent::Spawned {
            host: job.host,
            started_ms: clock.now_ms(),
        },
    )
    .await?;

    let stdout = child.stdout.take().ok_or_else(|| {
        SshpError::Runner("child stdout pipe missing".to_string())
    })?;
    let stderr = child.stderr.take().ok_or_else(|| {
        SshpError::Runner("child stderr pipe missing".to_string())
    })?;

    let (out_res, err_res) = match opts.mode {
        Mode::Group => tokio::join!(
            read_chunks(stdout, job.host, StreamKind::Out, opts, events_tx),
            read_chunks(stderr, job.host, StreamKind::Err, opts, events_tx),
        ),
        _ => tokio::join!(
            read_lines(stdout, job.host, StreamKind::Out, opts, events_tx),
            read_lines(stderr, job.host, StreamKind::Err, opts, events_tx),
        ),
    };
    out_res?;
    err_res?;

    reap(child, job, clock, events_tx).await
}

/// Join mode: one pipe carries both child streams, so interleaving matches
/// what the child actually wrote.
async fn run_merged(
    job: HostJob,
    argv: Vec<String>,
    opts: StreamOptions,
    clock: Clock,
    events_tx: &mpsc::Sender<RuntimeEvent>,
) -> Result<()> {
    let (pipe_tx, pipe_rx) = pipe::pipe()?;
    let write_end = pipe_tx.into_blocking_fd()?;
    let write_end_err = write_end.try_clone()?;

    let child = {
        // Scope the Command so its copies of the write ends close before
        // reading starts; otherwise end-of-file never arrives.
        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..])
            .stdout(Stdio::from(write_end))
            .stderr(Stdio::from(write_end_err));
        cmd.spawn().map_err(|e| SshpError::Spawn {
            host: job.name.clone(),
            source: e,
        })?
    };

    send_event(
        events_tx,
        RuntimeEvent::Spawned {
            host: job.host,
            started_ms: clock.now_ms(),
        },
    )
    .await?;

    read_merged(pipe_rx, job.host, opts, events_tx).await?;

    reap(child, job, clock, events_tx).await
}

/// Wait on the child (all of its pipes have already hit end-of-file) and
/// report the exit status.
async fn reap(
    mut child: Child,
    job: HostJob,
    clock: Clock,
    events_tx: &mpsc::Sender<RuntimeEvent>,
) -> Result<()> {
    let status = child.wait().await?;
    let finished_ms = clock.now_ms();
    // Children killed by a signal have no exit code; record -1.
    let exit_code = status.code().unwrap_or(-1);

    info!(host = %job.name, exit_code, "child exited");

    send_event(
        events_tx,
        RuntimeEvent::Exited {
            host: job.host,
            exit_code,
            finished_ms,
        },
    )
    .await
}
