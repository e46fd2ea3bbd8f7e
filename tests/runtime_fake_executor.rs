// tests/runtime_fake_executor.rs

mod common;
use crate::common::{config, hosts, init_tracing};

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

use sshp::engine::{CoreRuntime, HostJob, Runtime, RuntimeEvent, StreamKind};
use sshp::errors::Error;
use sshp::exec::ExecutorBackend;

/// A fake executor that:
/// - records every dispatched batch of host names
/// - immediately plays back a scripted spawn / line / exit sequence for
///   each host.
struct FakeExecutor {
    events_tx: mpsc::Sender<RuntimeEvent>,
    batches: Arc<Mutex<Vec<Vec<String>>>>,
}

impl FakeExecutor {
    fn new(
        events_tx: mpsc::Sender<RuntimeEvent>,
        batches: Arc<Mutex<Vec<Vec<String>>>>,
    ) -> Self {
        Self { events_tx, batches }
    }
}

impl ExecutorBackend for FakeExecutor {
    fn spawn_hosts(
        &mut self,
        jobs: Vec<HostJob>,
    ) -> Pin<Box<dyn Future<Output = sshp::errors::Result<()>> + Send + '_>>
    {
        let tx = self.events_tx.clone();
        let batches = Arc::clone(&self.batches);

        Box::pin(async move {
            {
                let mut guard = batches.lock().unwrap();
                guard.push(jobs.iter().map(|j| j.name.clone()).collect());
            }

            for job in jobs {
                tx.send(RuntimeEvent::Spawned {
                    host: job.host,
                    started_ms: 1,
                })
                .await
                .map_err(Error::from)?;

                tx.send(RuntimeEvent::Line {
                    host: job.host,
                    kind: StreamKind::Out,
                    line: b"hello".to_vec(),
                })
                .await
                .map_err(Error::from)?;

                tx.send(RuntimeEvent::Exited {
                    host: job.host,
                    exit_code: 0,
                    finished_ms: 2,
                })
                .await
                .map_err(Error::from)?;
            }
            Ok(())
        })
    }
}

#[tokio::test]
async fn runtime_with_fake_executor_completes_all_hosts() {
    init_tracing();

    let (events_tx, events_rx) = mpsc::channel::<RuntimeEvent>(64);
    let batches = Arc::new(Mutex::new(Vec::new()));
    let executor = FakeExecutor::new(events_tx, batches.clone());

    let core = CoreRuntime::new(
        config(&["-m", "2"]),
        hosts(&["a", "b", "c", "d"]),
    );
    let runtime = Runtime::new(core, events_rx, executor);

    // Enforce an upper bound on how long this test may run.
    let finished = timeout(Duration::from_secs(3), runtime.run())
        .await
        .expect("runtime did not finish within 3 seconds")
        .expect("runtime returned an error");

    // Every host was reaped exactly once.
    assert_eq!(finished.len(), 4);
    for host in &finished {
        assert_eq!(host.exit_code, Some(0), "host {}", host.name);
    }

    // Initial fill of two, then one refill per completion; no batch may
    // exceed max_jobs.
    let batches = batches.lock().unwrap().clone();
    assert_eq!(
        batches,
        vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string()],
            vec!["d".to_string()],
        ]
    );
}

#[tokio::test]
async fn runtime_aborts_on_runner_failure() {
    init_tracing();

    struct FailingExecutor {
        events_tx: mpsc::Sender<RuntimeEvent>,
    }

    impl ExecutorBackend for FailingExecutor {
        fn spawn_hosts(
            &mut self,
            jobs: Vec<HostJob>,
        ) -> Pin<
            Box<dyn Future<Output = sshp::errors::Result<()>> + Send + '_>,
        > {
            let tx = self.events_tx.clone();
            Box::pin(async move {
                for job in jobs {
                    tx.send(RuntimeEvent::Failed {
                        host: job.host,
                        error: "exec format error".to_string(),
                    })
                    .await
                    .map_err(Error::from)?;
                }
                Ok(())
            })
        }
    }

    let (events_tx, events_rx) = mpsc::channel::<RuntimeEvent>(16);
    let executor = FailingExecutor { events_tx };
    let core = CoreRuntime::new(config(&[]), hosts(&["a"]));
    let runtime = Runtime::new(core, events_rx, executor);

    let err = timeout(Duration::from_secs(3), runtime.run())
        .await
        .expect("runtime did not finish within 3 seconds")
        .expect_err("runner failure must abort the run");

    assert_eq!(err.exit_code(), 3);
}
