use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep};

use crate::{Execute, Queue, QueueConfig, QueueError, TaskResult, WeakQueue};

#[derive(Clone, Debug)]
struct Job {
    name: &'static str,
    ms: u64,
    fail: bool,
    panic: bool,
}

fn job(name: &'static str, ms: u64) -> Job {
    Job {
        name,
        ms,
        fail: false,
        panic: false,
    }
}

#[derive(Debug, thiserror::Error)]
#[error("job {0} failed")]
struct JobError(&'static str);

#[derive(Default)]
struct Recorder {
    started: Mutex<Vec<&'static str>>,
    finished: Mutex<Vec<&'static str>>,
    running: AtomicUsize,
    peak: AtomicUsize,
}

struct Worker {
    rec: Arc<Recorder>,
}

#[async_trait]
impl Execute for Worker {
    type Task = Job;
    type Output = &'static str;
    type Error = JobError;

    async fn execute(&self, job: Job) -> Result<&'static str, JobError> {
        self.rec.started.lock().unwrap().push(job.name);
        let now = self.rec.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.rec.peak.fetch_max(now, Ordering::SeqCst);

        sleep(Duration::from_millis(job.ms)).await;

        self.rec.running.fetch_sub(1, Ordering::SeqCst);
        self.rec.finished.lock().unwrap().push(job.name);
        if job.panic {
            panic!("job {} exploded", job.name);
        }
        if job.fail {
            Err(JobError(job.name))
        } else {
            Ok(job.name)
        }
    }
}

struct Harness {
    queue: Queue<Worker>,
    rec: Arc<Recorder>,
    log: Arc<Mutex<Vec<String>>>,
    drains: mpsc::UnboundedReceiver<()>,
}

impl Harness {
    fn new(config: QueueConfig) -> Self {
        Self::with_follow_up(config, |_| {})
    }

    /// Like `new`, but `follow_up` also runs inside the success sink.
    fn with_follow_up<F>(config: QueueConfig, follow_up: F) -> Self
    where
        F: Fn(&'static str) + Send + Sync + 'static,
    {
        let rec = Arc::new(Recorder::default());
        let log = Arc::new(Mutex::new(Vec::new()));
        let (drain_tx, drains) = mpsc::unbounded_channel();

        let (l1, l2, l3, l4) = (log.clone(), log.clone(), log.clone(), log.clone());
        let queue = Queue::builder(Arc::new(Worker { rec: rec.clone() }))
            .config(config)
            .on_success(move |name: &&'static str| {
                l1.lock().unwrap().push(format!("ok:{name}"));
                follow_up(*name);
            })
            .on_failure(move |err: &QueueError<Job, JobError>| {
                l2.lock()
                    .unwrap()
                    .push(format!("{}:{}", err.as_label(), err.task().name))
            })
            .on_done(move |res: &TaskResult<Worker>| {
                let name = match res {
                    Ok(name) => *name,
                    Err(err) => err.task().name,
                };
                l3.lock().unwrap().push(format!("done:{name}"));
            })
            .on_drain(move || {
                l4.lock().unwrap().push("drain".to_string());
                let _ = drain_tx.send(());
            })
            .build();

        Self {
            queue,
            rec,
            log,
            drains,
        }
    }

    fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn started(&self) -> Vec<&'static str> {
        self.rec.started.lock().unwrap().clone()
    }
}

fn config(concurrency: usize, wait_ms: u64, timeout_ms: u64) -> QueueConfig {
    QueueConfig::default()
        .with_concurrency(concurrency)
        .with_wait(Duration::from_millis(wait_ms))
        .with_timeout(Duration::from_millis(timeout_ms))
}

#[tokio::test(start_paused = true)]
async fn test_admits_up_to_concurrency_and_queues_the_rest() {
    let h = Harness::new(config(2, 0, 0));
    for name in ["A", "B", "C", "D", "E"] {
        h.queue.add(job(name, 1_000));
    }
    sleep(Duration::from_millis(1)).await;

    let stats = h.queue.stats();
    assert_eq!(stats.in_flight, 2);
    assert_eq!(stats.waiting, 3);
    assert_eq!(stats.concurrency, 2);
    assert_eq!(h.started(), vec!["A", "B"]);
}

#[tokio::test(start_paused = true)]
async fn test_mixed_scenario_with_both_limits() {
    let mut h = Harness::new(config(2, 1_000, 500));
    let t0 = Instant::now();

    h.queue.add(job("A", 100));
    h.queue.add(job("B", 600));
    h.queue.add(job("C", 200));
    h.queue.add(job("D", 100));

    h.drains.recv().await.expect("drain");
    let elapsed = t0.elapsed();
    assert!(
        elapsed >= Duration::from_millis(500) && elapsed < Duration::from_millis(510),
        "drained after {elapsed:?}"
    );

    assert_eq!(
        h.log(),
        vec![
            "ok:A",
            "done:A",
            "ok:C",
            "done:C",
            "ok:D",
            "done:D",
            "execution_timeout:B",
            "done:B",
            "drain",
        ]
    );
    assert_eq!(h.started(), vec!["A", "B", "C", "D"]);
    assert!(h.rec.peak.load(Ordering::SeqCst) <= 2);

    // B's operation was not aborted; its late success must stay silent.
    sleep(Duration::from_millis(200)).await;
    assert!(h.rec.finished.lock().unwrap().contains(&"B"));
    assert_eq!(h.log().len(), 9);
    assert!(h.drains.try_recv().is_err());

    let stats = h.queue.stats();
    assert_eq!((stats.in_flight, stats.waiting, stats.completed), (0, 0, 4));
}

#[tokio::test(start_paused = true)]
async fn test_stale_waiting_tasks_cascade_without_executing() {
    let mut h = Harness::new(config(1, 1_000, 0));
    h.queue.add(job("A", 1_500));
    h.queue.add(job("B", 10));
    h.queue.add(job("C", 10));

    h.drains.recv().await.expect("drain");

    assert_eq!(
        h.log(),
        vec![
            "ok:A",
            "done:A",
            "wait_timeout:B",
            "done:B",
            "wait_timeout:C",
            "done:C",
            "drain",
        ]
    );
    assert_eq!(h.started(), vec!["A"]);
    assert!(h.drains.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_cascade_stops_at_first_fresh_task() {
    let mut h = Harness::new(config(1, 1_000, 0));
    h.queue.add(job("A", 800));
    h.queue.add(job("B", 10));
    h.queue.add(job("C", 10));

    // B and C enqueued at t=0; D enqueued at t=700 will still be fresh at t=800.
    sleep(Duration::from_millis(700)).await;
    h.queue.add(job("D", 10));

    // At t=800 B starts (waited 800ms); C and D wait until B ends at t=810.
    h.drains.recv().await.expect("drain");
    assert_eq!(h.started(), vec!["A", "B", "C", "D"]);
    assert!(h.log().iter().all(|line| !line.starts_with("wait_timeout")));

    let mut h = Harness::new(config(1, 1_000, 0));
    h.queue.add(job("A", 1_200));
    h.queue.add(job("B", 10));
    sleep(Duration::from_millis(500)).await;
    h.queue.add(job("C", 10));

    // At t=1200: B waited 1200ms (stale), C waited 700ms (fresh).
    h.drains.recv().await.expect("drain");
    assert_eq!(h.started(), vec!["A", "C"]);
    assert_eq!(
        h.log(),
        vec!["ok:A", "done:A", "wait_timeout:B", "done:B", "ok:C", "done:C", "drain"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_dispatch_is_fifo_and_done_fires_once_per_task() {
    const NAMES: [&str; 8] = ["t0", "t1", "t2", "t3", "t4", "t5", "t6", "t7"];
    const MS: [u64; 8] = [70, 10, 40, 20, 90, 30, 60, 50];

    let mut h = Harness::new(config(3, 0, 0));
    for (name, ms) in NAMES.into_iter().zip(MS) {
        h.queue.add(job(name, ms));
    }
    h.drains.recv().await.expect("drain");

    assert_eq!(h.started(), NAMES.to_vec());
    assert!(h.rec.peak.load(Ordering::SeqCst) <= 3);

    let log = h.log();
    for name in NAMES {
        let done = log.iter().filter(|l| **l == format!("done:{name}")).count();
        let ok = log.iter().filter(|l| **l == format!("ok:{name}")).count();
        assert_eq!((done, ok), (1, 1), "task {name}");
    }
    assert_eq!(log.iter().filter(|l| *l == "drain").count(), 1);
    assert_eq!(log.last().map(String::as_str), Some("drain"));
}

#[tokio::test(start_paused = true)]
async fn test_execution_errors_and_panics_are_reported() {
    let mut h = Harness::new(config(1, 0, 0));
    h.queue.add(Job {
        fail: true,
        ..job("X", 10)
    });
    h.queue.add(Job {
        panic: true,
        ..job("Y", 10)
    });
    h.queue.add(job("Z", 10));

    h.drains.recv().await.expect("drain");
    assert_eq!(
        h.log(),
        vec![
            "execution_failed:X",
            "done:X",
            "execution_panicked:Y",
            "done:Y",
            "ok:Z",
            "done:Z",
            "drain",
        ]
    );
    assert_eq!(h.queue.stats().in_flight, 0);
}

#[tokio::test(start_paused = true)]
async fn test_drain_fires_once_per_idle_transition() {
    let mut h = Harness::new(config(2, 0, 0));
    h.queue.add(job("A", 100));
    h.queue.add(job("B", 100));
    h.drains.recv().await.expect("first drain");

    h.queue.add(job("C", 50));
    h.drains.recv().await.expect("second drain");

    sleep(Duration::from_secs(1)).await;
    assert!(h.drains.try_recv().is_err());
    assert_eq!(h.log().iter().filter(|l| *l == "drain").count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_zero_limits_mean_unbounded() {
    let mut h = Harness::new(config(1, 0, 0));
    h.queue.add(job("A", 5_000));
    h.queue.add(job("B", 10));

    h.drains.recv().await.expect("drain");
    assert_eq!(h.log(), vec!["ok:A", "done:A", "ok:B", "done:B", "drain"]);
}

#[tokio::test(start_paused = true)]
async fn test_submitted_tasks_finish_after_handles_are_dropped() {
    let Harness {
        queue,
        rec,
        mut drains,
        ..
    } = Harness::new(config(1, 0, 0));
    let clone = queue.clone();
    queue.add(job("A", 100));
    clone.add(job("B", 100));
    drop(queue);
    drop(clone);

    assert_eq!(drains.recv().await, Some(()));
    assert_eq!(*rec.finished.lock().unwrap(), vec!["A", "B"]);
    // The dispatcher stops once idle, dropping the sinks and their sender.
    assert_eq!(drains.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_add_from_a_sink_runs_after_the_current_step() {
    let slot: Arc<Mutex<Option<Queue<Worker>>>> = Arc::new(Mutex::new(None));
    let sink_slot = slot.clone();
    let mut h = Harness::with_follow_up(config(1, 0, 0), move |name| {
        if name == "A" {
            if let Some(queue) = sink_slot.lock().unwrap().as_ref() {
                queue.add(job("B", 10));
            }
        }
    });
    *slot.lock().unwrap() = Some(h.queue.clone());

    h.queue.add(job("A", 100));
    h.drains.recv().await.expect("drain after A");
    h.drains.recv().await.expect("drain after B");

    assert_eq!(h.started(), vec!["A", "B"]);
    assert_eq!(
        h.log(),
        vec!["ok:A", "done:A", "drain", "ok:B", "done:B", "drain"]
    );
    sleep(Duration::from_secs(1)).await;
    assert!(h.drains.try_recv().is_err());

    // The sink's strong clone is the only thing still keeping the dispatcher up.
    slot.lock().unwrap().take();
    let Harness { queue, mut drains, .. } = h;
    drop(queue);
    assert_eq!(drains.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_weak_handle_in_a_sink_does_not_keep_the_dispatcher_alive() {
    let slot: Arc<Mutex<Option<WeakQueue<Worker>>>> = Arc::new(Mutex::new(None));
    let sink_slot = slot.clone();
    let Harness {
        queue,
        rec,
        mut drains,
        ..
    } = Harness::with_follow_up(config(1, 0, 0), move |name| {
        if name != "A" {
            return;
        }
        if let Some(queue) = sink_slot.lock().unwrap().as_ref().and_then(WeakQueue::upgrade) {
            queue.add(job("B", 10));
        }
    });
    let weak = queue.downgrade();
    *slot.lock().unwrap() = Some(weak.clone());

    queue.add(job("A", 100));
    assert_eq!(drains.recv().await, Some(()));
    assert_eq!(drains.recv().await, Some(()));
    assert_eq!(*rec.started.lock().unwrap(), vec!["A", "B"]);

    // Once the last strong handle goes, A's sink can no longer upgrade.
    queue.add(job("A", 50));
    drop(queue);
    assert!(weak.upgrade().is_none());
    assert_eq!(drains.recv().await, Some(()));
    assert_eq!(drains.recv().await, None);
    assert_eq!(*rec.started.lock().unwrap(), vec!["A", "B", "A"]);
}

#[tokio::test(start_paused = true)]
async fn test_execution_limit_is_measured_from_admission() {
    let mut h = Harness::new(config(1, 0, 300));
    let t0 = Instant::now();
    h.queue.add(job("A", 1_000));
    h.queue.add(job("B", 1_000));

    h.drains.recv().await.expect("drain");
    let elapsed = t0.elapsed();
    assert!(
        elapsed >= Duration::from_millis(600) && elapsed < Duration::from_millis(602),
        "drained after {elapsed:?}"
    );
    assert_eq!(
        h.log(),
        vec![
            "execution_timeout:A",
            "done:A",
            "execution_timeout:B",
            "done:B",
            "drain",
        ]
    );
}
