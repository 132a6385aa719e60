//! Generate → bounded worker pool → collect
//!
//! Architecture:
//! 1. The generator turns each input into a task via the factory and pushes
//!    it onto the input handoff, then closes the handoff
//! 2. N workers share the input handoff; any free worker takes the next task,
//!    executes it and pushes it onto the output handoff
//! 3. A supervisor owns the join handles of the generator and all workers and
//!    is the only party that closes the output handoff, after all of them
//!    have finished
//! 4. The collector reports tasks in completion order until the output
//!    handoff is closed and drained
//!
//! Task failures stay inside the task; the pipeline itself has no error path.

mod collector;
mod generator;
mod pool;

pub use generator::{MONTHS_PER_YEAR, Period, PeriodRange, UrlTemplate};

use std::io::Write;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::observability::{Metrics, MetricsSnapshot};
use crate::tasks::{Task, TaskFactory};

/// Bounded worker pool wired between a generator and a collector
pub struct Pipeline {
    factory: Arc<dyn TaskFactory>,
    workers: usize,
    handoff_capacity: usize,
    metrics: Arc<Metrics>,
}

impl Pipeline {
    /// `workers` is clamped to at least one
    pub fn new(factory: Arc<dyn TaskFactory>, workers: usize) -> Self {
        Self {
            factory,
            workers: workers.max(1),
            handoff_capacity: 1,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Slots in each handoff before a push suspends, clamped to at least one
    pub fn with_handoff_capacity(mut self, capacity: usize) -> Self {
        self.handoff_capacity = capacity.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run every input through the pool and write one report line per task
    /// to `sink`
    ///
    /// Returns once the output handoff is closed and drained.
    pub async fn run<I, W>(&self, inputs: I, sink: &mut W) -> MetricsSnapshot
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: Send + 'static,
        W: Write,
    {
        let (input_tx, input_rx) = async_channel::bounded::<Box<dyn Task>>(self.handoff_capacity);
        let (output_tx, output_rx) = async_channel::bounded::<Box<dyn Task>>(self.handoff_capacity);

        info!(
            workers = self.workers,
            handoff_capacity = self.handoff_capacity,
            "Starting pipeline"
        );

        let mut participants = JoinSet::new();
        for worker_id in 0..self.workers {
            participants.spawn(pool::work(
                worker_id,
                input_rx.clone(),
                output_tx.clone(),
                self.metrics.clone(),
            ));
        }
        drop(input_rx);

        participants.spawn(generator::generate(
            inputs.into_iter(),
            self.factory.clone(),
            input_tx,
            self.metrics.clone(),
        ));

        let supervisor = tokio::spawn(pool::supervise(participants, output_tx));

        collector::collect(output_rx, sink, &self.metrics).await;

        if let Err(e) = supervisor.await {
            error!(error = %e, "Shutdown supervisor terminated abnormally");
        }

        let snapshot = self.metrics.snapshot();
        debug!(?snapshot, "Pipeline drained");
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::{TaskError, TaskStatus};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Task that records how many tasks execute at the same time
    struct GaugedTask {
        input: String,
        gauge: Arc<Gauge>,
        panic: bool,
        status: Option<TaskStatus>,
    }

    #[derive(Default)]
    struct Gauge {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl Task for GaugedTask {
        async fn execute(&mut self) {
            let now = self.gauge.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.gauge.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.gauge.current.fetch_sub(1, Ordering::SeqCst);

            if self.panic {
                panic!("task asked to panic");
            }
            self.status = Some(if self.input.ends_with("-fail") {
                TaskStatus::Failure
            } else {
                TaskStatus::Success
            });
        }

        fn status(&self) -> Option<TaskStatus> {
            self.status
        }

        fn describe(&self) -> Result<String, TaskError> {
            let status = self
                .status
                .ok_or_else(|| TaskError::NotExecuted(self.input.clone()))?;
            Ok(format!("{} {}", self.input, status))
        }
    }

    #[derive(Default)]
    struct GaugedFactory {
        gauge: Arc<Gauge>,
        panic_on: Option<String>,
    }

    impl TaskFactory for GaugedFactory {
        fn make(&self, input: String) -> Box<dyn Task> {
            Box::new(GaugedTask {
                panic: self.panic_on.as_deref() == Some(input.as_str()),
                input,
                gauge: self.gauge.clone(),
                status: None,
            })
        }
    }

    fn inputs(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("input-{}", i)).collect()
    }

    fn lines(sink: &[u8]) -> Vec<String> {
        String::from_utf8(sink.to_vec())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_never_exceeds_workers() {
        for workers in [1, 3, 8] {
            let factory = Arc::new(GaugedFactory::default());
            let pipeline = Pipeline::new(factory.clone(), workers);
            let mut sink = Vec::new();

            let snapshot = pipeline.run(inputs(40), &mut sink).await;

            assert_eq!(snapshot.reported, 40);
            let peak = factory.gauge.peak.load(Ordering::SeqCst);
            assert!(peak >= 1 && peak <= workers, "peak {} with {} workers", peak, workers);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_more_workers_than_tasks() {
        let factory = Arc::new(GaugedFactory::default());
        let pipeline = Pipeline::new(factory.clone(), 100);
        let mut sink = Vec::new();

        let snapshot = pipeline.run(inputs(24), &mut sink).await;

        assert_eq!(snapshot.generated, 24);
        assert_eq!(snapshot.reported, 24);
        assert!(factory.gauge.peak.load(Ordering::SeqCst) <= 24);

        let reported = lines(&sink);
        assert_eq!(reported.len(), 24);
        let unique: HashSet<&String> = reported.iter().collect();
        assert_eq!(unique.len(), 24);
    }

    #[tokio::test]
    async fn test_every_reported_task_is_terminal() {
        let factory = Arc::new(GaugedFactory::default());
        let pipeline = Pipeline::new(factory, 4).with_handoff_capacity(8);
        let mut sink = Vec::new();

        let mut work = inputs(10);
        work.push("input-fail".to_string());
        let snapshot = pipeline.run(work, &mut sink).await;

        assert_eq!(snapshot.reported, 11);
        assert_eq!(snapshot.succeeded + snapshot.failed, snapshot.reported);
        assert_eq!(snapshot.failed, 1);
        assert!(lines(&sink).contains(&"input-fail failure".to_string()));
    }

    #[tokio::test]
    async fn test_empty_input_terminates() {
        let pipeline = Pipeline::new(Arc::new(GaugedFactory::default()), 3);
        let mut sink = Vec::new();

        let snapshot = pipeline.run(Vec::<String>::new(), &mut sink).await;

        assert_eq!(snapshot.generated, 0);
        assert_eq!(snapshot.reported, 0);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_zero_workers_clamped() {
        let pipeline = Pipeline::new(Arc::new(GaugedFactory::default()), 0);
        assert_eq!(pipeline.workers(), 1);

        let mut sink = Vec::new();
        let snapshot = pipeline.run(inputs(3), &mut sink).await;
        assert_eq!(snapshot.reported, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_panicking_task_does_not_hang_shutdown() {
        let factory = Arc::new(GaugedFactory {
            gauge: Arc::default(),
            panic_on: Some("input-2".to_string()),
        });
        let pipeline = Pipeline::new(factory, 2);
        let mut sink = Vec::new();

        let snapshot = pipeline.run(inputs(6), &mut sink).await;

        assert_eq!(snapshot.generated, 6);
        assert_eq!(snapshot.reported, 5);
        assert!(!lines(&sink).iter().any(|l| l.starts_with("input-2 ")));
    }

    #[tokio::test]
    async fn test_generator_order_preserved_with_single_worker() {
        let factory = Arc::new(GaugedFactory::default());
        let pipeline = Pipeline::new(factory, 1);
        let mut sink = Vec::new();

        let urls: Vec<String> = UrlTemplate::new("{year}-{month}")
            .urls(PeriodRange::new(2020, 2021))
            .collect();
        pipeline.run(urls.clone(), &mut sink).await;

        let reported: Vec<String> = lines(&sink)
            .into_iter()
            .map(|l| l.trim_end_matches(" success").to_string())
            .collect();
        assert_eq!(reported, urls);
    }
}
