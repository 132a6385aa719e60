//! Worker loop and shutdown supervisor

use async_channel::{Receiver, Sender};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::observability::Metrics;
use crate::tasks::Task;

/// Pull, execute, forward until the input handoff is closed and drained
pub(crate) async fn work(
    worker_id: usize,
    input: Receiver<Box<dyn Task>>,
    output: Sender<Box<dyn Task>>,
    metrics: Arc<Metrics>,
) {
    let mut executed = 0u64;

    while let Ok(mut task) = input.recv().await {
        task.execute().await;
        executed += 1;

        if task.status().is_none() {
            error!(worker_id, "Task returned from execute without a terminal status");
        }

        metrics.task_completed();
        if output.send(task).await.is_err() {
            error!(worker_id, "Output handoff closed while workers are running");
            break;
        }
    }

    debug!(worker_id, executed, "Worker drained");
}

/// Shutdown barrier: wait for the generator and every worker, then close
/// the output handoff
///
/// A participant that panicked still counts as finished.
pub(crate) async fn supervise(mut participants: JoinSet<()>, output: Sender<Box<dyn Task>>) {
    let expected = participants.len();
    let mut finished = 0usize;

    while let Some(joined) = participants.join_next().await {
        finished += 1;
        if let Err(e) = joined {
            error!(error = %e, "Pipeline participant terminated abnormally");
        }
    }

    debug!(finished, expected, "Shutdown barrier released");
    output.close();
}
