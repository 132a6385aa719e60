//! Result collection

use async_channel::Receiver;
use std::io::Write;
use tracing::{error, warn};

use crate::observability::Metrics;
use crate::tasks::Task;

/// Report completed tasks in arrival order until the output handoff is
/// closed and drained
pub(crate) async fn collect<W>(output: Receiver<Box<dyn Task>>, sink: &mut W, metrics: &Metrics)
where
    W: Write,
{
    while let Ok(task) = output.recv().await {
        metrics.task_reported(task.status());

        match task.describe() {
            Ok(line) => {
                if let Err(e) = writeln!(sink, "{}", line) {
                    warn!(error = %e, "Failed to write report line");
                }
            }
            Err(e) => error!(error = %e, "Completed task could not be described"),
        }
    }

    if let Err(e) = sink.flush() {
        warn!(error = %e, "Failed to flush report sink");
    }
}
