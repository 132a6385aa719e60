use async_trait::async_trait;

use super::types::{TaskError, TaskStatus};

/// Unit of work moved through the pipeline
///
/// A task is owned by exactly one worker while it executes and is then
/// handed to the collector by value.
#[async_trait]
pub trait Task: Send {
    /// Perform the work
    ///
    /// Never fails outward: every error is captured into the task so that
    /// [`Task::status`] is `Some` once this returns.
    async fn execute(&mut self);

    /// Terminal status, `None` until `execute` has returned
    fn status(&self) -> Option<TaskStatus>;

    /// One-line human-readable report
    ///
    /// Returns [`TaskError::NotExecuted`] when called before `execute`.
    fn describe(&self) -> Result<String, TaskError>;
}

/// Turns one raw input identifier into a fresh task
pub trait TaskFactory: Send + Sync {
    fn make(&self, input: String) -> Box<dyn Task>;
}
