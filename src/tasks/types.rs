use std::fmt;
use thiserror::Error;

use crate::transport::TransportError;

/// Failure causes captured inside a task
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),

    #[error("no local file name can be derived from {0}")]
    NoFileName(String),

    #[error("task for {0} has not been executed")]
    NotExecuted(String),
}

/// Terminal state of an executed task
///
/// A failure always carries its cause.
#[derive(Debug)]
pub enum Outcome {
    Success,
    Failure(TaskError),
}

impl Outcome {
    pub fn status(&self) -> TaskStatus {
        match self {
            Outcome::Success => TaskStatus::Success,
            Outcome::Failure(_) => TaskStatus::Failure,
        }
    }

    pub fn cause(&self) -> Option<&TaskError> {
        match self {
            Outcome::Success => None,
            Outcome::Failure(e) => Some(e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Success,
    Failure,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Success => f.write_str("success"),
            TaskStatus::Failure => f.write_str("failure"),
        }
    }
}
