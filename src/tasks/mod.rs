//! Task system for tripfetch
//!
//! A [`Task`] is one unit of work moved through the pipeline; a
//! [`TaskFactory`] turns a raw input identifier into a ready-to-run task.
//! The pool only ever sees these traits, so new task kinds plug in without
//! touching the pipeline.
//!
//! ## Key Components
//!
//! - [`Task`] - execute/describe capability set
//! - [`TaskFactory`] - identifier to task conversion
//! - [`DownloadTask`] - download-and-store variant
//! - [`DownloadFactory`] - builds [`DownloadTask`]s sharing one transport
//!
//! ## Example
//!
//! ```rust,ignore
//! use tripfetch::tasks::{DownloadFactory, TaskFactory};
//!
//! let factory = DownloadFactory::new(transport, ".");
//! let mut task = factory.make("https://host/data/file.parquet".to_string());
//! task.execute().await;
//! println!("{}", task.describe()?);
//! ```

mod download;
mod traits;
mod types;

pub use download::{DownloadFactory, DownloadTask, local_file_name};
pub use traits::{Task, TaskFactory};
pub use types::{Outcome, TaskError, TaskStatus};
