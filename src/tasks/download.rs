use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::traits::{Task, TaskFactory};
use super::types::{Outcome, TaskError, TaskStatus};
use crate::transport::{ByteStream, Transport};

/// Final path segment of `url`, ignoring query, fragment and trailing slashes
///
/// Returns `None` when no usable segment remains (no path, `.` or `..`).
pub fn local_file_name(url: &str) -> Option<&str> {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    let mut path = &url[..end];

    // Skip scheme and authority so a bare host never becomes a file name
    if let Some(idx) = path.find("://") {
        let rest = &path[idx + 3..];
        path = rest.find('/').map_or("", |slash| &rest[slash..]);
    }

    let path = path.trim_end_matches('/');
    let name = path.rsplit('/').next().unwrap_or(path);

    match name {
        "" | "." | ".." => None,
        name => Some(name),
    }
}

/// Download-and-store task
///
/// Streams the GET response for `url` into `<output_dir>/<file name>`,
/// truncating any existing file. A partially written file is left in place
/// when the copy fails.
pub struct DownloadTask {
    url: String,
    file_name: Option<String>,
    output_dir: PathBuf,
    transport: Arc<dyn Transport>,
    outcome: Option<Outcome>,
    bytes_written: u64,
}

impl DownloadTask {
    pub fn new(url: String, output_dir: PathBuf, transport: Arc<dyn Transport>) -> Self {
        let file_name = local_file_name(&url).map(str::to_string);
        Self {
            url,
            file_name,
            output_dir,
            transport,
            outcome: None,
            bytes_written: 0,
        }
    }

    /// Fetch then copy; the body stream and file handle drop on every return
    async fn download(&mut self) -> Result<(), TaskError> {
        let mut body = self.transport.get(&self.url).await?;

        let file_name = self
            .file_name
            .as_deref()
            .ok_or_else(|| TaskError::NoFileName(self.url.clone()))?;
        let path = self.output_dir.join(file_name);

        let mut file = File::create(&path).await?;
        let copied = copy_body(&mut body, &mut file, &mut self.bytes_written).await;
        // Flush even after a failed copy so the partial content is on disk
        let flushed = file.flush().await;
        copied?;
        flushed?;

        debug!(url = %self.url, path = %path.display(), bytes = self.bytes_written, "Download stored");
        Ok(())
    }
}

async fn copy_body(
    body: &mut Box<dyn ByteStream>,
    file: &mut File,
    written: &mut u64,
) -> Result<(), TaskError> {
    while let Some(chunk) = body.next_chunk().await? {
        file.write_all(&chunk).await?;
        *written += chunk.len() as u64;
    }
    Ok(())
}

#[async_trait]
impl Task for DownloadTask {
    async fn execute(&mut self) {
        let outcome = match self.download().await {
            Ok(()) => Outcome::Success,
            Err(e) => {
                debug!(url = %self.url, error = %e, "Download failed");
                Outcome::Failure(e)
            }
        };
        self.outcome = Some(outcome);
    }

    fn status(&self) -> Option<TaskStatus> {
        self.outcome.as_ref().map(Outcome::status)
    }

    fn describe(&self) -> Result<String, TaskError> {
        let status = self
            .status()
            .ok_or_else(|| TaskError::NotExecuted(self.url.clone()))?;

        Ok(format!(
            "{} -> {} processed;status:{}",
            self.url,
            self.file_name.as_deref().unwrap_or("-"),
            status
        ))
    }
}

/// Builds [`DownloadTask`]s that share one transport and output directory
#[derive(Clone)]
pub struct DownloadFactory {
    transport: Arc<dyn Transport>,
    output_dir: PathBuf,
}

impl DownloadFactory {
    pub fn new(transport: Arc<dyn Transport>, output_dir: impl AsRef<Path>) -> Self {
        Self {
            transport,
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }
}

impl TaskFactory for DownloadFactory {
    fn make(&self, input: String) -> Box<dyn Task> {
        Box::new(DownloadTask::new(
            input,
            self.output_dir.clone(),
            self.transport.clone(),
        ))
    }
}
