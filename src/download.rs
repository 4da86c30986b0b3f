//! Concurrent image downloading
//!
//! The download stage fans out one request per task with no concurrency cap,
//! streams each body to disk, and fans back in to an order-preserving result
//! list. A failed task is logged and recorded as `None`; it never disturbs
//! its siblings.

use crate::catalog::DownloadTask;
use crate::error::{Result, StarScanError};
use crate::progress::ProgressReporter;
use futures_util::stream::TryStreamExt;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio_util::io::StreamReader;

/// Downloader for the fan-out phase, sharing one HTTP client across tasks
#[derive(Debug, Clone)]
pub struct ImageDownloader {
    client: Client,
    save_dir: PathBuf,
}

impl ImageDownloader {
    /// Create a downloader writing into `save_dir`
    #[must_use]
    pub fn new(client: Client, save_dir: &Path) -> Self {
        Self {
            client,
            save_dir: save_dir.to_path_buf(),
        }
    }

    /// Download every task concurrently
    ///
    /// Returns one entry per task, preserving task order: `Some(filename)`
    /// for a saved file, `None` for a failure. The progress reporter is
    /// notified exactly once per task, success or failure, and the method
    /// only returns once every task has resolved.
    pub async fn download_all(
        &self,
        tasks: &[DownloadTask],
        progress: Arc<dyn ProgressReporter>,
    ) -> Vec<Option<String>> {
        progress.on_stage_start(tasks.len());

        let handles: Vec<_> = tasks
            .iter()
            .cloned()
            .map(|task| {
                let downloader = self.clone();
                let progress = Arc::clone(&progress);
                tokio::spawn(async move {
                    let result = downloader.download_one(&task).await;
                    progress.on_item_complete();
                    match result {
                        Ok(()) => Some(task.filename),
                        Err(e) => {
                            log::warn!("Failed to download {}: {}", task.filename, e);
                            None
                        },
                    }
                })
            })
            .collect();

        let results = join_ordered(handles, progress.as_ref()).await;

        progress.on_stage_complete();
        results
    }

    /// Download a single image body to `<save_dir>/<filename>`
    async fn download_one(&self, task: &DownloadTask) -> Result<()> {
        log::debug!("Downloading {} -> {}", task.url, task.filename);

        let response = self.client.get(&task.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StarScanError::download(format!(
                "HTTP {} for {}",
                status, task.url
            )));
        }

        let target = self.save_dir.join(&task.filename);
        if let Err(e) = write_body(response, &target).await {
            // A failed task must not leave a truncated file behind
            let _ = tokio::fs::remove_file(&target).await;
            return Err(e);
        }

        Ok(())
    }
}

/// Stream a response body to `target`
async fn write_body(response: reqwest::Response, target: &Path) -> Result<()> {
    let mut file = tokio::fs::File::create(target)
        .await
        .map_err(|e| StarScanError::file_io_error("create file", target, &e))?;

    let mut body = StreamReader::new(
        response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e)),
    );

    tokio::io::copy(&mut body, &mut file)
        .await
        .map_err(|e| StarScanError::file_io_error("write to file", target, &e))?;

    file.flush()
        .await
        .map_err(|e| StarScanError::file_io_error("flush file", target, &e))?;

    Ok(())
}

/// Resolve spawned download tasks in task order
///
/// A panicked task never reached its own progress update, so its
/// compensating tick fires here to keep the exactly-once contract.
async fn join_ordered(
    handles: Vec<tokio::task::JoinHandle<Option<String>>>,
    progress: &dyn ProgressReporter,
) -> Vec<Option<String>> {
    futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| match joined {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Download task aborted: {e}");
                progress.on_item_complete();
                None
            },
        })
        .collect()
}

/// Filter download results down to the successfully saved filenames,
/// preserving order
#[must_use]
pub fn successful_files(results: Vec<Option<String>>) -> Vec<String> {
    results.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_files_filters_and_preserves_order() {
        let results = vec![
            Some("space_0.jpg".to_string()),
            None,
            Some("space_2.jpg".to_string()),
        ];
        assert_eq!(successful_files(results), vec!["space_0.jpg", "space_2.jpg"]);
    }

    #[test]
    fn test_successful_files_empty() {
        assert!(successful_files(Vec::new()).is_empty());
        assert!(successful_files(vec![None, None]).is_empty());
    }

    #[tokio::test]
    async fn test_download_all_empty_task_list() {
        let downloader = ImageDownloader::new(Client::new(), Path::new("/tmp"));
        let counter = Arc::new(crate::progress::CountingProgressReporter::new());
        let progress: Arc<dyn ProgressReporter> = counter.clone();
        let results = downloader.download_all(&[], progress).await;

        assert!(results.is_empty());
        assert_eq!(counter.total(), 0);
        assert_eq!(counter.completed(), 0);
    }

    #[tokio::test]
    async fn test_panicked_task_yields_none_and_counts_once() {
        let counter = Arc::new(crate::progress::CountingProgressReporter::new());
        counter.on_stage_start(2);

        // Only the aborted task ticks here; live tasks tick themselves
        let handles = vec![
            tokio::spawn(async { Some("space_0.jpg".to_string()) }),
            tokio::spawn(async { panic!("decoder blew up") }),
        ];
        let results = join_ordered(handles, counter.as_ref()).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_deref(), Some("space_0.jpg"));
        assert_eq!(results[1], None);
        assert_eq!(counter.completed(), 1);
    }

    // End-to-end behavior against a live socket (status mixes, counter
    // exactness, order preservation) is covered by tests/download_stage.rs
    // with a local stub HTTP server.
}
