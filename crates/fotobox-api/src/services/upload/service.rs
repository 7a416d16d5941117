use std::sync::Arc;

use fotobox_core::models::FailedSave;
use fotobox_storage::{LocalStore, StorageError};
use tokio::sync::Semaphore;

use super::types::{BatchOutcome, UploadCandidate};
use super::validator::{BatchValidator, ValidationError};

/// Batch upload orchestrator
///
/// Validates a whole batch up front (all-or-nothing, before any write), then
/// persists the accepted candidates in parallel on a semaphore-bounded worker
/// pool and waits for every task to finish.
///
/// Policy: best-effort with explicit partial-failure reporting. A failed
/// persist never cancels its siblings and never rolls back files already
/// written; it is reported per-file in the outcome.
#[derive(Clone)]
pub struct UploadService {
    store: Arc<LocalStore>,
    validator: BatchValidator,
    workers: Arc<Semaphore>,
}

impl UploadService {
    pub fn new(store: Arc<LocalStore>, validator: BatchValidator, worker_count: usize) -> Self {
        Self {
            store,
            validator,
            workers: Arc::new(Semaphore::new(worker_count.max(1))),
        }
    }

    /// Validate and persist one batch of candidates.
    ///
    /// Returns `Err` only for validation rejections (nothing written).
    /// Persist failures are collected into the outcome's `failed` list.
    pub async fn save_batch(
        &self,
        candidates: Vec<UploadCandidate>,
    ) -> Result<BatchOutcome, ValidationError> {
        let total_size = self.validator.validate(&candidates)?;
        let batch_len = candidates.len();

        let mut tasks = Vec::with_capacity(batch_len);
        for candidate in candidates {
            let store = self.store.clone();
            let workers = self.workers.clone();
            tasks.push(tokio::spawn(async move {
                let _permit = match workers.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return (
                            candidate.filename.clone(),
                            Err(StorageError::PersistFailed(
                                "Upload worker pool is closed".to_string(),
                            )),
                        );
                    }
                };

                let result = store
                    .persist(&candidate.filename, std::io::Cursor::new(candidate.bytes))
                    .await;
                (candidate.filename, result)
            }));
        }

        let mut saved = Vec::with_capacity(batch_len);
        let mut failed = Vec::new();
        for joined in futures::future::join_all(tasks).await {
            match joined {
                Ok((_, Ok(saved_file))) => saved.push(saved_file),
                Ok((filename, Err(e))) => {
                    tracing::error!(filename = %filename, error = %e, "Persist failed");
                    failed.push(FailedSave {
                        filename,
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "Persist task panicked");
                    failed.push(FailedSave {
                        filename: "<unknown>".to_string(),
                        reason: format!("Persist task failed: {}", e),
                    });
                }
            }
        }

        tracing::info!(
            batch = batch_len,
            saved = saved.len(),
            failed = failed.len(),
            total_size,
            "Batch upload completed"
        );

        Ok(BatchOutcome {
            saved,
            failed,
            total_size,
        })
    }
}
