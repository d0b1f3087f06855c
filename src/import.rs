// src/import.rs
//! CV import: upload a file, follow the extraction task to a terminal
//! state, then refresh the Career Ark sections it populated.

use serde_json::Value;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{error, info, warn};

use crate::core::poller::{poll_until, PollOutcome, PollPolicy, PollStep};
use crate::core::ApiClient;
use crate::error::Result;
use crate::types::{AllSections, ImportStatus};
use crate::utils::{validate_file_extension, CV_EXTENSIONS};

pub const EXTRACTION_FAILED: &str = "CV extraction failed.";
pub const STATUS_CHECK_FAILED: &str = "Failed to check CV extraction status.";
pub const EXTRACTION_TIMED_OUT: &str = "CV extraction timed out.";
pub const REFRESH_FAILED: &str = "Failed to update Ark";

/// Progress percentage once the upload has been accepted.
const UPLOADED_PERCENT: u8 = 70;

#[derive(Debug, Clone, PartialEq)]
pub struct ImportProgress {
    pub attempt: u32,
    pub status: ImportStatus,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    Completed {
        task_id: String,
        summary: Option<Value>,
        /// `None` when the post-import refresh failed; see `refresh_error`.
        sections: Option<AllSections>,
        refresh_error: Option<String>,
    },
    Failed {
        task_id: String,
        error: String,
    },
    TimedOut {
        task_id: String,
        attempts: u32,
    },
}

impl ImportOutcome {
    pub fn task_id(&self) -> &str {
        match self {
            ImportOutcome::Completed { task_id, .. }
            | ImportOutcome::Failed { task_id, .. }
            | ImportOutcome::TimedOut { task_id, .. } => task_id,
        }
    }

    /// User-facing error for the failed and timed-out states.
    pub fn error_message(&self) -> Option<String> {
        match self {
            ImportOutcome::Completed { refresh_error, .. } => refresh_error.clone(),
            ImportOutcome::Failed { error, .. } => Some(error.clone()),
            ImportOutcome::TimedOut { .. } => Some(EXTRACTION_TIMED_OUT.to_string()),
        }
    }
}

pub struct CvImport<'a> {
    client: &'a ApiClient,
    policy: PollPolicy,
}

impl<'a> CvImport<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            policy: client.config().poll_policy(),
        }
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Upload errors come back as `Err`; once a task exists every path ends
    /// in exactly one `ImportOutcome`, except a session that expires while
    /// polling, which also comes back as `Err`.
    pub async fn run<F>(&self, file_path: &Path, mut progress: F) -> Result<ImportOutcome>
    where
        F: FnMut(ImportProgress),
    {
        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        validate_file_extension(file_name, CV_EXTENSIONS)?;

        let ark = self.client.career_ark();
        let accepted = ark.upload_cv(file_path).await?;
        let task_id = accepted.task_id;
        info!("CV upload accepted, extraction task {}", task_id);

        progress(ImportProgress {
            attempt: 0,
            status: ImportStatus::Pending,
            percent: UPLOADED_PERCENT,
        });

        let progress = Mutex::new(progress);
        let report = |update: ImportProgress| {
            if let Ok(mut callback) = progress.lock() {
                (*callback)(update);
            }
        };
        let report = &report;
        let session_lost = AtomicBool::new(false);
        let session_lost = &session_lost;
        let polled_task = task_id.as_str();

        let outcome = poll_until(&self.policy, move |attempt| async move {
            match ark.cv_status(polled_task).await {
                Ok(status) => match status.state() {
                    ImportStatus::Completed => {
                        PollStep::Done(status.extracted_data_summary().cloned())
                    }
                    ImportStatus::Failed => PollStep::Fail(
                        status
                            .error()
                            .map(str::to_string)
                            .unwrap_or_else(|| EXTRACTION_FAILED.to_string()),
                    ),
                    other => {
                        report(ImportProgress {
                            attempt,
                            status: other,
                            percent: polling_percent(attempt),
                        });
                        PollStep::Pending
                    }
                },
                Err(e) => {
                    if e.is_session_expired() {
                        session_lost.store(true, Ordering::SeqCst);
                    }
                    error!("Status check for task {} failed: {}", polled_task, e);
                    PollStep::Fail(STATUS_CHECK_FAILED.to_string())
                }
            }
        })
        .await;

        if session_lost.load(Ordering::SeqCst) {
            warn!("Session expired while following import {}", task_id);
            return Err(self.client.auth().redirect());
        }

        Ok(match outcome {
            PollOutcome::Completed(summary) => {
                report(ImportProgress {
                    attempt: 0,
                    status: ImportStatus::Completed,
                    percent: 100,
                });
                let (sections, refresh_error) = match self.refresh_sections().await {
                    Ok(sections) => (Some(sections), None),
                    Err(e) => {
                        warn!("Ark refresh after import {} failed: {}", task_id, e);
                        (None, Some(REFRESH_FAILED.to_string()))
                    }
                };
                info!("CV import {} completed", task_id);
                ImportOutcome::Completed {
                    task_id,
                    summary,
                    sections,
                    refresh_error,
                }
            }
            PollOutcome::Failed(error) => {
                warn!("CV import {} failed: {}", task_id, error);
                ImportOutcome::Failed { task_id, error }
            }
            PollOutcome::TimedOut { attempts } => {
                warn!("CV import {} timed out after {} checks", task_id, attempts);
                ImportOutcome::TimedOut { task_id, attempts }
            }
        })
    }

    async fn refresh_sections(&self) -> Result<AllSections> {
        let ark = self.client.career_ark();
        let profile = ark.profile().await?;
        ark.all_sections(&profile.id.to_string(), true).await
    }
}

fn polling_percent(attempt: u32) -> u8 {
    UPLOADED_PERCENT + attempt.min(30) as u8
}
