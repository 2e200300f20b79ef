//! Job orchestration state machine.
//!
//! One orchestration per image: upload (single attempt), a bounded poll
//! loop, one result fetch, then archive extraction and parsing. Each
//! terminal outcome maps to a distinct [`JobError`] variant so callers can
//! tell "the service never finished" from "the service reported an error".

use std::time::Duration;

use tempfile::TempDir;
use uuid::Uuid;

use super::{JobError, JobStatus, OcrService};
use crate::archive::{self, ArchiveError};
use crate::extract::{Classifier, ExtractedRecords};
use crate::models::{JobState, RecognitionJob};

/// Description attached to uploaded assets.
const UPLOAD_DESCRIPTION: &str = "Input Image";

/// Drives recognition jobs against a remote OCR service.
pub struct JobOrchestrator<S> {
    service: S,
    classifier: Classifier,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl<S: OcrService> JobOrchestrator<S> {
    pub fn new(
        service: S,
        classifier: Classifier,
        poll_interval: Duration,
        max_poll_attempts: u32,
    ) -> Self {
        Self {
            service,
            classifier,
            poll_interval,
            max_poll_attempts,
        }
    }

    /// Drive one image through upload, polling, and result retrieval,
    /// returning its classified records.
    ///
    /// The result archive is extracted into a temporary directory scoped to
    /// this call and removed on every exit path.
    pub async fn run(&self, image: &[u8], image_id: &str) -> Result<ExtractedRecords, JobError> {
        let mut job = RecognitionJob::new(image_id);

        job.advance(JobState::Uploading);
        let asset_id = match self.service.upload(image, UPLOAD_DESCRIPTION).await {
            Ok(id) => id,
            Err(e) => {
                job.advance(JobState::Failed);
                return Err(JobError::Upload(e));
            }
        };
        job.asset_id = Some(asset_id);
        job.advance(JobState::Queued);

        let archive_bytes = self.poll_until_done(&mut job, asset_id).await?;

        let workdir = TempDir::new().map_err(ArchiveError::Io)?;
        let text = archive::read_archive(&archive_bytes, workdir.path())?;

        let elapsed_ms = (chrono::Utc::now() - job.created_at).num_milliseconds();
        tracing::info!(
            image = %job.image_id,
            asset = %asset_id,
            bytes = archive_bytes.len(),
            elapsed_ms,
            "result archive processed"
        );

        Ok(self.classifier.parse(&text))
    }

    /// Poll until the job completes, the service reports failure, or the
    /// attempt budget runs out. Returns the fetched archive bytes.
    ///
    /// Transient poll failures consume the same budget as pending
    /// responses; the budget is a ceiling on total poll attempts.
    async fn poll_until_done(
        &self,
        job: &mut RecognitionJob,
        asset_id: Uuid,
    ) -> Result<Vec<u8>, JobError> {
        job.advance(JobState::Processing);

        for attempt in 1..=self.max_poll_attempts {
            match self.service.get_status(asset_id).await {
                Ok(JobStatus::Done) => {
                    return match self.service.fetch_result(asset_id).await {
                        Ok(bytes) => {
                            job.advance(JobState::Succeeded);
                            Ok(bytes)
                        }
                        Err(e) => {
                            job.advance(JobState::Failed);
                            Err(JobError::Fetch(e))
                        }
                    };
                }
                Ok(JobStatus::Error { detail }) => {
                    job.advance(JobState::Failed);
                    return Err(JobError::RemoteJob {
                        detail: detail.unwrap_or_else(|| "no detail reported".to_string()),
                    });
                }
                Ok(JobStatus::Pending) => {
                    tracing::debug!(image = %job.image_id, attempt, "job still pending");
                }
                Err(e) => {
                    tracing::warn!(image = %job.image_id, attempt, error = %e, "status poll failed");
                }
            }

            if attempt < self.max_poll_attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        job.advance(JobState::TimedOut);
        Err(JobError::Timeout {
            attempts: self.max_poll_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::ServiceError;

    use std::collections::VecDeque;
    use std::io::Write;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use zip::write::SimpleFileOptions;

    fn result_zip(text: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer
            .start_file("result.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(text.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    /// Scripted service: pops one status per poll, counts calls.
    struct ScriptedService {
        upload_ok: bool,
        statuses: Mutex<VecDeque<Result<JobStatus, ServiceError>>>,
        fetch: Result<Vec<u8>, String>,
        polls: AtomicU32,
        fetches: AtomicU32,
    }

    impl ScriptedService {
        fn new(statuses: Vec<Result<JobStatus, ServiceError>>, fetch: Result<Vec<u8>, String>) -> Self {
            Self {
                upload_ok: true,
                statuses: Mutex::new(statuses.into()),
                fetch,
                polls: AtomicU32::new(0),
                fetches: AtomicU32::new(0),
            }
        }

        fn failing_upload() -> Self {
            let mut service = Self::new(vec![], Ok(vec![]));
            service.upload_ok = false;
            service
        }
    }

    #[async_trait]
    impl OcrService for ScriptedService {
        async fn upload(&self, _image: &[u8], _description: &str) -> Result<Uuid, ServiceError> {
            if self.upload_ok {
                Ok(Uuid::new_v4())
            } else {
                Err(ServiceError::UnexpectedResponse(
                    "401 Unauthorized".to_string(),
                ))
            }
        }

        async fn get_status(&self, _asset_id: Uuid) -> Result<JobStatus, ServiceError> {
            self.polls.fetch_add(1, Ordering::Relaxed);
            self.statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(JobStatus::Pending))
        }

        async fn fetch_result(&self, _asset_id: Uuid) -> Result<Vec<u8>, ServiceError> {
            self.fetches.fetch_add(1, Ordering::Relaxed);
            self.fetch
                .clone()
                .map_err(ServiceError::UnexpectedResponse)
        }
    }

    fn orchestrator(service: ScriptedService, budget: u32) -> JobOrchestrator<ScriptedService> {
        JobOrchestrator::new(service, Classifier::default(), Duration::ZERO, budget)
    }

    #[tokio::test]
    async fn test_all_pending_times_out() {
        let service = ScriptedService::new(vec![], Ok(vec![]));
        let orch = orchestrator(service, 5);

        let err = orch.run(b"image", "scan.jpg").await.unwrap_err();
        assert!(matches!(err, JobError::Timeout { attempts: 5 }));
        assert_eq!(orch.service.polls.load(Ordering::Relaxed), 5);
        assert_eq!(orch.service.fetches.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_remote_error_fails_regardless_of_budget() {
        let service = ScriptedService::new(
            vec![
                Ok(JobStatus::Pending),
                Ok(JobStatus::Error {
                    detail: Some("inference failed".to_string()),
                }),
            ],
            Ok(vec![]),
        );
        let orch = orchestrator(service, 100);

        let err = orch.run(b"image", "scan.jpg").await.unwrap_err();
        match err {
            JobError::RemoteJob { detail } => assert_eq!(detail, "inference failed"),
            other => panic!("expected RemoteJob, got {other:?}"),
        }
        assert_eq!(orch.service.polls.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn test_pending_pending_done_succeeds() {
        let service = ScriptedService::new(
            vec![
                Ok(JobStatus::Pending),
                Ok(JobStatus::Pending),
                Ok(JobStatus::Done),
            ],
            Ok(result_zip("Acme Corp\nJohn Smith")),
        );
        let orch = orchestrator(service, 3);

        let records = orch.run(b"image", "scan.jpg").await.unwrap();
        assert_eq!(records.companies, vec!["Acme Corp"]);
        assert_eq!(records.names, vec!["John Smith"]);
        assert_eq!(orch.service.polls.load(Ordering::Relaxed), 3);
        assert_eq!(orch.service.fetches.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_upload_failure_makes_no_polls() {
        let orch = orchestrator(ScriptedService::failing_upload(), 10);

        let err = orch.run(b"image", "scan.jpg").await.unwrap_err();
        assert!(matches!(err, JobError::Upload(_)));
        assert_eq!(orch.service.polls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_transient_poll_failures_consume_budget() {
        let service = ScriptedService::new(
            vec![
                Err(ServiceError::UnexpectedResponse("connection reset".to_string())),
                Err(ServiceError::UnexpectedResponse("connection reset".to_string())),
            ],
            Ok(vec![]),
        );
        let orch = orchestrator(service, 2);

        let err = orch.run(b"image", "scan.jpg").await.unwrap_err();
        assert!(matches!(err, JobError::Timeout { attempts: 2 }));
        assert_eq!(orch.service.polls.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_terminal() {
        let service = ScriptedService::new(
            vec![Ok(JobStatus::Done)],
            Err("503 Service Unavailable".to_string()),
        );
        let orch = orchestrator(service, 5);

        let err = orch.run(b"image", "scan.jpg").await.unwrap_err();
        assert!(matches!(err, JobError::Fetch(_)));
        assert_eq!(orch.service.fetches.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_corrupt_archive_is_terminal() {
        let service = ScriptedService::new(
            vec![Ok(JobStatus::Done)],
            Ok(b"not a zip".to_vec()),
        );
        let orch = orchestrator(service, 5);

        let err = orch.run(b"image", "scan.jpg").await.unwrap_err();
        assert!(matches!(err, JobError::Archive(_)));
    }
}
