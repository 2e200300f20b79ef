//! Remote OCR job orchestration.
//!
//! The remote service contract is three calls - upload, status, fetch -
//! behind the [`OcrService`] trait. [`JobOrchestrator`] drives one image
//! through the upload/poll/fetch state machine and hands the packaged
//! result archive to the extraction parser. [`NvcfClient`] implements the
//! contract against NVIDIA's cloud functions API.

mod nvcf;
mod orchestrator;

pub use nvcf::NvcfClient;
pub use orchestrator::JobOrchestrator;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::archive::ArchiveError;

/// Transport-level failures talking to the remote service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Status reported by the remote service for a submitted asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Still queued or running.
    Pending,
    /// Finished; the result archive can be fetched.
    Done,
    /// The service reported a failure.
    Error { detail: Option<String> },
}

/// Terminal errors for one recognition job.
#[derive(Debug, Error)]
pub enum JobError {
    /// Upload transport failure. Treated as non-transient misconfiguration
    /// and never retried.
    #[error("upload failed: {0}")]
    Upload(ServiceError),

    /// The remote service reported the job as failed.
    #[error("remote job failed: {detail}")]
    RemoteJob { detail: String },

    /// Poll budget exhausted while the job was still pending.
    #[error("job still pending after {attempts} poll attempts")]
    Timeout { attempts: u32 },

    /// The result fetch failed after a successful status. Not retried.
    #[error("result fetch failed: {0}")]
    Fetch(ServiceError),

    /// The downloaded result archive could not be processed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

/// Contract the orchestrator depends on.
///
/// Implemented by [`NvcfClient`] for the real service and by scripted
/// stand-ins in tests. The authentication token is the implementation's
/// concern; the orchestrator never sees it.
#[async_trait]
pub trait OcrService: Send + Sync {
    /// Upload image bytes and register them for processing, returning the
    /// asset id assigned by the service.
    async fn upload(&self, image: &[u8], description: &str) -> Result<Uuid, ServiceError>;

    /// Check the processing status of an uploaded asset.
    async fn get_status(&self, asset_id: Uuid) -> Result<JobStatus, ServiceError>;

    /// Fetch the packaged result archive for a completed asset.
    async fn fetch_result(&self, asset_id: Uuid) -> Result<Vec<u8>, ServiceError>;
}
