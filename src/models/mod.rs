//! Data models for tracked recognition jobs.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a recognition job.
///
/// `Succeeded`, `Failed`, and `TimedOut` are terminal; the orchestrator
/// makes no further transitions from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Created,
    Uploading,
    Queued,
    Processing,
    Succeeded,
    Failed,
    TimedOut,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Uploading => "uploading",
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::TimedOut => "timed_out",
        }
    }

    /// Whether the job makes no further transitions from this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::TimedOut)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One submitted image, tracked from upload through terminal status.
///
/// Owned exclusively by the orchestration call that created it; the polling
/// loop is the only mutator.
#[derive(Debug, Clone)]
pub struct RecognitionJob {
    /// Identifier of the source image (typically the file name).
    pub image_id: String,
    /// Asset id assigned by the remote service at upload.
    pub asset_id: Option<Uuid>,
    /// Current lifecycle state.
    pub state: JobState,
    /// When this job was created.
    pub created_at: DateTime<Utc>,
}

impl RecognitionJob {
    /// Create a job for an image, in the `Created` state.
    pub fn new(image_id: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            asset_id: None,
            state: JobState::Created,
            created_at: Utc::now(),
        }
    }

    /// Advance to the next state, logging the transition.
    pub fn advance(&mut self, next: JobState) {
        tracing::debug!(
            image = %self.image_id,
            from = %self.state,
            to = %next,
            "job state transition"
        );
        self.state = next;
    }
}
