use crate::error::Result;
use crate::failure::{FailureKind, JobFailure};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Logical output name (e.g. "means") to storage key
pub type OutputRefs = BTreeMap<String, String>;

/// The terminal record published for every job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ResultMessage", try_from = "ResultMessage")]
pub enum JobResult {
    Success {
        job_id: String,
        files: OutputRefs,
    },
    Failure {
        job_id: String,
        error_id: String,
        message: String,
    },
}

impl JobResult {
    pub fn success(job_id: impl Into<String>, files: OutputRefs) -> Self {
        JobResult::Success {
            job_id: job_id.into(),
            files,
        }
    }

    pub fn failure(job_id: impl Into<String>, failure: &JobFailure) -> Self {
        JobResult::Failure {
            job_id: job_id.into(),
            error_id: failure.kind().id().to_string(),
            message: failure.message(),
        }
    }

    /// A failure that reveals nothing about its cause
    pub fn unclassified(job_id: impl Into<String>) -> Self {
        Self::failure(job_id, &JobFailure::new(FailureKind::Unknown))
    }

    pub fn job_id(&self) -> &str {
        match self {
            JobResult::Success { job_id, .. } => job_id,
            JobResult::Failure { job_id, .. } => job_id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobResult::Success { .. })
    }

    /// Serialize into a result queue message body
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parse a result queue message body
    pub fn decode(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }
}

/// The wire shape of a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMessage {
    pub job_id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<OutputRefs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub id: String,
    pub message: String,
}

impl From<JobResult> for ResultMessage {
    fn from(result: JobResult) -> Self {
        match result {
            JobResult::Success { job_id, files } => ResultMessage {
                job_id,
                success: true,
                files: Some(files),
                error: None,
            },
            JobResult::Failure {
                job_id,
                error_id,
                message,
            } => ResultMessage {
                job_id,
                success: false,
                files: None,
                error: Some(ErrorBody {
                    id: error_id,
                    message,
                }),
            },
        }
    }
}

impl TryFrom<ResultMessage> for JobResult {
    type Error = String;

    fn try_from(message: ResultMessage) -> std::result::Result<Self, Self::Error> {
        if message.success {
            return Ok(JobResult::Success {
                job_id: message.job_id,
                files: message.files.unwrap_or_default(),
            });
        }
        let error = message
            .error
            .ok_or_else(|| "Failed result is missing the error field".to_string())?;
        Ok(JobResult::Failure {
            job_id: message.job_id,
            error_id: error.id,
            message: error.message,
        })
    }
}
