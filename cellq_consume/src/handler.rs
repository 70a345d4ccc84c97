use cellq_core::{Job, JobKind, JobStage, OutputRefs, Result};
use std::future::Future;
use tracing::{debug, warn};

/// Maps a job to its computation and the staging around it
pub trait Handler: Send + Sync {
    /// The kind of jobs this handler serves
    fn kind(&self) -> JobKind;

    /// Run the job and return the storage keys of its outputs.
    ///
    /// A `CellqError::Job` is reported to the submitter as is; any other
    /// error is reported without details. On success the job must have
    /// advanced to `JobStage::OutputsStaged`.
    fn handle<'a>(
        &'a self,
        job: &'a Job,
        progress: &'a mut Progress,
    ) -> impl Future<Output = Result<OutputRefs>> + Send + 'a;
}

/// Tracks and logs the stage of one job
#[derive(Debug)]
pub struct Progress {
    job_id: String,
    stage: JobStage,
}

impl Progress {
    pub fn received(job_id: impl ToString) -> Self {
        let job_id = job_id.to_string();
        debug!(job_id = %job_id, stage = %JobStage::Received, "Job received");
        Self {
            job_id,
            stage: JobStage::Received,
        }
    }

    pub fn stage(&self) -> JobStage {
        self.stage
    }

    pub fn advance(&mut self, next: JobStage) {
        if !self.stage.can_advance_to(next) {
            warn!(job_id = %self.job_id, from = %self.stage, to = %next, "Unexpected stage change");
        }
        self.stage = next;
        debug!(job_id = %self.job_id, stage = %next, "Job advanced");
    }
}
