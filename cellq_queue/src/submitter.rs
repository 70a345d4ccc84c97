use crate::{ConnectionManager, Connector, JobPlan};
use cellq_core::*;
use tracing::info;

/// Interface for submitting jobs to cellq queues
pub struct Submitter {
    context: Context,
}

impl Submitter {
    pub fn with_context(context: Context) -> Self {
        Self { context }
    }

    /// Push a new job onto the job queue and return its id
    pub async fn submit<C: Connector>(
        &self,
        link: &mut ConnectionManager<C>,
        job_plan: JobPlan,
    ) -> Result<String> {
        let body = job_plan.encode()?;
        link.publish(self.context.job_queue(), &body).await?;

        info!(
            job_id = %job_plan.id,
            queue = %self.context.job_queue(),
            "Job sent to queue"
        );

        Ok(job_plan.id)
    }

    /// Take the next published result, if any
    pub async fn collect<C: Connector>(
        &self,
        link: &mut ConnectionManager<C>,
    ) -> Result<Option<JobResult>> {
        match link.dequeue(self.context.result_queue()).await? {
            Some(body) => Ok(Some(JobResult::decode(&body)?)),
            None => Ok(None),
        }
    }
}
