use crate::{ConnectionManager, Connector};
use cellq_core::{JobResult, Result};
use tracing::debug;

/// Serializes results and publishes them to the result queue
#[derive(Debug, Clone)]
pub struct Publisher {
    queue: String,
}

impl Publisher {
    pub fn new(queue: impl ToString) -> Self {
        Self {
            queue: queue.to_string(),
        }
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    pub async fn publish<C: Connector>(
        &self,
        link: &mut ConnectionManager<C>,
        result: &JobResult,
    ) -> Result<()> {
        let body = result.encode()?;
        link.publish(&self.queue, &body).await?;
        debug!(
            job_id = %result.job_id(),
            queue = %self.queue,
            success = %result.is_success(),
            "Result published"
        );
        Ok(())
    }
}
