use crate::settings::BrokerSettings;

/// Queue-specific context for cellq operations
#[derive(Debug, Clone)]
pub struct Context {
    job_queue: String,
    result_queue: String,
}

impl Context {
    /// Create a new context over the given job and result queues
    pub fn new(job_queue: impl ToString, result_queue: impl ToString) -> Self {
        Self {
            job_queue: job_queue.to_string(),
            result_queue: result_queue.to_string(),
        }
    }

    pub fn from_settings(settings: &BrokerSettings) -> Self {
        Self::new(&settings.job_queue, &settings.result_queue)
    }

    /// Get the name of the queue jobs are taken from
    pub fn job_queue(&self) -> &str {
        &self.job_queue
    }

    /// Get the name of the queue results are published to
    pub fn result_queue(&self) -> &str {
        &self.result_queue
    }
}
