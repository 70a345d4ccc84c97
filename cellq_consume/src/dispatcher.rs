use crate::dispatch_config::DispatchConfig;
use crate::handler::{Handler, Progress};
use cellq_core::{CellqError, Context, Job, JobResult, JobStage, Result};
use cellq_queue::{ConnectionManager, Connector, Publisher};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, info, warn};

/// Counters of one `run_batch` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Messages taken off the job queue
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Polls that found the job queue empty
    pub idle_polls: usize,
}

/// Takes jobs off the job queue, runs them through a handler and publishes
/// exactly one result for each of them.
pub struct Dispatcher<C: Connector, H: Handler> {
    context: Context,
    config: DispatchConfig,
    link: ConnectionManager<C>,
    handler: H,
    publisher: Publisher,
}

impl<C: Connector, H: Handler> Dispatcher<C, H> {
    pub fn new(context: Context, link: ConnectionManager<C>, handler: H) -> Self {
        let publisher = Publisher::new(context.result_queue());
        Self {
            context,
            config: DispatchConfig::default(),
            link,
            handler,
            publisher,
        }
    }

    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn link(&self) -> &ConnectionManager<C> {
        &self.link
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Process up to `max_jobs` messages, then return.
    ///
    /// Only broker faults end the batch early with an error; failing jobs
    /// are published as failures and counted.
    pub async fn run_batch(&mut self, max_jobs: usize) -> Result<BatchSummary> {
        let mut summary = BatchSummary::default();

        while summary.processed < max_jobs {
            match self.run_next().await? {
                Some(result) => {
                    summary.processed += 1;
                    if result.is_success() {
                        summary.succeeded += 1;
                    } else {
                        summary.failed += 1;
                    }
                }
                None => {
                    summary.idle_polls += 1;
                    if self
                        .config
                        .get_max_idle_polls()
                        .is_some_and(|max| summary.idle_polls >= max)
                    {
                        info!(idle_polls = %summary.idle_polls, "Job queue stayed empty, ending batch");
                        break;
                    }
                    debug!(queue = %self.context.job_queue(), "No job, waiting");
                    tokio::time::sleep(self.config.get_poll_interval()).await;
                }
            }
        }

        info!(
            processed = %summary.processed,
            succeeded = %summary.succeeded,
            failed = %summary.failed,
            "Batch finished"
        );
        Ok(summary)
    }

    /// Process at most one message and return the result that was published for it
    pub async fn run_next(&mut self) -> Result<Option<JobResult>> {
        // a failed reconnect is fatal, only a fault on a live connection is an empty poll
        self.link.ensure_connection().await?;
        let body = match self.link.dequeue(self.context.job_queue()).await {
            Ok(Some(body)) => body,
            Ok(None) => return Ok(None),
            Err(err) if err.is_connection_fault() => {
                warn!(error = %err, "Dequeue hit a broken connection");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        let (result, progress) = self.run(&body).await;

        if let Err(err) = self.publisher.publish(&mut self.link, &result).await {
            let payload = result
                .encode()
                .map(|body| String::from_utf8_lossy(&body).into_owned())
                .unwrap_or_default();
            error!(
                job_id = %result.job_id(),
                error = %err,
                result = %payload,
                "Could not publish result"
            );
            return Err(err);
        }
        if let Some(mut progress) = progress {
            progress.advance(JobStage::Published);
        }
        info!(job_id = %result.job_id(), success = %result.is_success(), "Job finished");

        Ok(Some(result))
    }

    /// Turn one message into its result; never fails
    pub async fn process(&self, body: &[u8]) -> JobResult {
        self.run(body).await.0
    }

    /// The result of one message and, for a decoded job, where it got to
    async fn run(&self, body: &[u8]) -> (JobResult, Option<Progress>) {
        let job = match Job::decode(body, self.handler.kind()) {
            Ok(job) => job,
            Err(failure) => {
                let job_id = Job::peek_id(body);
                warn!(job_id = %job_id, error = %failure, "Rejected job message");
                return (JobResult::failure(job_id, &failure), None);
            }
        };

        let mut progress = Progress::received(&job.id);
        let outcome = AssertUnwindSafe(self.handler.handle(&job, &mut progress))
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(Ok(files)) => JobResult::success(&job.id, files),
            Ok(Err(CellqError::Job(failure))) => {
                warn!(job_id = %job.id, stage = %progress.stage(), error = %failure, "Job failed");
                progress.advance(JobStage::Failed);
                JobResult::failure(&job.id, &failure)
            }
            Ok(Err(err)) => {
                error!(job_id = %job.id, stage = %progress.stage(), error = ?err, "Job failed unexpectedly");
                progress.advance(JobStage::Failed);
                JobResult::unclassified(&job.id)
            }
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|msg| msg.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_default();
                error!(job_id = %job.id, stage = %progress.stage(), panic = %reason, "Job panicked");
                progress.advance(JobStage::Failed);
                JobResult::unclassified(&job.id)
            }
        };
        (result, Some(progress))
    }
}
