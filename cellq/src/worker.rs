//! One worker process: connect, drain one batch of jobs, return.

use cellq_consume::{
    Analyzer, BatchSummary, CommandAnalyzer, DispatchConfig, Dispatcher, Handler, MethodHandler,
    PlotHandler,
};
use cellq_core::{Context, JobKind, Result, Settings, get_hostname};
use cellq_queue::{ConnectionManager, Connector, RedisConnector};
use cellq_storage::{S3Storage, Storage};
use tracing::info;

/// Run one batch with the external services described by `settings`
pub async fn run(settings: &Settings) -> Result<BatchSummary> {
    info!(
        hostname = %get_hostname(),
        kind = %settings.worker.kind,
        job_queue = %settings.broker.job_queue,
        batch_size = %settings.worker.batch_size,
        "Worker starting"
    );

    let connector = RedisConnector::from_settings(&settings.broker)?;
    let link = ConnectionManager::connect(connector).await?;
    let storage = S3Storage::connect(&settings.storage).await;
    let analyzer = CommandAnalyzer::new(&settings.worker.analyzer_program)
        .threads(settings.worker.analyzer_threads);

    run_with(settings, link, storage, analyzer).await
}

/// Run one batch over already constructed services
pub async fn run_with<C, S, A>(
    settings: &Settings,
    link: ConnectionManager<C>,
    storage: S,
    analyzer: A,
) -> Result<BatchSummary>
where
    C: Connector,
    S: Storage,
    A: Analyzer,
{
    let context = Context::from_settings(&settings.broker);
    let config = DispatchConfig::new()
        .poll_interval(settings.worker.poll_interval)
        .max_idle_polls(settings.worker.max_idle_polls);
    let batch_size = settings.worker.batch_size;

    match settings.worker.kind {
        JobKind::Method => {
            let handler = MethodHandler::new(storage, analyzer);
            drain(context, config, link, handler, batch_size).await
        }
        JobKind::Plot => {
            let handler = PlotHandler::new(storage, analyzer);
            drain(context, config, link, handler, batch_size).await
        }
    }
}

async fn drain<C: Connector, H: Handler>(
    context: Context,
    config: DispatchConfig,
    link: ConnectionManager<C>,
    handler: H,
    batch_size: usize,
) -> Result<BatchSummary> {
    let mut dispatcher = Dispatcher::new(context, link, handler).with_config(config);
    dispatcher.run_batch(batch_size).await
}
