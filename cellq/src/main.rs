use cellq::core::Settings;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cellq=info,cellq_consume=info,cellq_queue=info,cellq_storage=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            error!(error = %err, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match cellq::worker::run(&settings).await {
        Ok(summary) => {
            info!(
                processed = %summary.processed,
                succeeded = %summary.succeeded,
                failed = %summary.failed,
                "Worker done"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "Worker stopped on a fatal error");
            ExitCode::FAILURE
        }
    }
}
