use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use labelstack_worker::{JobWorker, WorkerConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "labelstack_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env();

    let pool = labelstack_db::create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");
    labelstack_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database connection pool created");

    let cancel = CancellationToken::new();
    let worker = JobWorker::new(pool, config);
    let handle = tokio::spawn(worker.run(cancel.clone()));

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
    }
    tracing::info!("Shutdown requested");
    cancel.cancel();
    let _ = handle.await;
    tracing::info!("Worker stopped");
}
