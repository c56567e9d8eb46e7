use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use velohub_audio::application::ports::{
    AnalysisResultRepository, AudioEventQueue, EvaluationRepository,
};
use velohub_audio::application::services::{
    AnalysisWorker, ReportService, UploadService, WorkerConfig,
};
use velohub_audio::infrastructure::llm::CallScorerFactory;
use velohub_audio::infrastructure::notify::HttpCompletionNotifier;
use velohub_audio::infrastructure::observability::{init_tracing, TracingConfig};
use velohub_audio::infrastructure::persistence::{
    create_pool, PgAnalysisResultRepository, PgEvaluationRepository,
};
use velohub_audio::infrastructure::queue::ChannelAudioQueue;
use velohub_audio::infrastructure::speech::TranscriberFactory;
use velohub_audio::infrastructure::storage::AudioStoreFactory;
use velohub_audio::presentation::{create_router, AppState, Environment, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;
    let environment: Environment = std::env::var("APP_ENV")
        .unwrap_or_else(|_| "local".to_string())
        .parse()
        .map_err(anyhow::Error::msg)?;
    init_tracing(TracingConfig {
        environment: environment.to_string(),
        json_format: settings.logging.enable_json,
    });

    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let evaluations: Arc<dyn EvaluationRepository> =
        Arc::new(PgEvaluationRepository::new(pool.clone()));
    let results: Arc<dyn AnalysisResultRepository> =
        Arc::new(PgAnalysisResultRepository::new(pool));

    let store = AudioStoreFactory::create(&settings.storage)?;
    let transcriber = TranscriberFactory::create(&settings.speech)?;
    let scorer = CallScorerFactory::create(&settings.llm)?;
    let notifier = Arc::new(HttpCompletionNotifier::new(&settings.worker.notify_base_url));

    let (queue, subscriber, mut dead_letters) = ChannelAudioQueue::new(settings.worker.max_retries);
    let queue = Arc::new(queue);

    tokio::spawn(async move {
        while let Some(dead_letter) = dead_letters.recv().await {
            tracing::error!(
                message_id = %dead_letter.message_id,
                delivery_attempt = dead_letter.delivery_attempt,
                "Message dead-lettered; evaluation stays SENT and can be reprocessed manually"
            );
        }
    });

    let worker = AnalysisWorker::new(
        subscriber,
        Arc::clone(&evaluations),
        Arc::clone(&results),
        transcriber,
        scorer,
        notifier,
        WorkerConfig {
            max_retries: settings.worker.max_retries,
            base_delay: Duration::from_millis(settings.worker.base_delay_ms),
            language_code: settings.speech.language.clone(),
            ..WorkerConfig::default()
        },
    );
    let worker_handle = tokio::spawn(worker.run());

    let upload_service = Arc::new(UploadService::new(
        Arc::clone(&evaluations),
        store,
        Arc::clone(&queue) as Arc<dyn AudioEventQueue>,
        settings.storage.bucket.clone(),
        Duration::from_secs(settings.storage.upload_url_ttl_secs),
    ));
    let report_service = Arc::new(ReportService::new(evaluations, results));

    let state = AppState::new(upload_service, report_service);
    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!(%addr, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Let the in-flight message finish before the process exits.
    queue.shutdown();
    worker_handle.await?;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
}
