use std::sync::Arc;

use loopline_ai::{AiService, ChatClient, ChatConfig};
use loopline_worker::JobPoller;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loopline_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = loopline_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    loopline_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");

    let chat_config = ChatConfig::from_env();
    tracing::info!(model = %chat_config.model, base_url = %chat_config.base_url, "LLM client configured");

    let client = ChatClient::new(chat_config).expect("Failed to build chat client");
    let service = AiService::new(Arc::new(client));

    let cancel = CancellationToken::new();
    let poller = JobPoller::new(pool, service);

    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received SIGINT, stopping poller");
            cancel_for_signal.cancel();
        }
    });

    poller.run(cancel).await;
    tracing::info!("Poller stopped");
}
