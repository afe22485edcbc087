use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chat_core::ServiceConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(false)
                .with_file(false),
        )
        .init();

    let config = ServiceConfig::from_env();
    tracing::info!(
        "Starting docuchat server (port {}, data dir {})",
        config.port,
        config.data_dir.display()
    );

    if let Err(e) = web_service::server::run(config).await {
        tracing::error!("Failed to run web service: {}", e);
        std::process::exit(1);
    }
}
