use anyhow::Context;
use docsum::{api, config, logging, summarization::OpenAiSummarizationClient, upload::UploadService};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_env_file();
    logging::init_tracing();
    let config = config::load_config().context("Failed to load config from environment")?;

    let summarizer = OpenAiSummarizationClient::from_config(&config)
        .context("Failed to construct summarization client")?;
    let service = Arc::new(UploadService::new(
        Arc::new(summarizer),
        config.summarization_model.clone(),
    ));
    tracing::info!(model = service.model(), "Upload service ready");
    let app = api::create_router(service, &config);

    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, config.server_port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.server_port))?;
    tracing::info!("Listening on http://0.0.0.0:{}", config.server_port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated unexpectedly")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
