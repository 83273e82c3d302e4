use chrono::Utc;
use goldwallet_core::bootstrap::BootstrapEvent;
use goldwallet_server::{api::app_router, build_state, config::Config, init_tracing, scheduler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);
    let state = build_state(&config).await?;

    scheduler::start_sync_job_worker(state.clone());

    // A fresh process counts as a boot: make sure the sync job is armed.
    state
        .bootstrap
        .on_event(&BootstrapEvent::BootCompleted, Utc::now());

    let router = app_router(state, &config);
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
