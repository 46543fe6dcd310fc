//! plan-relay API server

use std::sync::Arc;

use github::GitHubAppMinter;
use processor::EventHandler;
use queue::{Publisher, RedisTransport};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    common::logging::init("info");

    let config = match common::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Refusing to start");
            std::process::exit(1);
        }
    };

    info!("Starting plan-relay");

    let minter = GitHubAppMinter::from_config(&config)?;
    if !minter.is_configured() {
        warn!("GITHUB_APP_ID / GITHUB_APP_PRIVATE_KEY not set; plan jobs will not be enqueued");
    }

    let transport = RedisTransport::connect(&config.redis_url).await?;
    let publisher = Publisher::new(Arc::new(transport), config.queue_topic.clone());
    let event_handler = EventHandler::new(Arc::new(minter), publisher, &config);

    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config, event_handler));
    let app = routes::router(state).layer(TraceLayer::new_for_http());

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                let _ = signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = signal::ctrl_c() => {},
            _ = sigterm.recv() => {},
        }
    }
    #[cfg(not(unix))]
    {
        let _ = signal::ctrl_c().await;
    }
}
