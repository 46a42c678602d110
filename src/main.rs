use myvivio_web::loads::bootstrap;
use myvivio_web::session::SessionStore;
use myvivio_web::{AppState, Config, DurableStore, Gateway, HttpGateway, MockGateway, router};
use std::{net::SocketAddr, sync::Arc};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();

    let gateway: Arc<dyn Gateway> = match &config.api_base_url {
        Some(base_url) => {
            info!(%base_url, "using Myvivio API");
            Arc::new(HttpGateway::new(base_url.clone(), config.request_timeout)?)
        }
        None => {
            warn!("MYVIVIO_API_URL not set; serving mock data");
            Arc::new(MockGateway::new())
        }
    };

    let store = DurableStore::open(&config.session_path).await;
    let session = SessionStore::restore(store);
    let port = config.port;
    let state = AppState::new(config, gateway, session);
    bootstrap(&state).await;

    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
