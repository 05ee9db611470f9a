use std::net::SocketAddr;
use tally_dashboard::{lifecycle, router, AppState, Config, CounterClient};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let client = CounterClient::new(config.upstream_url.clone());
    info!(
        upstream = %config.upstream_url,
        start = %config.window.start,
        end = %config.window.end,
        "polling counter api"
    );

    let state = AppState::new(config);
    lifecycle::spawn_refresh_loop(state.clone(), client);

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
