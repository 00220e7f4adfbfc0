use std::sync::Arc;

use clap::Parser;
use tokio::{net::TcpListener, signal};
use tracing::info;

use todo_server::config::Config;
use todo_server::id::{SystemClock, UlidGenerator};
use todo_server::{router, telemetry, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = Config::parse();
    telemetry::init_tracing(config.log_json)?;

    let store = config.open_store().await?;
    let state = AppState::new(Arc::clone(&store), Arc::new(UlidGenerator::new(SystemClock)));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, database = %config.database_url, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C"),
        () = terminate => info!("received SIGTERM"),
    }
}
