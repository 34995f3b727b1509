mod api;
mod config;
mod controllers;
mod function;
mod init;
mod ledger;
mod models;
mod result;
mod seed;

#[cfg(test)]
mod test_utils;

pub use crate::result::Result;

mod prelude {
    pub use crate::{config::Config, AppState, Result};
}

use std::sync::Arc;

use anyhow::anyhow;

use crate::{config::Config, ledger::Ledger};

#[derive(Clone)]
pub struct AppState {
    cfg: Arc<Config>,
    ledger: Ledger,
}

#[tokio::main]
async fn main() -> Result {
    dotenv::dotenv().ok();
    init::logging::init_tracing();

    let cfg = config::build()?;

    let command = std::env::args().nth(1).unwrap_or_else(|| "serve".to_string());

    return match command.as_str() {
        "serve" => run(cfg).await,
        "function" => function::run(cfg).await,
        "seed" => seed::run(cfg).await,
        other => Err(anyhow!("unknown command {other:?}, expected serve, function or seed").into()),
    };
}

async fn run(cfg: Config) -> Result {
    let addr = cfg.socket_addr()?;

    let db = init::db::init_sqlite_pool(&cfg).await?;

    let state = AppState {
        cfg: Arc::new(cfg),
        ledger: Ledger::new(db.clone()),
    };

    let router = controllers::build_router(state);

    let server = axum::Server::try_bind(&addr)
        .map_err(|e| anyhow!("could not bind {addr}: {e}"))?;

    tracing::info!(%addr, "guess board listening");

    server
        .serve(router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("server stopped");

    return Ok(());
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
