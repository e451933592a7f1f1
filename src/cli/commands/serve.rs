use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::build_router;
use crate::cli::config::Config;
use crate::cli::ServeArgs;
use crate::clock::SystemClock;
use crate::handler::TransactionService;
use crate::native::init_tracing;

/// Merge the config file with flag/env overrides.
pub fn resolve_config(args: &ServeArgs) -> Result<Config> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        config.listen = listen;
    }
    if let Some(log_format) = args.log_format {
        config.log_format = log_format;
    }
    Ok(config)
}

pub async fn execute_serve(args: ServeArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    init_tracing(config.log_format);

    let service = Arc::new(TransactionService::new(Arc::new(SystemClock)));
    let app = build_router(service);

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen))?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
