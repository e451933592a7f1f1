use axum::{
    body::Bytes as AxumBytes,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::Span;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cli::config::LogFormat;
use crate::handler::{RecordOutcome, TransactionService};
use crate::stats::StatisticsResponse;

/// Initialize the tracing subscriber.
/// Uses RUST_LOG env var for filtering (defaults to info).
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true))
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init(),
    }
}

/// Prefix the transaction and statistics routes are mounted under.
pub const API_PREFIX: &str = "/analytics";

pub fn build_router(service: Arc<TransactionService>) -> Router {
    let analytics = Router::new()
        .route("/transactions", post(handle_transaction_axum))
        .route("/statistics", get(handle_statistics_axum));

    Router::new()
        .nest(API_PREFIX, analytics)
        .route("/health", get(|| async { "ok" }))
        .with_state(service)
}

#[tracing::instrument(
    name = "transaction",
    skip(service, body),
    fields(body_size = body.len(), outcome = tracing::field::Empty)
)]
async fn handle_transaction_axum(
    State(service): State<Arc<TransactionService>>,
    body: AxumBytes,
) -> Result<StatusCode, (StatusCode, String)> {
    let outcome = service
        .record_json(&body)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    Span::current().record("outcome", tracing::field::debug(&outcome));

    Ok(match outcome {
        RecordOutcome::Accepted => StatusCode::CREATED,
        RecordOutcome::Dropped => StatusCode::NO_CONTENT,
    })
}

#[tracing::instrument(name = "statistics", skip(service))]
async fn handle_statistics_axum(
    State(service): State<Arc<TransactionService>>,
) -> Json<StatisticsResponse> {
    Json(service.statistics())
}
