use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::clock::Clock;
use crate::stats::StatisticsResponse;
use crate::window::WindowAggregator;

/// Oldest accepted event age, in milliseconds.
pub const MAX_EVENT_AGE_MS: i64 = 60_000;

#[derive(Debug)]
pub enum HandleError {
    InvalidPayload(String),
    NonFiniteAmount,
}

impl std::fmt::Display for HandleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandleError::InvalidPayload(e) => write!(f, "invalid payload: {}", e),
            HandleError::NonFiniteAmount => write!(f, "amount must be a finite number"),
        }
    }
}

impl std::error::Error for HandleError {}

/// Body of `POST /analytics/transactions`.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct TransactionRequest {
    pub amount: f64,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    Accepted,
    Dropped,
}

/// True when the event happened strictly before `now_ms` and no more than
/// [`MAX_EVENT_AGE_MS`] earlier.
pub fn validate_timestamp(timestamp_ms: i64, now_ms: i64) -> bool {
    timestamp_ms < now_ms && now_ms - timestamp_ms <= MAX_EVENT_AGE_MS
}

/// Intake and query front for the shared window.
pub struct TransactionService {
    window: Arc<WindowAggregator>,
    clock: Arc<dyn Clock>,
}

impl TransactionService {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let window = Arc::new(WindowAggregator::new(clock.now_ms()));
        Self::with_window(window, clock)
    }

    pub fn with_window(window: Arc<WindowAggregator>, clock: Arc<dyn Clock>) -> Self {
        Self { window, clock }
    }

    /// Validate and record one transaction. Events outside the trailing
    /// window are dropped, not errors.
    pub fn record(&self, request: &TransactionRequest) -> Result<RecordOutcome, HandleError> {
        if !request.amount.is_finite() {
            warn!(amount = %request.amount, "rejecting non-finite amount");
            return Err(HandleError::NonFiniteAmount);
        }

        let now_ms = self.clock.now_ms();
        if !validate_timestamp(request.timestamp, now_ms) {
            debug!(
                timestamp = request.timestamp,
                now_ms,
                "transaction outside window, dropping"
            );
            return Ok(RecordOutcome::Dropped);
        }

        if !self.window.record(request.amount, request.timestamp) {
            debug!(
                timestamp = request.timestamp,
                now_ms, "window could not place transaction, dropping"
            );
            return Ok(RecordOutcome::Dropped);
        }

        trace!(amount = request.amount, timestamp = request.timestamp, "recorded");
        Ok(RecordOutcome::Accepted)
    }

    /// Parse a raw JSON body and record it.
    pub fn record_json(&self, body: &[u8]) -> Result<RecordOutcome, HandleError> {
        let request: TransactionRequest = serde_json::from_slice(body)
            .map_err(|e| HandleError::InvalidPayload(e.to_string()))?;
        self.record(&request)
    }

    /// Rounded statistics for the 60 seconds ending now.
    pub fn statistics(&self) -> StatisticsResponse {
        let stats = self.window.snapshot(self.clock.now_ms());
        debug!(count = stats.count, "statistics computed");
        StatisticsResponse::from(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const NOW: i64 = 1_700_000_030_500;

    fn service() -> (TransactionService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(NOW));
        (TransactionService::new(clock.clone()), clock)
    }

    fn tx(amount: f64, timestamp: i64) -> TransactionRequest {
        TransactionRequest { amount, timestamp }
    }

    #[test]
    fn validate_timestamp_bounds() {
        assert!(validate_timestamp(NOW - 1, NOW));
        assert!(validate_timestamp(NOW - MAX_EVENT_AGE_MS, NOW));
        assert!(!validate_timestamp(NOW - MAX_EVENT_AGE_MS - 1, NOW));
        assert!(!validate_timestamp(NOW, NOW));
        assert!(!validate_timestamp(NOW + 1, NOW));
    }

    #[test]
    fn accepted_transactions_show_in_statistics() {
        let (service, _) = service();
        assert_eq!(
            service.record(&tx(10.0, NOW - 5_000)).unwrap(),
            RecordOutcome::Accepted
        );
        assert_eq!(
            service.record(&tx(20.0, NOW - 1_000)).unwrap(),
            RecordOutcome::Accepted
        );

        let stats = service.statistics();
        assert_eq!(stats.sum, 30.0);
        assert_eq!(stats.average, 15.0);
        assert_eq!(stats.max, 20.0);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.count, 2);
    }

    #[test]
    fn future_and_stale_transactions_are_dropped() {
        let (service, _) = service();
        assert_eq!(
            service.record(&tx(1.0, NOW + 1)).unwrap(),
            RecordOutcome::Dropped
        );
        assert_eq!(
            service.record(&tx(1.0, NOW)).unwrap(),
            RecordOutcome::Dropped
        );
        assert_eq!(
            service.record(&tx(1.0, NOW - 61_000)).unwrap(),
            RecordOutcome::Dropped
        );

        assert_eq!(service.statistics().count, 0);
    }

    #[test]
    fn edge_of_window_is_dropped_by_the_ring() {
        // Exactly 60s old passes validation but its second is already
        // behind the ring's horizon.
        let (service, _) = service();
        assert_eq!(
            service.record(&tx(1.0, NOW - MAX_EVENT_AGE_MS)).unwrap(),
            RecordOutcome::Dropped
        );
    }

    #[test]
    fn non_finite_amount_is_an_error() {
        let (service, _) = service();
        let err = service.record(&tx(f64::NAN, NOW - 1)).unwrap_err();
        assert!(matches!(err, HandleError::NonFiniteAmount));
        assert!(service.record(&tx(f64::INFINITY, NOW - 1)).is_err());
    }

    #[test]
    fn statistics_follow_the_clock() {
        let (service, clock) = service();
        service.record(&tx(5.0, NOW - 100)).unwrap();
        assert_eq!(service.statistics().count, 1);

        clock.advance(60_000);
        let stats = service.statistics();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.sum, 0.0);
        assert_eq!(stats.max, 0.0);
        assert_eq!(stats.min, 0.0);
    }

    #[test]
    fn record_json_parses_body() {
        let (service, _) = service();
        let body = format!(r#"{{"amount": 12.3343, "timestamp": {}}}"#, NOW - 2_000);
        assert_eq!(
            service.record_json(body.as_bytes()).unwrap(),
            RecordOutcome::Accepted
        );
        assert_eq!(service.statistics().sum, 12.33);
    }

    #[test]
    fn record_json_rejects_malformed_body() {
        let (service, _) = service();
        let err = service.record_json(br#"{"amount": "abc"}"#).unwrap_err();
        assert!(matches!(err, HandleError::InvalidPayload(_)));
        assert!(err.to_string().starts_with("invalid payload"));
    }
}
