// src/lib.rs
pub mod cli;
pub mod clock;
mod handler;
pub mod native;
mod stats;
pub mod window;

// Re-export tracing for use in other modules
pub use tracing;

pub use clock::{Clock, ManualClock, SystemClock};
pub use handler::{
    validate_timestamp, HandleError, RecordOutcome, TransactionRequest, TransactionService,
    MAX_EVENT_AGE_MS,
};
pub use native::build_router;
pub use stats::{round_cents, StatisticsResponse, Stats};
pub use window::{WindowAggregator, WINDOW_SECONDS};
