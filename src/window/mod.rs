// src/window/mod.rs
//! Per-second ring buffer holding the trailing 60 seconds of transactions.

mod aggregator;
mod bucket;

pub use aggregator::{second_of, WindowAggregator, WINDOW_SECONDS};
pub use bucket::Bucket;
