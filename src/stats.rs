//! Window statistics and their presentation form.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::window::Bucket;

/// Raw fold of the live window. Values are unrounded.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stats {
    pub sum: f64,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub count: u64,
}

impl From<Bucket> for Stats {
    fn from(total: Bucket) -> Self {
        if total.is_empty() {
            return Stats::default();
        }
        Stats {
            sum: total.sum,
            average: total.sum / total.count as f64,
            max: total.max.unwrap_or(0.0),
            min: total.min.unwrap_or(0.0),
            count: total.count,
        }
    }
}

/// Response body for `GET /analytics/statistics`.
///
/// Floats are rounded to two decimals (half-even) at this boundary only; the
/// window always accumulates full precision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub sum: f64,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub count: u64,
}

impl From<Stats> for StatisticsResponse {
    fn from(stats: Stats) -> Self {
        Self {
            sum: round_cents(stats.sum),
            average: round_cents(stats.average),
            max: round_cents(stats.max),
            min: round_cents(stats.min),
            count: stats.count,
        }
    }
}

/// Round to two decimal places, ties to even, on the exact binary value of
/// `value` (so `0.015`, stored as 0.01499.., rounds down).
pub fn round_cents(value: f64) -> f64 {
    let rounded = Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(value);
    // Avoid "-0.0" in payloads.
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
