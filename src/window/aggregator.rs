// src/window/aggregator.rs
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

use super::bucket::Bucket;
use crate::stats::Stats;

/// Width of the trailing window in seconds.
pub const WINDOW_SECONDS: i64 = 60;

const SLOTS: usize = WINDOW_SECONDS as usize;

/// Truncate an epoch-millisecond timestamp to its second (floor).
pub fn second_of(timestamp_ms: i64) -> i64 {
    timestamp_ms.div_euclid(1000)
}

/// Ring of per-second buckets. Logical offset `i` is second `anchor + i` and
/// lives in slot `(head + i) % SLOTS`.
#[derive(Debug)]
struct Window {
    anchor: i64,
    head: usize,
    buckets: [Bucket; SLOTS],
}

impl Window {
    fn new(anchor: i64) -> Self {
        Self {
            anchor,
            head: 0,
            buckets: [Bucket::default(); SLOTS],
        }
    }

    fn slot(&self, offset: usize) -> usize {
        (self.head + offset) % SLOTS
    }

    /// Advance the window so `target` is representable, evicting every
    /// second that falls out of the new horizon. Never moves the anchor back.
    fn rotate(&mut self, target: i64) {
        let delta = target - self.anchor;

        if delta >= 2 * WINDOW_SECONDS {
            for bucket in self.buckets.iter_mut() {
                bucket.clear();
            }
            self.head = 0;
            self.anchor = target - (WINDOW_SECONDS - 1);
            debug!(anchor = self.anchor, delta, "window reset");
        } else if delta >= WINDOW_SECONDS {
            // 1..=SLOTS; at SLOTS every bucket is evicted
            let shift = (delta - (WINDOW_SECONDS - 1)) as usize;
            for offset in 0..shift {
                let slot = self.slot(offset);
                self.buckets[slot].clear();
            }
            self.head = self.slot(shift);
            self.anchor += shift as i64;
            trace!(anchor = self.anchor, shift, "window shifted");
        }
    }

    fn bucket_mut(&mut self, second: i64) -> Option<&mut Bucket> {
        let offset = second - self.anchor;
        if !(0..WINDOW_SECONDS).contains(&offset) {
            return None;
        }
        let slot = self.slot(offset as usize);
        Some(&mut self.buckets[slot])
    }

    fn fold(&self) -> Stats {
        let total = self
            .buckets
            .iter()
            .fold(Bucket::default(), |mut total, bucket| {
                total.merge(bucket);
                total
            });
        Stats::from(total)
    }
}

/// Sliding 60-second aggregate over timestamped amounts.
///
/// Anchor and buckets sit behind a single mutex; every call rotates and then
/// reads or writes inside the same critical section, so no caller can compute
/// an index against an anchor another caller is about to move.
#[derive(Debug)]
pub struct WindowAggregator {
    window: Mutex<Window>,
}

impl WindowAggregator {
    /// Create an empty window whose last second is the second of `now_ms`.
    pub fn new(now_ms: i64) -> Self {
        Self {
            window: Mutex::new(Window::new(second_of(now_ms) - (WINDOW_SECONDS - 1))),
        }
    }

    /// Add `amount` to the second of `event_time_ms`.
    ///
    /// Returns `false` when the event precedes the window even after rotating
    /// to it; the event is dropped and nothing changes.
    pub fn record(&self, amount: f64, event_time_ms: i64) -> bool {
        let second = second_of(event_time_ms);
        let mut window = self.lock();
        window.rotate(second);
        let anchor = window.anchor;

        match window.bucket_mut(second) {
            Some(bucket) => {
                bucket.accumulate(amount);
                true
            }
            None => {
                trace!(second, anchor, "event precedes window");
                false
            }
        }
    }

    /// Aggregate of the 60 seconds ending at the second of `now_ms`.
    pub fn snapshot(&self, now_ms: i64) -> Stats {
        let mut window = self.lock();
        window.rotate(second_of(now_ms));
        window.fold()
    }

    // Mutations are whole-field writes; a poisoned ring is still consistent.
    fn lock(&self) -> MutexGuard<'_, Window> {
        self.window.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
