// src/window/bucket.rs
//! Per-second accumulator.

/// Aggregate of every transaction whose timestamp truncates to one second.
///
/// Extremes are `None` until the first amount lands, so an empty second can
/// never be confused with a second that saw an extreme amount.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bucket {
    pub sum: f64,
    pub count: u64,
    pub max: Option<f64>,
    pub min: Option<f64>,
}

impl Bucket {
    pub fn accumulate(&mut self, amount: f64) {
        self.sum += amount;
        self.count += 1;
        self.max = Some(self.max.map(|max| max.max(amount)).unwrap_or(amount));
        self.min = Some(self.min.map(|min| min.min(amount)).unwrap_or(amount));
    }

    /// Fold another bucket into this one.
    pub fn merge(&mut self, other: &Bucket) {
        if other.is_empty() {
            return;
        }
        self.sum += other.sum;
        self.count += other.count;
        self.max = pick(self.max, other.max, f64::max);
        self.min = pick(self.min, other.min, f64::min);
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn clear(&mut self) {
        *self = Bucket::default();
    }
}

fn pick(a: Option<f64>, b: Option<f64>, f: fn(f64, f64) -> f64) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (a, b) => a.or(b),
    }
}
