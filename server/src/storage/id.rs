use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Issues record ids for one repository instance.
///
/// Ids are UNIX time in microseconds, bumped so each call returns a value
/// strictly greater than the previous one. They stay well below 2^53, so
/// JavaScript clients read them without losing precision.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> i64 {
        let now = Utc::now().timestamp_micros();
        let mut previous = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(previous + 1);
            match self.last.compare_exchange_weak(
                previous,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => previous = actual,
            }
        }
    }

    /// Next id for which `taken` is false.
    pub fn next_unused(&self, taken: impl Fn(i64) -> bool) -> i64 {
        loop {
            let id = self.next_id();
            if !taken(id) {
                return id;
            }
        }
    }
}
