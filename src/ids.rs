use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// 9999-12-31T23:59:59.999Z in milliseconds. Loaded ids past this are not
/// timestamps and do not move the counter.
const LAST_PLAUSIBLE_MS: u64 = 253_402_300_799_999;

/// Hands out millisecond-timestamp ids that never repeat.
///
/// When two ids are requested within the same millisecond the second one is
/// bumped past the first, so ids stay strictly increasing per process.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::SeqCst, Ordering::Relaxed)
            {
                Ok(_) => return candidate.to_string(),
                Err(actual) => prev = actual,
            }
        }
    }

    /// Make sure future ids land above an id loaded from storage.
    /// Non-numeric ids and numbers too large to be timestamps are ignored.
    pub fn observe(&self, id: &str) {
        if let Ok(value @ 0..=LAST_PLAUSIBLE_MS) = id.parse::<u64>() {
            self.last.fetch_max(value, Ordering::SeqCst);
        }
    }
}
