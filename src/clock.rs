//! Time source for node timestamps.

use crate::types::Timestamp;
use chrono::{Duration, Utc};
use parking_lot::Mutex;

/// Source of "now" for every timestamp the driver stamps
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Clock that only moves when told to. Used to observe timestamp propagation.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    pub fn set(&self, time: Timestamp) {
        *self.current.lock() = time;
    }

    pub fn advance(&self, by: Duration) -> Timestamp {
        let mut current = self.current.lock();
        *current += by;
        *current
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.current.lock()
    }
}
