use chrono::{DateTime, Utc};

use crate::domain::ports::Clock;

// Wall clock backed by the host time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
