// Jump drive recharge tracking.
//
// Two phases: Idle (drive ready) and Recharging (counting down from the last jump).
// The tracker is pure; the timer task in `use_cases::cooldown_timer` drives it.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownPhase {
    Idle,
    Recharging { last_jump_at: DateTime<Utc> },
}

/// Result of evaluating the tracker at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CooldownTick {
    /// Seconds until the drive is ready again (0 when idle).
    pub remaining_secs: f64,
    /// True only on the tick where Recharging turned into Idle.
    pub completed: bool,
}

#[derive(Debug, Clone)]
pub struct CooldownTracker {
    window: Duration,
    phase: CooldownPhase,
    // Last timestamp fed in, so repeated refreshes do not restart a finished countdown.
    observed: Option<DateTime<Utc>>,
}

impl CooldownTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            phase: CooldownPhase::Idle,
            observed: None,
        }
    }

    pub fn phase(&self) -> CooldownPhase {
        self.phase
    }

    pub fn is_recharging(&self) -> bool {
        matches!(self.phase, CooldownPhase::Recharging { .. })
    }

    /// Feeds the latest known last-jump timestamp.
    ///
    /// A new timestamp restarts the countdown; `None` drops back to Idle without
    /// signalling completion. Re-observing the same timestamp is a no-op.
    pub fn observe(&mut self, last_jump_at: Option<DateTime<Utc>>) {
        if self.observed == last_jump_at {
            return;
        }
        self.observed = last_jump_at;
        self.phase = match last_jump_at {
            Some(ts) => CooldownPhase::Recharging { last_jump_at: ts },
            None => CooldownPhase::Idle,
        };
    }

    /// Remaining recharge time at `now`, without advancing the phase.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> f64 {
        match self.phase {
            CooldownPhase::Idle => 0.0,
            CooldownPhase::Recharging { last_jump_at } => {
                remaining_secs(self.window, last_jump_at, now)
            }
        }
    }

    /// Recomputes the remaining time and moves to Idle once it reaches zero.
    pub fn tick(&mut self, now: DateTime<Utc>) -> CooldownTick {
        let remaining = self.remaining_at(now);
        let completed = self.is_recharging() && remaining <= 0.0;
        if completed {
            self.phase = CooldownPhase::Idle;
        }

        CooldownTick {
            remaining_secs: remaining,
            completed,
        }
    }
}

fn remaining_secs(window: Duration, last_jump_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    // Signed: a jump stamped ahead of the local clock lengthens the wait.
    let delta = now - last_jump_at;
    let elapsed = delta
        .num_microseconds()
        .map(|micros| micros as f64 / 1_000_000.0)
        .unwrap_or_else(|| delta.num_milliseconds() as f64 / 1_000.0);
    (window.as_secs_f64() - elapsed).max(0.0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampParseError(pub String);

impl fmt::Display for TimestampParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid jump timestamp {:?}", self.0)
    }
}

impl std::error::Error for TimestampParseError {}

/// Parses an ISO-8601 last-jump timestamp.
///
/// Accepts RFC 3339 with any offset and fractional seconds; timestamps without an
/// offset are taken as UTC.
pub fn parse_jump_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampParseError> {
    let trimmed = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| TimestampParseError(raw.to_string()))
}
