use chrono::{DateTime, Utc};
use parking_lot::Mutex;

struct LimiterState {
    tokens: f64,
    last_refill: DateTime<Utc>,
    window_start: DateTime<Utc>,
    count_in_window: u32,
}

/// Token bucket stacked with a per-minute window ceiling. Both checks and
/// their mutations happen under one lock; a check-then-act race here would
/// let bursts past the configured limits.
pub struct SendRateLimiter {
    refill_per_second: f64,
    burst_capacity: f64,
    per_minute_ceiling: u32,
    state: Mutex<LimiterState>,
}

impl SendRateLimiter {
    pub fn new(refill_per_second: u32, burst_capacity: u32, per_minute_ceiling: u32) -> Self {
        Self::new_at(refill_per_second, burst_capacity, per_minute_ceiling, Utc::now())
    }

    /// Anchors the refill and window clocks at `now`; pair with
    /// `try_acquire_at` to drive the limiter on a synthetic clock.
    pub fn new_at(
        refill_per_second: u32,
        burst_capacity: u32,
        per_minute_ceiling: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            refill_per_second: f64::from(refill_per_second),
            burst_capacity: f64::from(burst_capacity),
            per_minute_ceiling,
            state: Mutex::new(LimiterState {
                tokens: f64::from(burst_capacity),
                last_refill: now,
                window_start: now,
                count_in_window: 0,
            }),
        }
    }

    /// Non-blocking. A false return means "retry later", not failure.
    pub fn try_acquire(&self) -> bool {
        self.try_acquire_at(Utc::now())
    }

    pub fn try_acquire_at(&self, now: DateTime<Utc>) -> bool {
        let mut state = self.state.lock();

        let elapsed_ms = (now - state.last_refill).num_milliseconds();
        if elapsed_ms > 0 {
            state.tokens = (state.tokens + elapsed_ms as f64 / 1000.0 * self.refill_per_second)
                .min(self.burst_capacity);
            state.last_refill = now;
        }

        if (now - state.window_start).num_milliseconds() > 60_000 {
            state.window_start = now;
            state.count_in_window = 0;
        }

        if state.count_in_window >= self.per_minute_ceiling {
            return false;
        }
        if state.tokens < 1.0 {
            return false;
        }

        state.tokens -= 1.0;
        state.count_in_window += 1;
        true
    }
}
