//! Clock-injected timers
//!
//! Hosts pass their clock (milliseconds) into every call; nothing here
//! reads wall time, which keeps frame loops and tests deterministic.

/// Trailing-edge debounce
///
/// Each `schedule` pushes the deadline out; `poll` fires once after the
/// quiet period has elapsed with no further scheduling. A deadline is never
/// pulled earlier, so a longer explicit delay survives later events.
#[derive(Debug, Clone)]
pub struct Debounce {
    quiet_ms: f64,
    deadline_ms: Option<f64>,
}

impl Debounce {
    pub fn new(quiet_ms: f64) -> Self {
        Self {
            quiet_ms: quiet_ms.max(0.0),
            deadline_ms: None,
        }
    }

    /// Restart the quiet period from `now_ms`
    pub fn schedule(&mut self, now_ms: f64) {
        self.schedule_after(now_ms, self.quiet_ms);
    }

    /// Restart with an explicit delay, keeping the later of the two deadlines
    pub fn schedule_after(&mut self, now_ms: f64, delay_ms: f64) {
        let candidate = now_ms + delay_ms.max(0.0);
        self.deadline_ms = Some(match self.deadline_ms {
            Some(existing) if existing > candidate => existing,
            _ => candidate,
        });
    }

    /// Returns true exactly once when the deadline has passed
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline_ms.is_some()
    }

    pub fn quiet_ms(&self) -> f64 {
        self.quiet_ms
    }
}

/// Fixed-cadence interval
///
/// `poll` reports how many whole periods elapsed since the last poll, so a
/// late frame still accounts for every missed sample.
#[derive(Debug, Clone)]
pub struct Interval {
    period_ms: f64,
    next_ms: Option<f64>,
}

impl Interval {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            next_ms: None,
        }
    }

    /// Start (or restart) the interval; the first tick is one period out
    pub fn start(&mut self, now_ms: f64) {
        self.next_ms = Some(now_ms + self.period_ms);
    }

    pub fn stop(&mut self) {
        self.next_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_ms.is_some()
    }

    /// Number of periods that elapsed up to `now_ms`
    pub fn poll(&mut self, now_ms: f64) -> u32 {
        let Some(next) = self.next_ms else {
            return 0;
        };
        if now_ms < next {
            return 0;
        }
        let missed = ((now_ms - next) / self.period_ms).floor() as u32 + 1;
        self.next_ms = Some(next + missed as f64 * self.period_ms);
        missed
    }
}
