//! Linear fade between two normalized brightness levels.
//!
//! Fades are evaluated against a caller-supplied millisecond clock, so the
//! controller never reads time on its own.

/// A running or finished fade from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    from: f64,
    to: f64,
    start_ms: u64,
    duration_ms: f64,
}

impl Fade {
    /// Start a fade at `start_ms`. A duration of zero (or less) is immediate.
    pub fn new(from: f64, to: f64, start_ms: u64, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: duration_ms.max(0.0),
        }
    }

    /// A fade that has already settled at `level`.
    pub fn settled(level: f64) -> Self {
        Self::new(level, level, 0, 0.0)
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    fn progress(&self, now_ms: u64) -> f64 {
        if self.duration_ms == 0.0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms) as f64;
        (elapsed / self.duration_ms).min(1.0)
    }

    /// Level at `now_ms`; exactly `to` once `start + duration` is reached.
    pub fn level_at(&self, now_ms: u64) -> f64 {
        let t = self.progress(now_ms);
        if t >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * t
    }

    pub fn is_done(&self, now_ms: u64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}
