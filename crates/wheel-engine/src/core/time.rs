/// Monotonic frame clock.
/// Hosts hand us `requestAnimationFrame` / `performance.now()` timestamps in
/// milliseconds. They are normally increasing, but a timer callback and a frame
/// callback can interleave with slightly older readings; the clock never lets
/// time run backwards so redraws within a spin stay ordered.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Latest timestamp observed, in milliseconds.
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a host timestamp. Returns the monotonic time to use for this frame.
    /// Non-finite timestamps are ignored.
    pub fn advance(&mut self, now_ms: f64) -> f64 {
        let now = self.peek(now_ms);
        self.last_ms = Some(now);
        now
    }

    /// What [`advance`](Self::advance) would return, without recording it.
    pub fn peek(&self, now_ms: f64) -> f64 {
        match (self.last_ms, now_ms.is_finite()) {
            (Some(last), true) => now_ms.max(last),
            (Some(last), false) => last,
            (None, true) => now_ms,
            (None, false) => 0.0,
        }
    }

    /// Forget the last observation (e.g. after teardown).
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
