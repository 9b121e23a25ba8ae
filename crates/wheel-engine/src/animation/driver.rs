// animation/driver.rs
//
// Spin driver: owns the spin lifecycle.
//
//   Idle ──start──▶ Spinning ──progress == 1 (settle + emit)──▶ Idle
//                      │ ▲
//                      └─┘ start (preempts, new RequestId)
//
// Usage:
//   let mut driver = SpinDriver::new(0.0);
//   let id = driver.start(plan, now)?;
//   match driver.on_frame(id, now) { Frame::Rotating(r) => draw(r), ... }

use super::request::{RequestId, SpinPlan, SpinRequest};
use crate::api::error::WheelError;
use crate::core::time::FrameClock;

/// Where the driver is in a spin.
///
/// Settling is instantaneous and has no state of its own: the call that
/// reaches the target snaps to it, emits the completion and returns to
/// `Idle` before it returns.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverState {
    /// At rest. No callback is expected.
    Idle { rotation: f64 },
    /// Animating `request`. `rotation` is the last rotation handed out for drawing.
    Spinning { request: SpinRequest, rotation: f64 },
}

/// Emitted exactly once when a spin finishes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinComplete {
    pub request: RequestId,
    pub chosen_index: usize,
    /// Final rotation, exactly the request's target.
    pub rotation: f64,
}

/// What a frame callback should do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frame {
    /// The token belongs to a superseded or cancelled spin. Do nothing.
    Stale,
    /// Draw at this rotation and schedule another frame.
    Rotating(f64),
    /// Draw at the final rotation; no more frames for this request.
    Complete(SpinComplete),
}

/// Drives one spin at a time from host frame timestamps.
#[derive(Debug, Clone)]
pub struct SpinDriver {
    state: DriverState,
    next_id: u64,
    clock: FrameClock,
}

impl SpinDriver {
    pub fn new(rotation: f64) -> Self {
        Self {
            state: DriverState::Idle { rotation: if rotation.is_finite() { rotation } else { 0.0 } },
            next_id: 1,
            clock: FrameClock::new(),
        }
    }

    pub fn state(&self) -> &DriverState {
        &self.state
    }

    pub fn is_spinning(&self) -> bool {
        !matches!(self.state, DriverState::Idle { .. })
    }

    /// The rotation last drawn (or to draw when idle).
    pub fn rotation(&self) -> f64 {
        match &self.state {
            DriverState::Idle { rotation } => *rotation,
            DriverState::Spinning { rotation, .. } => *rotation,
        }
    }

    /// The spin in progress, if any.
    pub fn active_request(&self) -> Option<&SpinRequest> {
        match &self.state {
            DriverState::Idle { .. } => None,
            DriverState::Spinning { request, .. } => Some(request),
        }
    }

    /// Whether `token` is the spin in progress.
    pub fn is_current(&self, token: RequestId) -> bool {
        self.active_request().is_some_and(|r| r.id == token)
    }

    /// Start a spin from the last drawn rotation.
    ///
    /// If a spin is already running it is superseded: its id stops matching,
    /// so its pending frames and completion are dropped. On error the driver
    /// is left as it was.
    pub fn start(&mut self, plan: SpinPlan, now_ms: f64) -> Result<RequestId, WheelError> {
        let id = RequestId(self.next_id);
        let from = self.rotation();
        let request = SpinRequest::from_plan(id, plan, from, self.clock.peek(now_ms))?;
        self.clock.advance(now_ms);
        self.next_id += 1;

        if let Some(previous) = self.active_request() {
            log::debug!("spin {} superseded by {id} at rotation {from:.4}", previous.id);
        }
        log::debug!(
            "spin {id} started: index {} of {}, {from:.4} -> {:.4} over {}ms",
            request.chosen_index,
            request.section_count,
            request.target_rotation,
            request.duration_ms
        );

        self.state = DriverState::Spinning { request, rotation: from };
        Ok(id)
    }

    /// Advance the spin identified by `token` to `now_ms`.
    pub fn on_frame(&mut self, token: RequestId, now_ms: f64) -> Frame {
        if !self.is_current(token) {
            log::warn!("ignoring frame for stale spin {token}");
            return Frame::Stale;
        }
        let now = self.clock.advance(now_ms);

        let DriverState::Spinning { request, rotation } = &mut self.state else {
            return Frame::Stale;
        };
        if request.progress(now) < 1.0 {
            *rotation = request.rotation_at(now);
            return Frame::Rotating(*rotation);
        }
        match self.settle() {
            Some(done) => Frame::Complete(done),
            None => Frame::Stale,
        }
    }

    /// Finish the spin identified by `token` now, snapping to its target.
    /// Used when frames stopped arriving. `None` if the token is stale.
    pub fn force_settle(&mut self, token: RequestId) -> Option<SpinComplete> {
        if !self.is_current(token) {
            return None;
        }
        self.settle()
    }

    /// Drop the spin in progress, keeping the last drawn rotation.
    /// Nothing tied to the cancelled request fires afterwards.
    pub fn cancel(&mut self) -> Option<RequestId> {
        let rotation = self.rotation();
        let cancelled = self.active_request().map(|r| r.id);
        if let Some(id) = cancelled {
            log::debug!("spin {id} cancelled at rotation {rotation:.4}");
        }
        self.state = DriverState::Idle { rotation };
        cancelled
    }

    /// Cancel and forget frame history, for when the host is torn down.
    pub fn teardown(&mut self) {
        self.cancel();
        self.clock.reset();
    }

    // Spinning -> Idle at the exact target.
    fn settle(&mut self) -> Option<SpinComplete> {
        let DriverState::Spinning { request, .. } = &self.state else {
            return None;
        };
        let done = SpinComplete {
            request: request.id,
            chosen_index: request.chosen_index,
            rotation: request.target_rotation,
        };
        log::debug!("spin {} settled at {:.4}", done.request, done.rotation);
        self.state = DriverState::Idle { rotation: done.rotation };
        Some(done)
    }
}

impl Default for SpinDriver {
    fn default() -> Self {
        Self::new(0.0)
    }
}
