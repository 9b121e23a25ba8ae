//! Outcome controller.
//!
//! Picks the winning section *before* the wheel moves, asks the driver for a
//! rotation that lands it under the pointer, and reports that same section
//! when the spin ends. The label is never read back from the final angle.
//!
//! A second path guards against a stalled animation: once a spin is older
//! than its duration plus a grace period, [`OutcomeController::poll_fallback`]
//! settles it and reports the predetermined section anyway.

use serde::{Deserialize, Serialize};

use super::rng::{FastRng, RandomSource};
use crate::animation::{Easing, Frame, RequestId, SpinDriver, SpinPlan, TurnRange};
use crate::api::error::WheelError;
use crate::core::section::SectionList;

/// Default delay past the spin duration before the fallback may fire.
pub const DEFAULT_FALLBACK_GRACE_MS: f64 = 500.0;

/// What the fallback timer does when a spin stalls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Settle the wheel on the predetermined section and report it.
    #[default]
    ReusePredetermined,
    /// Never report from the fallback; a stalled spin stays pending.
    Disabled,
}

/// Spin timing and shape, resolved from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinSettings {
    pub duration_ms: f64,
    pub turns: TurnRange,
    pub easing: Easing,
    pub fallback_grace_ms: f64,
    pub fallback: FallbackPolicy,
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self {
            duration_ms: 3000.0,
            turns: TurnRange::default(),
            easing: Easing::CubicOut,
            fallback_grace_ms: DEFAULT_FALLBACK_GRACE_MS,
            fallback: FallbackPolicy::ReusePredetermined,
        }
    }
}

/// Which path reported an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeSource {
    Animation,
    Fallback,
}

/// The result of one completed spin.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinOutcome {
    pub request: RequestId,
    pub index: usize,
    pub label: String,
    /// Rotation the wheel rests at. The pointer is over `index`.
    pub rotation: f64,
    pub source: OutcomeSource,
}

/// What to do with a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameUpdate {
    /// Not the current spin. Draw nothing, schedule nothing.
    Stale,
    /// Draw at this rotation and request another frame.
    Rotating(f64),
    /// Draw at the outcome's rotation and stop.
    Finished(SpinOutcome),
}

#[derive(Debug, Clone)]
struct PendingOutcome {
    request: RequestId,
    index: usize,
    label: String,
    deadline_ms: f64,
}

/// Owns the driver and the random source; turns "spin" into exactly one
/// outcome per accepted spin.
#[derive(Debug, Clone)]
pub struct OutcomeController<R: RandomSource = FastRng> {
    driver: SpinDriver,
    rng: R,
    settings: SpinSettings,
    pending: Option<PendingOutcome>,
}

impl OutcomeController<FastRng> {
    /// Controller with an entropy-seeded generator.
    pub fn new(settings: SpinSettings) -> Self {
        Self::with_source(settings, FastRng::new())
    }
}

impl<R: RandomSource> OutcomeController<R> {
    pub fn with_source(settings: SpinSettings, rng: R) -> Self {
        Self {
            driver: SpinDriver::new(0.0),
            rng,
            settings,
            pending: None,
        }
    }

    pub fn settings(&self) -> &SpinSettings {
        &self.settings
    }

    /// Takes effect from the next spin.
    pub fn set_settings(&mut self, settings: SpinSettings) {
        self.settings = settings;
    }

    pub fn set_duration_ms(&mut self, duration_ms: f64) {
        self.settings.duration_ms = duration_ms;
    }

    pub fn source_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn is_spinning(&self) -> bool {
        self.driver.is_spinning()
    }

    /// Rotation to draw right now.
    pub fn rotation(&self) -> f64 {
        self.driver.rotation()
    }

    /// The spin whose outcome is still owed, if any.
    pub fn pending_request(&self) -> Option<RequestId> {
        self.pending.as_ref().map(|p| p.request)
    }

    /// Start a spin unless one is already running (`Ok(None)` then).
    pub fn spin(&mut self, sections: &SectionList, now_ms: f64) -> Result<Option<RequestId>, WheelError> {
        if self.is_spinning() {
            log::debug!("spin ignored: already spinning");
            return Ok(None);
        }
        self.begin(sections, now_ms).map(Some)
    }

    /// Start a spin, superseding any spin in progress. The superseded spin
    /// never reports.
    pub fn respin(&mut self, sections: &SectionList, now_ms: f64) -> Result<RequestId, WheelError> {
        self.begin(sections, now_ms)
    }

    fn begin(&mut self, sections: &SectionList, now_ms: f64) -> Result<RequestId, WheelError> {
        let count = sections.len();
        let result = self.draw(count).and_then(|(index, turns)| {
            let plan = SpinPlan {
                chosen_index: index,
                section_count: count,
                turns,
                duration_ms: self.settings.duration_ms,
                easing: self.settings.easing,
            };
            let id = self.driver.start(plan, now_ms)?;
            Ok((id, index))
        });

        let (request, index) = match result {
            Ok(started) => started,
            Err(err) => {
                log::warn!("spin aborted: {err}");
                self.abort();
                return Err(err);
            }
        };

        let label = sections.label(index).unwrap_or_default().to_string();
        let deadline_ms = self
            .driver
            .active_request()
            .map(|r| r.end_ms() + self.settings.fallback_grace_ms.max(0.0))
            .unwrap_or(now_ms);
        self.pending = Some(PendingOutcome { request, index, label, deadline_ms });
        Ok(request)
    }

    fn draw(&mut self, count: usize) -> Result<(usize, u32), WheelError> {
        self.settings.turns.validate()?;
        let index = self.rng.pick(count)?;
        if index >= count {
            return Err(WheelError::RandomSource(format!(
                "picked {index} for {count} sections"
            )));
        }
        let turns = self.rng.pick_in(self.settings.turns.min..=self.settings.turns.max)?;
        Ok((index, turns))
    }

    /// Handle a frame for spin `token` at host time `now_ms`.
    pub fn on_frame(&mut self, token: RequestId, now_ms: f64) -> FrameUpdate {
        match self.driver.on_frame(token, now_ms) {
            Frame::Stale => FrameUpdate::Stale,
            Frame::Rotating(rotation) => FrameUpdate::Rotating(rotation),
            Frame::Complete(done) => match self.take_pending(done.request) {
                Some(pending) => FrameUpdate::Finished(SpinOutcome {
                    request: pending.request,
                    index: pending.index,
                    label: pending.label,
                    rotation: done.rotation,
                    source: OutcomeSource::Animation,
                }),
                None => FrameUpdate::Rotating(done.rotation),
            },
        }
    }

    /// When the fallback for `token` may fire, host milliseconds.
    pub fn fallback_deadline(&self, token: RequestId) -> Option<f64> {
        self.pending
            .as_ref()
            .filter(|p| p.request == token)
            .map(|p| p.deadline_ms)
    }

    /// Fallback timer callback. Reports the predetermined outcome if spin
    /// `token` is still owed one and its deadline has passed.
    pub fn poll_fallback(&mut self, token: RequestId, now_ms: f64) -> Option<SpinOutcome> {
        if self.settings.fallback == FallbackPolicy::Disabled {
            return None;
        }
        let deadline = self.fallback_deadline(token)?;
        if now_ms < deadline {
            return None;
        }

        log::warn!("spin {token} stalled; settling from fallback");
        let done = self.driver.force_settle(token)?;
        let pending = self.take_pending(token)?;
        Some(SpinOutcome {
            request: pending.request,
            index: pending.index,
            label: pending.label,
            rotation: done.rotation,
            source: OutcomeSource::Fallback,
        })
    }

    /// Cancel everything. Nothing tied to an earlier spin reports afterwards.
    pub fn teardown(&mut self) {
        self.abort();
        self.driver.teardown();
    }

    fn abort(&mut self) {
        self.driver.cancel();
        self.pending = None;
    }

    fn take_pending(&mut self, token: RequestId) -> Option<PendingOutcome> {
        if self.pending.as_ref().is_some_and(|p| p.request == token) {
            self.pending.take()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::section::Section;
    use crate::geometry::section_index_at_pointer;

    fn yes_no() -> SectionList {
        SectionList::new(vec![
            Section::with_hex("1", "Yes", "#4ade80").unwrap(),
            Section::with_hex("2", "No", "#f87171").unwrap(),
        ])
        .unwrap()
    }

    fn numbered(n: usize) -> SectionList {
        SectionList::new(
            (0..n)
                .map(|i| Section::with_hex(i.to_string(), format!("S{i}"), "#3b82f6").unwrap())
                .collect(),
        )
        .unwrap()
    }

    /// Picks from a fixed script, for pinning the chosen index.
    struct Scripted(Vec<usize>);

    impl RandomSource for Scripted {
        fn pick(&mut self, upper: usize) -> Result<usize, WheelError> {
            if self.0.is_empty() {
                return Err(WheelError::RandomSource("script exhausted".into()));
            }
            Ok(self.0.remove(0) % upper)
        }
    }

    struct Broken;

    impl RandomSource for Broken {
        fn pick(&mut self, _upper: usize) -> Result<usize, WheelError> {
            Err(WheelError::RandomSource("no entropy".into()))
        }
    }

    fn seeded(duration_ms: f64) -> OutcomeController<FastRng> {
        let settings = SpinSettings { duration_ms, ..SpinSettings::default() };
        OutcomeController::with_source(settings, FastRng::with_seed(0x5eed))
    }

    fn run_to_end<R: RandomSource>(
        ctl: &mut OutcomeController<R>,
        token: RequestId,
        start_ms: f64,
        duration_ms: f64,
    ) -> SpinOutcome {
        let mut t = start_ms;
        loop {
            t += 16.0;
            match ctl.on_frame(token, t) {
                FrameUpdate::Finished(outcome) => return outcome,
                FrameUpdate::Rotating(_) => {}
                FrameUpdate::Stale => panic!("current spin reported stale"),
            }
            assert!(t <= start_ms + duration_ms + 32.0, "spin overran its duration");
        }
    }

    #[test]
    fn label_and_pointer_agree_with_chosen_index() {
        let mut ctl = seeded(0.0);
        let mut now = 0.0;
        for n in [2, 3, 6, 36] {
            let sections = numbered(n);
            for _ in 0..2_500 {
                let token = ctl.spin(&sections, now).unwrap().expect("idle controller spins");
                now += 1.0;
                let FrameUpdate::Finished(outcome) = ctl.on_frame(token, now) else {
                    panic!("zero-duration spin should finish on the next frame");
                };
                assert_eq!(outcome.label, sections[outcome.index].label);
                assert_eq!(section_index_at_pointer(outcome.rotation, n), outcome.index);
                assert_eq!(outcome.source, OutcomeSource::Animation);
            }
        }
    }

    #[test]
    fn two_sections_are_uniform() {
        let mut ctl = seeded(0.0);
        let sections = yes_no();
        let mut counts = [0usize; 2];
        let mut now = 0.0;
        for _ in 0..100_000 {
            let token = ctl.respin(&sections, now).unwrap();
            now += 1.0;
            if let FrameUpdate::Finished(outcome) = ctl.on_frame(token, now) {
                counts[outcome.index] += 1;
            }
        }
        assert_eq!(counts[0] + counts[1], 100_000);
        let share = counts[0] as f64 / 100_000.0;
        assert!((share - 0.5).abs() < 0.01, "share of index 0 was {share}");
    }

    #[test]
    fn full_duration_run_lands_on_chosen_index() {
        let mut ctl = OutcomeController::with_source(
            SpinSettings { duration_ms: 4000.0, ..SpinSettings::default() },
            Scripted(vec![1, 3]),
        );
        let sections = yes_no();
        let token = ctl.spin(&sections, 1000.0).unwrap().unwrap();
        let outcome = run_to_end(&mut ctl, token, 1000.0, 4000.0);
        assert_eq!(outcome.index, 1);
        assert_eq!(outcome.label, "No");
        assert!(!ctl.is_spinning());
        assert_eq!(ctl.pending_request(), None);
    }

    #[test]
    fn spin_while_spinning_is_ignored() {
        let mut ctl = seeded(4000.0);
        let sections = yes_no();
        let first = ctl.spin(&sections, 0.0).unwrap();
        assert!(first.is_some());
        assert_eq!(ctl.spin(&sections, 10.0).unwrap(), None);
        assert_eq!(ctl.pending_request(), first);
    }

    #[test]
    fn preempted_spin_never_reports() {
        let mut ctl = OutcomeController::with_source(
            SpinSettings { duration_ms: 1000.0, ..SpinSettings::default() },
            // A picks index 0, B picks index 1.
            Scripted(vec![0, 0, 1, 0]),
        );
        let sections = yes_no();
        let a = ctl.spin(&sections, 0.0).unwrap().unwrap();
        ctl.on_frame(a, 300.0);
        let b = ctl.respin(&sections, 310.0).unwrap();

        let mut outcomes = Vec::new();
        let mut t = 310.0;
        while t < 3000.0 {
            t += 16.0;
            for token in [a, b] {
                if let FrameUpdate::Finished(o) = ctl.on_frame(token, t) {
                    outcomes.push(o);
                }
            }
            outcomes.extend(ctl.poll_fallback(a, t));
            outcomes.extend(ctl.poll_fallback(b, t));
        }

        assert_eq!(outcomes.len(), 1, "exactly one outcome expected");
        assert_eq!(outcomes[0].request, b);
        assert_eq!(outcomes[0].index, 1);
        assert!(outcomes.iter().all(|o| o.request != a));
    }

    #[test]
    fn preemption_does_not_teleport() {
        let mut ctl = seeded(1000.0);
        let sections = numbered(5);
        let a = ctl.spin(&sections, 0.0).unwrap().unwrap();
        let FrameUpdate::Rotating(drawn) = ctl.on_frame(a, 500.0) else { panic!() };
        let b = ctl.respin(&sections, 500.0).unwrap();
        let FrameUpdate::Rotating(first) = ctl.on_frame(b, 500.0) else { panic!() };
        assert_eq!(first, drawn);
    }

    #[test]
    fn fallback_reports_predetermined_index() {
        let mut ctl = OutcomeController::with_source(
            SpinSettings { duration_ms: 3000.0, ..SpinSettings::default() },
            Scripted(vec![1, 0]),
        );
        let sections = yes_no();
        let token = ctl.spin(&sections, 0.0).unwrap().unwrap();
        // A few frames, then the frame loop dies.
        ctl.on_frame(token, 16.0);
        ctl.on_frame(token, 32.0);

        assert_eq!(ctl.fallback_deadline(token), Some(3500.0));
        assert_eq!(ctl.poll_fallback(token, 3499.0), None);

        let outcome = ctl.poll_fallback(token, 3500.0).expect("fallback fires at deadline");
        assert_eq!(outcome.index, 1);
        assert_eq!(outcome.label, "No");
        assert_eq!(outcome.source, OutcomeSource::Fallback);
        assert_eq!(section_index_at_pointer(outcome.rotation, 2), 1);
        assert_eq!(ctl.rotation(), outcome.rotation);

        // Exactly once.
        assert_eq!(ctl.poll_fallback(token, 4000.0), None);
        assert_eq!(ctl.on_frame(token, 4000.0), FrameUpdate::Stale);
    }

    #[test]
    fn fallback_is_silent_after_primary_result() {
        let mut ctl = seeded(1000.0);
        let sections = yes_no();
        let token = ctl.spin(&sections, 0.0).unwrap().unwrap();
        run_to_end(&mut ctl, token, 0.0, 1000.0);
        assert_eq!(ctl.fallback_deadline(token), None);
        assert_eq!(ctl.poll_fallback(token, 10_000.0), None);
    }

    #[test]
    fn disabled_fallback_never_reports() {
        let mut ctl = seeded(1000.0);
        ctl.set_settings(SpinSettings {
            fallback: FallbackPolicy::Disabled,
            ..*ctl.settings()
        });
        let token = ctl.spin(&yes_no(), 0.0).unwrap().unwrap();
        assert_eq!(ctl.poll_fallback(token, 60_000.0), None);
        assert!(ctl.is_spinning());
    }

    #[test]
    fn random_failure_leaves_controller_idle() {
        let mut ctl = OutcomeController::with_source(SpinSettings::default(), Broken);
        let err = ctl.spin(&yes_no(), 0.0).unwrap_err();
        assert!(matches!(err, WheelError::RandomSource(_)));
        assert!(!ctl.is_spinning());
        assert_eq!(ctl.pending_request(), None);
    }

    #[test]
    fn failed_respin_cancels_previous_spin() {
        let mut ctl = OutcomeController::with_source(
            SpinSettings { duration_ms: 1000.0, ..SpinSettings::default() },
            Scripted(vec![0, 0]),
        );
        let sections = yes_no();
        let a = ctl.spin(&sections, 0.0).unwrap().unwrap();
        assert!(ctl.respin(&sections, 100.0).is_err());
        assert!(!ctl.is_spinning());
        assert_eq!(ctl.on_frame(a, 2000.0), FrameUpdate::Stale);
        assert_eq!(ctl.poll_fallback(a, 5000.0), None);
    }

    #[test]
    fn inverted_turn_range_is_rejected() {
        let mut ctl = seeded(1000.0);
        ctl.set_settings(SpinSettings {
            turns: TurnRange { min: 9, max: 2 },
            ..*ctl.settings()
        });
        let err = ctl.spin(&yes_no(), 0.0).unwrap_err();
        assert!(err.is_configuration());
        assert!(!ctl.is_spinning());
    }

    #[test]
    fn teardown_silences_everything() {
        let mut ctl = seeded(1000.0);
        let token = ctl.spin(&yes_no(), 0.0).unwrap().unwrap();
        ctl.teardown();
        assert_eq!(ctl.on_frame(token, 2000.0), FrameUpdate::Stale);
        assert_eq!(ctl.poll_fallback(token, 9000.0), None);
    }
}
