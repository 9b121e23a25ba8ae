//! Platform-independent wheel: app hooks, outcome controller, renderer and
//! host state wired together. The web runner only adds timers and a canvas.

use super::app::{validate_duration, WheelApp, WheelConfig};
use super::context::WheelContext;
use super::error::WheelError;
use super::types::WheelEvent;
use crate::animation::RequestId;
use crate::core::section::SectionList;
use crate::host::store::KeyValueStore;
use crate::outcome::{FastRng, FrameUpdate, OutcomeController, SpinOutcome};
use crate::renderer::{DrawStatus, Surface, Viewport, WheelRenderer};
#[cfg(feature = "vectors")]
use crate::renderer::VectorSurface;

/// What the frame loop should do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStep {
    /// Request another frame with the same token.
    Continue,
    /// The spin finished; stop the loop and cancel its fallback timer.
    Done,
    /// The token is dead; stop this loop.
    Stale,
}

pub struct Wheel<A: WheelApp> {
    app: A,
    ctx: WheelContext,
    controller: OutcomeController<FastRng>,
    renderer: WheelRenderer,
    config: WheelConfig,
}

impl<A: WheelApp> Wheel<A> {
    /// Validate the app's configuration, restore stored history and run the
    /// app's `init`.
    pub fn new(mut app: A, store: Box<dyn KeyValueStore>) -> Result<Self, WheelError> {
        let config = app.config();
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => FastRng::with_seed(seed),
            None => FastRng::new(),
        };
        let controller = OutcomeController::with_source(config.spin_settings(), rng);

        let mut ctx = WheelContext::new(&config, SectionList::yes_no(), store);
        ctx.session.load(&*ctx.store);
        app.init(&mut ctx);

        Ok(Self {
            app,
            ctx,
            controller,
            renderer: WheelRenderer::default(),
            config,
        })
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    /// The app and its context, for app-specific operations. Section
    /// changes through the context are refused while a spin is in flight.
    pub fn parts_mut(&mut self) -> (&mut A, &mut WheelContext) {
        (&mut self.app, &mut self.ctx)
    }

    pub fn context(&self) -> &WheelContext {
        &self.ctx
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn renderer_mut(&mut self) -> &mut WheelRenderer {
        &mut self.renderer
    }

    /// Size the wheel was last laid out for.
    pub fn viewport(&self) -> Viewport {
        self.renderer.viewport()
    }

    pub fn is_spinning(&self) -> bool {
        self.controller.is_spinning()
    }

    pub fn rotation(&self) -> f64 {
        self.controller.rotation()
    }

    pub fn sections(&self) -> &SectionList {
        self.ctx.sections()
    }

    // ---- Spin lifecycle ----

    /// Start a spin if idle. `Ok(None)` if one is already running.
    pub fn spin(&mut self, now_ms: f64) -> Result<Option<RequestId>, WheelError> {
        let started = self.controller.spin(self.ctx.sections(), now_ms)?;
        if started.is_some() {
            self.on_started();
        }
        Ok(started)
    }

    /// Start a spin, superseding any spin in progress.
    pub fn respin(&mut self, now_ms: f64) -> Result<RequestId, WheelError> {
        let started = self.controller.respin(self.ctx.sections(), now_ms)?;
        self.on_started();
        Ok(started)
    }

    fn on_started(&mut self) {
        self.ctx.lock_sections(true);
        self.ctx.session.begin_spin();
        self.app.on_spin_start(&mut self.ctx);
    }

    /// Frame callback for spin `token`: advance, draw, and report completion.
    pub fn on_frame(&mut self, surface: &mut dyn Surface, token: RequestId, now_ms: f64) -> FrameStep {
        match self.controller.on_frame(token, now_ms) {
            FrameUpdate::Stale => FrameStep::Stale,
            FrameUpdate::Rotating(rotation) => {
                self.renderer.draw(surface, self.ctx.sections(), rotation);
                FrameStep::Continue
            }
            FrameUpdate::Finished(outcome) => {
                self.renderer.draw(surface, self.ctx.sections(), outcome.rotation);
                self.finish(outcome);
                FrameStep::Done
            }
        }
    }

    /// When the fallback for `token` is due, host milliseconds.
    pub fn fallback_deadline(&self, token: RequestId) -> Option<f64> {
        self.controller.fallback_deadline(token)
    }

    /// Fallback timer callback. Returns whether it settled the spin.
    pub fn poll_fallback(&mut self, surface: &mut dyn Surface, token: RequestId, now_ms: f64) -> bool {
        let Some(outcome) = self.controller.poll_fallback(token, now_ms) else {
            return false;
        };
        self.ctx.emit_event(WheelEvent::Stalled { request: token });
        self.renderer.draw(surface, self.ctx.sections(), outcome.rotation);
        self.finish(outcome);
        true
    }

    fn finish(&mut self, outcome: SpinOutcome) {
        self.ctx.lock_sections(false);
        log::info!(
            "spin {} landed on \"{}\" (index {}, {:?})",
            outcome.request,
            outcome.label,
            outcome.index,
            outcome.source
        );
        self.ctx.emit_event(WheelEvent::Outcome {
            label: outcome.label.clone(),
            index: outcome.index,
        });
        self.app.on_outcome(&mut self.ctx, &outcome);
    }

    /// Cancel any spin. No frame or fallback tied to it acts afterwards.
    pub fn teardown(&mut self) {
        self.controller.teardown();
        self.ctx.lock_sections(false);
    }

    // ---- Drawing ----

    /// Container resized: resize the surface and redraw at the current
    /// rotation. The spin, if any, is untouched.
    pub fn resize(
        &mut self,
        surface: &mut dyn Surface,
        container_width: f32,
        container_height: f32,
        dpr: f32,
    ) -> DrawStatus {
        self.renderer
            .resize(surface, self.ctx.sections(), container_width, container_height, dpr)
    }

    /// Draw at rest (or at the last drawn rotation mid-spin).
    pub fn redraw(&mut self, surface: &mut dyn Surface) -> DrawStatus {
        if self.is_spinning() {
            self.renderer.redraw(surface, self.ctx.sections())
        } else {
            let rotation = self.rotation();
            self.renderer.draw(surface, self.ctx.sections(), rotation)
        }
    }

    /// Tessellate the wheel as last laid out, at the current rotation, for
    /// hosts that draw triangles instead of using a canvas.
    #[cfg(feature = "vectors")]
    pub fn tessellate(&mut self, surface: &mut VectorSurface) -> DrawStatus {
        let px = self.viewport().pixel_size();
        surface.resize(px, px);
        self.redraw(surface)
    }

    // ---- Configuration ----

    /// Replace the sections. Refused mid-spin so the drawn wheel always
    /// matches the predetermined outcome.
    pub fn set_sections(&mut self, sections: SectionList) -> Result<(), WheelError> {
        self.ctx.set_sections(sections)
    }

    pub fn set_sections_json(&mut self, json: &str) -> Result<(), WheelError> {
        self.set_sections(SectionList::from_json(json)?)
    }

    /// Apply a JSON object of [`WheelConfig`] overrides. Refused mid-spin.
    ///
    /// History settings are fixed once the wheel is built; a seed reseeds
    /// the outcome RNG.
    pub fn configure_json(&mut self, json: &str) -> Result<(), WheelError> {
        let config = self.config.with_overrides(json)?;
        self.configure(config)
    }

    pub fn configure(&mut self, config: WheelConfig) -> Result<(), WheelError> {
        if self.is_spinning() {
            return Err(WheelError::SpinInProgress);
        }
        config.validate()?;
        if config.history_capacity != self.config.history_capacity
            || config.history_key != self.config.history_key
        {
            return Err(WheelError::InvalidConfig(
                "history settings cannot change after the wheel is built".into(),
            ));
        }
        self.controller.set_settings(config.spin_settings());
        if let Some(seed) = config.seed {
            self.controller.source_mut().reseed(seed);
        }
        self.ctx.sound_enabled = config.sound_enabled;
        self.ctx.confetti_enabled = config.confetti_enabled;
        log::debug!("wheel reconfigured: {config:?}");
        self.config = config;
        Ok(())
    }

    /// New spin duration, from the next spin on.
    pub fn set_duration_secs(&mut self, secs: f64) -> Result<(), WheelError> {
        validate_duration(secs)?;
        self.config.spin_duration_secs = secs;
        self.controller.set_duration_ms(secs * 1000.0);
        Ok(())
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.config.sound_enabled = enabled;
        self.ctx.sound_enabled = enabled;
    }

    pub fn set_confetti_enabled(&mut self, enabled: bool) {
        self.config.confetti_enabled = enabled;
        self.ctx.confetti_enabled = enabled;
    }

    // ---- Session ----

    pub fn set_question(&mut self, question: &str) {
        self.ctx.session.set_question(question);
    }

    /// Clear history and tallies, including the stored history.
    pub fn reset(&mut self) {
        let WheelContext { session, store, .. } = &mut self.ctx;
        session.reset(&mut **store);
    }

    pub fn adjust_tally(&mut self, label: &str, delta: i32) -> u32 {
        self.ctx.session.adjust_tally(label, delta)
    }

    /// The answer to display: only when at rest.
    pub fn winner(&self) -> Option<&str> {
        if self.is_spinning() {
            None
        } else {
            self.ctx.session.winner()
        }
    }

    pub fn history_json(&self) -> Result<String, WheelError> {
        Ok(self.ctx.session.history().to_json()?)
    }

    pub fn tally_json(&self) -> Result<String, WheelError> {
        Ok(serde_json::to_string(self.ctx.session.tally())?)
    }

    pub fn drain_events(&mut self) -> Vec<WheelEvent> {
        self.ctx.drain_events()
    }

    pub fn drain_events_json(&mut self) -> Result<String, WheelError> {
        let events = self.drain_events();
        Ok(serde_json::to_string(&events)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::SoundEvent;
    use crate::geometry::section_index_at_pointer;
    use crate::host::store::{MemoryStore, HISTORY_KEY};
    use crate::renderer::RecordingSurface;

    struct YesNo;

    impl WheelApp for YesNo {
        fn config(&self) -> WheelConfig {
            WheelConfig {
                history_key: Some(HISTORY_KEY.into()),
                seed: Some(1234),
                ..WheelConfig::default()
            }
        }

        fn init(&mut self, ctx: &mut WheelContext) {
            ctx.session = ctx.session.clone().with_tally_labels(["Yes", "No"]);
        }
    }

    fn wheel() -> (Wheel<YesNo>, RecordingSurface) {
        let mut wheel = Wheel::new(YesNo, Box::new(MemoryStore::new())).unwrap();
        let mut surface = RecordingSurface::new(0, 0);
        wheel.resize(&mut surface, 400.0, 400.0, 1.0);
        (wheel, surface)
    }

    fn run(wheel: &mut Wheel<YesNo>, surface: &mut RecordingSurface, start: f64) -> f64 {
        let token = wheel.spin(start).unwrap().expect("idle wheel spins");
        let mut t = start;
        loop {
            t += 16.0;
            match wheel.on_frame(surface, token, t) {
                FrameStep::Continue => {}
                FrameStep::Done => return t,
                FrameStep::Stale => panic!("live token reported stale"),
            }
        }
    }

    #[test]
    fn spin_reports_once_and_records() {
        let (mut wheel, mut surface) = wheel();
        wheel.set_question("Go outside?");
        let end = run(&mut wheel, &mut surface, 0.0);
        assert!(end <= 3016.0);

        let events = wheel.drain_events();
        let outcome = events
            .iter()
            .find_map(|e| match e {
                WheelEvent::Outcome { label, index } => Some((label.clone(), *index)),
                _ => None,
            })
            .expect("outcome event");
        assert_eq!(wheel.sections()[outcome.1].label, outcome.0);
        assert_eq!(section_index_at_pointer(wheel.rotation(), 2), outcome.1);
        assert!(events.contains(&WheelEvent::Sound { sound: SoundEvent::Win }));
        assert_eq!(wheel.winner(), Some(outcome.0.as_str()));

        let history = wheel.context().session.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().map(|e| e.question.as_str()), Some("Go outside?"));
    }

    #[test]
    fn resize_mid_spin_changes_nothing() {
        let (mut reference, mut ref_surface) = wheel();
        let (mut resized, mut surface) = wheel();

        let a = reference.spin(0.0).unwrap().unwrap();
        let b = resized.spin(0.0).unwrap().unwrap();
        reference.on_frame(&mut ref_surface, a, 800.0);
        resized.on_frame(&mut surface, b, 800.0);

        let before = resized.rotation();
        resized.resize(&mut surface, 320.0, 900.0, 2.0);
        assert_eq!(resized.rotation(), before);
        assert_eq!(surface.size(), (640, 640));

        reference.on_frame(&mut ref_surface, a, 5000.0);
        resized.on_frame(&mut surface, b, 5000.0);
        assert_eq!(reference.drain_events(), resized.drain_events());
        assert_eq!(reference.rotation(), resized.rotation());
    }

    #[test]
    fn twenty_five_spins_leave_twenty_entries() {
        let (mut wheel, mut surface) = wheel();
        let mut t = 0.0;
        for _ in 0..25 {
            t = run(&mut wheel, &mut surface, t) + 100.0;
        }
        let history = wheel.context().session.history();
        assert_eq!(history.len(), 20);
        let stamps: Vec<u64> = history.entries().iter().map(|e| e.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] >= w[1]), "most recent first");
        assert_eq!(wheel.context().session.tally().total(), 25);
    }

    #[test]
    fn stalled_spin_settles_through_fallback() {
        let (mut wheel, mut surface) = wheel();
        let token = wheel.spin(0.0).unwrap().unwrap();
        wheel.on_frame(&mut surface, token, 16.0);

        let deadline = wheel.fallback_deadline(token).unwrap();
        assert_eq!(deadline, 3500.0);
        assert!(!wheel.poll_fallback(&mut surface, token, deadline - 1.0));
        assert!(wheel.poll_fallback(&mut surface, token, deadline));

        let events = wheel.drain_events();
        assert_eq!(events[0], WheelEvent::Stalled { request: token });
        let WheelEvent::Outcome { index, .. } = &events[1] else {
            panic!("outcome should follow the stall event");
        };
        assert_eq!(section_index_at_pointer(wheel.rotation(), 2), *index);
        assert_eq!(wheel.on_frame(&mut surface, token, deadline + 16.0), FrameStep::Stale);
    }

    #[test]
    fn sections_locked_while_spinning() {
        let (mut wheel, _surface) = wheel();
        wheel.spin(0.0).unwrap();
        assert_eq!(
            wheel.set_sections(SectionList::yes_no()),
            Err(WheelError::SpinInProgress)
        );
        wheel.teardown();
        assert!(wheel.set_sections_json(r##"[{"id":"a","label":"A","color":"#000"},{"id":"b","text":"B","color":"#fff"}]"##).is_ok());
        assert_eq!(wheel.sections().label(1), Some("B"));
    }

    /// Tries to put a different wheel up as soon as a spin starts.
    struct Swapper {
        refused: Vec<WheelError>,
    }

    impl WheelApp for Swapper {
        fn init(&mut self, _ctx: &mut WheelContext) {}

        fn on_spin_start(&mut self, ctx: &mut WheelContext) {
            let three = SectionList::from_json(
                r##"[{"id":"1","label":"T1","color":"#111"},{"id":"2","label":"T2","color":"#222"},{"id":"3","label":"T3","color":"#333"}]"##,
            )
            .unwrap();
            if let Err(err) = ctx.set_sections(three) {
                self.refused.push(err);
            }
        }
    }

    #[test]
    fn hooks_cannot_swap_sections_mid_spin() {
        for seed in 0..20 {
            let mut wheel = Wheel::new(Swapper { refused: Vec::new() }, Box::new(MemoryStore::new())).unwrap();
            wheel.configure(WheelConfig { seed: Some(seed), ..WheelConfig::default() }).unwrap();
            let mut surface = RecordingSurface::new(0, 0);
            wheel.resize(&mut surface, 300.0, 300.0, 1.0);

            let token = wheel.spin(0.0).unwrap().unwrap();
            assert_eq!(wheel.app().refused, vec![WheelError::SpinInProgress]);
            let (_, ctx) = wheel.parts_mut();
            assert!(ctx.set_sections(SectionList::yes_no()).is_err());

            assert_eq!(wheel.on_frame(&mut surface, token, 4000.0), FrameStep::Done);
            let index = wheel
                .drain_events()
                .iter()
                .find_map(|e| match e {
                    WheelEvent::Outcome { index, .. } => Some(*index),
                    _ => None,
                })
                .expect("outcome event");
            assert_eq!(wheel.sections().len(), 2);
            assert_eq!(section_index_at_pointer(wheel.rotation(), wheel.sections().len()), index);
        }
    }

    #[test]
    fn sections_unlock_after_teardown_and_outcome() {
        let (mut wheel, mut surface) = wheel();
        wheel.spin(0.0).unwrap();
        wheel.teardown();
        let (_, ctx) = wheel.parts_mut();
        ctx.set_sections(SectionList::yes_no()).unwrap();

        run(&mut wheel, &mut surface, 100.0);
        let (_, ctx) = wheel.parts_mut();
        assert!(ctx.set_sections(SectionList::yes_no()).is_ok());
    }

    #[test]
    fn configure_applies_json_overrides() {
        let (mut wheel, mut surface) = wheel();
        wheel
            .configure_json(r#"{"spin_duration_secs": 2, "sound_enabled": false}"#)
            .unwrap();
        assert_eq!(wheel.config().spin_duration_secs, 2.0);
        assert!(wheel.config().confetti_enabled);

        let end = run(&mut wheel, &mut surface, 0.0);
        assert!(end <= 2016.0);
        let events = wheel.drain_events();
        assert!(!events.iter().any(|e| matches!(e, WheelEvent::Sound { .. })));
        assert!(events.iter().any(|e| matches!(e, WheelEvent::Confetti(_))));

        assert!(matches!(wheel.configure_json("[2]"), Err(WheelError::Parse(_))));
        assert!(matches!(
            wheel.configure_json(r#"{"history_capacity": 5}"#),
            Err(WheelError::InvalidConfig(_))
        ));
        wheel.spin(10_000.0).unwrap();
        assert_eq!(
            wheel.configure_json(r#"{"confetti_enabled": false}"#),
            Err(WheelError::SpinInProgress)
        );
        assert!(wheel.config().confetti_enabled);
    }

    #[test]
    fn same_seed_picks_same_answers() {
        let picks = |wheel: &mut Wheel<YesNo>, surface: &mut RecordingSurface| {
            wheel.configure_json(r#"{"seed": 77}"#).unwrap();
            let mut t = 0.0;
            (0..5)
                .map(|_| {
                    t = run(wheel, surface, t) + 50.0;
                    wheel.winner().map(str::to_string)
                })
                .collect::<Vec<_>>()
        };
        let (mut a, mut sa) = wheel();
        let (mut b, mut sb) = wheel();
        b.spin(0.0).unwrap();
        b.teardown();
        assert_eq!(picks(&mut a, &mut sa), picks(&mut b, &mut sb));
    }

    #[test]
    fn configuration_setters_validate() {
        let (mut wheel, _surface) = wheel();
        assert!(wheel.set_duration_secs(0.0).is_err());
        wheel.set_duration_secs(6.5).unwrap();
        assert_eq!(wheel.config().spin_duration_secs, 6.5);
        assert!(wheel.set_sections_json("[]").is_err());
    }

    #[test]
    fn reset_clears_stored_history() {
        let (mut wheel, mut surface) = wheel();
        run(&mut wheel, &mut surface, 0.0);
        wheel.adjust_tally("Yes", 4);
        wheel.reset();
        assert_eq!(wheel.tally_json().unwrap(), r#"{"No":0,"Yes":0}"#);
        assert_eq!(wheel.history_json().unwrap(), "[]");
    }

    #[test]
    fn winner_hidden_while_spinning() {
        let (mut wheel, mut surface) = wheel();
        run(&mut wheel, &mut surface, 0.0);
        assert!(wheel.winner().is_some());
        wheel.spin(10_000.0).unwrap();
        assert_eq!(wheel.winner(), None);
    }
}
