use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
#[cfg(feature = "vectors")]
use wheel_engine::{DrawStatus, VectorSurface};
use wheel_engine::{FrameStep, RequestId, Wheel, WheelApp, WheelError, WheelEvent};

use crate::audio::TonePlayer;
use crate::canvas::{canvas_by_id, device_pixel_ratio, CanvasSurface};
use crate::scheduler::{now_ms, FrameLoop, ResizeWatch, Timeout};
use crate::storage::LocalStorage;

/// Convert an engine error into a JS exception value.
pub fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Browser host for a [`Wheel`]: owns the canvas, the frame loop, the
/// fallback timer, the resize observer and the tone player.
///
/// Each concrete app (e.g., `yes-no-wheel`) keeps one runner in a
/// `thread_local!` and exports free functions via `#[wasm_bindgen]`, because
/// wasm-bindgen cannot export generic structs directly. Cloning the runner
/// clones the handle, not the wheel.
pub struct WheelRunner<A: WheelApp + 'static> {
    inner: Rc<RefCell<RunnerState<A>>>,
}

impl<A: WheelApp + 'static> Clone for WheelRunner<A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct RunnerState<A: WheelApp> {
    wheel: Wheel<A>,
    surface: CanvasSurface,
    audio: TonePlayer,
    frames: Option<FrameLoop>,
    fallback: Option<Timeout>,
    resize: Option<ResizeWatch>,
    listener: Option<js_sys::Function>,
}

/// Events queued for the page's listener.
struct Dispatch {
    listener: js_sys::Function,
    json: String,
}

impl Dispatch {
    /// Run the listener as a microtask, after the current callback returns.
    fn send(self) {
        let bound = self
            .listener
            .bind1(&JsValue::NULL, &JsValue::from_str(&self.json));
        match web_sys::window() {
            Some(w) => w.queue_microtask(bound.unchecked_ref::<js_sys::Function>()),
            None => log::warn!("no window to deliver wheel events"),
        }
    }
}

impl<A: WheelApp + 'static> WheelRunner<A> {
    /// Build the wheel for `app` on the canvas with id `canvas_id`, restore
    /// stored state and start watching the canvas container for resizes.
    pub fn mount(app: A, canvas_id: &str) -> Result<Self, JsValue> {
        let canvas = canvas_by_id(canvas_id).map_err(to_js)?;
        let wheel = Wheel::new(app, Box::new(LocalStorage::new())).map_err(to_js)?;
        let runner = Self {
            inner: Rc::new(RefCell::new(RunnerState {
                wheel,
                surface: CanvasSurface::new(canvas),
                audio: TonePlayer::new(),
                frames: None,
                fallback: None,
                resize: None,
                listener: None,
            })),
        };

        let target = {
            let state = runner.inner.borrow();
            let canvas = state.surface.canvas();
            canvas
                .parent_element()
                .unwrap_or_else(|| canvas.clone().into())
        };
        let weak = Rc::downgrade(&runner.inner);
        let watch = ResizeWatch::observe(&target, move || {
            let Some(inner) = weak.upgrade() else { return };
            let Ok(mut state) = inner.try_borrow_mut() else { return };
            state.resize();
        });
        match watch {
            Ok(watch) => runner.inner.borrow_mut().resize = Some(watch),
            Err(err) => log::warn!("ResizeObserver unavailable, sizing once: {err:?}"),
        }
        runner.inner.borrow_mut().resize();
        Ok(runner)
    }

    /// Start a spin if idle. Returns whether a spin started.
    pub fn spin(&self) -> Result<bool, JsValue> {
        self.start(false).map(|token| token.is_some())
    }

    /// Start a spin, superseding any spin in progress.
    pub fn respin(&self) -> Result<(), JsValue> {
        self.start(true).map(|_| ())
    }

    fn start(&self, preempt: bool) -> Result<Option<RequestId>, JsValue> {
        let mut state = self.inner.borrow_mut();
        if state.wheel.config().sound_enabled {
            state.audio.warm();
        }
        let now = now_ms();
        let token = if preempt {
            Some(state.wheel.respin(now).map_err(to_js)?)
        } else {
            state.wheel.spin(now).map_err(to_js)?
        };
        if let Some(token) = token {
            self.schedule(&mut state, token, now)?;
        }
        Ok(token)
    }

    /// Replace the frame loop and fallback timer with ones bound to `token`.
    fn schedule(&self, state: &mut RunnerState<A>, token: RequestId, now: f64) -> Result<(), JsValue> {
        state.frames = None;
        state.fallback = None;

        let weak = Rc::downgrade(&self.inner);
        let timer = Timeout::new(move || Self::fallback_fired(&weak, token));
        let timer_armed = match state.wheel.fallback_deadline(token) {
            Some(deadline) => match timer.arm(deadline - now) {
                Ok(()) => true,
                Err(err) => {
                    log::error!("could not arm fallback for spin {token}: {err:?}");
                    false
                }
            },
            None => false,
        };
        state.fallback = Some(timer);

        let weak = Rc::downgrade(&self.inner);
        match FrameLoop::start(move |now| Self::frame(&weak, token, now)) {
            Ok(frames) => state.frames = Some(frames),
            Err(err) if timer_armed => {
                log::error!("frame loop failed for spin {token}, waiting on fallback: {err:?}");
            }
            Err(err) => {
                state.wheel.teardown();
                return Err(err);
            }
        }
        Ok(())
    }

    fn frame(weak: &Weak<RefCell<RunnerState<A>>>, token: RequestId, now: f64) -> bool {
        let Some(inner) = weak.upgrade() else { return false };
        let (keep_going, dispatch) = {
            let Ok(mut state) = inner.try_borrow_mut() else {
                return true;
            };
            state.frame(token, now)
        };
        if let Some(dispatch) = dispatch {
            dispatch.send();
        }
        keep_going
    }

    fn fallback_fired(weak: &Weak<RefCell<RunnerState<A>>>, token: RequestId) {
        let Some(inner) = weak.upgrade() else { return };
        let dispatch = {
            let Ok(mut state) = inner.try_borrow_mut() else {
                log::warn!("fallback for spin {token} fired while the wheel was busy");
                return;
            };
            state.fallback_due(token, now_ms())
        };
        if let Some(dispatch) = dispatch {
            dispatch.send();
        }
    }

    /// Resize the canvas to its container and redraw.
    pub fn resize(&self) {
        self.inner.borrow_mut().resize();
    }

    /// Cancel any spin and release every browser registration.
    pub fn destroy(&self) {
        let mut state = self.inner.borrow_mut();
        state.wheel.teardown();
        state.frames = None;
        state.fallback = None;
        state.resize = None;
        state.listener = None;
        state.audio.close();
    }

    /// Deliver queued events to `listener` (a JSON array string) after each
    /// spin and each [`update`](Self::update). `None` leaves them queued for
    /// [`Wheel::drain_events_json`].
    pub fn set_listener(&self, listener: Option<js_sys::Function>) {
        self.inner.borrow_mut().listener = listener;
    }

    /// Read-only access to the wheel.
    pub fn with_wheel<R>(&self, f: impl FnOnce(&Wheel<A>) -> R) -> R {
        f(&self.inner.borrow().wheel)
    }

    /// Mutate the wheel, then redraw, play queued sounds and deliver events.
    pub fn update<R>(&self, f: impl FnOnce(&mut Wheel<A>) -> R) -> R {
        let (result, dispatch) = {
            let mut state = self.inner.borrow_mut();
            let result = f(&mut state.wheel);
            let RunnerState { wheel, surface, .. } = &mut *state;
            wheel.redraw(surface);
            (result, state.flush_events())
        };
        if let Some(dispatch) = dispatch {
            dispatch.send();
        }
        result
    }

    /// Like [`update`](Self::update) for fallible operations, converting the
    /// error for JS.
    pub fn try_update<R>(&self, f: impl FnOnce(&mut Wheel<A>) -> Result<R, WheelError>) -> Result<R, JsValue> {
        self.update(f).map_err(to_js)
    }

    /// Tessellate the wheel as it is on the canvas, for GPU or offscreen
    /// hosts. The canvas is left alone.
    #[cfg(feature = "vectors")]
    pub fn tessellate(&self, mesh: &mut VectorSurface) -> DrawStatus {
        self.inner.borrow_mut().wheel.tessellate(mesh)
    }
}

impl<A: WheelApp> RunnerState<A> {
    fn frame(&mut self, token: RequestId, now: f64) -> (bool, Option<Dispatch>) {
        let RunnerState { wheel, surface, .. } = &mut *self;
        match wheel.on_frame(surface, token, now) {
            FrameStep::Continue => (true, None),
            FrameStep::Stale => (false, None),
            FrameStep::Done => {
                if let Some(timer) = &self.fallback {
                    timer.cancel();
                }
                (false, self.flush_events())
            }
        }
    }

    fn fallback_due(&mut self, token: RequestId, now: f64) -> Option<Dispatch> {
        let RunnerState { wheel, surface, .. } = &mut *self;
        if wheel.poll_fallback(surface, token, now) {
            if let Some(frames) = &self.frames {
                frames.stop();
            }
            return self.flush_events();
        }
        // Browsers may fire a little early; wait out the rest of the grace.
        if let (Some(deadline), Some(timer)) = (self.wheel.fallback_deadline(token), &self.fallback) {
            if let Err(err) = timer.arm(deadline - now) {
                log::error!("could not re-arm fallback for spin {token}: {err:?}");
            }
        }
        None
    }

    fn resize(&mut self) {
        let (width, height) = self.surface.container_size();
        let RunnerState { wheel, surface, .. } = &mut *self;
        wheel.resize(surface, width, height, device_pixel_ratio());
        surface.set_css_size(wheel.viewport().css_size);
    }

    /// Play queued sounds, then hand the remaining events to the listener.
    /// Sounds are consumed here and never reach the page.
    fn flush_events(&mut self) -> Option<Dispatch> {
        let RunnerState { wheel, audio, .. } = &mut *self;
        let (_, ctx) = wheel.parts_mut();
        ctx.events.retain(|event| match event {
            WheelEvent::Sound { sound } => {
                audio.play(*sound);
                false
            }
            _ => true,
        });
        if ctx.events.is_empty() {
            return None;
        }
        let listener = self.listener.clone()?;
        match self.wheel.drain_events_json() {
            Ok(json) => Some(Dispatch { listener, json }),
            Err(err) => {
                log::error!("could not serialize wheel events: {err}");
                None
            }
        }
    }
}
