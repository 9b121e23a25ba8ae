//! Browser timers: `requestAnimationFrame` loops, `setTimeout` one-shots and
//! `ResizeObserver` subscriptions.
//!
//! Every handle cancels its browser registration on drop. A callback must
//! never drop its own handle while running; it calls `stop`/`cancel` and the
//! owner drops the handle later from outside the callback.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, ResizeObserver};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Milliseconds on the `performance.now()` clock.
///
/// Spins are started and advanced with this same clock so frame and timer
/// callbacks agree on "now".
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn request_frame(closure: &Closure<dyn FnMut(f64)>) -> Result<i32, JsValue> {
    window()?.request_animation_frame(closure.as_ref().unchecked_ref())
}

/// A `requestAnimationFrame` loop.
pub struct FrameLoop {
    callback: FrameCallback,
    pending: Rc<Cell<Option<i32>>>,
    stopped: Rc<Cell<bool>>,
}

impl FrameLoop {
    /// Call `on_frame(now_ms)` once per animation frame until it returns
    /// `false` or the loop is stopped.
    pub fn start(mut on_frame: impl FnMut(f64) -> bool + 'static) -> Result<Self, JsValue> {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));
        let stopped = Rc::new(Cell::new(false));

        let next = Rc::downgrade(&callback);
        let pending_in = pending.clone();
        let stopped_in = stopped.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
            pending_in.set(None);
            if stopped_in.get() || !on_frame(now_ms()) || stopped_in.get() {
                return;
            }
            let Some(cb) = next.upgrade() else { return };
            let requested = match cb.borrow().as_ref() {
                Some(closure) => request_frame(closure),
                None => return,
            };
            match requested {
                Ok(id) => pending_in.set(Some(id)),
                Err(err) => log::error!("requestAnimationFrame failed: {err:?}"),
            }
        }) as Box<dyn FnMut(f64)>));

        let first = match callback.borrow().as_ref() {
            Some(closure) => request_frame(closure)?,
            None => return Err(JsValue::from_str("frame callback missing")),
        };
        pending.set(Some(first));

        Ok(Self {
            callback,
            pending,
            stopped,
        })
    }

    /// Stop requesting frames. Safe to call from inside the loop's callback.
    pub fn stop(&self) {
        self.stopped.set(true);
        if let Some(id) = self.pending.take() {
            if let Some(w) = web_sys::window() {
                let _ = w.cancel_animation_frame(id);
            }
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
        self.callback.borrow_mut().take();
    }
}

/// A re-armable `setTimeout`.
pub struct Timeout {
    closure: Closure<dyn FnMut()>,
    pending: Rc<Cell<Option<i32>>>,
}

impl Timeout {
    /// Create an unarmed timer that calls `on_fire` when it goes off.
    pub fn new(mut on_fire: impl FnMut() + 'static) -> Self {
        let pending = Rc::new(Cell::new(None));
        let pending_in = pending.clone();
        let closure = Closure::wrap(Box::new(move || {
            pending_in.set(None);
            on_fire();
        }) as Box<dyn FnMut()>);
        Self { closure, pending }
    }

    /// (Re)arm to fire after `delay_ms`. Safe to call from `on_fire`.
    pub fn arm(&self, delay_ms: f64) -> Result<(), JsValue> {
        self.cancel();
        let delay = delay_ms.max(0.0).ceil().min(i32::MAX as f64) as i32;
        let id = window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
            self.closure.as_ref().unchecked_ref(),
            delay,
        )?;
        self.pending.set(Some(id));
        Ok(())
    }

    pub fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            if let Some(w) = web_sys::window() {
                w.clear_timeout_with_handle(id);
            }
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A `ResizeObserver` watching one element. Disconnects on drop.
pub struct ResizeWatch {
    observer: ResizeObserver,
    _callback: Closure<dyn FnMut(js_sys::Array)>,
}

impl ResizeWatch {
    /// Call `on_resize` whenever `target` changes size, and once right after
    /// observation starts.
    pub fn observe(target: &Element, mut on_resize: impl FnMut() + 'static) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(move |_entries: js_sys::Array| {
            on_resize();
        }) as Box<dyn FnMut(js_sys::Array)>);
        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())?;
        observer.observe(target);
        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for ResizeWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
