pub mod audio;
pub mod canvas;
pub mod runner;
pub mod scheduler;
pub mod storage;

pub use audio::TonePlayer;
pub use canvas::{canvas_by_id, device_pixel_ratio, CanvasSurface};
pub use runner::{to_js, WheelRunner};
pub use scheduler::{now_ms, FrameLoop, ResizeWatch, Timeout};
pub use storage::LocalStorage;
#[cfg(feature = "vectors")]
pub use wheel_engine::VectorSurface;

/// Generate all `#[wasm_bindgen]` exports for a wheel app.
///
/// Generates:
/// - `thread_local!` storage for the [`WheelRunner`]
/// - a `with_runner()` helper for app-specific exports
/// - the `wheel_*` exports (init, spin, configuration, session data, events)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod app;
/// use app::YesNoWheel;
///
/// wheel_web::export_wheel!(YesNoWheel, "yes-no-wheel");
/// ```
///
/// # Arguments
///
/// - `$app_type`: a type implementing `wheel_engine::WheelApp` with a `new()`
///   constructor
/// - `$app_name`: a string literal used in log messages
///
/// Append `vectors` to also export the wheel as a tessellated mesh
/// (`wheel_tessellate`, `wheel_vector_vertices`, `wheel_vector_labels_json`).
/// Needs the `vectors` feature.
#[macro_export]
macro_rules! export_wheel {
    ($app_type:ty, $app_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::WheelRunner<$app_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&$crate::WheelRunner<$app_type>) -> R) -> R {
            let runner = RUNNER
                .with(|cell| cell.borrow().clone())
                .expect("Wheel not initialized. Call wheel_init() first.");
            f(&runner)
        }

        #[wasm_bindgen]
        pub fn wheel_init(canvas_id: &str) -> Result<(), JsValue> {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            if let Some(old) = RUNNER.with(|cell| cell.borrow_mut().take()) {
                old.destroy();
            }
            let runner = $crate::WheelRunner::mount(<$app_type>::new(), canvas_id)?;
            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });
            log::info!("{}: initialized on #{}", $app_name, canvas_id);
            Ok(())
        }

        /// Spin if idle. Returns whether a spin started.
        #[wasm_bindgen]
        pub fn wheel_spin() -> Result<bool, JsValue> {
            with_runner(|r| r.spin())
        }

        /// Spin now, superseding a spin in progress.
        #[wasm_bindgen]
        pub fn wheel_respin() -> Result<(), JsValue> {
            with_runner(|r| r.respin())
        }

        #[wasm_bindgen]
        pub fn wheel_destroy() {
            if let Some(runner) = RUNNER.with(|cell| cell.borrow_mut().take()) {
                runner.destroy();
                log::info!("{}: destroyed", $app_name);
            }
        }

        #[wasm_bindgen]
        pub fn wheel_resize() {
            with_runner(|r| r.resize());
        }

        #[wasm_bindgen]
        pub fn wheel_is_spinning() -> bool {
            with_runner(|r| r.with_wheel(|w| w.is_spinning()))
        }

        /// Receive event batches (JSON arrays) as they happen instead of
        /// polling `wheel_drain_events_json`.
        #[wasm_bindgen]
        pub fn wheel_set_event_listener(listener: Option<js_sys::Function>) {
            with_runner(|r| r.set_listener(listener));
        }

        // ---- Configuration ----

        /// Apply a JSON object of config overrides, e.g.
        /// `{"spin_duration_secs": 5, "sound_enabled": false}`.
        #[wasm_bindgen]
        pub fn wheel_configure(json: &str) -> Result<(), JsValue> {
            with_runner(|r| r.try_update(|w| w.configure_json(json)))
        }

        #[wasm_bindgen]
        pub fn wheel_set_sections(json: &str) -> Result<(), JsValue> {
            with_runner(|r| r.try_update(|w| w.set_sections_json(json)))
        }

        #[wasm_bindgen]
        pub fn wheel_sections_json() -> Result<String, JsValue> {
            with_runner(|r| {
                r.with_wheel(|w| serde_json::to_string(w.sections()))
                    .map_err($crate::to_js)
            })
        }

        #[wasm_bindgen]
        pub fn wheel_set_duration(secs: f64) -> Result<(), JsValue> {
            with_runner(|r| r.try_update(|w| w.set_duration_secs(secs)))
        }

        #[wasm_bindgen]
        pub fn wheel_set_sound_enabled(enabled: bool) {
            with_runner(|r| r.update(|w| w.set_sound_enabled(enabled)));
        }

        #[wasm_bindgen]
        pub fn wheel_set_confetti_enabled(enabled: bool) {
            with_runner(|r| r.update(|w| w.set_confetti_enabled(enabled)));
        }

        // ---- Session ----

        #[wasm_bindgen]
        pub fn wheel_set_question(text: &str) {
            with_runner(|r| r.update(|w| w.set_question(text)));
        }

        #[wasm_bindgen]
        pub fn wheel_question() -> String {
            with_runner(|r| r.with_wheel(|w| w.context().session.question().to_string()))
        }

        /// The answer to show, or `undefined` while spinning.
        #[wasm_bindgen]
        pub fn wheel_winner() -> Option<String> {
            with_runner(|r| r.with_wheel(|w| w.winner().map(str::to_string)))
        }

        #[wasm_bindgen]
        pub fn wheel_reset() {
            with_runner(|r| r.update(|w| w.reset()));
        }

        /// Nudge a tally by `delta`. Returns the new count.
        #[wasm_bindgen]
        pub fn wheel_adjust_tally(label: &str, delta: i32) -> u32 {
            with_runner(|r| r.update(|w| w.adjust_tally(label, delta)))
        }

        #[wasm_bindgen]
        pub fn wheel_history_json() -> Result<String, JsValue> {
            with_runner(|r| r.with_wheel(|w| w.history_json()).map_err($crate::to_js))
        }

        #[wasm_bindgen]
        pub fn wheel_tally_json() -> Result<String, JsValue> {
            with_runner(|r| r.with_wheel(|w| w.tally_json()).map_err($crate::to_js))
        }

        #[wasm_bindgen]
        pub fn wheel_drain_events_json() -> Result<String, JsValue> {
            with_runner(|r| r.update(|w| w.drain_events_json()).map_err($crate::to_js))
        }
    };

    ($app_type:ty, $app_name:literal, vectors) => {
        $crate::export_wheel!($app_type, $app_name);

        // ---- Tessellated mesh ----

        thread_local! {
            static MESH: RefCell<$crate::VectorSurface> = RefCell::new($crate::VectorSurface::default());
        }

        /// Tessellate the wheel at its current rotation. Returns the vertex
        /// count, 0 while the wheel has no size.
        #[wasm_bindgen]
        pub fn wheel_tessellate() -> u32 {
            MESH.with(|mesh| {
                let mut mesh = mesh.borrow_mut();
                with_runner(|r| r.tessellate(&mut mesh));
                mesh.triangles().len() as u32
            })
        }

        /// The last mesh as a triangle list, 6 floats per vertex
        /// (x, y, r, g, b, a).
        #[wasm_bindgen]
        pub fn wheel_vector_vertices() -> js_sys::Float32Array {
            MESH.with(|mesh| js_sys::Float32Array::from(mesh.borrow().as_floats()))
        }

        /// Labels of the last mesh, for drawing as a text overlay.
        #[wasm_bindgen]
        pub fn wheel_vector_labels_json() -> Result<String, JsValue> {
            MESH.with(|mesh| mesh.borrow().labels_json().map_err($crate::to_js))
        }
    };
}
