use wasm_bindgen::prelude::*;
use wheel_engine::host::templates;
use wheel_engine::{Surface, WheelRenderer, WheelStyle};
use wheel_web::{canvas_by_id, device_pixel_ratio, to_js, CanvasSurface};

mod app;
use app::CustomWheel;

wheel_web::export_wheel!(CustomWheel, "custom-wheel");

// ---- Editor ----

/// Add a section. Returns it as JSON.
#[wasm_bindgen]
pub fn custom_add_section() -> Result<String, JsValue> {
    with_runner(|r| {
        let section = r.try_update(app::add_section)?;
        serde_json::to_string(&section).map_err(to_js)
    })
}

#[wasm_bindgen]
pub fn custom_update_section(id: &str, label: &str, color: &str) -> Result<(), JsValue> {
    with_runner(|r| r.try_update(|w| app::update_section(w, id, label, color)))
}

#[wasm_bindgen]
pub fn custom_remove_section(id: &str) -> Result<(), JsValue> {
    with_runner(|r| r.try_update(|w| app::remove_section(w, id).map(|_| ())))
}

#[wasm_bindgen]
pub fn custom_set_name(name: &str) {
    with_runner(|r| r.update(|w| app::set_name(w, name)));
}

#[wasm_bindgen]
pub fn custom_name() -> String {
    with_runner(|r| r.with_wheel(|w| w.app().editor().name().to_string()))
}

// ---- Templates and saved wheels ----

/// Catalog entries whose name or description contains `term`, as JSON.
#[wasm_bindgen]
pub fn custom_templates_json(term: &str) -> Result<String, JsValue> {
    serde_json::to_string(&templates::search(term)).map_err(to_js)
}

/// Stash a template for the editor page to pick up on its next load.
#[wasm_bindgen]
pub fn custom_choose_template(id: &str) -> Result<(), JsValue> {
    with_runner(|r| r.try_update(|w| app::choose_template(w, id).map(|_| ())))
}

/// Load a template straight into this editor.
#[wasm_bindgen]
pub fn custom_apply_template(id: &str) -> Result<(), JsValue> {
    let template = templates::find(id).ok_or_else(|| to_js(format!("no template `{id}`")))?;
    with_runner(|r| r.try_update(|w| app::apply_template(w, &template)))
}

#[wasm_bindgen]
pub fn custom_save_wheel() -> Result<String, JsValue> {
    with_runner(|r| {
        let saved = r.try_update(app::save)?;
        serde_json::to_string(&saved).map_err(to_js)
    })
}

#[wasm_bindgen]
pub fn custom_saved_wheels_json() -> Result<String, JsValue> {
    with_runner(|r| r.with_wheel(|w| serde_json::to_string(&app::saved(w))).map_err(to_js))
}

#[wasm_bindgen]
pub fn custom_open_saved(id: &str) -> Result<(), JsValue> {
    with_runner(|r| r.try_update(|w| app::open_saved(w, id)))
}

/// Draw a template's thumbnail wheel on the canvas `canvas_id`.
#[wasm_bindgen]
pub fn custom_draw_preview(canvas_id: &str, template_id: &str) -> Result<(), JsValue> {
    let template = templates::find(template_id)
        .ok_or_else(|| to_js(format!("no template `{template_id}`")))?;
    let sections = template.section_list().map_err(to_js)?;
    let mut surface = CanvasSurface::new(canvas_by_id(canvas_id).map_err(to_js)?);
    let (width, height) = surface.container_size();

    let mut renderer = WheelRenderer::new(WheelStyle::Mini);
    renderer.resize(&mut surface, &sections, width, height, device_pixel_ratio());
    surface.set_css_size(renderer.viewport().css_size);
    log::debug!("preview of `{template_id}` drawn with {}", surface.backend());
    Ok(())
}
