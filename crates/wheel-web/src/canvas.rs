use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use wheel_engine::{Color, RenderError, Surface, TextRun};

/// Look up a `<canvas>` by element id.
pub fn canvas_by_id(id: &str) -> Result<HtmlCanvasElement, RenderError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| RenderError::Unavailable("no document".into()))?;
    document
        .get_element_by_id(id)
        .ok_or_else(|| RenderError::Unavailable(format!("no element with id `{id}`")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| RenderError::Unavailable(format!("`{id}` is not a canvas")))
}

/// The window's device pixel ratio, 1 when unknown.
pub fn device_pixel_ratio() -> f32 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio() as f32)
        .unwrap_or(1.0)
}

/// [`Surface`] over an HTML canvas with a Canvas 2D context.
///
/// The context is fetched lazily so a canvas that is not laid out yet just
/// skips draws until it is.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: Option<CanvasRenderingContext2d>,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, ctx: None }
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Container size in CSS pixels: the canvas parent if any, else the canvas.
    pub fn container_size(&self) -> (f32, f32) {
        let rect = match self.canvas.parent_element() {
            Some(parent) => parent.get_bounding_client_rect(),
            None => self.canvas.get_bounding_client_rect(),
        };
        (rect.width() as f32, rect.height() as f32)
    }

    /// Set the displayed size so the device-pixel backing store maps 1:1.
    pub fn set_css_size(&self, css_px: f32) {
        let style = self.canvas.style();
        let px = format!("{css_px}px");
        let _ = style.set_property("width", &px);
        let _ = style.set_property("height", &px);
    }

    fn context(&mut self) -> Result<&CanvasRenderingContext2d, RenderError> {
        if self.ctx.is_none() {
            let ctx = self
                .canvas
                .get_context("2d")
                .map_err(|e| RenderError::Backend(format!("{e:?}")))?
                .ok_or_else(|| RenderError::Unavailable("no 2d context".into()))?
                .dyn_into::<CanvasRenderingContext2d>()
                .map_err(|_| RenderError::Backend("2d context has the wrong type".into()))?;
            self.ctx = Some(ctx);
        }
        self.ctx
            .as_ref()
            .ok_or_else(|| RenderError::Unavailable("no 2d context".into()))
    }

    fn sector_path(ctx: &CanvasRenderingContext2d, center: Vec2, radius: f32, start: f32, end: f32) {
        ctx.begin_path();
        ctx.move_to(center.x as f64, center.y as f64);
        ctx.arc(center.x as f64, center.y as f64, radius as f64, start as f64, end as f64)
            .ok();
        ctx.close_path();
    }
}

impl Surface for CanvasSurface {
    fn backend(&self) -> &'static str {
        "canvas2d"
    }

    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn begin_frame(&mut self) -> Result<(), RenderError> {
        let (width, height) = self.size();
        if width == 0 || height == 0 {
            return Err(RenderError::Unavailable("canvas has no size yet".into()));
        }
        let ctx = self.context()?;
        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
            .map_err(|e| RenderError::Backend(format!("{e:?}")))?;
        ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
        Ok(())
    }

    fn fill_sector(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Color) {
        let Some(ctx) = self.ctx.as_ref() else { return };
        Self::sector_path(ctx, center, radius, start, end);
        ctx.set_fill_style_str(&color.to_css());
        ctx.fill();
    }

    fn stroke_sector(
        &mut self,
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        width: f32,
        color: Color,
    ) {
        let Some(ctx) = self.ctx.as_ref() else { return };
        Self::sector_path(ctx, center, radius, start, end);
        ctx.set_stroke_style_str(&color.to_css());
        ctx.set_line_width(width as f64);
        ctx.stroke();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let Some(ctx) = self.ctx.as_ref() else { return };
        ctx.begin_path();
        ctx.arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU).ok();
        ctx.set_fill_style_str(&color.to_css());
        ctx.fill();
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        let Some(ctx) = self.ctx.as_ref() else { return };
        let Some((first, rest)) = points.split_first() else { return };
        ctx.begin_path();
        ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            ctx.line_to(p.x as f64, p.y as f64);
        }
        ctx.close_path();
        ctx.set_fill_style_str(&color.to_css());
        ctx.fill();
    }

    fn fill_text(&mut self, run: &TextRun<'_>) {
        let Some(ctx) = self.ctx.as_ref() else { return };
        ctx.save();
        ctx.translate(run.origin.x as f64, run.origin.y as f64).ok();
        ctx.rotate(run.rotation as f64).ok();
        ctx.set_text_align(run.align.as_css());
        ctx.set_text_baseline("middle");
        let weight = if run.bold { "bold " } else { "" };
        ctx.set_font(&format!("{weight}{}px sans-serif", run.font_px));
        if let Some((shadow, blur)) = run.shadow {
            ctx.set_shadow_color(&shadow.to_css());
            ctx.set_shadow_blur(blur as f64);
        }
        ctx.set_fill_style_str(&run.color.to_css());
        ctx.fill_text(run.text, run.offset.x as f64, run.offset.y as f64).ok();
        ctx.restore();
    }
}
