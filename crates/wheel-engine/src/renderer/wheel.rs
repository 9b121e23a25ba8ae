use glam::Vec2;

use super::surface::{RenderError, Surface, TextAlign, TextRun};
use crate::core::color::Color;
use crate::core::section::Section;
use crate::geometry::{arc_bounds, WheelLayout, WheelStyle};

/// Label shadow blur, CSS pixels.
const SHADOW_BLUR: f32 = 3.0;

/// Display size of the wheel inside its container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Side of the square wheel, CSS pixels.
    pub css_size: f32,
    /// Device pixel ratio the backing store was sized for.
    pub dpr: f32,
}

impl Viewport {
    /// Largest square that fits a `width × height` CSS-pixel container.
    pub fn fit(container_width: f32, container_height: f32, dpr: f32) -> Self {
        let size = container_width.min(container_height);
        Self {
            css_size: if size.is_finite() { size.max(0.0) } else { 0.0 },
            dpr: if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 },
        }
    }

    /// Backing store side, device pixels.
    pub fn pixel_size(&self) -> u32 {
        (self.css_size * self.dpr).round() as u32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self { css_size: 0.0, dpr: 1.0 }
    }
}

/// Result of a draw attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStatus {
    Drawn,
    /// The surface was unavailable; a redraw is pending.
    Skipped,
}

/// Draws a wheel onto a [`Surface`] and keeps what it needs to redraw after a
/// resize: the last rotation and the viewport.
///
/// The renderer never owns the spin; it is told the rotation to draw. Resizing
/// only touches the surface and redraws at the last known rotation.
#[derive(Debug, Clone)]
pub struct WheelRenderer {
    style: WheelStyle,
    viewport: Viewport,
    last_rotation: f64,
    pending_redraw: bool,
}

impl WheelRenderer {
    pub fn new(style: WheelStyle) -> Self {
        Self {
            style,
            viewport: Viewport::default(),
            last_rotation: 0.0,
            pending_redraw: true,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Rotation of the most recent draw request (drawn or not).
    pub fn last_rotation(&self) -> f64 {
        self.last_rotation
    }

    /// Whether a previous draw was skipped and should be retried.
    pub fn needs_redraw(&self) -> bool {
        self.pending_redraw
    }

    /// Container resized: resize the backing store and redraw at the last
    /// rotation. Does not touch any spin state.
    pub fn resize(
        &mut self,
        surface: &mut dyn Surface,
        sections: &[Section],
        container_width: f32,
        container_height: f32,
        dpr: f32,
    ) -> DrawStatus {
        self.viewport = Viewport::fit(container_width, container_height, dpr);
        let px = self.viewport.pixel_size();
        surface.resize(px, px);
        log::debug!(
            "wheel resized to {}css px ({}px @{}x)",
            self.viewport.css_size,
            px,
            self.viewport.dpr
        );
        self.redraw(surface, sections)
    }

    /// Draw at `rotation` and remember it.
    pub fn draw(&mut self, surface: &mut dyn Surface, sections: &[Section], rotation: f64) -> DrawStatus {
        self.last_rotation = rotation;
        self.redraw(surface, sections)
    }

    /// Draw again at the last rotation.
    pub fn redraw(&mut self, surface: &mut dyn Surface, sections: &[Section]) -> DrawStatus {
        match self.paint(surface, sections) {
            Ok(()) => {
                self.pending_redraw = false;
                DrawStatus::Drawn
            }
            Err(err) => {
                if !self.pending_redraw {
                    log::debug!("skipping wheel draw: {err}");
                }
                self.pending_redraw = true;
                DrawStatus::Skipped
            }
        }
    }

    fn paint(&self, surface: &mut dyn Surface, sections: &[Section]) -> Result<(), RenderError> {
        surface.begin_frame()?;
        let (width, height) = surface.size();
        let layout = WheelLayout::new(width, height, self.viewport.dpr, self.style);
        draw_wheel(surface, sections, self.last_rotation, &layout);
        surface.end_frame();
        Ok(())
    }
}

impl Default for WheelRenderer {
    fn default() -> Self {
        Self::new(WheelStyle::Full)
    }
}

/// Issue the draw calls for one wheel frame. The surface must already be cleared.
pub fn draw_wheel(surface: &mut dyn Surface, sections: &[Section], rotation: f64, layout: &WheelLayout) {
    if !layout.is_drawable() || sections.is_empty() {
        return;
    }

    let count = sections.len();
    for (index, section) in sections.iter().enumerate() {
        let (start, end) = arc_bounds(index, count, rotation);
        let (start, end) = (start as f32, end as f32);

        surface.fill_sector(layout.center, layout.radius, start, end, section.color);
        surface.stroke_sector(
            layout.center,
            layout.radius,
            start,
            end,
            layout.outline_width,
            Color::WHITE,
        );

        if layout.style.draws_labels() {
            surface.fill_text(&TextRun {
                text: &section.label,
                origin: layout.center,
                rotation: (start + end) * 0.5,
                offset: Vec2::new(layout.label_radius, layout.label_baseline()),
                align: TextAlign::Right,
                font_px: layout.font_px(&section.label),
                bold: true,
                color: Color::WHITE,
                shadow: Some((Color::SHADOW, SHADOW_BLUR * layout.dpr)),
            });
        }
    }

    surface.fill_circle(layout.center, layout.hub_radius, Color::WHITE);

    if layout.style.draws_pointer() {
        surface.fill_polygon(&layout.pointer_triangle(), Color::WHITE);
    }
}
