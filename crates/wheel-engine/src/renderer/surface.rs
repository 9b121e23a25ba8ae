//! Drawing surface contract.
//!
//! The engine never talks to a canvas directly. It draws through [`Surface`],
//! which covers what a wheel needs from a 2D target: sectors, circles,
//! polygons and rotated text. Implementations live next to their platform:
//! the HTML canvas one in `wheel-web`, the lyon tessellator in
//! [`super::vector`], and [`super::recording::RecordingSurface`] for tests.

use glam::Vec2;
use thiserror::Error;

use crate::core::color::Color;

/// A surface could not be drawn to right now.
///
/// Always transient from the renderer's point of view: the draw is skipped and
/// retried on the next frame or resize.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("drawing context unavailable: {0}")]
    Unavailable(String),
    #[error("draw call failed: {0}")]
    Backend(String),
}

/// Horizontal anchor for text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    /// The Canvas 2D `textAlign` keyword.
    pub fn as_css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// A single line of text to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun<'a> {
    pub text: &'a str,
    /// Rotation origin.
    pub origin: Vec2,
    /// Rotation applied around `origin`, radians.
    pub rotation: f32,
    /// Anchor position in the rotated frame, relative to `origin`.
    pub offset: Vec2,
    pub align: TextAlign,
    pub font_px: f32,
    pub bold: bool,
    pub color: Color,
    /// Drop shadow color and blur radius.
    pub shadow: Option<(Color, f32)>,
}

/// Contract for 2D drawing backends.
///
/// Angles are screen angles in radians, clockwise on a y-down surface, as in
/// the Canvas 2D `arc()` call.
pub trait Surface {
    /// Backend identifier (e.g., "canvas2d", "lyon", "recording").
    fn backend(&self) -> &'static str;

    /// Current size in device pixels.
    fn size(&self) -> (u32, u32);

    /// Resize the backing store to `width × height` device pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Prepare for a new frame and clear it.
    /// Returns [`RenderError::Unavailable`] when there is nothing to draw on yet.
    fn begin_frame(&mut self) -> Result<(), RenderError>;

    /// Fill a pie slice from `start` to `end`.
    fn fill_sector(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Color);

    /// Outline a pie slice (both radii and the arc).
    fn stroke_sector(
        &mut self,
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        width: f32,
        color: Color,
    );

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Fill a closed polygon.
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);

    fn fill_text(&mut self, run: &TextRun<'_>);

    /// Finish the frame. Default does nothing.
    fn end_frame(&mut self) {}
}
