use glam::Vec2;

use super::surface::{RenderError, Surface, TextAlign, TextRun};
use crate::core::color::Color;

/// A draw call captured by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillSector { center: Vec2, radius: f32, start: f32, end: f32, color: Color },
    StrokeSector { center: Vec2, radius: f32, start: f32, end: f32, width: f32, color: Color },
    FillCircle { center: Vec2, radius: f32, color: Color },
    FillPolygon { points: Vec<Vec2>, color: Color },
    Text {
        text: String,
        origin: Vec2,
        rotation: f32,
        offset: Vec2,
        align: TextAlign,
        font_px: f32,
        color: Color,
    },
}

/// Headless surface that records every draw call.
///
/// Used by tests and for diagnostics: the last frame can be inspected to see
/// exactly which arcs and labels were drawn at which angles.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    available: bool,
    frames: usize,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            available: true,
            frames: 0,
            commands: Vec::new(),
        }
    }

    /// Simulate a context that is not mounted yet (or was lost).
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Commands of the most recent frame.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of frames begun successfully.
    pub fn frame_count(&self) -> usize {
        self.frames
    }

    /// Filled sectors of the last frame, in draw order.
    pub fn sectors(&self) -> Vec<(f32, f32, Color)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillSector { start, end, color, .. } => Some((*start, *end, *color)),
                _ => None,
            })
            .collect()
    }

    /// Label texts of the last frame, in draw order.
    pub fn labels(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn backend(&self) -> &'static str {
        "recording"
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn begin_frame(&mut self) -> Result<(), RenderError> {
        if !self.available {
            return Err(RenderError::Unavailable("recording surface disabled".into()));
        }
        self.frames += 1;
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
        Ok(())
    }

    fn fill_sector(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Color) {
        self.commands.push(DrawCommand::FillSector { center, radius, start, end, color });
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
        self.commands.push(DrawCommand::StrokeSector { center, radius, start, end, width, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.commands.push(DrawCommand::FillPolygon { points: points.to_vec(), color });
    }

    fn fill_text(&mut self, run: &TextRun<'_>) {
        self.commands.push(DrawCommand::Text {
            text: run.text.to_string(),
            origin: run.origin,
            rotation: run.rotation,
            offset: run.offset,
            align: run.align,
            font_px: run.font_px,
            color: run.color,
        });
    }
}
