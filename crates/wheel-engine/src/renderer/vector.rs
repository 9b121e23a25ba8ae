//! Tessellated wheel for GPU hosts.
//!
//! [`VectorSurface`] turns the renderer's draw calls into one triangle list
//! with a color per vertex, ready to upload as a vertex buffer. Labels cannot
//! be tessellated; they are kept as [`TextLabel`]s for a text overlay.
//!
//! ```ignore
//! let mut mesh = VectorSurface::default();
//! wheel.tessellate(&mut mesh);
//! gpu.upload(mesh.as_floats());       // x, y, r, g, b, a per vertex
//! overlay.draw(mesh.labels_json()?);
//! ```

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::math::{point, Point};
use lyon::path::{Path, Winding};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor, TessellationError,
    VertexBuffers,
};
use serde::Serialize;

use super::surface::{RenderError, Surface, TextRun};
use crate::core::color::Color;

/// Triangle-list vertex: device-pixel position, then straight RGBA.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct VectorVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl VectorVertex {
    /// Floats per vertex in [`VectorSurface::as_floats`].
    pub const FLOATS: usize = 6;

    fn at(position: Point, color: Color) -> Self {
        Self {
            position: [position.x, position.y],
            color: [color.r, color.g, color.b, color.a],
        }
    }
}

/// A label for the host to draw over the mesh, as Canvas 2D would.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLabel {
    pub text: String,
    /// Where the text is anchored, device pixels, after rotation.
    pub anchor: [f32; 2],
    pub rotation: f32,
    pub align: &'static str,
    pub font_px: f32,
    pub bold: bool,
    /// CSS color string.
    pub color: String,
}

/// Flattened arcs stay within this many pixels of the true circle.
const TOLERANCE: f32 = 0.5;

/// Colors every vertex lyon emits for one path.
struct Paint(Color);

impl FillVertexConstructor<VectorVertex> for Paint {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        VectorVertex::at(vertex.position(), self.0)
    }
}

impl StrokeVertexConstructor<VectorVertex> for Paint {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> VectorVertex {
        VectorVertex::at(vertex.position(), self.0)
    }
}

/// [`Surface`] that tessellates with lyon. Each frame replaces the mesh.
pub struct VectorSurface {
    size: (u32, u32),
    fills: FillTessellator,
    strokes: StrokeTessellator,
    /// Indexed output of the path being tessellated.
    scratch: VertexBuffers<VectorVertex, u32>,
    triangles: Vec<VectorVertex>,
    labels: Vec<TextLabel>,
}

impl VectorSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            fills: FillTessellator::new(),
            strokes: StrokeTessellator::new(),
            scratch: VertexBuffers::new(),
            triangles: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Vertices of the last frame, three per triangle.
    pub fn triangles(&self) -> &[VectorVertex] {
        &self.triangles
    }

    /// The triangle list as flat floats, [`VectorVertex::FLOATS`] per vertex.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.triangles)
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    pub fn labels_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.labels)
    }

    /// Unroll the scratch buffers into the triangle list.
    fn collect(&mut self, tessellated: Result<(), TessellationError>, what: &str) {
        match tessellated {
            Ok(()) => {
                let VertexBuffers { vertices, indices } = &self.scratch;
                self.triangles
                    .extend(indices.iter().map(|&i| vertices[i as usize]));
            }
            Err(err) => log::warn!("could not tessellate {what}: {err:?}"),
        }
        self.scratch.vertices.clear();
        self.scratch.indices.clear();
    }

    fn fill(&mut self, path: &Path, color: Color, what: &str) {
        let done = self.fills.tessellate_path(
            path,
            &FillOptions::tolerance(TOLERANCE),
            &mut BuffersBuilder::new(&mut self.scratch, Paint(color)),
        );
        self.collect(done, what);
    }
}

/// Pie slice from `start` to `end` with the arc flattened to chords.
fn pie_slice(center: Vec2, radius: f32, start: f32, end: f32) -> Option<Path> {
    let sweep = end - start;
    if radius <= 0.0 || !(sweep > 0.0) {
        return None;
    }
    // Longest chord step whose sagitta stays within TOLERANCE.
    let step = 2.0 * (1.0 - (TOLERANCE / radius).min(1.0)).acos();
    let chords = if step > 0.0 {
        ((sweep / step).ceil() as usize).clamp(2, 256)
    } else {
        2
    };

    let mut path = Path::builder();
    path.begin(point(center.x, center.y));
    for k in 0..=chords {
        let (sin, cos) = (start + sweep * k as f32 / chords as f32).sin_cos();
        path.line_to(point(center.x + cos * radius, center.y + sin * radius));
    }
    path.close();
    Some(path.build())
}

impl Surface for VectorSurface {
    fn backend(&self) -> &'static str {
        "lyon"
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn begin_frame(&mut self) -> Result<(), RenderError> {
        self.triangles.clear();
        self.labels.clear();
        match self.size {
            (0, _) | (_, 0) => Err(RenderError::Unavailable("mesh has no size yet".into())),
            _ => Ok(()),
        }
    }

    fn fill_sector(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Color) {
        if let Some(slice) = pie_slice(center, radius, start, end) {
            self.fill(&slice, color, "sector");
        }
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
        let Some(slice) = pie_slice(center, radius, start, end) else { return };
        let done = self.strokes.tessellate_path(
            &slice,
            &StrokeOptions::tolerance(TOLERANCE).with_line_width(width),
            &mut BuffersBuilder::new(&mut self.scratch, Paint(color)),
        );
        self.collect(done, "sector outline");
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius > 0.0 {
            let mut path = Path::builder();
            path.add_circle(point(center.x, center.y), radius, Winding::Positive);
            self.fill(&path.build(), color, "hub");
        }
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        let [first, rest @ ..] = points else { return };
        if rest.len() < 2 {
            return;
        }
        let mut path = Path::builder();
        path.begin(point(first.x, first.y));
        for p in rest {
            path.line_to(point(p.x, p.y));
        }
        path.close();
        self.fill(&path.build(), color, "polygon");
    }

    fn fill_text(&mut self, run: &TextRun<'_>) {
        let anchor = run.origin + Vec2::from_angle(run.rotation).rotate(run.offset);
        self.labels.push(TextLabel {
            text: run.text.to_string(),
            anchor: anchor.to_array(),
            rotation: run.rotation,
            align: run.align.as_css(),
            font_px: run.font_px,
            bold: run.bold,
            color: run.color.to_css(),
        });
    }
}

impl Default for VectorSurface {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::section::Section;
    use crate::renderer::wheel::{DrawStatus, WheelRenderer};
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn vertex_layout_matches_float_view() {
        assert_eq!(std::mem::size_of::<VectorVertex>(), VectorVertex::FLOATS * 4);
        let mut surface = VectorSurface::new(100, 100);
        surface.begin_frame().unwrap();
        surface.fill_polygon(
            &[Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), Vec2::new(50.0, 100.0)],
            Color::new(0.1, 0.2, 0.3, 1.0),
        );
        assert_eq!(surface.triangles().len(), 3);
        let floats = surface.as_floats();
        assert_eq!(floats.len(), 3 * VectorVertex::FLOATS);
        assert_eq!(&floats[2..6], &[0.1, 0.2, 0.3, 1.0]);
    }

    #[test]
    fn half_wheel_sector_is_whole_triangles() {
        let mut surface = VectorSurface::new(200, 200);
        surface.begin_frame().unwrap();
        surface.fill_sector(Vec2::splat(100.0), 90.0, 0.0, PI, Color::BLACK);
        let count = surface.triangles().len();
        assert!(count >= 6);
        assert_eq!(count % 3, 0);
        assert!(surface
            .triangles()
            .iter()
            .all(|v| v.position[1] >= 100.0 - TOLERANCE));
    }

    #[test]
    fn degenerate_shapes_draw_nothing() {
        let mut surface = VectorSurface::new(200, 200);
        surface.begin_frame().unwrap();
        surface.fill_sector(Vec2::splat(100.0), 90.0, 1.0, 1.0, Color::BLACK);
        surface.fill_sector(Vec2::splat(100.0), 0.0, 0.0, 1.0, Color::BLACK);
        surface.fill_circle(Vec2::splat(100.0), 0.0, Color::BLACK);
        surface.fill_polygon(&[Vec2::ZERO, Vec2::ONE], Color::BLACK);
        assert!(surface.triangles().is_empty());
    }

    #[test]
    fn unsized_mesh_is_unavailable() {
        let mut surface = VectorSurface::default();
        assert!(surface.begin_frame().is_err());
    }

    #[test]
    fn label_anchor_follows_rotation() {
        let mut surface = VectorSurface::new(200, 200);
        surface.fill_text(&TextRun {
            text: "Yes",
            origin: Vec2::splat(100.0),
            rotation: FRAC_PI_2,
            offset: Vec2::new(50.0, 0.0),
            align: Default::default(),
            font_px: 18.0,
            bold: true,
            color: Color::WHITE,
            shadow: None,
        });
        let label = &surface.labels()[0];
        assert!((label.anchor[0] - 100.0).abs() < 1e-4);
        assert!((label.anchor[1] - 150.0).abs() < 1e-4);
        assert!(surface.labels_json().unwrap().contains(r#""fontPx":18.0"#));
    }

    #[test]
    fn wheel_mesh_carries_its_labels() {
        let sections = vec![
            Section::with_hex("1", "Yes", "#4ade80").unwrap(),
            Section::with_hex("2", "No", "#f87171").unwrap(),
        ];
        let mut renderer = WheelRenderer::default();
        let mut surface = VectorSurface::default();
        assert_eq!(
            renderer.resize(&mut surface, &sections, 256.0, 256.0, 1.0),
            DrawStatus::Drawn
        );
        assert!(!surface.triangles().is_empty());
        let texts: Vec<&str> = surface.labels().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Yes", "No"]);
    }
}
