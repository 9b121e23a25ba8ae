use glam::Vec2;

/// Pixel-space measurements of a wheel drawn on a square surface.
///
/// All lengths are in device pixels: the CSS-pixel constants below are
/// multiplied by the device pixel ratio so the wheel looks the same on
/// high-density displays, just sharper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelLayout {
    pub center: Vec2,
    pub radius: f32,
    /// Distance from the center to the right edge of each label.
    pub label_radius: f32,
    pub hub_radius: f32,
    pub outline_width: f32,
    pub dpr: f32,
    pub style: WheelStyle,
}

/// Full interactive wheel or a small catalog thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WheelStyle {
    #[default]
    Full,
    /// No labels, no pointer, thinner outline.
    Mini,
}

impl WheelStyle {
    fn rim_margin(self) -> f32 {
        match self {
            WheelStyle::Full => 10.0,
            WheelStyle::Mini => 5.0,
        }
    }

    fn hub_radius(self) -> f32 {
        match self {
            WheelStyle::Full => 15.0,
            WheelStyle::Mini => 8.0,
        }
    }

    fn outline_width(self) -> f32 {
        match self {
            WheelStyle::Full => 2.0,
            WheelStyle::Mini => 1.0,
        }
    }

    pub fn draws_labels(self) -> bool {
        self == WheelStyle::Full
    }

    pub fn draws_pointer(self) -> bool {
        self == WheelStyle::Full
    }
}

/// Inset of the label's right edge from the rim, CSS pixels.
const LABEL_INSET: f32 = 25.0;
/// Pointer triangle half-width and overhang past the rim, CSS pixels.
const POINTER_SIZE: f32 = 10.0;
/// Largest label font size, CSS pixels.
const MAX_FONT_PX: f32 = 18.0;
/// Font budget shared across a label's characters.
const FONT_BUDGET_PX: f32 = 240.0;
/// Labels shorter than this do not grow past the short-label size.
const MIN_FONT_CHARS: usize = 5;
/// Baseline offset so labels sit centered on the bisector.
const LABEL_BASELINE: f32 = 6.0;

impl WheelLayout {
    /// Lay out a wheel on a `width × height` device-pixel surface.
    pub fn new(width: u32, height: u32, dpr: f32, style: WheelStyle) -> Self {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        let (w, h) = (width as f32, height as f32);
        let radius = (w.min(h) * 0.5 - style.rim_margin() * dpr).max(0.0);
        Self {
            center: Vec2::new(w * 0.5, h * 0.5),
            radius,
            label_radius: (radius - LABEL_INSET * dpr).max(0.0),
            hub_radius: style.hub_radius() * dpr,
            outline_width: style.outline_width() * dpr,
            dpr,
            style,
        }
    }

    /// Font size for a label, in device pixels. Long labels shrink.
    pub fn font_px(&self, label: &str) -> f32 {
        let chars = label.chars().count().max(MIN_FONT_CHARS) as f32;
        MAX_FONT_PX.min(FONT_BUDGET_PX / chars) * self.dpr
    }

    /// Vertical nudge applied to label baselines, device pixels.
    pub fn label_baseline(&self) -> f32 {
        LABEL_BASELINE * self.dpr
    }

    /// Pointer triangle: tip above the rim, base just inside it.
    pub fn pointer_triangle(&self) -> [Vec2; 3] {
        let s = POINTER_SIZE * self.dpr;
        let top = self.center.y - self.radius;
        [
            Vec2::new(self.center.x, top - s),
            Vec2::new(self.center.x - s, top + s),
            Vec2::new(self.center.x + s, top + s),
        ]
    }

    /// Whether the surface is large enough to draw anything.
    pub fn is_drawable(&self) -> bool {
        self.radius > 0.0
    }
}
