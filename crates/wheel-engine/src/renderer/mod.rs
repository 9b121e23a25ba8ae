pub mod recording;
pub mod surface;
#[cfg(feature = "vectors")]
pub mod vector;
pub mod wheel;

// Re-export key types for convenient access
pub use recording::{DrawCommand, RecordingSurface};
pub use surface::{RenderError, Surface, TextAlign, TextRun};
#[cfg(feature = "vectors")]
pub use vector::{TextLabel, VectorSurface, VectorVertex};
pub use wheel::{draw_wheel, DrawStatus, Viewport, WheelRenderer};
