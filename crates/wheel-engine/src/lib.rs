pub mod animation;
pub mod api;
pub mod core;
pub mod geometry;
pub mod host;
pub mod outcome;
pub mod renderer;

// Re-export key types at crate root for convenience
pub use animation::{DriverState, Easing, RequestId, SpinDriver, SpinPlan, SpinRequest, TurnRange};
pub use api::app::{validate_duration, WheelApp, WheelConfig, MAX_SPIN_SECS, MIN_SPIN_SECS};
pub use api::context::WheelContext;
pub use api::error::WheelError;
pub use api::sound::{PitchStep, ToneSpec, Waveform, RAMP_FLOOR};
pub use api::types::{ConfettiBurst, SoundEvent, WheelEvent};
pub use api::wheel::{FrameStep, Wheel};
pub use core::color::Color;
pub use core::section::{Section, SectionList, MIN_SECTIONS};
pub use core::time::FrameClock;
pub use geometry::{angle_to_index, section_index_at_pointer, WheelLayout, WheelStyle, POINTER_ANGLE};
pub use host::{
    DecisionSession, History, HistoryEntry, KeyValueStore, MemoryStore, SavedWheel,
    SectionEditor, Tally, Template,
};
pub use outcome::{
    FallbackPolicy, FastRng, OutcomeController, OutcomeSource, RandomSource, SpinOutcome,
    SpinSettings,
};
pub use renderer::{
    DrawStatus, RecordingSurface, RenderError, Surface, TextAlign, TextRun, Viewport, WheelRenderer,
};

#[cfg(feature = "vectors")]
pub use renderer::{TextLabel, VectorSurface, VectorVertex};
