pub mod controller;
pub mod rng;

pub use controller::{
    FallbackPolicy, FrameUpdate, OutcomeController, OutcomeSource, SpinOutcome, SpinSettings,
    DEFAULT_FALLBACK_GRACE_MS,
};
pub use rng::{FastRng, RandomSource};
