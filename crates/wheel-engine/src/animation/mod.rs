pub mod driver;
pub mod easing;
pub mod request;

pub use driver::{DriverState, Frame, SpinComplete, SpinDriver};
pub use easing::{ease, lerp, Easing};
pub use request::{target_rotation, RequestId, SpinPlan, SpinRequest, TurnRange};
