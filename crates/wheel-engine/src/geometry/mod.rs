//! Pure wheel geometry: angle-to-section mapping and pixel layout.
//! No state, no drawing; the renderer and the outcome controller both build on it.

pub mod angle;
pub mod layout;

pub use angle::{
    angle_to_index, arc_bounds, arc_midpoint, forward_offset, normalize_angle,
    resting_rotation, section_angle, section_index_at_pointer, POINTER_ANGLE,
};
pub use layout::{WheelLayout, WheelStyle};
