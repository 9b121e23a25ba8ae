//! Canonical angle math for the wheel.
//!
//! Arc `i` of an `n`-section wheel at rotation `r` spans
//! `[i·Δ + r, (i+1)·Δ + r)` with `Δ = 2π/n`, angles measured clockwise on a
//! y-down surface starting from the positive x axis. The pointer is fixed at
//! the top of the wheel, `-π/2`.
//!
//! Every "which arc is at this angle" question in the crate goes through
//! [`angle_to_index`]. The renderer draws arcs from [`arc_bounds`], which is
//! its exact inverse, so what is drawn and what is looked up cannot disagree.

use std::f64::consts::{FRAC_PI_2, TAU};

/// Screen angle of the fixed pointer (top of the wheel).
pub const POINTER_ANGLE: f64 = -FRAC_PI_2;

/// Angular width of one section.
#[inline]
pub fn section_angle(count: usize) -> f64 {
    TAU / count.max(1) as f64
}

/// Reduce an unbounded angle to `[0, 2π)`.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Index of the arc containing screen angle `angle` when the wheel is at
/// `rotation`. The single angle-to-index formula of the crate.
pub fn angle_to_index(angle: f64, rotation: f64, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let relative = normalize_angle(angle - rotation);
    let index = (relative / section_angle(count)).floor() as usize;
    index.min(count - 1)
}

/// Index of the section under the pointer at `rotation`.
#[inline]
pub fn section_index_at_pointer(rotation: f64, count: usize) -> usize {
    angle_to_index(POINTER_ANGLE, rotation, count)
}

/// Start and end screen angles of arc `index`, as drawn.
/// The rotation is normalized first, so the result lies in `[0, 4π)`.
pub fn arc_bounds(index: usize, count: usize, rotation: f64) -> (f64, f64) {
    let delta = section_angle(count);
    let base = normalize_angle(rotation);
    let start = index as f64 * delta + base;
    (start, start + delta)
}

/// Screen angle of the bisector of arc `index` (where its label is drawn).
pub fn arc_midpoint(index: usize, count: usize, rotation: f64) -> f64 {
    let (start, end) = arc_bounds(index, count, rotation);
    (start + end) * 0.5
}

/// Rotation in `[0, 2π)` that puts the center of arc `index` under the pointer.
pub fn resting_rotation(index: usize, count: usize) -> f64 {
    let delta = section_angle(count);
    normalize_angle(POINTER_ANGLE - (index as f64 + 0.5) * delta)
}

/// Smallest non-negative forward offset from `current` to a rotation that is
/// congruent to `target` modulo 2π.
pub fn forward_offset(current: f64, target: f64) -> f64 {
    normalize_angle(target - current)
}
