// animation/request.rs
//
// One spin: where it starts, where it must stop, and how long it takes.

use std::fmt;
use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::easing::{ease, Easing};
use crate::api::error::WheelError;
use crate::geometry::{forward_offset, resting_rotation};

/// Identity of a spin request.
///
/// Handed to every deferred callback (frame, fallback timer) so that callbacks
/// belonging to a superseded or torn-down spin can recognise themselves as
/// stale. Ids increase monotonically per driver and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Inclusive range of full turns added to every spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRange {
    pub min: u32,
    pub max: u32,
}

impl TurnRange {
    pub fn new(min: u32, max: u32) -> Result<Self, WheelError> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<(), WheelError> {
        if self.min > self.max {
            return Err(WheelError::InvalidTurnRange { min: self.min, max: self.max });
        }
        Ok(())
    }

    /// Number of distinct turn counts in the range.
    pub fn span(&self) -> usize {
        (self.max.saturating_sub(self.min)) as usize + 1
    }
}

impl Default for TurnRange {
    fn default() -> Self {
        Self { min: 5, max: 10 }
    }
}

/// Everything needed to start a spin, decided before the driver is involved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPlan {
    /// Index that must end under the pointer.
    pub chosen_index: usize,
    pub section_count: usize,
    /// Full turns to add on top of the alignment offset.
    pub turns: u32,
    pub duration_ms: f64,
    pub easing: Easing,
}

/// Rotation a spin starting at `current` must end at so that `chosen_index`
/// rests under the pointer: the current rotation, plus whole turns, plus the
/// smallest non-negative offset to the section's resting angle.
pub fn target_rotation(current: f64, chosen_index: usize, section_count: usize, turns: u32) -> f64 {
    let rest = resting_rotation(chosen_index, section_count);
    current + turns as f64 * TAU + forward_offset(current, rest)
}

/// An in-flight spin. Owned by [`super::driver::SpinDriver`]; a new request
/// replaces it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinRequest {
    pub id: RequestId,
    pub chosen_index: usize,
    pub section_count: usize,
    pub start_rotation: f64,
    pub target_rotation: f64,
    /// Always `>= 0`.
    pub duration_ms: f64,
    pub start_ms: f64,
    pub easing: Easing,
}

impl SpinRequest {
    /// Build a request from a plan. Fails if the plan cannot produce a finite,
    /// reachable target.
    pub(crate) fn from_plan(
        id: RequestId,
        plan: SpinPlan,
        start_rotation: f64,
        start_ms: f64,
    ) -> Result<Self, WheelError> {
        if plan.section_count == 0 {
            return Err(WheelError::SpinSetup("wheel has no sections".into()));
        }
        if plan.chosen_index >= plan.section_count {
            return Err(WheelError::SpinSetup(format!(
                "chosen index {} out of range for {} sections",
                plan.chosen_index, plan.section_count
            )));
        }
        if !plan.duration_ms.is_finite() {
            return Err(WheelError::SpinSetup(format!(
                "duration {}ms is not finite",
                plan.duration_ms
            )));
        }
        if !start_rotation.is_finite() {
            return Err(WheelError::SpinSetup("current rotation is not finite".into()));
        }

        let target =
            target_rotation(start_rotation, plan.chosen_index, plan.section_count, plan.turns);
        if !target.is_finite() {
            return Err(WheelError::SpinSetup("target rotation is not finite".into()));
        }

        Ok(Self {
            id,
            chosen_index: plan.chosen_index,
            section_count: plan.section_count,
            start_rotation,
            target_rotation: target,
            duration_ms: plan.duration_ms.max(0.0),
            start_ms,
            easing: plan.easing,
        })
    }

    /// Normalized progress [0, 1] at `now_ms`. A zero duration is complete
    /// immediately.
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
        }
    }

    /// Eased rotation at `now_ms`. Exactly the target once progress reaches 1.
    pub fn rotation_at(&self, now_ms: f64) -> f64 {
        let t = self.progress(now_ms);
        if t >= 1.0 {
            self.target_rotation
        } else {
            ease(self.start_rotation, self.target_rotation, t, self.easing)
        }
    }

    /// Timestamp at which the animation is due to finish.
    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::section_index_at_pointer;

    fn plan(index: usize, count: usize, turns: u32, duration_ms: f64) -> SpinPlan {
        SpinPlan {
            chosen_index: index,
            section_count: count,
            turns,
            duration_ms,
            easing: Easing::CubicOut,
        }
    }

    #[test]
    fn target_lands_chosen_index() {
        for count in 2..=12 {
            for index in 0..count {
                for current in [0.0, 1.3, -7.9, 123.456] {
                    let target = target_rotation(current, index, count, 7);
                    assert_eq!(section_index_at_pointer(target, count), index);
                    let extra = target - current - 7.0 * TAU;
                    assert!((0.0..TAU).contains(&extra), "offset {extra} not minimal");
                }
            }
        }
    }

    #[test]
    fn target_always_moves_forward_by_whole_turns() {
        let target = target_rotation(2.0, 0, 4, 5);
        assert!(target >= 2.0 + 5.0 * TAU);
        assert!(target < 2.0 + 6.0 * TAU);
    }

    #[test]
    fn rotation_starts_and_ends_exactly() {
        let req = SpinRequest::from_plan(RequestId(1), plan(1, 2, 5, 4000.0), 0.5, 100.0).unwrap();
        assert_eq!(req.rotation_at(100.0), 0.5);
        assert_eq!(req.rotation_at(4100.0), req.target_rotation);
        assert_eq!(req.rotation_at(99_999.0), req.target_rotation);
        assert_eq!(req.end_ms(), 4100.0);
    }

    #[test]
    fn rotation_before_start_is_clamped() {
        let req = SpinRequest::from_plan(RequestId(1), plan(0, 3, 5, 1000.0), 0.0, 500.0).unwrap();
        assert_eq!(req.progress(0.0), 0.0);
        assert_eq!(req.rotation_at(0.0), 0.0);
    }

    #[test]
    fn zero_and_negative_durations_are_immediate() {
        let req = SpinRequest::from_plan(RequestId(1), plan(0, 2, 5, 0.0), 0.0, 10.0).unwrap();
        assert_eq!(req.progress(10.0), 1.0);
        let req = SpinRequest::from_plan(RequestId(2), plan(0, 2, 5, -50.0), 0.0, 10.0).unwrap();
        assert_eq!(req.duration_ms, 0.0);
    }

    #[test]
    fn bad_plans_are_rejected() {
        assert!(SpinRequest::from_plan(RequestId(1), plan(2, 2, 5, 1000.0), 0.0, 0.0).is_err());
        assert!(SpinRequest::from_plan(RequestId(1), plan(0, 0, 5, 1000.0), 0.0, 0.0).is_err());
        assert!(SpinRequest::from_plan(RequestId(1), plan(0, 2, 5, f64::NAN), 0.0, 0.0).is_err());
        assert!(
            SpinRequest::from_plan(RequestId(1), plan(0, 2, 5, 1000.0), f64::INFINITY, 0.0).is_err()
        );
    }

    #[test]
    fn turn_range_validation() {
        assert!(TurnRange::new(5, 10).is_ok());
        assert_eq!(TurnRange::default().span(), 6);
        assert_eq!(
            TurnRange::new(10, 5),
            Err(WheelError::InvalidTurnRange { min: 10, max: 5 })
        );
    }
}
