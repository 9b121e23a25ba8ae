use serde::{Deserialize, Serialize};

use super::context::WheelContext;
use super::error::WheelError;
use crate::animation::{Easing, TurnRange};
use crate::host::history::DEFAULT_HISTORY_CAPACITY;
use crate::outcome::{FallbackPolicy, SpinOutcome, SpinSettings, DEFAULT_FALLBACK_GRACE_MS};

/// Shortest spin the UI offers, seconds.
pub const MIN_SPIN_SECS: f64 = 1.0;
/// Longest spin the UI offers, seconds.
pub const MAX_SPIN_SECS: f64 = 10.0;

/// Configuration for the wheel, provided by the app.
///
/// Deserializes with every field optional, so JS can pass a partial JSON
/// object of overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Spin duration in seconds (default: 3, range 1-10).
    pub spin_duration_secs: f64,
    /// Fewest full turns per spin (default: 5).
    pub min_turns: u32,
    /// Most full turns per spin (default: 10).
    pub max_turns: u32,
    /// Extra wait past the duration before the fallback settles a stalled
    /// spin, milliseconds (default: 500).
    pub fallback_grace_ms: f64,
    pub fallback: FallbackPolicy,
    /// Deceleration curve (default: cubic ease-out).
    pub easing: Easing,
    /// Answers kept in history (default: 20).
    pub history_capacity: usize,
    /// Storage key of the answer history. `None` keeps history in memory.
    pub history_key: Option<String>,
    pub sound_enabled: bool,
    pub confetti_enabled: bool,
    /// Fixed RNG seed for reproducible runs. Entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            spin_duration_secs: 3.0,
            min_turns: 5,
            max_turns: 10,
            fallback_grace_ms: DEFAULT_FALLBACK_GRACE_MS,
            fallback: FallbackPolicy::ReusePredetermined,
            easing: Easing::CubicOut,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            history_key: None,
            sound_enabled: true,
            confetti_enabled: true,
            seed: None,
        }
    }
}

impl WheelConfig {
    /// Parse JSON overrides on top of the defaults, then validate.
    pub fn from_json(json: &str) -> Result<Self, WheelError> {
        Self::default().with_overrides(json)
    }

    /// Apply a JSON object of overrides on top of `self`, then validate.
    /// Anything but an object is rejected; fields left out keep their
    /// current values.
    pub fn with_overrides(&self, json: &str) -> Result<Self, WheelError> {
        let serde_json::Value::Object(overrides) = serde_json::from_str(json)? else {
            return Err(WheelError::Parse("config overrides must be a JSON object".into()));
        };
        let serde_json::Value::Object(mut merged) = serde_json::to_value(self)? else {
            return Err(WheelError::Parse("config did not serialize to an object".into()));
        };
        merged.extend(overrides);
        let config: Self = serde_json::from_value(serde_json::Value::Object(merged))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), WheelError> {
        validate_duration(self.spin_duration_secs)?;
        self.turns().validate()?;
        if !self.fallback_grace_ms.is_finite() || self.fallback_grace_ms < 0.0 {
            return Err(WheelError::InvalidConfig(format!(
                "fallback grace must be a non-negative number of ms, got {}",
                self.fallback_grace_ms
            )));
        }
        if self.history_capacity == 0 {
            return Err(WheelError::InvalidConfig("history capacity must be at least 1".into()));
        }
        Ok(())
    }

    pub fn turns(&self) -> TurnRange {
        TurnRange { min: self.min_turns, max: self.max_turns }
    }

    /// Settings for the outcome controller.
    pub fn spin_settings(&self) -> SpinSettings {
        SpinSettings {
            duration_ms: self.spin_duration_secs * 1000.0,
            turns: self.turns(),
            easing: self.easing,
            fallback_grace_ms: self.fallback_grace_ms,
            fallback: self.fallback,
        }
    }
}

/// Check a spin duration against the range the UI allows.
pub fn validate_duration(secs: f64) -> Result<(), WheelError> {
    if !secs.is_finite() || !(MIN_SPIN_SECS..=MAX_SPIN_SECS).contains(&secs) {
        return Err(WheelError::InvalidDuration {
            got: secs,
            min: MIN_SPIN_SECS,
            max: MAX_SPIN_SECS,
        });
    }
    Ok(())
}

/// The contract every wheel page fulfills.
pub trait WheelApp {
    /// Return wheel configuration. Called once before init.
    fn config(&self) -> WheelConfig {
        WheelConfig::default()
    }

    /// Set the starting sections and session state.
    fn init(&mut self, ctx: &mut WheelContext);

    /// A spin was accepted. The winner has already been cleared.
    fn on_spin_start(&mut self, _ctx: &mut WheelContext) {}

    /// A spin finished. Default records it in the session and celebrates.
    fn on_outcome(&mut self, ctx: &mut WheelContext, outcome: &SpinOutcome) {
        ctx.record_outcome(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = WheelConfig::default();
        config.validate().unwrap();
        let settings = config.spin_settings();
        assert_eq!(settings.duration_ms, 3000.0);
        assert_eq!(settings.turns, TurnRange { min: 5, max: 10 });
        assert_eq!(settings.fallback_grace_ms, 500.0);
    }

    #[test]
    fn partial_json_overrides() {
        let config =
            WheelConfig::from_json(r#"{"spin_duration_secs": 5.5, "easing": "quart_out", "seed": 9}"#)
                .unwrap();
        assert_eq!(config.spin_duration_secs, 5.5);
        assert_eq!(config.easing, Easing::QuartOut);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.max_turns, 10);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(matches!(
            WheelConfig::from_json(r#"{"spin_duration_secs": 0.5}"#),
            Err(WheelError::InvalidDuration { .. })
        ));
        assert!(matches!(
            WheelConfig::from_json(r#"{"min_turns": 8, "max_turns": 6}"#),
            Err(WheelError::InvalidTurnRange { min: 8, max: 6 })
        ));
        assert!(WheelConfig::from_json(r#"{"history_capacity": 0}"#).is_err());
        assert!(WheelConfig::from_json(r#"{"fallback_grace_ms": -1}"#).is_err());
        assert!(matches!(WheelConfig::from_json("[]"), Err(WheelError::Parse(_))));
    }

    #[test]
    fn positional_arrays_are_not_configs() {
        assert!(matches!(WheelConfig::from_json("[5.0]"), Err(WheelError::Parse(_))));
        assert!(matches!(WheelConfig::from_json("[5.0, 6, 8]"), Err(WheelError::Parse(_))));
        assert!(matches!(WheelConfig::from_json("4"), Err(WheelError::Parse(_))));
        assert!(matches!(WheelConfig::from_json("null"), Err(WheelError::Parse(_))));
    }

    #[test]
    fn overrides_keep_unmentioned_fields() {
        let base = WheelConfig {
            spin_duration_secs: 5.0,
            history_key: Some("spins".into()),
            ..WheelConfig::default()
        };
        let next = base.with_overrides(r#"{"sound_enabled": false, "seed": null}"#).unwrap();
        assert_eq!(next.spin_duration_secs, 5.0);
        assert_eq!(next.history_key.as_deref(), Some("spins"));
        assert!(!next.sound_enabled);
        assert_eq!(next.seed, None);
        assert!(base.with_overrides(r#"{"max_turns": 2}"#).is_err());
    }

    #[test]
    fn duration_bounds_are_inclusive() {
        assert!(validate_duration(1.0).is_ok());
        assert!(validate_duration(10.0).is_ok());
        assert!(validate_duration(10.5).is_err());
        assert!(validate_duration(f64::NAN).is_err());
    }
}
