//! Synthesized feedback tones.
//!
//! Each sound is a single oscillator whose gain starts at `gain` and ramps
//! exponentially to [`RAMP_FLOOR`] over `duration_s`. Players (Web Audio in
//! `wheel-web`) just schedule what [`ToneSpec`] describes.

use super::types::SoundEvent;

/// Gain the envelope ramps down to. Exponential ramps cannot reach zero.
pub const RAMP_FLOOR: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
}

/// A frequency change at `at_s` seconds after the tone starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchStep {
    pub at_s: f32,
    pub hz: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToneSpec {
    pub waveform: Waveform,
    /// Pitch schedule; the first step starts at 0.
    pub steps: &'static [PitchStep],
    pub gain: f32,
    pub duration_s: f32,
}

const WIN_STEPS: [PitchStep; 3] = [
    PitchStep { at_s: 0.0, hz: 587.33 }, // D5
    PitchStep { at_s: 0.1, hz: 659.25 }, // E5
    PitchStep { at_s: 0.2, hz: 783.99 }, // G5
];
const CLICK_STEPS: [PitchStep; 1] = [PitchStep { at_s: 0.0, hz: 800.0 }];
const BEEP_STEPS: [PitchStep; 1] = [PitchStep { at_s: 0.0, hz: 440.0 }];

impl SoundEvent {
    pub fn tone(self) -> ToneSpec {
        match self {
            SoundEvent::Win => ToneSpec {
                waveform: Waveform::Sine,
                steps: &WIN_STEPS,
                gain: 0.5,
                duration_s: 0.8,
            },
            SoundEvent::Click => ToneSpec {
                waveform: Waveform::Square,
                steps: &CLICK_STEPS,
                gain: 0.2,
                duration_s: 0.1,
            },
            SoundEvent::Beep => ToneSpec {
                waveform: Waveform::Sine,
                steps: &BEEP_STEPS,
                gain: 0.3,
                duration_s: 0.3,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_climbs_three_notes() {
        let tone = SoundEvent::Win.tone();
        let hz: Vec<f32> = tone.steps.iter().map(|s| s.hz).collect();
        assert_eq!(hz, vec![587.33, 659.25, 783.99]);
        assert!(tone.steps.iter().all(|s| s.at_s < tone.duration_s));
    }

    #[test]
    fn every_tone_starts_above_the_ramp_floor() {
        for sound in [SoundEvent::Win, SoundEvent::Click, SoundEvent::Beep] {
            let tone = sound.tone();
            assert!(tone.gain > RAMP_FLOOR, "{sound:?}");
            assert_eq!(tone.steps[0].at_s, 0.0);
        }
        assert_eq!(SoundEvent::Beep.tone().steps[0].hz, 440.0);
    }

    #[test]
    fn click_is_square() {
        assert_eq!(SoundEvent::Click.tone().waveform, Waveform::Square);
    }
}
