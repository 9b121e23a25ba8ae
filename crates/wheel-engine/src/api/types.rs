use serde::{Deserialize, Serialize};

use crate::animation::RequestId;

/// A sound the host should play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundEvent {
    /// Celebratory chime when a result is shown.
    Win,
    /// Short UI click (e.g. after saving a wheel).
    Click,
    Beep,
}

impl SoundEvent {
    pub fn name(self) -> &'static str {
        match self {
            SoundEvent::Win => "win",
            SoundEvent::Click => "click",
            SoundEvent::Beep => "beep",
        }
    }
}

/// Confetti burst parameters, in the units of the page's confetti helper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfettiBurst {
    pub particle_count: u32,
    /// Spread angle, degrees.
    pub spread: f32,
    /// Vertical origin as a fraction of the viewport height.
    pub origin_y: f32,
}

impl Default for ConfettiBurst {
    fn default() -> Self {
        Self {
            particle_count: 100,
            spread: 70.0,
            origin_y: 0.6,
        }
    }
}

/// An event handed from the wheel to the page, drained as a JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WheelEvent {
    /// A spin finished on `label`.
    Outcome { label: String, index: usize },
    Confetti(ConfettiBurst),
    Sound { sound: SoundEvent },
    /// A spin did not finish on time and was settled by the fallback.
    Stalled { request: RequestId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_tagged() {
        let events = vec![
            WheelEvent::Outcome { label: "No".into(), index: 1 },
            WheelEvent::Confetti(ConfettiBurst::default()),
            WheelEvent::Sound { sound: SoundEvent::Win },
            WheelEvent::Stalled { request: RequestId(3) },
        ];
        let json = serde_json::to_string(&events).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"[{"type":"outcome","label":"No","index":1},"#,
                r#"{"type":"confetti","particle_count":100,"spread":70.0,"origin_y":0.6},"#,
                r#"{"type":"sound","sound":"win"},"#,
                r#"{"type":"stalled","request":3}]"#
            )
        );
    }

    #[test]
    fn sound_names() {
        assert_eq!(SoundEvent::Click.name(), "click");
        let parsed: SoundEvent = serde_json::from_str("\"beep\"").unwrap();
        assert_eq!(parsed, SoundEvent::Beep);
    }
}
