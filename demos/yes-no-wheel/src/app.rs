use wheel_engine::host::HISTORY_KEY;
use wheel_engine::*;

/// Labels always shown on the scoreboard, even before the first spin.
const ANSWERS: [&str; 2] = ["Yes", "No"];

/// Ask a question, spin Yes/No, keep a persistent log of the answers.
pub struct YesNoWheel;

impl YesNoWheel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for YesNoWheel {
    fn default() -> Self {
        Self::new()
    }
}

impl WheelApp for YesNoWheel {
    fn config(&self) -> WheelConfig {
        WheelConfig {
            history_key: Some(HISTORY_KEY.to_string()),
            ..WheelConfig::default()
        }
    }

    // The wheel starts out as Yes/No, so only the scoreboard needs setting up.
    fn init(&mut self, ctx: &mut WheelContext) {
        ctx.session = ctx.session.clone().with_tally_labels(ANSWERS);
        log::info!(
            "yes/no wheel ready, {} answers on record",
            ctx.session.history().len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spin_to_rest(wheel: &mut Wheel<YesNoWheel>, surface: &mut RecordingSurface, start: f64) -> String {
        let token = wheel.spin(start).unwrap().expect("wheel is idle");
        let mut now = start;
        while wheel.on_frame(surface, token, now) != FrameStep::Done {
            now += 16.0;
        }
        wheel.winner().expect("winner shown at rest").to_string()
    }

    #[test]
    fn restores_history_and_counts_from_storage() {
        let mut store = MemoryStore::new();
        let stored = r#"[
            {"question":"Pizza?","answer":"Yes","timestamp":3},
            {"question":"Walk?","answer":"Yes","timestamp":2},
            {"question":"Nap?","answer":"No","timestamp":1}
        ]"#;
        store.set(HISTORY_KEY, stored).unwrap();

        let wheel = Wheel::new(YesNoWheel::new(), Box::new(store)).unwrap();
        let session = &wheel.context().session;
        assert_eq!(session.history().len(), 3);
        assert_eq!(session.tally().count("Yes"), 2);
        assert_eq!(session.tally().count("No"), 1);
        assert_eq!(wheel.sections().label(0), Some("Yes"));
    }

    #[test]
    fn answers_are_logged_under_the_question() {
        let mut wheel = Wheel::new(YesNoWheel::new(), Box::new(MemoryStore::new())).unwrap();
        let mut surface = RecordingSurface::new(300, 300);
        wheel.set_question("Learn Rust?");

        let answer = spin_to_rest(&mut wheel, &mut surface, 0.0);
        assert!(ANSWERS.contains(&answer.as_str()));

        let history = wheel.context().session.history();
        let latest = history.latest().expect("entry recorded");
        assert_eq!(latest.question, "Learn Rust?");
        assert_eq!(latest.answer, answer);

        let stored = wheel.context().store.get(HISTORY_KEY).unwrap().expect("history persisted");
        assert!(stored.contains("Learn Rust?"));
    }

    #[cfg(feature = "vectors")]
    #[test]
    fn mesh_export_follows_the_canvas_wheel() {
        let mut wheel = Wheel::new(YesNoWheel::new(), Box::new(MemoryStore::new())).unwrap();
        let mut mesh = VectorSurface::default();
        assert_eq!(wheel.tessellate(&mut mesh), DrawStatus::Skipped, "not laid out yet");

        let mut surface = RecordingSurface::new(0, 0);
        wheel.resize(&mut surface, 320.0, 240.0, 2.0);
        spin_to_rest(&mut wheel, &mut surface, 0.0);

        assert_eq!(wheel.tessellate(&mut mesh), DrawStatus::Drawn);
        assert_eq!(mesh.size(), (480, 480));
        assert_eq!(mesh.as_floats().len(), mesh.triangles().len() * VectorVertex::FLOATS);
        let labels: Vec<&str> = mesh.labels().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(labels, ANSWERS);
        assert!(mesh.labels_json().unwrap().contains(r#""text":"Yes""#));
        assert!(!wheel.is_spinning(), "tessellating leaves the spin state alone");
    }

    #[test]
    fn empty_scoreboard_lists_both_answers() {
        let wheel = Wheel::new(YesNoWheel::new(), Box::new(MemoryStore::unavailable())).unwrap();
        assert_eq!(wheel.tally_json().unwrap(), r#"{"No":0,"Yes":0}"#);
    }
}
