use super::app::WheelConfig;
use super::error::WheelError;
use super::types::{ConfettiBurst, SoundEvent, WheelEvent};
use crate::core::section::SectionList;
use crate::host::history::now_millis;
use crate::host::session::DecisionSession;
use crate::host::store::KeyValueStore;
use crate::outcome::SpinOutcome;

/// Mutable access to wheel state, passed to the app's hooks.
pub struct WheelContext {
    sections: SectionList,
    /// Set while a spin is in flight; the outcome was drawn from `sections`.
    sections_locked: bool,
    pub session: DecisionSession,
    pub store: Box<dyn KeyValueStore>,
    pub events: Vec<WheelEvent>,
    pub sound_enabled: bool,
    pub confetti_enabled: bool,
}

impl WheelContext {
    pub fn new(config: &WheelConfig, sections: SectionList, store: Box<dyn KeyValueStore>) -> Self {
        Self {
            sections,
            sections_locked: false,
            session: DecisionSession::new(config.history_capacity, config.history_key.clone()),
            store,
            events: Vec::new(),
            sound_enabled: config.sound_enabled,
            confetti_enabled: config.confetti_enabled,
        }
    }

    pub fn sections(&self) -> &SectionList {
        &self.sections
    }

    /// Replace the wheel's sections. Takes effect from the next draw.
    ///
    /// Refused while a spin is in flight, hooks included, so the wheel that
    /// is drawn is always the one the outcome was picked from.
    pub fn set_sections(&mut self, sections: SectionList) -> Result<(), WheelError> {
        if self.sections_locked {
            return Err(WheelError::SpinInProgress);
        }
        log::debug!("wheel now has {} sections", sections.len());
        self.sections = sections;
        Ok(())
    }

    pub(crate) fn lock_sections(&mut self, locked: bool) {
        self.sections_locked = locked;
    }

    /// Queue an event for the page.
    pub fn emit_event(&mut self, event: WheelEvent) {
        self.events.push(event);
    }

    /// Queue a sound, unless sound is off.
    pub fn emit_sound(&mut self, sound: SoundEvent) {
        if self.sound_enabled {
            self.events.push(WheelEvent::Sound { sound });
        }
    }

    /// Queue a confetti burst, unless confetti is off.
    pub fn emit_confetti(&mut self) {
        if self.confetti_enabled {
            self.events.push(WheelEvent::Confetti(ConfettiBurst::default()));
        }
    }

    /// Win sound and confetti.
    pub fn celebrate(&mut self) {
        self.emit_confetti();
        self.emit_sound(SoundEvent::Win);
    }

    /// Record an outcome in the session (winner, tally, history, storage)
    /// and celebrate it.
    pub fn record_outcome(&mut self, outcome: &SpinOutcome) {
        let entry = self
            .session
            .apply_outcome(&outcome.label, now_millis(), &mut *self.store);
        log::info!("\"{}\" -> {}", entry.question, entry.answer);
        self.celebrate();
    }

    /// Take all queued events.
    pub fn drain_events(&mut self) -> Vec<WheelEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::section::Section;
    use crate::host::store::MemoryStore;

    fn ctx(config: &WheelConfig) -> WheelContext {
        let sections = SectionList::new(vec![
            Section::with_hex("1", "Yes", "#4ade80").unwrap(),
            Section::with_hex("2", "No", "#f87171").unwrap(),
        ])
        .unwrap();
        WheelContext::new(config, sections, Box::new(MemoryStore::new()))
    }

    #[test]
    fn toggles_gate_side_effects() {
        let mut context = ctx(&WheelConfig::default());
        context.celebrate();
        assert_eq!(context.drain_events().len(), 2);

        context.sound_enabled = false;
        context.celebrate();
        let events = context.drain_events();
        assert_eq!(events, vec![WheelEvent::Confetti(ConfettiBurst::default())]);

        context.confetti_enabled = false;
        context.celebrate();
        assert!(context.drain_events().is_empty());
    }

    #[test]
    fn locked_sections_refuse_replacement() {
        let mut context = ctx(&WheelConfig::default());
        context.lock_sections(true);
        assert_eq!(
            context.set_sections(SectionList::yes_no()),
            Err(WheelError::SpinInProgress)
        );
        assert_eq!(context.sections().label(0), Some("Yes"));

        context.lock_sections(false);
        let three = SectionList::new(vec![
            Section::with_hex("a", "A", "#111111").unwrap(),
            Section::with_hex("b", "B", "#222222").unwrap(),
            Section::with_hex("c", "C", "#333333").unwrap(),
        ])
        .unwrap();
        context.set_sections(three).unwrap();
        assert_eq!(context.sections().len(), 3);
    }

    #[test]
    fn drain_empties_queue() {
        let mut context = ctx(&WheelConfig::default());
        context.emit_event(WheelEvent::Outcome { label: "Yes".into(), index: 0 });
        assert_eq!(context.drain_events().len(), 1);
        assert!(context.drain_events().is_empty());
    }
}
