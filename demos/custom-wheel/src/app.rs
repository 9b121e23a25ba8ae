use wheel_engine::host::now_millis;
use wheel_engine::host::templates::{self, SavedWheel, Template};
use wheel_engine::*;

/// The editor's default spin length, seconds.
const EDITOR_SPIN_SECS: f64 = 5.0;

/// A user-built wheel: editable sections, templates and saved wheels.
///
/// Results are shown and celebrated but not logged.
pub struct CustomWheel {
    editor: SectionEditor,
    rng: fastrand::Rng,
}

impl CustomWheel {
    pub fn new() -> Self {
        Self {
            editor: SectionEditor::starter(),
            rng: fastrand::Rng::new(),
        }
    }

    pub fn editor(&self) -> &SectionEditor {
        &self.editor
    }
}

impl Default for CustomWheel {
    fn default() -> Self {
        Self::new()
    }
}

impl WheelApp for CustomWheel {
    fn config(&self) -> WheelConfig {
        WheelConfig {
            spin_duration_secs: EDITOR_SPIN_SECS,
            ..WheelConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut WheelContext) {
        if let Some(template) = templates::take_stashed_template(&mut *ctx.store) {
            match SectionEditor::from_template(&template) {
                Ok(editor) => {
                    log::info!("editing template `{}`", template.id);
                    self.editor = editor;
                }
                Err(err) => log::warn!("template `{}` unusable: {err}", template.id),
            }
        }
        if let Err(err) = ctx.set_sections(self.editor.sections().clone()) {
            log::error!("editor wheel not shown: {err}");
        }
    }

    fn on_outcome(&mut self, ctx: &mut WheelContext, outcome: &SpinOutcome) {
        ctx.session.show_winner(outcome.label.clone());
        ctx.celebrate();
    }
}

/// Run an editor change and put the result on the wheel. Refused mid-spin.
/// A refused edit beeps.
fn edit<R>(
    wheel: &mut Wheel<CustomWheel>,
    f: impl FnOnce(&mut CustomWheel) -> Result<R, WheelError>,
) -> Result<R, WheelError> {
    let spinning = wheel.is_spinning();
    let (app, ctx) = wheel.parts_mut();
    let result = if spinning {
        Err(WheelError::SpinInProgress)
    } else {
        f(&mut *app).and_then(|result| {
            ctx.set_sections(app.editor.sections().clone())?;
            Ok(result)
        })
    };
    if let Err(err) = &result {
        log::debug!("edit refused: {err}");
        ctx.emit_sound(SoundEvent::Beep);
    }
    result
}

pub fn add_section(wheel: &mut Wheel<CustomWheel>) -> Result<Section, WheelError> {
    edit(wheel, |app| Ok(app.editor.add(&mut app.rng).clone()))
}

pub fn update_section(
    wheel: &mut Wheel<CustomWheel>,
    id: &str,
    label: &str,
    color_hex: &str,
) -> Result<(), WheelError> {
    let color = Color::from_hex(color_hex)?;
    edit(wheel, |app| app.editor.update(id, label, color))
}

pub fn remove_section(wheel: &mut Wheel<CustomWheel>, id: &str) -> Result<Section, WheelError> {
    edit(wheel, |app| app.editor.remove(id))
}

pub fn set_name(wheel: &mut Wheel<CustomWheel>, name: &str) {
    wheel.parts_mut().0.editor.set_name(name);
}

pub fn apply_template(wheel: &mut Wheel<CustomWheel>, template: &Template) -> Result<(), WheelError> {
    edit(wheel, |app| {
        app.editor = SectionEditor::from_template(template)?;
        Ok(())
    })
}

/// Hand a catalog template to the editor page through storage.
pub fn choose_template(wheel: &mut Wheel<CustomWheel>, id: &str) -> Result<Template, WheelError> {
    let template = templates::find(id).ok_or_else(|| WheelError::InvalidConfig(format!("no template `{id}`")))?;
    let (_, ctx) = wheel.parts_mut();
    templates::stash_template(&mut *ctx.store, &template)?;
    Ok(template)
}

/// Save the editor's wheel and click.
pub fn save(wheel: &mut Wheel<CustomWheel>) -> Result<SavedWheel, WheelError> {
    let (app, ctx) = wheel.parts_mut();
    let saved = templates::save_wheel(
        &mut *ctx.store,
        app.editor.name(),
        app.editor.sections(),
        now_millis(),
    )?;
    ctx.emit_sound(SoundEvent::Click);
    Ok(saved)
}

pub fn saved(wheel: &Wheel<CustomWheel>) -> Vec<SavedWheel> {
    templates::saved_wheels(&*wheel.context().store)
}

/// Load a saved wheel into the editor.
pub fn open_saved(wheel: &mut Wheel<CustomWheel>, id: &str) -> Result<(), WheelError> {
    let found = saved(wheel)
        .into_iter()
        .find(|w| w.id == id)
        .ok_or_else(|| WheelError::InvalidConfig(format!("no saved wheel `{id}`")))?;
    edit(wheel, |app| {
        app.editor = SectionEditor::new(found.name, SectionList::new(found.sections)?);
        Ok(())
    })
}
