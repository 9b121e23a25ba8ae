use wasm_bindgen::JsValue;
use web_sys::{AudioContext, OscillatorType};
use wheel_engine::{SoundEvent, ToneSpec, Waveform, RAMP_FLOOR};

/// Plays [`ToneSpec`]s through Web Audio.
///
/// The `AudioContext` is created on first use and resumed from [`warm`],
/// which callers invoke from a user gesture so autoplay policies let the
/// later win chime through. Any failure just means silence.
///
/// [`warm`]: TonePlayer::warm
#[derive(Default)]
pub struct TonePlayer {
    ctx: Option<AudioContext>,
    disabled: bool,
}

impl TonePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or resume the audio context.
    pub fn warm(&mut self) {
        if let Some(ctx) = self.context() {
            let _ = ctx.resume();
        }
    }

    pub fn play(&mut self, sound: SoundEvent) {
        let Some(ctx) = self.context() else { return };
        if let Err(err) = schedule(&ctx, &sound.tone()) {
            log::warn!("could not play {} sound: {err:?}", sound.name());
        }
    }

    fn context(&mut self) -> Option<AudioContext> {
        if self.disabled {
            return None;
        }
        if self.ctx.is_none() {
            match AudioContext::new() {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(err) => {
                    log::warn!("audio unavailable: {err:?}");
                    self.disabled = true;
                    return None;
                }
            }
        }
        self.ctx.clone()
    }

    pub fn close(&mut self) {
        if let Some(ctx) = self.ctx.take() {
            let _ = ctx.close();
        }
    }
}

fn schedule(ctx: &AudioContext, tone: &ToneSpec) -> Result<(), JsValue> {
    let osc = ctx.create_oscillator()?;
    let gain = ctx.create_gain()?;
    osc.set_type(match tone.waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
    });

    let now = ctx.current_time();
    let end = now + tone.duration_s as f64;
    for step in tone.steps {
        osc.frequency().set_value_at_time(step.hz, now + step.at_s as f64)?;
    }
    gain.gain().set_value_at_time(tone.gain, now)?;
    gain.gain().exponential_ramp_to_value_at_time(RAMP_FLOOR, end)?;

    osc.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&ctx.destination())?;
    osc.start_with_when(now)?;
    osc.stop_with_when(end)?;
    Ok(())
}
