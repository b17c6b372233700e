//! Web Audio alarm: square-wave bursts repeated on a fixed interval.
//!
//! Every platform failure here (no `AudioContext`, autoplay blocked, a node
//! that refuses to start) is logged and swallowed. The timers keep working
//! without sound.

use crate::alarm::AlarmSink;
use crate::config::{ALARM_GAIN, ALARM_REPEAT_MS, ALARM_TONE_HZ, ALARM_TONE_MS};
use gloo_timers::callback::Interval;
use log::{debug, warn};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use web_sys::{AudioContext, AudioContextState, AudioScheduledSourceNode, OscillatorNode, OscillatorType};

/// The oscillator of the burst currently sounding, if any.
type Voice = Rc<RefCell<Option<OscillatorNode>>>;

#[derive(Default)]
pub struct WebAudioAlarm {
    ctx: Option<AudioContext>,
    repeat: Option<Interval>,
    voice: Voice,
}

impl WebAudioAlarm {
    pub fn new() -> Self {
        Self::default()
    }

    /// The audio context, created on first use and resumed if the browser
    /// suspended it.
    fn context(&mut self) -> Option<AudioContext> {
        if self.ctx.is_none() {
            match AudioContext::new() {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(e) => {
                    warn!("Audio unavailable: {:?}", e);
                    return None;
                }
            }
        }
        let ctx = self.ctx.clone()?;
        if ctx.state() == AudioContextState::Suspended {
            if let Err(e) = ctx.resume() {
                warn!("Could not resume audio: {:?}", e);
            }
        }
        Some(ctx)
    }
}

impl AlarmSink for WebAudioAlarm {
    fn play(&mut self) {
        if self.repeat.is_some() {
            return;
        }
        let Some(ctx) = self.context() else {
            return;
        };

        burst(&ctx, &self.voice);
        let voice = Rc::clone(&self.voice);
        self.repeat = Some(Interval::new(ALARM_REPEAT_MS, move || {
            burst(&ctx, &voice);
        }));
    }

    fn stop(&mut self) {
        // Dropping the interval cancels it.
        self.repeat = None;
        silence(&self.voice);
    }

    fn prime(&mut self) {
        let _ = self.context();
    }
}

/// Sound one tone burst, cutting off any burst still ringing.
fn burst(ctx: &AudioContext, voice: &Voice) {
    silence(voice);
    match start_tone(ctx) {
        Ok(osc) => *voice.borrow_mut() = Some(osc),
        Err(e) => warn!("Alarm tone failed: {:?}", e),
    }
}

fn start_tone(ctx: &AudioContext) -> Result<OscillatorNode, JsValue> {
    let osc = ctx.create_oscillator()?;
    osc.set_type(OscillatorType::Square);
    osc.frequency().set_value(ALARM_TONE_HZ);

    let gain = ctx.create_gain()?;
    gain.gain().set_value(ALARM_GAIN);

    osc.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&ctx.destination())?;

    let source: &AudioScheduledSourceNode = &osc;
    source.start()?;
    source.stop_with_when(ctx.current_time() + ALARM_TONE_MS as f64 / 1000.0)?;
    Ok(osc)
}

/// Stop the in-flight tone. A tone that already ended on its own rejects the
/// stop call; that is expected and ignored.
fn silence(voice: &Voice) {
    if let Some(osc) = voice.borrow_mut().take() {
        let source: &AudioScheduledSourceNode = &osc;
        if source.stop().is_err() {
            debug!("tone had already finished");
        }
    }
}
