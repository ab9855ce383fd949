use emdr_core::{SoundCue, TONE_ATTACK_SEC, TONE_DURATION_SEC, TONE_FREQUENCY_HZ, TONE_GAIN};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Rewinds and plays a recorded plink from an `<audio>` element.
pub struct SampleSound {
    audio: web::HtmlAudioElement,
}

impl SampleSound {
    pub fn new(audio: web::HtmlAudioElement) -> Self {
        Self { audio }
    }
}

impl SoundCue for SampleSound {
    fn play(&mut self) {
        self.audio.set_current_time(0.0);
        match self.audio.play() {
            // autoplay policy rejects playback until the user has interacted
            Ok(promise) => spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::debug!("[sound] plink rejected: {:?}", e);
                }
            }),
            Err(e) => log::warn!("[sound] play error: {:?}", e),
        }
    }
}

/// Synthesizes a short sine plink per bounce. The AudioContext is created
/// on first use so construction never needs a user gesture.
#[derive(Default)]
pub struct ToneSound {
    ctx: Option<web::AudioContext>,
}

impl ToneSound {
    pub fn new() -> Self {
        Self::default()
    }

    fn context(&mut self) -> Option<&web::AudioContext> {
        if self.ctx.is_none() {
            match web::AudioContext::new() {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(e) => {
                    log::error!("[sound] AudioContext error: {:?}", e);
                    return None;
                }
            }
        }
        self.ctx.as_ref()
    }
}

impl SoundCue for ToneSound {
    fn play(&mut self) {
        let Some(ctx) = self.context() else {
            return;
        };
        if ctx.state() == web::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        trigger_plink(ctx, TONE_FREQUENCY_HZ, TONE_GAIN, TONE_DURATION_SEC as f64);
    }
}

// Fire a one-shot sine with a short attack and linear release
pub fn trigger_plink(audio_ctx: &web::AudioContext, frequency_hz: f32, gain: f32, duration_sec: f64) {
    let Ok(src) = web::OscillatorNode::new(audio_ctx) else {
        log::warn!("[sound] OscillatorNode unavailable");
        return;
    };
    src.set_type(web::OscillatorType::Sine);
    src.frequency().set_value(frequency_hz);
    let Ok(g) = web::GainNode::new(audio_ctx) else {
        log::warn!("[sound] GainNode unavailable");
        return;
    };
    g.gain().set_value(0.0);
    let t0 = audio_ctx.current_time() + 0.005;
    let _ = g
        .gain()
        .linear_ramp_to_value_at_time(gain, t0 + TONE_ATTACK_SEC as f64);
    let _ = g.gain().linear_ramp_to_value_at_time(0.0, t0 + duration_sec);
    let _ = src.connect_with_audio_node(&g);
    let _ = g.connect_with_audio_node(&audio_ctx.destination());
    let _ = src.start_with_when(t0);
    let _ = src.stop_with_when(t0 + duration_sec + 0.02);
}
