//! Web Audio playback

use rand::SeedableRng;
use rand_pcg::Pcg32;
use web_sys::{AudioBuffer, AudioBufferSourceNode, AudioContext, GainNode};

use super::synth::{self, SAMPLE_RATE};
use super::{Mix, SoundEffect};

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    mix: Mix,
    /// Pitch jitter source; sound variation is not part of the replayable sim
    rng: Pcg32,
}

impl AudioManager {
    pub fn new(mix: Mix) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
        Self {
            ctx,
            mix,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.mix.muted = muted;
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.mix.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let mut samples = synth::render(&effect.params(), 1.0, &mut self.rng);
        if Self::start_buffer(ctx, &mut samples, vol).is_none() {
            log::debug!("Dropped sound {:?}", effect);
        }
    }

    /// Upload samples and start a one-shot source through a gain node
    fn start_buffer(ctx: &AudioContext, samples: &mut [f32], vol: f32) -> Option<()> {
        let buffer: AudioBuffer = ctx
            .create_buffer(1, samples.len() as u32, SAMPLE_RATE as f32)
            .ok()?;
        buffer.copy_to_channel(samples, 0).ok()?;

        let source: AudioBufferSourceNode = ctx.create_buffer_source().ok()?;
        source.set_buffer(Some(&buffer));

        let gain: GainNode = ctx.create_gain().ok()?;
        gain.gain().set_value(vol);

        source.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;
        source.start().ok()
    }
}
