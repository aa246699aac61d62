//! Audio system using Web Audio API
//!
//! Procedurally generated beeps - no external files needed. Native builds
//! have no audio context and every call is a no-op.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Box tapped
    Tap,
    /// Box hit a wall
    Bounce,
    /// Box reached a corner
    GameOver,
    /// Achievement unlocked
    Achievement,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

/// One oscillator burst: starts at `delay`, decays over `duration` seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    pub duration: f64,
    pub wave: Waveform,
    pub delay: f64,
}

const fn tone(freq: f32, duration: f64, wave: Waveform, delay: f64) -> Tone {
    Tone {
        freq,
        duration,
        wave,
        delay,
    }
}

/// Starting gain of every tone before the exponential decay
#[cfg(target_arch = "wasm32")]
const TONE_GAIN: f32 = 0.3;
/// Gain the decay ramps down to
#[cfg(target_arch = "wasm32")]
const TONE_FLOOR: f32 = 0.01;

impl SoundEffect {
    /// Tone sequence for this effect
    pub fn tones(&self) -> &'static [Tone] {
        const TAP: [Tone; 1] = [tone(800.0, 0.1, Waveform::Sine, 0.0)];
        const BOUNCE: [Tone; 1] = [tone(400.0, 0.05, Waveform::Square, 0.0)];
        const GAME_OVER: [Tone; 2] = [
            tone(200.0, 0.3, Waveform::Sawtooth, 0.0),
            tone(150.0, 0.5, Waveform::Sawtooth, 0.1),
        ];
        const ACHIEVEMENT: [Tone; 2] = [
            tone(1200.0, 0.1, Waveform::Sine, 0.0),
            tone(1400.0, 0.15, Waveform::Sine, 0.1),
        ];

        match self {
            SoundEffect::Tap => &TAP,
            SoundEffect::Bounce => &BOUNCE,
            SoundEffect::GameOver => &GAME_OVER,
            SoundEffect::Achievement => &ACHIEVEMENT,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx }
    }

    pub fn is_available(&self) -> bool {
        self.ctx.is_some()
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        for t in effect.tones() {
            self.play_tone(ctx, t);
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    fn play_tone(&self, ctx: &AudioContext, tone: &Tone) {
        let osc_type = match tone.wave {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Square => OscillatorType::Square,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
        };
        let Some((osc, gain)) = self.create_osc(ctx, tone.freq, osc_type) else {
            return;
        };
        let t = ctx.current_time() + tone.delay;

        gain.gain().set_value_at_time(TONE_GAIN, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(TONE_FLOOR, t + tone.duration)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + tone.duration).ok();
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl AudioManager {
    pub fn new() -> Self {
        Self {}
    }

    pub fn is_available(&self) -> bool {
        false
    }

    pub fn resume(&self) {}

    pub fn play(&self, effect: SoundEffect) {
        log::trace!("audio unavailable, dropping {:?}", effect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_over_is_two_descending_saws() {
        let tones = SoundEffect::GameOver.tones();
        assert_eq!(tones.len(), 2);
        assert!(tones.iter().all(|t| t.wave == Waveform::Sawtooth));
        assert!(tones[0].freq > tones[1].freq);
        assert_eq!(tones[1].delay, 0.1);
    }

    #[test]
    fn test_single_tone_effects_start_immediately() {
        for effect in [SoundEffect::Tap, SoundEffect::Bounce] {
            let tones = effect.tones();
            assert_eq!(tones.len(), 1);
            assert_eq!(tones[0].delay, 0.0);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_native_manager_is_unavailable() {
        let audio = AudioManager::new();
        assert!(!audio.is_available());
        audio.play(SoundEffect::Tap);
    }
}
