//! Audio system using Web Audio API
//!
//! Procedurally generated tones - no external files needed!
//!
//! The simulation never calls into audio. The session maps each
//! [`GameEvent`] to an optional [`SoundEffect`] with [`cue_for`] and hands it
//! to an [`AudioSink`]. Sinks must never fail loudly: a missing backend just
//! means silence.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits a side wall or the ceiling
    WallHit,
    /// Ball hits paddle
    PaddleHit,
    /// Paddle narrowed by difficulty scaling
    LevelUp,
    /// Ball fell through the floor
    GameOver,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

/// How the gain falls off over the tone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// Exponential decay to near silence
    Exponential,
    /// Straight line to zero
    Linear,
}

/// Everything needed to synthesize one cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    /// Start frequency in Hz
    pub frequency: f32,
    /// Frequency at the end of the tone, if it sweeps
    pub sweep_to: Option<f32>,
    /// Seconds
    pub duration: f32,
    /// Peak gain before settings are applied
    pub volume: f32,
    pub envelope: Envelope,
}

impl SoundEffect {
    /// Synthesis parameters for this effect
    pub fn tone(self) -> Tone {
        match self {
            SoundEffect::WallHit => Tone {
                waveform: Waveform::Sine,
                frequency: 440.0,
                sweep_to: None,
                duration: 0.08,
                volume: 0.05,
                envelope: Envelope::Exponential,
            },
            SoundEffect::PaddleHit => Tone {
                waveform: Waveform::Triangle,
                frequency: 660.0,
                sweep_to: None,
                duration: 0.15,
                volume: 0.15,
                envelope: Envelope::Exponential,
            },
            SoundEffect::LevelUp => Tone {
                waveform: Waveform::Square,
                frequency: 880.0,
                sweep_to: None,
                duration: 0.12,
                volume: 0.08,
                envelope: Envelope::Exponential,
            },
            // Descending growl
            SoundEffect::GameOver => Tone {
                waveform: Waveform::Sawtooth,
                frequency: 220.0,
                sweep_to: Some(40.0),
                duration: 1.0,
                volume: 0.2,
                envelope: Envelope::Linear,
            },
        }
    }
}

/// Which cue, if any, an event should trigger
pub fn cue_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::WallHit(_) => Some(SoundEffect::WallHit),
        GameEvent::PaddleHit { .. } => Some(SoundEffect::PaddleHit),
        GameEvent::PaddleShrunk { .. } => Some(SoundEffect::LevelUp),
        GameEvent::GameOver(_) => Some(SoundEffect::GameOver),
        GameEvent::MetricsChanged(_) | GameEvent::HighScore(_) => None,
    }
}

/// Something that can play cues
pub trait AudioSink {
    /// Fire and forget
    fn play(&self, effect: SoundEffect);
    /// Overall gain multiplier (0.0 mutes)
    fn set_volume(&mut self, volume: f32);
}

/// Sink that plays nothing
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&self, _effect: SoundEffect) {}
    fn set_volume(&mut self, _volume: f32) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, Envelope, SoundEffect, Tone, Waveform};

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, volume: 1.0 }
        }

        /// Create an oscillator wired through a gain node
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

        fn play_tone(&self, ctx: &AudioContext, tone: Tone) {
            let osc_type = match tone.waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Triangle => OscillatorType::Triangle,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
            };
            let Some((osc, gain)) = self.create_osc(ctx, tone.frequency, osc_type) else {
                return;
            };
            let t = ctx.current_time();
            let end = t + f64::from(tone.duration);

            osc.frequency().set_value_at_time(tone.frequency, t).ok();
            if let Some(target) = tone.sweep_to {
                osc.frequency()
                    .exponential_ramp_to_value_at_time(target, end)
                    .ok();
            }

            gain.gain()
                .set_value_at_time(tone.volume * self.volume, t)
                .ok();
            match tone.envelope {
                Envelope::Exponential => {
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.0001, end)
                        .ok();
                }
                Envelope::Linear => {
                    gain.gain().linear_ramp_to_value_at_time(0.0, end).ok();
                }
            }

            osc.start().ok();
            osc.stop_with_when(end).ok();
        }
    }

    impl AudioSink for AudioManager {
        fn play(&self, effect: SoundEffect) {
            if self.volume <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            self.play_tone(ctx, effect.tone());
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }
}
