//! Explosion audio
//!
//! The blast is a procedurally generated noise burst - no external files
//! needed. Sample synthesis is plain Rust; playback goes through the Web
//! Audio API and is optional: if the browser refuses, we log and carry on.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Length of the explosion burst (seconds)
pub const EXPLOSION_SECONDS: f32 = 1.5;
/// Amplitude decay rate of the burst envelope (1/s)
const EXPLOSION_DECAY: f32 = 4.0;

/// Synthesize a mono explosion burst: white noise under an exponential
/// envelope, passed through a one-pole lowpass that closes over time so
/// the crack turns into a rumble.
pub fn explosion_samples(sample_rate: f32, seed: u64) -> Vec<f32> {
    let len = (sample_rate * EXPLOSION_SECONDS).max(0.0) as usize;
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut samples = Vec::with_capacity(len);
    let mut filtered = 0.0_f32;

    for i in 0..len {
        let t = i as f32 / sample_rate;
        let envelope = (-t * EXPLOSION_DECAY).exp();
        // Filter coefficient: bright at the start, dark at the tail
        let alpha = (0.9 * (-t * 3.0).exp()).max(0.05);
        let noise: f32 = rng.random_range(-1.0..1.0);
        filtered += alpha * (noise - filtered);
        samples.push((filtered * envelope).clamp(-1.0, 1.0));
    }

    samples
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::Cell;

    use wasm_bindgen::JsValue;
    use web_sys::{AudioContext, AudioContextState, BiquadFilterType, OscillatorType};

    use super::explosion_samples;

    /// Audio manager for the demo
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        bursts: Cell<u64>,
    }

    impl AudioManager {
        pub fn new(volume: f32) -> Self {
            // May fail outside a secure context or without audio hardware
            let ctx = match AudioContext::new() {
                Ok(ctx) => Some(ctx),
                Err(e) => {
                    log::warn!("Failed to create AudioContext - audio disabled: {:?}", e);
                    None
                }
            };
            Self {
                ctx,
                volume: volume.clamp(0.0, 1.0),
                bursts: Cell::new(0),
            }
        }

        pub fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }

        /// Play the explosion burst; failures are logged and ignored
        pub fn play_explosion(&self) {
            if let Err(e) = self.try_play_explosion() {
                log::warn!("Explosion sound failed: {:?}", e);
            }
        }

        /// Short beep when the fuse is lit
        pub fn play_armed(&self) {
            if let Err(e) = self.try_play_beep(880.0, 0.12) {
                log::warn!("Fuse beep failed: {:?}", e);
            }
        }

        fn try_play_explosion(&self) -> Result<(), JsValue> {
            let Some(ctx) = &self.ctx else { return Ok(()) };
            if self.volume <= 0.0 {
                return Ok(());
            }
            self.resume();

            let seed = self.bursts.get();
            self.bursts.set(seed.wrapping_add(1));

            let sample_rate = ctx.sample_rate();
            let samples = explosion_samples(sample_rate, seed);
            let buffer = ctx.create_buffer(1, samples.len() as u32, sample_rate)?;
            buffer.copy_to_channel(&samples, 0)?;

            let source = ctx.create_buffer_source()?;
            source.set_buffer(Some(&buffer));

            let filter = ctx.create_biquad_filter()?;
            filter.set_type(BiquadFilterType::Lowpass);
            filter.frequency().set_value(1200.0);

            let gain = ctx.create_gain()?;
            gain.gain().set_value(self.volume);

            source.connect_with_audio_node(&filter)?;
            filter.connect_with_audio_node(&gain)?;
            gain.connect_with_audio_node(&ctx.destination())?;
            source.start()?;
            Ok(())
        }

        fn try_play_beep(&self, freq: f32, seconds: f64) -> Result<(), JsValue> {
            let Some(ctx) = &self.ctx else { return Ok(()) };
            if self.volume <= 0.0 {
                return Ok(());
            }
            self.resume();

            let osc = ctx.create_oscillator()?;
            let gain = ctx.create_gain()?;
            osc.set_type(OscillatorType::Square);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain)?;
            gain.connect_with_audio_node(&ctx.destination())?;

            let t = ctx.current_time();
            gain.gain().set_value_at_time(self.volume * 0.2, t)?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + seconds)?;
            osc.start()?;
            osc.stop_with_when(t + seconds + 0.02)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_length_matches_duration() {
        let samples = explosion_samples(48_000.0, 1);
        assert_eq!(samples.len(), (48_000.0 * EXPLOSION_SECONDS) as usize);
    }

    #[test]
    fn test_burst_is_bounded_and_decays() {
        let samples = explosion_samples(44_100.0, 7);
        assert!(samples.iter().all(|s| s.abs() <= 1.0));

        let energy = |chunk: &[f32]| chunk.iter().map(|s| s * s).sum::<f32>();
        let window = 4410;
        let head = energy(&samples[..window]);
        let tail = energy(&samples[samples.len() - window..]);
        assert!(head > 0.0);
        assert!(tail < head * 0.1);
    }

    #[test]
    fn test_burst_is_seeded() {
        assert_eq!(explosion_samples(8_000.0, 3), explosion_samples(8_000.0, 3));
        assert_ne!(explosion_samples(8_000.0, 3), explosion_samples(8_000.0, 4));
    }

    #[test]
    fn test_zero_sample_rate_yields_empty_burst() {
        assert!(explosion_samples(0.0, 1).is_empty());
    }
}
