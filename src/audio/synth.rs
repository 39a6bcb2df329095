//! Procedural sound synthesis
//!
//! One oscillator with an attack/decay/sustain/release envelope, plus slide,
//! pitch jump, vibrato, noise, bit crush, tremolo and a single echo tap.
//! Everything is computed in f64 and emitted as mono f32 samples.

use std::f64::consts::TAU;

use rand::Rng;

use super::SoundParams;

/// Output sample rate (Hz)
pub const SAMPLE_RATE: u32 = 44_100;

/// Number of samples `render` produces for `params`
pub fn sample_len(params: &SoundParams) -> usize {
    let sr = SAMPLE_RATE as f64;
    let attack = params.attack as f64 * sr + 9.0;
    let total = attack
        + params.decay as f64 * sr
        + params.sustain as f64 * sr
        + params.release as f64 * sr
        + params.delay as f64 * sr;
    total.max(0.0) as usize
}

/// Sign that maps zero to zero
#[inline]
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Raw waveform at phase `t`
fn wave(shape: f64, t: f64) -> f64 {
    if shape > 3.0 {
        (t % TAU).powi(3).sin()
    } else if shape > 2.0 {
        t.tan().clamp(-1.0, 1.0)
    } else if shape > 1.0 {
        // Sawtooth
        1.0 - ((2.0 * t / TAU) % 2.0 + 2.0) % 2.0
    } else if shape > 0.0 {
        // Triangle
        1.0 - 4.0 * ((t / TAU).round() - t / TAU).abs()
    } else {
        t.sin()
    }
}

/// Render `params` at `gain` into mono samples.
///
/// `rng` drives the per-play pitch jitter (`randomness`); a fixed seed gives
/// identical output.
pub fn render<R: Rng + ?Sized>(params: &SoundParams, gain: f32, rng: &mut R) -> Vec<f32> {
    let sr = SAMPLE_RATE as f64;
    let p = params;

    let volume = p.volume as f64 * gain as f64;
    let shape = p.shape as f64;
    let shape_curve = p.shape_curve as f64;
    let noise = p.noise as f64;
    let tremolo = p.tremolo as f64;
    let sustain_volume = p.sustain_volume as f64;

    let mut slide = p.slide as f64 * 500.0 * TAU / (sr * sr);
    let start_slide = slide;
    let randomness = p.randomness as f64;
    let jitter = 1.0 + randomness * 2.0 * rng.random::<f64>() - randomness;
    let mut frequency = p.frequency as f64 * jitter * TAU / sr;
    let mut start_frequency = frequency;

    let attack = p.attack as f64 * sr + 9.0;
    let decay = p.decay as f64 * sr;
    let sustain = p.sustain as f64 * sr;
    let release = p.release as f64 * sr;
    let delay = p.delay as f64 * sr;
    let delta_slide = p.delta_slide as f64 * 500.0 * TAU / sr.powi(3);
    let modulation = p.modulation as f64 * TAU / sr;
    let pitch_jump = p.pitch_jump as f64 * TAU / sr;
    let pitch_jump_time = p.pitch_jump_time as f64 * sr;
    let repeat_time = (p.repeat_time as f64 * sr).max(0.0) as u64;
    let crush = (p.bit_crush as f64 * 100.0).max(0.0) as u64;

    let len = sample_len(p);
    let lenf = len as f64;
    let mut out: Vec<f32> = Vec::with_capacity(len);

    let mut t = 0.0f64;
    let mut tm = 0.0f64;
    // Pitch jump counter; zero disables it until the next repeat
    let mut j = 1.0f64;
    let mut r: u64 = 0;
    let mut c: u64 = 0;
    let mut s = 0.0f64;

    for i in 0..len {
        let fi = i as f64;

        c += 1;
        if crush == 0 || c % crush == 0 {
            s = wave(shape, t);

            let trem = if repeat_time > 0 {
                1.0 - tremolo + tremolo * (TAU * fi / repeat_time as f64).sin()
            } else {
                1.0
            };

            let envelope = if fi < attack {
                fi / attack
            } else if fi < attack + decay {
                1.0 - ((fi - attack) / decay) * (1.0 - sustain_volume)
            } else if fi < attack + decay + sustain {
                sustain_volume
            } else if fi < lenf - delay && release > 0.0 {
                (lenf - fi - delay) / release * sustain_volume
            } else {
                0.0
            };

            s = trem * sign(s) * s.abs().powf(shape_curve) * volume * envelope;

            if delay > 0.0 {
                let echo = if delay > fi {
                    0.0
                } else {
                    let fade = if fi < lenf - delay {
                        1.0
                    } else {
                        (lenf - fi) / delay
                    };
                    let tap = (fi - delay) as usize;
                    fade * out.get(tap).copied().unwrap_or(0.0) as f64 / 2.0
                };
                s = s / 2.0 + echo;
            }
        }

        slide += delta_slide;
        frequency += slide;
        let f = frequency * (modulation * tm).cos();
        tm += 1.0;
        t += f - f * noise * (1.0 - ((fi.sin() + 1.0) * 1e9) % 2.0);

        if j != 0.0 {
            j += 1.0;
            if j > pitch_jump_time {
                frequency += pitch_jump;
                start_frequency += pitch_jump;
                j = 0.0;
            }
        }

        if repeat_time > 0 {
            r += 1;
            if r % repeat_time == 0 {
                frequency = start_frequency;
                slide = start_slide;
                if j == 0.0 {
                    j = 1.0;
                }
            }
        }

        out.push(s as f32);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundEffect;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_length_matches_envelope() {
        let mut rng = Pcg32::seed_from_u64(1);
        for effect in SoundEffect::ALL {
            let params = effect.params();
            let samples = render(&params, 1.0, &mut rng);
            assert_eq!(samples.len(), sample_len(&params), "{:?}", effect);
            assert!(!samples.is_empty());
        }

        // attack .01 + 9, sustain .02, release .01, delay .05, decay .01
        let blip = sample_len(&SoundEffect::UiBlip.params());
        assert!((4418..=4420).contains(&blip), "blip length {}", blip);
    }

    #[test]
    fn test_samples_finite_and_bounded() {
        let mut rng = Pcg32::seed_from_u64(7);
        for effect in SoundEffect::ALL {
            let params = effect.params();
            for gain in [1.0, 0.3] {
                let bound = params.volume.abs() * gain + 1e-4;
                let samples = render(&params, gain, &mut rng);
                for (i, s) in samples.iter().enumerate() {
                    assert!(s.is_finite(), "{:?} sample {} not finite", effect, i);
                    assert!(
                        s.abs() <= bound,
                        "{:?} sample {} = {} exceeds {}",
                        effect,
                        i,
                        s,
                        bound
                    );
                }
            }
        }
    }

    #[test]
    fn test_zero_gain_is_silent() {
        let mut rng = Pcg32::seed_from_u64(3);
        let samples = render(&SoundEffect::Break.params(), 0.0, &mut rng);
        assert!(samples.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_not_silent() {
        let mut rng = Pcg32::seed_from_u64(3);
        for effect in SoundEffect::ALL {
            let samples = render(&effect.params(), 1.0, &mut rng);
            assert!(samples.iter().any(|s| s.abs() > 1e-3), "{:?}", effect);
        }
    }

    #[test]
    fn test_deterministic_with_seed() {
        let params = SoundEffect::PaddleBounce.params();
        let a = render(&params, 1.0, &mut Pcg32::seed_from_u64(42));
        let b = render(&params, 1.0, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_wave_shapes_in_range() {
        for shape in 0..5 {
            for k in 0..200 {
                let t = k as f64 * 0.173;
                let w = wave(shape as f64, t);
                assert!((-1.0..=1.0).contains(&w), "shape {} t {} -> {}", shape, t, w);
            }
        }
    }
}
