//! Sound cues
//!
//! The simulation only reports `GameEvent`s. This module turns a frame's
//! events into sound effects, renders each effect procedurally (`synth`) and,
//! on the web, plays the result through Web Audio (`web`).

pub mod synth;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits a side wall or the ceiling
    Bounce,
    /// Ball hits the paddle
    PaddleBounce,
    /// Brick destroyed
    Break,
    /// Ball lost below the paddle
    LoseLife,
    /// Last life lost
    GameOver,
    /// Last brick destroyed
    Win,
    /// Game started from a menu or end screen
    UiBlip,
}

// Procedural parameter blobs. Slot order follows `SoundParams::from_slots`;
// `None` keeps the default for that slot.
const BLIP: &[Option<f32>] = &[
    Some(2.01), None, Some(1680.0), Some(0.01), Some(0.02), Some(0.01), None, Some(0.95), None,
    Some(-26.0), Some(417.0), Some(0.02), None, None, None, None, Some(0.05), Some(0.27),
    Some(0.01),
];
const EXPLOSION: &[Option<f32>] = &[
    Some(1.01), None, Some(766.0), Some(0.03), Some(0.05), Some(0.05), Some(4.0), Some(0.98),
    None, Some(0.1), None, None, None, Some(0.9), Some(38.0), Some(0.8), None, Some(0.38),
    Some(0.05),
];
const PADDLE_BOUNCE: &[Option<f32>] = &[
    None, None, Some(172.0), Some(0.01), Some(0.04), Some(0.06), None, Some(1.13), Some(0.1),
    None, None, None, None, Some(0.9), Some(-101.0), Some(0.2), None, Some(0.66), Some(0.04),
    Some(0.3),
];
const WALL_BOUNCE: &[Option<f32>] = &[
    Some(0.5), Some(0.0), Some(140.0), Some(0.01), Some(0.02), Some(0.04), Some(2.0),
    Some(1.13), Some(0.1), None, None, None, None, Some(0.9), Some(-101.0), Some(0.2), None,
    Some(0.2), Some(0.02), Some(0.3),
];
const DEATH: &[Option<f32>] = &[
    None, None, Some(294.0), Some(0.01), Some(0.12), Some(0.23), Some(2.0), Some(0.16),
    Some(-10.0), Some(10.0), None, Some(0.09), Some(0.07), Some(0.1), None, None, None,
    Some(0.78), Some(0.18),
];
const GAME_OVER: &[Option<f32>] = &[
    Some(1.57), None, Some(674.0), Some(0.03), Some(0.15), Some(0.38), Some(1.0), Some(0.38),
    Some(-0.7), Some(-0.1), Some(-9.0), Some(0.14), Some(0.19), None, Some(43.0), None,
    Some(0.05), Some(0.55), Some(0.12),
];
const WIN: &[Option<f32>] = &[
    None, None, Some(137.0), Some(0.02), Some(0.4), Some(0.4), Some(1.0), Some(1.88), None,
    None, Some(39.0), Some(0.16), Some(0.05), None, None, None, None, Some(0.5), Some(0.24),
];

impl SoundEffect {
    pub const ALL: [SoundEffect; 7] = [
        SoundEffect::Bounce,
        SoundEffect::PaddleBounce,
        SoundEffect::Break,
        SoundEffect::LoseLife,
        SoundEffect::GameOver,
        SoundEffect::Win,
        SoundEffect::UiBlip,
    ];

    /// Sound for a single simulation event
    pub fn for_event(event: &GameEvent) -> Self {
        match event {
            GameEvent::WallBounce => SoundEffect::Bounce,
            GameEvent::PaddleBounce => SoundEffect::PaddleBounce,
            GameEvent::BrickBreak { .. } => SoundEffect::Break,
            GameEvent::LifeLost => SoundEffect::LoseLife,
            GameEvent::GameOver => SoundEffect::GameOver,
            GameEvent::Win => SoundEffect::Win,
            GameEvent::UiBlip => SoundEffect::UiBlip,
        }
    }

    /// Synth parameters for this effect
    pub fn params(self) -> SoundParams {
        let slots = match self {
            SoundEffect::Bounce => WALL_BOUNCE,
            SoundEffect::PaddleBounce => PADDLE_BOUNCE,
            SoundEffect::Break => EXPLOSION,
            SoundEffect::LoseLife => DEATH,
            SoundEffect::GameOver => GAME_OVER,
            SoundEffect::Win => WIN,
            SoundEffect::UiBlip => BLIP,
        };
        SoundParams::from_slots(slots)
    }
}

/// Map one frame's events to the effects to play.
///
/// Each effect plays at most once per frame. A final `Win` replaces the break
/// that caused it, and `GameOver` replaces the life-lost cue.
pub fn cues(events: &[GameEvent]) -> Vec<SoundEffect> {
    let won = events.contains(&GameEvent::Win);
    let lost = events.contains(&GameEvent::GameOver);

    let mut out: Vec<SoundEffect> = Vec::with_capacity(events.len());
    for effect in events.iter().map(SoundEffect::for_event) {
        let superseded = match effect {
            SoundEffect::Break => won,
            SoundEffect::LoseLife => lost,
            _ => false,
        };
        if !superseded && !out.contains(&effect) {
            out.push(effect);
        }
    }
    out
}

/// Procedural sound parameters (seconds, Hz, unitless gains)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundParams {
    pub volume: f32,
    pub randomness: f32,
    pub frequency: f32,
    pub attack: f32,
    pub sustain: f32,
    pub release: f32,
    pub shape: f32,
    pub shape_curve: f32,
    pub slide: f32,
    pub delta_slide: f32,
    pub pitch_jump: f32,
    pub pitch_jump_time: f32,
    pub repeat_time: f32,
    pub noise: f32,
    pub modulation: f32,
    pub bit_crush: f32,
    pub delay: f32,
    pub sustain_volume: f32,
    pub decay: f32,
    pub tremolo: f32,
}

impl Default for SoundParams {
    fn default() -> Self {
        Self {
            volume: 1.0,
            randomness: 0.05,
            frequency: 220.0,
            attack: 0.0,
            sustain: 0.0,
            release: 0.1,
            shape: 0.0,
            shape_curve: 1.0,
            slide: 0.0,
            delta_slide: 0.0,
            pitch_jump: 0.0,
            pitch_jump_time: 0.0,
            repeat_time: 0.0,
            noise: 0.0,
            modulation: 0.0,
            bit_crush: 0.0,
            delay: 0.0,
            sustain_volume: 1.0,
            decay: 0.0,
            tremolo: 0.0,
        }
    }
}

impl SoundParams {
    /// Build from a positional parameter list. Missing or `None` slots keep
    /// their defaults; extra slots are ignored.
    pub fn from_slots(slots: &[Option<f32>]) -> Self {
        let mut p = Self::default();
        let fields: [&mut f32; 20] = [
            &mut p.volume,
            &mut p.randomness,
            &mut p.frequency,
            &mut p.attack,
            &mut p.sustain,
            &mut p.release,
            &mut p.shape,
            &mut p.shape_curve,
            &mut p.slide,
            &mut p.delta_slide,
            &mut p.pitch_jump,
            &mut p.pitch_jump_time,
            &mut p.repeat_time,
            &mut p.noise,
            &mut p.modulation,
            &mut p.bit_crush,
            &mut p.delay,
            &mut p.sustain_volume,
            &mut p.decay,
            &mut p.tremolo,
        ];
        for (field, slot) in fields.into_iter().zip(slots) {
            if let Some(v) = slot {
                *field = *v;
            }
        }
        p
    }
}

/// Output gain derived from settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mix {
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Mix {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl Mix {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    /// Effective gain, zero when muted
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::BrickBreak { row: 2, col: 3 }),
            SoundEffect::Break
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::WallBounce),
            SoundEffect::Bounce
        );
    }

    #[test]
    fn test_win_supersedes_break() {
        let events = [GameEvent::BrickBreak { row: 7, col: 6 }, GameEvent::Win];
        assert_eq!(cues(&events), vec![SoundEffect::Win]);
    }

    #[test]
    fn test_game_over_supersedes_lose_life() {
        let events = [GameEvent::LifeLost, GameEvent::GameOver];
        assert_eq!(cues(&events), vec![SoundEffect::GameOver]);

        // An ordinary life loss still plays its cue
        assert_eq!(cues(&[GameEvent::LifeLost]), vec![SoundEffect::LoseLife]);
    }

    #[test]
    fn test_corner_bounce_plays_once() {
        let events = [
            GameEvent::WallBounce,
            GameEvent::WallBounce,
            GameEvent::BrickBreak { row: 0, col: 0 },
        ];
        assert_eq!(cues(&events), vec![SoundEffect::Bounce, SoundEffect::Break]);
    }

    #[test]
    fn test_from_slots_defaults() {
        let p = SoundParams::from_slots(&[None, None, Some(440.0)]);
        assert_eq!(p.frequency, 440.0);
        assert_eq!(p.volume, 1.0);
        assert_eq!(p.randomness, 0.05);
        assert_eq!(p.release, 0.1);

        let blip = SoundEffect::UiBlip.params();
        assert_eq!(blip.volume, 2.01);
        assert_eq!(blip.pitch_jump, 417.0);
        assert_eq!(blip.decay, 0.01);
        assert_eq!(blip.tremolo, 0.0);
    }

    #[test]
    fn test_mix() {
        let mut settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            ..Default::default()
        };
        assert_eq!(Mix::from_settings(&settings).effective_volume(), 0.25);
        settings.muted = true;
        assert_eq!(Mix::from_settings(&settings).effective_volume(), 0.0);
    }
}
