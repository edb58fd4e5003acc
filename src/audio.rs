//! Audio collaborator.
//!
//! The simulation never plays sound itself; it tells an injected sink which
//! cue or track the presentation layer should play.

use crate::player::FiringMode;

/// One-shot sound effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    PlayerFire(FiringMode),
    Equip(FiringMode),
    BoostStart,
    BoostStop,
    EnemyFire,
    BossFire,
    ShieldUp,
    PlayerHit,
}

/// Looping or one-off background music.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Track {
    Level,
    Boss,
    Win,
    Lose,
}

pub trait AudioSink {
    fn play(&mut self, cue: Cue);
    fn play_music(&mut self, track: Track, looping: bool);
    fn stop_music(&mut self);
    /// Ramp the music volume to `target_volume` (0.0 to 1.0) over `seconds`.
    fn fade_music(&mut self, target_volume: f64, seconds: f64);
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: Cue) {}
    fn play_music(&mut self, _track: Track, _looping: bool) {}
    fn stop_music(&mut self) {}
    fn fade_music(&mut self, _target_volume: f64, _seconds: f64) {}
}
