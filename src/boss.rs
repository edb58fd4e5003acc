//! Boss state machine.
//!
//! The boss drifts vertically following a shuffled move pattern, raises a
//! timed shield the first time its health falls to half and again at a
//! fifth, and permanently speeds up (movement and fire rate) at a fifth.

use tracing::debug;

use crate::entities::{Health, Size, Transform, Vec2};
use crate::random::{shuffle, RandomSource};

// ── Tuning ────────────────────────────────────────────────────────────────────

pub const BOSS_HEALTH: u32 = 100;
pub const BOSS_ORIGIN: Vec2 = Vec2::new(1150.0, 400.0);
pub const BOSS_HITBOX: Size = Size::new(180.0, 130.0);

pub const BOSS_PROJECTILE_X: f64 = 1020.0;
pub const BOSS_PROJECTILE_Y_OFFSET: f64 = 45.0;

pub const BOSS_SPEED: f64 = 8.0;
pub const BOSS_BOOSTED_SPEED: f64 = BOSS_SPEED * 2.0;
pub const BOSS_FIRE_PROBABILITY: f64 = 0.04;
pub const BOSS_BOOSTED_FIRE_PROBABILITY: f64 = BOSS_FIRE_PROBABILITY * 2.0;

/// Copies of each of +v, -v and 0 in the move pattern.
pub const MOVE_COPIES: usize = 5;
/// Reads of one pattern slot before reshuffling and moving on.
pub const READS_PER_MOVE: u32 = 10;
pub const SHIELD_TICKS: u32 = 250;

/// Absolute vertical position allowed for the boss, inclusive.
pub const BOSS_Y_RANGE: (f64, f64) = (-50.0, 700.0);

const FIRST_SHIELD_AT: f64 = 0.5;
const SECOND_SHIELD_AT: f64 = 0.2;
const BOOST_AT: f64 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BossPhase {
    Normal,
    Shielded,
    Boosted,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BossState {
    pattern: Vec<f64>,
    index: usize,
    reads: u32,
    shielded: bool,
    shield_ticks: u32,
    half_latch: bool,
    fifth_latch: bool,
    boosted: bool,
}

fn build_pattern(speed: f64, rng: &mut dyn RandomSource) -> Vec<f64> {
    let mut pattern = Vec::with_capacity(MOVE_COPIES * 3);
    for _ in 0..MOVE_COPIES {
        pattern.push(speed);
        pattern.push(-speed);
        pattern.push(0.0);
    }
    shuffle(rng, &mut pattern);
    pattern
}

impl BossState {
    pub fn new(rng: &mut dyn RandomSource) -> Self {
        Self {
            pattern: build_pattern(BOSS_SPEED, rng),
            index: 0,
            reads: 0,
            shielded: false,
            shield_ticks: 0,
            half_latch: false,
            fifth_latch: false,
            boosted: false,
        }
    }

    pub fn pattern(&self) -> &[f64] {
        &self.pattern
    }

    pub fn is_shielded(&self) -> bool {
        self.shielded
    }

    pub fn shield_ticks(&self) -> u32 {
        self.shield_ticks
    }

    pub fn is_boosted(&self) -> bool {
        self.boosted
    }

    pub fn phase(&self) -> BossPhase {
        if self.shielded {
            BossPhase::Shielded
        } else if self.boosted {
            BossPhase::Boosted
        } else {
            BossPhase::Normal
        }
    }

    pub fn fire_probability(&self) -> f64 {
        if self.boosted {
            BOSS_BOOSTED_FIRE_PROBABILITY
        } else {
            BOSS_FIRE_PROBABILITY
        }
    }

    /// Current vertical move.  After `READS_PER_MOVE` reads of the same slot
    /// the pattern is reshuffled and the index advances, wrapping at the end.
    pub fn next_move(&mut self, rng: &mut dyn RandomSource) -> f64 {
        let current = self.pattern[self.index];
        self.reads += 1;
        if self.reads == READS_PER_MOVE {
            shuffle(rng, &mut self.pattern);
            self.reads = 0;
            self.index += 1;
        }
        if self.index == self.pattern.len() {
            self.index = 0;
        }
        current
    }

    /// Shield latches.  Each fires at most once; returns true if the shield
    /// went up.
    pub fn on_health_changed(&mut self, health: &Health) -> bool {
        if self.shielded {
            return false;
        }
        let fraction = health.fraction();
        let trigger = if !self.half_latch && fraction <= FIRST_SHIELD_AT {
            self.half_latch = true;
            true
        } else if !self.fifth_latch && fraction <= SECOND_SHIELD_AT {
            self.fifth_latch = true;
            true
        } else {
            false
        };
        if trigger {
            self.shielded = true;
            self.shield_ticks = 0;
            debug!(health = health.current(), "boss shield up");
        }
        trigger
    }

    /// Per-tick update: position, then shield, then boost.
    pub fn update(&mut self, transform: &mut Transform, health: &Health, rng: &mut dyn RandomSource) {
        let before = transform.offset.y;
        transform.offset.y += self.next_move(rng);
        let y = transform.position().y;
        if y < BOSS_Y_RANGE.0 || y > BOSS_Y_RANGE.1 {
            transform.offset.y = before;
        }

        if self.shielded {
            self.shield_ticks += 1;
        } else {
            self.on_health_changed(health);
        }
        if self.shield_ticks == SHIELD_TICKS {
            self.shielded = false;
            self.shield_ticks = 0;
            debug!("boss shield down");
        }

        if !self.boosted && health.fraction() <= BOOST_AT {
            self.boosted = true;
            self.pattern = build_pattern(BOSS_BOOSTED_SPEED, rng);
            debug!(health = health.current(), "boss boosted");
        }
    }
}
