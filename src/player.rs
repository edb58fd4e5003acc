//! Player plane: firing modes, per-mode cooldowns, movement and the boost
//! energy economy.

use tracing::debug;

use crate::entities::{Entity, IdAllocator, ProjectileKind, Rect, Size, Transform, Vec2};

// ── Tuning ────────────────────────────────────────────────────────────────────

pub const PLAYER_ORIGIN: Vec2 = Vec2::new(5.0, 400.0);
pub const PLAYER_HITBOX: Size = Size::new(100.0, 60.0);
pub const PLAYER_STEP: f64 = 8.0;

/// Allowed displacement from the origin, inclusive.
pub const OFFSET_X_RANGE: (f64, f64) = (0.0, 1000.0);
pub const OFFSET_Y_RANGE: (f64, f64) = (-400.0, 400.0);

pub const MAX_BOOST_ENERGY: f64 = 100.0;
pub const BOOST_MULTIPLIER: f64 = 1.5;
pub const BOOST_DRAIN: f64 = 1.5;
pub const BOOST_RECHARGE: f64 = 0.5;
pub const BOOST_RECHARGE_DELAY_MS: u64 = 1500;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FiringMode {
    Single,
    Spread,
    Heavy,
}

impl FiringMode {
    pub const ALL: [FiringMode; 3] = [FiringMode::Single, FiringMode::Spread, FiringMode::Heavy];

    pub fn cooldown_ms(&self) -> u64 {
        match self {
            FiringMode::Single => 100,
            FiringMode::Spread => 200,
            FiringMode::Heavy => 1000,
        }
    }

    fn slot(&self) -> usize {
        match self {
            FiringMode::Single => 0,
            FiringMode::Spread => 1,
            FiringMode::Heavy => 2,
        }
    }

    /// (kind, muzzle, velocity) for every projectile one trigger pull emits.
    fn volley(&self, body: &Rect) -> Vec<(ProjectileKind, Vec2, Vec2)> {
        let nose = Vec2::new(body.right(), body.center_y());
        match self {
            FiringMode::Single => vec![(ProjectileKind::Single, nose, Vec2::new(15.0, 0.0))],
            FiringMode::Spread => [0.0, -5.0, 5.0]
                .into_iter()
                .map(|vy| (ProjectileKind::Spread, nose, Vec2::new(10.0, vy)))
                .collect(),
            FiringMode::Heavy => vec![(
                ProjectileKind::Heavy,
                Vec2::new(body.center_x(), body.bottom() - 10.0),
                Vec2::new(8.0, 10.0),
            )],
        }
    }
}

// ── State ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    mode: FiringMode,
    /// Last fire time per mode; `None` means the mode is ready.
    last_fired: [Option<u64>; 3],
    boost_energy: f64,
    boost_active: bool,
    boost_held: bool,
    boost_released_at: Option<u64>,
    heading: (i8, i8),
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerState {
    pub fn new() -> Self {
        Self {
            mode: FiringMode::Single,
            last_fired: [None; 3],
            boost_energy: MAX_BOOST_ENERGY,
            boost_active: false,
            boost_held: false,
            boost_released_at: None,
            heading: (0, 0),
        }
    }

    pub fn mode(&self) -> FiringMode {
        self.mode
    }

    /// Returns true if the mode actually changed.
    pub fn set_mode(&mut self, mode: FiringMode) -> bool {
        let changed = self.mode != mode;
        if changed {
            debug!(from = ?self.mode, to = ?mode, "firing mode");
        }
        self.mode = mode;
        changed
    }

    pub fn is_ready(&self, mode: FiringMode, now_ms: u64) -> bool {
        match self.last_fired[mode.slot()] {
            None => true,
            Some(at) => now_ms.saturating_sub(at) >= mode.cooldown_ms(),
        }
    }

    /// Fire the current mode from `body`.  Empty when the mode is cooling down.
    pub fn fire(&mut self, body: &Rect, now_ms: u64, ids: &mut IdAllocator) -> Vec<Entity> {
        let mode = self.mode;
        if !self.is_ready(mode, now_ms) {
            return Vec::new();
        }
        self.last_fired[mode.slot()] = Some(now_ms);
        mode.volley(body)
            .into_iter()
            .map(|(kind, at, velocity)| Entity::projectile(ids.next_id(), kind, at, velocity))
            .collect()
    }

    // ── Boost ─────────────────────────────────────────────────────────────────

    pub fn boost_energy(&self) -> f64 {
        self.boost_energy
    }

    pub fn boost_fraction(&self) -> f64 {
        self.boost_energy / MAX_BOOST_ENERGY
    }

    pub fn is_boosting(&self) -> bool {
        self.boost_active
    }

    /// Activation needs energy above zero.  Every deactivation request,
    /// granted or not, restarts the recharge delay.
    pub fn set_boost(&mut self, active: bool, now_ms: u64) {
        if active && self.boost_energy > 0.0 {
            self.boost_active = true;
        } else {
            self.boost_active = false;
            self.boost_released_at = Some(now_ms);
        }
    }

    /// Edge-triggered wrapper for a held boost key: only press and release
    /// reach `set_boost`.
    pub fn hold_boost(&mut self, held: bool, now_ms: u64) {
        if held != self.boost_held {
            self.boost_held = held;
            self.set_boost(held, now_ms);
        }
    }

    fn drain_boost(&mut self, now_ms: u64) {
        if self.boost_active && self.boost_energy > 0.0 {
            self.boost_energy -= BOOST_DRAIN;
            if self.boost_energy <= 0.0 {
                self.boost_energy = 0.0;
                self.set_boost(false, now_ms);
            }
        }
    }

    fn recharge_boost(&mut self, now_ms: u64) {
        if self.boost_active || self.boost_energy >= MAX_BOOST_ENERGY {
            return;
        }
        let delay_over = self
            .boost_released_at
            .map_or(true, |at| now_ms.saturating_sub(at) >= BOOST_RECHARGE_DELAY_MS);
        if delay_over {
            self.boost_energy = (self.boost_energy + BOOST_RECHARGE).min(MAX_BOOST_ENERGY);
        }
    }

    // ── Movement ──────────────────────────────────────────────────────────────

    /// Direction per axis: -1, 0 or 1.
    pub fn steer(&mut self, horizontal: i8, vertical: i8) {
        self.heading = (horizontal.signum(), vertical.signum());
    }

    /// Per-tick update: position, then boost drain, then recharge.
    pub fn advance(&mut self, transform: &mut Transform, now_ms: u64) {
        let factor = if self.boost_active { BOOST_MULTIPLIER } else { 1.0 };
        let step = PLAYER_STEP * factor;

        // a move that would leave the range is skipped
        let next_x = transform.offset.x + f64::from(self.heading.0) * step;
        if (OFFSET_X_RANGE.0..=OFFSET_X_RANGE.1).contains(&next_x) {
            transform.offset.x = next_x;
        }
        let next_y = transform.offset.y + f64::from(self.heading.1) * step;
        if (OFFSET_Y_RANGE.0..=OFFSET_Y_RANGE.1).contains(&next_y) {
            transform.offset.y = next_y;
        }

        self.drain_boost(now_ms);
        self.recharge_boost(now_ms);
    }
}
