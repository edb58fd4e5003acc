//! Entity model shared by every actor on the playfield.
//!
//! An `Entity` is a plain record: transform, hitbox, an optional health pool
//! and a destroyed flag, plus a `Behavior` tag naming the variant and carrying
//! its private state.  Movement, damage and enemy fire dispatch on the tag.
//! Nothing in here touches the terminal, the clock source or audio.

use std::ops::{Add, AddAssign};

use crate::boss::{
    BossState, BOSS_HEALTH, BOSS_HITBOX, BOSS_ORIGIN, BOSS_PROJECTILE_X, BOSS_PROJECTILE_Y_OFFSET,
};
use crate::player::{PlayerState, PLAYER_HITBOX, PLAYER_ORIGIN};
use crate::random::RandomSource;

pub type EntityId = u64;

// ── Geometry ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in world units, origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Closed-interval overlap test: rectangles that only share an edge
    /// still intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }
}

/// Position is always `origin + offset`.  Only the offset moves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub origin: Vec2,
    pub offset: Vec2,
}

impl Transform {
    pub fn at(origin: Vec2) -> Self {
        Self {
            origin,
            offset: Vec2::ZERO,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.origin + self.offset
    }
}

// ── Health ────────────────────────────────────────────────────────────────────

/// Health pool clamped to `[0, max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Health {
    current: u32,
    max: u32,
}

impl Health {
    pub fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn with_current(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    pub fn fraction(&self) -> f64 {
        if self.max == 0 {
            0.0
        } else {
            self.current as f64 / self.max as f64
        }
    }
}

// ── Variants ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Basic,
    Advanced,
}

impl EnemyKind {
    pub fn velocity(&self) -> f64 {
        match self {
            EnemyKind::Basic => -6.0,
            EnemyKind::Advanced => -8.0,
        }
    }

    pub fn health(&self) -> u32 {
        match self {
            EnemyKind::Basic => 3,
            EnemyKind::Advanced => 6,
        }
    }

    pub fn fire_probability(&self) -> f64 {
        match self {
            EnemyKind::Basic => 0.01,
            EnemyKind::Advanced => 0.02,
        }
    }

    /// Muzzle offset relative to the plane's position.
    pub fn muzzle(&self) -> Vec2 {
        match self {
            EnemyKind::Basic => Vec2::new(-40.0, 18.0),
            EnemyKind::Advanced => Vec2::new(-50.0, 20.0),
        }
    }

    pub fn hitbox(&self) -> Size {
        match self {
            EnemyKind::Basic => Size::new(80.0, 40.0),
            EnemyKind::Advanced => Size::new(90.0, 50.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    Single,
    Spread,
    Heavy,
    Enemy,
    Boss,
}

/// Heavy shots survive this many hits.
pub const HEAVY_PROJECTILE_HEALTH: u32 = 6;
/// Spread shots are spent after travelling this far.
pub const SPREAD_RANGE: f64 = 300.0;

impl ProjectileKind {
    pub fn hitbox(&self) -> Size {
        match self {
            ProjectileKind::Single => Size::new(24.0, 8.0),
            ProjectileKind::Spread => Size::new(18.0, 6.0),
            ProjectileKind::Heavy => Size::new(50.0, 50.0),
            ProjectileKind::Enemy => Size::new(32.0, 16.0),
            ProjectileKind::Boss => Size::new(90.0, 65.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileState {
    pub kind: ProjectileKind,
    pub velocity: Vec2,
    pub travelled: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Behavior {
    Player(PlayerState),
    Enemy(EnemyKind),
    Boss(BossState),
    Projectile(ProjectileState),
}

// ── Entity ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub transform: Transform,
    pub hitbox: Size,
    health: Option<Health>,
    destroyed: bool,
    pub behavior: Behavior,
}

impl Entity {
    pub fn player(id: EntityId, health: Health) -> Self {
        Self {
            id,
            transform: Transform::at(PLAYER_ORIGIN),
            hitbox: PLAYER_HITBOX,
            health: Some(health),
            destroyed: false,
            behavior: Behavior::Player(PlayerState::new()),
        }
    }

    pub fn enemy(id: EntityId, kind: EnemyKind, at: Vec2) -> Self {
        Self {
            id,
            transform: Transform::at(at),
            hitbox: kind.hitbox(),
            health: Some(Health::full(kind.health())),
            destroyed: false,
            behavior: Behavior::Enemy(kind),
        }
    }

    pub fn boss(id: EntityId, rng: &mut dyn RandomSource) -> Self {
        Self {
            id,
            transform: Transform::at(BOSS_ORIGIN),
            hitbox: BOSS_HITBOX,
            health: Some(Health::full(BOSS_HEALTH)),
            destroyed: false,
            behavior: Behavior::Boss(BossState::new(rng)),
        }
    }

    pub fn projectile(id: EntityId, kind: ProjectileKind, at: Vec2, velocity: Vec2) -> Self {
        let health = match kind {
            ProjectileKind::Heavy => Some(Health::full(HEAVY_PROJECTILE_HEALTH)),
            _ => None,
        };
        Self {
            id,
            transform: Transform::at(at),
            hitbox: kind.hitbox(),
            health,
            destroyed: false,
            behavior: Behavior::Projectile(ProjectileState {
                kind,
                velocity,
                travelled: 0.0,
            }),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.transform.position()
    }

    pub fn bounds(&self) -> Rect {
        let pos = self.position();
        Rect::new(pos.x, pos.y, self.hitbox.width, self.hitbox.height)
    }

    pub fn health(&self) -> Option<&Health> {
        self.health.as_ref()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Once destroyed an entity never comes back.
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.behavior, Behavior::Boss(_))
    }

    pub fn as_player(&self) -> Option<&PlayerState> {
        match &self.behavior {
            Behavior::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut PlayerState> {
        match &mut self.behavior {
            Behavior::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_boss(&self) -> Option<&BossState> {
        match &self.behavior {
            Behavior::Boss(b) => Some(b),
            _ => None,
        }
    }

    /// One discrete damage event.
    ///
    /// Entities with a health pool lose one point and are destroyed at zero.
    /// Entities without one (plain projectiles) are destroyed outright.  A
    /// shielded boss ignores the hit entirely.
    pub fn take_damage(&mut self) {
        if let Behavior::Boss(boss) = &self.behavior {
            if boss.is_shielded() {
                return;
            }
        }

        match self.health.as_mut() {
            Some(health) => {
                health.damage(1);
                if health.is_depleted() {
                    self.destroyed = true;
                }
            }
            None => self.destroyed = true,
        }

        if let (Behavior::Boss(boss), Some(health)) = (&mut self.behavior, &self.health) {
            boss.on_health_changed(health);
        }
    }

    /// Per-tick movement and internal state for this variant.
    pub fn update(&mut self, now_ms: u64, rng: &mut dyn RandomSource) {
        match &mut self.behavior {
            Behavior::Player(player) => player.advance(&mut self.transform, now_ms),
            Behavior::Enemy(kind) => self.transform.offset.x += kind.velocity(),
            Behavior::Boss(boss) => {
                if let Some(health) = &self.health {
                    boss.update(&mut self.transform, health, rng);
                }
            }
            Behavior::Projectile(shot) => {
                self.transform.offset += shot.velocity;
                if shot.kind == ProjectileKind::Spread {
                    shot.travelled += shot.velocity.length();
                    if shot.travelled >= SPREAD_RANGE {
                        self.destroyed = true;
                    }
                }
            }
        }
    }

    /// Probabilistic fire decision for enemies and the boss.  Everything
    /// else never fires through here.
    pub fn try_fire(&self, rng: &mut dyn RandomSource, ids: &mut IdAllocator) -> Option<Entity> {
        let pos = self.position();
        match &self.behavior {
            Behavior::Enemy(kind) => {
                if rng.next_unit() < kind.fire_probability() {
                    let at = pos + kind.muzzle();
                    Some(Entity::projectile(
                        ids.next_id(),
                        ProjectileKind::Enemy,
                        at,
                        Vec2::new(-10.0, 0.0),
                    ))
                } else {
                    None
                }
            }
            Behavior::Boss(boss) => {
                if rng.next_unit() < boss.fire_probability() {
                    let at = Vec2::new(BOSS_PROJECTILE_X, pos.y + BOSS_PROJECTILE_Y_OFFSET);
                    Some(Entity::projectile(
                        ids.next_id(),
                        ProjectileKind::Boss,
                        at,
                        Vec2::new(-15.0, 0.0),
                    ))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

// ── Identity ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct IdAllocator {
    next: EntityId,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next += 1;
        id
    }
}
