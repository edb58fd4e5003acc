//! Per-tick simulation of one level.
//!
//! `LevelSession::tick` advances the world by exactly one fixed 50 ms step.
//! The step order is fixed: input, spawn, update, enemy fire, enemy count,
//! penetration, the three collision sweeps, purge, kill count, HUD, then the
//! win/lose/advance check.  Randomness, time and audio come in through
//! `Services`, so a seeded RNG and a manual clock replay a run exactly.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::audio::{AudioSink, Cue, NullAudio, Track};
use crate::clock::{Clock, SystemClock};
use crate::collision::{resolve_penetration, sweep};
use crate::entities::{
    Behavior, EnemyKind, Entity, EntityId, Health, IdAllocator, ProjectileKind, Rect,
};
use crate::input::HeldInputs;
use crate::level::{LevelConfig, LevelId};
use crate::player::FiringMode;
use crate::random::RandomSource;
use crate::spawn::SpawnController;

pub const TICK_MS: u64 = 50;

// ── Collaborators ─────────────────────────────────────────────────────────────

pub struct Services {
    pub rng: Box<dyn RandomSource>,
    pub clock: Box<dyn Clock>,
    pub audio: Box<dyn AudioSink>,
}

impl Services {
    pub fn new(
        rng: impl RandomSource + 'static,
        clock: impl Clock + 'static,
        audio: impl AudioSink + 'static,
    ) -> Self {
        Self {
            rng: Box::new(rng),
            clock: Box::new(clock),
            audio: Box::new(audio),
        }
    }

    /// Seeded RNG, real clock, no sound.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed), SystemClock::new(), NullAudio)
    }
}

// ── Outputs ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Won,
    Lost,
    Advance(LevelId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoostBand {
    High,
    Medium,
    Low,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossHud {
    pub health_fraction: f64,
    pub shielded: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    pub health: u32,
    pub max_health: u32,
    pub kills: u32,
    pub kill_target: u32,
    pub firing_mode: FiringMode,
    pub boost_fraction: f64,
    pub boosting: bool,
    pub boss: Option<BossHud>,
}

impl Hud {
    pub fn boost_band(&self) -> BoostBand {
        if self.boost_fraction > 0.5 {
            BoostBand::High
        } else if self.boost_fraction > 0.2 {
            BoostBand::Medium
        } else {
            BoostBand::Low
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewKind {
    Player,
    Enemy(EnemyKind),
    Boss,
    Projectile(ProjectileKind),
}

#[derive(Clone, Debug, PartialEq)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: ViewKind,
    pub bounds: Rect,
    pub shielded: bool,
}

/// Read-only picture of the world for the presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub level: LevelId,
    pub tick: u64,
    pub paused: bool,
    pub outcome: Option<GameEvent>,
    pub entities: Vec<EntityView>,
    pub hud: Hud,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub hud: Hud,
    pub event: Option<GameEvent>,
}

fn view_of(entity: &Entity) -> EntityView {
    let (kind, shielded) = match &entity.behavior {
        Behavior::Player(_) => (ViewKind::Player, false),
        Behavior::Enemy(kind) => (ViewKind::Enemy(*kind), false),
        Behavior::Boss(boss) => (ViewKind::Boss, boss.is_shielded()),
        Behavior::Projectile(shot) => (ViewKind::Projectile(shot.kind), false),
    };
    EntityView {
        id: entity.id,
        kind,
        bounds: entity.bounds(),
        shielded,
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

pub struct LevelSession {
    config: LevelConfig,
    spawner: SpawnController,
    ids: IdAllocator,
    player: Entity,
    enemies: Vec<Entity>,
    user_projectiles: Vec<Entity>,
    enemy_projectiles: Vec<Entity>,
    pending_boss: Option<Entity>,
    boss_defeated: bool,
    kills: u32,
    ticks: u64,
    paused: bool,
    outcome: Option<GameEvent>,
}

impl LevelSession {
    /// Start a level with the player at `player_health` (capped at the
    /// level's starting health).
    pub fn new(config: LevelConfig, player_health: u32, services: &mut Services) -> Self {
        let mut ids = IdAllocator::new();
        let health = Health::with_current(player_health, config.player_health);
        let player = Entity::player(ids.next_id(), health);
        let pending_boss = config
            .boss
            .as_ref()
            .map(|_| Entity::boss(ids.next_id(), services.rng.as_mut()));

        let track = if pending_boss.is_some() {
            Track::Boss
        } else {
            Track::Level
        };
        services.audio.play_music(track, true);
        info!(level = %config.id, health = health.current(), "level started");

        Self {
            spawner: config.spawn_controller(),
            config,
            ids,
            player,
            enemies: Vec::new(),
            user_projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            pending_boss,
            boss_defeated: false,
            kills: 0,
            ticks: 0,
            paused: false,
            outcome: None,
        }
    }

    pub fn tick(&mut self, input: &HeldInputs, services: &mut Services) -> TickReport {
        if self.paused || self.outcome.is_some() {
            return TickReport {
                hud: self.hud(),
                event: None,
            };
        }
        let now = services.clock.now_ms();
        let rng = services.rng.as_mut();
        let audio = services.audio.as_mut();
        self.ticks += 1;

        let boosting_before = self.player.as_player().is_some_and(|p| p.is_boosting());
        let health_before = self.player_health();

        self.apply_input(input, now, audio);
        self.spawn_enemies(rng);
        let shielded_before = self.boss_shielded();
        self.update_all(now, rng);
        self.enemy_fire(rng, audio);

        let enemies_before = self.enemies.len();
        let width = self.config.screen.width;
        resolve_penetration(&mut self.player, &mut self.enemies, width);
        sweep(&mut self.enemies, &mut self.user_projectiles);
        sweep(std::slice::from_mut(&mut self.player), &mut self.enemy_projectiles);
        sweep(&mut self.enemies, std::slice::from_mut(&mut self.player));

        // cues need pre-purge state
        let boosting_after = self.player.as_player().is_some_and(|p| p.is_boosting());
        match (boosting_before, boosting_after) {
            (false, true) => audio.play(Cue::BoostStart),
            (true, false) => audio.play(Cue::BoostStop),
            _ => {}
        }
        if !shielded_before && self.boss_shielded() {
            audio.play(Cue::ShieldUp);
        }
        if self.player_health() < health_before {
            audio.play(Cue::PlayerHit);
        }

        self.purge();
        let removed = enemies_before.saturating_sub(self.enemies.len());
        self.kills += removed as u32;

        let hud = self.hud();
        let event = self.check_outcome();
        if let Some(event) = &event {
            self.finish(event.clone(), audio);
        }
        TickReport { hud, event }
    }

    // ── Steps ─────────────────────────────────────────────────────────────────

    fn apply_input(&mut self, input: &HeldInputs, now: u64, audio: &mut dyn AudioSink) {
        let body = self.player.bounds();
        let Behavior::Player(player) = &mut self.player.behavior else {
            return;
        };

        player.steer(input.horizontal(), input.vertical());
        if let Some(mode) = input.mode {
            if player.set_mode(mode) {
                audio.play(Cue::Equip(mode));
            }
        }
        player.hold_boost(input.boost, now);

        if input.fire {
            let shots = player.fire(&body, now, &mut self.ids);
            if !shots.is_empty() {
                audio.play(Cue::PlayerFire(player.mode()));
                self.user_projectiles.extend(shots);
            }
        }
    }

    fn spawn_enemies(&mut self, rng: &mut dyn RandomSource) {
        // the boss always leads the enemy set
        if let Some(boss) = self.pending_boss.take() {
            self.enemies.insert(0, boss);
        }
        let current = self.enemies.iter().filter(|e| !e.is_boss()).count();
        let boss_fraction = self.boss_fraction();
        let spawned = self.spawner.spawn(current, boss_fraction, rng, &mut self.ids);
        self.enemies.extend(spawned);
    }

    fn update_all(&mut self, now: u64, rng: &mut dyn RandomSource) {
        self.player.update(now, rng);
        for entity in self
            .enemies
            .iter_mut()
            .chain(self.user_projectiles.iter_mut())
            .chain(self.enemy_projectiles.iter_mut())
        {
            entity.update(now, rng);
        }
    }

    fn enemy_fire(&mut self, rng: &mut dyn RandomSource, audio: &mut dyn AudioSink) {
        for enemy in &self.enemies {
            if let Some(shot) = enemy.try_fire(rng, &mut self.ids) {
                audio.play(if enemy.is_boss() {
                    Cue::BossFire
                } else {
                    Cue::EnemyFire
                });
                self.enemy_projectiles.push(shot);
            }
        }
    }

    fn purge(&mut self) {
        if self.enemies.iter().any(|e| e.is_boss() && e.is_destroyed()) {
            self.boss_defeated = true;
        }
        self.enemies.retain(|e| !e.is_destroyed());

        // projectiles that left the arena are dropped without being destroyed
        let w = self.config.screen.width;
        let h = self.config.screen.height;
        let arena = Rect::new(-w, -h, 3.0 * w, 3.0 * h);
        let keep = |p: &Entity| !p.is_destroyed() && arena.intersects(&p.bounds());
        self.user_projectiles.retain(keep);
        self.enemy_projectiles.retain(keep);
    }

    fn check_outcome(&self) -> Option<GameEvent> {
        if self.player.is_destroyed() {
            return Some(GameEvent::Lost);
        }
        if self.config.boss.is_some() {
            return self.boss_defeated.then_some(GameEvent::Won);
        }
        if self.kills >= self.config.kill_target {
            return Some(match &self.config.next {
                Some(next) => GameEvent::Advance(next.clone()),
                None => GameEvent::Won,
            });
        }
        None
    }

    fn finish(&mut self, event: GameEvent, audio: &mut dyn AudioSink) {
        match &event {
            GameEvent::Won => {
                audio.stop_music();
                audio.play_music(Track::Win, false);
                info!(level = %self.config.id, ticks = self.ticks, "game won");
            }
            GameEvent::Lost => {
                audio.stop_music();
                audio.play_music(Track::Lose, false);
                info!(level = %self.config.id, ticks = self.ticks, "game lost");
            }
            GameEvent::Advance(next) => {
                info!(level = %self.config.id, %next, kills = self.kills, "level cleared");
            }
        }
        self.outcome = Some(event);
    }

    // ── Pause ─────────────────────────────────────────────────────────────────

    pub fn pause(&mut self, audio: &mut dyn AudioSink) {
        if self.paused || self.outcome.is_some() {
            return;
        }
        self.paused = true;
        audio.fade_music(0.05, 1.0);
        debug!(tick = self.ticks, "paused");
    }

    pub fn resume(&mut self, audio: &mut dyn AudioSink) {
        if !self.paused {
            return;
        }
        self.paused = false;
        audio.fade_music(0.2, 1.0);
        debug!(tick = self.ticks, "resumed");
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn level_id(&self) -> &LevelId {
        &self.config.id
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn outcome(&self) -> Option<&GameEvent> {
        self.outcome.as_ref()
    }

    pub fn player(&self) -> &Entity {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Entity {
        &mut self.player
    }

    pub fn player_health(&self) -> u32 {
        self.player.health().map_or(0, |h| h.current())
    }

    pub fn enemies(&self) -> &[Entity] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut Vec<Entity> {
        &mut self.enemies
    }

    pub fn user_projectiles(&self) -> &[Entity] {
        &self.user_projectiles
    }

    pub fn user_projectiles_mut(&mut self) -> &mut Vec<Entity> {
        &mut self.user_projectiles
    }

    pub fn enemy_projectiles(&self) -> &[Entity] {
        &self.enemy_projectiles
    }

    pub fn enemy_projectiles_mut(&mut self) -> &mut Vec<Entity> {
        &mut self.enemy_projectiles
    }

    pub fn next_id(&mut self) -> EntityId {
        self.ids.next_id()
    }

    fn boss(&self) -> Option<&Entity> {
        self.enemies
            .iter()
            .chain(self.pending_boss.iter())
            .find(|e| e.is_boss())
    }

    fn boss_fraction(&self) -> Option<f64> {
        self.boss().and_then(|b| b.health()).map(|h| h.fraction())
    }

    fn boss_shielded(&self) -> bool {
        self.boss()
            .and_then(|b| b.as_boss())
            .is_some_and(|b| b.is_shielded())
    }

    pub fn hud(&self) -> Hud {
        let player = self.player.as_player();
        let boss = match self.boss() {
            Some(boss) => Some(BossHud {
                health_fraction: boss.health().map_or(0.0, |h| h.fraction()),
                shielded: boss.as_boss().is_some_and(|b| b.is_shielded()),
            }),
            None if self.config.boss.is_some() => Some(BossHud {
                health_fraction: 0.0,
                shielded: false,
            }),
            None => None,
        };
        Hud {
            health: self.player_health(),
            max_health: self.player.health().map_or(0, |h| h.max()),
            kills: self.kills,
            kill_target: self.config.kill_target,
            firing_mode: player.map_or(FiringMode::Single, |p| p.mode()),
            boost_fraction: player.map_or(0.0, |p| p.boost_fraction()),
            boosting: player.is_some_and(|p| p.is_boosting()),
            boss,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let entities = std::iter::once(&self.player)
            .chain(self.enemies.iter())
            .chain(self.user_projectiles.iter())
            .chain(self.enemy_projectiles.iter())
            .map(view_of)
            .collect();
        Snapshot {
            level: self.config.id.clone(),
            tick: self.ticks,
            paused: self.paused,
            outcome: self.outcome.clone(),
            entities,
            hud: self.hud(),
        }
    }
}
