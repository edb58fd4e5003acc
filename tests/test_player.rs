use final_flight::entities::*;
use final_flight::player::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn body() -> Rect {
    Rect::new(5.0, 400.0, 100.0, 60.0)
}

fn kinds(shots: &[Entity]) -> Vec<ProjectileKind> {
    shots
        .iter()
        .filter_map(|s| match &s.behavior {
            Behavior::Projectile(p) => Some(p.kind),
            _ => None,
        })
        .collect()
}

fn velocities(shots: &[Entity]) -> Vec<Vec2> {
    shots
        .iter()
        .filter_map(|s| match &s.behavior {
            Behavior::Projectile(p) => Some(p.velocity),
            _ => None,
        })
        .collect()
}

// ── Firing ────────────────────────────────────────────────────────────────────

#[test]
fn first_shot_always_allowed() {
    let mut p = PlayerState::new();
    let mut ids = IdAllocator::new();
    assert_eq!(p.fire(&body(), 0, &mut ids).len(), 1);
}

#[test]
fn single_cooldown() {
    let mut p = PlayerState::new();
    let mut ids = IdAllocator::new();
    assert_eq!(p.fire(&body(), 1000, &mut ids).len(), 1);
    assert!(p.fire(&body(), 1099, &mut ids).is_empty());
    assert_eq!(p.fire(&body(), 1100, &mut ids).len(), 1);
}

#[test]
fn spread_fires_three_with_fan_velocities() {
    let mut p = PlayerState::new();
    let mut ids = IdAllocator::new();
    assert!(p.set_mode(FiringMode::Spread));
    let shots = p.fire(&body(), 0, &mut ids);
    assert_eq!(shots.len(), 3);
    assert!(kinds(&shots).iter().all(|k| *k == ProjectileKind::Spread));
    assert_eq!(
        velocities(&shots),
        vec![Vec2::new(10.0, 0.0), Vec2::new(10.0, -5.0), Vec2::new(10.0, 5.0)]
    );
}

#[test]
fn spread_cooldown() {
    let mut p = PlayerState::new();
    let mut ids = IdAllocator::new();
    p.set_mode(FiringMode::Spread);
    assert_eq!(p.fire(&body(), 0, &mut ids).len(), 3);
    assert!(p.fire(&body(), 199, &mut ids).is_empty());
    assert_eq!(p.fire(&body(), 200, &mut ids).len(), 3);
}

#[test]
fn heavy_fires_one_with_health_pool() {
    let mut p = PlayerState::new();
    let mut ids = IdAllocator::new();
    p.set_mode(FiringMode::Heavy);
    let shots = p.fire(&body(), 0, &mut ids);
    assert_eq!(shots.len(), 1);
    assert_eq!(kinds(&shots), vec![ProjectileKind::Heavy]);
    assert_eq!(shots[0].health().map(|h| h.current()), Some(HEAVY_PROJECTILE_HEALTH));
    // launched from under the fuselage
    assert_eq!(shots[0].position(), Vec2::new(55.0, 450.0));
}

#[test]
fn heavy_cooldown() {
    let mut p = PlayerState::new();
    let mut ids = IdAllocator::new();
    p.set_mode(FiringMode::Heavy);
    assert_eq!(p.fire(&body(), 0, &mut ids).len(), 1);
    assert!(p.fire(&body(), 999, &mut ids).is_empty());
    assert_eq!(p.fire(&body(), 1000, &mut ids).len(), 1);
}

#[test]
fn cooldowns_tracked_per_mode() {
    let mut p = PlayerState::new();
    let mut ids = IdAllocator::new();
    p.set_mode(FiringMode::Heavy);
    assert_eq!(p.fire(&body(), 0, &mut ids).len(), 1);
    // switching mode does not inherit the heavy cooldown
    p.set_mode(FiringMode::Single);
    assert_eq!(p.fire(&body(), 10, &mut ids).len(), 1);
    p.set_mode(FiringMode::Heavy);
    assert!(p.fire(&body(), 500, &mut ids).is_empty());
}

#[test]
fn single_shot_leaves_nose() {
    let mut p = PlayerState::new();
    let mut ids = IdAllocator::new();
    let shots = p.fire(&body(), 0, &mut ids);
    assert_eq!(shots[0].position(), Vec2::new(105.0, 430.0));
    assert_eq!(velocities(&shots), vec![Vec2::new(15.0, 0.0)]);
}

#[test]
fn set_mode_reports_change() {
    let mut p = PlayerState::new();
    assert!(!p.set_mode(FiringMode::Single));
    assert!(p.set_mode(FiringMode::Heavy));
    assert_eq!(p.mode(), FiringMode::Heavy);
}

// ── Boost ─────────────────────────────────────────────────────────────────────

fn drain_to_empty(p: &mut PlayerState, t: &mut Transform, now: u64) {
    p.set_boost(true, now);
    while p.is_boosting() {
        p.advance(t, now);
    }
}

#[test]
fn boost_drains_while_active() {
    let mut p = PlayerState::new();
    let mut t = Transform::at(PLAYER_ORIGIN);
    p.set_boost(true, 0);
    p.advance(&mut t, 0);
    assert_eq!(p.boost_energy(), 98.5);
}

#[test]
fn boost_deactivates_when_empty() {
    let mut p = PlayerState::new();
    let mut t = Transform::at(PLAYER_ORIGIN);
    drain_to_empty(&mut p, &mut t, 0);
    assert_eq!(p.boost_energy(), 0.0);
    assert!(!p.is_boosting());
}

#[test]
fn boost_with_no_energy_stays_inactive() {
    let mut p = PlayerState::new();
    let mut t = Transform::at(PLAYER_ORIGIN);
    drain_to_empty(&mut p, &mut t, 0);
    p.set_boost(true, 10);
    assert!(!p.is_boosting());
}

#[test]
fn recharge_waits_for_delay() {
    let mut p = PlayerState::new();
    let mut t = Transform::at(PLAYER_ORIGIN);
    drain_to_empty(&mut p, &mut t, 0);

    p.advance(&mut t, 1499);
    assert_eq!(p.boost_energy(), 0.0);
    p.advance(&mut t, 1500);
    assert_eq!(p.boost_energy(), 0.5);
}

#[test]
fn release_restarts_recharge_delay() {
    let mut p = PlayerState::new();
    let mut t = Transform::at(PLAYER_ORIGIN);
    p.set_boost(true, 0);
    p.advance(&mut t, 0);
    p.set_boost(false, 5000);
    p.advance(&mut t, 6000);
    assert_eq!(p.boost_energy(), 98.5);
    p.advance(&mut t, 6500);
    assert_eq!(p.boost_energy(), 99.0);
}

#[test]
fn recharge_clamped_at_max() {
    let mut p = PlayerState::new();
    let mut t = Transform::at(PLAYER_ORIGIN);
    for now in 0..10 {
        p.advance(&mut t, now);
    }
    assert_eq!(p.boost_energy(), MAX_BOOST_ENERGY);
}

#[test]
fn held_boost_key_is_edge_triggered() {
    let mut p = PlayerState::new();
    let mut t = Transform::at(PLAYER_ORIGIN);
    p.hold_boost(true, 0);
    assert!(p.is_boosting());
    p.advance(&mut t, 0);

    // releasing once starts the delay; staying released does not restart it
    p.hold_boost(false, 100);
    p.hold_boost(false, 1000);
    p.advance(&mut t, 1600);
    assert_eq!(p.boost_energy(), 99.0);
}

#[test]
fn boost_energy_stays_in_range_under_random_use() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut p = PlayerState::new();
    let mut t = Transform::at(PLAYER_ORIGIN);
    let mut now = 0;

    for _ in 0..5000 {
        now += rng.gen_range(0..=200);
        match rng.gen_range(0..4) {
            0 => p.set_boost(rng.gen_bool(0.5), now),
            1 => p.hold_boost(rng.gen_bool(0.5), now),
            2 => p.steer(rng.gen_range(-1..=1), rng.gen_range(-1..=1)),
            _ => p.advance(&mut t, now),
        }
        let energy = p.boost_energy();
        assert!((0.0..=MAX_BOOST_ENERGY).contains(&energy), "energy {energy}");
        if energy == 0.0 {
            assert!(!p.is_boosting());
        }
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[test]
fn moves_eight_per_tick() {
    let mut p = PlayerState::new();
    let mut t = Transform::at(PLAYER_ORIGIN);
    p.steer(1, 1);
    p.advance(&mut t, 0);
    assert_eq!(t.offset, Vec2::new(8.0, 8.0));
}

#[test]
fn boost_multiplies_step() {
    let mut p = PlayerState::new();
    let mut t = Transform::at(PLAYER_ORIGIN);
    p.set_boost(true, 0);
    p.steer(1, -1);
    p.advance(&mut t, 0);
    assert_eq!(t.offset, Vec2::new(12.0, -12.0));
}

#[test]
fn move_out_of_bounds_is_skipped() {
    let mut p = PlayerState::new();
    let mut t = Transform::at(PLAYER_ORIGIN);
    p.steer(-1, 0);
    p.advance(&mut t, 0);
    assert_eq!(t.offset.x, 0.0);

    t.offset = Vec2::new(996.0, 396.0);
    p.steer(1, 1);
    p.advance(&mut t, 0);
    // not clamped to the edge
    assert_eq!(t.offset, Vec2::new(996.0, 396.0));
}

#[test]
fn edge_reachable_exactly() {
    let mut p = PlayerState::new();
    let mut t = Transform::at(PLAYER_ORIGIN);
    t.offset = Vec2::new(992.0, -392.0);
    p.steer(1, -1);
    p.advance(&mut t, 0);
    assert_eq!(t.offset, Vec2::new(1000.0, -400.0));
}
