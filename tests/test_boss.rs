use final_flight::boss::*;
use final_flight::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn make_boss(rng: &mut StdRng) -> Entity {
    Entity::boss(1, rng)
}

fn state(boss: &Entity) -> &BossState {
    boss.as_boss().expect("boss entity")
}

fn health(boss: &Entity) -> u32 {
    boss.health().map_or(0, |h| h.current())
}

fn hit(boss: &mut Entity, times: usize) {
    for _ in 0..times {
        boss.take_damage();
    }
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn starts_at_origin_with_full_health() {
    let mut rng = seeded_rng();
    let boss = make_boss(&mut rng);
    assert_eq!(boss.position(), Vec2::new(1150.0, 400.0));
    assert_eq!(health(&boss), 100);
    assert_eq!(state(&boss).phase(), BossPhase::Normal);
    assert_eq!(state(&boss).fire_probability(), 0.04);
}

#[test]
fn move_pattern_has_five_of_each() {
    let mut rng = seeded_rng();
    let boss = make_boss(&mut rng);
    let pattern = state(&boss).pattern();
    assert_eq!(pattern.len(), 15);
    assert_eq!(pattern.iter().filter(|&&m| m == 8.0).count(), 5);
    assert_eq!(pattern.iter().filter(|&&m| m == -8.0).count(), 5);
    assert_eq!(pattern.iter().filter(|&&m| m == 0.0).count(), 5);
}

// ── Move pattern ──────────────────────────────────────────────────────────────

#[test]
fn same_move_read_ten_times_then_advances() {
    let mut rng = seeded_rng();
    let mut boss = BossState::new(&mut rng);
    let first = boss.pattern()[0];
    for _ in 0..10 {
        assert_eq!(boss.next_move(&mut rng), first);
    }
    // reshuffled, now reading slot 1 of the new order
    let second = boss.pattern()[1];
    assert_eq!(boss.next_move(&mut rng), second);
}

#[test]
fn index_wraps_after_full_cycle() {
    let mut rng = seeded_rng();
    let mut boss = BossState::new(&mut rng);
    for _ in 0..(15 * 10) {
        boss.next_move(&mut rng);
    }
    let first = boss.pattern()[0];
    assert_eq!(boss.next_move(&mut rng), first);
}

#[test]
fn stays_inside_vertical_bounds() {
    let mut rng = seeded_rng();
    let mut boss = make_boss(&mut rng);
    for _ in 0..5000 {
        boss.update(0, &mut rng);
        let y = boss.position().y;
        assert!((-50.0..=700.0).contains(&y), "y out of range: {y}");
        assert_eq!(boss.position().x, 1150.0);
    }
}

// ── Shield ────────────────────────────────────────────────────────────────────

#[test]
fn fifty_hits_raise_shield_at_half() {
    let mut rng = seeded_rng();
    let mut boss = make_boss(&mut rng);
    hit(&mut boss, 49);
    assert!(!state(&boss).is_shielded());
    hit(&mut boss, 1);
    assert!(state(&boss).is_shielded());
    assert_eq!(health(&boss), 50);
}

#[test]
fn shield_absorbs_damage() {
    let mut rng = seeded_rng();
    let mut boss = make_boss(&mut rng);
    hit(&mut boss, 60);
    assert_eq!(health(&boss), 50);
    assert!(!boss.is_destroyed());
}

#[test]
fn shield_lasts_exactly_250_ticks() {
    let mut rng = seeded_rng();
    let mut boss = make_boss(&mut rng);
    hit(&mut boss, 50);
    for _ in 0..249 {
        boss.update(0, &mut rng);
    }
    assert!(state(&boss).is_shielded());
    assert_eq!(state(&boss).shield_ticks(), 249);
    boss.update(0, &mut rng);
    assert!(!state(&boss).is_shielded());
    assert_eq!(state(&boss).shield_ticks(), 0);
}

#[test]
fn half_latch_fires_once() {
    let mut rng = seeded_rng();
    let mut boss = make_boss(&mut rng);
    hit(&mut boss, 50);
    for _ in 0..250 {
        boss.update(0, &mut rng);
    }
    // still at 50%, shield must not come back
    for _ in 0..10 {
        boss.update(0, &mut rng);
    }
    assert!(!state(&boss).is_shielded());
    hit(&mut boss, 1);
    assert_eq!(health(&boss), 49);
}

#[test]
fn second_shield_at_one_fifth() {
    let mut rng = seeded_rng();
    let mut boss = make_boss(&mut rng);
    hit(&mut boss, 50);
    for _ in 0..250 {
        boss.update(0, &mut rng);
    }
    hit(&mut boss, 29);
    assert_eq!(health(&boss), 21);
    assert!(!state(&boss).is_shielded());
    hit(&mut boss, 1);
    assert!(state(&boss).is_shielded());
    assert_eq!(health(&boss), 20);
}

#[test]
fn shield_latch_also_checked_on_update() {
    let mut rng = seeded_rng();
    let mut boss = BossState::new(&mut rng);
    let mut t = Transform::at(BOSS_ORIGIN);
    let mut low = Health::full(100);
    low.damage(55);
    boss.update(&mut t, &low, &mut rng);
    assert!(boss.is_shielded());
    assert_eq!(boss.shield_ticks(), 0);
}

// ── Boost ─────────────────────────────────────────────────────────────────────

fn boss_at_one_fifth(rng: &mut StdRng) -> Entity {
    let mut boss = make_boss(rng);
    hit(&mut boss, 50);
    for _ in 0..250 {
        boss.update(0, rng);
    }
    hit(&mut boss, 30);
    boss
}

#[test]
fn boost_applies_on_update_at_one_fifth() {
    let mut rng = seeded_rng();
    let mut boss = boss_at_one_fifth(&mut rng);
    assert!(!state(&boss).is_boosted());
    boss.update(0, &mut rng);
    assert!(state(&boss).is_boosted());
    assert_eq!(state(&boss).fire_probability(), BOSS_BOOSTED_FIRE_PROBABILITY);
}

#[test]
fn boost_doubles_move_magnitude() {
    let mut rng = seeded_rng();
    let mut boss = boss_at_one_fifth(&mut rng);
    boss.update(0, &mut rng);
    let pattern = state(&boss).pattern();
    assert_eq!(pattern.len(), 15);
    assert_eq!(pattern.iter().filter(|&&m| m == 16.0).count(), 5);
    assert_eq!(pattern.iter().filter(|&&m| m == -16.0).count(), 5);
    assert_eq!(pattern.iter().filter(|&&m| m == 0.0).count(), 5);
}

#[test]
fn phase_reports_shield_over_boost() {
    let mut rng = seeded_rng();
    let mut boss = boss_at_one_fifth(&mut rng);
    boss.update(0, &mut rng);
    assert_eq!(state(&boss).phase(), BossPhase::Shielded);
    for _ in 0..250 {
        boss.update(0, &mut rng);
    }
    assert_eq!(state(&boss).phase(), BossPhase::Boosted);
}

#[test]
fn boss_destroyed_at_zero() {
    let mut rng = seeded_rng();
    let mut boss = boss_at_one_fifth(&mut rng);
    boss.update(0, &mut rng);
    for _ in 0..250 {
        boss.update(0, &mut rng);
    }
    hit(&mut boss, 20);
    assert_eq!(health(&boss), 0);
    assert!(boss.is_destroyed());
}
