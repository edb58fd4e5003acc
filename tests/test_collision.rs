use final_flight::collision::*;
use final_flight::entities::*;

fn enemy_at(id: EntityId, x: f64, y: f64) -> Entity {
    Entity::enemy(id, EnemyKind::Basic, Vec2::new(x, y))
}

fn single_at(id: EntityId, x: f64, y: f64) -> Entity {
    Entity::projectile(id, ProjectileKind::Single, Vec2::new(x, y), Vec2::new(15.0, 0.0))
}

fn health(e: &Entity) -> u32 {
    e.health().map_or(0, |h| h.current())
}

// ── sweep ─────────────────────────────────────────────────────────────────────

#[test]
fn both_sides_take_one_hit() {
    let mut enemies = vec![enemy_at(1, 500.0, 100.0)];
    let mut shots = vec![single_at(2, 510.0, 110.0)];
    let contacts = sweep(&mut enemies, &mut shots);
    assert_eq!(contacts, 1);
    assert_eq!(health(&enemies[0]), 2);
    assert!(shots[0].is_destroyed());
}

#[test]
fn apart_entities_untouched() {
    let mut enemies = vec![enemy_at(1, 500.0, 100.0)];
    let mut shots = vec![single_at(2, 100.0, 600.0)];
    assert_eq!(sweep(&mut enemies, &mut shots), 0);
    assert_eq!(health(&enemies[0]), 3);
    assert!(!shots[0].is_destroyed());
}

#[test]
fn destroyed_projectile_still_hits_overlapping_planes() {
    // two stacked planes, one shot overlapping both
    let mut enemies = vec![enemy_at(1, 500.0, 100.0), enemy_at(2, 510.0, 105.0)];
    let mut shots = vec![single_at(3, 520.0, 110.0)];
    let contacts = sweep(&mut enemies, &mut shots);
    assert_eq!(contacts, 2);
    assert_eq!(health(&enemies[0]), 2);
    assert_eq!(health(&enemies[1]), 2);
}

#[test]
fn every_pair_is_tested() {
    let mut enemies = vec![enemy_at(1, 500.0, 100.0), enemy_at(2, 900.0, 100.0)];
    let mut shots = vec![
        single_at(3, 510.0, 110.0),
        single_at(4, 910.0, 110.0),
        single_at(5, 100.0, 700.0),
    ];
    assert_eq!(sweep(&mut enemies, &mut shots), 2);
    assert!(!shots[2].is_destroyed());
}

#[test]
fn intersects_uses_hitboxes() {
    let a = enemy_at(1, 0.0, 0.0); // 80 x 40
    assert!(intersects(&a, &enemy_at(2, 80.0, 40.0)));
    assert!(!intersects(&a, &enemy_at(3, 81.0, 0.0)));
}

// ── penetration ───────────────────────────────────────────────────────────────

#[test]
fn penetrating_enemy_hurts_player_and_is_removed() {
    let mut player = Entity::player(0, Health::full(5));
    let mut enemies = vec![enemy_at(1, 1540.0, 100.0), enemy_at(2, 1540.0, 300.0)];
    enemies[0].transform.offset.x = -1541.0;
    enemies[1].transform.offset.x = -1540.0; // exactly at the limit stays

    let breaches = resolve_penetration(&mut player, &mut enemies, 1540.0);
    assert_eq!(breaches, 1);
    assert_eq!(health(&player), 4);
    assert!(enemies[0].is_destroyed());
    assert!(!enemies[1].is_destroyed());
}
