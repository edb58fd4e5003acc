//! Pairwise collision between entity sets.
//!
//! Every pair is tested, O(|A| * |B|).  The sets involved are small (a
//! handful of planes against a few dozen projectiles) so there is no
//! spatial index.

use crate::entities::{Entity, Rect};

/// Anything that has bounds and can take a hit.
pub trait Collidable {
    fn bounds(&self) -> Rect;

    /// One discrete damage event.
    fn take_hit(&mut self);
}

impl Collidable for Entity {
    fn bounds(&self) -> Rect {
        Entity::bounds(self)
    }

    fn take_hit(&mut self) {
        self.take_damage();
    }
}

pub fn intersects(a: &impl Collidable, b: &impl Collidable) -> bool {
    a.bounds().intersects(&b.bounds())
}

/// Nested sweep with `targets` as the outer loop.  Each intersecting pair
/// deals one damage event to both sides, target first.  Entities already
/// destroyed earlier in the same sweep are still tested, so one projectile
/// can hit several overlapping planes in a single tick.
///
/// Returns the number of intersecting pairs.
pub fn sweep<A: Collidable, B: Collidable>(targets: &mut [A], hitters: &mut [B]) -> usize {
    let mut contacts = 0;
    for target in targets.iter_mut() {
        for hitter in hitters.iter_mut() {
            if intersects(target, hitter) {
                target.take_hit();
                hitter.take_hit();
                contacts += 1;
            }
        }
    }
    contacts
}

/// Enemies whose horizontal displacement has passed the screen width have
/// flown past the player.  Each one costs the player a hit and is removed.
///
/// Returns how many got through.
pub fn resolve_penetration(player: &mut Entity, enemies: &mut [Entity], screen_width: f64) -> usize {
    let mut breaches = 0;
    for enemy in enemies.iter_mut() {
        if enemy.transform.offset.x.abs() > screen_width {
            player.take_damage();
            enemy.destroy();
            breaches += 1;
        }
    }
    breaches
}
