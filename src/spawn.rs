//! Enemy spawning.
//!
//! Each tick the controller tops the enemy set up towards a target size.
//! Every missing slot spawns with the configured probability; a spawned
//! enemy gets a uniform vertical position and a variant draw.  On boss
//! levels the target and probability step up as the boss weakens.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::{EnemyKind, Entity, IdAllocator, Vec2};
use crate::random::RandomSource;

/// Enemy target, per-slot spawn probability and share of advanced planes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnRule {
    pub enemy_cap: usize,
    pub probability: f64,
    #[serde(default)]
    pub advanced_share: f64,
}

/// Replacement cap/probability once the boss health fraction is at or below
/// `threshold`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnTier {
    pub threshold: f64,
    pub enemy_cap: usize,
    pub probability: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnController {
    base: SpawnRule,
    /// Sorted by ascending threshold.
    tiers: Vec<SpawnTier>,
    spawn_x: f64,
    max_y: f64,
}

impl SpawnController {
    pub fn new(base: SpawnRule, mut tiers: Vec<SpawnTier>, spawn_x: f64, max_y: f64) -> Self {
        tiers.sort_by(|a, b| a.threshold.total_cmp(&b.threshold));
        Self {
            base,
            tiers,
            spawn_x,
            max_y,
        }
    }

    /// The rule in force for a given boss health fraction.  Without a boss,
    /// or above every threshold, the base rule applies.
    pub fn rule_for(&self, boss_fraction: Option<f64>) -> SpawnRule {
        let Some(fraction) = boss_fraction else {
            return self.base;
        };
        self.tiers
            .iter()
            .find(|tier| fraction <= tier.threshold)
            .map(|tier| SpawnRule {
                enemy_cap: tier.enemy_cap,
                probability: tier.probability,
                advanced_share: self.base.advanced_share,
            })
            .unwrap_or(self.base)
    }

    /// New enemies for this tick.  `current` excludes the boss.
    pub fn spawn(
        &self,
        current: usize,
        boss_fraction: Option<f64>,
        rng: &mut dyn RandomSource,
        ids: &mut IdAllocator,
    ) -> Vec<Entity> {
        let rule = self.rule_for(boss_fraction);
        let deficit = rule.enemy_cap.saturating_sub(current);
        let mut spawned = Vec::new();

        for _ in 0..deficit {
            if rng.next_unit() >= rule.probability {
                continue;
            }
            let y = rng.next_unit() * self.max_y;
            // single-variant levels skip the variant draw
            let kind = if rule.advanced_share > 0.0 && rng.next_unit() >= 1.0 - rule.advanced_share {
                EnemyKind::Advanced
            } else {
                EnemyKind::Basic
            };
            spawned.push(Entity::enemy(ids.next_id(), kind, Vec2::new(self.spawn_x, y)));
        }

        if !spawned.is_empty() {
            debug!(count = spawned.len(), current, "spawned enemies");
        }
        spawned
    }
}
