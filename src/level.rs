//! Level configuration.
//!
//! A level is plain data: screen size, starting health, kill goal, spawn
//! rule and, for boss levels, the spawn tiers keyed on boss health.  The
//! built-in campaign is three levels; a full table can also be loaded from
//! JSON.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spawn::{SpawnController, SpawnRule, SpawnTier};

/// Enemies never spawn in the bottom strip of this height.
pub const ENEMY_Y_MARGIN: f64 = 100.0;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(pub String);

impl LevelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LevelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("unknown level `{0}`")]
    UnknownLevel(LevelId),
    #[error("invalid level `{id}`: {reason}")]
    InvalidConfig { id: LevelId, reason: String },
    #[error("failed to parse level table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read level table: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: f64,
    pub height: f64,
}

/// Spawn tiers for a level whose goal is destroying the boss.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BossSettings {
    #[serde(default)]
    pub tiers: Vec<SpawnTier>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: LevelId,
    #[serde(default)]
    pub background: String,
    pub screen: ScreenSize,
    pub player_health: u32,
    pub kill_target: u32,
    pub spawn: SpawnRule,
    #[serde(default)]
    pub next: Option<LevelId>,
    #[serde(default)]
    pub boss: Option<BossSettings>,
}

impl LevelConfig {
    pub fn enemy_max_y(&self) -> f64 {
        (self.screen.height - ENEMY_Y_MARGIN).max(0.0)
    }

    pub fn spawn_controller(&self) -> SpawnController {
        let tiers = self
            .boss
            .as_ref()
            .map(|boss| boss.tiers.clone())
            .unwrap_or_default();
        SpawnController::new(self.spawn, tiers, self.screen.width, self.enemy_max_y())
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        let invalid = |reason: &str| LevelError::InvalidConfig {
            id: self.id.clone(),
            reason: reason.to_string(),
        };
        if self.screen.width <= 0.0 || self.screen.height <= 0.0 {
            return Err(invalid("screen size must be positive"));
        }
        if self.player_health == 0 {
            return Err(invalid("player health must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.spawn.probability) {
            return Err(invalid("spawn probability must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.spawn.advanced_share) {
            return Err(invalid("advanced share must be within [0, 1]"));
        }
        for tier in self.boss.iter().flat_map(|boss| boss.tiers.iter()) {
            if tier.threshold <= 0.0 || tier.threshold > 1.0 {
                return Err(invalid("tier threshold must be within (0, 1]"));
            }
            if !(0.0..=1.0).contains(&tier.probability) {
                return Err(invalid("tier probability must be within [0, 1]"));
            }
        }
        Ok(())
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct LevelRegistry {
    levels: HashMap<LevelId, LevelConfig>,
    first: Option<LevelId>,
}

impl LevelRegistry {
    pub fn new(levels: Vec<LevelConfig>) -> Result<Self, LevelError> {
        let first = levels.first().map(|level| level.id.clone());
        let mut map = HashMap::with_capacity(levels.len());
        for level in levels {
            level.validate()?;
            if map.contains_key(&level.id) {
                return Err(LevelError::InvalidConfig {
                    id: level.id,
                    reason: "duplicate level id".to_string(),
                });
            }
            map.insert(level.id.clone(), level);
        }
        Ok(Self { levels: map, first })
    }

    pub fn builtin() -> Self {
        let levels = builtin_levels();
        let first = levels.first().map(|level| level.id.clone());
        Self {
            levels: levels.into_iter().map(|l| (l.id.clone(), l)).collect(),
            first,
        }
    }

    /// Parse a JSON array of level configs.  The first entry is the
    /// campaign start.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let levels: Vec<LevelConfig> = serde_json::from_str(json)?;
        Self::new(levels)
    }

    pub fn from_path(path: &Path) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn get(&self, id: &LevelId) -> Result<&LevelConfig, LevelError> {
        self.levels
            .get(id)
            .ok_or_else(|| LevelError::UnknownLevel(id.clone()))
    }

    pub fn first(&self) -> Option<&LevelId> {
        self.first.as_ref()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

const SCREEN: ScreenSize = ScreenSize {
    width: 1540.0,
    height: 870.0,
};

pub fn builtin_levels() -> Vec<LevelConfig> {
    vec![
        LevelConfig {
            id: LevelId::new("level-one"),
            background: "background1".into(),
            screen: SCREEN,
            player_health: 5,
            kill_target: 10,
            spawn: SpawnRule {
                enemy_cap: 5,
                probability: 0.015,
                advanced_share: 0.0,
            },
            next: Some(LevelId::new("level-two")),
            boss: None,
        },
        LevelConfig {
            id: LevelId::new("level-two"),
            background: "background2".into(),
            screen: SCREEN,
            player_health: 5,
            kill_target: 15,
            spawn: SpawnRule {
                enemy_cap: 7,
                probability: 0.0175,
                advanced_share: 0.2,
            },
            next: Some(LevelId::new("level-three")),
            boss: None,
        },
        LevelConfig {
            id: LevelId::new("level-three"),
            background: "background3".into(),
            screen: SCREEN,
            player_health: 5,
            kill_target: 0,
            spawn: SpawnRule {
                enemy_cap: 2,
                probability: 0.02,
                advanced_share: 0.35,
            },
            next: None,
            boss: Some(BossSettings {
                tiers: vec![
                    SpawnTier {
                        threshold: 0.5,
                        enemy_cap: 3,
                        probability: 0.0225,
                    },
                    SpawnTier {
                        threshold: 0.2,
                        enemy_cap: 4,
                        probability: 0.025,
                    },
                ],
            }),
        },
    ]
}
