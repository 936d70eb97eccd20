//! Level definitions
//!
//! A level is an arena, a weighted spawn table, a wave count and a boss.

use serde::{Deserialize, Serialize};

use super::characters::UnlockCondition;
use crate::sim::{BulletPattern, EnemyKind};

/// One weighted row of a level's spawn table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub enemy: EnemyKind,
    pub pattern: BulletPattern,
    pub weight: f32,
    /// Entry is only eligible from this wave on
    #[serde(default)]
    pub min_wave: Option<u32>,
}

impl SpawnEntry {
    pub fn eligible(&self, wave: u32) -> bool {
        self.min_wave.is_none_or(|min| wave >= min)
    }
}

/// Boss appearing on every boss-interval wave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossDef {
    pub hp: f32,
    pub size: f32,
    pub pattern: BulletPattern,
    #[serde(default = "one")]
    pub phases: u32,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    pub id: String,
    pub name: String,
    pub arena_width: f32,
    pub arena_height: f32,
    pub total_waves: u32,
    pub spawn_table: Vec<SpawnEntry>,
    pub boss: BossDef,
    pub unlock: UnlockCondition,
}

fn entry(enemy: EnemyKind, pattern: BulletPattern, weight: f32, min_wave: Option<u32>) -> SpawnEntry {
    SpawnEntry {
        enemy,
        pattern,
        weight,
        min_wave,
    }
}

/// Built-in campaign
pub fn all() -> Vec<LevelDef> {
    use BulletPattern as P;
    use EnemyKind as E;
    vec![
        LevelDef {
            id: "level1".into(),
            name: "The Arena".into(),
            arena_width: 400.0,
            arena_height: 700.0,
            total_waves: 10,
            spawn_table: vec![
                entry(E::Grunt, P::Radial, 70.0, None),
                entry(E::Shooter, P::Aimed, 30.0, None),
            ],
            boss: BossDef {
                hp: 300.0,
                size: 28.0,
                pattern: P::RadialFast,
                phases: 1,
            },
            unlock: UnlockCondition::Default,
        },
        LevelDef {
            id: "level2".into(),
            name: "The Gauntlet".into(),
            arena_width: 500.0,
            arena_height: 800.0,
            total_waves: 15,
            spawn_table: vec![
                entry(E::Grunt, P::Radial, 40.0, None),
                entry(E::Shooter, P::Spiral, 35.0, None),
                entry(E::MiniBoss, P::AimedBurst, 25.0, Some(3)),
            ],
            boss: BossDef {
                hp: 600.0,
                size: 32.0,
                pattern: P::SpiralMulti,
                phases: 1,
            },
            unlock: UnlockCondition::LevelsCompleted { count: 1 },
        },
        LevelDef {
            id: "level3".into(),
            name: "The Inferno".into(),
            arena_width: 600.0,
            arena_height: 900.0,
            total_waves: 20,
            spawn_table: vec![
                entry(E::Grunt, P::Radial, 30.0, None),
                entry(E::Shooter, P::Spiral, 30.0, None),
                entry(E::FastGrunt, P::Aimed, 20.0, None),
                entry(E::MiniBoss, P::Wave, 20.0, Some(2)),
            ],
            boss: BossDef {
                hp: 1000.0,
                size: 36.0,
                pattern: P::MultiPhase,
                phases: 3,
            },
            unlock: UnlockCondition::LevelsCompleted { count: 2 },
        },
    ]
}

/// Level by campaign index
pub fn get(index: usize) -> Option<LevelDef> {
    all().into_iter().nth(index)
}
