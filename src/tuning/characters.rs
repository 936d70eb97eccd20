//! Playable characters
//!
//! Each character has base stats, a starting weapon, a special ability tag
//! and an unlock condition evaluated by the shop.

use serde::{Deserialize, Serialize};

use super::weapons::WeaponId;
use crate::consts::PLAYER_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterId {
    #[default]
    Rookie,
    Tank,
    Medic,
    Engineer,
    Ghost,
    Berserker,
    Demolitionist,
}

/// Active ability fired by the special trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialAbility {
    /// Short burst of triple speed
    #[default]
    Dash,
    /// Drop an autonomous turret at the player's position
    Turret,
    /// Timed damage immunity
    Invisibility,
}

/// Always-on character trait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Passive {
    /// Bonus damage while below 30% health
    Berserker,
}

/// How a character becomes available
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UnlockCondition {
    Default,
    Coins { cost: u64 },
    Plays { count: u32 },
    Score { threshold: u64 },
    LevelsCompleted { count: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub max_health: f32,
    pub health_regen: f32,
    pub speed: f32,
    pub base_damage: f32,
    /// Percentage damage reduction (0-100)
    pub armor: f32,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterDef {
    pub id: CharacterId,
    pub name: String,
    pub base_stats: BaseStats,
    pub starting_weapon: WeaponId,
    #[serde(default)]
    pub special: SpecialAbility,
    #[serde(default)]
    pub passive: Option<Passive>,
    pub unlock: UnlockCondition,
}

fn character(
    id: CharacterId,
    name: &str,
    (max_health, health_regen, speed, base_damage, armor, size): (f32, f32, f32, f32, f32, f32),
    starting_weapon: WeaponId,
    special: SpecialAbility,
    passive: Option<Passive>,
    unlock: UnlockCondition,
) -> CharacterDef {
    CharacterDef {
        id,
        name: name.to_string(),
        base_stats: BaseStats {
            max_health,
            health_regen,
            speed,
            base_damage,
            armor,
            size,
        },
        starting_weapon,
        special,
        passive,
        unlock,
    }
}

/// Built-in character roster (first entry is the default character)
pub fn all() -> Vec<CharacterDef> {
    use CharacterId as C;
    use SpecialAbility as S;
    use UnlockCondition as U;
    vec![
        character(
            C::Rookie,
            "Rookie",
            (100.0, 0.0, 160.0, 10.0, 0.0, PLAYER_SIZE),
            WeaponId::Pistol,
            S::Dash,
            None,
            U::Default,
        ),
        character(
            C::Tank,
            "Tank",
            (160.0, 0.0, 120.0, 12.0, 15.0, 18.0),
            WeaponId::Shotgun,
            S::Dash,
            None,
            U::Coins { cost: 200 },
        ),
        character(
            C::Medic,
            "Medic",
            (90.0, 3.0, 165.0, 8.0, 0.0, PLAYER_SIZE),
            WeaponId::Smg,
            S::Dash,
            None,
            U::Plays { count: 5 },
        ),
        character(
            C::Engineer,
            "Engineer",
            (100.0, 0.0, 150.0, 10.0, 5.0, PLAYER_SIZE),
            WeaponId::BurstRifle,
            S::Turret,
            None,
            U::LevelsCompleted { count: 1 },
        ),
        character(
            C::Ghost,
            "Ghost",
            (80.0, 0.0, 190.0, 11.0, 0.0, 12.0),
            WeaponId::Sniper,
            S::Invisibility,
            None,
            U::Score { threshold: 2000 },
        ),
        character(
            C::Berserker,
            "Berserker",
            (120.0, 0.0, 170.0, 14.0, 5.0, 15.0),
            WeaponId::MeleeBlaster,
            S::Dash,
            Some(Passive::Berserker),
            U::Coins { cost: 400 },
        ),
        character(
            C::Demolitionist,
            "Demolitionist",
            (110.0, 0.0, 145.0, 12.0, 10.0, 16.0),
            WeaponId::Rocket,
            S::Dash,
            None,
            U::LevelsCompleted { count: 2 },
        ),
    ]
}

/// Look up a character, falling back to the first (default) entry
pub fn get(id: CharacterId) -> CharacterDef {
    let mut roster = all();
    match roster.iter().position(|c| c.id == id) {
        Some(i) => roster.swap_remove(i),
        None => roster.swap_remove(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rookie_is_default() {
        let first = &all()[0];
        assert_eq!(first.id, CharacterId::Rookie);
        assert_eq!(first.unlock, UnlockCondition::Default);
        assert_eq!(first.base_stats.max_health, 100.0);
        assert_eq!(first.base_stats.speed, 160.0);
    }

    #[test]
    fn test_special_tags() {
        assert_eq!(get(CharacterId::Engineer).special, SpecialAbility::Turret);
        assert_eq!(get(CharacterId::Ghost).special, SpecialAbility::Invisibility);
        assert_eq!(get(CharacterId::Berserker).passive, Some(Passive::Berserker));
        assert_eq!(get(CharacterId::Tank).base_stats.armor, 15.0);
    }

    #[test]
    fn test_unlock_condition_json() {
        let json = serde_json::to_string(&UnlockCondition::Coins { cost: 200 }).unwrap();
        assert_eq!(json, r#"{"type":"coins","cost":200}"#);
    }
}
