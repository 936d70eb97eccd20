//! Upgradeable shop items
//!
//! Each item raises one stat; every purchased level adds its delta. The
//! summed deltas become the [`UpgradeBonuses`] applied when a run starts.

use serde::{Deserialize, Serialize};

/// Stat touched by an upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    MaxHealth,
    Speed,
    /// Seconds shaved off the weapon cooldown
    CooldownReduction,
    ProjectileSpeed,
    Piercing,
    ProjectilesPerShot,
    HealthRegen,
    MagnetRadius,
    Shield,
    ExplosionRadius,
    CritChance,
    DamageBoost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    WeaponUpgrade,
    PlayerBoost,
    Passive,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpgradeLevel {
    pub delta: f32,
    pub cost: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub stat: Stat,
    pub levels: Vec<UpgradeLevel>,
}

impl ItemDef {
    /// Sum of deltas for the first `level` purchased levels
    pub fn total_delta(&self, level: usize) -> f32 {
        self.levels.iter().take(level).map(|l| l.delta).sum()
    }
}

/// Accumulated stat deltas from purchased upgrades
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeBonuses {
    pub max_health: f32,
    pub speed: f32,
    pub cooldown_reduction: f32,
    pub projectile_speed: f32,
    pub piercing: f32,
    pub projectiles_per_shot: f32,
    pub health_regen: f32,
    pub magnet_radius: f32,
    pub shield: f32,
    pub explosion_radius: f32,
    pub crit_chance: f32,
    pub damage_boost: f32,
}

impl UpgradeBonuses {
    /// Add a delta to the given stat
    pub fn add(&mut self, stat: Stat, delta: f32) {
        let slot = match stat {
            Stat::MaxHealth => &mut self.max_health,
            Stat::Speed => &mut self.speed,
            Stat::CooldownReduction => &mut self.cooldown_reduction,
            Stat::ProjectileSpeed => &mut self.projectile_speed,
            Stat::Piercing => &mut self.piercing,
            Stat::ProjectilesPerShot => &mut self.projectiles_per_shot,
            Stat::HealthRegen => &mut self.health_regen,
            Stat::MagnetRadius => &mut self.magnet_radius,
            Stat::Shield => &mut self.shield,
            Stat::ExplosionRadius => &mut self.explosion_radius,
            Stat::CritChance => &mut self.crit_chance,
            Stat::DamageBoost => &mut self.damage_boost,
        };
        *slot += delta;
    }
}

fn item(id: &str, name: &str, kind: ItemKind, stat: Stat, levels: &[(f32, u64)]) -> ItemDef {
    ItemDef {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        stat,
        levels: levels
            .iter()
            .map(|&(delta, cost)| UpgradeLevel { delta, cost })
            .collect(),
    }
}

/// Built-in shop inventory
pub fn all() -> Vec<ItemDef> {
    use ItemKind::*;
    vec![
        item(
            "reinforced_plating",
            "Reinforced Plating",
            PlayerBoost,
            Stat::MaxHealth,
            &[(20.0, 30), (15.0, 60), (12.0, 100), (10.0, 150), (8.0, 220)],
        ),
        item(
            "lightweight_boots",
            "Lightweight Boots",
            PlayerBoost,
            Stat::Speed,
            &[(15.0, 25), (12.0, 50), (10.0, 85), (8.0, 130)],
        ),
        item(
            "auto_loader",
            "Auto-Loader",
            WeaponUpgrade,
            Stat::CooldownReduction,
            &[(0.020, 35), (0.015, 70), (0.012, 120), (0.010, 180)],
        ),
        item(
            "high_velocity_rounds",
            "High-Velocity Rounds",
            WeaponUpgrade,
            Stat::ProjectileSpeed,
            &[(40.0, 30), (35.0, 60), (30.0, 100)],
        ),
        item(
            "piercing_rounds",
            "Piercing Rounds",
            WeaponUpgrade,
            Stat::Piercing,
            &[(1.0, 80), (1.0, 160), (1.0, 280)],
        ),
        item(
            "rapid_fire_mod",
            "Rapid Fire Mod",
            WeaponUpgrade,
            Stat::ProjectilesPerShot,
            &[(1.0, 60), (1.0, 130), (1.0, 220)],
        ),
        item(
            "nano_healer",
            "Nano-Healer",
            Passive,
            Stat::HealthRegen,
            &[(2.0, 40), (2.0, 80), (1.5, 130), (1.0, 190)],
        ),
        item(
            "coin_magnet",
            "Coin Magnet",
            Passive,
            Stat::MagnetRadius,
            &[(25.0, 20), (20.0, 45), (18.0, 80), (15.0, 120), (12.0, 170)],
        ),
        item(
            "shield_generator",
            "Shield Generator",
            Passive,
            Stat::Shield,
            &[(15.0, 100), (12.0, 200), (10.0, 320)],
        ),
        item(
            "explosive_rounds",
            "Explosive Rounds",
            WeaponUpgrade,
            Stat::ExplosionRadius,
            &[(20.0, 70), (15.0, 140), (12.0, 230)],
        ),
        item(
            "critical_tuner",
            "Critical Tuner",
            Passive,
            Stat::CritChance,
            &[(0.08, 50), (0.06, 100), (0.05, 160), (0.04, 240)],
        ),
        item(
            "ammo_reserve",
            "Ammo Reserve",
            Passive,
            Stat::DamageBoost,
            &[(3.0, 35), (3.0, 70), (2.0, 115), (2.0, 170), (1.0, 230)],
        ),
    ]
}

/// Find an item by id
pub fn find(id: &str) -> Option<ItemDef> {
    all().into_iter().find(|i| i.id == id)
}
