//! Weapon definitions referenced by characters

use serde::{Deserialize, Serialize};

/// Weapon identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponId {
    Pistol,
    Smg,
    Shotgun,
    Sniper,
    BurstRifle,
    MeleeBlaster,
    Rocket,
}

/// Special behavior carried by a weapon's projectiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponSpecial {
    #[default]
    None,
    /// Projectiles pass through extra enemies
    Piercing,
    /// Projectiles burst on impact, splashing nearby enemies
    Explosive,
}

/// A weapon's firing characteristics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDef {
    pub id: WeaponId,
    pub name: String,
    /// Seconds between shots
    pub cooldown: f32,
    pub projectile_speed: f32,
    pub damage: f32,
    /// Total fan/jitter angle in degrees
    pub spread_degrees: f32,
    pub projectiles_per_shot: u32,
    #[serde(default)]
    pub special: WeaponSpecial,
    /// Max travel distance (None = until it leaves the arena)
    #[serde(default)]
    pub range: Option<f32>,
    #[serde(default)]
    pub explosion_radius: f32,
}

impl WeaponDef {
    #[allow(clippy::too_many_arguments)]
    fn new(
        id: WeaponId,
        name: &str,
        cooldown: f32,
        projectile_speed: f32,
        damage: f32,
        spread_degrees: f32,
        projectiles_per_shot: u32,
        special: WeaponSpecial,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            cooldown,
            projectile_speed,
            damage,
            spread_degrees,
            projectiles_per_shot,
            special,
            range: None,
            explosion_radius: 0.0,
        }
    }
}

/// Built-in weapon table
pub fn all() -> Vec<WeaponDef> {
    vec![
        WeaponDef::new(WeaponId::Pistol, "Pistol", 0.3, 350.0, 10.0, 5.0, 1, WeaponSpecial::None),
        WeaponDef::new(WeaponId::Smg, "SMG", 0.12, 380.0, 5.0, 12.0, 1, WeaponSpecial::None),
        WeaponDef::new(WeaponId::Shotgun, "Shotgun", 0.6, 300.0, 8.0, 35.0, 5, WeaponSpecial::None),
        WeaponDef::new(WeaponId::Sniper, "Sniper Rifle", 0.9, 600.0, 35.0, 1.0, 1, WeaponSpecial::Piercing),
        WeaponDef::new(WeaponId::BurstRifle, "Burst Rifle", 0.4, 400.0, 7.0, 8.0, 3, WeaponSpecial::None),
        WeaponDef {
            range: Some(80.0),
            ..WeaponDef::new(
                WeaponId::MeleeBlaster,
                "Melee Blaster",
                0.18,
                200.0,
                14.0,
                30.0,
                2,
                WeaponSpecial::None,
            )
        },
        WeaponDef {
            explosion_radius: 40.0,
            ..WeaponDef::new(WeaponId::Rocket, "Rocket Launcher", 0.8, 250.0, 30.0, 3.0, 1, WeaponSpecial::Explosive)
        },
    ]
}

/// Look up a weapon, falling back to the pistol
pub fn get(id: WeaponId) -> WeaponDef {
    let mut table = all();
    match table.iter().position(|w| w.id == id) {
        Some(i) => table.swap_remove(i),
        None => table.swap_remove(0),
    }
}
