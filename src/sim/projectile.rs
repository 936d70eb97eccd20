//! Player and enemy projectiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pattern::BulletDesc;
use super::player::{Player, Turret};
use super::rng::SimRng;
use crate::consts::*;
use crate::tuning::WeaponSpecial;
use crate::{angle_of, from_angle};

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    pub size: f32,
    pub owner: Owner,
    /// Extra enemies this projectile may pass through after its first hit
    pub piercing: u32,
    pub hit_count: u32,
    /// Max travel distance (None = unlimited)
    pub range: Option<f32>,
    pub travelled: f32,
    pub explosion_radius: Option<f32>,
    pub alive: bool,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, damage: f32, size: f32, owner: Owner) -> Self {
        Self {
            pos,
            vel,
            damage,
            size,
            owner,
            piercing: 0,
            hit_count: 0,
            range: None,
            travelled: 0.0,
            explosion_radius: None,
            alive: true,
        }
    }

    /// Enemy bullet from a pattern descriptor
    pub fn from_desc(desc: &BulletDesc) -> Self {
        Self::new(desc.pos, desc.vel, desc.damage, desc.size, Owner::Enemy)
    }

    pub fn update(&mut self, dt: f32) {
        let step = self.vel * dt;
        self.pos += step;
        self.travelled += step.length();

        if self.range.is_some_and(|range| self.travelled >= range) {
            self.alive = false;
        }
    }

    pub fn is_out_of_bounds(&self, arena_w: f32, arena_h: f32) -> bool {
        let m = PROJECTILE_CULL_MARGIN;
        self.pos.x < -m || self.pos.x > arena_w + m || self.pos.y < -m || self.pos.y > arena_h + m
    }

    /// Register a resolved hit; deactivates once the pierce budget is spent
    pub fn on_hit(&mut self) {
        self.hit_count += 1;
        if self.hit_count > self.piercing {
            self.alive = false;
        }
    }
}

/// Build one volley from the player's weapon along the current aim
pub fn player_volley(player: &Player, rng: &mut SimRng) -> Vec<Projectile> {
    let weapon = &player.weapon;
    let count = weapon.projectiles_per_shot.max(1);
    let base_angle = angle_of(player.aim_dir);
    let spread = weapon.spread_degrees.to_radians();

    let piercing = player.piercing
        + if weapon.special == WeaponSpecial::Piercing {
            PIERCING_WEAPON_BONUS
        } else {
            0
        };
    let explosion = match weapon.special {
        WeaponSpecial::Explosive => {
            let base = if weapon.explosion_radius > 0.0 {
                weapon.explosion_radius
            } else {
                DEFAULT_EXPLOSION_RADIUS
            };
            base + player.explosion_radius
        }
        _ => player.explosion_radius,
    };

    (0..count)
        .map(|i| {
            let offset = if count > 1 {
                (i as f32 / (count - 1) as f32 - 0.5) * spread
            } else {
                (rng.unit() - 0.5) * spread
            };
            let vel = from_angle(base_angle + offset, weapon.projectile_speed);
            let mut p = Projectile::new(
                player.pos,
                vel,
                player.effective_damage(rng),
                PLAYER_PROJECTILE_SIZE,
                Owner::Player,
            );
            p.piercing = piercing;
            p.range = weapon.range;
            p.explosion_radius = (explosion > 0.0).then_some(explosion);
            p
        })
        .collect()
}

/// Turret shot toward a target; None when the target sits on the turret
pub fn turret_shot(turret: &Turret, target: Vec2) -> Option<Projectile> {
    let dir = (target - turret.pos).normalize_or_zero();
    if dir == Vec2::ZERO {
        return None;
    }
    Some(Projectile::new(
        turret.pos,
        dir * TURRET_PROJECTILE_SPEED,
        turret.damage,
        TURRET_PROJECTILE_SIZE,
        Owner::Player,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{CharacterId, UpgradeBonuses, WeaponId, characters, weapons};

    #[test]
    fn test_pierce_budget() {
        let mut p = Projectile::new(Vec2::ZERO, Vec2::X, 10.0, 5.0, Owner::Player);
        p.piercing = 2;
        p.on_hit();
        assert!(p.alive);
        p.on_hit();
        assert!(p.alive);
        p.on_hit();
        assert!(!p.alive);
        assert_eq!(p.hit_count, 3);
    }

    #[test]
    fn test_no_pierce_dies_on_first_hit() {
        let mut p = Projectile::new(Vec2::ZERO, Vec2::X, 10.0, 5.0, Owner::Player);
        p.on_hit();
        assert!(!p.alive);
    }

    #[test]
    fn test_range_limit() {
        let mut p = Projectile::new(Vec2::ZERO, Vec2::new(100.0, 0.0), 10.0, 5.0, Owner::Player);
        p.range = Some(80.0);
        p.update(0.5);
        assert!(p.alive);
        p.update(0.5);
        assert!(!p.alive);
        assert!((p.travelled - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_out_of_bounds_margin() {
        let mut p = Projectile::new(Vec2::new(-15.0, 10.0), Vec2::ZERO, 1.0, 4.0, Owner::Enemy);
        assert!(!p.is_out_of_bounds(400.0, 700.0));
        p.pos.x = -21.0;
        assert!(p.is_out_of_bounds(400.0, 700.0));
        p.pos = Vec2::new(10.0, 721.0);
        assert!(p.is_out_of_bounds(400.0, 700.0));
    }

    #[test]
    fn test_shotgun_fans_evenly() {
        let player = Player::new(&characters::get(CharacterId::Tank), &UpgradeBonuses::default());
        assert_eq!(player.weapon.id, WeaponId::Shotgun);
        let mut rng = SimRng::new(5);
        let volley = player_volley(&player, &mut rng);
        assert_eq!(volley.len(), 5);
        let aim = angle_of(player.aim_dir);
        let half = player.weapon.spread_degrees.to_radians() / 2.0;
        assert!((angle_of(volley[0].vel) - (aim - half)).abs() < 1e-4);
        assert!((angle_of(volley[2].vel) - aim).abs() < 1e-4);
        assert!((angle_of(volley[4].vel) - (aim + half)).abs() < 1e-4);
        assert!(volley.iter().all(|p| p.owner == Owner::Player && p.explosion_radius.is_none()));
    }

    #[test]
    fn test_weapon_specials_carry_over() {
        let mut rng = SimRng::new(5);
        let ghost = Player::new(&characters::get(CharacterId::Ghost), &UpgradeBonuses::default());
        assert_eq!(player_volley(&ghost, &mut rng)[0].piercing, PIERCING_WEAPON_BONUS);

        let bonuses = UpgradeBonuses {
            explosion_radius: 20.0,
            piercing: 1.0,
            ..Default::default()
        };
        let demo = Player::new(&characters::get(CharacterId::Demolitionist), &bonuses);
        let shot = &player_volley(&demo, &mut rng)[0];
        assert_eq!(shot.explosion_radius, Some(weapons::get(WeaponId::Rocket).explosion_radius + 20.0));
        assert_eq!(shot.piercing, 1);
    }

    #[test]
    fn test_turret_shot() {
        let turret = Turret {
            pos: Vec2::ZERO,
            timer: 0.0,
            cooldown: TURRET_COOLDOWN,
            damage: 5.0,
            lifetime: 8.0,
            range: TURRET_RANGE,
        };
        let shot = turret_shot(&turret, Vec2::new(0.0, 50.0)).unwrap();
        assert!((shot.vel - Vec2::new(0.0, TURRET_PROJECTILE_SPEED)).length() < 1e-3);
        assert_eq!(shot.damage, 5.0);
        assert!(turret_shot(&turret, Vec2::ZERO).is_none());
    }
}
