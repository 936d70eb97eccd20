//! The player avatar: stats, movement, damage intake and special abilities

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::SimRng;
use crate::consts::*;
use crate::tuning::{CharacterDef, CharacterId, Passive, SpecialAbility, UpgradeBonuses, WeaponDef, weapons};
use crate::{clamp_len, clamp_to_arena};

/// Autonomous gun dropped by the turret special
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turret {
    pub pos: Vec2,
    /// Seconds until the next shot
    pub timer: f32,
    pub cooldown: f32,
    pub damage: f32,
    /// Seconds until the turret despawns
    pub lifetime: f32,
    pub range: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub character: CharacterId,
    pub name: String,
    pub special: SpecialAbility,
    pub passive: Option<Passive>,

    pub pos: Vec2,
    pub aim_dir: Vec2,
    pub size: f32,

    pub health: f32,
    pub max_health: f32,
    pub health_regen: f32,
    pub speed: f32,
    pub base_damage: f32,
    /// Percentage damage reduction (0-100)
    pub armor: f32,

    pub weapon: WeaponDef,
    pub piercing: u32,
    pub explosion_radius: f32,
    pub crit_chance: f32,
    pub magnet_radius: f32,

    pub shield_max: f32,
    pub shield_current: f32,
    shield_regen_timer: f32,

    // Timers, all in seconds
    pub shoot_timer: f32,
    pub invuln_timer: f32,
    pub dash_timer: f32,
    pub dash_cooldown: f32,
    pub special_cooldown: f32,
    pub invisible_timer: f32,

    pub turrets: Vec<Turret>,
    /// Upgrade deltas this player was built with
    pub bonuses: UpgradeBonuses,
}

fn tick_down(timer: &mut f32, dt: f32) {
    *timer = (*timer - dt).max(0.0);
}

impl Player {
    /// Build a player from a character definition plus purchased upgrades
    pub fn new(character: &CharacterDef, bonuses: &UpgradeBonuses) -> Self {
        let stats = &character.base_stats;

        let mut weapon = weapons::get(character.starting_weapon);
        weapon.cooldown = (weapon.cooldown - bonuses.cooldown_reduction).max(MIN_WEAPON_COOLDOWN);
        weapon.projectile_speed += bonuses.projectile_speed;
        weapon.projectiles_per_shot += bonuses.projectiles_per_shot.max(0.0).round() as u32;

        let max_health = (stats.max_health + bonuses.max_health).max(1.0);
        let shield_max = bonuses.shield.max(0.0);

        Self {
            character: character.id,
            name: character.name.clone(),
            special: character.special,
            passive: character.passive,
            pos: Vec2::new(DEFAULT_ARENA_WIDTH / 2.0, DEFAULT_ARENA_HEIGHT / 2.0),
            aim_dir: Vec2::NEG_Y,
            size: stats.size,
            health: max_health,
            max_health,
            health_regen: stats.health_regen + bonuses.health_regen,
            speed: stats.speed + bonuses.speed,
            base_damage: stats.base_damage + bonuses.damage_boost,
            armor: stats.armor.clamp(0.0, 100.0),
            weapon,
            piercing: bonuses.piercing.max(0.0).round() as u32,
            explosion_radius: bonuses.explosion_radius.max(0.0),
            crit_chance: bonuses.crit_chance.clamp(0.0, 1.0),
            magnet_radius: BASE_MAGNET_RADIUS + bonuses.magnet_radius,
            shield_max,
            shield_current: shield_max,
            shield_regen_timer: 0.0,
            shoot_timer: 0.0,
            invuln_timer: 0.0,
            dash_timer: 0.0,
            dash_cooldown: 0.0,
            special_cooldown: 0.0,
            invisible_timer: 0.0,
            turrets: Vec::new(),
            bonuses: *bonuses,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_invisible(&self) -> bool {
        self.invisible_timer > 0.0
    }

    pub fn is_dashing(&self) -> bool {
        self.dash_timer > 0.0
    }

    /// Apply incoming damage: shield first, then armor.
    ///
    /// Returns the damage actually absorbed by shield or health (0 while
    /// invulnerable or invisible).
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        // Non-finite amounts are dropped so health never goes NaN
        if self.invuln_timer > 0.0 || self.is_invisible() || !amount.is_finite() || amount <= 0.0 {
            return 0.0;
        }
        let mut remaining = amount;

        if self.shield_current > 0.0 {
            let absorbed = self.shield_current.min(remaining);
            self.shield_current -= absorbed;
            remaining -= absorbed;
            if remaining <= 0.0 {
                self.invuln_timer = INVULN_DURATION;
                return absorbed;
            }
        }

        let reduced = remaining * (1.0 - self.armor / 100.0);
        self.health = (self.health - reduced).clamp(0.0, self.max_health);
        self.invuln_timer = INVULN_DURATION;
        reduced
    }

    pub fn heal(&mut self, amount: f32) {
        if amount.is_finite() && amount > 0.0 {
            self.health = (self.health + amount).min(self.max_health);
        }
    }

    /// Damage for one projectile: base + weapon, berserker bonus, then crit
    pub fn effective_damage(&self, rng: &mut SimRng) -> f32 {
        let mut dmg = self.base_damage + self.weapon.damage;
        if self.passive == Some(Passive::Berserker) && self.health < self.max_health * BERSERKER_THRESHOLD {
            dmg *= BERSERKER_MULT;
        }
        if self.crit_chance > 0.0 && rng.chance(self.crit_chance) {
            dmg *= CRIT_MULT;
        }
        dmg
    }

    /// Advance movement, aim, timers, regeneration and turrets by one step
    pub fn update(&mut self, dt: f32, move_dir: Vec2, aim_dir: Vec2, arena_w: f32, arena_h: f32) {
        let speed = if self.is_dashing() {
            self.speed * DASH_SPEED_MULT
        } else {
            self.speed
        };
        self.pos += clamp_len(move_dir, 1.0) * speed * dt;
        self.pos = clamp_to_arena(self.pos, self.size, arena_w, arena_h);

        if aim_dir != Vec2::ZERO {
            self.aim_dir = aim_dir.normalize_or(self.aim_dir);
        }

        tick_down(&mut self.shoot_timer, dt);
        tick_down(&mut self.invuln_timer, dt);
        tick_down(&mut self.dash_timer, dt);
        tick_down(&mut self.dash_cooldown, dt);
        tick_down(&mut self.special_cooldown, dt);
        tick_down(&mut self.invisible_timer, dt);

        if self.health_regen > 0.0 && self.health < self.max_health {
            self.heal(self.health_regen * dt);
        }

        if self.shield_max > 0.0 && self.shield_current < self.shield_max {
            self.shield_regen_timer += dt;
            if self.shield_regen_timer >= SHIELD_REGEN_INTERVAL {
                self.shield_current = self.shield_max;
                self.shield_regen_timer = 0.0;
            }
        }

        for turret in &mut self.turrets {
            turret.timer -= dt;
            turret.lifetime -= dt;
        }
        self.turrets.retain(|t| t.lifetime > 0.0);
    }

    pub fn can_shoot(&self) -> bool {
        self.shoot_timer <= 0.0
    }

    pub fn on_shoot(&mut self) {
        self.shoot_timer = self.weapon.cooldown;
    }

    /// Start a dash if off cooldown
    pub fn dash(&mut self) -> bool {
        if self.dash_cooldown > 0.0 {
            return false;
        }
        self.dash_timer = DASH_DURATION;
        self.dash_cooldown = DASH_COOLDOWN;
        true
    }

    /// Fire the character's special; None while on cooldown
    pub fn use_special(&mut self) -> Option<SpecialAbility> {
        if self.special_cooldown > 0.0 {
            return None;
        }
        match self.special {
            SpecialAbility::Turret => {
                self.turrets.push(Turret {
                    pos: self.pos,
                    timer: 0.0,
                    cooldown: TURRET_COOLDOWN,
                    damage: self.base_damage * TURRET_DAMAGE_FACTOR,
                    lifetime: TURRET_LIFETIME,
                    range: TURRET_RANGE,
                });
                self.special_cooldown = TURRET_SPECIAL_COOLDOWN;
                Some(SpecialAbility::Turret)
            }
            SpecialAbility::Invisibility => {
                self.invisible_timer = INVISIBILITY_DURATION;
                self.special_cooldown = INVISIBILITY_SPECIAL_COOLDOWN;
                Some(SpecialAbility::Invisibility)
            }
            SpecialAbility::Dash => self.dash().then_some(SpecialAbility::Dash),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::characters;
    use proptest::prelude::*;

    fn player(id: CharacterId) -> Player {
        Player::new(&characters::get(id), &UpgradeBonuses::default())
    }

    #[test]
    fn test_base_stats() {
        let p = player(CharacterId::Rookie);
        assert_eq!(p.name, "Rookie");
        assert_eq!(p.max_health, 100.0);
        assert_eq!(p.health, 100.0);
        assert_eq!(p.speed, 160.0);
        assert_eq!(p.armor, 0.0);
        assert_eq!(p.size, 14.0);
        assert!(p.is_alive());
    }

    #[test]
    fn test_take_damage() {
        let mut p = player(CharacterId::Rookie);
        assert_eq!(p.take_damage(30.0), 30.0);
        assert_eq!(p.health, 70.0);
    }

    #[test]
    fn test_armor_reduction() {
        let mut tank = player(CharacterId::Tank);
        let dealt = tank.take_damage(100.0);
        assert!((dealt - 85.0).abs() < 1e-4);
        assert!((tank.health - (tank.max_health - 85.0)).abs() < 1e-4);
    }

    #[test]
    fn test_invulnerability_gate() {
        let mut p = player(CharacterId::Rookie);
        p.invuln_timer = 1.0;
        assert_eq!(p.take_damage(50.0), 0.0);
        assert_eq!(p.health, 100.0);

        // A landed hit re-arms the window
        p.invuln_timer = 0.0;
        p.take_damage(10.0);
        assert_eq!(p.take_damage(10.0), 0.0);
        assert_eq!(p.health, 90.0);
    }

    #[test]
    fn test_overkill_clamps_to_zero() {
        let mut p = player(CharacterId::Rookie);
        p.take_damage(200.0);
        assert_eq!(p.health, 0.0);
        assert!(!p.is_alive());
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut p = player(CharacterId::Rookie);
        p.take_damage(50.0);
        p.heal(30.0);
        assert_eq!(p.health, 80.0);
        p.heal(500.0);
        assert_eq!(p.health, 100.0);
    }

    #[test]
    fn test_shield_absorbs_before_armor() {
        let bonuses = UpgradeBonuses {
            shield: 20.0,
            ..Default::default()
        };
        let mut p = Player::new(&characters::get(CharacterId::Rookie), &bonuses);
        assert_eq!(p.shield_current, 20.0);

        p.take_damage(15.0);
        assert_eq!(p.shield_current, 5.0);
        assert_eq!(p.health, 100.0);

        p.invuln_timer = 0.0;
        p.take_damage(10.0);
        assert_eq!(p.shield_current, 0.0);
        assert_eq!(p.health, 95.0);
    }

    #[test]
    fn test_shield_recharges_on_interval() {
        let bonuses = UpgradeBonuses {
            shield: 20.0,
            ..Default::default()
        };
        let mut p = Player::new(&characters::get(CharacterId::Rookie), &bonuses);
        p.take_damage(15.0);
        p.update(SHIELD_REGEN_INTERVAL - 1.0, Vec2::ZERO, Vec2::ZERO, 400.0, 700.0);
        assert_eq!(p.shield_current, 5.0);
        p.update(1.0, Vec2::ZERO, Vec2::ZERO, 400.0, 700.0);
        assert_eq!(p.shield_current, 20.0);
    }

    #[test]
    fn test_invisible_ignores_damage() {
        let mut ghost = player(CharacterId::Ghost);
        assert_eq!(ghost.use_special(), Some(SpecialAbility::Invisibility));
        assert_eq!(ghost.take_damage(40.0), 0.0);
        assert_eq!(ghost.health, ghost.max_health);
        assert_eq!(ghost.use_special(), None);

        ghost.update(INVISIBILITY_DURATION, Vec2::ZERO, Vec2::ZERO, 400.0, 700.0);
        assert!(!ghost.is_invisible());
        assert!(ghost.take_damage(40.0) > 0.0);
    }

    #[test]
    fn test_upgrades_apply() {
        let bonuses = UpgradeBonuses {
            max_health: 30.0,
            speed: 20.0,
            damage_boost: 5.0,
            cooldown_reduction: 0.05,
            magnet_radius: 40.0,
            ..Default::default()
        };
        let p = Player::new(&characters::get(CharacterId::Rookie), &bonuses);
        assert_eq!(p.max_health, 130.0);
        assert_eq!(p.health, 130.0);
        assert_eq!(p.speed, 180.0);
        assert_eq!(p.base_damage, 15.0);
        assert!((p.weapon.cooldown - 0.25).abs() < 1e-6);
        assert_eq!(p.magnet_radius, 80.0);
    }

    #[test]
    fn test_cooldown_floor() {
        let bonuses = UpgradeBonuses {
            cooldown_reduction: 0.5,
            ..Default::default()
        };
        let p = Player::new(&characters::get(CharacterId::Rookie), &bonuses);
        assert_eq!(p.weapon.cooldown, MIN_WEAPON_COOLDOWN);
    }

    #[test]
    fn test_shoot_cooldown() {
        let mut p = player(CharacterId::Rookie);
        assert!(p.can_shoot());
        p.on_shoot();
        assert!(!p.can_shoot());
        p.update(p.weapon.cooldown, Vec2::ZERO, Vec2::ZERO, 400.0, 700.0);
        assert!(p.can_shoot());
    }

    #[test]
    fn test_movement_and_clamp() {
        let mut p = player(CharacterId::Rookie);
        let start = p.pos;
        p.update(1.0 / 60.0, Vec2::X, Vec2::X, 400.0, 700.0);
        assert!(p.pos.x > start.x);
        assert_eq!(p.pos.y, start.y);
        assert_eq!(p.aim_dir, Vec2::X);

        // Zero aim keeps the previous heading
        p.update(0.0, Vec2::ZERO, Vec2::ZERO, 400.0, 700.0);
        assert_eq!(p.aim_dir, Vec2::X);

        p.pos.x = -100.0;
        p.update(0.0, Vec2::ZERO, Vec2::ZERO, 400.0, 700.0);
        assert_eq!(p.pos.x, p.size);
    }

    #[test]
    fn test_dash_triples_speed() {
        let mut p = player(CharacterId::Rookie);
        let start = p.pos;
        assert_eq!(p.use_special(), Some(SpecialAbility::Dash));
        p.update(0.1, Vec2::X, Vec2::ZERO, 400.0, 700.0);
        assert!((p.pos.x - start.x - 160.0 * 3.0 * 0.1).abs() < 1e-3);
        // Dash cooldown still running
        assert_eq!(p.use_special(), None);
    }

    #[test]
    fn test_medic_regenerates() {
        let mut medic = player(CharacterId::Medic);
        medic.health = 50.0;
        medic.update(1.0, Vec2::ZERO, Vec2::ZERO, 400.0, 700.0);
        assert!(medic.health > 50.0);
    }

    #[test]
    fn test_berserker_bonus() {
        let mut rng = SimRng::new(1);
        let mut b = player(CharacterId::Berserker);
        let normal = b.effective_damage(&mut rng);
        b.health = b.max_health * 0.2;
        assert!(b.effective_damage(&mut rng) > normal);
    }

    #[test]
    fn test_guaranteed_crit() {
        let mut rng = SimRng::new(1);
        let bonuses = UpgradeBonuses {
            crit_chance: 1.0,
            ..Default::default()
        };
        let p = Player::new(&characters::get(CharacterId::Rookie), &bonuses);
        assert_eq!(p.effective_damage(&mut rng), (p.base_damage + p.weapon.damage) * CRIT_MULT);
    }

    #[test]
    fn test_turret_special_expires() {
        let mut eng = player(CharacterId::Engineer);
        assert_eq!(eng.use_special(), Some(SpecialAbility::Turret));
        assert_eq!(eng.turrets.len(), 1);
        assert_eq!(eng.turrets[0].damage, eng.base_damage * 0.5);
        assert_eq!(eng.use_special(), None);
        eng.update(TURRET_LIFETIME, Vec2::ZERO, Vec2::ZERO, 400.0, 700.0);
        assert!(eng.turrets.is_empty());
    }

    #[test]
    fn test_non_finite_amounts_are_ignored() {
        let mut p = player(CharacterId::Rookie);
        for amount in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            assert_eq!(p.take_damage(amount), 0.0);
            p.heal(amount);
        }
        assert_eq!(p.health, 100.0);
        assert_eq!(p.invuln_timer, 0.0);

        p.take_damage(40.0);
        p.heal(f32::NAN);
        assert_eq!(p.health, 60.0);
    }

    fn amount() -> impl Strategy<Value = f32> {
        prop_oneof![
            8 => -50.0f32..250.0,
            1 => Just(f32::NAN),
            1 => Just(f32::INFINITY),
            1 => Just(f32::NEG_INFINITY),
        ]
    }

    proptest! {
        #[test]
        fn health_stays_in_bounds(ops in prop::collection::vec((any::<bool>(), amount()), 1..64)) {
            let mut p = player(CharacterId::Tank);
            for (is_damage, amount) in ops {
                p.invuln_timer = 0.0;
                if is_damage {
                    p.take_damage(amount);
                } else {
                    p.heal(amount);
                }
                prop_assert!(p.health >= 0.0);
                prop_assert!(p.health <= p.max_health);
                prop_assert!(p.shield_current >= 0.0 && p.shield_current <= p.shield_max);
            }
        }
    }
}
