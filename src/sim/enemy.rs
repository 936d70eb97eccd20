//! Enemies: stats table, steering, damage and firing

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pattern::{BulletDesc, BulletPattern, generate};
use super::rng::SimRng;
use crate::consts::*;
use crate::{clamp_to_arena, from_angle};

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum EnemyKind {
    #[default]
    Grunt,
    Shooter,
    FastGrunt,
    MiniBoss,
    Boss,
}

impl EnemyKind {
    /// Parse an enemy id; unknown ids fall back to `Grunt`
    pub fn from_id(id: &str) -> Self {
        match id {
            "grunt" => Self::Grunt,
            "shooter" => Self::Shooter,
            "fast_grunt" => Self::FastGrunt,
            "mini_boss" => Self::MiniBoss,
            "boss" => Self::Boss,
            _ => Self::Grunt,
        }
    }

    /// Base stats for this archetype
    pub fn stats(self) -> EnemyStats {
        match self {
            Self::Grunt => EnemyStats {
                hp: 30.0,
                speed: 50.0,
                size: ENEMY_SIZE,
                score_value: 10,
                coin_chance: 0.3,
                coin_count: 1,
                fire_cooldown: 2.0,
                is_boss: false,
            },
            Self::Shooter => EnemyStats {
                hp: 20.0,
                speed: 35.0,
                size: 10.0,
                score_value: 15,
                coin_chance: 0.4,
                coin_count: 1,
                fire_cooldown: 1.5,
                is_boss: false,
            },
            Self::FastGrunt => EnemyStats {
                hp: 20.0,
                speed: 90.0,
                size: 10.0,
                score_value: 12,
                coin_chance: 0.35,
                coin_count: 1,
                fire_cooldown: 2.5,
                is_boss: false,
            },
            Self::MiniBoss => EnemyStats {
                hp: 150.0,
                speed: 30.0,
                size: MINI_BOSS_SIZE,
                score_value: 50,
                coin_chance: 1.0,
                coin_count: 3,
                fire_cooldown: 1.2,
                is_boss: false,
            },
            Self::Boss => EnemyStats {
                hp: 300.0,
                speed: 20.0,
                size: BOSS_SIZE,
                score_value: 200,
                coin_chance: 1.0,
                coin_count: 10,
                fire_cooldown: 0.8,
                is_boss: true,
            },
        }
    }
}

impl From<String> for EnemyKind {
    fn from(id: String) -> Self {
        Self::from_id(&id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub hp: f32,
    pub speed: f32,
    pub size: f32,
    pub score_value: u64,
    pub coin_chance: f32,
    pub coin_count: u32,
    /// Seconds between volleys
    pub fire_cooldown: f32,
    pub is_boss: bool,
}

/// Per-spawn overrides from the level's spawn table or boss definition
#[derive(Debug, Clone, Copy, Default)]
pub struct EnemyOverrides {
    pub hp: Option<f32>,
    pub size: Option<f32>,
    pub pattern: BulletPattern,
    pub phases: u32,
}

/// What a hit did to an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Enemy was already dead
    Ignored,
    Hit,
    /// Boss lost a phase and came back with a fresh hp pool
    PhaseAdvanced { phase: u32 },
    Killed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    pub size: f32,
    pub score_value: u64,
    pub coin_chance: f32,
    pub coin_count: u32,
    pub is_boss: bool,
    /// Seconds between volleys
    pub fire_cooldown: f32,
    /// Seconds until the next volley
    pub fire_timer: f32,
    pub pattern: BulletPattern,
    /// Current boss phase (1-based)
    pub phase: u32,
    pub phases: u32,
    pub hit_flash: f32,
    pub alive: bool,
    wander_angle: f32,
    wander_timer: f32,
    wander_interval: f32,
}

impl Enemy {
    /// Create an enemy scaled for `wave`. The id is assigned by the level.
    pub fn spawn(kind: EnemyKind, pos: Vec2, wave: u32, overrides: EnemyOverrides, rng: &mut SimRng) -> Self {
        let stats = kind.stats();
        let hp = overrides.hp.unwrap_or(stats.hp) + wave as f32 * ENEMY_HP_PER_WAVE;
        Self {
            id: 0,
            kind,
            pos,
            hp,
            max_hp: hp,
            speed: stats.speed + wave as f32 * ENEMY_SPEED_PER_WAVE,
            size: overrides.size.unwrap_or(stats.size),
            score_value: stats.score_value,
            coin_chance: stats.coin_chance,
            coin_count: stats.coin_count,
            is_boss: stats.is_boss,
            fire_cooldown: stats.fire_cooldown,
            fire_timer: rng.unit() * stats.fire_cooldown,
            pattern: overrides.pattern,
            phase: 1,
            phases: overrides.phases.max(1),
            hit_flash: 0.0,
            alive: true,
            wander_angle: rng.angle(),
            wander_timer: 0.0,
            wander_interval: rng.range(1.0, 3.0),
        }
    }

    /// Apply damage, handling boss phase transitions
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome::Ignored;
        }
        self.hp -= amount.max(0.0);
        self.hit_flash = HIT_FLASH_DURATION;
        if self.hp > 0.0 {
            return DamageOutcome::Hit;
        }

        if self.is_boss && self.phase < self.phases {
            self.phase += 1;
            self.max_hp *= 0.6 + self.phase as f32 * 0.2;
            self.hp = self.max_hp;
            self.fire_cooldown = (self.fire_cooldown - BOSS_COOLDOWN_STEP).max(MIN_BOSS_COOLDOWN);
            log::debug!("Boss {} entering phase {}/{}", self.id, self.phase, self.phases);
            return DamageOutcome::PhaseAdvanced { phase: self.phase };
        }

        self.hp = 0.0;
        self.alive = false;
        DamageOutcome::Killed
    }

    /// Steer toward the player with a wandering bias, then clamp to the arena
    pub fn update(&mut self, dt: f32, player_pos: Vec2, arena_w: f32, arena_h: f32, rng: &mut SimRng) {
        self.hit_flash = (self.hit_flash - dt).max(0.0);
        self.fire_timer -= dt;

        self.wander_timer += dt;
        if self.wander_timer > self.wander_interval {
            self.wander_angle += rng.range(-1.0, 1.0);
            self.wander_timer = 0.0;
        }

        let to_player = (player_pos - self.pos).normalize_or_zero();
        let wander = from_angle(self.wander_angle, WANDER_WEIGHT);
        let dir = (to_player * SEEK_WEIGHT + wander).normalize_or_zero();

        self.pos += dir * self.speed * dt;
        self.pos = clamp_to_arena(self.pos, self.size, arena_w, arena_h);
    }

    /// Fire a volley if the cooldown has elapsed
    pub fn try_shoot(&mut self, player_pos: Vec2, time: f32) -> Vec<BulletDesc> {
        if self.fire_timer > 0.0 {
            return Vec::new();
        }
        self.fire_timer = self.fire_cooldown;
        generate(self.pattern, self.pos, player_pos, self.phase, time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boss(phases: u32) -> Enemy {
        let mut rng = SimRng::new(1);
        Enemy::spawn(
            EnemyKind::Boss,
            Vec2::new(100.0, 100.0),
            0,
            EnemyOverrides {
                hp: Some(100.0),
                size: Some(36.0),
                pattern: BulletPattern::MultiPhase,
                phases,
            },
            &mut rng,
        )
    }

    #[test]
    fn test_spawn_scales_with_wave() {
        let mut rng = SimRng::new(3);
        let e = Enemy::spawn(EnemyKind::Grunt, Vec2::ZERO, 2, EnemyOverrides::default(), &mut rng);
        assert_eq!(e.hp, 40.0);
        assert_eq!(e.max_hp, 40.0);
        assert_eq!(e.speed, 52.0);
        assert!(e.fire_timer >= 0.0 && e.fire_timer < e.fire_cooldown);
        assert!(e.alive);
    }

    #[test]
    fn test_unknown_kind_uses_grunt_stats() {
        assert_eq!(EnemyKind::from_id("lich"), EnemyKind::Grunt);
        assert_eq!(EnemyKind::from_id("mini_boss").stats().coin_count, 3);
    }

    #[test]
    fn test_take_damage_kills() {
        let mut rng = SimRng::new(3);
        let mut e = Enemy::spawn(EnemyKind::Shooter, Vec2::ZERO, 0, EnemyOverrides::default(), &mut rng);
        assert_eq!(e.take_damage(5.0), DamageOutcome::Hit);
        assert_eq!(e.hp, 15.0);
        assert!(e.hit_flash > 0.0);
        assert_eq!(e.take_damage(50.0), DamageOutcome::Killed);
        assert!(!e.alive);
        assert_eq!(e.hp, 0.0);
        assert_eq!(e.take_damage(5.0), DamageOutcome::Ignored);
    }

    #[test]
    fn test_boss_phase_transition() {
        let mut b = boss(3);
        let cooldown = b.fire_cooldown;
        assert_eq!(b.take_damage(500.0), DamageOutcome::PhaseAdvanced { phase: 2 });
        assert!(b.alive);
        // 100 * (0.6 + 2 * 0.2)
        assert!((b.max_hp - 100.0).abs() < 1e-3);
        assert_eq!(b.hp, b.max_hp);
        assert!(b.fire_cooldown < cooldown);

        let cooldown = b.fire_cooldown;
        assert_eq!(b.take_damage(500.0), DamageOutcome::PhaseAdvanced { phase: 3 });
        assert!((b.max_hp - 120.0).abs() < 1e-3);
        assert!(b.fire_cooldown < cooldown);
        assert!(b.fire_cooldown >= MIN_BOSS_COOLDOWN);

        assert_eq!(b.take_damage(500.0), DamageOutcome::Killed);
        assert!(!b.alive);
    }

    #[test]
    fn test_boss_cooldown_floor() {
        let mut b = boss(10);
        for _ in 0..9 {
            b.take_damage(1.0e6);
        }
        assert_eq!(b.fire_cooldown, MIN_BOSS_COOLDOWN);
    }

    #[test]
    fn test_update_moves_toward_player_and_stays_in_arena() {
        let mut rng = SimRng::new(9);
        let mut e = Enemy::spawn(EnemyKind::Grunt, Vec2::new(-40.0, 300.0), 0, EnemyOverrides::default(), &mut rng);
        e.update(1.0 / 60.0, Vec2::new(200.0, 300.0), 400.0, 700.0, &mut rng);
        assert_eq!(e.pos.x, e.size);

        let start = e.pos;
        for _ in 0..60 {
            e.update(1.0 / 60.0, Vec2::new(200.0, 300.0), 400.0, 700.0, &mut rng);
        }
        assert!(e.pos.distance(Vec2::new(200.0, 300.0)) < start.distance(Vec2::new(200.0, 300.0)));
    }

    #[test]
    fn test_try_shoot_respects_cooldown() {
        let mut b = boss(1);
        b.fire_timer = 0.5;
        assert!(b.try_shoot(Vec2::ZERO, 0.0).is_empty());
        b.fire_timer = 0.0;
        let volley = b.try_shoot(Vec2::ZERO, 0.0);
        assert_eq!(volley.len(), 12);
        assert_eq!(b.fire_timer, b.fire_cooldown);
        assert!(b.try_shoot(Vec2::ZERO, 0.0).is_empty());
    }
}
