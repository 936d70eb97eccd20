//! Wave spawn scheduler
//!
//! Idle until `start_wave`, then emits enemies on a timer until the wave's
//! quota is met. The level decides when the wave is over and calls
//! `complete_wave`, which is the only place level completion is flagged.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyKind, EnemyOverrides};
use super::pattern::BulletPattern;
use super::rng::SimRng;
use crate::consts::*;
use crate::tuning::{BossDef, LevelDef, SpawnEntry};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnScheduler {
    pub wave: u32,
    pub spawn_timer: f32,
    pub spawned: u32,
    pub target: u32,
    pub wave_active: bool,
    pub all_complete: bool,
    pub boss_spawned: bool,
    total_waves: u32,
    spawn_table: Vec<SpawnEntry>,
    boss: BossDef,
}

/// Enemies required for a wave (waves are 1-based)
pub fn wave_quota(wave: u32) -> u32 {
    ENEMIES_PER_WAVE_BASE + wave.saturating_sub(1) * ENEMIES_PER_WAVE_GROWTH
}

/// Seconds between spawns for a wave
pub fn spawn_interval(wave: u32) -> f32 {
    (BASE_SPAWN_INTERVAL - wave as f32 * SPAWN_INTERVAL_DECAY).max(MIN_SPAWN_INTERVAL)
}

impl SpawnScheduler {
    pub fn new(level: &LevelDef) -> Self {
        Self {
            wave: 0,
            spawn_timer: 0.0,
            spawned: 0,
            target: 0,
            wave_active: false,
            all_complete: false,
            boss_spawned: false,
            total_waves: level.total_waves,
            spawn_table: level.spawn_table.clone(),
            boss: level.boss.clone(),
        }
    }

    pub fn start_wave(&mut self, wave: u32) {
        self.wave = wave;
        self.spawn_timer = 0.0;
        self.spawned = 0;
        self.target = wave_quota(wave);
        self.wave_active = true;
    }

    /// Advance the spawn timer; returns the enemies created this step
    pub fn update(&mut self, dt: f32, arena_w: f32, arena_h: f32, rng: &mut SimRng) -> Vec<Enemy> {
        if !self.wave_active {
            return Vec::new();
        }
        self.spawn_timer += dt;
        let interval = spawn_interval(self.wave);

        let mut out = Vec::new();
        while self.spawn_timer >= interval && self.spawned < self.target {
            self.spawn_timer -= interval;
            out.push(self.spawn_one(arena_w, arena_h, rng));
            self.spawned += 1;
        }
        out
    }

    /// True once per boss-interval wave until the boss is created
    pub fn should_spawn_boss(&self) -> bool {
        self.wave > 0 && self.wave % BOSS_WAVE_INTERVAL == 0 && !self.boss_spawned
    }

    pub fn spawn_boss(&mut self, arena_w: f32, arena_h: f32, rng: &mut SimRng) -> Enemy {
        self.boss_spawned = true;
        let pos = edge_position(arena_w, arena_h, rng);
        let overrides = EnemyOverrides {
            hp: Some(self.boss.hp + self.wave as f32 * BOSS_HP_PER_WAVE),
            size: Some(self.boss.size),
            pattern: self.boss.pattern,
            phases: self.boss.phases.max(1),
        };
        Enemy::spawn(EnemyKind::Boss, pos, self.wave, overrides, rng)
    }

    /// Quota emitted; enemies may still be alive
    pub fn is_wave_spawning_complete(&self) -> bool {
        self.spawned >= self.target
    }

    pub fn complete_wave(&mut self) {
        self.wave_active = false;
        self.boss_spawned = false;
        if self.wave >= self.total_waves {
            self.all_complete = true;
        }
    }

    fn spawn_one(&self, arena_w: f32, arena_h: f32, rng: &mut SimRng) -> Enemy {
        let (kind, pattern) = self.roll_entry(rng);
        let pos = edge_position(arena_w, arena_h, rng);
        let overrides = EnemyOverrides {
            pattern,
            ..Default::default()
        };
        Enemy::spawn(kind, pos, self.wave, overrides, rng)
    }

    /// Weighted pick over the entries eligible for the current wave
    fn roll_entry(&self, rng: &mut SimRng) -> (EnemyKind, BulletPattern) {
        let eligible: Vec<&SpawnEntry> = self.spawn_table.iter().filter(|e| e.eligible(self.wave)).collect();
        let Some(first) = eligible.first() else {
            return (EnemyKind::default(), BulletPattern::default());
        };

        let total: f32 = eligible.iter().map(|e| e.weight.max(0.0)).sum();
        let mut roll = rng.unit() * total;
        let mut chosen = *first;
        for entry in &eligible {
            roll -= entry.weight.max(0.0);
            if roll <= 0.0 {
                chosen = entry;
                break;
            }
        }
        (chosen.enemy, chosen.pattern)
    }
}

/// Random point just outside one of the four arena edges
pub fn edge_position(arena_w: f32, arena_h: f32, rng: &mut SimRng) -> Vec2 {
    let m = SPAWN_MARGIN;
    match rng.index(4) {
        0 => Vec2::new(rng.range(m, arena_w - m), -m),
        1 => Vec2::new(arena_w + m, rng.range(m, arena_h - m)),
        2 => Vec2::new(rng.range(m, arena_w - m), arena_h + m),
        _ => Vec2::new(-m, rng.range(m, arena_h - m)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::levels;

    fn scheduler(level: usize) -> SpawnScheduler {
        SpawnScheduler::new(&levels::get(level).unwrap())
    }

    #[test]
    fn test_quota_and_interval() {
        assert_eq!(wave_quota(1), 5);
        assert_eq!(wave_quota(2), 8);
        assert_eq!(wave_quota(10), 32);
        assert!((spawn_interval(1) - 1.9).abs() < 1e-6);
        assert_eq!(spawn_interval(30), MIN_SPAWN_INTERVAL);
    }

    #[test]
    fn test_idle_spawns_nothing() {
        let mut s = scheduler(0);
        let mut rng = SimRng::new(1);
        assert!(s.update(10.0, 400.0, 700.0, &mut rng).is_empty());
    }

    #[test]
    fn test_spawns_on_interval_until_quota() {
        let mut s = scheduler(0);
        let mut rng = SimRng::new(1);
        s.start_wave(1);
        assert_eq!(s.target, 5);

        assert!(s.update(1.0, 400.0, 700.0, &mut rng).is_empty());
        assert_eq!(s.update(1.0, 400.0, 700.0, &mut rng).len(), 1);
        assert!(!s.is_wave_spawning_complete());

        // A long step catches up but never exceeds the quota
        let burst = s.update(100.0, 400.0, 700.0, &mut rng);
        assert_eq!(burst.len(), 4);
        assert!(s.is_wave_spawning_complete());
        assert!(s.update(100.0, 400.0, 700.0, &mut rng).is_empty());
    }

    #[test]
    fn test_spawned_enemies_come_from_table_and_edge() {
        let mut s = scheduler(0);
        let mut rng = SimRng::new(7);
        s.start_wave(1);
        for e in s.update(100.0, 400.0, 700.0, &mut rng) {
            assert!(matches!(e.kind, EnemyKind::Grunt | EnemyKind::Shooter));
            let on_edge = e.pos.x == -SPAWN_MARGIN
                || e.pos.x == 400.0 + SPAWN_MARGIN
                || e.pos.y == -SPAWN_MARGIN
                || e.pos.y == 700.0 + SPAWN_MARGIN;
            assert!(on_edge);
        }
    }

    #[test]
    fn test_min_wave_entries_excluded_early() {
        let mut s = scheduler(1);
        let mut rng = SimRng::new(3);
        s.start_wave(1);
        for _ in 0..200 {
            assert_ne!(s.roll_entry(&mut rng).0, EnemyKind::MiniBoss);
        }
    }

    #[test]
    fn test_empty_table_falls_back_to_grunt() {
        let mut s = scheduler(0);
        s.spawn_table.clear();
        let mut rng = SimRng::new(3);
        assert_eq!(s.roll_entry(&mut rng), (EnemyKind::Grunt, BulletPattern::Radial));
    }

    #[test]
    fn test_boss_once_per_boss_wave() {
        let mut s = scheduler(2);
        let mut rng = SimRng::new(1);
        s.start_wave(4);
        assert!(!s.should_spawn_boss());
        s.complete_wave();

        s.start_wave(5);
        assert!(s.should_spawn_boss());
        let boss = s.spawn_boss(600.0, 900.0, &mut rng);
        assert!(!s.should_spawn_boss());
        assert!(boss.is_boss);
        assert_eq!(boss.phases, 3);
        assert_eq!(boss.pattern, BulletPattern::MultiPhase);
        // 1000 + 5 * 20, plus the regular per-wave bonus
        assert_eq!(boss.max_hp, 1100.0 + 5.0 * ENEMY_HP_PER_WAVE);

        s.complete_wave();
        s.start_wave(10);
        assert!(s.should_spawn_boss());
    }

    #[test]
    fn test_all_complete_only_after_final_wave() {
        let mut s = scheduler(0);
        for wave in 1..10 {
            s.start_wave(wave);
            s.complete_wave();
            assert!(!s.all_complete);
            assert!(!s.wave_active);
        }
        s.start_wave(10);
        s.complete_wave();
        assert!(s.all_complete);
    }
}
