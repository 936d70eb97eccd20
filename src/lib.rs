//! Bullet Arena - A wave-based bullet-hell arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, waves, bullet patterns, combat)
//! - `tuning`: Data-driven game balance (levels, characters, weapons, items)
//! - `events`: Discrete gameplay events for audio/feedback collaborators
//! - `persistence`: Key/value storage adapters
//! - `progression`: Coins, unlocks and upgrade purchases between runs

pub mod events;
pub mod persistence;
pub mod progression;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use events::{EventLog, EventSink, GameEvent, LogSink};
pub use progression::{Progression, Shop};
pub use settings::{Settings, SimRate};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest frame time fed to the accumulator (spiral-of-death guard)
    pub const MAX_FRAME_TIME: f32 = 0.25;

    /// Default arena when no level is loaded
    pub const DEFAULT_ARENA_WIDTH: f32 = 400.0;
    pub const DEFAULT_ARENA_HEIGHT: f32 = 700.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 14.0;
    pub const DASH_SPEED_MULT: f32 = 3.0;
    pub const DASH_DURATION: f32 = 0.15;
    pub const DASH_COOLDOWN: f32 = 2.0;
    pub const INVULN_DURATION: f32 = 0.1;
    /// Seconds below max shield before it fully recharges
    pub const SHIELD_REGEN_INTERVAL: f32 = 10.0;
    /// Floor for weapon cooldown after upgrades (seconds)
    pub const MIN_WEAPON_COOLDOWN: f32 = 0.05;
    /// Berserker passive kicks in below this health fraction
    pub const BERSERKER_THRESHOLD: f32 = 0.3;
    pub const BERSERKER_MULT: f32 = 1.5;
    pub const CRIT_MULT: f32 = 2.0;

    /// Special abilities
    pub const TURRET_COOLDOWN: f32 = 0.5;
    pub const TURRET_LIFETIME: f32 = 8.0;
    pub const TURRET_RANGE: f32 = 120.0;
    pub const TURRET_DAMAGE_FACTOR: f32 = 0.5;
    pub const TURRET_SPECIAL_COOLDOWN: f32 = 5.0;
    pub const INVISIBILITY_DURATION: f32 = 2.0;
    pub const INVISIBILITY_SPECIAL_COOLDOWN: f32 = 8.0;

    /// Projectiles
    pub const ENEMY_PROJECTILE_SIZE: f32 = 4.0;
    pub const PLAYER_PROJECTILE_SIZE: f32 = 5.0;
    pub const TURRET_PROJECTILE_SIZE: f32 = 3.0;
    pub const TURRET_PROJECTILE_SPEED: f32 = 300.0;
    /// Extra distance past the arena edge before a projectile is culled
    pub const PROJECTILE_CULL_MARGIN: f32 = 20.0;
    /// Pierce budget granted by piercing weapons
    pub const PIERCING_WEAPON_BONUS: u32 = 2;
    pub const DEFAULT_EXPLOSION_RADIUS: f32 = 40.0;
    pub const EXPLOSION_DURATION: f32 = 0.3;
    /// Fraction of projectile damage dealt to enemies caught in a blast
    pub const SPLASH_FACTOR: f32 = 0.5;

    /// Enemies
    pub const ENEMY_SIZE: f32 = 12.0;
    pub const MINI_BOSS_SIZE: f32 = 20.0;
    pub const BOSS_SIZE: f32 = 28.0;
    pub const HIT_FLASH_DURATION: f32 = 0.08;
    pub const ENEMY_HP_PER_WAVE: f32 = 5.0;
    pub const ENEMY_SPEED_PER_WAVE: f32 = 1.0;
    pub const BOSS_HP_PER_WAVE: f32 = 20.0;
    /// Weight of the player-seeking component in enemy steering
    pub const SEEK_WEIGHT: f32 = 0.7;
    pub const WANDER_WEIGHT: f32 = 0.3;
    pub const BOSS_COOLDOWN_STEP: f32 = 0.2;
    pub const MIN_BOSS_COOLDOWN: f32 = 0.3;
    pub const CONTACT_DAMAGE: f32 = 15.0;

    /// Coins
    pub const BASE_MAGNET_RADIUS: f32 = 40.0;
    pub const COIN_PICKUP_RADIUS: f32 = 16.0;
    pub const COIN_MAGNET_SPEED: f32 = 250.0;
    pub const COIN_LIFETIME: f32 = 15.0;
    pub const COIN_SCATTER: f32 = 20.0;

    /// Waves
    pub const BASE_SPAWN_INTERVAL: f32 = 2.0;
    pub const MIN_SPAWN_INTERVAL: f32 = 0.4;
    pub const SPAWN_INTERVAL_DECAY: f32 = 0.1;
    pub const ENEMIES_PER_WAVE_BASE: u32 = 5;
    pub const ENEMIES_PER_WAVE_GROWTH: u32 = 3;
    pub const BOSS_WAVE_INTERVAL: u32 = 5;
    pub const SPAWN_MARGIN: f32 = 40.0;
    pub const FIRST_WAVE_DELAY: f32 = 1.5;
    pub const WAVE_DELAY: f32 = 2.0;

    /// Score
    pub const COIN_VALUE: u32 = 1;
    pub const COIN_PICKUP_SCORE: u64 = 5;
    pub const WAVE_BONUS: u64 = 50;
    pub const LEVEL_COMPLETE_BONUS: u64 = 500;
}

/// Unit vector (scaled by `magnitude`) pointing along `angle`
#[inline]
pub fn from_angle(angle: f32, magnitude: f32) -> Vec2 {
    Vec2::new(angle.cos() * magnitude, angle.sin() * magnitude)
}

/// Heading of a vector in radians
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Clamp a position so a body of half-size `size` stays inside the arena.
///
/// Degenerate arenas (smaller than the body) pin the body to the centre line.
#[inline]
pub fn clamp_to_arena(pos: Vec2, size: f32, arena_w: f32, arena_h: f32) -> Vec2 {
    let clamp_axis = |v: f32, extent: f32| {
        if extent - size < size {
            extent / 2.0
        } else {
            v.clamp(size, extent - size)
        }
    };
    Vec2::new(clamp_axis(pos.x, arena_w), clamp_axis(pos.y, arena_h))
}

/// Limit a vector's length to `max`, keeping its direction
#[inline]
pub fn clamp_len(v: Vec2, max: f32) -> Vec2 {
    let len = v.length();
    if len > max && len > 0.0 { v * (max / len) } else { v }
}
