//! Level state and the small entity types it owns
//!
//! Everything a level run needs to continue lives here, so a `LevelState`
//! can be cloned, serialized and replayed with the same seed.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::enemy::Enemy;
use super::player::Player;
use super::projectile::Projectile;
use super::rng::SimRng;
use super::spawn::SpawnScheduler;
use crate::consts::*;
use crate::tuning::{CharacterDef, LevelDef, UpgradeBonuses, levels};

/// Level state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelPhase {
    /// No level loaded
    #[default]
    Idle,
    /// Short pause before the next wave; only the player moves
    WaveTransition,
    Playing,
    /// A boss is in the arena
    BossWave,
    Complete,
    GameOver,
}

impl LevelPhase {
    /// Phases in which `tick` does nothing
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Idle | Self::Complete | Self::GameOver)
    }

    /// Phases in which spawning and combat run
    pub fn is_combat(self) -> bool {
        matches!(self, Self::Playing | Self::BossWave)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("no level definition at index {0}")]
    UnknownLevel(usize),
}

/// Dropped coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec2,
    /// Seconds until it disappears
    pub lifetime: f32,
    pub alive: bool,
}

impl Coin {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            lifetime: COIN_LIFETIME,
            alive: true,
        }
    }

    /// Age the coin and pull it toward the player. Returns true on pickup.
    pub fn update(&mut self, dt: f32, player_pos: Vec2, magnet_radius: f32) -> bool {
        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            self.alive = false;
        }

        let dist = self.pos.distance(player_pos);
        if dist < magnet_radius {
            self.pos += (player_pos - self.pos).normalize_or_zero() * COIN_MAGNET_SPEED * dt;
        }

        if self.alive && dist < COIN_PICKUP_RADIUS {
            self.alive = false;
            return true;
        }
        false
    }
}

/// Blast left by an explosive projectile; damage is applied once when created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub radius: f32,
    pub elapsed: f32,
    pub duration: f32,
    pub alive: bool,
}

impl Explosion {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            radius,
            elapsed: 0.0,
            duration: EXPLOSION_DURATION,
            alive: true,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.alive = false;
        }
    }

    /// 0 at creation, 1 when finished
    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            (self.elapsed / self.duration).min(1.0)
        } else {
            1.0
        }
    }
}

/// One level run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelState {
    pub level_index: usize,
    pub level: LevelDef,
    pub phase: LevelPhase,
    /// Current wave (1-based, 0 before the first wave starts)
    pub wave: u32,
    /// Seconds left in the current wave transition
    pub wave_delay: f32,
    pub score: u64,
    pub coins_collected: u32,
    /// Seconds of simulated time since level start
    pub sim_time: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    /// Active enemies (ordered by id)
    pub enemies: Vec<Enemy>,
    pub player_projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<Projectile>,
    pub coins: Vec<Coin>,
    pub explosions: Vec<Explosion>,
    pub spawner: SpawnScheduler,
    /// Id of the boss currently in the arena
    pub boss_id: Option<u32>,
    pub rng: SimRng,
    next_id: u32,
}

impl LevelState {
    /// Load a campaign level for the given character and upgrades
    pub fn start(
        level_index: usize,
        character: &CharacterDef,
        bonuses: &UpgradeBonuses,
        seed: u64,
    ) -> Result<Self, LevelError> {
        let level = levels::get(level_index).ok_or(LevelError::UnknownLevel(level_index))?;
        Ok(Self::with_level(level_index, level, character, bonuses, seed))
    }

    /// Start from an explicit level definition (custom or host-supplied levels)
    pub fn with_level(
        level_index: usize,
        level: LevelDef,
        character: &CharacterDef,
        bonuses: &UpgradeBonuses,
        seed: u64,
    ) -> Self {
        let mut player = Player::new(character, bonuses);
        player.pos = Vec2::new(level.arena_width / 2.0, level.arena_height / 2.0);

        log::info!(
            "Starting level {} ({}) as {} with seed {}",
            level_index,
            level.name,
            player.name,
            seed
        );

        Self {
            level_index,
            spawner: SpawnScheduler::new(&level),
            level,
            phase: LevelPhase::WaveTransition,
            wave: 0,
            wave_delay: FIRST_WAVE_DELAY,
            score: 0,
            coins_collected: 0,
            sim_time: 0.0,
            time_ticks: 0,
            player,
            enemies: Vec::new(),
            player_projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            coins: Vec::new(),
            explosions: Vec::new(),
            boss_id: None,
            rng: SimRng::new(seed),
            next_id: 1,
        }
    }

    pub fn arena_width(&self) -> f32 {
        self.level.arena_width
    }

    pub fn arena_height(&self) -> f32 {
        self.level.arena_height
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an enemy to the arena, assigning its id
    pub fn add_enemy(&mut self, mut enemy: Enemy) -> u32 {
        let id = self.next_entity_id();
        enemy.id = id;
        self.enemies.push(enemy);
        id
    }

    pub fn boss(&self) -> Option<&Enemy> {
        let id = self.boss_id?;
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Drop everything marked dead in one pass
    pub fn prune(&mut self) {
        self.enemies.retain(|e| e.alive);
        self.player_projectiles.retain(|p| p.alive);
        self.enemy_projectiles.retain(|p| p.alive);
        self.coins.retain(|c| c.alive);
        self.explosions.retain(|x| x.alive);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{CharacterId, characters};

    fn rookie() -> CharacterDef {
        characters::get(CharacterId::Rookie)
    }

    #[test]
    fn test_start_level() {
        let state = LevelState::start(0, &rookie(), &UpgradeBonuses::default(), 42).unwrap();
        assert_eq!(state.phase, LevelPhase::WaveTransition);
        assert_eq!(state.wave, 0);
        assert_eq!(state.wave_delay, FIRST_WAVE_DELAY);
        assert_eq!(state.player.pos, Vec2::new(200.0, 350.0));
        assert_eq!(state.score, 0);
        assert!(state.enemies.is_empty());
        assert_eq!(state.rng.seed(), 42);
    }

    #[test]
    fn test_unknown_level_is_an_error() {
        let err = LevelState::start(99, &rookie(), &UpgradeBonuses::default(), 1).unwrap_err();
        assert_eq!(err, LevelError::UnknownLevel(99));
        assert_eq!(err.to_string(), "no level definition at index 99");
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = LevelState::start(0, &rookie(), &UpgradeBonuses::default(), 1).unwrap();
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_phase_helpers() {
        assert!(LevelPhase::Idle.is_terminal());
        assert!(LevelPhase::GameOver.is_terminal());
        assert!(!LevelPhase::WaveTransition.is_terminal());
        assert!(LevelPhase::BossWave.is_combat());
        assert!(!LevelPhase::WaveTransition.is_combat());
    }

    #[test]
    fn test_coin_pickup_and_expiry() {
        let mut coin = Coin::new(Vec2::new(10.0, 0.0));
        assert!(coin.update(0.0, Vec2::ZERO, BASE_MAGNET_RADIUS));
        assert!(!coin.alive);

        let mut far = Coin::new(Vec2::new(300.0, 0.0));
        assert!(!far.update(COIN_LIFETIME, Vec2::ZERO, BASE_MAGNET_RADIUS));
        assert!(!far.alive);
    }

    #[test]
    fn test_coin_magnet_pull() {
        let mut coin = Coin::new(Vec2::new(30.0, 0.0));
        coin.update(0.01, Vec2::ZERO, BASE_MAGNET_RADIUS);
        assert!(coin.alive);
        assert!((coin.pos.x - (30.0 - COIN_MAGNET_SPEED * 0.01)).abs() < 1e-4);

        let mut outside = Coin::new(Vec2::new(100.0, 0.0));
        outside.update(0.01, Vec2::ZERO, BASE_MAGNET_RADIUS);
        assert_eq!(outside.pos.x, 100.0);
    }

    #[test]
    fn test_explosion_lifetime() {
        let mut ex = Explosion::new(Vec2::ZERO, 40.0);
        ex.update(EXPLOSION_DURATION / 2.0);
        assert!(ex.alive);
        assert!((ex.progress() - 0.5).abs() < 1e-5);
        ex.update(EXPLOSION_DURATION);
        assert!(!ex.alive);
        assert_eq!(ex.progress(), 1.0);
    }
}
