//! Fixed timestep simulation tick
//!
//! Advances one `LevelState` by one step in a fixed order: wave transition,
//! player, special and shooting, spawning, boss check, enemies, projectiles,
//! coins and explosions, combat, merge of new projectiles, prune, then the
//! win/loss check. Projectiles fired this step are held back until after
//! combat, so they are first moved and tested on the next step.

use glam::Vec2;

use super::combat;
use super::projectile::{Projectile, player_volley, turret_shot};
use super::state::{LevelPhase, LevelState};
use crate::consts::*;
use crate::events::{EventSink, GameEvent};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement direction, magnitude at most 1
    pub move_dir: Vec2,
    /// Aim direction; zero keeps the previous aim
    pub aim_dir: Vec2,
    /// Fire button held
    pub firing: bool,
    /// One-shot: use the character's special
    pub special: bool,
    /// One-shot: toggle pause (handled by the session, not the level)
    pub pause: bool,
}

impl TickInput {
    /// Copy with the one-shot triggers cleared
    pub fn held(&self) -> Self {
        Self {
            special: false,
            pause: false,
            ..self.clone()
        }
    }
}

fn finite_or_zero(v: Vec2) -> Vec2 {
    if v.is_finite() { v } else { Vec2::ZERO }
}

/// Advance the level by one fixed timestep
pub fn tick(state: &mut LevelState, input: &TickInput, dt: f32, sink: &mut dyn EventSink) {
    if state.phase.is_terminal() {
        return;
    }

    state.time_ticks += 1;
    state.sim_time += f64::from(dt);

    let (arena_w, arena_h) = (state.arena_width(), state.arena_height());
    let move_dir = finite_or_zero(input.move_dir);
    let aim_dir = finite_or_zero(input.aim_dir);

    if state.phase == LevelPhase::WaveTransition {
        state.wave_delay -= dt;
        if state.wave_delay <= 0.0 {
            state.wave += 1;
            state.spawner.start_wave(state.wave);
            state.phase = LevelPhase::Playing;
            log::info!("Wave {}/{} started", state.wave, state.level.total_waves);
            sink.emit(GameEvent::WaveStarted { wave: state.wave });
        }
        state.player.update(dt, move_dir, aim_dir, arena_w, arena_h);
        return;
    }

    // Player
    state.player.update(dt, move_dir, aim_dir, arena_w, arena_h);

    if input.special {
        if let Some(ability) = state.player.use_special() {
            log::debug!("Special used: {:?}", ability);
            sink.emit(GameEvent::SpecialUsed { ability });
        }
    }

    let mut new_player_shots: Vec<Projectile> = Vec::new();
    if input.firing && state.player.can_shoot() {
        new_player_shots.extend(player_volley(&state.player, &mut state.rng));
        state.player.on_shoot();
        sink.emit(GameEvent::ShotFired);
    }

    for turret in state.player.turrets.iter_mut() {
        if turret.timer > 0.0 {
            continue;
        }
        let target = state
            .enemies
            .iter()
            .filter(|e| e.alive)
            .map(|e| (e.pos.distance(turret.pos), e.pos))
            .filter(|(d, _)| *d < turret.range)
            .min_by(|a, b| a.0.total_cmp(&b.0));
        if let Some((_, target)) = target {
            new_player_shots.extend(turret_shot(turret, target));
            turret.timer = turret.cooldown;
        }
    }

    // Spawning
    for enemy in state.spawner.update(dt, arena_w, arena_h, &mut state.rng) {
        state.add_enemy(enemy);
    }

    if state.spawner.should_spawn_boss() {
        let boss = state.spawner.spawn_boss(arena_w, arena_h, &mut state.rng);
        let id = state.add_enemy(boss);
        state.boss_id = Some(id);
        state.phase = LevelPhase::BossWave;
        log::info!("Boss spawned on wave {}", state.wave);
        sink.emit(GameEvent::BossSpawned);
    }

    // Enemies
    let player_pos = state.player.pos;
    let time = state.sim_time as f32;
    let mut new_enemy_shots: Vec<Projectile> = Vec::new();
    for enemy in state.enemies.iter_mut() {
        if !enemy.alive {
            continue;
        }
        enemy.update(dt, player_pos, arena_w, arena_h, &mut state.rng);
        if !enemy.pos.is_finite() || !enemy.hp.is_finite() {
            log::warn!("Removing enemy {} with non-finite state", enemy.id);
            enemy.alive = false;
            continue;
        }
        new_enemy_shots.extend(enemy.try_shoot(player_pos, time).iter().map(Projectile::from_desc));
    }

    // Projectiles
    for p in state.player_projectiles.iter_mut().chain(state.enemy_projectiles.iter_mut()) {
        p.update(dt);
        if !p.pos.is_finite() || p.is_out_of_bounds(arena_w, arena_h) {
            p.alive = false;
        }
    }

    // Coins and explosions
    let magnet = state.player.magnet_radius;
    for coin in state.coins.iter_mut() {
        if coin.update(dt, player_pos, magnet) {
            state.coins_collected += COIN_VALUE;
            state.score += COIN_PICKUP_SCORE;
            sink.emit(GameEvent::CoinCollected);
        }
    }
    for ex in state.explosions.iter_mut() {
        ex.update(dt);
    }

    combat::resolve(state, sink);

    state.player_projectiles.append(&mut new_player_shots);
    state.enemy_projectiles.append(&mut new_enemy_shots);
    state.prune();

    if !state.player.is_alive() {
        state.phase = LevelPhase::GameOver;
        log::info!("Game over on wave {} with score {}", state.wave, state.score);
        sink.emit(GameEvent::GameOver);
        return;
    }

    if state.boss_id.is_some() && state.boss().is_none() {
        state.boss_id = None;
    }

    if state.spawner.is_wave_spawning_complete() && state.enemies.is_empty() {
        complete_wave(state, sink);
    }
}

fn complete_wave(state: &mut LevelState, sink: &mut dyn EventSink) {
    state.spawner.complete_wave();
    state.score += WAVE_BONUS;
    log::info!("Wave {} cleared, score {}", state.wave, state.score);
    sink.emit(GameEvent::WaveCleared { wave: state.wave });

    if state.spawner.all_complete {
        state.score += LEVEL_COMPLETE_BONUS;
        state.phase = LevelPhase::Complete;
        log::info!("Level {} complete, final score {}", state.level_index, state.score);
        sink.emit(GameEvent::LevelComplete);
    } else {
        state.phase = LevelPhase::WaveTransition;
        state.wave_delay = WAVE_DELAY;
    }
}
