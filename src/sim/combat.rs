//! Combat resolution
//!
//! Runs once per combat tick after every entity has moved. Passes, in order:
//! player projectiles against enemies (with splash), enemy projectiles
//! against the player, then enemy contact with the player.

use super::collision::{aabb_overlap, within_radius};
use super::enemy::{DamageOutcome, Enemy};
use super::rng::SimRng;
use super::state::{Coin, Explosion, LevelState};
use crate::consts::*;
use crate::events::{EventSink, GameEvent};

pub fn resolve(state: &mut LevelState, sink: &mut dyn EventSink) {
    resolve_player_shots(state, sink);
    resolve_enemy_shots(state, sink);
    resolve_contact(state, sink);
}

/// Score and loot for a lethal hit. `Killed` is only reported once per
/// enemy, so this never double-counts.
fn apply_outcome(
    outcome: DamageOutcome,
    enemy: &Enemy,
    score: &mut u64,
    coins: &mut Vec<Coin>,
    rng: &mut SimRng,
    sink: &mut dyn EventSink,
) {
    match outcome {
        DamageOutcome::Ignored => {}
        DamageOutcome::Hit => sink.emit(GameEvent::EnemyHit),
        DamageOutcome::PhaseAdvanced { phase } => sink.emit(GameEvent::BossPhase { phase }),
        DamageOutcome::Killed => {
            *score += enemy.score_value;
            if rng.chance(enemy.coin_chance) {
                for _ in 0..enemy.coin_count {
                    coins.push(Coin::new(enemy.pos + rng.jitter(COIN_SCATTER / 2.0)));
                }
            }
            sink.emit(GameEvent::EnemyKilled { kind: enemy.kind });
        }
    }
}

fn resolve_player_shots(state: &mut LevelState, sink: &mut dyn EventSink) {
    let LevelState {
        player_projectiles,
        enemies,
        explosions,
        coins,
        score,
        rng,
        ..
    } = state;

    for shot in player_projectiles.iter_mut() {
        if !shot.alive {
            continue;
        }
        for i in 0..enemies.len() {
            if !enemies[i].alive || !aabb_overlap(shot.pos, shot.size, enemies[i].pos, enemies[i].size) {
                continue;
            }

            let outcome = enemies[i].take_damage(shot.damage);
            shot.on_hit();
            apply_outcome(outcome, &enemies[i], score, coins, rng, sink);

            if let Some(radius) = shot.explosion_radius {
                explosions.push(Explosion::new(shot.pos, radius));
                sink.emit(GameEvent::Explosion);
                let splash = shot.damage * SPLASH_FACTOR;
                for j in 0..enemies.len() {
                    if j == i || !enemies[j].alive || !within_radius(shot.pos, enemies[j].pos, radius) {
                        continue;
                    }
                    let outcome = enemies[j].take_damage(splash);
                    apply_outcome(outcome, &enemies[j], score, coins, rng, sink);
                }
            }

            if !shot.alive {
                break;
            }
        }
    }
}

fn resolve_enemy_shots(state: &mut LevelState, sink: &mut dyn EventSink) {
    let player = &mut state.player;
    for shot in state.enemy_projectiles.iter_mut() {
        if !shot.alive || !aabb_overlap(shot.pos, shot.size, player.pos, player.size) {
            continue;
        }
        shot.alive = false;
        let damage = player.take_damage(shot.damage);
        if damage > 0.0 {
            sink.emit(GameEvent::PlayerHit { damage });
        }
    }
}

fn resolve_contact(state: &mut LevelState, sink: &mut dyn EventSink) {
    let player = &mut state.player;
    for enemy in state.enemies.iter().filter(|e| e.alive) {
        if !aabb_overlap(enemy.pos, enemy.size, player.pos, player.size) {
            continue;
        }
        let damage = player.take_damage(CONTACT_DAMAGE);
        if damage > 0.0 {
            sink.emit(GameEvent::PlayerHit { damage });
        }
    }
}
