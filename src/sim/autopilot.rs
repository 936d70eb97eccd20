//! Demo/attract-mode AI
//!
//! Produces the same `TickInput` a human would: aim at the nearest enemy,
//! keep firing, back away from the closest threat, collect coins when safe
//! and pop the special when something gets too close.

use glam::Vec2;

use super::state::LevelState;
use super::tick::TickInput;

/// Enemy bullets closer than this are dodged
const DODGE_RADIUS: f32 = 70.0;
/// Enemies closer than this trigger the special
const PANIC_RADIUS: f32 = 60.0;
/// How strongly the player drifts back to the arena centre
const CENTRE_PULL: f32 = 0.3;

fn nearest(from: Vec2, points: impl Iterator<Item = Vec2>) -> Option<(Vec2, f32)> {
    points
        .map(|p| (p, p.distance(from)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Input for one tick of autopilot play
pub fn autopilot_input(state: &LevelState) -> TickInput {
    let player = &state.player;
    let pos = player.pos;
    let centre = Vec2::new(state.arena_width() / 2.0, state.arena_height() / 2.0);

    let enemy = nearest(pos, state.enemies.iter().filter(|e| e.alive).map(|e| e.pos));
    let bullet = nearest(pos, state.enemy_projectiles.iter().filter(|p| p.alive).map(|p| p.pos));
    let coin = nearest(pos, state.coins.iter().filter(|c| c.alive).map(|c| c.pos));

    let aim_dir = enemy.map(|(e, _)| (e - pos).normalize_or_zero()).unwrap_or(Vec2::ZERO);

    // Threat is whichever is closer: a bullet inside the dodge radius or an enemy
    let threat = match (bullet, enemy) {
        (Some((b, bd)), Some((e, ed))) if bd < DODGE_RADIUS => Some(if bd < ed { b } else { e }),
        (Some((b, bd)), None) if bd < DODGE_RADIUS => Some(b),
        (_, Some((e, ed))) if ed < DODGE_RADIUS * 2.0 => Some(e),
        _ => None,
    };

    let mut move_dir = if let Some(t) = threat {
        let away = (pos - t).normalize_or_zero();
        // Sidestep as well as back off so bullets on our line still miss
        let side = away.perp() * (state.sim_time as f32 * 1.3).sin().signum();
        away + side * 0.5
    } else if let Some((c, _)) = coin {
        (c - pos).normalize_or_zero()
    } else {
        // Oscillating strafe keeps the demo from looking frozen
        let t = state.sim_time as f32;
        Vec2::new((t * 0.7).sin(), (t * 0.45).cos() * 0.5)
    };
    move_dir += (centre - pos).normalize_or_zero() * CENTRE_PULL;
    let move_dir = crate::clamp_len(move_dir, 1.0);

    let special = enemy.is_some_and(|(_, d)| d < PANIC_RADIUS) && player.special_cooldown <= 0.0;

    TickInput {
        move_dir,
        aim_dir,
        firing: enemy.is_some(),
        special,
        pause: false,
    }
}
