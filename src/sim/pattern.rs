//! Procedural bullet patterns
//!
//! Pure functions: a pattern id, the shooter's position, the player's
//! position, the shooter's phase and the simulation time go in, one volley
//! of bullet descriptors comes out.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::ENEMY_PROJECTILE_SIZE;
use crate::{angle_of, from_angle};

/// Named volley generators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum BulletPattern {
    /// Evenly spaced ring
    #[default]
    Radial,
    /// Denser, faster ring
    RadialFast,
    /// Single shot at the player
    Aimed,
    /// Three-shot fan at the player
    AimedBurst,
    /// Rotating arms driven by simulation time
    Spiral,
    /// Several arms of paired bullets
    SpiralMulti,
    /// Sinusoidal sweep around the player direction
    Wave,
    /// Boss pattern that changes with phase
    MultiPhase,
}

impl BulletPattern {
    /// Parse a pattern id; unknown ids fall back to `Radial`
    pub fn from_id(id: &str) -> Self {
        match id {
            "radial" => Self::Radial,
            "radial_fast" => Self::RadialFast,
            "aimed" => Self::Aimed,
            "aimed_burst" => Self::AimedBurst,
            "spiral" => Self::Spiral,
            "spiral_multi" => Self::SpiralMulti,
            "wave" => Self::Wave,
            "multi_phase" => Self::MultiPhase,
            _ => Self::Radial,
        }
    }
}

impl From<String> for BulletPattern {
    fn from(id: String) -> Self {
        Self::from_id(&id)
    }
}

/// One bullet to be turned into an enemy projectile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletDesc {
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    pub size: f32,
}

fn bullet(pos: Vec2, angle: f32, speed: f32, damage: f32, size: f32) -> BulletDesc {
    BulletDesc {
        pos,
        vel: from_angle(angle, speed),
        damage,
        size,
    }
}

fn ring(pos: Vec2, count: u32, speed: f32, damage: f32) -> Vec<BulletDesc> {
    (0..count)
        .map(|i| {
            let a = TAU * i as f32 / count as f32;
            bullet(pos, a, speed, damage, ENEMY_PROJECTILE_SIZE)
        })
        .collect()
}

/// Generate one volley.
///
/// `time` is simulation time in seconds and only affects the rotating
/// patterns (`Spiral`, `SpiralMulti`, `Wave`).
pub fn generate(pattern: BulletPattern, pos: Vec2, target: Vec2, phase: u32, time: f32) -> Vec<BulletDesc> {
    let phase = phase.max(1);
    let speed = 120.0 + phase as f32 * 20.0;
    let to_target = angle_of(target - pos);

    match pattern {
        BulletPattern::Radial => ring(pos, 6 + phase * 2, speed, 8.0),
        BulletPattern::RadialFast => ring(pos, 10 + phase * 2, speed * 1.3, 10.0),
        BulletPattern::Aimed => {
            let dir = (target - pos).normalize_or_zero();
            vec![BulletDesc {
                pos,
                vel: dir * speed * 1.5,
                damage: 12.0,
                size: ENEMY_PROJECTILE_SIZE + 1.0,
            }]
        }
        BulletPattern::AimedBurst => {
            let spread = 0.2;
            (-1..=1)
                .map(|i| bullet(pos, to_target + i as f32 * spread, speed * 1.2, 10.0, ENEMY_PROJECTILE_SIZE))
                .collect()
        }
        BulletPattern::Spiral => {
            let count = 4 + phase;
            (0..count)
                .map(|i| {
                    let a = time * 2.0 + TAU * i as f32 / count as f32;
                    bullet(pos, a, speed, 8.0, ENEMY_PROJECTILE_SIZE)
                })
                .collect()
        }
        BulletPattern::SpiralMulti => {
            let arms = 3 + phase;
            let mut out = Vec::with_capacity(arms as usize * 2);
            for arm in 0..arms {
                for b in 0..2 {
                    let a = time * 1.5 + TAU * arm as f32 / arms as f32 + b as f32 * 0.15;
                    out.push(bullet(pos, a, speed + b as f32 * 30.0, 10.0, ENEMY_PROJECTILE_SIZE));
                }
            }
            out
        }
        BulletPattern::Wave => (0..8)
            .map(|i| {
                let a = (time + i as f32 * 0.5).sin() * PI * 0.5 + to_target;
                bullet(pos, a, speed, 8.0, ENEMY_PROJECTILE_SIZE)
            })
            .collect(),
        BulletPattern::MultiPhase => match phase {
            1 => generate(BulletPattern::RadialFast, pos, target, phase, time),
            2 => generate(BulletPattern::SpiralMulti, pos, target, phase, time),
            _ => {
                let mut volley = generate(BulletPattern::Radial, pos, target, phase, time);
                volley.extend(generate(BulletPattern::AimedBurst, pos, target, phase, time));
                volley
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Vec2 = Vec2::new(100.0, 100.0);
    const PLAYER: Vec2 = Vec2::new(100.0, 300.0);

    #[test]
    fn test_radial_grows_with_phase() {
        let p1 = generate(BulletPattern::Radial, ORIGIN, PLAYER, 1, 0.0);
        let p2 = generate(BulletPattern::Radial, ORIGIN, PLAYER, 2, 0.0);
        assert_eq!(p1.len(), 8);
        assert_eq!(p2.len(), 10);
        // Speed 140 at phase 1
        assert!((p1[0].vel.length() - 140.0).abs() < 1e-3);
        assert!(p1.iter().all(|b| b.pos == ORIGIN && b.damage == 8.0));
    }

    #[test]
    fn test_radial_fast() {
        let v = generate(BulletPattern::RadialFast, ORIGIN, PLAYER, 1, 0.0);
        assert_eq!(v.len(), 12);
        assert!((v[0].vel.length() - 140.0 * 1.3).abs() < 1e-3);
    }

    #[test]
    fn test_aimed_points_at_player() {
        let v = generate(BulletPattern::Aimed, ORIGIN, PLAYER, 1, 0.0);
        assert_eq!(v.len(), 1);
        let dir = v[0].vel.normalize();
        assert!((dir - Vec2::Y).length() < 1e-5);
        assert!((v[0].vel.length() - 210.0).abs() < 1e-3);
    }

    #[test]
    fn test_aimed_burst_is_centred() {
        let v = generate(BulletPattern::AimedBurst, ORIGIN, PLAYER, 1, 0.0);
        assert_eq!(v.len(), 3);
        let centre = angle_of(v[1].vel);
        assert!((centre - angle_of(PLAYER - ORIGIN)).abs() < 1e-5);
        assert!((angle_of(v[0].vel) - (centre - 0.2)).abs() < 1e-5);
        assert!((angle_of(v[2].vel) - (centre + 0.2)).abs() < 1e-5);
    }

    #[test]
    fn test_spiral_rotates_with_time() {
        let a = generate(BulletPattern::Spiral, ORIGIN, PLAYER, 1, 0.0);
        let b = generate(BulletPattern::Spiral, ORIGIN, PLAYER, 1, 0.25);
        assert_eq!(a.len(), 5);
        assert!((a[0].vel - b[0].vel).length() > 1.0);
        // Same time gives the same volley
        assert_eq!(b, generate(BulletPattern::Spiral, ORIGIN, PLAYER, 1, 0.25));
    }

    #[test]
    fn test_spiral_multi_counts() {
        assert_eq!(generate(BulletPattern::SpiralMulti, ORIGIN, PLAYER, 1, 0.0).len(), 8);
        assert_eq!(generate(BulletPattern::SpiralMulti, ORIGIN, PLAYER, 2, 0.0).len(), 10);
    }

    #[test]
    fn test_wave_sweeps_around_player() {
        let v = generate(BulletPattern::Wave, ORIGIN, PLAYER, 1, 1.0);
        assert_eq!(v.len(), 8);
        let to_player = angle_of(PLAYER - ORIGIN);
        for b in &v {
            assert!((angle_of(b.vel) - to_player).abs() <= PI * 0.5 + 1e-4);
        }
    }

    #[test]
    fn test_multi_phase_delegates() {
        let p1 = generate(BulletPattern::MultiPhase, ORIGIN, PLAYER, 1, 0.0);
        assert_eq!(p1, generate(BulletPattern::RadialFast, ORIGIN, PLAYER, 1, 0.0));
        let p2 = generate(BulletPattern::MultiPhase, ORIGIN, PLAYER, 2, 0.0);
        assert_eq!(p2, generate(BulletPattern::SpiralMulti, ORIGIN, PLAYER, 2, 0.0));
        let p3 = generate(BulletPattern::MultiPhase, ORIGIN, PLAYER, 3, 0.0);
        assert_eq!(p3.len(), 12 + 3);
    }

    #[test]
    fn test_unknown_id_falls_back_to_radial() {
        assert_eq!(BulletPattern::from_id("laser_grid"), BulletPattern::Radial);
        assert_eq!(BulletPattern::from_id("spiral_multi"), BulletPattern::SpiralMulti);
        let json = serde_json::to_string(&BulletPattern::AimedBurst).unwrap();
        assert_eq!(json, "\"aimed_burst\"");
    }
}
