//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (entities keep spawn order)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod clock;
pub mod collision;
pub mod combat;
pub mod enemy;
pub mod pattern;
pub mod player;
pub mod projectile;
pub mod rng;
pub mod session;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_input;
pub use clock::{ClockStatus, FrameSteps, SimClock};
pub use collision::{aabb_overlap, within_radius};
pub use enemy::{DamageOutcome, Enemy, EnemyKind, EnemyOverrides, EnemyStats};
pub use pattern::{BulletDesc, BulletPattern, generate};
pub use player::{Player, Turret};
pub use projectile::{Owner, Projectile, player_volley, turret_shot};
pub use rng::SimRng;
pub use session::{RunOutcome, Session};
pub use spawn::SpawnScheduler;
pub use state::{Coin, Explosion, LevelError, LevelPhase, LevelState};
pub use tick::{TickInput, tick};
