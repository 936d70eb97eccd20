//! Discrete gameplay notifications
//!
//! The simulation reports what happened through an injected `EventSink`
//! instead of calling into audio or UI code. Hosts map events to sounds,
//! screen shake, HUD flashes and so on.

use serde::{Deserialize, Serialize};

use crate::sim::EnemyKind;
use crate::tuning::SpecialAbility;

/// Something audible or visible happened this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player fired a volley
    ShotFired,
    /// A player projectile hit an enemy that survived
    EnemyHit,
    EnemyKilled { kind: EnemyKind },
    BossSpawned,
    /// Boss survived a lethal hit and moved to the next phase
    BossPhase { phase: u32 },
    CoinCollected,
    WaveStarted { wave: u32 },
    WaveCleared { wave: u32 },
    /// Damage that got past invulnerability (shield included)
    PlayerHit { damage: f32 },
    SpecialUsed { ability: SpecialAbility },
    Explosion,
    LevelComplete,
    GameOver,
}

/// Receiver for simulation events
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

/// Collects events in order, for hosts that drain once per frame and for tests
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn count(&self, pred: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    /// Take everything collected so far
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

/// Forwards events to the `log` facade at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: GameEvent) {
        log::debug!("event: {:?}", event);
    }
}
