//! Host-facing run session
//!
//! Owns the clock, the latched input, the event sink and the current level.
//! Hosts feed it input whenever the device reports something and call
//! `frame` once per display frame.

use serde::{Deserialize, Serialize};

use super::clock::{ClockStatus, SimClock};
use super::state::{LevelError, LevelPhase, LevelState};
use super::tick::{TickInput, tick};
use crate::events::EventSink;
use crate::settings::Settings;
use crate::tuning::{CharacterDef, UpgradeBonuses};

/// Result of a finished level run, handed to the shop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub level_index: usize,
    pub score: u64,
    pub coins: u32,
    /// Wave reached
    pub wave: u32,
    pub completed: bool,
}

pub struct Session<S: EventSink> {
    settings: Settings,
    clock: SimClock,
    level: Option<LevelState>,
    input: TickInput,
    sink: S,
    outcome: Option<RunOutcome>,
    reported: bool,
    focused: bool,
    /// Paused by `focus_lost` rather than by the player
    blur_paused: bool,
}

impl<S: EventSink> Session<S> {
    pub fn new(settings: &Settings, sink: S) -> Self {
        Self {
            settings: settings.clone(),
            clock: SimClock::new(f64::from(settings.sim_rate.dt()), f64::from(settings.max_frame_time)),
            level: None,
            input: TickInput::default(),
            sink,
            outcome: None,
            reported: false,
            focused: true,
            blur_paused: false,
        }
    }

    /// Load a level and start the clock at `now` (seconds)
    pub fn start_level(
        &mut self,
        level_index: usize,
        character: &CharacterDef,
        bonuses: &UpgradeBonuses,
        seed: u64,
        now: f64,
    ) -> Result<(), LevelError> {
        let level = LevelState::start(level_index, character, bonuses, seed)?;
        self.level = Some(level);
        self.input = TickInput::default();
        self.outcome = None;
        self.reported = false;
        self.clock.start(now);
        Ok(())
    }

    /// Latest device input. Held state is replaced; one-shot triggers stay
    /// latched until a tick consumes them.
    pub fn set_input(&mut self, input: TickInput) {
        let special = self.input.special || input.special;
        let pause = self.input.pause || input.pause;
        self.input = TickInput { special, pause, ..input };
    }

    pub fn toggle_pause(&mut self, now: f64) {
        self.blur_paused = false;
        if self.clock.is_paused() {
            log::info!("Resumed");
            self.clock.resume(now);
        } else {
            log::info!("Paused");
            self.clock.pause();
        }
    }

    /// Host went to the background. Pauses a running clock when
    /// `auto_pause_on_blur` is set.
    pub fn focus_lost(&mut self) {
        self.focused = false;
        if self.settings.auto_pause_on_blur && self.clock.status() == ClockStatus::Running {
            log::info!("Paused (focus lost)");
            self.clock.pause();
            self.blur_paused = true;
        }
    }

    /// Host is back. Only undoes a pause that `focus_lost` caused.
    pub fn focus_gained(&mut self, now: f64) {
        self.focused = true;
        if self.blur_paused {
            self.blur_paused = false;
            log::info!("Resumed (focus regained)");
            self.clock.resume(now);
        }
    }

    /// Effect volume for the audio collaborator, 0 while muted in the background
    pub fn sfx_gain(&self) -> f32 {
        if !self.focused && self.settings.mute_on_blur {
            0.0
        } else {
            self.settings.sfx_gain()
        }
    }

    /// Advance to `now`. Returns the interpolation fraction for rendering,
    /// or None when nothing is running.
    pub fn frame(&mut self, now: f64) -> Option<f32> {
        if self.input.pause {
            self.input.pause = false;
            self.toggle_pause(now);
        }

        let steps = self.clock.step(now)?;
        let dt = self.clock.fixed_dt();
        let level = self.level.as_mut()?;

        for _ in 0..steps.ticks {
            tick(level, &self.input, dt, &mut self.sink);
            // Clear one-shot inputs after processing
            self.input = self.input.held();
            if level.phase.is_terminal() {
                break;
            }
        }

        if level.phase.is_terminal() && self.outcome.is_none() {
            self.outcome = Some(RunOutcome {
                level_index: level.level_index,
                score: level.score,
                coins: level.coins_collected,
                wave: level.wave,
                completed: level.phase == LevelPhase::Complete,
            });
            self.clock.stop();
            return Some(0.0);
        }

        Some(steps.alpha)
    }

    /// Outcome of the finished run, returned once
    pub fn take_outcome(&mut self) -> Option<RunOutcome> {
        if self.reported {
            return None;
        }
        let outcome = self.outcome?;
        self.reported = true;
        Some(outcome)
    }

    pub fn level(&self) -> Option<&LevelState> {
        self.level.as_ref()
    }

    pub fn phase(&self) -> LevelPhase {
        self.level.as_ref().map_or(LevelPhase::Idle, |l| l.phase)
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
