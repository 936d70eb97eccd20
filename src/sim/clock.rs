//! Fixed timestep clock
//!
//! Turns variable wall-clock frames into a whole number of fixed simulation
//! steps plus an interpolation fraction for rendering. Frame time is clamped
//! so a stall (tab in background, debugger) can't trigger a catch-up burst.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_TIME, SIM_DT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClockStatus {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// Work for one frame: run `ticks` fixed steps, then render at `alpha`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSteps {
    pub ticks: u32,
    /// Leftover time as a fraction of a step, in [0, 1)
    pub alpha: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimClock {
    status: ClockStatus,
    fixed_dt: f64,
    max_frame_time: f64,
    accumulator: f64,
    last_time: f64,
    tick_count: u64,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(f64::from(SIM_DT), f64::from(MAX_FRAME_TIME))
    }
}

impl SimClock {
    /// Times are in seconds
    pub fn new(fixed_dt: f64, max_frame_time: f64) -> Self {
        Self {
            status: ClockStatus::Stopped,
            fixed_dt: fixed_dt.max(1e-6),
            max_frame_time: max_frame_time.max(0.0),
            accumulator: 0.0,
            last_time: 0.0,
            tick_count: 0,
        }
    }

    pub fn status(&self) -> ClockStatus {
        self.status
    }

    pub fn is_paused(&self) -> bool {
        self.status == ClockStatus::Paused
    }

    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt as f32
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Steps run since `start`
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn start(&mut self, now: f64) {
        self.status = ClockStatus::Running;
        self.accumulator = 0.0;
        self.last_time = now;
        self.tick_count = 0;
    }

    /// Halt for good; unconsumed time is discarded
    pub fn stop(&mut self) {
        self.status = ClockStatus::Stopped;
        self.accumulator = 0.0;
    }

    pub fn pause(&mut self) {
        if self.status == ClockStatus::Running {
            self.status = ClockStatus::Paused;
        }
    }

    /// Resume without replaying the time spent paused
    pub fn resume(&mut self, now: f64) {
        if self.status == ClockStatus::Paused {
            self.status = ClockStatus::Running;
            self.last_time = now;
            self.accumulator = 0.0;
        }
    }

    /// Sample the wall clock. None while stopped; zero ticks at alpha 0 while paused.
    pub fn step(&mut self, now: f64) -> Option<FrameSteps> {
        match self.status {
            ClockStatus::Stopped => None,
            ClockStatus::Paused => {
                self.last_time = now;
                Some(FrameSteps { ticks: 0, alpha: 0.0 })
            }
            ClockStatus::Running => {
                let frame_time = now - self.last_time;
                self.last_time = now;
                Some(self.advance(frame_time))
            }
        }
    }

    /// Feed an already measured frame time
    pub fn advance(&mut self, frame_time: f64) -> FrameSteps {
        let frame_time = if frame_time.is_finite() {
            frame_time.clamp(0.0, self.max_frame_time)
        } else {
            0.0
        };
        self.accumulator += frame_time;

        let mut ticks = 0;
        while self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            ticks += 1;
        }
        self.tick_count += u64::from(ticks);

        FrameSteps {
            ticks,
            alpha: (self.accumulator / self.fixed_dt) as f32,
        }
    }

    /// Callback form: `tick(dt)` once per step, then `render(alpha)` once
    pub fn frame(&mut self, now: f64, mut tick: impl FnMut(f32), mut render: impl FnMut(f32)) -> u32 {
        let Some(steps) = self.step(now) else {
            return 0;
        };
        let dt = self.fixed_dt();
        for _ in 0..steps.ticks {
            tick(dt);
        }
        render(steps.alpha);
        steps.ticks
    }
}
