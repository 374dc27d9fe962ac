/// The step function: advances a level by one frame.
///
/// Processing order:
///   1. Skip if the level is already won or lost
///   2. Clamp dt to [0, max_frame_step]
///   3. Actor updates in insertion order (player contact resolved inline)
///   4. Drain presentation events
///
/// `Session` wraps a level with the restart cycle: once the level finishes
/// it waits out the restart delay, then tears the level down and rebuilds
/// it from its pristine state.

use std::time::Duration;

use super::event::GameEvent;
use super::level::Level;
use super::plan::LevelPlan;
use crate::config::PhysicsConfig;
use crate::domain::input::InputState;
use crate::error::LevelError;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(level: &mut Level, dt: f64, input: &InputState) -> Vec<GameEvent> {
    if level.is_finished() {
        return vec![];
    }
    let dt = clamp_step(dt, level.physics().max_frame_step);
    level.advance(dt, input);
    level.drain_events()
}

/// Negative or NaN frame times count as zero; long stalls are cut to `max`.
pub fn clamp_step(dt: f64, max: f64) -> f64 {
    if dt > 0.0 {
        dt.min(max)
    } else {
        0.0
    }
}

// ══════════════════════════════════════════════════════════════
// Session: level + restart cycle
// ══════════════════════════════════════════════════════════════

pub struct Session {
    pristine: Level,
    level: Level,
    restart_delay: f64,
    /// Seconds since the level finished.
    finished_for: f64,
    attempt: u32,
}

impl Session {
    pub fn new(
        plan: &LevelPlan,
        physics: &PhysicsConfig,
        restart_delay: Duration,
    ) -> Result<Self, LevelError> {
        let pristine = Level::from_plan(plan, physics)?;
        Ok(Session {
            level: pristine.clone(),
            pristine,
            restart_delay: restart_delay.as_secs_f64(),
            finished_for: 0.0,
            attempt: 1,
        })
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// 1-based count of plays of this level.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn frame(&mut self, dt: f64, input: &InputState) -> Vec<GameEvent> {
        if !self.level.is_finished() {
            return step(&mut self.level, dt, input);
        }

        if dt > 0.0 {
            self.finished_for += dt;
        }
        if self.finished_for >= self.restart_delay {
            vec![self.restart()]
        } else {
            vec![]
        }
    }

    /// Tear down the current level and start over.
    pub fn restart(&mut self) -> GameEvent {
        self.level = self.pristine.clone();
        self.finished_for = 0.0;
        self.attempt += 1;
        log::info!("restarting {:?}, attempt {}", self.level.name(), self.attempt);
        GameEvent::LevelRestarted { attempt: self.attempt }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
