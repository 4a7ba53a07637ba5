//! Input/step facade over the simulation
//!
//! A presentation layer queues input as it arrives and calls [`Game::step`]
//! once per frame. One-shot inputs are consumed by the next step.

use glam::Vec2;

use crate::consts::NOMINAL_FRAME_DT;
use crate::sim::{GameState, ScoreState, Snapshot, TickInput, tick};
use crate::tuning::{Tuning, TuningError};

/// Longest frame a single step will simulate
const MAX_FRAME_DT: f32 = 0.1;

/// Game instance holding all state
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    input: TickInput,
}

impl Game {
    pub fn new(seed: u64) -> Self {
        Self {
            state: GameState::new(seed),
            input: TickInput::default(),
        }
    }

    /// Start a game with custom balance values, rejecting unusable ones
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            state: GameState::with_tuning(seed, tuning),
            input: TickInput::default(),
        })
    }

    /// Queue a launch along `aim`, the drag vector from the goal
    pub fn on_launch(&mut self, aim: Vec2) {
        self.input.launch = Some(aim);
    }

    /// Queue a reset; it runs before anything else on the next step
    pub fn on_reset(&mut self) {
        self.input.reset = true;
    }

    /// Reset immediately, dropping any queued input
    pub fn reset_now(&mut self) {
        self.input = TickInput::default();
        self.state.reset();
    }

    /// Advance by one frame of `dt` seconds and return what changed
    ///
    /// One frame is one tick; movement scales with `dt`. Long frames are
    /// clamped.
    pub fn step(&mut self, dt: f32) -> Snapshot {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        let input = std::mem::take(&mut self.input);
        tick(&mut self.state, &input, dt);
        Snapshot::capture(&mut self.state)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn score(&self) -> &ScoreState {
        &self.state.score
    }
}
