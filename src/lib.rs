//! No More Bubbles - a ball-launching arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, damage, rounds)
//! - `game`: Input/step facade consumed by a presentation layer
//! - `tuning`: Data-driven game balance
//! - `highscores`: Leaderboard fed from score snapshots

pub mod game;
pub mod highscores;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use highscores::HighScores;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
///
/// Distances are in scene points, speeds in points per nominal frame.
pub mod consts {
    /// Nominal physics frame duration (60 Hz)
    pub const NOMINAL_FRAME_DT: f32 = 1.0 / 60.0;

    /// Nominal scene size the arena is laid out in
    pub const SCREEN_WIDTH: f32 = 750.0;
    pub const SCREEN_HEIGHT: f32 = 1334.0;
    /// Scoreboard strip at the top of the screen
    pub const SCOREBOARD_HEIGHT: f32 = 130.0;
    /// Bar under the goal at the bottom of the screen
    pub const BOTTOM_BAR_HEIGHT: f32 = 70.0;

    /// Goal circle (also the launch origin)
    pub const GOAL_RADIUS: f32 = 79.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 15.0;
    pub const BALL_INITIAL_SPEED: f32 = 35.0;
    /// Deceleration at launch speed; scales down with speed
    pub const BALL_ACCELERATION: f32 = -1.4;
    /// Deceleration never gets weaker than this
    pub const MIN_DECELERATION: f32 = -0.05;

    /// Target sizing
    pub const MAX_TARGET_SIZE: f32 = 170.0;
    pub const TARGET_MIN_MARGIN: f32 = 15.0;
    pub const TARGET_MAX_MARGIN: f32 = 70.0;
    /// Stroke width as a fraction of target radius
    pub const LINE_SCALING_FACTOR: f32 = 0.085;

    /// Initial layout
    pub const MIN_INITIAL_TARGETS: u32 = 3;
    pub const MAX_INITIAL_TARGETS: u32 = 6;
    pub const MIN_TARGET_HEALTH: u32 = 4;
    pub const MAX_TARGET_HEALTH: u32 = 6;
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;
    /// Extra wall distance allowed once a target can cluster with others
    pub const GRACEFUL_MARGIN: f32 = 300.0;
    /// Keep initial targets this far above the bottom edge
    pub const GENERATION_BOTTOM_MARGIN: f32 = 50.0;
    /// Number of cosmetic target colors
    pub const TARGET_COLOR_COUNT: u8 = 7;

    /// Shockwaves
    pub const SHOCKWAVE_DURATION: f32 = 1.6;
    /// A shockwave starts at base/5 and ends at base*2
    pub const SHOCKWAVE_START_FACTOR: f32 = 0.2;
    pub const SHOCKWAVE_END_FACTOR: f32 = 2.0;
    pub const REMOVAL_RECORD_TTL: f64 = 0.5;

    /// Power-ups
    pub const POWER_UP_RADIUS: f32 = 15.0;
    pub const POWER_UP_MARGIN: f32 = 15.0;
    pub const SHOCK_BASE_RADIUS: f32 = 50.0;
    pub const BOUNCE_SHOCK_BASE_RADIUS: f32 = 20.0;
    pub const LARGE_BALL_RADIUS: f32 = 30.0;
    pub const SMALL_BALL_RADIUS: f32 = 7.5;
    pub const DOUBLE_DAMAGE_HITS: u32 = 5;
    pub const ALL_CIRCLES_HEALTH: u32 = 1;
    /// Chance of a random power-up when the destroy count has no curated pool
    pub const RANDOM_POWER_UP_CHANCE: f64 = 0.1;
}
