//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives here so a build can be
//! rebalanced from JSON without recompiling. Missing fields fall back to the
//! defaults in [`crate::consts`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Error loading or validating a [`Tuning`]
#[derive(Debug)]
pub enum TuningError {
    /// The JSON document could not be parsed
    Parse(serde_json::Error),
    /// A field holds a value the simulation cannot run with
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "failed to parse tuning: {err}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning field `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// Gameplay balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub screen_width: f32,
    pub screen_height: f32,
    pub scoreboard_height: f32,
    pub bottom_bar_height: f32,
    pub goal_radius: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_initial_speed: f32,
    pub ball_acceleration: f32,
    pub min_deceleration: f32,

    // === Targets ===
    pub max_target_size: f32,
    pub target_min_margin: f32,
    pub target_max_margin: f32,
    pub line_scaling_factor: f32,
    pub min_initial_targets: u32,
    pub max_initial_targets: u32,
    pub min_target_health: u32,
    pub max_target_health: u32,
    pub max_placement_attempts: u32,
    pub graceful_margin: f32,
    pub generation_bottom_margin: f32,

    // === Shockwaves ===
    /// Seconds a shockwave takes to reach full size
    pub shockwave_duration: f32,
    /// Seconds a destroyed target's removal record is kept
    pub removal_record_ttl: f64,

    // === Power-ups ===
    pub power_up_radius: f32,
    pub power_up_margin: f32,
    pub shock_base_radius: f32,
    pub bounce_shock_base_radius: f32,
    pub large_ball_radius: f32,
    pub small_ball_radius: f32,
    pub double_damage_hits: u32,
    pub all_circles_health: u32,
    pub random_power_up_chance: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            scoreboard_height: SCOREBOARD_HEIGHT,
            bottom_bar_height: BOTTOM_BAR_HEIGHT,
            goal_radius: GOAL_RADIUS,

            ball_radius: BALL_RADIUS,
            ball_initial_speed: BALL_INITIAL_SPEED,
            ball_acceleration: BALL_ACCELERATION,
            min_deceleration: MIN_DECELERATION,

            max_target_size: MAX_TARGET_SIZE,
            target_min_margin: TARGET_MIN_MARGIN,
            target_max_margin: TARGET_MAX_MARGIN,
            line_scaling_factor: LINE_SCALING_FACTOR,
            min_initial_targets: MIN_INITIAL_TARGETS,
            max_initial_targets: MAX_INITIAL_TARGETS,
            min_target_health: MIN_TARGET_HEALTH,
            max_target_health: MAX_TARGET_HEALTH,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,
            graceful_margin: GRACEFUL_MARGIN,
            generation_bottom_margin: GENERATION_BOTTOM_MARGIN,

            shockwave_duration: SHOCKWAVE_DURATION,
            removal_record_ttl: REMOVAL_RECORD_TTL,

            power_up_radius: POWER_UP_RADIUS,
            power_up_margin: POWER_UP_MARGIN,
            shock_base_radius: SHOCK_BASE_RADIUS,
            bounce_shock_base_radius: BOUNCE_SHOCK_BASE_RADIUS,
            large_ball_radius: LARGE_BALL_RADIUS,
            small_ball_radius: SMALL_BALL_RADIUS,
            double_damage_hits: DOUBLE_DAMAGE_HITS,
            all_circles_health: ALL_CIRCLES_HEALTH,
            random_power_up_chance: RANDOM_POWER_UP_CHANCE,
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every value is usable by the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        require_positive("screen_width", self.screen_width)?;
        require_positive("screen_height", self.screen_height)?;
        require_positive("goal_radius", self.goal_radius)?;
        require_positive("ball_radius", self.ball_radius)?;
        require_positive("ball_initial_speed", self.ball_initial_speed)?;
        require_positive("max_target_size", self.max_target_size)?;
        require_positive("shockwave_duration", self.shockwave_duration)?;
        require_positive("power_up_radius", self.power_up_radius)?;
        require_positive("shock_base_radius", self.shock_base_radius)?;
        require_positive("bounce_shock_base_radius", self.bounce_shock_base_radius)?;
        require_positive("large_ball_radius", self.large_ball_radius)?;
        require_positive("small_ball_radius", self.small_ball_radius)?;

        if self.scoreboard_height + self.bottom_bar_height >= self.screen_height {
            return Err(invalid(
                "screen_height",
                "scoreboard and bottom bar leave no playable area",
            ));
        }
        if self.ball_acceleration >= 0.0 {
            return Err(invalid("ball_acceleration", "must be negative"));
        }
        // The floor is what guarantees a launch terminates
        if self.min_deceleration >= 0.0 {
            return Err(invalid("min_deceleration", "must be negative"));
        }
        if !(0.0..1.0).contains(&self.line_scaling_factor) {
            return Err(invalid("line_scaling_factor", "must be in [0, 1)"));
        }
        if self.min_initial_targets > self.max_initial_targets {
            return Err(invalid(
                "min_initial_targets",
                "must not exceed max_initial_targets",
            ));
        }
        if self.min_target_health == 0 {
            return Err(invalid("min_target_health", "targets need at least 1 hp"));
        }
        if self.min_target_health > self.max_target_health {
            return Err(invalid(
                "min_target_health",
                "must not exceed max_target_health",
            ));
        }
        if self.max_placement_attempts == 0 {
            return Err(invalid("max_placement_attempts", "must be at least 1"));
        }
        if self.all_circles_health == 0 {
            return Err(invalid("all_circles_health", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.random_power_up_chance) {
            return Err(invalid("random_power_up_chance", "must be in [0, 1]"));
        }
        if self.removal_record_ttl.is_nan() || self.removal_record_ttl < 0.0 {
            return Err(invalid("removal_record_ttl", "must not be negative"));
        }
        Ok(())
    }

    /// Deceleration applied at the given speed
    ///
    /// Proportional to speed, but never weaker than `min_deceleration`, so a
    /// launch always stops in a bounded number of ticks.
    pub fn scaled_acceleration(&self, speed: f32) -> f32 {
        let normalized_speed = speed / self.ball_initial_speed;
        (self.ball_acceleration * normalized_speed).min(self.min_deceleration)
    }
}
