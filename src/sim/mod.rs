//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod arena;
pub mod collision;
pub mod damage;
pub mod geometry;
pub mod powerup;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use arena::Arena;
pub use collision::{WallContact, circles_overlap, resolve_target_collision, wall_collision};
pub use damage::{damage_target, purge_removal_records, sweep_shockwaves};
pub use geometry::{distance, normalize, reflect_off_circle, velocity_from_aim};
pub use powerup::{PowerUpKind, activate, roll_power_up};
pub use snapshot::{BallView, PowerUpView, ShockwaveView, Snapshot, TargetView};
pub use spawn::{power_up_location, spawn_initial_targets, spawn_power_up};
pub use state::{
    ActivePowerUp, Ball, GameEvent, GameState, PowerUp, RemovalRecord, RoundPhase, ScoreState,
    Shockwave, Target,
};
pub use tick::{TickInput, tick};
