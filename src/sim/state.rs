//! Game state and core simulation types
//!
//! Entities are identified by stable `u32` ids issued from one counter, so
//! bookkeeping sets (shockwave hit sets, removal records) hold ids rather
//! than references.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::geometry::normalize;
use super::powerup::PowerUpKind;
use crate::tuning::Tuning;

/// Phase of the round state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for a launch
    Idle,
    /// Ball is moving
    InFlight,
    /// Ball stopped, shockwaves still resolving
    Settling,
    /// Scoring and advancement
    RoundEnd,
}

/// Power-up effect carried by the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    /// Boosted hits left (double damage only)
    #[serde(default)]
    pub hits_remaining: u32,
}

/// The launched ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Scalar speed; `velocity` always has this magnitude
    pub speed: f32,
    pub radius: f32,
    pub active_power_up: Option<ActivePowerUp>,
}

impl Ball {
    pub fn new(position: Vec2, velocity: Vec2, speed: f32, radius: f32) -> Self {
        Self {
            position,
            velocity,
            speed,
            radius,
            active_power_up: None,
        }
    }

    /// Re-derive velocity from `speed`, keeping the current direction
    pub fn sync_velocity(&mut self) {
        self.velocity = self.speed * normalize(self.velocity);
    }

    /// Set speed and keep velocity consistent
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
        self.sync_velocity();
    }

    pub fn is_stopped(&self) -> bool {
        self.speed <= 0.0
    }

    pub fn active_kind(&self) -> Option<PowerUpKind> {
        self.active_power_up.map(|p| p.kind)
    }
}

/// A destructible circle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub position: Vec2,
    pub radius: f32,
    pub health: u32,
    /// Cosmetic palette index
    pub color_index: u8,
}

impl Target {
    pub fn is_destroyed(&self) -> bool {
        self.health == 0
    }
}

/// A destroyed target kept around briefly for late references
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovalRecord {
    pub id: u32,
    pub position: Vec2,
    pub radius: f32,
    /// Simulation time of removal (seconds)
    pub removed_at: f64,
}

/// An expanding ring of area damage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shockwave {
    pub id: u32,
    pub position: Vec2,
    pub start_radius: f32,
    pub end_radius: f32,
    /// Seconds since spawn
    pub age: f32,
    pub duration: f32,
    /// Targets this shockwave has already damaged
    pub hit_set: BTreeSet<u32>,
    pub expired: bool,
}

impl Shockwave {
    /// Current radius, growing linearly over the lifetime
    pub fn current_radius(&self) -> f32 {
        let t = if self.duration > 0.0 {
            (self.age / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.start_radius + (self.end_radius - self.start_radius) * t
    }

    /// Advance the lifetime; marks the shockwave expired at full size
    pub fn grow(&mut self, dt: f32) {
        self.age += dt;
        if self.age >= self.duration {
            self.expired = true;
        }
    }
}

/// A collectible pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub position: Vec2,
    pub radius: f32,
}

/// Level and score counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    /// Rounds completed
    pub level: u32,
    /// Targets destroyed during the current round
    pub current_score: u32,
    /// Sum of all round bonuses
    pub accumulated_score: u64,
    pub last_round_bonus: u64,
    #[serde(default)]
    pub targets_destroyed_total: u32,
    #[serde(default)]
    pub launches: u32,
}

impl ScoreState {
    /// Round bonus for a destroy count: clearing many at once pays super-linearly
    pub fn round_bonus(destroyed: u32) -> u64 {
        let destroyed = u64::from(destroyed);
        destroyed * destroyed
    }
}

/// Cosmetic and bookkeeping events emitted during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Launched { velocity: Vec2 },
    WallBounce { position: Vec2 },
    TargetHit { id: u32, position: Vec2, damage: u32 },
    TargetDestroyed { id: u32, position: Vec2, radius: f32 },
    TargetSpawned { id: u32, position: Vec2, radius: f32 },
    ShockwaveSpawned { id: u32, position: Vec2 },
    PowerUpCollected { id: u32, kind: PowerUpKind, position: Vec2 },
    PowerUpSpawned { id: u32, kind: PowerUpKind, position: Vec2 },
    BallStopped { position: Vec2 },
    RoundEnded { level: u32, destroyed: u32, bonus: u64 },
    GameReset,
}

/// Complete simulation context
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub arena: Arena,
    pub phase: RoundPhase,
    /// Simulation clock (seconds)
    pub time: f64,
    pub time_ticks: u64,
    pub ball: Option<Ball>,
    /// Live targets (sorted by id for determinism)
    pub targets: Vec<Target>,
    /// Live shockwaves (sorted by id for determinism)
    pub shockwaves: Vec<Shockwave>,
    /// Live power-ups (sorted by id for determinism)
    pub power_ups: Vec<PowerUp>,
    pub removed: Vec<RemovalRecord>,
    pub score: ScoreState,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// A fresh board is laid out on the next tick
    pub needs_layout: bool,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game with default tuning and an initial layout
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game with the given tuning and an initial layout
    ///
    /// `tuning` is used as is; run [`Tuning::validate`] first on anything
    /// loaded from outside. [`crate::Game::with_tuning`] does.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self::empty(seed, tuning);
        super::spawn::spawn_initial_targets(&mut state);
        log::info!(
            "New game (seed {}): {} targets",
            seed,
            state.targets.len()
        );
        state
    }

    /// Create a game with no entities at all
    pub fn empty(seed: u64, tuning: Tuning) -> Self {
        let arena = Arena::from_tuning(&tuning);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            arena,
            phase: RoundPhase::Idle,
            time: 0.0,
            time_ticks: 0,
            ball: None,
            targets: Vec::new(),
            shockwaves: Vec::new(),
            power_ups: Vec::new(),
            removed: Vec::new(),
            score: ScoreState::default(),
            events: Vec::new(),
            needs_layout: false,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Discard every entity and counter
    ///
    /// Safe in any phase. The next tick lays out a fresh board.
    pub fn reset(&mut self) {
        self.ball = None;
        self.targets.clear();
        self.shockwaves.clear();
        self.power_ups.clear();
        self.removed.clear();
        self.score = ScoreState::default();
        self.phase = RoundPhase::Idle;
        self.needs_layout = true;
        self.events.push(GameEvent::GameReset);
        log::info!("Game reset");
    }

    /// Insert a target at `position` sized to the free space around it
    ///
    /// Returns `None` when there is no room for a circle there. Live
    /// shockwaves never damage a target spawned after them.
    pub fn spawn_target(&mut self, position: Vec2, health: u32) -> Option<u32> {
        let radius = self
            .arena
            .closest_fit_radius(position, &self.tuning, &self.targets, &self.power_ups);
        if radius <= 0.0 {
            log::debug!("No room for a target at {position}");
            return None;
        }

        let id = self.next_entity_id();
        let color_index = rand::Rng::random_range(
            &mut self.rng,
            0..crate::consts::TARGET_COLOR_COUNT,
        );
        self.targets.push(Target {
            id,
            position,
            radius,
            health,
            color_index,
        });
        for shockwave in &mut self.shockwaves {
            shockwave.hit_set.insert(id);
        }
        self.events.push(GameEvent::TargetSpawned {
            id,
            position,
            radius,
        });
        Some(id)
    }

    /// Spawn a shockwave that grows from `base/5` to `2 * base`
    pub fn spawn_shockwave(&mut self, position: Vec2, base_radius: f32) -> u32 {
        use crate::consts::{SHOCKWAVE_END_FACTOR, SHOCKWAVE_START_FACTOR};

        let id = self.next_entity_id();
        self.shockwaves.push(Shockwave {
            id,
            position,
            start_radius: base_radius * SHOCKWAVE_START_FACTOR,
            end_radius: base_radius * SHOCKWAVE_END_FACTOR,
            age: 0.0,
            duration: self.tuning.shockwave_duration,
            hit_set: BTreeSet::new(),
            expired: false,
        });
        self.events.push(GameEvent::ShockwaveSpawned { id, position });
        id
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entity lists are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.targets.sort_by_key(|t| t.id);
        self.shockwaves.sort_by_key(|s| s.id);
        self.power_ups.sort_by_key(|p| p.id);
    }

    pub fn target(&self, id: u32) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }
}
