//! Target and power-up placement
//!
//! Initial targets hug a wall or cluster with earlier targets so that the
//! closest-fit radius stays reasonable. Power-ups only need a free spot.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::geometry::distance;
use super::powerup::PowerUpKind;
use super::state::{GameEvent, GameState, PowerUp};

/// Uniform draw that tolerates an empty or inverted range
fn uniform(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if lo < hi { rng.random_range(lo..=hi) } else { lo }
}

/// Sample a seed position for the next initial target
fn seed_candidate(state: &mut GameState, placed: usize) -> Vec2 {
    let arena = state.arena;
    let t = &state.tuning;
    let min = t.target_min_margin;
    // The first target must hug a wall; later ones may cluster instead
    let margin = if placed == 0 {
        t.target_max_margin
    } else {
        t.graceful_margin
    };
    let generation_bottom = arena.bottom + t.generation_bottom_margin;
    let rng = &mut state.rng;

    if rng.random_bool(0.5) {
        let x = if rng.random_bool(0.5) {
            uniform(rng, arena.left + min, arena.left + margin)
        } else {
            uniform(rng, arena.right - margin, arena.right - min)
        };
        let y = uniform(rng, generation_bottom + min, arena.top - min);
        Vec2::new(x, y)
    } else {
        let x = uniform(rng, arena.left + min, arena.right - min);
        let y = if rng.random_bool(0.5) {
            uniform(rng, arena.bottom + min, generation_bottom + margin)
        } else {
            uniform(rng, arena.top - margin, arena.top - min)
        };
        Vec2::new(x, y)
    }
}

/// Whether `candidate` is an acceptable seed given the targets placed so far
fn is_valid_seed(state: &GameState, candidate: Vec2) -> bool {
    let t = &state.tuning;
    let arena = &state.arena;

    if distance(candidate, arena.goal) < t.goal_radius + t.target_min_margin {
        return false;
    }
    if state
        .targets
        .iter()
        .any(|c| distance(candidate, c.position) <= c.radius + t.target_min_margin)
    {
        return false;
    }

    let far_from_walls = arena
        .wall_distances(candidate)
        .iter()
        .all(|&d| d > t.target_max_margin);
    let far_from_targets = state
        .targets
        .iter()
        .all(|c| distance(candidate, c.position) > c.radius + t.target_max_margin);
    !(far_from_walls && far_from_targets)
}

/// Lay out a fresh board of initial targets
///
/// A target whose placement runs out of attempts is skipped.
pub fn spawn_initial_targets(state: &mut GameState) {
    let (lo, hi) = (state.tuning.min_initial_targets, state.tuning.max_initial_targets);
    let count = if lo < hi {
        state.rng.random_range(lo..=hi)
    } else {
        lo
    };

    for _ in 0..count {
        let placed = state.targets.len();
        let mut found = None;
        for _ in 0..state.tuning.max_placement_attempts {
            let candidate = seed_candidate(state, placed);
            if is_valid_seed(state, candidate) {
                found = Some(candidate);
                break;
            }
        }

        let Some(position) = found else {
            log::warn!(
                "Gave up placing initial target {} after {} attempts",
                placed + 1,
                state.tuning.max_placement_attempts
            );
            continue;
        };

        let (hmin, hmax) = (state.tuning.min_target_health, state.tuning.max_target_health);
        let health = if hmin < hmax {
            state.rng.random_range(hmin..=hmax)
        } else {
            hmin
        }
        .max(1);
        state.spawn_target(position, health);
    }

    state.needs_layout = false;
    log::debug!("Initial layout: {} of {} targets", state.targets.len(), count);
}

/// Find a free spot for a power-up, falling back to the goal
pub fn power_up_location(state: &mut GameState, radius: f32) -> Vec2 {
    let arena = state.arena;
    let t = &state.tuning;
    let margin = t.power_up_margin;
    let goal_clearance = t.goal_radius + radius + margin;

    for _ in 0..t.max_placement_attempts {
        let candidate = Vec2::new(
            uniform(&mut state.rng, arena.left + radius, arena.right - radius),
            uniform(&mut state.rng, arena.bottom + radius, arena.top - radius),
        );
        if distance(candidate, arena.goal) <= goal_clearance {
            continue;
        }
        if state
            .targets
            .iter()
            .any(|c| distance(candidate, c.position) <= c.radius + radius + margin)
        {
            continue;
        }
        if state
            .power_ups
            .iter()
            .any(|p| distance(candidate, p.position) <= 2.0 * radius + margin)
        {
            continue;
        }
        return candidate;
    }

    log::warn!("No free spot for a power-up, placing it at the goal");
    arena.goal
}

/// Place a new power-up of `kind` on the board
pub fn spawn_power_up(state: &mut GameState, kind: PowerUpKind) -> u32 {
    let radius = state.tuning.power_up_radius;
    let position = power_up_location(state, radius);
    let id = state.next_entity_id();
    state.power_ups.push(PowerUp {
        id,
        kind,
        position,
        radius,
    });
    state.events.push(GameEvent::PowerUpSpawned { id, kind, position });
    log::debug!("Spawned power-up {:?} at {}", kind, position);
    id
}
