//! Collision detection and response for the ball
//!
//! Walls are axis-aligned and handled per edge. Targets are circles and
//! reflect the ball like a billiard cushion.

use glam::Vec2;

use super::arena::Arena;
use super::damage::{ball_hit_damage, damage_target};
use super::geometry::{distance, normalize, reflect_off_circle};
use super::state::GameState;

/// Result of a wall check
#[derive(Debug, Clone, Copy)]
pub struct WallContact {
    /// Whether any edge was hit
    pub hit: bool,
    /// Velocity with the offending components flipped
    pub velocity: Vec2,
    /// Position clamped back inside the arena
    pub position: Vec2,
}

/// Check the ball at `tentative` against all four arena edges
///
/// Each edge is tested on its own, so a corner hit flips both components.
/// A component is only flipped while moving toward that edge.
pub fn wall_collision(arena: &Arena, radius: f32, velocity: Vec2, tentative: Vec2) -> WallContact {
    let mut velocity = velocity;
    let mut hit = false;

    if tentative.x - radius <= arena.left && velocity.x < 0.0 {
        velocity.x = -velocity.x;
        hit = true;
    }
    if tentative.x + radius >= arena.right && velocity.x > 0.0 {
        velocity.x = -velocity.x;
        hit = true;
    }
    if tentative.y - radius <= arena.bottom && velocity.y < 0.0 {
        velocity.y = -velocity.y;
        hit = true;
    }
    if tentative.y + radius >= arena.top && velocity.y > 0.0 {
        velocity.y = -velocity.y;
        hit = true;
    }

    WallContact {
        hit,
        velocity,
        position: arena.clamp_inside(tentative, radius),
    }
}

/// Check if two circles overlap or touch
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    distance(a, b) <= a_radius + b_radius
}

/// Bounce the ball off a target and damage it
///
/// `tentative` is where the ball would be this tick. Returns the corrected
/// ball position, just touching the target's surface. The target may be
/// destroyed by the hit.
pub fn resolve_target_collision(state: &mut GameState, target_id: u32, tentative: Vec2) -> Option<Vec2> {
    let (center, target_radius, health) = {
        let target = state.target(target_id)?;
        (target.position, target.radius, target.health)
    };
    let initial_speed = state.tuning.ball_initial_speed;
    let ball = state.ball.as_mut()?;

    let mut normal = normalize(tentative - center);
    if normal == Vec2::ZERO {
        // Ball centre exactly on the target centre: push back the way it came
        normal = -normalize(ball.velocity);
    }
    let impact = center + normal * target_radius;

    let kind = ball.active_kind();
    if kind.is_some_and(|k| k.resets_speed_on_bounce()) {
        ball.speed = initial_speed;
    }
    let direction = reflect_off_circle(ball.velocity, center, impact);
    ball.velocity = direction * ball.speed;
    let position = center + normal * (ball.radius + target_radius);

    let amount = ball_hit_damage(state, health);
    damage_target(state, target_id, amount);

    if kind.is_some_and(|k| k.shocks_on_bounce()) {
        let base = state.tuning.bounce_shock_base_radius;
        state.spawn_shockwave(impact, base);
    }

    Some(position)
}
