//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Within a tick
//! the order is: reset, layout, launch, ball physics (walls, power-ups,
//! targets), shockwave sweep, removal purge, round bookkeeping.

use glam::Vec2;
use rand::Rng;

use super::collision::{circles_overlap, resolve_target_collision, wall_collision};
use super::damage::{purge_removal_records, sweep_shockwaves};
use super::geometry::{distance, velocity_from_aim};
use super::powerup::{activate, roll_power_up};
use super::spawn::{spawn_initial_targets, spawn_power_up};
use super::state::{Ball, GameEvent, GameState, RoundPhase, ScoreState};
use crate::consts::NOMINAL_FRAME_DT;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Launch the ball along this drag vector, measured from the goal
    pub launch: Option<Vec2>,
    /// Start a new game before anything else happens
    pub reset: bool,
}

/// Advance the game state by one timestep of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.reset {
        state.reset();
        return;
    }

    if state.needs_layout {
        spawn_initial_targets(state);
    }

    if let Some(aim) = input.launch {
        // Release over the scoreboard restarts the game, in any phase
        if state.arena.goal.y + aim.y > state.arena.top {
            state.reset();
            return;
        }
        if state.phase == RoundPhase::Idle {
            launch(state, aim);
        } else {
            log::debug!("Launch ignored in {:?}", state.phase);
        }
    }

    if state.phase == RoundPhase::InFlight {
        step_ball(state, dt);
    }

    sweep_shockwaves(state, dt);
    purge_removal_records(state);

    if state.phase == RoundPhase::Settling && state.shockwaves.is_empty() {
        state.phase = RoundPhase::RoundEnd;
        finish_round(state);
    }

    state.time += f64::from(dt);
    state.time_ticks += 1;
    state.normalize_order();
}

/// Put a new ball in play from the goal
fn launch(state: &mut GameState, aim: Vec2) {
    let origin = state.arena.goal;
    let speed = state.tuning.ball_initial_speed;
    let velocity = velocity_from_aim(aim, speed);
    if velocity == Vec2::ZERO {
        log::debug!("Launch with zero aim ignored");
        return;
    }

    state.ball = Some(Ball::new(origin, velocity, speed, state.tuning.ball_radius));
    state.phase = RoundPhase::InFlight;
    state.score.launches += 1;
    state.events.push(GameEvent::Launched { velocity });
    log::debug!("Launch #{} with velocity {}", state.score.launches, velocity);
}

/// Move the ball one step and resolve everything it touches
fn step_ball(state: &mut GameState, dt: f32) {
    let Some(ball) = state.ball.as_mut() else {
        return;
    };
    if ball.is_stopped() {
        stop_ball(state);
        return;
    }

    let frame_scaling = dt / NOMINAL_FRAME_DT;
    let tentative = ball.position + ball.velocity * frame_scaling;

    let decel = state.tuning.scaled_acceleration(ball.speed);
    ball.set_speed(ball.speed + decel);

    // Walls
    let contact = wall_collision(&state.arena, ball.radius, ball.velocity, tentative);
    let mut position = contact.position;
    if contact.hit {
        ball.velocity = contact.velocity;
        state.events.push(GameEvent::WallBounce {
            position: contact.position,
        });
    }

    // Power-ups
    let ball_radius = ball.radius;
    let (collected, remaining): (Vec<_>, Vec<_>) = std::mem::take(&mut state.power_ups)
        .into_iter()
        .partition(|p| circles_overlap(tentative, ball_radius, p.position, p.radius));
    state.power_ups = remaining;
    for power_up in &collected {
        activate(state, power_up);
    }

    // Targets, tested against the uncorrected position
    let ball_radius = state.ball.as_ref().map_or(ball_radius, |b| b.radius);
    let touched: Vec<u32> = state
        .targets
        .iter()
        .filter(|t| circles_overlap(tentative, ball_radius, t.position, t.radius))
        .map(|t| t.id)
        .collect();
    for id in touched {
        if let Some(corrected) = resolve_target_collision(state, id, tentative) {
            position = corrected;
        }
    }

    if let Some(ball) = state.ball.as_mut() {
        ball.position = position;
    }
}

/// The ball has come to rest: leave a new target behind and start settling
fn stop_ball(state: &mut GameState) {
    let Some(ball) = state.ball.take() else {
        return;
    };
    let position = ball.position;
    let t = &state.tuning;
    let clearance = t.goal_radius + t.target_min_margin;
    let (hmin, hmax) = (t.min_target_health, t.max_target_health);

    if distance(position, state.arena.goal) > clearance {
        let health = if hmin < hmax {
            state.rng.random_range(hmin..=hmax)
        } else {
            hmin
        };
        if state.spawn_target(position, health.max(1)).is_none() {
            log::debug!("Ball stopped with no room for a target at {}", position);
        }
    }

    state.events.push(GameEvent::BallStopped { position });
    state.phase = RoundPhase::Settling;
}

/// Score the round, maybe grant a power-up, and return to `Idle`
fn finish_round(state: &mut GameState) {
    let destroyed = state.score.current_score;
    let bonus = ScoreState::round_bonus(destroyed);

    state.score.level += 1;
    state.score.accumulated_score += bonus;
    state.score.last_round_bonus = bonus;
    state.score.current_score = 0;

    let chance = state.tuning.random_power_up_chance;
    let chance = if (0.0..=1.0).contains(&chance) { chance } else { 0.0 };
    if let Some(kind) = roll_power_up(destroyed, chance, &mut state.rng) {
        spawn_power_up(state, kind);
    }

    state.events.push(GameEvent::RoundEnded {
        level: state.score.level,
        destroyed,
        bonus,
    });
    log::info!(
        "Round {} over: {} destroyed, bonus {}, total {}",
        state.score.level,
        destroyed,
        bonus,
        state.score.accumulated_score
    );
    state.phase = RoundPhase::Idle;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::powerup::PowerUpKind;
    use crate::sim::state::{PowerUp, Target};
    use crate::tuning::Tuning;

    const DT: f32 = NOMINAL_FRAME_DT;

    fn launch_input(aim: Vec2) -> TickInput {
        TickInput {
            launch: Some(aim),
            ..Default::default()
        }
    }

    /// Tick until the round is over, returning how many rounds ended
    fn run_round(state: &mut GameState) -> usize {
        let mut ended = 0;
        for _ in 0..10_000 {
            tick(state, &TickInput::default(), DT);
            ended += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::RoundEnded { .. }))
                .count();
            if state.phase == RoundPhase::Idle {
                break;
            }
        }
        ended
    }

    #[test]
    fn test_launch_enters_flight() {
        let mut state = GameState::new(12345);
        assert_eq!(state.phase, RoundPhase::Idle);

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, RoundPhase::Idle);

        tick(&mut state, &launch_input(Vec2::new(50.0, 300.0)), DT);
        assert_eq!(state.phase, RoundPhase::InFlight);
        assert_eq!(state.score.launches, 1);
        assert!(state.ball.is_some());
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::Launched { .. })));
    }

    #[test]
    fn test_launch_ignored_outside_idle() {
        let mut state = GameState::empty(1, Tuning::default());
        tick(&mut state, &launch_input(Vec2::new(0.0, 300.0)), DT);
        tick(&mut state, &launch_input(Vec2::new(100.0, 300.0)), DT);
        assert_eq!(state.score.launches, 1);
    }

    #[test]
    fn test_zero_aim_is_ignored() {
        let mut state = GameState::new(5);
        tick(&mut state, &launch_input(Vec2::ZERO), DT);
        assert_eq!(state.phase, RoundPhase::Idle);
        assert!(state.ball.is_none());
    }

    #[test]
    fn test_release_over_scoreboard_resets() {
        let mut state = GameState::new(5);
        state.score.accumulated_score = 40;
        let above = state.arena.top - state.arena.goal.y + 10.0;
        tick(&mut state, &launch_input(Vec2::new(0.0, above)), DT);
        assert_eq!(state.score.accumulated_score, 0);
        assert!(state.targets.is_empty());

        tick(&mut state, &TickInput::default(), DT);
        assert!(!state.targets.is_empty());
    }

    #[test]
    fn test_speed_is_monotone_and_ball_stops() {
        let mut state = GameState::empty(3, Tuning::default());
        tick(&mut state, &launch_input(Vec2::new(120.0, 400.0)), DT);

        let mut last = state.ball.as_ref().unwrap().speed;
        let mut ticks = 0;
        while let Some(ball) = state.ball.as_ref() {
            assert!(ball.speed <= last);
            assert!((ball.velocity.length() - ball.speed).abs() < 1e-3);
            // Launched from the goal on the bottom edge, inside after the first step
            if ticks > 0 {
                assert!(state.arena.contains(ball.position, ball.radius));
            }
            last = ball.speed;
            tick(&mut state, &TickInput::default(), DT);
            ticks += 1;
            assert!(ticks < 1000, "ball never stopped");
        }
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::BallStopped { .. })));
    }

    #[test]
    fn test_round_ends_exactly_once() {
        let mut state = GameState::new(2024);
        tick(&mut state, &launch_input(Vec2::new(-60.0, 500.0)), DT);
        state.drain_events();

        assert_eq!(run_round(&mut state), 1);
        assert_eq!(state.phase, RoundPhase::Idle);
        assert!(state.ball.is_none());
        assert!(state.shockwaves.is_empty());
        assert_eq!(state.score.level, 1);
        assert_eq!(state.score.current_score, 0);

        // Nothing more happens while idle
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(!state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::RoundEnded { .. })));
    }

    #[test]
    fn test_round_bonus_is_squared() {
        let mut state = GameState::empty(8, Tuning::default());
        state.score.current_score = 3;
        state.phase = RoundPhase::Settling;

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, RoundPhase::Idle);
        assert_eq!(state.score.last_round_bonus, 9);
        assert_eq!(state.score.accumulated_score, 9);
        assert_eq!(state.score.level, 1);
        assert_eq!(state.score.current_score, 0);
        // Three destroyed always grants a power-up
        assert_eq!(state.power_ups.len(), 1);
    }

    #[test]
    fn test_settling_waits_for_shockwaves() {
        let mut state = GameState::empty(8, Tuning::default());
        state.phase = RoundPhase::Settling;
        state.spawn_shockwave(Vec2::ZERO, 40.0);

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, RoundPhase::Settling);

        let ticks = (state.tuning.shockwave_duration / DT).ceil() as usize + 1;
        for _ in 0..ticks {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.phase, RoundPhase::Idle);
    }

    #[test]
    fn test_rest_spot_becomes_target() {
        let mut state = GameState::empty(8, Tuning::default());
        let rest = state.arena.center();
        state.ball = Some(Ball::new(rest, Vec2::ZERO, 0.0, 15.0));
        state.phase = RoundPhase::InFlight;

        tick(&mut state, &TickInput::default(), DT);
        assert!(state.ball.is_none());
        assert_eq!(state.targets.len(), 1);
        assert_eq!(state.targets[0].position, rest);
    }

    #[test]
    fn test_rest_near_goal_leaves_no_target() {
        let mut state = GameState::empty(8, Tuning::default());
        let rest = state.arena.goal + Vec2::new(0.0, 40.0);
        state.ball = Some(Ball::new(rest, Vec2::ZERO, 0.0, 15.0));
        state.phase = RoundPhase::InFlight;

        tick(&mut state, &TickInput::default(), DT);
        assert!(state.targets.is_empty());
        assert_eq!(state.phase, RoundPhase::Idle);
    }

    #[test]
    fn test_power_up_collected_in_flight() {
        let mut state = GameState::empty(8, Tuning::default());
        let id = state.next_entity_id();
        let start = state.arena.center();
        state.power_ups.push(PowerUp {
            id,
            kind: PowerUpKind::DoubleDamage,
            position: start + Vec2::new(10.0, 0.0),
            radius: 15.0,
        });
        state.ball = Some(Ball::new(start, Vec2::new(5.0, 0.0), 5.0, 15.0));
        state.phase = RoundPhase::InFlight;

        tick(&mut state, &TickInput::default(), DT);
        assert!(state.power_ups.is_empty());
        assert_eq!(
            state.ball.as_ref().unwrap().active_kind(),
            Some(PowerUpKind::DoubleDamage)
        );
    }

    #[test]
    fn test_last_overlapping_target_sets_position() {
        let mut state = GameState::empty(8, Tuning::default());
        let start = state.arena.center();
        let tentative = start + Vec2::new(10.0, 0.0);
        let add = |state: &mut GameState, offset: Vec2| {
            let id = state.next_entity_id();
            state.targets.push(Target {
                id,
                position: tentative + offset,
                radius: 30.0,
                health: 4,
                color_index: 0,
            });
            id
        };
        let above = add(&mut state, Vec2::new(0.0, 40.0));
        let below = add(&mut state, Vec2::new(0.0, -40.0));
        state.ball = Some(Ball::new(start, Vec2::new(10.0, 0.0), 10.0, 15.0));
        state.phase = RoundPhase::InFlight;

        tick(&mut state, &TickInput::default(), DT);

        // Both were hit from the same uncorrected position
        assert_eq!(state.target(above).unwrap().health, 3);
        assert_eq!(state.target(below).unwrap().health, 3);
        // The later one (by id) decides where the ball ends up
        let ball = state.ball.as_ref().unwrap();
        let expected = tentative + Vec2::new(0.0, -40.0 + 45.0);
        assert!((ball.position - expected).length() < 1e-3);
    }

    #[test]
    fn test_reset_while_in_flight() {
        let mut state = GameState::new(777);
        tick(&mut state, &launch_input(Vec2::new(30.0, 300.0)), DT);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), DT);
        }

        let reset = TickInput {
            reset: true,
            ..Default::default()
        };
        tick(&mut state, &reset, DT);
        assert_eq!(state.phase, RoundPhase::Idle);
        assert!(state.ball.is_none());
        assert!(state.targets.is_empty());
        assert!(state.shockwaves.is_empty());
        assert!(state.power_ups.is_empty());
        assert_eq!(state.score, ScoreState::default());

        tick(&mut state, &TickInput::default(), DT);
        assert!(!state.targets.is_empty());
        assert!(!state.needs_layout);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99999);
        let mut b = GameState::new(99999);
        let aims = [Vec2::new(80.0, 300.0), Vec2::new(-200.0, 150.0), Vec2::new(10.0, 600.0)];

        for aim in aims {
            tick(&mut a, &launch_input(aim), DT);
            tick(&mut b, &launch_input(aim), DT);
            run_round(&mut a);
            run_round(&mut b);
        }

        assert_eq!(a.score, b.score);
        assert_eq!(a.time_ticks, b.time_ticks);
        let pa: Vec<(u32, Vec2, u32)> = a.targets.iter().map(|t| (t.id, t.position, t.health)).collect();
        let pb: Vec<(u32, Vec2, u32)> = b.targets.iter().map(|t| (t.id, t.position, t.health)).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_health_never_increases_during_play() {
        let mut state = GameState::new(31337);
        tick(&mut state, &launch_input(Vec2::new(40.0, 350.0)), DT);
        let mut previous: Vec<(u32, u32)> = state.targets.iter().map(|t| (t.id, t.health)).collect();

        for _ in 0..2_000 {
            tick(&mut state, &TickInput::default(), DT);
            for (id, health) in &previous {
                if let Some(t) = state.target(*id) {
                    assert!(t.health <= *health);
                    assert!(t.health > 0);
                }
            }
            previous = state.targets.iter().map(|t| (t.id, t.health)).collect();
            if state.phase == RoundPhase::Idle {
                break;
            }
        }
    }
}
