//! Power-up kinds and their effects
//!
//! Each concern (effect, label, color, spawn pool) is one dispatch table
//! over [`PowerUpKind`].

use rand::Rng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::damage::damage_target;
use super::state::{ActivePowerUp, GameEvent, GameState, PowerUp};

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    ResetSpeed,
    SuperBounce,
    Shock,
    LargeBall,
    SmallBall,
    DoubleDamage,
    SkullBall,
    ShockOnBounce,
    RandomDamageCircles,
    AllCircles1Hp,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 10] = [
        PowerUpKind::ResetSpeed,
        PowerUpKind::SuperBounce,
        PowerUpKind::Shock,
        PowerUpKind::LargeBall,
        PowerUpKind::SmallBall,
        PowerUpKind::DoubleDamage,
        PowerUpKind::SkullBall,
        PowerUpKind::ShockOnBounce,
        PowerUpKind::RandomDamageCircles,
        PowerUpKind::AllCircles1Hp,
    ];

    /// Label drawn inside the pickup
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::ResetSpeed => ">",
            PowerUpKind::SuperBounce => "B",
            PowerUpKind::Shock => "💥",
            PowerUpKind::LargeBall => "+",
            PowerUpKind::SmallBall => "—",
            PowerUpKind::DoubleDamage => "2x",
            PowerUpKind::SkullBall => "☠",
            PowerUpKind::ShockOnBounce => "⚡",
            PowerUpKind::RandomDamageCircles => "?",
            PowerUpKind::AllCircles1Hp => "1",
        }
    }

    /// Label drawn on the ball while the effect is active
    pub fn ball_label(&self) -> &'static str {
        match self {
            PowerUpKind::DoubleDamage => "2x",
            PowerUpKind::SkullBall => "☠",
            _ => "",
        }
    }

    /// Stroke color (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            PowerUpKind::ResetSpeed => 0x0000FF,
            PowerUpKind::SuperBounce => 0x00FF00,
            PowerUpKind::Shock => 0xFF0000,
            PowerUpKind::LargeBall | PowerUpKind::SmallBall => 0xFFFF00,
            PowerUpKind::DoubleDamage => 0xFF0000,
            PowerUpKind::SkullBall => 0x000000,
            PowerUpKind::ShockOnBounce => 0xFF8000,
            PowerUpKind::RandomDamageCircles => 0x8000FF,
            PowerUpKind::AllCircles1Hp => 0x00FFFF,
        }
    }

    /// Fill color, if the pickup is filled at all
    pub fn fill_color(&self) -> Option<u32> {
        match self {
            PowerUpKind::SkullBall => Some(0x000000),
            _ => None,
        }
    }

    /// Whether the effect resets speed on every target bounce
    pub fn resets_speed_on_bounce(&self) -> bool {
        matches!(self, PowerUpKind::SuperBounce)
    }

    /// Whether every target bounce also spawns a small shockwave
    pub fn shocks_on_bounce(&self) -> bool {
        matches!(self, PowerUpKind::ShockOnBounce)
    }

    /// Uniformly random kind
    pub fn random(rng: &mut Pcg32) -> PowerUpKind {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Curated pool for a round's destroy count
pub fn pool_for_destroyed(destroyed: u32) -> Option<&'static [PowerUpKind]> {
    const PAIR: &[PowerUpKind] = &[PowerUpKind::Shock, PowerUpKind::ShockOnBounce];
    const TRIPLE: &[PowerUpKind] = &[
        PowerUpKind::ResetSpeed,
        PowerUpKind::SuperBounce,
        PowerUpKind::DoubleDamage,
    ];
    const QUAD: &[PowerUpKind] = &[
        PowerUpKind::SkullBall,
        PowerUpKind::RandomDamageCircles,
        PowerUpKind::LargeBall,
    ];
    const SWEEP: &[PowerUpKind] = &[PowerUpKind::AllCircles1Hp, PowerUpKind::SkullBall];

    match destroyed {
        2 => Some(PAIR),
        3 => Some(TRIPLE),
        4 => Some(QUAD),
        5.. => Some(SWEEP),
        _ => None,
    }
}

/// Decide which power-up (if any) a finished round grants
pub fn roll_power_up(destroyed: u32, chance: f64, rng: &mut Pcg32) -> Option<PowerUpKind> {
    match pool_for_destroyed(destroyed) {
        Some(pool) => pool.choose(rng).copied(),
        None if rng.random_bool(chance) => Some(PowerUpKind::random(rng)),
        None => None,
    }
}

/// Apply a collected power-up to the ball and the board
///
/// The pickup must already be out of the live set. Picking up a new kind
/// overwrites whatever was active before.
pub fn activate(state: &mut GameState, power_up: &PowerUp) {
    let tuning = state.tuning.clone();
    let kind = power_up.kind;

    let Some(ball) = state.ball.as_mut() else {
        log::debug!("Power-up {:?} collected with no ball in play", kind);
        return;
    };

    let mut hits_remaining = 0;
    match kind {
        PowerUpKind::ResetSpeed | PowerUpKind::SuperBounce => {
            ball.set_speed(tuning.ball_initial_speed);
        }
        PowerUpKind::LargeBall => {
            ball.radius = tuning.large_ball_radius;
            ball.set_speed(tuning.ball_initial_speed);
        }
        PowerUpKind::SmallBall => {
            ball.radius = tuning.small_ball_radius;
            ball.set_speed(tuning.ball_initial_speed);
        }
        PowerUpKind::DoubleDamage => {
            hits_remaining = tuning.double_damage_hits;
        }
        PowerUpKind::SkullBall | PowerUpKind::ShockOnBounce => {}
        PowerUpKind::Shock | PowerUpKind::RandomDamageCircles | PowerUpKind::AllCircles1Hp => {}
    }
    ball.active_power_up = Some(ActivePowerUp {
        kind,
        hits_remaining,
    });

    state.events.push(GameEvent::PowerUpCollected {
        id: power_up.id,
        kind,
        position: power_up.position,
    });
    log::debug!("Power-up {:?} activated", kind);

    // Board-wide effects
    match kind {
        PowerUpKind::Shock => {
            state.spawn_shockwave(power_up.position, tuning.shock_base_radius);
        }
        PowerUpKind::RandomDamageCircles => {
            let live: Vec<(u32, u32)> = state.targets.iter().map(|t| (t.id, t.health)).collect();
            let mut rolls = Vec::with_capacity(live.len());
            for (id, health) in live {
                rolls.push((id, state.rng.random_range(0..=health)));
            }
            for (id, amount) in rolls {
                damage_target(state, id, amount);
            }
        }
        PowerUpKind::AllCircles1Hp => {
            for target in &mut state.targets {
                target.health = tuning.all_circles_health;
            }
        }
        _ => {}
    }
}
