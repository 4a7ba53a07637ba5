//! Read-only view of a tick for the presentation layer

use glam::Vec2;
use serde::Serialize;

use super::powerup::PowerUpKind;
use super::state::{GameEvent, GameState, RoundPhase, ScoreState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BallView {
    pub position: Vec2,
    pub radius: f32,
    pub power_up: Option<PowerUpKind>,
    /// Text drawn on the ball, empty when nothing is active
    pub label: &'static str,
    pub color: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetView {
    pub id: u32,
    pub position: Vec2,
    pub radius: f32,
    pub health: u32,
    pub color_index: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShockwaveView {
    pub id: u32,
    pub position: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerUpView {
    pub id: u32,
    pub kind: PowerUpKind,
    pub position: Vec2,
    pub radius: f32,
    pub label: &'static str,
    pub color: u32,
    pub fill_color: Option<u32>,
}

/// Everything a renderer needs after one step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub ball: Option<BallView>,
    pub targets: Vec<TargetView>,
    pub shockwaves: Vec<ShockwaveView>,
    pub power_ups: Vec<PowerUpView>,
    pub score: ScoreState,
    pub phase: RoundPhase,
    /// Events emitted since the previous snapshot
    pub events: Vec<GameEvent>,
}

impl Snapshot {
    /// Capture the state and drain its pending events
    pub fn capture(state: &mut GameState) -> Self {
        let ball = state.ball.as_ref().map(|b| {
            let kind = b.active_kind();
            BallView {
                position: b.position,
                radius: b.radius,
                power_up: kind,
                label: kind.map_or("", |k| k.ball_label()),
                color: kind.map(|k| k.color()),
            }
        });

        Self {
            ball,
            targets: state
                .targets
                .iter()
                .map(|t| TargetView {
                    id: t.id,
                    position: t.position,
                    radius: t.radius,
                    health: t.health,
                    color_index: t.color_index,
                })
                .collect(),
            shockwaves: state
                .shockwaves
                .iter()
                .map(|s| ShockwaveView {
                    id: s.id,
                    position: s.position,
                    radius: s.current_radius(),
                })
                .collect(),
            power_ups: state
                .power_ups
                .iter()
                .map(|p| PowerUpView {
                    id: p.id,
                    kind: p.kind,
                    position: p.position,
                    radius: p.radius,
                    label: p.kind.label(),
                    color: p.kind.color(),
                    fill_color: p.kind.fill_color(),
                })
                .collect(),
            score: state.score.clone(),
            phase: state.phase,
            events: state.drain_events(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
