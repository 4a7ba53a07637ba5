//! Play-field bounds and closest-fit sizing
//!
//! The arena is a rectangle between the scoreboard and the bottom bar, with
//! the goal circle centred on the bottom edge. It is fixed for a session.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::distance;
use super::state::{PowerUp, Target};
use crate::tuning::Tuning;

/// Playable bounds and goal placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    /// Goal centre, also the launch origin
    pub goal: Vec2,
    pub goal_radius: f32,
}

impl Arena {
    /// Lay out the arena inside a nominal screen centred on the origin
    pub fn from_tuning(tuning: &Tuning) -> Self {
        let left = -tuning.screen_width / 2.0;
        let right = tuning.screen_width / 2.0;
        let top = tuning.screen_height / 2.0 - tuning.scoreboard_height - 1.0;
        let bottom = -tuning.screen_height / 2.0 + tuning.bottom_bar_height;
        Self {
            left,
            right,
            top,
            bottom,
            goal: Vec2::new(0.0, bottom),
            goal_radius: tuning.goal_radius,
        }
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) / 2.0,
            (self.bottom + self.top) / 2.0,
        )
    }

    /// Whether a circle of `radius` at `point` lies fully inside the bounds
    pub fn contains(&self, point: Vec2, radius: f32) -> bool {
        point.x - radius >= self.left
            && point.x + radius <= self.right
            && point.y - radius >= self.bottom
            && point.y + radius <= self.top
    }

    /// Pull a circle back inside the bounds
    pub fn clamp_inside(&self, point: Vec2, radius: f32) -> Vec2 {
        let clamp_axis = |v: f32, lo: f32, hi: f32| {
            if lo > hi { (lo + hi) / 2.0 } else { v.clamp(lo, hi) }
        };
        Vec2::new(
            clamp_axis(point.x, self.left + radius, self.right - radius),
            clamp_axis(point.y, self.bottom + radius, self.top - radius),
        )
    }

    /// Distances from `point` to the left, right, bottom, top boundary lines
    pub fn wall_distances(&self, point: Vec2) -> [f32; 4] {
        [
            (point.x - self.left).abs(),
            (self.right - point.x).abs(),
            (point.y - self.bottom).abs(),
            (self.top - point.y).abs(),
        ]
    }

    /// Distance from `point` to the edge of the goal circle
    pub fn goal_clearance(&self, point: Vec2) -> f32 {
        distance(point, self.goal) - self.goal_radius
    }

    /// Largest circle radius at `candidate` that stays clear of everything
    ///
    /// Targets are shrunk by half their stroke width and every distance is
    /// scaled down slightly so neighbouring outlines never touch. The result
    /// is capped at `max_target_size` and never negative.
    pub fn closest_fit_radius(
        &self,
        candidate: Vec2,
        tuning: &Tuning,
        targets: &[Target],
        power_ups: &[PowerUp],
    ) -> f32 {
        let line = tuning.line_scaling_factor;
        let mut min_dist = tuning.max_target_size;

        for target in targets {
            let stroke = target.radius * line;
            let adjusted = distance(candidate, target.position) - target.radius - stroke / 2.0;
            min_dist = min_dist.min(adjusted * (1.0 - line / 4.0));
        }

        for power_up in power_ups {
            let adjusted = distance(candidate, power_up.position) - power_up.radius;
            min_dist = min_dist.min(adjusted * (1.0 - line / 4.0));
        }

        for wall in self.wall_distances(candidate) {
            min_dist = min_dist.min(wall * (1.0 - line / 2.0));
        }

        let goal = self.goal_clearance(candidate);
        min_dist = min_dist.min(goal * (1.0 - line / 2.0));

        min_dist.max(0.0)
    }
}
