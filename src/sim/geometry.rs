//! Vector helpers and reflection math
//!
//! Everything here is pure and works on `glam::Vec2`.

use glam::Vec2;

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Unit vector in the direction of `v`, or zero for a zero-length input
///
/// A zero result means "no direction"; callers must not divide by it.
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    let len = v.length();
    if len > 0.0 { v / len } else { Vec2::ZERO }
}

/// Billiard reflection off a circle, as a unit direction
///
/// The incoming direction is split into a component along the tangent at
/// `impact_point` and one along the radius; the radial part is negated.
/// The caller scales the result by the ball's current speed.
pub fn reflect_off_circle(velocity: Vec2, circle_center: Vec2, impact_point: Vec2) -> Vec2 {
    let incoming = normalize(velocity);
    let radial = impact_point - circle_center;
    let tangent = normalize(Vec2::new(-radial.y, radial.x));

    let along_tangent = incoming.dot(tangent) * tangent;
    let across_tangent = incoming - along_tangent;
    normalize(incoming - 2.0 * across_tangent)
}

/// Convert a drag delta into a launch velocity of the given speed
///
/// Uses θ = atan(Δy/Δx) and fixes up the signs per quadrant. A zero delta
/// gives a zero velocity.
pub fn velocity_from_aim(aim: Vec2, speed: f32) -> Vec2 {
    if aim == Vec2::ZERO {
        return Vec2::ZERO;
    }
    if aim.x == 0.0 {
        return Vec2::new(0.0, speed.copysign(aim.y));
    }

    let theta = (aim.y / aim.x).atan();
    let mut vx = speed * theta.cos();
    if aim.x < 0.0 {
        vx = -vx;
    }
    let mut vy = speed * theta.sin().abs();
    if aim.y < 0.0 {
        vy = -vy;
    }
    Vec2::new(vx, vy)
}
