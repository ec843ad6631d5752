//! Collision primitives: circles against the static board
//!
//! Narrow-phase checks return an `Overlap` (unit normal toward the ball plus
//! penetration depth) for the caller to resolve. Restitution reflection
//! keeps the tangential component and flips the normal one.

use glam::Vec2;

/// Result of a narrow-phase check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    /// Unit normal pointing from the static body toward the ball
    pub normal: Vec2,
    /// Penetration depth along the normal
    pub depth: f32,
}

/// Ball vs peg
pub fn circle_circle(pos: Vec2, radius: f32, center: Vec2, other_radius: f32) -> Option<Overlap> {
    let delta = pos - center;
    let reach = radius + other_radius;
    let dist_sq = delta.length_squared();
    if dist_sq >= reach * reach {
        return None;
    }
    let dist = dist_sq.sqrt();
    if dist > 1e-6 {
        Some(Overlap {
            normal: delta / dist,
            depth: reach - dist,
        })
    } else {
        // Centers coincide: push straight up
        Some(Overlap {
            normal: Vec2::NEG_Y,
            depth: reach,
        })
    }
}

/// Ball vs axis-aligned rectangle (barrier or bucket sensor), via the
/// closest point on the rectangle to the ball center
pub fn circle_rect(pos: Vec2, radius: f32, center: Vec2, half: Vec2) -> Option<Overlap> {
    let delta = pos - center;
    let closest = delta.clamp(-half, half);
    let away = delta - closest;
    let dist_sq = away.length_squared();
    if dist_sq >= radius * radius {
        return None;
    }
    if dist_sq > 1e-12 {
        let dist = dist_sq.sqrt();
        Some(Overlap {
            normal: away / dist,
            depth: radius - dist,
        })
    } else {
        // Center inside the rectangle: exit along the shallowest axis
        let slack = half - delta.abs();
        if slack.x < slack.y {
            Some(Overlap {
                normal: Vec2::new(delta.x.signum(), 0.0),
                depth: radius + slack.x,
            })
        } else {
            Some(Overlap {
                normal: Vec2::new(0.0, delta.y.signum()),
                depth: radius + slack.y,
            })
        }
    }
}

/// Velocity after bouncing off a surface: v' = v - (1 + e)(v·n)n
///
/// A separating velocity (v·n >= 0) passes through unchanged so resting
/// contacts don't gain energy.
#[inline]
pub fn reflect_velocity(vel: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    let vn = vel.dot(normal);
    if vn >= 0.0 {
        return vel;
    }
    vel - (1.0 + restitution) * vn * normal
}
