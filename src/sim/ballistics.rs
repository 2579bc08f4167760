//! Fixed-speed ballistic firing solutions
//!
//! Angles are in screen space (y grows downward), matching unit aim angles.

use glam::Vec2;

use crate::normalize_angle;

/// Both launch angles that pass through the target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiringSolution {
    /// Higher arc, better at clearing terrain
    pub high: f32,
    /// Flatter arc
    pub low: f32,
}

/// Discriminant of the range equation: `v⁴ - g(g·dx² + 2·dy·v²)`, where `dy`
/// is the target's height above the shooter. Negative means out of reach.
pub fn reach_discriminant(offset: Vec2, speed: f32, gravity: f32) -> f32 {
    let dx = offset.x;
    let rise = -offset.y;
    let v2 = speed * speed;
    v2 * v2 - gravity * (gravity * dx * dx + 2.0 * rise * v2)
}

/// Solve for the launch angles that hit `offset` (target minus shooter) at
/// a fixed launch `speed` under downward `gravity`.
pub fn solve(offset: Vec2, speed: f32, gravity: f32) -> Option<FiringSolution> {
    use std::f32::consts::{FRAC_PI_2, PI};

    let a = reach_discriminant(offset, speed, gravity);
    if a < 0.0 {
        return None;
    }

    let v2 = speed * speed;
    let root = a.sqrt();
    let run = offset.x.abs();

    // Elevations above the horizon, toward the target
    let (high, low) = if run <= f32::EPSILON {
        (FRAC_PI_2, FRAC_PI_2)
    } else {
        (
            ((v2 + root) / (gravity * run)).atan(),
            ((v2 - root) / (gravity * run)).atan(),
        )
    };

    let to_screen = |elevation: f32| {
        if offset.x < 0.0 {
            normalize_angle(elevation - PI)
        } else {
            normalize_angle(-elevation)
        }
    };

    Some(FiringSolution {
        high: to_screen(high),
        low: to_screen(low),
    })
}
