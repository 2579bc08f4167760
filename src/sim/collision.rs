//! Circle-versus-raster terrain collision
//!
//! A body's leading half-disc is sampled against the terrain grid. Each solid
//! sample pushes the body back toward its centre; the summed push is the
//! surface normal used for the bounce.

use glam::Vec2;

use super::terrain::Terrain;
use crate::consts::PROBE_SAMPLES;
use crate::{direction, heading};

/// Result of a terrain probe
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether any sample landed on solid ground
    pub hit: bool,
    /// Accumulated sample-to-centre vector (not normalized)
    pub response: Vec2,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            response: Vec2::ZERO,
        }
    }

    /// Unit bounce normal. A response that cancels out falls back to pushing
    /// straight against the direction of travel.
    pub fn normal(&self, vel: Vec2) -> Vec2 {
        let normal = self.response.normalize_or_zero();
        if normal == Vec2::ZERO {
            -vel.normalize_or_zero()
        } else {
            normal
        }
    }
}

/// Probe the terrain around a tentative position.
///
/// Samples are spread over the half circle of `radius` facing the direction
/// of `vel`, at `PROBE_SAMPLES` evenly spaced angles, and clamped to the grid.
pub fn probe_terrain(terrain: &Terrain, pos: Vec2, vel: Vec2, radius: f32) -> CollisionResult {
    use std::f32::consts::{FRAC_PI_2, PI};

    let travel = heading(vel);
    let step = PI / PROBE_SAMPLES as f32;
    let mut result = CollisionResult::miss();

    for i in 0..PROBE_SAMPLES {
        let angle = travel - FRAC_PI_2 + step * i as f32;
        let sample = terrain.clamp_position(pos + direction(angle) * radius);

        if terrain.is_solid_at(sample) {
            result.response += pos - sample;
            result.hit = true;
        }
    }

    result
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Bounce: reflect about the normal and keep `friction` of the result
#[inline]
pub fn bounce(velocity: Vec2, normal: Vec2, friction: f32) -> Vec2 {
    friction * reflect_velocity(velocity, normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::terrain::SOLID;
    use proptest::prelude::*;

    /// Flat ground from row `ground` down
    fn flat_ground(width: usize, height: usize, ground: usize) -> Terrain {
        let mut terrain = Terrain::new(width, height);
        for y in ground..height {
            for x in 0..width {
                terrain.set(x, y, SOLID);
            }
        }
        terrain
    }

    #[test]
    fn test_probe_hits_ground_below() {
        let terrain = flat_ground(32, 32, 20);
        let result = probe_terrain(&terrain, Vec2::new(16.0, 18.0), Vec2::new(0.0, 5.0), 3.5);
        assert!(result.hit);
        // Push points back up, out of the ground
        assert!(result.normal(Vec2::new(0.0, 5.0)).y < 0.0);
    }

    #[test]
    fn test_probe_ignores_trailing_side() {
        // Ground is behind the body (below) while it flies upward
        let terrain = flat_ground(32, 32, 20);
        let result = probe_terrain(&terrain, Vec2::new(16.0, 18.0), Vec2::new(0.0, -5.0), 1.5);
        assert!(!result.hit);
    }

    #[test]
    fn test_probe_in_open_air_misses() {
        let terrain = flat_ground(32, 32, 30);
        let result = probe_terrain(&terrain, Vec2::new(16.0, 10.0), Vec2::new(3.0, 3.0), 3.5);
        assert!(!result.hit);
        assert_eq!(result.response, Vec2::ZERO);
    }

    #[test]
    fn test_reflect_velocity() {
        // Falling body hits a floor (normal pointing up)
        let velocity = Vec2::new(3.0, 10.0);
        let normal = Vec2::new(0.0, -1.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - 3.0).abs() < 0.001);
        assert!((reflected.y - (-10.0)).abs() < 0.001);
    }

    #[test]
    fn test_cancelled_response_falls_back_to_travel() {
        let result = CollisionResult {
            hit: true,
            response: Vec2::ZERO,
        };
        let normal = result.normal(Vec2::new(2.0, 0.0));
        assert!((normal - Vec2::new(-1.0, 0.0)).length() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_bounce_never_amplifies(
            vx in -100.0f32..100.0,
            vy in -100.0f32..100.0,
            angle in -3.14f32..3.14,
            friction in 0.05f32..=1.0,
        ) {
            let vel = Vec2::new(vx, vy);
            let normal = direction(angle);
            let out = bounce(vel, normal, friction);
            prop_assert!(out.length() <= vel.length() * friction * (1.0 + 1e-4) + 1e-4);
        }
    }
}
