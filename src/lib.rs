//! Crater Artillery - a turn-based 2D artillery simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, terrain, explosions, turns, opponents)
//! - `camera`: Camera follow/scroll support for a presentation layer
//! - `settings`: Data-driven match setup

pub mod camera;
pub mod settings;
pub mod sim;

pub use camera::Camera;
pub use settings::MatchSettings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Physics sub-steps run per rendered frame
    pub const SUBSTEPS: u32 = 10;
    /// Downward acceleration applied to every body (units/s²)
    pub const GRAVITY: f32 = 2.0;
    /// Below this speed a body is considered at rest
    pub const REST_SPEED: f32 = 0.1;
    /// Terrain probe samples taken across the leading half-disc
    pub const PROBE_SAMPLES: u32 = 8;

    /// Map dimensions in cells
    pub const MAP_WIDTH: usize = 1024;
    pub const MAP_HEIGHT: usize = 512;

    /// Terrain noise
    pub const NOISE_OCTAVES: u32 = 8;
    pub const NOISE_BIAS: f32 = 2.0;

    /// Unit defaults
    pub const UNIT_RADIUS: f32 = 3.5;
    pub const UNIT_FRICTION: f32 = 0.2;

    /// Missile defaults
    pub const MISSILE_RADIUS: f32 = 2.5;
    pub const MISSILE_FRICTION: f32 = 0.5;
    pub const MISSILE_BLAST_RADIUS: f32 = 20.0;
    /// Launch speed at full charge
    pub const MISSILE_MAX_SPEED: f32 = 40.0;

    /// Debris defaults
    pub const DEBRIS_RADIUS: f32 = 1.0;
    pub const DEBRIS_FRICTION: f32 = 0.8;
    pub const DEBRIS_BOUNCES: u32 = 5;
    pub const DEBRIS_SPEED: f32 = 10.0;

    /// Shockwave damage at the epicenter
    pub const SHOCKWAVE_DAMAGE: f32 = 0.8;
    /// Floor for epicenter distance when normalizing the push direction
    pub const SHOCKWAVE_MIN_DISTANCE: f32 = 0.0001;

    /// Turn length in seconds
    pub const TURN_TIME: f32 = 15.0;
    /// Aim rotation rate (radians/s)
    pub const AIM_RATE: f32 = 1.0;
    /// Charge rate (energy/s), energy saturates at 1.0
    pub const CHARGE_RATE: f32 = 0.75;
    /// Jump impulse scale
    pub const JUMP_SPEED_X: f32 = 4.0;
    pub const JUMP_SPEED_Y: f32 = 8.0;

    /// Game-over volley size
    pub const BARRAGE_MISSILES: usize = 100;
    pub const BARRAGE_FALL_SPEED: f32 = 0.5;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector pointing along `angle` (screen space, y down)
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Heading of a velocity vector, 0 when at rest
#[inline]
pub fn heading(vel: Vec2) -> f32 {
    vel.y.atan2(vel.x)
}
