//! Explosions: crater carving, shockwave and debris

use glam::Vec2;
use rand::Rng;

use super::body::{Bodies, BodyId};
use super::terrain::Terrain;
use crate::consts::{SHOCKWAVE_DAMAGE, SHOCKWAVE_MIN_DISTANCE};

/// An explosion requested by a body's bounce-death action
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detonation {
    /// Body that exploded
    pub source: BodyId,
    /// Epicenter (the body's last committed position)
    pub center: Vec2,
    pub radius: f32,
}

/// Damage dealt at `distance` from the epicenter of a blast of `radius`.
/// Falls off linearly and is zero at or beyond the blast radius.
pub fn shockwave_damage(distance: f32, radius: f32) -> f32 {
    if distance >= radius {
        0.0
    } else {
        (radius - distance) / radius * SHOCKWAVE_DAMAGE
    }
}

/// Carve the crater, push and damage nearby bodies, then spawn debris.
///
/// Bodies inside the blast get their velocity replaced by the outward
/// direction scaled by the blast radius and are marked unstable. One debris
/// fragment is spawned per whole unit of radius.
pub fn detonate(
    terrain: &mut Terrain,
    bodies: &mut Bodies,
    center: Vec2,
    radius: f32,
    rng: &mut impl Rng,
) {
    terrain.carve_crater(center, radius);

    for body in bodies.iter_mut() {
        let offset = body.pos - center;
        let distance = offset.length();
        if distance >= radius {
            continue;
        }

        let push_dir = offset / distance.max(SHOCKWAVE_MIN_DISTANCE);
        body.vel = push_dir * radius;
        body.apply_damage(shockwave_damage(distance, radius));
        body.stable = false;
    }

    for _ in 0..radius as usize {
        bodies.spawn_debris(center, rng);
    }
}
