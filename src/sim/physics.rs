//! Integration and collision step
//!
//! Each rendered frame runs a fixed number of sub-steps. A sub-step moves
//! every body under gravity, resolves terrain contact, resolves any
//! explosions the contacts triggered, and only then purges dead bodies.

use glam::Vec2;
use rand::Rng;

use super::body::{Bodies, Body};
use super::collision::{bounce, probe_terrain};
use super::explosion::{Detonation, detonate};
use super::terrain::Terrain;
use crate::consts::{GRAVITY, REST_SPEED, SUBSTEPS};

/// Outcome of one frame of physics
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    /// Every remaining body is at rest
    pub stable: bool,
    /// Explosions that happened this frame, in order
    pub detonations: Vec<Detonation>,
}

/// Advance one body by `dt`. Returns a detonation when the body spent its
/// last bounce and its death action asks for one.
pub fn integrate_body(body: &mut Body, terrain: &Terrain, dt: f32) -> Option<Detonation> {
    body.acc.y += GRAVITY;
    body.vel += body.acc * dt;
    let tentative = body.pos + body.vel * dt;
    body.acc = Vec2::ZERO;
    body.stable = false;

    // Rest check uses the pre-bounce speed
    let speed = body.vel.length();
    let contact = probe_terrain(terrain, tentative, body.vel, body.radius);
    let mut detonation = None;

    if contact.hit {
        body.stable = true;
        let normal = contact.normal(body.vel);
        body.vel = bounce(body.vel, normal, body.friction);

        if let Some(left) = body.bounces_left.as_mut() {
            *left = left.saturating_sub(1);
            if *left == 0 {
                body.dead = true;
                detonation = body.on_bounce_death().map(|radius| Detonation {
                    source: body.id,
                    center: body.pos,
                    radius,
                });
            }
        }
    } else {
        body.pos = tentative;
        // Dropped out through a hole in the bottom row
        if body.pos.y >= terrain.height() as f32 {
            body.dead = true;
        }
    }

    if speed < REST_SPEED {
        body.stable = true;
    }

    detonation
}

/// One sub-step over the whole body set
pub fn substep(
    terrain: &mut Terrain,
    bodies: &mut Bodies,
    dt: f32,
    rng: &mut impl Rng,
) -> Vec<Detonation> {
    let mut detonations = Vec::new();
    for body in bodies.iter_mut() {
        if let Some(d) = integrate_body(body, terrain, dt) {
            detonations.push(d);
        }
    }

    for d in &detonations {
        detonate(terrain, bodies, d.center, d.radius, rng);
    }

    bodies.purge_dead();
    detonations
}

/// Run every sub-step of a frame. Each sub-step advances by the frame's full
/// elapsed time.
pub fn step_frame(
    terrain: &mut Terrain,
    bodies: &mut Bodies,
    dt: f32,
    rng: &mut impl Rng,
) -> FrameReport {
    let mut report = FrameReport::default();
    for _ in 0..SUBSTEPS {
        report.detonations.extend(substep(terrain, bodies, dt, rng));
    }
    report.stable = bodies.all_stable();
    report
}
