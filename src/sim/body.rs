//! Physics bodies and the active-body set
//!
//! Every mobile object is a circle with the same motion/collision state.
//! Kind-specific behavior (what happens when the last bounce is spent, how
//! damage is taken) is dispatched on [`BodyKind`].

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::direction;

/// Stable identifier of a body. Ids are never reused, so an id held after
/// its body was purged simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// A team member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub team: usize,
    /// Health in [0, 1]
    pub health: f32,
    /// Aim/jump angle (radians, screen space)
    pub aim_angle: f32,
    /// False once health reaches zero (the unit stays on the map as a grave)
    pub playable: bool,
}

impl Unit {
    pub fn new(team: usize) -> Self {
        Self {
            team,
            health: 1.0,
            aim_angle: 0.0,
            playable: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Short-lived explosion fragment
    Debris,
    /// Projectile that explodes on first contact
    Missile,
    Unit(Unit),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    pub radius: f32,
    /// Fraction of reflected velocity kept after a bounce, in (0, 1]
    pub friction: f32,
    pub stable: bool,
    /// Terrain contacts left before death, `None` for unlimited
    pub bounces_left: Option<u32>,
    pub dead: bool,
    pub kind: BodyKind,
}

impl Body {
    fn with_kind(id: BodyId, pos: Vec2, kind: BodyKind) -> Self {
        let (radius, friction, bounces_left) = match kind {
            BodyKind::Debris => (DEBRIS_RADIUS, DEBRIS_FRICTION, Some(DEBRIS_BOUNCES)),
            BodyKind::Missile => (MISSILE_RADIUS, MISSILE_FRICTION, Some(1)),
            BodyKind::Unit(_) => (UNIT_RADIUS, UNIT_FRICTION, None),
        };
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            radius,
            friction,
            stable: false,
            bounces_left,
            dead: false,
            kind,
        }
    }

    /// Action run when the last bounce is spent. Returns the blast radius of
    /// the explosion to trigger, if any.
    pub fn on_bounce_death(&self) -> Option<f32> {
        match self.kind {
            BodyKind::Missile => Some(MISSILE_BLAST_RADIUS),
            BodyKind::Debris | BodyKind::Unit(_) => None,
        }
    }

    /// Apply damage. Returns whether the body is still alive afterwards;
    /// debris and missiles cannot be killed by damage.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        match &mut self.kind {
            BodyKind::Unit(unit) => {
                unit.health -= amount;
                if unit.health <= 0.0 {
                    unit.health = 0.0;
                    unit.playable = false;
                }
                unit.health > 0.0
            }
            BodyKind::Debris | BodyKind::Missile => true,
        }
    }

    pub fn unit(&self) -> Option<&Unit> {
        match &self.kind {
            BodyKind::Unit(unit) => Some(unit),
            _ => None,
        }
    }

    pub fn unit_mut(&mut self) -> Option<&mut Unit> {
        match &mut self.kind {
            BodyKind::Unit(unit) => Some(unit),
            _ => None,
        }
    }

    /// Health for units, 0 for everything else
    pub fn health(&self) -> f32 {
        self.unit().map_or(0.0, |u| u.health)
    }
}

/// The active-body set. Iteration order is spawn order; dead bodies are only
/// removed by [`Bodies::purge_dead`], which the integrator calls at sub-step
/// boundaries.
#[derive(Debug, Clone, Default)]
pub struct Bodies {
    items: Vec<Body>,
    next_id: u32,
}

impl Bodies {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self, pos: Vec2, kind: BodyKind) -> &mut Body {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.items.push(Body::with_kind(id, pos, kind));
        let last = self.items.len() - 1;
        &mut self.items[last]
    }

    pub fn spawn_unit(&mut self, pos: Vec2, team: usize) -> BodyId {
        self.allocate(pos, BodyKind::Unit(Unit::new(team))).id
    }

    pub fn spawn_missile(&mut self, pos: Vec2, vel: Vec2) -> BodyId {
        let body = self.allocate(pos, BodyKind::Missile);
        body.vel = vel;
        body.id
    }

    /// Spawn a debris fragment flying off in a random direction
    pub fn spawn_debris(&mut self, pos: Vec2, rng: &mut impl Rng) -> BodyId {
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let body = self.allocate(pos, BodyKind::Debris);
        body.vel = direction(angle) * DEBRIS_SPEED;
        body.id
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.items.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.items.iter_mut().find(|b| b.id == id)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Health of a unit by id; purged or non-unit bodies count as dead
    pub fn health_of(&self, id: BodyId) -> f32 {
        self.get(id).map_or(0.0, Body::health)
    }

    /// True when every body is at rest (vacuously true when empty)
    pub fn all_stable(&self) -> bool {
        self.items.iter().all(|b| b.stable)
    }

    /// Remove dead bodies, returning how many were dropped
    pub fn purge_dead(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|b| !b.dead);
        before - self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
