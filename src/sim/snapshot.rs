//! Read-only view of a frame for presentation layers

use glam::Vec2;
use serde::Serialize;

use super::body::{Body, BodyId, BodyKind};
use super::state::{GamePhase, GameState};
use crate::heading;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BodyTag {
    Debris,
    Missile,
    Unit,
}

/// Unit-only fields
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitView {
    pub team: usize,
    pub health: f32,
    pub aim_angle: f32,
    pub playable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyView {
    pub id: BodyId,
    pub kind: BodyTag,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Heading of the velocity
    pub orientation: f32,
    pub unit: Option<UnitView>,
}

impl From<&Body> for BodyView {
    fn from(body: &Body) -> Self {
        let (kind, unit) = match &body.kind {
            BodyKind::Debris => (BodyTag::Debris, None),
            BodyKind::Missile => (BodyTag::Missile, None),
            BodyKind::Unit(u) => (
                BodyTag::Unit,
                Some(UnitView {
                    team: u.team,
                    health: u.health,
                    aim_angle: u.aim_angle,
                    playable: u.playable,
                }),
            ),
        };
        Self {
            id: body.id,
            kind,
            pos: body.pos,
            vel: body.vel,
            radius: body.radius,
            orientation: heading(body.vel),
            unit,
        }
    }
}

/// Team health bar: `total / max` fills the bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TeamHealth {
    pub total: f32,
    pub max: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub phase: GamePhase,
    pub bodies: Vec<BodyView>,
    pub teams: Vec<TeamHealth>,
    pub current_team: usize,
    pub controlled: Option<BodyId>,
    pub turn_time: f32,
    pub show_countdown: bool,
    pub energy: f32,
    pub camera_target: Option<Vec2>,
    pub zoomed_out: bool,
    pub winner: Option<usize>,
}

impl FrameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            frame: state.frame,
            phase: state.phase,
            bodies: state.bodies.iter().map(BodyView::from).collect(),
            teams: state
                .teams
                .iter()
                .map(|t| TeamHealth {
                    total: t.total_health(&state.bodies),
                    max: t.size as f32,
                })
                .collect(),
            current_team: state.current_team,
            controlled: state.controlled,
            turn_time: state.turn_time,
            show_countdown: state.show_countdown,
            energy: state.charge.energy,
            camera_target: state
                .camera_target
                .and_then(|id| state.bodies.get(id))
                .map(|b| b.pos),
            zoomed_out: state.zoomed_out,
            winner: state.winner,
        }
    }
}
