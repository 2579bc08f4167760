//! Scripted opponent
//!
//! A small per-turn state machine that emits the same [`Controls`] a human
//! would. [`evaluate`] is pure apart from the RNG: it reads an
//! [`OpponentContext`] snapshot and returns the next state plus the controls
//! for this frame.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use super::ballistics;
use super::body::BodyId;
use super::control::Controls;
use crate::consts::{AIM_RATE, GRAVITY};

/// Launch speed assumed when solving for a firing angle
pub const SOLVER_SPEED: f32 = 30.0;
/// Charge the opponent fires at
pub const SHOT_ENERGY: f32 = 0.75;
/// Aim counts as on target within this many radians
pub const AIM_TOLERANCE: f32 = 0.001;
/// Horizontal distance at which a move target counts as reached
pub const ARRIVAL_TOLERANCE: f32 = 5.0;
/// Repositioning stops once less turn time than this is left
pub const MOVE_TIME_CUTOFF: f32 = 8.0;
/// Closing in on a target stops once less turn time than this is left
pub const APPROACH_TIME_CUTOFF: f32 = 5.0;
/// Teammates closer than this are too close for the defensive strategy
pub const CROWD_DISTANCE: f32 = 50.0;
/// How far a defensive unit backs away from a crowding teammate
pub const RETREAT_DISTANCE: f32 = 80.0;
/// How far an offensive unit advances toward the map center
pub const ADVANCE_DISTANCE: f32 = 200.0;
/// Move targets stay this far from the map edges
pub const EDGE_MARGIN: f32 = 20.0;

/// Hop angles used while repositioning
const MOVE_HOP_LEFT: f32 = -0.6 * PI;
const MOVE_HOP_RIGHT: f32 = -0.04 * PI;
/// Hop angles used while closing in on a target
const APPROACH_HOP_LEFT: f32 = -0.6 * PI;
const APPROACH_HOP_RIGHT: f32 = -0.4 * PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OpponentState {
    #[default]
    AssessEnvironment,
    Move,
    ChooseTarget,
    PositionForTarget,
    Aim,
    Fire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Keep away from teammates so one blast can't hit several
    Defensive,
    /// Advance toward the middle of the map
    Offensive,
    /// Stay put
    Neutral,
}

/// What the opponent has decided so far this turn
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OpponentPlan {
    pub strategy: Option<Strategy>,
    /// Horizontal position to move to before shooting
    pub safe_x: f32,
    pub target: Option<BodyId>,
    pub target_pos: Vec2,
    pub target_angle: f32,
    pub target_energy: f32,
}

/// A unit as the opponent sees it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitSight {
    pub id: BodyId,
    pub pos: Vec2,
    pub health: f32,
}

/// A team as the opponent sees it. Members include graves.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSight {
    pub alive: bool,
    pub members: Vec<UnitSight>,
}

/// Everything the opponent may look at this frame
#[derive(Debug, Clone)]
pub struct OpponentContext<'a> {
    pub state: OpponentState,
    pub plan: OpponentPlan,
    /// The unit being played
    pub unit: UnitSight,
    pub aim_angle: f32,
    pub team: usize,
    /// All teams, indexed like the match roster
    pub teams: &'a [TeamSight],
    /// Every body was at rest at the end of the last frame
    pub settled: bool,
    pub turn_time: f32,
    pub energy: f32,
    pub charging: bool,
    /// A shot left the barrel this turn
    pub has_fired: bool,
    pub dt: f32,
    pub map_width: f32,
}

/// Result of one evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct OpponentUpdate {
    pub next: OpponentState,
    pub plan: OpponentPlan,
    pub controls: Controls,
    /// Overwrite the unit's aim angle before controls apply (used to point
    /// hops)
    pub set_aim: Option<f32>,
}

impl OpponentUpdate {
    fn stay(ctx: &OpponentContext) -> Self {
        Self {
            next: ctx.state,
            plan: ctx.plan,
            controls: Controls::default(),
            set_aim: None,
        }
    }

    fn goto(mut self, next: OpponentState) -> Self {
        self.next = next;
        self
    }

    fn hop(mut self, angle: f32) -> Self {
        self.set_aim = Some(angle);
        self.controls.jump = true;
        self
    }
}

/// Run one frame of the opponent state machine
pub fn evaluate(ctx: &OpponentContext, rng: &mut impl Rng) -> OpponentUpdate {
    match ctx.state {
        OpponentState::AssessEnvironment => assess(ctx, rng),
        OpponentState::Move => advance_to_safe_spot(ctx),
        OpponentState::ChooseTarget => choose_target(ctx, rng),
        OpponentState::PositionForTarget => position_for_target(ctx),
        OpponentState::Aim => aim(ctx),
        OpponentState::Fire => fire(ctx),
    }
}

fn assess(ctx: &OpponentContext, rng: &mut impl Rng) -> OpponentUpdate {
    let strategy = match rng.random_range(0..3) {
        0 => Strategy::Defensive,
        1 => Strategy::Offensive,
        _ => Strategy::Neutral,
    };

    let x = ctx.unit.pos.x;
    let safe_x = match strategy {
        Strategy::Defensive => {
            let nearest = ctx
                .teams
                .get(ctx.team)
                .into_iter()
                .flat_map(|t| t.members.iter())
                .filter(|m| m.id != ctx.unit.id)
                .min_by(|a, b| (a.pos.x - x).abs().total_cmp(&(b.pos.x - x).abs()));

            match nearest {
                Some(mate) if (mate.pos.x - x).abs() < CROWD_DISTANCE => {
                    let away = if mate.pos.x - x < 0.0 { 1.0 } else { -1.0 };
                    x + away * RETREAT_DISTANCE
                }
                _ => x,
            }
        }
        Strategy::Offensive => {
            let toward = if ctx.map_width / 2.0 - x < 0.0 { -1.0 } else { 1.0 };
            x + toward * ADVANCE_DISTANCE
        }
        Strategy::Neutral => x,
    };

    let mut update = OpponentUpdate::stay(ctx).goto(OpponentState::Move);
    update.plan.strategy = Some(strategy);
    update.plan.safe_x = safe_x.clamp(EDGE_MARGIN, ctx.map_width - EDGE_MARGIN);
    log::debug!("Opponent strategy {:?}, safe x {:.1}", strategy, update.plan.safe_x);
    update
}

fn advance_to_safe_spot(ctx: &OpponentContext) -> OpponentUpdate {
    let update = OpponentUpdate::stay(ctx);
    let remaining = ctx.plan.safe_x - ctx.unit.pos.x;

    if ctx.turn_time < MOVE_TIME_CUTOFF || remaining.abs() <= ARRIVAL_TOLERANCE {
        return update.goto(OpponentState::ChooseTarget);
    }
    if !ctx.settled {
        return update;
    }
    if remaining < 0.0 {
        update.hop(MOVE_HOP_LEFT)
    } else {
        update.hop(MOVE_HOP_RIGHT)
    }
}

fn choose_target(ctx: &OpponentContext, rng: &mut impl Rng) -> OpponentUpdate {
    let candidates: Vec<&TeamSight> = ctx
        .teams
        .iter()
        .enumerate()
        .filter(|&(index, team)| index != ctx.team && team.alive && !team.members.is_empty())
        .map(|(_, team)| team)
        .collect();

    let mut update = OpponentUpdate::stay(ctx);
    if candidates.is_empty() {
        update.plan.target = None;
        return hold_fire_at_current_aim(ctx, update);
    }

    let team = candidates[rng.random_range(0..candidates.len())];
    let mut chosen = team.members[0];
    for member in &team.members[1..] {
        if member.health > chosen.health {
            chosen = *member;
        }
    }

    update.plan.target = Some(chosen.id);
    update.plan.target_pos = chosen.pos;
    update.goto(OpponentState::PositionForTarget)
}

fn position_for_target(ctx: &OpponentContext) -> OpponentUpdate {
    let mut update = OpponentUpdate::stay(ctx);
    let offset = ctx.plan.target_pos - ctx.unit.pos;

    if let Some(solution) = ballistics::solve(offset, SOLVER_SPEED, GRAVITY) {
        update.plan.target_angle = solution.high;
        update.plan.target_energy = SHOT_ENERGY;
        return update.goto(OpponentState::Aim);
    }

    if ctx.turn_time < APPROACH_TIME_CUTOFF {
        return hold_fire_at_current_aim(ctx, update);
    }
    if !ctx.settled || offset.x == 0.0 {
        return update;
    }
    if offset.x < 0.0 {
        update.hop(APPROACH_HOP_LEFT)
    } else {
        update.hop(APPROACH_HOP_RIGHT)
    }
}

/// Out of options: shoot wherever the unit is already pointing
fn hold_fire_at_current_aim(ctx: &OpponentContext, mut update: OpponentUpdate) -> OpponentUpdate {
    update.plan.target_angle = ctx.aim_angle;
    update.plan.target_energy = SHOT_ENERGY;
    update.goto(OpponentState::Aim)
}

fn aim(ctx: &OpponentContext) -> OpponentUpdate {
    let mut update = OpponentUpdate::stay(ctx);
    let diff = ctx.plan.target_angle - ctx.aim_angle;
    if diff.abs() <= AIM_TOLERANCE {
        return update.goto(OpponentState::Fire);
    }

    // Scale the axis down on the last step so the turn lands on target
    let full_step = AIM_RATE * ctx.dt;
    let strength = if full_step > 0.0 {
        (diff.abs() / full_step).min(1.0)
    } else {
        1.0
    };

    update.controls.aim = diff.signum() * strength;
    update
}

/// Charge to the planned energy and release. Stays in Fire until the shot
/// has left the barrel.
fn fire(ctx: &OpponentContext) -> OpponentUpdate {
    let mut update = OpponentUpdate::stay(ctx);
    if ctx.has_fired {
        update.next = OpponentState::AssessEnvironment;
    } else if !ctx.charging {
        update.controls.charge_pressed = true;
        update.controls.charge_held = true;
    } else if ctx.energy >= ctx.plan.target_energy {
        update.controls.charge_released = true;
    } else {
        update.controls.charge_held = true;
    }
    update
}
