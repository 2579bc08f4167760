//! Per-frame simulation tick
//!
//! Frame order: view toggle, phase logic, control source, turn clock,
//! controls, physics, stability, phase transition.

use glam::Vec2;
use rand::Rng;

use super::body::BodyId;
use super::control::{Controls, steer};
use super::opponent::{self, OpponentContext, OpponentState, TeamSight, UnitSight};
use super::physics;
use super::state::{ControlMode, GamePhase, GameState};
use super::team::{Rotation, Team, rotate};
use super::terrain_gen::generate_terrain;
use crate::consts::*;
use crate::direction;

/// Input signals for one frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub jump_pressed: bool,
    pub aim_left_held: bool,
    pub aim_right_held: bool,
    pub charge_pressed: bool,
    pub charge_held: bool,
    pub charge_released: bool,
    /// Flip the zoomed-out view hint
    pub view_toggle_released: bool,
}

/// Advance the match by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.view_toggle_released {
        state.zoomed_out = !state.zoomed_out;
    }

    state.next_phase = run_phase(state);

    let controls = match state.control {
        ControlMode::Player => Controls::from_input(input),
        ControlMode::Opponent => drive_opponent(state, dt),
        ControlMode::None => Controls::default(),
    };

    state.turn_time -= dt;

    apply_controls(state, &controls, dt);

    let report = physics::step_frame(&mut state.terrain, &mut state.bodies, dt, &mut state.rng);
    if let Some(target) = state.camera_target {
        if report.detonations.iter().any(|d| d.source == target) {
            state.camera_target = None;
        }
    }
    state.stable = report.stable;

    if state.next_phase != state.phase {
        log::debug!("Phase {:?} -> {:?}", state.phase, state.next_phase);
    }
    state.phase = state.next_phase;
    state.frame += 1;
}

/// Phase logic for this frame. Returns the phase for the next frame.
fn run_phase(state: &mut GameState) -> GamePhase {
    match state.phase {
        GamePhase::Reset => {
            state.control = ControlMode::None;
            state.stable = false;
            state.has_fired = false;
            state.show_countdown = false;
            state.charge.reset();
            state.bodies.clear();
            state.teams.clear();
            state.current_team = 0;
            state.controlled = None;
            state.camera_target = None;
            state.winner = None;
            GamePhase::GenerateTerrain
        }
        GamePhase::GenerateTerrain => {
            state.zoomed_out = false;
            state.show_countdown = false;
            state.stable = false;
            state.terrain = generate_terrain(MAP_WIDTH, MAP_HEIGHT, &mut state.rng);
            GamePhase::GeneratingTerrain
        }
        GamePhase::GeneratingTerrain => {
            state.show_countdown = false;
            if state.stable {
                GamePhase::AllocateUnits
            } else {
                GamePhase::GeneratingTerrain
            }
        }
        GamePhase::AllocateUnits => {
            allocate_units(state);
            GamePhase::AllocatingUnits
        }
        GamePhase::AllocatingUnits => {
            if !state.stable {
                return GamePhase::AllocatingUnits;
            }
            match state.controlled {
                Some(unit) => {
                    let team = state.current_team;
                    begin_turn(state, team, unit);
                    GamePhase::StartPlay
                }
                None => {
                    log::warn!("No unit to start the match with");
                    GamePhase::GameOverBarrage
                }
            }
        }
        GamePhase::StartPlay => {
            state.show_countdown = true;
            if state.has_fired || state.turn_time <= 0.0 {
                GamePhase::CameraMode
            } else {
                GamePhase::StartPlay
            }
        }
        GamePhase::CameraMode => {
            state.control = ControlMode::None;
            state.has_fired = false;
            state.show_countdown = false;
            state.charge.reset();
            if state.stable {
                end_turn(state)
            } else {
                GamePhase::CameraMode
            }
        }
        GamePhase::GameOverBarrage => {
            state.control = ControlMode::None;
            state.show_countdown = false;
            state.zoomed_out = true;
            launch_barrage(state);
            GamePhase::GameOverSettle
        }
        GamePhase::GameOverSettle => {
            state.control = ControlMode::None;
            GamePhase::GameOverSettle
        }
    }
}

/// Drop every team onto the map, evenly spaced, each centered in its own
/// slice of the width
fn allocate_units(state: &mut GameState) {
    let team_count = state.settings.team_count;
    let per_team = state.settings.units_per_team;
    let width = state.terrain.width() as f32;

    let space_per_team = width / team_count as f32;
    let space_per_unit = space_per_team / (per_team as f32 * 2.0);

    state.teams = (0..team_count)
        .map(|t| {
            let middle = space_per_team / 2.0 + t as f32 * space_per_team;
            let first = middle - space_per_unit * per_team as f32 / 2.0;
            let members = (0..per_team)
                .map(|w| {
                    let x = first + w as f32 * space_per_unit;
                    state.bodies.spawn_unit(Vec2::new(x, 0.0), t)
                })
                .collect();
            Team::new(members)
        })
        .collect();

    state.current_team = 0;
    state.controlled = state.teams.first().and_then(Team::current_member);
    state.camera_target = state.controlled;
    state.stable = false;
    log::info!("Allocated {} teams of {} units", team_count, per_team);
}

/// Hand control of `unit` to `team` for a fresh turn
fn begin_turn(state: &mut GameState, team: usize, unit: BodyId) {
    state.current_team = team;
    state.controlled = Some(unit);
    state.camera_target = Some(unit);
    state.turn_time = TURN_TIME;
    state.zoomed_out = false;
    state.charge.reset();
    state.control = if state.is_player_team(team) {
        ControlMode::Player
    } else {
        ControlMode::Opponent
    };
    state.opponent = OpponentState::AssessEnvironment;
    state.plan = Default::default();
    log::info!("Turn to team {} ({:?})", team, state.control);
}

/// Rotate to the next team, or decide the match
fn end_turn(state: &mut GameState) -> GamePhase {
    match rotate(&mut state.teams, state.current_team, &state.bodies) {
        Ok(Rotation::Next { team, unit }) => {
            begin_turn(state, team, unit);
            GamePhase::StartPlay
        }
        Ok(Rotation::LastTeamStanding { team }) => {
            state.winner = Some(team);
            state.controlled = None;
            log::info!("Game over, team {} wins", team);
            GamePhase::GameOverBarrage
        }
        Err(e) => {
            state.winner = None;
            state.controlled = None;
            log::warn!("Game over without a winner: {}", e);
            GamePhase::GameOverBarrage
        }
    }
}

fn launch_barrage(state: &mut GameState) {
    let width = state.terrain.width();
    let half_height = (state.terrain.height() / 2).max(1);
    for _ in 0..BARRAGE_MISSILES {
        let x = state.rng.random_range(0..width) as f32;
        let y = state.rng.random_range(0..half_height) as f32;
        state
            .bodies
            .spawn_missile(Vec2::new(x, y), Vec2::new(0.0, BARRAGE_FALL_SPEED));
    }
}

/// Run the opponent state machine for the controlled unit
fn drive_opponent(state: &mut GameState, dt: f32) -> Controls {
    let Some(id) = state.controlled else {
        return Controls::default();
    };
    let Some((pos, aim_angle)) = state
        .bodies
        .get(id)
        .and_then(|b| b.unit().map(|u| (b.pos, u.aim_angle)))
    else {
        return Controls::default();
    };

    let sights: Vec<TeamSight> = state
        .teams
        .iter()
        .map(|team| TeamSight {
            alive: team.is_alive(&state.bodies),
            members: team
                .members
                .iter()
                .filter_map(|&member| {
                    state.bodies.get(member).map(|b| UnitSight {
                        id: member,
                        pos: b.pos,
                        health: b.health(),
                    })
                })
                .collect(),
        })
        .collect();

    let ctx = OpponentContext {
        state: state.opponent,
        plan: state.plan,
        unit: UnitSight {
            id,
            pos,
            health: state.bodies.health_of(id),
        },
        aim_angle,
        team: state.current_team,
        teams: &sights,
        settled: state.stable,
        turn_time: state.turn_time,
        energy: state.charge.energy,
        charging: state.charge.charging,
        has_fired: state.has_fired,
        dt,
        map_width: state.terrain.width() as f32,
    };

    let update = opponent::evaluate(&ctx, &mut state.rng);
    if update.next != state.opponent {
        log::debug!("Opponent {:?} -> {:?}", state.opponent, update.next);
    }
    if let Some(angle) = update.set_aim {
        if let Some(unit) = state.bodies.get_mut(id).and_then(|b| b.unit_mut()) {
            unit.aim_angle = angle;
        }
    }
    state.opponent = update.next;
    state.plan = update.plan;
    update.controls
}

/// Steer and charge the controlled unit. Controls only act on a unit at rest.
fn apply_controls(state: &mut GameState, controls: &Controls, dt: f32) {
    if state.control == ControlMode::None {
        return;
    }
    let Some(id) = state.controlled else {
        return;
    };
    let Some(body) = state.bodies.get_mut(id) else {
        return;
    };
    if !body.stable {
        return;
    }

    steer(body, controls, dt);
    let origin = body.pos;
    let Some(aim_angle) = body.unit().map(|u| u.aim_angle) else {
        return;
    };

    if let Some(energy) = state.charge.update(controls, dt) {
        fire_missile(state, origin, aim_angle, energy);
    }
}

fn fire_missile(state: &mut GameState, origin: Vec2, angle: f32, energy: f32) {
    let vel = direction(angle) * MISSILE_MAX_SPEED * energy;
    let missile = state.bodies.spawn_missile(origin, vel);
    state.camera_target = Some(missile);
    state.has_fired = true;
    state.control = ControlMode::None;
    if state.rng.random_bool(0.5) {
        state.zoomed_out = true;
    }
    log::debug!(
        "Team {} fired at {:.3} rad with energy {:.2}",
        state.current_team,
        angle,
        energy
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::BodyKind;
    use crate::sim::control::ChargeMeter;
    use crate::sim::terrain::{SOLID, Terrain};

    const DT: f32 = 1.0 / 60.0;

    fn idle() -> TickInput {
        TickInput::default()
    }

    /// Flat ground at row 400 across the whole map
    fn flat_terrain() -> Terrain {
        let mut terrain = Terrain::new(MAP_WIDTH, MAP_HEIGHT);
        for y in 400..MAP_HEIGHT {
            for x in 0..MAP_WIDTH {
                terrain.set(x, y, SOLID);
            }
        }
        terrain
    }

    /// A state mid-turn with team 0's first unit resting on flat ground
    fn resting_turn(player: bool) -> GameState {
        let mut state = GameState::new(3);
        state.terrain = flat_terrain();
        state.phase = GamePhase::AllocateUnits;
        state.next_phase = GamePhase::AllocateUnits;
        allocate_units(&mut state);
        for body in state.bodies.iter_mut() {
            body.pos.y = 400.0 - body.radius - 0.5;
            body.stable = true;
        }
        state.stable = true;
        let unit = state.controlled.unwrap();
        if !player {
            state.settings.player_teams.clear();
        }
        begin_turn(&mut state, 0, unit);
        state.phase = GamePhase::StartPlay;
        state
    }

    #[test]
    fn test_reset_reaches_allocation() {
        let mut state = GameState::new(7);
        tick(&mut state, &idle(), DT);
        assert_eq!(state.phase, GamePhase::GenerateTerrain);
        tick(&mut state, &idle(), DT);
        assert_eq!(state.phase, GamePhase::GeneratingTerrain);
        // Nothing is moving yet, so the world is stable
        tick(&mut state, &idle(), DT);
        assert_eq!(state.phase, GamePhase::AllocateUnits);
        tick(&mut state, &idle(), DT);
        assert_eq!(state.phase, GamePhase::AllocatingUnits);
        assert_eq!(state.teams.len(), 4);
        assert_eq!(state.bodies.len(), 12);
    }

    #[test]
    fn test_allocation_layout() {
        let mut state = GameState::new(1);
        allocate_units(&mut state);

        // Team slices of 256, unit spacing 256 / 6
        let spacing = 256.0 / 6.0;
        let first = state.bodies.get(state.teams[0].members[0]).unwrap();
        assert!((first.pos.x - (128.0 - spacing * 1.5)).abs() < 1e-3);
        assert_eq!(first.pos.y, 0.0);

        let last = state.bodies.get(state.teams[3].members[2]).unwrap();
        assert!((last.pos.x - (896.0 - spacing * 1.5 + 2.0 * spacing)).abs() < 1e-3);

        assert_eq!(state.controlled, Some(state.teams[0].members[0]));
        assert_eq!(state.camera_target, state.controlled);
    }

    #[test]
    fn test_turn_clock_expires_into_camera_mode() {
        let mut state = resting_turn(true);
        state.turn_time = 0.01;

        tick(&mut state, &idle(), DT);
        assert!(state.turn_time <= 0.0);
        assert_eq!(state.phase, GamePhase::StartPlay);
        tick(&mut state, &idle(), DT);
        assert_eq!(state.phase, GamePhase::CameraMode);
    }

    #[test]
    fn test_player_fire_spawns_missile() {
        let mut state = resting_turn(true);
        let unit = state.controlled.unwrap();
        state
            .bodies
            .get_mut(unit)
            .unwrap()
            .unit_mut()
            .unwrap()
            .aim_angle = -std::f32::consts::FRAC_PI_2;

        let press = TickInput {
            charge_pressed: true,
            charge_held: true,
            ..Default::default()
        };
        tick(&mut state, &press, DT);
        assert!(state.charge.charging);
        // Physics woke the unit up; put it back at rest
        state.bodies.get_mut(unit).unwrap().stable = true;

        let release = TickInput {
            charge_released: true,
            ..Default::default()
        };
        tick(&mut state, &release, DT);

        assert!(state.has_fired);
        assert_eq!(state.control, ControlMode::None);
        let missile = state.camera_target.unwrap();
        assert_ne!(missile, unit);
        let body = state.bodies.get(missile).unwrap();
        assert_eq!(body.kind, BodyKind::Missile);
        assert!(body.vel.y < 0.0);

        tick(&mut state, &idle(), DT);
        assert_eq!(state.phase, GamePhase::CameraMode);
    }

    #[test]
    fn test_detonated_missile_releases_camera() {
        let mut state = resting_turn(true);
        let missile = state
            .bodies
            .spawn_missile(Vec2::new(600.0, 396.5), Vec2::new(0.0, 60.0));
        state.camera_target = Some(missile);

        tick(&mut state, &idle(), DT);

        assert!(!state.bodies.contains(missile));
        assert_eq!(state.camera_target, None);
        assert!(state.bodies.iter().any(|b| b.kind == BodyKind::Debris));
    }

    #[test]
    fn test_controls_ignored_while_airborne() {
        let mut state = resting_turn(true);
        let unit = state.controlled.unwrap();
        state.bodies.get_mut(unit).unwrap().stable = false;

        let jump = TickInput {
            jump_pressed: true,
            aim_right_held: true,
            ..Default::default()
        };
        apply_controls(&mut state, &Controls::from_input(&jump), DT);

        let body = state.bodies.get(unit).unwrap();
        assert_eq!(body.vel, Vec2::ZERO);
        assert_eq!(body.unit().unwrap().aim_angle, 0.0);
    }

    #[test]
    fn test_opponent_turn_starts_assessing() {
        let mut state = resting_turn(false);
        assert_eq!(state.control, ControlMode::Opponent);

        tick(&mut state, &idle(), DT);
        assert_eq!(state.opponent, OpponentState::Move);
        assert!(state.plan.strategy.is_some());
    }

    #[test]
    fn test_opponent_release_waits_for_unit_to_settle() {
        let mut state = resting_turn(false);
        let unit = state.controlled.unwrap();
        state.opponent = OpponentState::Fire;
        state.plan.target_energy = 0.75;
        state.charge = ChargeMeter {
            charging: true,
            energy: 0.8,
        };
        state.bodies.get_mut(unit).unwrap().stable = false;

        // Release is dropped while the unit is moving
        tick(&mut state, &idle(), DT);
        assert!(!state.has_fired);
        assert!(state.charge.charging);
        assert_eq!(state.opponent, OpponentState::Fire);
        assert_eq!(state.control, ControlMode::Opponent);

        let body = state.bodies.get_mut(unit).unwrap();
        body.vel = Vec2::ZERO;
        body.stable = true;

        tick(&mut state, &idle(), DT);
        assert!(state.has_fired);
        assert_eq!(state.bodies.len(), 13);
    }

    #[test]
    fn test_rotation_after_settled_camera_mode() {
        let mut state = resting_turn(true);
        state.phase = GamePhase::CameraMode;

        tick(&mut state, &idle(), DT);

        assert_eq!(state.phase, GamePhase::StartPlay);
        assert_eq!(state.current_team, 1);
        assert_eq!(state.controlled, Some(state.teams[1].members[1]));
        assert_eq!(state.control, ControlMode::Opponent);
        assert_eq!(state.turn_time, TURN_TIME - DT);
    }

    #[test]
    fn test_last_team_standing_triggers_barrage() {
        let mut state = resting_turn(true);
        for team in 1..4 {
            for id in state.teams[team].members.clone() {
                state.bodies.get_mut(id).unwrap().apply_damage(1.0);
            }
        }
        state.phase = GamePhase::CameraMode;

        tick(&mut state, &idle(), DT);
        assert_eq!(state.phase, GamePhase::GameOverBarrage);
        assert_eq!(state.winner, Some(0));

        let before = state.bodies.len();
        tick(&mut state, &idle(), DT);
        assert_eq!(state.phase, GamePhase::GameOverSettle);
        assert!(state.zoomed_out);
        let missiles = state
            .bodies
            .iter()
            .filter(|b| b.kind == BodyKind::Missile)
            .count();
        assert!(missiles <= BARRAGE_MISSILES);
        assert!(state.bodies.len() > before);
        assert!(state.is_over());
    }

    #[test]
    fn test_wiped_out_match_ends_without_winner() {
        let mut state = resting_turn(true);
        for team in &state.teams {
            for &id in &team.members {
                state.bodies.get_mut(id).unwrap().apply_damage(1.0);
            }
        }
        state.phase = GamePhase::CameraMode;

        tick(&mut state, &idle(), DT);
        assert_eq!(state.phase, GamePhase::GameOverBarrage);
        assert_eq!(state.winner, None);
    }

    #[test]
    fn test_view_toggle_flips_hint() {
        let mut state = resting_turn(true);
        let toggle = TickInput {
            view_toggle_released: true,
            ..Default::default()
        };
        tick(&mut state, &toggle, DT);
        assert!(state.zoomed_out);
        tick(&mut state, &toggle, DT);
        assert!(!state.zoomed_out);
    }
}
