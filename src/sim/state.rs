//! Game state and core simulation types
//!
//! Everything one match needs between frames lives in [`GameState`].

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Bodies, BodyId};
use super::control::ChargeMeter;
use super::error::SimError;
use super::opponent::{OpponentPlan, OpponentState};
use super::team::Team;
use super::terrain::Terrain;
use crate::consts::*;
use crate::settings::MatchSettings;

/// Match phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Clear everything for a fresh match
    Reset,
    /// Build a new heightfield
    GenerateTerrain,
    /// Wait for the world to settle
    GeneratingTerrain,
    /// Drop the teams onto the map
    AllocateUnits,
    /// Wait for the units to land
    AllocatingUnits,
    /// A turn is in progress
    StartPlay,
    /// Shot or time is up: wait for the world to settle, then rotate
    CameraMode,
    /// Match decided: rain missiles
    GameOverBarrage,
    /// Terminal
    GameOverSettle,
}

/// Who drives the controlled unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    None,
    Player,
    Opponent,
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Match seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub settings: MatchSettings,
    pub terrain: Terrain,
    pub bodies: Bodies,
    pub teams: Vec<Team>,
    pub current_team: usize,
    pub phase: GamePhase,
    /// Phase that takes effect at the end of the frame
    pub next_phase: GamePhase,
    pub control: ControlMode,
    /// Unit receiving controls
    pub controlled: Option<BodyId>,
    /// Body the camera follows
    pub camera_target: Option<BodyId>,
    pub charge: ChargeMeter,
    /// Seconds left in the current turn
    pub turn_time: f32,
    pub has_fired: bool,
    pub show_countdown: bool,
    pub zoomed_out: bool,
    /// Every body was at rest after the last physics step
    pub stable: bool,
    pub opponent: OpponentState,
    pub plan: OpponentPlan,
    /// Last team standing once the match is decided
    pub winner: Option<usize>,
    /// Frames ticked so far
    pub frame: u64,
}

impl GameState {
    /// New match with default settings
    pub fn new(seed: u64) -> Self {
        Self::build(MatchSettings::default(), seed)
    }

    /// New match with validated settings
    pub fn with_settings(settings: MatchSettings, seed: u64) -> Result<Self, SimError> {
        settings.validate()?;
        Ok(Self::build(settings, seed))
    }

    fn build(settings: MatchSettings, seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings,
            terrain: Terrain::new(MAP_WIDTH, MAP_HEIGHT),
            bodies: Bodies::new(),
            teams: Vec::new(),
            current_team: 0,
            phase: GamePhase::Reset,
            next_phase: GamePhase::Reset,
            control: ControlMode::None,
            controlled: None,
            camera_target: None,
            charge: ChargeMeter::default(),
            turn_time: 0.0,
            has_fired: false,
            show_countdown: false,
            zoomed_out: false,
            stable: false,
            opponent: OpponentState::AssessEnvironment,
            plan: OpponentPlan::default(),
            winner: None,
            frame: 0,
        }
    }

    /// Whether `team` is driven by a human
    pub fn is_player_team(&self, team: usize) -> bool {
        self.settings.player_teams.contains(&team)
    }

    /// Team health bar value: summed health over roster size, in [0, 1]
    pub fn team_health(&self, team: usize) -> f32 {
        self.teams.get(team).map_or(0.0, |t| {
            if t.size == 0 {
                0.0
            } else {
                t.total_health(&self.bodies) / t.size as f32
            }
        })
    }

    /// Number of teams with a living member
    pub fn living_teams(&self) -> usize {
        self.teams.iter().filter(|t| t.is_alive(&self.bodies)).count()
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOverSettle
    }
}
