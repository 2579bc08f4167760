//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed and the same inputs a
//! match plays out identically:
//! - One seeded RNG, owned by the game state
//! - Bodies update in spawn order
//! - No rendering or platform dependencies

pub mod ballistics;
pub mod body;
pub mod collision;
pub mod control;
pub mod error;
pub mod explosion;
pub mod opponent;
pub mod physics;
pub mod snapshot;
pub mod state;
pub mod team;
pub mod terrain;
pub mod terrain_gen;
pub mod tick;

pub use ballistics::{FiringSolution, solve};
pub use body::{Bodies, Body, BodyId, BodyKind, Unit};
pub use collision::{CollisionResult, probe_terrain};
pub use control::{ChargeMeter, Controls};
pub use error::SimError;
pub use explosion::{Detonation, detonate};
pub use opponent::{OpponentPlan, OpponentState, Strategy};
pub use physics::{FrameReport, step_frame};
pub use snapshot::FrameSnapshot;
pub use state::{ControlMode, GamePhase, GameState};
pub use team::{Rotation, Team, rotate};
pub use terrain::Terrain;
pub use terrain_gen::generate_terrain;
pub use tick::{TickInput, tick};
