//! Match setup
//!
//! Read from an optional JSON file; anything missing takes its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{MAP_WIDTH, UNIT_RADIUS};
use crate::sim::SimError;

/// Match settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    /// RNG seed; `None` lets the runner pick one
    pub seed: Option<u64>,
    pub team_count: usize,
    pub units_per_team: usize,
    /// Teams driven by player input; every other team is scripted
    pub player_teams: Vec<usize>,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            seed: None,
            team_count: 4,
            units_per_team: 3,
            player_teams: vec![0],
        }
    }
}

impl MatchSettings {
    /// Parse settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        serde_json::from_str(json).map_err(|e| SimError::InvalidSettings {
            reason: e.to_string(),
        })
    }

    /// Load settings from a JSON file, falling back to defaults when the
    /// file can't be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read settings {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Check the roster fits the map and player teams exist
    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |reason: String| Err(SimError::InvalidSettings { reason });

        if self.team_count < 2 {
            return invalid(format!("need at least 2 teams, got {}", self.team_count));
        }
        if self.units_per_team == 0 {
            return invalid("need at least 1 unit per team".to_string());
        }
        if let Some(&team) = self.player_teams.iter().find(|&&t| t >= self.team_count) {
            return invalid(format!(
                "player team {} out of range for {} teams",
                team, self.team_count
            ));
        }

        let spacing = MAP_WIDTH as f32 / (self.team_count * self.units_per_team * 2) as f32;
        if spacing < UNIT_RADIUS * 2.0 {
            return invalid(format!(
                "{} teams of {} units don't fit on the map",
                self.team_count, self.units_per_team
            ));
        }
        Ok(())
    }

    /// Same settings with every team scripted
    pub fn without_players(mut self) -> Self {
        self.player_teams.clear();
        self
    }
}
