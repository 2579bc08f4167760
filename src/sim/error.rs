//! Simulation error types
//!
//! The simulation clamps rather than fails wherever it can. These are the
//! conditions that cannot be clamped away and must be surfaced to the caller.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Turn rotation was asked for the next team while no team has a
    /// living member.
    NoLivingTeams,

    /// A team reported alive but no member with health > 0 was found.
    NoLivingMember {
        /// Index of the team that was searched.
        team: usize,
    },

    /// Match settings failed validation.
    InvalidSettings {
        /// Human-readable description of the rejected value.
        reason: String,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::NoLivingTeams => write!(f, "turn rotation found no team with a living member"),
            SimError::NoLivingMember { team } => {
                write!(f, "team {team} is alive but has no living member to control")
            }
            SimError::InvalidSettings { reason } => write!(f, "invalid match settings: {reason}"),
        }
    }
}

impl std::error::Error for SimError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_team() {
        let err = SimError::NoLivingMember { team: 2 };
        assert!(err.to_string().contains("team 2"));
    }
}
