//! Teams and turn rotation

use serde::{Deserialize, Serialize};

use super::body::{Bodies, BodyId};
use super::error::SimError;

/// An ordered roster of units with a rotating "current member" cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub members: Vec<BodyId>,
    pub current: usize,
    /// Roster size at allocation, the denominator of the team health bar
    pub size: usize,
}

impl Team {
    pub fn new(members: Vec<BodyId>) -> Self {
        let size = members.len();
        Self {
            members,
            current: 0,
            size,
        }
    }

    /// A team is alive while any member has health left
    pub fn is_alive(&self, bodies: &Bodies) -> bool {
        self.members.iter().any(|&id| bodies.health_of(id) > 0.0)
    }

    /// Member under the cursor
    pub fn current_member(&self) -> Option<BodyId> {
        self.members.get(self.current).copied()
    }

    /// Advance the cursor (wrapping) to the next member with health left.
    /// Returns `None` when nobody on the roster is alive.
    pub fn next_member(&mut self, bodies: &Bodies) -> Option<BodyId> {
        if self.members.is_empty() || !self.is_alive(bodies) {
            return None;
        }
        loop {
            self.current = (self.current + 1) % self.members.len();
            let id = self.members[self.current];
            if bodies.health_of(id) > 0.0 {
                return Some(id);
            }
        }
    }

    /// Summed member health
    pub fn total_health(&self, bodies: &Bodies) -> f32 {
        self.members.iter().map(|&id| bodies.health_of(id)).sum()
    }
}

/// Where turn rotation landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// Hand control to `unit` of `team`
    Next { team: usize, unit: BodyId },
    /// The search came back to the team that just played: it is the only
    /// one left
    LastTeamStanding { team: usize },
}

/// Advance from `current` to the next living team (wrapping), then to that
/// team's next living member.
pub fn rotate(teams: &mut [Team], current: usize, bodies: &Bodies) -> Result<Rotation, SimError> {
    if !teams.iter().any(|t| t.is_alive(bodies)) {
        return Err(SimError::NoLivingTeams);
    }

    let count = teams.len();
    let mut next = current % count;
    loop {
        next = (next + 1) % count;
        if teams[next].is_alive(bodies) {
            break;
        }
    }

    if next == current {
        return Ok(Rotation::LastTeamStanding { team: next });
    }

    let unit = teams[next]
        .next_member(bodies)
        .ok_or(SimError::NoLivingMember { team: next })?;
    Ok(Rotation::Next { team: next, unit })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    /// `teams` rosters of `size` units each, all at full health
    fn setup(teams: usize, size: usize) -> (Bodies, Vec<Team>) {
        let mut bodies = Bodies::new();
        let rosters = (0..teams)
            .map(|t| {
                let members = (0..size)
                    .map(|_| bodies.spawn_unit(Vec2::ZERO, t))
                    .collect();
                Team::new(members)
            })
            .collect();
        (bodies, rosters)
    }

    fn kill(bodies: &mut Bodies, id: BodyId) {
        bodies.get_mut(id).unwrap().apply_damage(1.0);
    }

    #[test]
    fn test_team_alive_until_last_member_dies() {
        let (mut bodies, teams) = setup(1, 2);
        assert!(teams[0].is_alive(&bodies));
        kill(&mut bodies, teams[0].members[0]);
        assert!(teams[0].is_alive(&bodies));
        kill(&mut bodies, teams[0].members[1]);
        assert!(!teams[0].is_alive(&bodies));
    }

    #[test]
    fn test_next_member_skips_graves() {
        let (mut bodies, mut teams) = setup(1, 3);
        kill(&mut bodies, teams[0].members[1]);

        assert_eq!(teams[0].next_member(&bodies), Some(teams[0].members[2]));
        assert_eq!(teams[0].next_member(&bodies), Some(teams[0].members[0]));
        assert_eq!(teams[0].current, 0);
    }

    #[test]
    fn test_next_member_of_dead_team_is_none() {
        let (mut bodies, mut teams) = setup(1, 2);
        for id in teams[0].members.clone() {
            kill(&mut bodies, id);
        }
        assert_eq!(teams[0].next_member(&bodies), None);
    }

    #[test]
    fn test_rotation_skips_dead_teams() {
        let (mut bodies, mut teams) = setup(3, 2);
        for id in teams[1].members.clone() {
            kill(&mut bodies, id);
        }

        let rotation = rotate(&mut teams, 0, &bodies).unwrap();
        assert_eq!(
            rotation,
            Rotation::Next {
                team: 2,
                unit: teams[2].members[1]
            }
        );
    }

    #[test]
    fn test_rotation_wraps() {
        let (bodies, mut teams) = setup(2, 1);
        let rotation = rotate(&mut teams, 1, &bodies).unwrap();
        assert_eq!(
            rotation,
            Rotation::Next {
                team: 0,
                unit: teams[0].members[0]
            }
        );
    }

    #[test]
    fn test_last_team_standing() {
        let (mut bodies, mut teams) = setup(3, 1);
        kill(&mut bodies, teams[0].members[0]);
        kill(&mut bodies, teams[2].members[0]);

        let rotation = rotate(&mut teams, 1, &bodies).unwrap();
        assert_eq!(rotation, Rotation::LastTeamStanding { team: 1 });
    }

    #[test]
    fn test_no_living_teams_is_an_error() {
        let (mut bodies, mut teams) = setup(2, 1);
        kill(&mut bodies, teams[0].members[0]);
        kill(&mut bodies, teams[1].members[0]);

        assert_eq!(rotate(&mut teams, 0, &bodies), Err(SimError::NoLivingTeams));
    }

    #[test]
    fn test_total_health() {
        let (mut bodies, teams) = setup(1, 3);
        bodies.get_mut(teams[0].members[0]).unwrap().apply_damage(0.5);
        assert!((teams[0].total_health(&bodies) - 2.5).abs() < 1e-6);
        assert_eq!(teams[0].size, 3);
    }

    proptest! {
        #[test]
        fn prop_rotation_lands_on_living_unit(
            dead in prop::collection::vec(any::<bool>(), 12),
            start in 0usize..4,
        ) {
            let (mut bodies, mut teams) = setup(4, 3);
            for (t, team) in teams.clone().iter().enumerate() {
                for (m, &id) in team.members.iter().enumerate() {
                    if dead[t * 3 + m] {
                        kill(&mut bodies, id);
                    }
                }
            }
            let living = teams.iter().filter(|t| t.is_alive(&bodies)).count();
            prop_assume!(living >= 2);

            match rotate(&mut teams, start, &bodies) {
                Ok(Rotation::Next { team, unit }) => {
                    prop_assert!(team != start);
                    prop_assert!(teams[team].is_alive(&bodies));
                    prop_assert!(bodies.health_of(unit) > 0.0);
                    prop_assert!(teams[team].members.contains(&unit));
                }
                other => prop_assert!(false, "unexpected rotation {:?}", other),
            }
        }
    }
}
