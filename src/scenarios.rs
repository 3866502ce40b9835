use std::collections::HashMap;

use serde::Serialize;

use crate::league::LeagueRules;
use crate::model::{Match, Team, TeamKey};

pub const MAX_SCENARIOS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Likelihood {
    High,
    Medium,
    Low,
}

impl Likelihood {
    pub fn label(self) -> &'static str {
        match self {
            Likelihood::High => "High",
            Likelihood::Medium => "Medium",
            Likelihood::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RankMovement {
    Up,
    Down,
    Stay,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankScenario {
    pub description: String,
    pub points_range: String,
    pub min_points: i32,
    pub max_points: i32,
    pub projected_points: i32,
    pub new_rank: u32,
    pub rank_change: String,
    pub movement: RankMovement,
    pub likelihood: Likelihood,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointsScenario {
    pub scenarios: Vec<RankScenario>,
    pub current_rank: u32,
    pub current_points: i32,
}

impl PointsScenario {
    pub fn empty(team: Option<&Team>) -> Self {
        Self {
            scenarios: Vec::new(),
            current_rank: team.map(|t| t.rank).unwrap_or(0),
            current_points: team.map(|t| t.points).unwrap_or(0),
        }
    }
}

struct OutcomeBucket {
    description: &'static str,
    min_points: i32,
    max_points: i32,
    likelihood: fn(u8) -> Likelihood,
}

static OUTCOME_BUCKETS: &[OutcomeBucket] = &[
    OutcomeBucket {
        description: "Dominant win",
        min_points: 28,
        max_points: 30,
        likelihood: |p| if p >= 60 { Likelihood::High } else { Likelihood::Medium },
    },
    OutcomeBucket {
        description: "Solid win",
        min_points: 22,
        max_points: 27,
        likelihood: |p| if p >= 40 { Likelihood::High } else { Likelihood::Medium },
    },
    OutcomeBucket {
        description: "Close win",
        min_points: 16,
        max_points: 21,
        likelihood: |p| if p >= 50 { Likelihood::Medium } else { Likelihood::Low },
    },
    OutcomeBucket {
        description: "Close loss",
        min_points: 6,
        max_points: 15,
        likelihood: |p| if p <= 40 { Likelihood::Medium } else { Likelihood::Low },
    },
    OutcomeBucket {
        description: "Heavy loss",
        min_points: 0,
        max_points: 5,
        likelihood: |p| if p <= 20 { Likelihood::High } else { Likelihood::Low },
    },
];

/// Regular-season games each team still has to play, from completed results.
pub fn estimate_remaining_matches(
    all_teams: &[Team],
    matches: &[Match],
    rules: &LeagueRules,
) -> HashMap<TeamKey, u32> {
    all_teams
        .iter()
        .map(|team| {
            let key = team.key();
            let completed = matches
                .iter()
                .filter(|m| m.is_completed() && m.involves(&key))
                .count() as u32;
            (key, rules.games_remaining(completed))
        })
        .collect()
}

/// 1 + number of other teams expected to finish above `my_points`.
///
/// Each rival is expected to pick up half the maximum per remaining game.
pub fn projected_rank(
    my_points: i32,
    my_key: &TeamKey,
    all_teams: &[Team],
    remaining: &HashMap<TeamKey, u32>,
    rules: &LeagueRules,
) -> u32 {
    let ahead = all_teams
        .iter()
        .filter(|t| t.key() != *my_key)
        .filter(|t| {
            let left = remaining.get(&t.key()).copied().unwrap_or(0) as i32;
            t.points + left * rules.expected_points_per_remaining_match > my_points
        })
        .count() as u32;
    ahead + 1
}

pub fn calculate_rank_scenarios(
    my_team: Option<&Team>,
    all_teams: &[Team],
    matches: &[Match],
    win_probability: u8,
    rules: &LeagueRules,
) -> PointsScenario {
    let Some(me) = my_team else {
        return PointsScenario::empty(None);
    };
    let my_key = me.key();
    let remaining = estimate_remaining_matches(all_teams, matches, rules);

    let scenarios: Vec<RankScenario> = OUTCOME_BUCKETS
        .iter()
        .map(|bucket| {
            let midpoint = (bucket.min_points + bucket.max_points) / 2;
            let projected_points = me.points + midpoint;
            let new_rank = projected_rank(projected_points, &my_key, all_teams, &remaining, rules);
            let (movement, rank_change) = if new_rank < me.rank {
                (RankMovement::Up, format!("↑ to #{new_rank}"))
            } else if new_rank > me.rank {
                (RankMovement::Down, format!("↓ to #{new_rank}"))
            } else {
                (RankMovement::Stay, format!("Stay #{}", me.rank))
            };
            RankScenario {
                description: bucket.description.to_string(),
                points_range: format!("{}-{} pts", bucket.min_points, bucket.max_points),
                min_points: bucket.min_points,
                max_points: bucket.max_points,
                projected_points,
                new_rank,
                rank_change,
                movement,
                likelihood: (bucket.likelihood)(win_probability),
            }
        })
        .filter(|s| s.likelihood != Likelihood::Low || s.movement != RankMovement::Stay)
        .take(MAX_SCENARIOS)
        .collect();

    PointsScenario {
        scenarios,
        current_rank: me.rank,
        current_points: me.points,
    }
}

/// Just outside the playoff line with a gap still closable in the remaining games.
pub fn detect_must_win(my_team: Option<&Team>, all_teams: &[Team], rules: &LeagueRules) -> bool {
    let Some(me) = my_team else {
        return false;
    };
    let cutoff = rules.playoff_cutoff;
    if me.rank <= cutoff || me.rank > cutoff.saturating_add(rules.must_win_window) {
        return false;
    }
    let Some(last_in) = all_teams.iter().find(|t| t.rank == cutoff) else {
        return false;
    };
    let games_left = rules.games_remaining(me.games_played()).max(1) as i32;
    let gap = last_in.points - me.points;
    gap > 0 && gap <= rules.max_points_per_match * games_left
}
