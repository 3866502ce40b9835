use serde::Serialize;
use tracing::debug;

use crate::league::SeasonContext;
use crate::model::{Player, Team, players_of};

pub const MAX_RECOMMENDATIONS: usize = 6;
pub const DANGEROUS_COUNT: usize = 5;
pub const WEAK_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpponentAnalysis {
    pub team: String,
    pub dangerous_batsmen: Vec<Player>,
    pub weak_batsmen: Vec<Player>,
    pub dangerous_bowlers: Vec<Player>,
    pub recommendations: Vec<String>,
}

/// Scouting sentences from the opponent's best bowlers and batsmen.
///
/// Both player lists are expected in stat-table order (best first). Each check
/// adds at most one sentence and the first six are kept in evaluation order.
pub fn generate_match_strategy(
    dangerous_batsmen: &[Player],
    dangerous_bowlers: &[Player],
    team: Option<&Team>,
) -> Vec<String> {
    let mut out = Vec::new();

    let top_bowler = dangerous_bowlers
        .first()
        .and_then(|p| p.bowling.as_ref().map(|stats| (p, stats)));
    if let Some((bowler, stats)) = top_bowler {
        if stats.wickets >= 13 {
            out.push(format!(
                "Play defensively vs {} - elite wicket-taker with {} scalps",
                bowler.name, stats.wickets
            ));
        } else if stats.wickets >= 11 {
            out.push(format!(
                "Cautious approach vs {} - dangerous striker with {} wickets",
                bowler.name, stats.wickets
            ));
        } else if stats.wickets >= 8 {
            out.push(format!(
                "Respect {} early - quality bowler hunting wickets",
                bowler.name
            ));
        }

        if stats.economy < 4.2 {
            out.push(format!(
                "Rotate strike carefully - extremely tight bowling (Econ: {:.2})",
                stats.economy
            ));
        } else if stats.economy < 5.0 {
            out.push("Patient approach needed - economical bowler restricting runs".to_string());
        } else if stats.economy > 5.5 {
            out.push(format!(
                "Target their 4th/5th bowlers aggressively (Econ: {:.2})",
                stats.economy
            ));
        }
    }

    let quality_bowlers = dangerous_bowlers
        .iter()
        .filter(|p| p.bowling.as_ref().is_some_and(|b| b.wickets >= 10))
        .count();
    if quality_bowlers >= 3 {
        out.push("Deep bowling lineup - patience required throughout innings".to_string());
    } else if quality_bowlers <= 1 {
        out.push("Limited bowling depth - attack middle overs aggressively".to_string());
    }

    let top_batsman = dangerous_batsmen
        .first()
        .and_then(|p| p.batting.as_ref().map(|stats| (p, stats)));
    if let Some((batsman, stats)) = top_batsman {
        if stats.runs >= 180 {
            out.push(format!(
                "Dismiss {} early - division star with {} runs",
                batsman.name, stats.runs
            ));
        } else if stats.runs >= 150 {
            out.push(format!(
                "Attack {} with best bowlers - dangerous with {} runs",
                batsman.name, stats.runs
            ));
        } else if stats.runs >= 140 {
            out.push(format!(
                "Tight bowling to {} - key batsman with {} runs",
                batsman.name, stats.runs
            ));
        }

        if stats.strike_rate >= 120.0 {
            out.push(
                "Contain aggressive striker - bowl tight lines to limit boundaries".to_string(),
            );
        }
    }

    let strong_batsmen = dangerous_batsmen
        .iter()
        .filter(|p| p.batting.as_ref().is_some_and(|b| b.runs >= 140))
        .count();
    if strong_batsmen <= 2 {
        out.push("Target middle/lower order - limited depth after top 2".to_string());
    } else if strong_batsmen >= 4 {
        out.push("Deep batting lineup - maintain pressure with all bowlers".to_string());
    }

    if let Some(team) = team {
        // No results yet means no win percentage to judge.
        if let Some(win_pct) = team.win_percentage() {
            if win_pct >= 77.0 {
                out.push("Peak performance required - facing division's elite".to_string());
            } else if win_pct < 35.0 {
                out.push("Capitalize on vulnerabilities - maintain relentless pressure".to_string());
            }
        }
        if team.is_ranked() && team.rank <= 2 {
            out.push(
                "Disciplined cricket essential - championship-caliber opposition".to_string(),
            );
        }
    }

    let aggressive = dangerous_batsmen
        .iter()
        .filter(|p| p.batting.as_ref().is_some_and(|b| b.strike_rate >= 105.0))
        .count();
    if aggressive >= 3 {
        out.push("Sharp fielding crucial - they score quickly".to_string());
    }

    out.truncate(MAX_RECOMMENDATIONS);
    out
}

// Unranked rows (rank 0) sort after ranked ones; ties keep input order.
fn table_rank(rank: u32) -> (bool, u32) {
    (rank == 0, rank)
}

pub fn ranked_batsmen(players: &[Player], team_name: &str, season: SeasonContext) -> Vec<Player> {
    let mut out: Vec<Player> = players_of(players, team_name, season)
        .into_iter()
        .filter(|p| p.batting.is_some())
        .cloned()
        .collect();
    out.sort_by_key(|p| table_rank(p.batting.as_ref().map(|b| b.rank).unwrap_or(0)));
    out
}

pub fn ranked_bowlers(players: &[Player], team_name: &str, season: SeasonContext) -> Vec<Player> {
    let mut out: Vec<Player> = players_of(players, team_name, season)
        .into_iter()
        .filter(|p| p.bowling.is_some())
        .cloned()
        .collect();
    out.sort_by_key(|p| table_rank(p.bowling.as_ref().map(|b| b.rank).unwrap_or(0)));
    out
}

pub fn analyze_opponent(
    team_name: &str,
    players: &[Player],
    team_record: Option<&Team>,
    season: SeasonContext,
) -> OpponentAnalysis {
    let batsmen = ranked_batsmen(players, team_name, season);
    let bowlers = ranked_bowlers(players, team_name, season);
    debug!(
        team = team_name,
        batsmen = batsmen.len(),
        bowlers = bowlers.len(),
        "opponent players matched"
    );

    let dangerous_batsmen: Vec<Player> = batsmen.iter().take(DANGEROUS_COUNT).cloned().collect();
    let weak_batsmen: Vec<Player> = batsmen
        .iter()
        .skip(DANGEROUS_COUNT)
        .take(WEAK_COUNT)
        .cloned()
        .collect();
    let dangerous_bowlers: Vec<Player> = bowlers.into_iter().take(DANGEROUS_COUNT).collect();
    let recommendations =
        generate_match_strategy(&dangerous_batsmen, &dangerous_bowlers, team_record);

    OpponentAnalysis {
        team: team_name.to_string(),
        dangerous_batsmen,
        weak_batsmen,
        dangerous_bowlers,
        recommendations,
    }
}
