use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Player;

// Batting rows whose name contains one of these are totals, not batsmen.
const SUMMARY_MARKERS: [&str; 3] = ["Overs", "Rate", "Extras"];

fn cell_u32(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}

fn cell_f64(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub match_id: String,
    #[serde(default)]
    pub league_id: u32,
    #[serde(default)]
    pub season_id: u32,
    pub match_info: MatchInfo,
    pub team1_innings: Innings,
    pub team2_innings: Innings,
}

impl Scorecard {
    pub fn innings(&self) -> [&Innings; 2] {
        [&self.team1_innings, &self.team2_innings]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchInfo {
    #[serde(default)]
    pub team1: Option<String>,
    #[serde(default)]
    pub team2: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub ground: String,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub man_of_match: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InningsTotal {
    pub runs: u32,
    pub wickets: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Innings {
    #[serde(default)]
    pub batting: Vec<BatsmanPerformance>,
    #[serde(default)]
    pub bowling: Vec<BowlerPerformance>,
}

impl Innings {
    pub fn batsmen(&self) -> impl Iterator<Item = &BatsmanPerformance> {
        self.batting.iter().filter(|b| !b.is_summary_row())
    }

    fn total_row(&self) -> Option<&BatsmanPerformance> {
        self.batting
            .iter()
            .find(|b| b.name == "Overs" && b.bowler == "Total")
    }

    /// Runs from the "Overs"/"Total" row; wickets from batsmen actually dismissed.
    pub fn total(&self) -> Option<InningsTotal> {
        let row = self.total_row()?;
        let wickets = self.batsmen().filter(|b| b.is_out()).count() as u32;
        Some(InningsTotal {
            runs: row.runs(),
            wickets,
        })
    }

    /// Overs faced, kept in the total row's dismissal column by the feed.
    pub fn overs(&self) -> Option<&str> {
        self.total_row().map(|row| row.how_out.as_str())
    }

    pub fn top_scorer(&self) -> Option<&BatsmanPerformance> {
        self.batsmen().max_by_key(|b| b.runs())
    }

    pub fn best_bowler(&self) -> Option<&BowlerPerformance> {
        self.bowling
            .iter()
            .filter(|b| !b.name.is_empty())
            .max_by_key(|b| b.wickets())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatsmanPerformance {
    pub name: String,
    #[serde(default)]
    pub runs: String,
    #[serde(default)]
    pub balls: String,
    #[serde(default)]
    pub fours: String,
    #[serde(default)]
    pub sixes: String,
    #[serde(default)]
    pub how_out: String,
    #[serde(default)]
    pub bowler: String,
}

impl BatsmanPerformance {
    pub fn runs(&self) -> u32 {
        cell_u32(&self.runs)
    }

    pub fn balls(&self) -> u32 {
        cell_u32(&self.balls)
    }

    pub fn fours(&self) -> u32 {
        cell_u32(&self.fours)
    }

    pub fn sixes(&self) -> u32 {
        cell_u32(&self.sixes)
    }

    pub fn strike_rate(&self) -> f64 {
        let balls = self.balls();
        if balls == 0 {
            return 0.0;
        }
        self.runs() as f64 / balls as f64 * 100.0
    }

    pub fn is_summary_row(&self) -> bool {
        SUMMARY_MARKERS.iter().any(|m| self.name.contains(m))
    }

    pub fn is_out(&self) -> bool {
        let how = self.how_out.trim();
        !how.is_empty() && !how.contains("did not bat") && !how.contains("not out")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlerPerformance {
    pub name: String,
    #[serde(default)]
    pub overs: String,
    #[serde(default)]
    pub maidens: String,
    #[serde(default)]
    pub runs: String,
    #[serde(default)]
    pub wickets: String,
    #[serde(default)]
    pub economy: String,
    #[serde(default)]
    pub wides: String,
    #[serde(default)]
    pub no_balls: String,
}

impl BowlerPerformance {
    pub fn wickets(&self) -> u32 {
        cell_u32(&self.wickets)
    }

    pub fn overs(&self) -> f64 {
        cell_f64(&self.overs)
    }

    pub fn economy(&self) -> f64 {
        cell_f64(&self.economy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BoundaryTally {
    pub fours: u32,
    pub sixes: u32,
    pub innings: u32,
}

impl BoundaryTally {
    pub fn total(&self) -> u32 {
        self.fours.saturating_add(self.sixes)
    }
}

/// Fours and sixes per batsman name across every innings of every scorecard.
pub fn aggregate_boundaries(scorecards: &[Scorecard]) -> BTreeMap<String, BoundaryTally> {
    let mut out: BTreeMap<String, BoundaryTally> = BTreeMap::new();
    for innings in scorecards.iter().flat_map(|s| s.innings()) {
        for batsman in innings.batsmen() {
            let name = batsman.name.trim();
            if name.is_empty() {
                continue;
            }
            let tally = out.entry(name.to_string()).or_default();
            tally.fours = tally.fours.saturating_add(batsman.fours());
            tally.sixes = tally.sixes.saturating_add(batsman.sixes());
            tally.innings = tally.innings.saturating_add(1);
        }
    }
    out
}

/// Overwrites batting fours/sixes from the tallies; batsmen with no tally get zero.
pub fn merge_boundaries(players: &mut [Player], tallies: &BTreeMap<String, BoundaryTally>) {
    for player in players.iter_mut() {
        let tally = tallies.get(player.name.trim()).copied().unwrap_or_default();
        if let Some(batting) = player.batting.as_mut() {
            batting.fours = tally.fours;
            batting.sixes = tally.sixes;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundaryLeader {
    pub name: String,
    pub fours: u32,
    pub sixes: u32,
    pub total_boundaries: u32,
    pub innings: u32,
}

pub fn boundary_leaders(tallies: &BTreeMap<String, BoundaryTally>) -> Vec<BoundaryLeader> {
    let mut out: Vec<BoundaryLeader> = tallies
        .iter()
        .map(|(name, t)| BoundaryLeader {
            name: name.clone(),
            fours: t.fours,
            sixes: t.sixes,
            total_boundaries: t.total(),
            innings: t.innings,
        })
        .collect();
    // Names are already ascending, so the stable sort keeps ties alphabetical.
    out.sort_by(|a, b| b.total_boundaries.cmp(&a.total_boundaries));
    out
}
