use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::league::SeasonContext;
use crate::model::{Match, Player, Team};
use crate::scorecard::{self, Scorecard};

/// One season of league data as exported by the stats feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonSnapshot {
    #[serde(default)]
    pub season: Option<SeasonContext>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub batsmen: Vec<Player>,
    #[serde(default)]
    pub bowlers: Vec<Player>,
    #[serde(default)]
    pub matches: Vec<Match>,
    #[serde(default)]
    pub scorecards: Vec<Scorecard>,
}

/// Engine-ready view of a snapshot: one player list with boundaries merged in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonData {
    pub season: SeasonContext,
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    pub matches: Vec<Match>,
    pub scorecards: Vec<Scorecard>,
}

impl SeasonSnapshot {
    /// Batsmen then bowlers. A player present in both lists keeps one record
    /// carrying both stat blocks.
    pub fn merged_players(&self) -> Vec<Player> {
        let mut out: Vec<Player> = self.batsmen.clone();
        for bowler in &self.bowlers {
            let existing = out.iter_mut().find(|p| {
                p.bowling.is_none()
                    && p.name.trim().eq_ignore_ascii_case(bowler.name.trim())
                    && p.team.trim().eq_ignore_ascii_case(bowler.team.trim())
            });
            match existing {
                Some(p) => p.bowling = bowler.bowling.clone(),
                None => out.push(bowler.clone()),
            }
        }
        if !self.scorecards.is_empty() {
            let tallies = scorecard::aggregate_boundaries(&self.scorecards);
            scorecard::merge_boundaries(&mut out, &tallies);
        }
        out
    }

    pub fn into_season_data(self, fallback: SeasonContext) -> SeasonData {
        let players = self.merged_players();
        SeasonData {
            season: self.season.unwrap_or(fallback),
            teams: self.teams,
            players,
            matches: self.matches,
            scorecards: self.scorecards,
        }
    }
}

pub fn parse_snapshot_json(raw: &str) -> Result<SeasonSnapshot> {
    let mut snapshot: SeasonSnapshot =
        serde_json::from_str(raw).context("invalid season snapshot json")?;
    // Feed rows carry no ids; number them in file order.
    for (idx, m) in snapshot.matches.iter_mut().enumerate() {
        if m.id.trim().is_empty() {
            m.id = format!("m{:03}", idx + 1);
        }
    }
    if snapshot.teams.is_empty() {
        warn!("season snapshot has no teams");
    }
    Ok(snapshot)
}

pub fn load_snapshot(path: &Path) -> Result<SeasonSnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read snapshot {}", path.display()))?;
    let snapshot = parse_snapshot_json(&raw)
        .with_context(|| format!("parse snapshot {}", path.display()))?;
    info!(
        path = %path.display(),
        teams = snapshot.teams.len(),
        batsmen = snapshot.batsmen.len(),
        bowlers = snapshot.bowlers.len(),
        matches = snapshot.matches.len(),
        scorecards = snapshot.scorecards.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

pub fn save_snapshot(path: &Path, snapshot: &SeasonSnapshot) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create dir {}", dir.display()))?;
    }
    let data = serde_json::to_string_pretty(snapshot).context("serialize snapshot")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("rename to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batsman_and_bowler_rows_merge() {
        let raw = r#"{
            "teams": [{"name": "Hawks", "division": "Div F", "wins": 1, "losses": 0, "rank": 1, "points": 30}],
            "batsmen": [{"name": "Asha", "team": "Hawks",
                "battingStats": {"runs": 120, "innings": 4, "average": 30.0, "strikeRate": 110.0, "highestScore": "55*", "rank": 3}}],
            "bowlers": [
                {"name": "asha", "team": "HAWKS",
                 "bowlingStats": {"wickets": 6, "overs": 12.0, "runs": 60, "average": 10.0, "economy": 5.0, "rank": 9}},
                {"name": "Roy", "team": "Hawks",
                 "bowlingStats": {"wickets": 9, "overs": 14.0, "runs": 55, "average": 6.1, "economy": 3.9, "rank": 2}}
            ],
            "matches": [{"team1": "Hawks", "team2": "Owls", "winner": "Hawks", "status": "completed", "date": "Sunday 06/01/2025"}]
        }"#;
        let snapshot = parse_snapshot_json(raw).expect("snapshot");
        assert_eq!(snapshot.matches[0].id, "m001");
        let players = snapshot.merged_players();
        assert_eq!(players.len(), 2);
        assert!(players[0].batting.is_some() && players[0].bowling.is_some());
        assert_eq!(players[0].batting.as_ref().map(|b| b.fours), Some(0));
        assert_eq!(players[1].name, "Roy");
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_snapshot_json("{\"teams\": 3}").is_err());
    }

    #[test]
    fn season_falls_back_when_absent() {
        let data = SeasonSnapshot::default().into_season_data(SeasonContext::new(3, 67));
        assert_eq!(data.season, SeasonContext::new(3, 67));
    }
}
