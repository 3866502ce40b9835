use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};

use crate::league::SeasonContext;

pub const DEFAULT_WINNER_POINTS: i32 = 30;

/// Case-insensitive team identity: trimmed, inner whitespace collapsed, lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TeamKey(String);

impl TeamKey {
    pub fn new(name: &str) -> Self {
        Self(normalize_name(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, name: &str) -> bool {
        !self.0.is_empty() && self.0 == normalize_name(name)
    }
}

impl fmt::Display for TeamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Stable 8-hex-char team id shared with the stats feed.
pub fn derive_team_id(team_name: &str, season: SeasonContext) -> String {
    let unique = format!(
        "{}_{}_{}",
        team_name.trim().to_lowercase(),
        season.division_id,
        season.season_id
    );
    let digest = Sha256::digest(unique.as_bytes());
    digest[..4].iter().map(|b| format!("{b:02x}")).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    #[serde(default)]
    pub division: String,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub points: i32,
}

impl Team {
    pub fn key(&self) -> TeamKey {
        TeamKey::new(&self.name)
    }

    pub fn games_played(&self) -> u32 {
        self.wins + self.losses
    }

    /// Win percentage in 0..=100, `None` before the first result.
    pub fn win_percentage(&self) -> Option<f64> {
        let played = self.games_played();
        if played == 0 {
            return None;
        }
        Some(self.wins as f64 / played as f64 * 100.0)
    }

    pub fn is_ranked(&self) -> bool {
        self.rank > 0
    }
}

pub fn find_team<'a>(teams: &'a [Team], name: &str) -> Option<&'a Team> {
    let key = TeamKey::new(name);
    teams.iter().find(|t| t.key() == key)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattingStats {
    #[serde(default)]
    pub runs: u32,
    #[serde(default)]
    pub innings: u32,
    #[serde(default)]
    pub average: f64,
    #[serde(default)]
    pub strike_rate: f64,
    #[serde(default)]
    pub highest_score: String,
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub fours: u32,
    #[serde(default)]
    pub sixes: u32,
}

impl BattingStats {
    pub fn boundary_runs(&self) -> u32 {
        self.fours
            .saturating_mul(4)
            .saturating_add(self.sixes.saturating_mul(6))
    }

    /// Share of runs scored in boundaries, 0 when no runs are recorded.
    pub fn boundary_percentage(&self) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        self.boundary_runs() as f64 / self.runs as f64 * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlingStats {
    #[serde(default)]
    pub wickets: u32,
    #[serde(default)]
    pub overs: f64,
    #[serde(default)]
    pub runs: u32,
    #[serde(default)]
    pub average: f64,
    #[serde(default)]
    pub economy: f64,
    #[serde(default)]
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    #[serde(default)]
    pub team: String,
    #[serde(rename = "battingStats", default)]
    pub batting: Option<BattingStats>,
    #[serde(rename = "bowlingStats", default)]
    pub bowling: Option<BowlingStats>,
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
}

impl Player {
    /// Derived team id first, exact normalized team name second.
    pub fn belongs_to(&self, team_name: &str, season: SeasonContext) -> bool {
        let derived_match = self
            .team_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .is_some_and(|id| id.eq_ignore_ascii_case(&derive_team_id(team_name, season)));
        if derived_match {
            return true;
        }
        TeamKey::new(team_name).matches(&self.team)
    }

    pub fn batting_average(&self) -> Option<f64> {
        self.batting.as_ref().map(|b| b.average)
    }

    pub fn economy(&self) -> Option<f64> {
        self.bowling.as_ref().map(|b| b.economy)
    }
}

pub fn players_of<'a>(
    players: &'a [Player],
    team_name: &str,
    season: SeasonContext,
) -> Vec<&'a Player> {
    players
        .iter()
        .filter(|p| p.belongs_to(team_name, season))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Upcoming,
    Completed,
    Cancelled,
}

impl MatchStatus {
    /// Unknown feed values read as upcoming.
    pub fn from_feed(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "completed" => Self::Completed,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Upcoming,
        }
    }
}

fn de_status<'de, D>(deserializer: D) -> Result<MatchStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(MatchStatus::from_feed)
        .unwrap_or_default())
}

fn default_winner_points() -> i32 {
    DEFAULT_WINNER_POINTS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Team1,
    Team2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub ground: String,
    pub team1: String,
    pub team2: String,
    #[serde(default)]
    pub umpire1: String,
    #[serde(default)]
    pub umpire2: String,
    #[serde(default)]
    pub match_type: String,
    #[serde(default)]
    pub winner: String,
    #[serde(default)]
    pub runner_up: String,
    #[serde(default, deserialize_with = "de_status")]
    pub status: MatchStatus,
    #[serde(default)]
    pub date_parsed: Option<String>,
    #[serde(default = "default_winner_points")]
    pub winner_points: i32,
    #[serde(default)]
    pub loser_points: i32,
}

impl Match {
    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    pub fn is_upcoming(&self) -> bool {
        self.status == MatchStatus::Upcoming
    }

    pub fn team_name(&self, side: Side) -> &str {
        match side {
            Side::Team1 => &self.team1,
            Side::Team2 => &self.team2,
        }
    }

    pub fn side_of(&self, team: &TeamKey) -> Option<Side> {
        if team.matches(&self.team1) {
            Some(Side::Team1)
        } else if team.matches(&self.team2) {
            Some(Side::Team2)
        } else {
            None
        }
    }

    pub fn involves(&self, team: &TeamKey) -> bool {
        self.side_of(team).is_some()
    }

    pub fn opponent_of(&self, team: &TeamKey) -> Option<&str> {
        match self.side_of(team)? {
            Side::Team1 => Some(&self.team2),
            Side::Team2 => Some(&self.team1),
        }
    }

    /// Resolves the free-text winner to a side.
    ///
    /// An exact key match wins outright. Otherwise the winner text may carry
    /// extra words ("Wolves Timber won by 5 wkts"); the longest side name it
    /// contains is credited, and a tie between equally long names resolves to
    /// nobody.
    pub fn winning_side(&self) -> Option<Side> {
        let winner = normalize_name(&self.winner);
        if winner.is_empty() {
            return None;
        }
        let k1 = normalize_name(&self.team1);
        let k2 = normalize_name(&self.team2);
        if winner == k1 {
            return Some(Side::Team1);
        }
        if winner == k2 {
            return Some(Side::Team2);
        }
        let c1 = !k1.is_empty() && winner.contains(&k1);
        let c2 = !k2.is_empty() && winner.contains(&k2);
        match (c1, c2) {
            (true, false) => Some(Side::Team1),
            (false, true) => Some(Side::Team2),
            (true, true) if k1.len() > k2.len() => Some(Side::Team1),
            (true, true) if k2.len() > k1.len() => Some(Side::Team2),
            _ => None,
        }
    }

    pub fn winner_name(&self) -> Option<&str> {
        self.winning_side().map(|side| self.team_name(side))
    }

    pub fn is_winner(&self, team: &TeamKey) -> bool {
        match (self.side_of(team), self.winning_side()) {
            (Some(mine), Some(won)) => mine == won,
            _ => false,
        }
    }

    /// True when a winner is recorded and it is the other side.
    pub fn is_loser(&self, team: &TeamKey) -> bool {
        match (self.side_of(team), self.winning_side()) {
            (Some(mine), Some(won)) => mine != won,
            _ => false,
        }
    }

    pub fn points_for(&self, team: &TeamKey) -> i32 {
        if self.is_winner(team) {
            self.winner_points
        } else {
            self.loser_points
        }
    }

    pub fn is_dominant_win(&self, threshold: i32) -> bool {
        self.winner_points >= threshold
    }

    /// Calendar date from `date_parsed` (ISO) or the trailing `MM/DD/YYYY` token of `date`.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        if let Some(iso) = self.date_parsed.as_deref() {
            let head = iso.trim().get(..10).unwrap_or(iso.trim());
            if let Ok(date) = NaiveDate::parse_from_str(head, "%Y-%m-%d") {
                return Some(date);
            }
        }
        let token = self.date.split_whitespace().last()?;
        NaiveDate::parse_from_str(token, "%m/%d/%Y").ok()
    }

    /// "07/12/2025" from "Saturday 07/12/2025"; the raw text when no date token exists.
    pub fn formatted_date(&self) -> String {
        match self.parsed_date() {
            Some(date) => date.format("%m/%d/%Y").to_string(),
            None => self.date.trim().to_string(),
        }
    }

    pub fn short_date(&self) -> String {
        match self.parsed_date() {
            Some(date) => date.format("%m/%d").to_string(),
            None => self.date.trim().to_string(),
        }
    }

    fn sort_text(&self) -> &str {
        self.date_parsed.as_deref().unwrap_or(&self.date)
    }
}

/// Stable chronological sort; undated matches keep their relative order ahead of dated ones.
pub fn sort_chronologically(matches: &mut [&Match]) {
    matches.sort_by(|a, b| match (a.parsed_date(), b.parsed_date()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (None, Some(_)) => std::cmp::Ordering::Less,
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, None) => a.sort_text().cmp(b.sort_text()),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(team1: &str, team2: &str, winner: &str) -> Match {
        Match {
            id: "m1".to_string(),
            date: "Saturday 07/12/2025".to_string(),
            time: "09:00".to_string(),
            ground: "Marymoor".to_string(),
            team1: team1.to_string(),
            team2: team2.to_string(),
            umpire1: String::new(),
            umpire2: String::new(),
            match_type: "League".to_string(),
            winner: winner.to_string(),
            runner_up: String::new(),
            status: MatchStatus::Completed,
            date_parsed: None,
            winner_points: DEFAULT_WINNER_POINTS,
            loser_points: 0,
        }
    }

    #[test]
    fn team_key_collapses_whitespace_and_case() {
        assert_eq!(TeamKey::new("  Seattle   Kings "), TeamKey::new("seattle kings"));
        assert!(!TeamKey::new("").matches(""));
    }

    #[test]
    fn derived_team_id_is_eight_hex_chars() {
        let id = derive_team_id(" Wolves ", SeasonContext::default());
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id, derive_team_id("wolves", SeasonContext::default()));
        assert_ne!(id, derive_team_id("wolves", SeasonContext::new(8, 67)));
    }

    #[test]
    fn winner_prefers_longest_contained_name() {
        let m = fixture("Wolves", "Wolves Timber", "Wolves Timber won by 4 wickets");
        assert_eq!(m.winning_side(), Some(Side::Team2));
        assert!(m.is_winner(&TeamKey::new("wolves timber")));
        assert!(!m.is_winner(&TeamKey::new("wolves")));
        assert!(m.is_loser(&TeamKey::new("wolves")));
    }

    #[test]
    fn winner_name_and_points_follow_resolved_side() {
        let mut m = fixture("Hawks", "Eagles", "Eagles won by 12 runs");
        m.winner_points = 42;
        m.loser_points = 6;
        assert_eq!(m.winner_name(), Some("Eagles"));
        assert_eq!(m.points_for(&TeamKey::new("eagles")), 42);
        assert_eq!(m.points_for(&TeamKey::new("hawks")), 6);

        let no_result = fixture("Hawks", "Eagles", "");
        assert_eq!(no_result.winner_name(), None);
        assert_eq!(no_result.points_for(&TeamKey::new("hawks")), 0);
    }

    #[test]
    fn exact_winner_match() {
        let m = fixture("Wolves", "Wolves Timber", "wolves");
        assert_eq!(m.winning_side(), Some(Side::Team1));
    }

    #[test]
    fn blank_winner_resolves_to_nobody() {
        let m = fixture("Hawks", "Eagles", "  ");
        assert_eq!(m.winning_side(), None);
        assert!(!m.is_winner(&TeamKey::new("Hawks")));
        assert!(!m.is_loser(&TeamKey::new("Hawks")));
    }

    #[test]
    fn opponent_lookup_is_exact() {
        let m = fixture("Wolves", "Wolves Timber", "");
        assert_eq!(m.opponent_of(&TeamKey::new("WOLVES")), Some("Wolves Timber"));
        assert_eq!(m.opponent_of(&TeamKey::new("Timber")), None);
    }

    #[test]
    fn dates_parse_from_either_field() {
        let mut m = fixture("A", "B", "A");
        assert_eq!(m.formatted_date(), "07/12/2025");
        assert_eq!(m.short_date(), "07/12");
        m.date_parsed = Some("2025-06-01T00:00:00".to_string());
        assert_eq!(m.formatted_date(), "06/01/2025");
        m.date_parsed = None;
        m.date = "TBD".to_string();
        assert_eq!(m.parsed_date(), None);
        assert_eq!(m.formatted_date(), "TBD");
    }

    #[test]
    fn unknown_status_reads_as_upcoming() {
        let raw = r#"{"team1":"A","team2":"B","status":"postponed"}"#;
        let m: Match = serde_json::from_str(raw).expect("match json");
        assert_eq!(m.status, MatchStatus::Upcoming);
        assert_eq!(m.winner_points, 30);
        assert_eq!(m.loser_points, 0);
    }

    #[test]
    fn player_matches_by_team_id_or_name() {
        let season = SeasonContext::default();
        let by_id = Player {
            name: "A".into(),
            team: "Something Else".into(),
            batting: None,
            bowling: None,
            player_id: None,
            team_id: Some(derive_team_id("Hawks", season)),
        };
        assert!(by_id.belongs_to("hawks", season));
        let by_name = Player {
            team: " HAWKS ".into(),
            team_id: None,
            ..by_id.clone()
        };
        assert!(by_name.belongs_to("Hawks", season));
        assert!(!by_name.belongs_to("Hawks United", season));
    }

    #[test]
    fn boundary_percentage_guards_zero_runs() {
        let stats = BattingStats {
            runs: 0,
            innings: 1,
            average: 0.0,
            strike_rate: 0.0,
            highest_score: "0".into(),
            rank: 1,
            fours: 2,
            sixes: 0,
        };
        assert_eq!(stats.boundary_percentage(), 0.0);
    }

    #[test]
    fn boundary_runs_saturate_on_absurd_counts() {
        let stats = BattingStats {
            runs: 10,
            innings: 1,
            average: 10.0,
            strike_rate: 100.0,
            highest_score: "10".into(),
            rank: 1,
            fours: u32::MAX,
            sixes: u32::MAX / 2,
        };
        assert_eq!(stats.boundary_runs(), u32::MAX);
        assert!(stats.boundary_percentage().is_finite());
    }
}
