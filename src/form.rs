use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::model::{Match, TeamKey, sort_chronologically};

pub const RECENT_FORM_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchResult {
    Win,
    Loss,
}

impl MatchResult {
    pub fn letter(self) -> &'static str {
        match self {
            MatchResult::Win => "W",
            MatchResult::Loss => "L",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub result: MatchResult,
    pub length: u32,
}

impl Streak {
    pub fn winning(&self) -> u32 {
        match self.result {
            MatchResult::Win => self.length,
            MatchResult::Loss => 0,
        }
    }
}

impl fmt::Display for Streak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self.result {
            MatchResult::Win => "Won",
            MatchResult::Loss => "Lost",
        };
        write!(f, "{word} {}", self.length)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormRating {
    Hot,
    Good,
    Average,
    Poor,
}

impl FormRating {
    pub fn from_wins(wins: u32) -> Self {
        match wins {
            w if w >= 4 => FormRating::Hot,
            3 => FormRating::Good,
            2 => FormRating::Average,
            _ => FormRating::Poor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormRating::Hot => "Hot",
            FormRating::Good => "Good",
            FormRating::Average => "Average",
            FormRating::Poor => "Cold",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            FormRating::Hot => "🔥",
            FormRating::Good => "✅",
            FormRating::Average => "➖",
            FormRating::Poor => "❄️",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamForm {
    pub recent_record: String,
    pub recent_wins: u32,
    pub recent_losses: u32,
    pub streak: String,
    pub current_streak: Option<Streak>,
    pub form_rating: FormRating,
    pub points_momentum: String,
    pub matches_considered: usize,
}

impl TeamForm {
    pub fn empty() -> Self {
        Self {
            recent_record: String::new(),
            recent_wins: 0,
            recent_losses: 0,
            streak: "No streak".to_string(),
            current_streak: None,
            form_rating: FormRating::Poor,
            points_momentum: "+0 pts in last 0".to_string(),
            matches_considered: 0,
        }
    }

    pub fn winning_streak(&self) -> u32 {
        self.current_streak.map(|s| s.winning()).unwrap_or(0)
    }
}

/// Last-five completed results for `team_name`, oldest first.
///
/// Anything short of a recorded win for the team's side counts as a loss,
/// including completed matches with no resolvable winner.
pub fn analyze_team_form(team_name: &str, matches: &[Match]) -> TeamForm {
    let key = TeamKey::new(team_name);
    let mut played: Vec<&Match> = matches
        .iter()
        .filter(|m| m.is_completed() && m.involves(&key))
        .collect();
    sort_chronologically(&mut played);
    let skip = played.len().saturating_sub(RECENT_FORM_WINDOW);
    let recent = &played[skip..];

    if recent.is_empty() {
        return TeamForm::empty();
    }

    let mut letters = Vec::with_capacity(recent.len());
    let mut wins = 0u32;
    let mut losses = 0u32;
    let mut total_points = 0i32;
    let mut streak: Option<Streak> = None;

    for m in recent {
        total_points += m.points_for(&key);
        let result = if m.is_winner(&key) {
            wins += 1;
            MatchResult::Win
        } else {
            losses += 1;
            MatchResult::Loss
        };
        letters.push(result.letter());
        streak = match streak {
            Some(s) if s.result == result => Some(Streak {
                result,
                length: s.length + 1,
            }),
            _ => Some(Streak { result, length: 1 }),
        };
    }

    TeamForm {
        recent_record: letters.join("-"),
        recent_wins: wins,
        recent_losses: losses,
        streak: streak
            .map(|s| s.to_string())
            .unwrap_or_else(|| "No streak".to_string()),
        current_streak: streak,
        form_rating: FormRating::from_wins(wins),
        points_momentum: format!("+{total_points} pts in last {}", recent.len()),
        matches_considered: recent.len(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonRecord {
    pub wins: u32,
    pub losses: u32,
    pub upcoming: Vec<Match>,
    pub completed: Vec<Match>,
}

/// Whole-season record for the schedule view. Losses need a recorded winner.
pub fn season_record(team_name: &str, matches: &[Match]) -> SeasonRecord {
    let key = TeamKey::new(team_name);
    let mut upcoming: Vec<&Match> = Vec::new();
    let mut completed: Vec<&Match> = Vec::new();
    let mut wins = 0;
    let mut losses = 0;

    for m in matches.iter().filter(|m| m.involves(&key)) {
        if m.is_upcoming() {
            upcoming.push(m);
        } else if m.is_completed() {
            if m.is_winner(&key) {
                wins += 1;
            } else if m.is_loser(&key) {
                losses += 1;
            }
            completed.push(m);
        }
    }
    sort_chronologically(&mut upcoming);
    sort_chronologically(&mut completed);

    SeasonRecord {
        wins,
        losses,
        upcoming: upcoming.into_iter().cloned().collect(),
        completed: completed.into_iter().cloned().collect(),
    }
}

pub fn upcoming_opponents(team_name: &str, matches: &[Match]) -> Vec<String> {
    let key = TeamKey::new(team_name);
    let names: BTreeSet<String> = matches
        .iter()
        .filter(|m| m.is_upcoming())
        .filter_map(|m| m.opponent_of(&key))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    names.into_iter().collect()
}
