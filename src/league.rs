use serde::{Deserialize, Serialize};

pub const DEFAULT_DIVISION_ID: u32 = 8;
pub const DEFAULT_SEASON_ID: u32 = 66;

/// Division and season a snapshot belongs to. Feeds the derived team id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeasonContext {
    pub division_id: u32,
    pub season_id: u32,
}

impl SeasonContext {
    pub fn new(division_id: u32, season_id: u32) -> Self {
        Self {
            division_id,
            season_id,
        }
    }

    pub fn label(&self) -> String {
        let division = division_name(self.division_id).unwrap_or("Unknown division");
        let season = season_name(self.season_id).unwrap_or("Unknown season");
        format!("{division} / {season}")
    }
}

impl Default for SeasonContext {
    fn default() -> Self {
        Self::new(DEFAULT_DIVISION_ID, DEFAULT_SEASON_ID)
    }
}

/// League constants used by the predictor and rank projections.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeagueRules {
    pub regular_season_games: u32,
    pub playoff_cutoff: u32,
    // Ranks strictly below the cutoff and within this window count as must-win.
    pub must_win_window: u32,
    pub top_team_rank: u32,
    pub max_points_per_match: i32,
    pub expected_points_per_remaining_match: i32,
    pub dominant_win_points: i32,
}

impl Default for LeagueRules {
    fn default() -> Self {
        Self {
            regular_season_games: 7,
            playoff_cutoff: 8,
            must_win_window: 3,
            top_team_rank: 4,
            max_points_per_match: 30,
            expected_points_per_remaining_match: 15,
            dominant_win_points: 40,
        }
    }
}

impl LeagueRules {
    pub fn games_remaining(&self, played: u32) -> u32 {
        self.regular_season_games.saturating_sub(played)
    }
}

pub const DIVISIONS: &[(u32, &str)] = &[
    (2, "Womens"),
    (3, "Div A"),
    (4, "Div B"),
    (5, "Div C"),
    (6, "Div D"),
    (7, "Div E"),
    (8, "Div F"),
    (9, "Div G"),
    (10, "Div H"),
    (11, "Div I"),
    (12, "Div J"),
    (13, "Div K"),
    (14, "Div L"),
    (15, "Div M"),
    (16, "Div N"),
];

pub const SEASONS: &[(u32, &str)] = &[
    (68, "Winter 2025"),
    (67, "Fall 2025"),
    (66, "Summer 2025"),
    (65, "Spring 2025"),
    (64, "Fall 2024"),
    (63, "Summer 2024"),
];

pub fn division_name(id: u32) -> Option<&'static str> {
    DIVISIONS
        .iter()
        .find(|(division_id, _)| *division_id == id)
        .map(|(_, name)| *name)
}

pub fn season_name(id: u32) -> Option<&'static str> {
    SEASONS
        .iter()
        .find(|(season_id, _)| *season_id == id)
        .map(|(_, name)| *name)
}

pub fn division_id(name: &str) -> Option<u32> {
    let wanted = name.trim();
    DIVISIONS
        .iter()
        .find(|(_, label)| label.eq_ignore_ascii_case(wanted))
        .map(|(id, _)| *id)
}
