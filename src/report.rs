use std::collections::HashSet;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::form::{self, TeamForm};
use crate::insights::{self, PlayerInsight};
use crate::league::LeagueRules;
use crate::model::{Match, Player, TeamKey, find_team, sort_chronologically};
use crate::predictor::{self, MatchPrediction, PredictionInput};
use crate::snapshot::SeasonData;
use crate::strategy::{self, OpponentAnalysis};

static OUTLOOK_POOL: OnceCell<rayon::ThreadPool> = OnceCell::new();

#[derive(Debug, Clone, Copy)]
pub struct ReportRequest<'a> {
    pub my_team: &'a str,
    pub opponent: &'a str,
    pub ground: Option<&'a str>,
    pub rules: LeagueRules,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerCard {
    pub name: String,
    pub team: String,
    pub batting: Vec<PlayerInsight>,
    pub bowling: Vec<PlayerInsight>,
}

impl PlayerCard {
    pub fn for_player(player: &Player) -> Self {
        let found = insights::player_insights(player);
        Self {
            name: player.name.clone(),
            team: player.team.clone(),
            batting: found.batting,
            bowling: found.bowling,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoutingReport {
    pub my_team: String,
    pub opponent: String,
    pub season_label: String,
    pub ground: Option<String>,
    pub my_form: TeamForm,
    pub opponent_form: TeamForm,
    pub opponent_analysis: OpponentAnalysis,
    pub prediction: MatchPrediction,
    pub player_cards: Vec<PlayerCard>,
}

pub fn build_scouting_report(data: &SeasonData, request: &ReportRequest<'_>) -> ScoutingReport {
    let my_team = find_team(&data.teams, request.my_team);
    let opponent = find_team(&data.teams, request.opponent);
    if my_team.is_none() {
        warn!(team = request.my_team, "team not found in standings");
    }
    if opponent.is_none() {
        warn!(team = request.opponent, "opponent not found in standings");
    }

    let my_form = form::analyze_team_form(request.my_team, &data.matches);
    let opponent_form = form::analyze_team_form(request.opponent, &data.matches);
    let opponent_analysis =
        strategy::analyze_opponent(request.opponent, &data.players, opponent, data.season);

    let prediction = predictor::predict_match(&PredictionInput {
        my_team,
        opponent,
        my_form: &my_form,
        opponent_form: &opponent_form,
        all_teams: &data.teams,
        matches: &data.matches,
        players: &data.players,
        selected_ground: request.ground,
        season: data.season,
        rules: request.rules,
    });

    let mut seen = HashSet::new();
    let player_cards = opponent_analysis
        .dangerous_batsmen
        .iter()
        .chain(opponent_analysis.dangerous_bowlers.iter())
        .filter(|p| seen.insert(p.name.trim().to_lowercase()))
        .map(PlayerCard::for_player)
        .collect();

    info!(
        my_team = request.my_team,
        opponent = request.opponent,
        win_probability = prediction.win_probability,
        "scouting report built"
    );

    ScoutingReport {
        my_team: my_team
            .map(|t| t.name.clone())
            .unwrap_or_else(|| request.my_team.to_string()),
        opponent: opponent
            .map(|t| t.name.clone())
            .unwrap_or_else(|| request.opponent.to_string()),
        season_label: data.season.label(),
        ground: request.ground.map(str::to_string),
        my_form,
        opponent_form,
        opponent_analysis,
        prediction,
        player_cards,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixtureOutlook {
    pub match_id: String,
    pub date: String,
    pub ground: String,
    pub opponent: String,
    pub prediction: MatchPrediction,
}

pub fn upcoming_fixtures<'a>(team_name: &str, matches: &'a [Match]) -> Vec<&'a Match> {
    let key = TeamKey::new(team_name);
    let mut out: Vec<&Match> = matches
        .iter()
        .filter(|m| m.is_upcoming() && m.involves(&key))
        .collect();
    sort_chronologically(&mut out);
    out
}

fn fixture_outlook(data: &SeasonData, team_name: &str, m: &Match, rules: LeagueRules) -> FixtureOutlook {
    let key = TeamKey::new(team_name);
    let opponent = m.opponent_of(&key).unwrap_or_default().to_string();
    let ground = m.ground.trim();
    let report = build_scouting_report(
        data,
        &ReportRequest {
            my_team: team_name,
            opponent: &opponent,
            ground: (!ground.is_empty()).then_some(ground),
            rules,
        },
    );
    FixtureOutlook {
        match_id: m.id.clone(),
        date: m.formatted_date(),
        ground: m.ground.clone(),
        opponent,
        prediction: report.prediction,
    }
}

/// Predictions for every upcoming fixture of `team_name`, in schedule order.
pub fn schedule_outlook(
    data: &SeasonData,
    team_name: &str,
    rules: LeagueRules,
    pool: Option<&rayon::ThreadPool>,
) -> Vec<FixtureOutlook> {
    let fixtures = upcoming_fixtures(team_name, &data.matches);
    let run = || {
        fixtures
            .par_iter()
            .map(|m| fixture_outlook(data, team_name, m, rules))
            .collect::<Vec<_>>()
    };
    match pool {
        Some(pool) => pool.install(run),
        None => run(),
    }
}

/// Shared pool for schedule outlooks; sized by the first caller.
pub fn outlook_pool(threads: usize) -> Result<&'static rayon::ThreadPool> {
    OUTLOOK_POOL.get_or_try_init(|| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|idx| format!("arcl-outlook-{idx}"))
            .build()
            .context("build outlook thread pool")
    })
}
