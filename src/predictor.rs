use std::collections::{BTreeSet, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::form::TeamForm;
use crate::league::{LeagueRules, SeasonContext};
use crate::model::{Match, Player, Team, TeamKey};
use crate::scenarios::{self, PointsScenario};

pub const BASELINE_PROBABILITY: i32 = 50;
pub const MIN_PROBABILITY: i32 = 15;
pub const MAX_PROBABILITY: i32 = 85;
pub const MUST_WIN_WARNING: &str = "⚠️ Must-win situation for playoff position";

const TOP_PLAYERS: usize = 3;
const QUALITY_BATTING_AVERAGE: f64 = 25.0;
const QUALITY_ECONOMY: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn from_probability(p: i32) -> Self {
        match (p - BASELINE_PROBABILITY).abs() {
            d if d >= 25 => Confidence::High,
            d if d >= 15 => Confidence::Medium,
            _ => Confidence::Low,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Confidence::High => "High Confidence",
            Confidence::Medium => "Medium Confidence",
            Confidence::Low => "Low Confidence",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Factor {
    HeadToHead,
    Ranking,
    RecentForm,
    Streak,
    PlayerQuality,
    SquadDepth,
    Ground,
    WinDominance,
    TopTeams,
}

impl Factor {
    pub fn cap(self, ground_selected: bool) -> i32 {
        match self {
            Factor::HeadToHead => 20,
            Factor::Ranking => 15,
            Factor::RecentForm => 20,
            Factor::Streak => 10,
            Factor::PlayerQuality => 15,
            Factor::SquadDepth => 10,
            Factor::Ground if ground_selected => 15,
            Factor::Ground => 10,
            Factor::WinDominance => 5,
            Factor::TopTeams => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FactorContribution {
    pub factor: Factor,
    pub delta: i32,
}

/// Everything the predictor reads. All fields are borrowed snapshots.
#[derive(Debug, Clone, Copy)]
pub struct PredictionInput<'a> {
    pub my_team: Option<&'a Team>,
    pub opponent: Option<&'a Team>,
    pub my_form: &'a TeamForm,
    pub opponent_form: &'a TeamForm,
    pub all_teams: &'a [Team],
    pub matches: &'a [Match],
    pub players: &'a [Player],
    pub selected_ground: Option<&'a str>,
    pub season: SeasonContext,
    pub rules: LeagueRules,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchPrediction {
    pub win_probability: u8,
    pub confidence: Confidence,
    pub key_factors: Vec<String>,
    pub points_scenario: PointsScenario,
    pub must_win: bool,
    pub is_playoff: bool,
    pub contributions: Vec<FactorContribution>,
}

#[derive(Debug, Default)]
struct Adjustment {
    delta: i32,
    notes: Vec<String>,
}

impl Adjustment {
    fn none() -> Self {
        Self::default()
    }

    fn new(delta: i32, note: impl Into<String>) -> Self {
        Self {
            delta,
            notes: vec![note.into()],
        }
    }

    fn add(&mut self, delta: i32, note: Option<String>) {
        self.delta += delta;
        self.notes.extend(note);
    }
}

type FactorFn = fn(&PredictionInput<'_>) -> Adjustment;

const FACTORS: [(Factor, FactorFn); 9] = [
    (Factor::HeadToHead, head_to_head),
    (Factor::Ranking, ranking),
    (Factor::RecentForm, recent_form),
    (Factor::Streak, streak),
    (Factor::PlayerQuality, player_quality),
    (Factor::SquadDepth, squad_depth),
    (Factor::Ground, ground),
    (Factor::WinDominance, win_dominance),
    (Factor::TopTeams, top_teams),
];

/// Weighted heuristic win probability for `my_team` against `opponent`.
///
/// Factors run in a fixed order, each clamped to its own cap, and the total is
/// clamped to [15, 85]. Missing teams, players or history leave a factor at zero.
pub fn predict_match(input: &PredictionInput<'_>) -> MatchPrediction {
    let ground_selected = input.selected_ground.is_some();
    let mut probability = BASELINE_PROBABILITY;
    let mut key_factors = Vec::new();
    let mut contributions = Vec::new();

    for (factor, evaluate) in FACTORS {
        let adj = evaluate(input);
        let cap = factor.cap(ground_selected);
        let delta = adj.delta.clamp(-cap, cap);
        if delta != 0 {
            debug!(?factor, delta, "prediction factor applied");
            contributions.push(FactorContribution { factor, delta });
        }
        probability += delta;
        key_factors.extend(adj.notes);
    }

    let probability = probability.clamp(MIN_PROBABILITY, MAX_PROBABILITY);
    let confidence = Confidence::from_probability(probability);
    let win_probability = probability as u8;

    let played = input.my_team.map(|t| t.games_played()).unwrap_or(0);
    let is_playoff = played >= input.rules.regular_season_games;
    let points_scenario = if is_playoff {
        PointsScenario::empty(input.my_team)
    } else {
        scenarios::calculate_rank_scenarios(
            input.my_team,
            input.all_teams,
            input.matches,
            win_probability,
            &input.rules,
        )
    };

    let must_win = scenarios::detect_must_win(input.my_team, input.all_teams, &input.rules);
    if must_win {
        key_factors.insert(0, MUST_WIN_WARNING.to_string());
    }

    MatchPrediction {
        win_probability,
        confidence,
        key_factors,
        points_scenario,
        must_win,
        is_playoff,
        contributions,
    }
}

fn both_teams<'a>(input: &PredictionInput<'a>) -> Option<(&'a Team, &'a Team)> {
    input.my_team.zip(input.opponent)
}

fn completed(matches: &[Match]) -> impl Iterator<Item = &Match> {
    matches.iter().filter(|m| m.is_completed())
}

fn signed_step(diff: i32, per_unit: i32, cap: i32) -> i32 {
    (diff.abs() * per_unit).min(cap) * diff.signum()
}

fn head_to_head(input: &PredictionInput<'_>) -> Adjustment {
    let Some((me, them)) = both_teams(input) else {
        return Adjustment::none();
    };
    let (my_key, their_key) = (me.key(), them.key());
    let h2h: Vec<&Match> = completed(input.matches)
        .filter(|m| m.involves(&my_key) && m.involves(&their_key))
        .collect();
    if h2h.is_empty() {
        return Adjustment::none();
    }
    let mine = h2h.iter().filter(|m| m.is_winner(&my_key)).count() as i32;
    let theirs = h2h.iter().filter(|m| m.is_winner(&their_key)).count() as i32;
    let diff = mine - theirs;
    let delta = signed_step(diff, 10, 20);
    match diff.signum() {
        1 => Adjustment::new(delta, format!("H2H advantage ({mine}-{theirs} this season)")),
        -1 => Adjustment::new(delta, format!("H2H disadvantage ({mine}-{theirs} this season)")),
        _ => Adjustment::new(0, format!("H2H even ({mine}-{theirs})")),
    }
}

fn ranking(input: &PredictionInput<'_>) -> Adjustment {
    let Some((me, them)) = both_teams(input) else {
        return Adjustment::none();
    };
    if !me.is_ranked() || !them.is_ranked() {
        return Adjustment::none();
    }
    let diff = them.rank as i32 - me.rank as i32;
    let delta = signed_step(diff, 3, 15);
    match diff.signum() {
        1 => Adjustment::new(delta, format!("Higher ranked (#{} vs #{})", me.rank, them.rank)),
        -1 => Adjustment::new(delta, format!("Lower ranked (#{} vs #{})", me.rank, them.rank)),
        _ => Adjustment::none(),
    }
}

fn recent_form(input: &PredictionInput<'_>) -> Adjustment {
    let (mine, theirs) = (input.my_form, input.opponent_form);
    let diff = mine.recent_wins as i32 - theirs.recent_wins as i32;
    let delta = signed_step(diff, 5, 20);
    let records = format!(
        "({}-{} vs {}-{})",
        mine.recent_wins, mine.recent_losses, theirs.recent_wins, theirs.recent_losses
    );
    match diff.signum() {
        1 => Adjustment::new(delta, format!("Better form {records}")),
        -1 => Adjustment::new(delta, format!("Worse form {records}")),
        _ => Adjustment::none(),
    }
}

fn streak_tier(form: &TeamForm) -> i32 {
    match form.winning_streak() {
        n if n >= 3 => 10,
        2 => 5,
        _ => 0,
    }
}

// Net of both sides; only the side the net favours gets a note.
fn streak(input: &PredictionInput<'_>) -> Adjustment {
    let (mine, theirs) = (input.my_form, input.opponent_form);
    let net = streak_tier(mine) - streak_tier(theirs);
    if net > 0 && mine.winning_streak() >= 3 {
        Adjustment::new(net, format!("Hot streak ({})", mine.streak))
    } else if net < 0 && theirs.winning_streak() >= 3 {
        Adjustment::new(net, format!("They're on a hot streak ({})", theirs.streak))
    } else {
        Adjustment {
            delta: net,
            notes: Vec::new(),
        }
    }
}

fn top_by<'a, K>(
    players: &'a [Player],
    team: &Team,
    season: SeasonContext,
    stat: impl Fn(&Player) -> Option<f64>,
    mut order: K,
) -> Vec<f64>
where
    K: FnMut(&f64, &f64) -> std::cmp::Ordering,
{
    let mut values: Vec<f64> = players
        .iter()
        .filter(|p| p.belongs_to(&team.name, season))
        .filter_map(stat)
        .collect();
    values.sort_by(|a, b| order(a, b));
    values.truncate(TOP_PLAYERS);
    values
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn player_quality(input: &PredictionInput<'_>) -> Adjustment {
    let Some((me, them)) = both_teams(input) else {
        return Adjustment::none();
    };
    if input.players.is_empty() {
        return Adjustment::none();
    }
    let season = input.season;
    let my_bat = top_by(input.players, me, season, Player::batting_average, |a, b| b.total_cmp(a));
    let their_bat = top_by(input.players, them, season, Player::batting_average, |a, b| b.total_cmp(a));
    let my_bowl = top_by(input.players, me, season, Player::economy, |a, b| a.total_cmp(b));
    let their_bowl = top_by(input.players, them, season, Player::economy, |a, b| a.total_cmp(b));
    debug!(
        my_team = %me.name,
        opponent = %them.name,
        my_batsmen = my_bat.len(),
        their_batsmen = their_bat.len(),
        my_bowlers = my_bowl.len(),
        their_bowlers = their_bowl.len(),
        "player quality inputs"
    );

    let mut adj = Adjustment::none();

    let (my_avg, their_avg) = (mean(&my_bat), mean(&their_bat));
    if !my_bat.is_empty() && !their_bat.is_empty() {
        let diff = my_avg - their_avg;
        if diff >= 5.0 {
            adj.add(
                (diff as i32).min(8),
                Some(format!(
                    "Superior batting (Top 3 avg: {my_avg:.1} vs {their_avg:.1})"
                )),
            );
        } else if diff <= -5.0 {
            adj.add(
                -((diff.abs() as i32).min(8)),
                Some(format!("Weaker batting (Top 3 avg: {my_avg:.1} vs {their_avg:.1})")),
            );
        }
    } else if their_bat.is_empty() && !my_bat.is_empty() {
        adj.add(0, Some("Limited opponent data available".to_string()));
    }

    let (my_econ, their_econ) = (mean(&my_bowl), mean(&their_bowl));
    if my_bowl.len() >= 2 && their_bowl.len() >= 2 && my_econ > 0.0 && their_econ > 0.0 {
        let diff = their_econ - my_econ;
        if diff >= 0.5 {
            adj.add(
                ((diff * 2.0) as i32).min(7),
                Some(format!(
                    "Tighter bowling (Top 3 econ: {my_econ:.2} vs {their_econ:.2})"
                )),
            );
        } else if diff <= -0.5 {
            adj.add(
                -(((diff.abs() * 2.0) as i32).min(7)),
                Some(format!("Looser bowling (Top 3 econ: {my_econ:.2} vs {their_econ:.2})")),
            );
        }
    }
    adj
}

fn quality_players(players: &[Player], team: &Team, season: SeasonContext) -> i32 {
    players
        .iter()
        .filter(|p| p.belongs_to(&team.name, season))
        .filter(|p| {
            p.batting_average().is_some_and(|a| a > QUALITY_BATTING_AVERAGE)
                || p.economy().is_some_and(|e| e < QUALITY_ECONOMY)
        })
        .count() as i32
}

fn squad_depth(input: &PredictionInput<'_>) -> Adjustment {
    let Some((me, them)) = both_teams(input) else {
        return Adjustment::none();
    };
    if input.players.is_empty() {
        return Adjustment::none();
    }
    let mine = quality_players(input.players, me, input.season);
    let theirs = quality_players(input.players, them, input.season);
    let diff = mine - theirs;
    if diff >= 3 && theirs > 0 {
        Adjustment::new(10, format!("Superior depth ({mine} quality players vs {theirs})"))
    } else if diff <= -3 && mine > 0 {
        Adjustment::new(-10, format!("Weaker depth ({mine} quality players vs {theirs})"))
    } else if diff >= 2 && theirs > 0 {
        Adjustment::new(5, format!("Better depth ({mine} vs {theirs} quality players)"))
    } else if diff <= -2 && mine > 0 {
        Adjustment::new(-5, format!("Less depth ({mine} vs {theirs} quality players)"))
    } else {
        Adjustment::none()
    }
}

struct GroundRecord {
    played: u32,
    wins: u32,
}

impl GroundRecord {
    fn at(matches: &[&Match], team: &TeamKey) -> Self {
        let mine: Vec<&&Match> = matches.iter().filter(|m| m.involves(team)).collect();
        Self {
            played: mine.len() as u32,
            wins: mine.iter().filter(|m| m.is_winner(team)).count() as u32,
        }
    }

    fn rate(&self) -> f64 {
        if self.played == 0 {
            return 0.0;
        }
        self.wins as f64 / self.played as f64
    }

    fn record(&self) -> String {
        format!("{}-{}", self.wins, self.played - self.wins)
    }
}

fn ground(input: &PredictionInput<'_>) -> Adjustment {
    let Some((me, them)) = both_teams(input) else {
        return Adjustment::none();
    };
    if input.matches.is_empty() {
        return Adjustment::none();
    }
    let selected = input.selected_ground.is_some();
    let full = Factor::Ground.cap(selected);
    let reduced = (full - 5).max(5);

    // Blank grounds carry no venue information.
    let grounds: BTreeSet<String> = match input.selected_ground {
        Some(g) => BTreeSet::from([g.trim().to_string()]),
        None => input
            .matches
            .iter()
            .map(|m| m.ground.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect(),
    };

    let (my_key, their_key) = (me.key(), them.key());
    let mut adj = Adjustment::none();
    for venue in grounds {
        let at_ground: Vec<&Match> = completed(input.matches)
            .filter(|m| m.ground.trim().eq_ignore_ascii_case(&venue))
            .collect();
        let mine = GroundRecord::at(&at_ground, &my_key);
        let theirs = GroundRecord::at(&at_ground, &their_key);
        if mine.played == 0 && theirs.played == 0 {
            continue;
        }
        let (my_rate, their_rate) = (mine.rate(), theirs.rate());
        if my_rate >= 0.75 && mine.played >= 2 {
            adj.add(
                full,
                Some(format!("Strong ground record ({} at {venue})", mine.record())),
            );
        } else if their_rate >= 0.75 && theirs.played >= 2 {
            adj.add(
                -full,
                Some(format!("Their strong ground record ({} at {venue})", theirs.record())),
            );
        } else if my_rate - their_rate >= 0.4 {
            let note = selected.then(|| {
                format!(
                    "Better record at selected ground ({} vs {})",
                    mine.record(),
                    theirs.record()
                )
            });
            adj.add(reduced, note);
        } else if their_rate - my_rate >= 0.4 {
            let note = selected.then(|| {
                format!(
                    "They perform better at this ground ({} vs {})",
                    theirs.record(),
                    mine.record()
                )
            });
            adj.add(-reduced, note);
        }
    }
    adj
}

fn win_dominance(input: &PredictionInput<'_>) -> Adjustment {
    let Some((me, them)) = both_teams(input) else {
        return Adjustment::none();
    };
    let threshold = input.rules.dominant_win_points;
    let tally = |key: &TeamKey| {
        let wins: Vec<&Match> = completed(input.matches)
            .filter(|m| m.is_winner(key))
            .collect();
        let dominant = wins.iter().filter(|m| m.is_dominant_win(threshold)).count();
        (dominant, wins.len())
    };
    let (my_dominant, my_wins) = tally(&me.key());
    let (their_dominant, their_wins) = tally(&them.key());
    if my_wins == 0 || their_wins == 0 {
        return Adjustment::none();
    }
    let my_rate = my_dominant as f64 / my_wins as f64;
    let their_rate = their_dominant as f64 / their_wins as f64;
    if my_rate >= 0.6 && their_rate < 0.4 {
        Adjustment::new(5, format!("Dominant wins ({my_dominant}/{my_wins} big victories)"))
    } else if their_rate >= 0.6 && my_rate < 0.4 {
        Adjustment::new(
            -5,
            format!("They win dominantly ({their_dominant}/{their_wins} big victories)"),
        )
    } else {
        Adjustment::none()
    }
}

fn top_teams(input: &PredictionInput<'_>) -> Adjustment {
    let Some((me, them)) = both_teams(input) else {
        return Adjustment::none();
    };
    let top: HashSet<TeamKey> = input
        .all_teams
        .iter()
        .filter(|t| t.is_ranked() && t.rank <= input.rules.top_team_rank)
        .map(Team::key)
        .collect();
    if top.is_empty() {
        return Adjustment::none();
    }
    let record = |key: &TeamKey| {
        let vs_top: Vec<&Match> = completed(input.matches)
            .filter(|m| {
                m.opponent_of(key)
                    .map(TeamKey::new)
                    .is_some_and(|opp| opp != *key && top.contains(&opp))
            })
            .collect();
        let wins = vs_top.iter().filter(|m| m.is_winner(key)).count();
        (wins, vs_top.len())
    };
    let (my_wins, my_played) = record(&me.key());
    let (their_wins, their_played) = record(&them.key());
    if my_played < 2 || their_played < 2 {
        return Adjustment::none();
    }
    let my_rate = my_wins as f64 / my_played as f64;
    let their_rate = their_wins as f64 / their_played as f64;
    if my_rate >= 0.6 && their_rate < 0.4 {
        Adjustment::new(
            5,
            format!("Strong vs top teams ({my_wins}-{} record)", my_played - my_wins),
        )
    } else if their_rate >= 0.6 && my_rate < 0.4 {
        Adjustment::new(
            -5,
            format!(
                "They beat top teams ({their_wins}-{} record)",
                their_played - their_wins
            ),
        )
    } else {
        Adjustment::none()
    }
}
