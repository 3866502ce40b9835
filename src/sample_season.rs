use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::league::{LeagueRules, SeasonContext, division_name};
use crate::model::{
    BattingStats, BowlingStats, DEFAULT_WINNER_POINTS, Match, MatchStatus, Player, Team,
    derive_team_id,
};
use crate::snapshot::SeasonSnapshot;

const TEAM_NAMES: &[&str] = &[
    "Redmond Royals",
    "Bellevue Blasters",
    "Kirkland Kings",
    "Seattle Strikers",
    "Issaquah Eagles",
    "Bothell Bulls",
    "Sammamish Sixers",
    "Renton Rangers",
    "Everett Warriors",
    "Tacoma Titans",
    "Lynnwood Lions",
    "Kent Knights",
    "Puyallup Panthers",
    "Woodinville Wolves",
    "Mercer Mavericks",
    "Auburn Avengers",
];

const GROUNDS: &[&str] = &["Marymoor 1", "Marymoor 2", "Perrigo Park", "Hidden Valley"];

const FIRST_NAMES: &[&str] = &[
    "Arjun", "Rahul", "Vikram", "Sanjay", "Imran", "Kiran", "Deepak", "Nikhil", "Faisal",
    "Rohan", "Aditya", "Manoj",
];
const LAST_NAMES: &[&str] = &[
    "Sharma", "Patel", "Khan", "Reddy", "Iyer", "Singh", "Nair", "Das", "Rao", "Gupta",
];

#[derive(Debug, Clone)]
pub struct SampleSeasonConfig {
    pub seed: u64,
    pub teams: usize,
    pub players_per_team: usize,
    pub completed_rounds: u32,
    pub first_match_day: NaiveDate,
    pub season: SeasonContext,
    pub rules: LeagueRules,
}

impl Default for SampleSeasonConfig {
    fn default() -> Self {
        Self {
            seed: 26,
            teams: 12,
            players_per_team: 9,
            completed_rounds: 5,
            first_match_day: NaiveDate::from_ymd_opt(2025, 6, 7).unwrap_or_default(),
            season: SeasonContext::default(),
            rules: LeagueRules::default(),
        }
    }
}

/// Round-robin pairings by the circle method; `None` marks a bye.
fn round_robin(teams: usize, rounds: u32) -> Vec<Vec<(usize, usize)>> {
    let mut slots: Vec<Option<usize>> = (0..teams).map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }
    let m = slots.len();
    let mut out = Vec::new();
    if m < 2 {
        return out;
    }
    for _ in 0..(rounds as usize).min(m - 1) {
        let pairs = (0..m / 2)
            .filter_map(|i| match (slots[i], slots[m - 1 - i]) {
                (Some(a), Some(b)) => Some((a, b)),
                _ => None,
            })
            .collect();
        out.push(pairs);
        if let Some(last) = slots.pop() {
            slots.insert(1, last);
        }
    }
    out
}

/// Deterministic synthetic season: standings, stat tables and a schedule
/// with the first `completed_rounds` rounds played.
pub fn generate_sample_season(cfg: &SampleSeasonConfig) -> SeasonSnapshot {
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let count = cfg.teams.clamp(2, TEAM_NAMES.len());
    let names: Vec<&str> = TEAM_NAMES[..count].to_vec();
    let strength: Vec<f64> = names.iter().map(|_| rng.gen_range(0.3..0.7)).collect();
    let division = division_name(cfg.season.division_id).unwrap_or("Div F").to_string();

    let mut wins = vec![0u32; count];
    let mut losses = vec![0u32; count];
    let mut points = vec![0i32; count];
    let mut matches = Vec::new();

    for (round, pairs) in round_robin(count, cfg.rules.regular_season_games)
        .into_iter()
        .enumerate()
    {
        let day = cfg.first_match_day + Duration::days(7 * round as i64);
        let played = (round as u32) < cfg.completed_rounds;
        for (slot, (a, b)) in pairs.into_iter().enumerate() {
            let mut m = Match {
                id: format!("r{}-{}", round + 1, slot + 1),
                date: day.format("%A %m/%d/%Y").to_string(),
                time: if slot % 2 == 0 { "09:00 AM" } else { "01:30 PM" }.to_string(),
                ground: GROUNDS[slot % GROUNDS.len()].to_string(),
                team1: names[a].to_string(),
                team2: names[b].to_string(),
                umpire1: names[(a + 2) % count].to_string(),
                umpire2: names[(b + 2) % count].to_string(),
                match_type: "League".to_string(),
                winner: String::new(),
                runner_up: String::new(),
                status: MatchStatus::Upcoming,
                date_parsed: Some(day.format("%Y-%m-%d").to_string()),
                winner_points: DEFAULT_WINNER_POINTS,
                loser_points: 0,
            };
            if played {
                let p_a = strength[a] / (strength[a] + strength[b]);
                let (w, l) = if rng.gen_bool(p_a) { (a, b) } else { (b, a) };
                m.status = MatchStatus::Completed;
                m.winner = names[w].to_string();
                m.runner_up = names[l].to_string();
                m.winner_points = rng.gen_range(22..=45);
                m.loser_points = rng.gen_range(0..=12);
                wins[w] += 1;
                losses[l] += 1;
                points[w] += m.winner_points;
                points[l] += m.loser_points;
            }
            matches.push(m);
        }
    }

    let mut order: Vec<usize> = (0..count).collect();
    order.sort_by(|&x, &y| points[y].cmp(&points[x]).then(wins[y].cmp(&wins[x])));
    let mut teams: Vec<Team> = order
        .iter()
        .enumerate()
        .map(|(pos, &idx)| Team {
            name: names[idx].to_string(),
            division: division.clone(),
            wins: wins[idx],
            losses: losses[idx],
            rank: pos as u32 + 1,
            points: points[idx],
        })
        .collect();
    teams.sort_by_key(|t| t.rank);

    let mut batsmen = Vec::new();
    let mut bowlers = Vec::new();
    for (idx, name) in names.iter().enumerate() {
        let team_id = derive_team_id(name, cfg.season);
        for slot in 0..cfg.players_per_team {
            let player_name = format!(
                "{} {}",
                FIRST_NAMES[(idx + slot) % FIRST_NAMES.len()],
                LAST_NAMES[(idx * 3 + slot) % LAST_NAMES.len()]
            );
            let innings = rng.gen_range(2..=cfg.completed_rounds.max(2));
            let average = rng.gen_range(6.0..45.0) * (0.6 + strength[idx]);
            let runs = (average * innings as f64).round() as u32;
            let fours = runs / rng.gen_range(8..=20);
            let sixes = runs / rng.gen_range(18..=60);
            batsmen.push(Player {
                name: player_name.clone(),
                team: name.to_string(),
                batting: Some(BattingStats {
                    runs,
                    innings,
                    average: (average * 100.0).round() / 100.0,
                    strike_rate: rng.gen_range(70.0..145.0),
                    highest_score: (runs / innings.max(1) + rng.gen_range(0..30)).to_string(),
                    rank: 0,
                    fours,
                    sixes,
                }),
                bowling: None,
                player_id: Some(format!("{}{:02}", &team_id[..4], slot)),
                team_id: Some(team_id.clone()),
            });
            if slot % 2 == 1 {
                let overs = rng.gen_range(6.0..24.0_f64).round();
                let economy: f64 = rng.gen_range(3.4..6.4);
                let wickets: u32 = rng.gen_range(1..=14);
                let conceded = (overs * economy).round() as u32;
                bowlers.push(Player {
                    name: player_name,
                    team: name.to_string(),
                    batting: None,
                    bowling: Some(BowlingStats {
                        wickets,
                        overs,
                        runs: conceded,
                        average: conceded as f64 / wickets as f64,
                        economy: (economy * 100.0).round() / 100.0,
                        rank: 0,
                    }),
                    player_id: Some(format!("{}{:02}", &team_id[..4], slot)),
                    team_id: Some(team_id.clone()),
                });
            }
        }
    }
    rank_batsmen(&mut batsmen);
    rank_bowlers(&mut bowlers);

    SeasonSnapshot {
        season: Some(cfg.season),
        teams,
        batsmen,
        bowlers,
        matches,
        scorecards: Vec::new(),
    }
}

// League-wide stat tables: most runs first, most wickets then economy.
fn rank_batsmen(players: &mut [Player]) {
    let runs = |p: &Player| p.batting.as_ref().map(|b| b.runs).unwrap_or(0);
    players.sort_by(|a, b| runs(b).cmp(&runs(a)));
    for (pos, p) in players.iter_mut().enumerate() {
        if let Some(b) = p.batting.as_mut() {
            b.rank = pos as u32 + 1;
        }
    }
}

fn rank_bowlers(players: &mut [Player]) {
    let key = |p: &Player| {
        p.bowling
            .as_ref()
            .map(|b| (b.wickets, b.economy))
            .unwrap_or((0, f64::MAX))
    };
    players.sort_by(|a, b| {
        let (wa, ea) = key(a);
        let (wb, eb) = key(b);
        wb.cmp(&wa).then(ea.total_cmp(&eb))
    });
    for (pos, p) in players.iter_mut().enumerate() {
        if let Some(b) = p.bowling.as_mut() {
            b.rank = pos as u32 + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_season() {
        let cfg = SampleSeasonConfig::default();
        assert_eq!(generate_sample_season(&cfg), generate_sample_season(&cfg));
    }

    #[test]
    fn every_team_plays_once_per_round() {
        let rounds = round_robin(12, 7);
        assert_eq!(rounds.len(), 7);
        for pairs in &rounds {
            let mut seen: Vec<usize> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), 12);
        }
        let odd = round_robin(5, 4);
        assert!(odd.iter().all(|pairs| pairs.len() == 2));
    }

    #[test]
    fn standings_match_results() {
        let cfg = SampleSeasonConfig::default();
        let season = generate_sample_season(&cfg);
        let completed = season.matches.iter().filter(|m| m.is_completed()).count() as u32;
        let wins: u32 = season.teams.iter().map(|t| t.wins).sum();
        assert_eq!(completed, wins);
        assert_eq!(completed, 6 * cfg.completed_rounds);
        let ranks: Vec<u32> = season.teams.iter().map(|t| t.rank).collect();
        assert_eq!(ranks, (1..=12).collect::<Vec<_>>());
        assert!(season.batsmen.iter().all(|p| p.team_id.as_deref().map(str::len) == Some(8)));
    }
}
