use arcl_scout::form::{self, TeamForm};
use arcl_scout::league::{LeagueRules, SeasonContext};
use arcl_scout::model::{Match, MatchStatus, Team};
use arcl_scout::predictor::{
    Confidence, Factor, FactorContribution, MUST_WIN_WARNING, PredictionInput, predict_match,
};
use arcl_scout::sample_season::{SampleSeasonConfig, generate_sample_season};

fn team(name: &str, rank: u32, points: i32, wins: u32, losses: u32) -> Team {
    Team {
        name: name.to_string(),
        division: "Div F".to_string(),
        wins,
        losses,
        rank,
        points,
    }
}

fn result(day: u32, winner: &str, loser: &str) -> Match {
    Match {
        id: format!("d{day}"),
        date: format!("Saturday 06/{day:02}/2025"),
        time: "09:00 AM".to_string(),
        ground: String::new(),
        team1: winner.to_string(),
        team2: loser.to_string(),
        umpire1: String::new(),
        umpire2: String::new(),
        match_type: "League".to_string(),
        winner: winner.to_string(),
        runner_up: loser.to_string(),
        status: MatchStatus::Completed,
        date_parsed: None,
        winner_points: 30,
        loser_points: 0,
    }
}

fn result_at(day: u32, winner: &str, loser: &str, ground: &str, winner_points: i32) -> Match {
    Match {
        ground: ground.to_string(),
        winner_points,
        ..result(day, winner, loser)
    }
}

fn only(factor: Factor, delta: i32) -> Vec<FactorContribution> {
    vec![FactorContribution { factor, delta }]
}

fn neutral_input<'a>(
    me: &'a Team,
    them: &'a Team,
    teams: &'a [Team],
    matches: &'a [Match],
    form: &'a TeamForm,
) -> PredictionInput<'a> {
    PredictionInput {
        my_team: Some(me),
        opponent: Some(them),
        my_form: form,
        opponent_form: form,
        all_teams: teams,
        matches,
        players: &[],
        selected_ground: None,
        season: SeasonContext::default(),
        rules: LeagueRules::default(),
    }
}

#[test]
fn head_to_head_sweep_adds_capped_bonus() {
    let teams = vec![team("Alpha", 6, 40, 2, 2), team("Beta", 6, 40, 2, 2)];
    let matches = vec![
        result(7, "Alpha", "Beta"),
        result(14, "Alpha", "Beta"),
        result(21, "Alpha", "Beta"),
    ];
    let form = TeamForm::empty();
    let p = predict_match(&neutral_input(&teams[0], &teams[1], &teams, &matches, &form));

    assert_eq!(p.win_probability, 70);
    assert_eq!(p.confidence, Confidence::Medium);
    assert_eq!(p.key_factors[0], "H2H advantage (3-0 this season)");
    assert!(!p.must_win);
}

#[test]
fn rank_gap_scales_by_three() {
    let teams = vec![team("Alpha", 1, 90, 3, 1), team("Beta", 5, 40, 2, 2)];
    let form = TeamForm::empty();
    let p = predict_match(&neutral_input(&teams[0], &teams[1], &teams, &[], &form));

    assert_eq!(p.win_probability, 62);
    assert_eq!(p.confidence, Confidence::Low);
    assert_eq!(p.key_factors, vec!["Higher ranked (#1 vs #5)".to_string()]);

    let p = predict_match(&neutral_input(&teams[1], &teams[0], &teams, &[], &form));
    assert_eq!(p.win_probability, 38);
    assert_eq!(p.key_factors, vec!["Lower ranked (#5 vs #1)".to_string()]);
}

#[test]
fn must_win_warning_leads_key_factors() {
    let teams = vec![
        team("Eighth", 8, 90, 3, 2),
        team("Ninth", 9, 70, 2, 3),
        team("Tenth", 10, 60, 2, 3),
    ];
    let form = TeamForm::empty();
    let p = predict_match(&neutral_input(&teams[1], &teams[2], &teams, &[], &form));

    assert!(p.must_win);
    assert_eq!(p.key_factors[0], MUST_WIN_WARNING);
    assert_eq!(p.key_factors[1], "Higher ranked (#9 vs #10)");
    assert_eq!(p.win_probability, 53);
}

#[test]
fn playoff_match_has_no_scenarios() {
    let teams = vec![team("Alpha", 2, 120, 4, 3), team("Beta", 3, 100, 4, 3)];
    let form = TeamForm::empty();
    let p = predict_match(&neutral_input(&teams[0], &teams[1], &teams, &[], &form));

    assert!(p.is_playoff);
    assert!(p.points_scenario.scenarios.is_empty());
    assert_eq!(p.points_scenario.current_rank, 2);
    assert_eq!(p.points_scenario.current_points, 120);
}

#[test]
fn sample_season_predictions_stay_bounded_and_repeatable() {
    let snapshot = generate_sample_season(&SampleSeasonConfig::default());
    let data = snapshot.into_season_data(SeasonContext::default());

    for me in &data.teams {
        let my_form = form::analyze_team_form(&me.name, &data.matches);
        for them in data.teams.iter().filter(|t| t.name != me.name) {
            let their_form = form::analyze_team_form(&them.name, &data.matches);
            let input = PredictionInput {
                my_team: Some(me),
                opponent: Some(them),
                my_form: &my_form,
                opponent_form: &their_form,
                all_teams: &data.teams,
                matches: &data.matches,
                players: &data.players,
                selected_ground: Some("Marymoor 1"),
                season: data.season,
                rules: LeagueRules::default(),
            };
            let first = predict_match(&input);
            assert!((15..=85).contains(&first.win_probability), "{} vs {}", me.name, them.name);
            assert!(first.points_scenario.scenarios.len() <= 4);
            assert_eq!(first, predict_match(&input));
        }
    }
}

#[test]
fn dominant_winners_get_bonus() {
    let teams = vec![team("Alpha", 6, 85, 2, 0), team("Beta", 6, 60, 2, 0)];
    let matches = vec![
        result_at(7, "Alpha", "Gamma", "", 45),
        result_at(14, "Alpha", "Delta", "", 40),
        result_at(7, "Beta", "Delta", "", 30),
        result_at(14, "Beta", "Gamma", "", 30),
    ];
    let form = TeamForm::empty();
    let p = predict_match(&neutral_input(&teams[0], &teams[1], &teams, &matches, &form));

    assert_eq!(p.win_probability, 55);
    assert_eq!(p.contributions, only(Factor::WinDominance, 5));
    assert_eq!(p.key_factors, vec!["Dominant wins (2/2 big victories)".to_string()]);

    let p = predict_match(&neutral_input(&teams[1], &teams[0], &teams, &matches, &form));
    assert_eq!(p.win_probability, 45);
    assert_eq!(
        p.key_factors,
        vec!["They win dominantly (2/2 big victories)".to_string()]
    );
}

#[test]
fn record_against_top_teams_counts() {
    let teams = vec![
        team("Top One", 1, 150, 4, 1),
        team("Top Two", 2, 130, 3, 2),
        team("Alpha", 5, 60, 2, 0),
        team("Beta", 5, 60, 0, 2),
    ];
    let matches = vec![
        result(7, "Alpha", "Top One"),
        result(14, "Alpha", "Top Two"),
        result(7, "Top Two", "Beta"),
        result(14, "Top One", "Beta"),
    ];
    let form = TeamForm::empty();
    let p = predict_match(&neutral_input(&teams[2], &teams[3], &teams, &matches, &form));

    assert_eq!(p.win_probability, 55);
    assert_eq!(p.contributions, only(Factor::TopTeams, 5));
    assert_eq!(p.key_factors, vec!["Strong vs top teams (2-0 record)".to_string()]);
}

#[test]
fn split_records_at_the_thresholds_stay_neutral() {
    let teams = vec![
        team("Top One", 1, 150, 4, 1),
        team("Top Two", 2, 130, 3, 2),
        team("Alpha", 5, 90, 3, 2),
        team("Beta", 5, 70, 2, 3),
    ];
    // Alpha 3-2 against the top two (0.6), Beta 2-3 (0.4).
    // Alpha 3 of 5 wins dominant (0.6), Beta 2 of 5 (0.4).
    let matches = vec![
        result_at(1, "Alpha", "Top One", "", 40),
        result_at(2, "Alpha", "Top One", "", 40),
        result_at(3, "Alpha", "Top One", "", 40),
        result_at(4, "Top Two", "Alpha", "", 30),
        result_at(5, "Top Two", "Alpha", "", 30),
        result_at(6, "Alpha", "Gamma", "", 30),
        result_at(7, "Alpha", "Gamma", "", 30),
        result_at(8, "Beta", "Top One", "", 40),
        result_at(9, "Beta", "Top One", "", 40),
        result_at(10, "Top Two", "Beta", "", 30),
        result_at(11, "Top Two", "Beta", "", 30),
        result_at(12, "Top Two", "Beta", "", 30),
        result_at(13, "Beta", "Gamma", "", 30),
        result_at(14, "Beta", "Gamma", "", 30),
        result_at(15, "Beta", "Gamma", "", 30),
    ];
    let form = TeamForm::empty();
    let p = predict_match(&neutral_input(&teams[2], &teams[3], &teams, &matches, &form));

    assert!(p.contributions.is_empty(), "{:?}", p.contributions);
    assert_eq!(p.win_probability, 50);
    assert!(p.key_factors.is_empty());
}

#[test]
fn selected_ground_uses_reduced_bonus_below_strong_record() {
    let teams = vec![team("Alpha", 6, 60, 1, 1), team("Beta", 6, 0, 0, 1)];
    let matches = vec![
        result_at(7, "Alpha", "Gamma", "Marymoor 1", 30),
        result_at(14, "Delta", "Alpha", "Marymoor 1", 30),
        result_at(7, "Gamma", "Beta", "marymoor 1", 30),
    ];
    let form = TeamForm::empty();
    let mut input = neutral_input(&teams[0], &teams[1], &teams, &matches, &form);
    input.selected_ground = Some("Marymoor 1");
    let p = predict_match(&input);

    assert_eq!(p.win_probability, 60);
    assert_eq!(p.contributions, only(Factor::Ground, 10));
    assert_eq!(
        p.key_factors,
        vec!["Better record at selected ground (1-1 vs 0-1)".to_string()]
    );
}

#[test]
fn unselected_grounds_add_up_to_the_cap() {
    let teams = vec![team("Alpha", 6, 90, 3, 3), team("Beta", 6, 0, 0, 3)];
    let mut matches = Vec::new();
    for (offset, venue) in ["Marymoor 1", "Perrigo Park", "Hidden Valley"].iter().enumerate() {
        let day = offset as u32 * 3 + 1;
        matches.push(result_at(day, "Alpha", "Gamma", venue, 30));
        matches.push(result_at(day + 1, "Delta", "Alpha", venue, 30));
        matches.push(result_at(day + 2, "Gamma", "Beta", venue, 30));
    }
    let form = TeamForm::empty();
    let p = predict_match(&neutral_input(&teams[0], &teams[1], &teams, &matches, &form));

    // 5 per ground across three grounds, clamped to 10
    assert_eq!(p.win_probability, 60);
    assert_eq!(p.contributions, only(Factor::Ground, 10));
    assert!(p.key_factors.is_empty());

    let one_ground: Vec<Match> = matches.into_iter().take(3).collect();
    let p = predict_match(&neutral_input(&teams[0], &teams[1], &teams, &one_ground, &form));
    assert_eq!(p.win_probability, 55);
    assert_eq!(p.contributions, only(Factor::Ground, 5));
}
