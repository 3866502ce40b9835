use std::path::PathBuf;

use arcl_scout::form::{self, FormRating};
use arcl_scout::league::{LeagueRules, SeasonContext};
use arcl_scout::predictor::{Confidence, Factor};
use arcl_scout::report::{self, ReportRequest, ScoutingReport};
use arcl_scout::report_export;
use arcl_scout::scenarios::RankMovement;
use arcl_scout::snapshot::{SeasonData, load_snapshot};

fn fixture() -> SeasonData {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/season_snapshot.json");
    load_snapshot(&path)
        .expect("load fixture")
        .into_season_data(SeasonContext::default())
}

fn hawks_vs_owls(data: &SeasonData) -> ScoutingReport {
    report::build_scouting_report(
        data,
        &ReportRequest {
            my_team: "Seattle Hawks",
            opponent: "redmond owls",
            ground: None,
            rules: LeagueRules::default(),
        },
    )
}

fn output_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("test-output")
        .join(name)
}

#[test]
fn recent_form_reads_oldest_first() {
    let data = fixture();
    let hawks = form::analyze_team_form("Seattle Hawks", &data.matches);
    assert_eq!(hawks.recent_record, "W-W-W");
    assert_eq!(hawks.streak, "Won 3");
    assert_eq!(hawks.form_rating, FormRating::Good);
    assert_eq!(hawks.points_momentum, "+100 pts in last 3");

    let owls = form::analyze_team_form("Redmond Owls", &data.matches);
    assert_eq!(owls.recent_record, "L-W-W");
    assert_eq!(owls.streak, "Won 2");
    assert_eq!(owls.form_rating, FormRating::Average);

    let nobody = form::analyze_team_form("Tacoma Titans", &data.matches);
    assert_eq!(nobody.recent_record, "");
    assert_eq!(nobody.streak, "No streak");
    assert_eq!(nobody.form_rating, FormRating::Poor);
    assert_eq!(nobody.form_rating.label(), "Cold");
    assert_eq!(nobody.points_momentum, "+0 pts in last 0");
}

#[test]
fn season_record_splits_schedule() {
    let data = fixture();
    let record = form::season_record("Kirkland Kites", &data.matches);
    assert_eq!((record.wins, record.losses), (1, 2));
    assert_eq!(record.completed.len(), 3);
    // the cancelled fixture is neither played nor upcoming
    assert_eq!(record.upcoming.len(), 1);
    assert_eq!(
        form::upcoming_opponents("Redmond Owls", &data.matches),
        vec!["Bothell Crows".to_string(), "Seattle Hawks".to_string()]
    );
}

#[test]
fn prediction_combines_every_factor() {
    let data = fixture();
    let report = hawks_vs_owls(&data);
    let p = &report.prediction;

    assert_eq!(report.opponent, "Redmond Owls");
    assert_eq!(report.season_label, "Div F / Summer 2025");
    assert_eq!(p.win_probability, 85);
    assert_eq!(p.confidence, Confidence::High);
    assert!(!p.must_win);
    assert!(!p.is_playoff);

    let factors: Vec<Factor> = p.contributions.iter().map(|c| c.factor).collect();
    assert_eq!(
        factors,
        vec![
            Factor::HeadToHead,
            Factor::Ranking,
            Factor::RecentForm,
            Factor::Streak,
            Factor::PlayerQuality,
            Factor::SquadDepth,
        ]
    );
    let total: i32 = p.contributions.iter().map(|c| c.delta).sum();
    assert_eq!(total, 43);

    assert_eq!(
        p.key_factors,
        vec![
            "H2H advantage (1-0 this season)",
            "Higher ranked (#1 vs #2)",
            "Better form (3-0 vs 2-1)",
            "Hot streak (Won 3)",
            "Superior batting (Top 3 avg: 30.0 vs 20.0)",
            "Tighter bowling (Top 3 econ: 4.00 vs 5.33)",
            "Superior depth (4 quality players vs 1)",
            "Strong ground record (3-0 at Marymoor 1)",
            "Their strong ground record (2-0 at Perrigo Park)",
        ]
    );

    let outcomes: Vec<&str> = p
        .points_scenario
        .scenarios
        .iter()
        .map(|s| s.description.as_str())
        .collect();
    assert_eq!(outcomes, vec!["Dominant win", "Solid win", "Close win", "Close loss"]);
    assert!(
        p.points_scenario
            .scenarios
            .iter()
            .all(|s| s.movement == RankMovement::Down && s.rank_change == "↓ to #2")
    );
}

#[test]
fn opponent_scouting_uses_team_ids_and_names() {
    let data = fixture();
    let report = hawks_vs_owls(&data);
    let analysis = &report.opponent_analysis;

    let batsmen: Vec<&str> = analysis
        .dangerous_batsmen
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(batsmen, vec!["Rohan Gupta", "Kiran Patel", "Faisal Sheikh"]);
    assert!(analysis.weak_batsmen.is_empty());
    assert_eq!(analysis.dangerous_bowlers[0].name, "Aditya Singh");

    assert_eq!(
        analysis.recommendations,
        vec![
            "Cautious approach vs Aditya Singh - dangerous striker with 12 wickets",
            "Patient approach needed - economical bowler restricting runs",
            "Limited bowling depth - attack middle overs aggressively",
            "Attack Rohan Gupta with best bowlers - dangerous with 150 runs",
            "Target middle/lower order - limited depth after top 2",
            "Disciplined cricket essential - championship-caliber opposition",
        ]
    );

    assert_eq!(report.player_cards.len(), 6);
    let rohan = &report.player_cards[0];
    let tags: Vec<&str> = rohan.batting.iter().map(|i| i.tag).collect();
    assert_eq!(tags, vec!["balanced attacking", "high-impact", "solid"]);
    let aditya = report
        .player_cards
        .iter()
        .find(|c| c.name == "Aditya Singh")
        .expect("bowler card");
    let tags: Vec<&str> = aditya.bowling.iter().map(|i| i.tag).collect();
    assert_eq!(tags, vec!["outstanding average", "economical", "strike bowler"]);
}

#[test]
fn schedule_outlook_covers_upcoming_fixtures() {
    let data = fixture();
    let pool = report::outlook_pool(2).expect("pool");
    let outlook = report::schedule_outlook(&data, "Seattle Hawks", LeagueRules::default(), Some(pool));
    let opponents: Vec<&str> = outlook.iter().map(|o| o.opponent.as_str()).collect();
    assert_eq!(opponents, vec!["Redmond Owls", "Kirkland Kites"]);
    assert!(
        outlook
            .iter()
            .all(|o| (15..=85).contains(&o.prediction.win_probability))
    );
}

#[test]
fn report_exports_to_json_and_xlsx() {
    let data = fixture();
    let report = hawks_vs_owls(&data);

    let json_path = output_path("hawks_vs_owls.json");
    report_export::export_report_json(&json_path, &report).expect("json export");
    let raw = std::fs::read_to_string(&json_path).expect("read json");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    assert_eq!(value["prediction"]["win_probability"], 85);
    assert_eq!(value["prediction"]["confidence"], "high");

    let xlsx_path = output_path("hawks_vs_owls.xlsx");
    let summary = report_export::export_report_xlsx(&xlsx_path, &report).expect("xlsx export");
    assert_eq!(summary.key_factors, 9);
    assert_eq!(summary.scenarios, 4);
    assert_eq!(summary.batsmen, 3);
    assert_eq!(summary.bowlers, 3);
    assert_eq!(summary.recommendations, 6);
    assert!(xlsx_path.exists());
}
