use std::path::PathBuf;

use anyhow::{Context, Result};

use arcl_scout::config;
use arcl_scout::form;
use arcl_scout::report;
use arcl_scout::snapshot;

fn main() -> Result<()> {
    config::load_dotenv();
    config::init_tracing();
    let cfg = config::global().context("load configuration")?;

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| cfg.snapshot.clone())
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/season_snapshot.json"));
    let my_team = cfg.require_my_team()?;

    let data = snapshot::load_snapshot(&path)?.into_season_data(cfg.season);
    let record = form::season_record(my_team, &data.matches);
    println!(
        "{my_team}: {}-{} ({} to play)",
        record.wins,
        record.losses,
        record.upcoming.len()
    );
    for m in &record.completed {
        println!(
            "  {:<6} {} v {}: {}",
            m.short_date(),
            m.team1,
            m.team2,
            m.winner_name().unwrap_or("no result")
        );
    }

    let pool = report::outlook_pool(cfg.parallelism)?;
    let outlook = report::schedule_outlook(&data, my_team, cfg.rules, Some(pool));
    if outlook.is_empty() {
        println!("No upcoming fixtures.");
        return Ok(());
    }
    for fixture in &outlook {
        let p = &fixture.prediction;
        println!(
            "{:<10} vs {:<24} {:<16} {:>3}% {:<18}{}",
            fixture.date,
            fixture.opponent,
            fixture.ground,
            p.win_probability,
            p.confidence.description(),
            if p.must_win { " MUST WIN" } else { "" }
        );
        for factor in p.key_factors.iter().take(3) {
            println!("    - {factor}");
        }
    }
    Ok(())
}
