use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::info;

use arcl_scout::config;
use arcl_scout::insights::PlayerInsight;
use arcl_scout::report::{self, ReportRequest, ScoutingReport};
use arcl_scout::report_export;
use arcl_scout::snapshot;

const USAGE: &str = "usage: arcl_scout <snapshot.json> <opponent> [ground]";

fn main() -> Result<()> {
    config::load_dotenv();
    config::init_tracing();
    let cfg = config::global().context("load configuration")?;

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .map(PathBuf::from)
        .or_else(|| cfg.snapshot.clone())
        .context(USAGE)?;
    let Some(opponent) = args.next() else {
        bail!(USAGE);
    };
    let ground = args.next();
    let my_team = cfg.require_my_team()?;

    let data = snapshot::load_snapshot(&path)?.into_season_data(cfg.season);
    let report = report::build_scouting_report(
        &data,
        &ReportRequest {
            my_team,
            opponent: &opponent,
            ground: ground.as_deref(),
            rules: cfg.rules,
        },
    );

    print_report(&report);

    if let Some(out) = cfg.export_json.as_deref() {
        report_export::export_report_json(out, &report)?;
        println!("\nJSON report: {}", out.display());
    }
    if let Some(out) = cfg.export_xlsx.as_deref() {
        let summary = report_export::export_report_xlsx(out, &report)?;
        info!(?summary, "xlsx export finished");
        println!("Workbook: {}", out.display());
    }
    Ok(())
}

fn print_insights(label: &str, found: &[PlayerInsight]) {
    for insight in found {
        println!("      {label} {} {}", insight.icon, insight.text);
    }
}

fn print_report(report: &ScoutingReport) {
    let p = &report.prediction;
    println!("{} vs {} ({})", report.my_team, report.opponent, report.season_label);
    if let Some(ground) = &report.ground {
        println!("Ground: {ground}");
    }
    println!(
        "Win probability: {}% ({})",
        p.win_probability,
        p.confidence.description()
    );
    if p.is_playoff {
        println!("Playoff match");
    }

    println!("\nKey factors:");
    for factor in &p.key_factors {
        println!("  - {factor}");
    }

    let forms = [
        (&report.my_team, &report.my_form),
        (&report.opponent, &report.opponent_form),
    ];
    println!("\nForm:");
    for (name, form) in forms {
        println!(
            "  {name}: {} {} [{}] {} | {}",
            form.form_rating.icon(),
            form.form_rating.label(),
            form.recent_record,
            form.streak,
            form.points_momentum
        );
    }

    if !p.points_scenario.scenarios.is_empty() {
        println!(
            "\nRank scenarios (now #{} with {} pts):",
            p.points_scenario.current_rank, p.points_scenario.current_points
        );
        for s in &p.points_scenario.scenarios {
            println!(
                "  {:<13} {:<11} {:<10} {}",
                s.description,
                s.points_range,
                s.rank_change,
                s.likelihood.label()
            );
        }
    }

    println!("\nDangerous players:");
    for card in &report.player_cards {
        println!("  {}", card.name);
        print_insights("bat ", &card.batting);
        print_insights("bowl", &card.bowling);
    }

    println!("\nStrategy:");
    for rec in &report.opponent_analysis.recommendations {
        println!("  - {rec}");
    }
}
