use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};
use tracing::info;

use crate::model::Player;
use crate::report::ScoutingReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub key_factors: usize,
    pub scenarios: usize,
    pub batsmen: usize,
    pub bowlers: usize,
    pub recommendations: usize,
}

pub fn export_report_json(path: &Path, report: &ScoutingReport) -> Result<()> {
    ensure_parent(path)?;
    let data = serde_json::to_string_pretty(report).context("serialize scouting report")?;
    fs::write(path, data).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "scouting report json written");
    Ok(())
}

pub fn export_report_xlsx(path: &Path, report: &ScoutingReport) -> Result<ExportSummary> {
    ensure_parent(path)?;

    let summary_rows = summary_rows(report);
    let factor_rows = factor_rows(report);
    let scenario_rows = scenario_rows(report);
    let batsmen_rows = batsmen_rows(report);
    let bowler_rows = bowler_rows(report);
    let strategy_rows = strategy_rows(report);

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summary")?;
        write_rows(sheet, &summary_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Key Factors")?;
        write_rows(sheet, &factor_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Scenarios")?;
        write_rows(sheet, &scenario_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Batsmen")?;
        write_rows(sheet, &batsmen_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Bowlers")?;
        write_rows(sheet, &bowler_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Strategy")?;
        write_rows(sheet, &strategy_rows)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    let summary = ExportSummary {
        key_factors: factor_rows.len().saturating_sub(1),
        scenarios: scenario_rows.len().saturating_sub(1),
        batsmen: batsmen_rows.len().saturating_sub(1),
        bowlers: bowler_rows.len().saturating_sub(1),
        recommendations: strategy_rows.len().saturating_sub(1),
    };
    info!(path = %path.display(), ?summary, "scouting report workbook written");
    Ok(summary)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create dir {}", dir.display()))?;
    }
    Ok(())
}

fn summary_rows(report: &ScoutingReport) -> Vec<Vec<String>> {
    let p = &report.prediction;
    let pairs = [
        ("My team", report.my_team.clone()),
        ("Opponent", report.opponent.clone()),
        ("Season", report.season_label.clone()),
        ("Ground", report.ground.clone().unwrap_or_default()),
        ("Win probability", format!("{}%", p.win_probability)),
        ("Confidence", p.confidence.description().to_string()),
        ("Must win", yes_no(p.must_win)),
        ("Playoff", yes_no(p.is_playoff)),
        ("Current rank", p.points_scenario.current_rank.to_string()),
        ("Current points", p.points_scenario.current_points.to_string()),
        ("My form", report.my_form.recent_record.clone()),
        ("My streak", report.my_form.streak.clone()),
        ("My momentum", report.my_form.points_momentum.clone()),
        ("Opponent form", report.opponent_form.recent_record.clone()),
        ("Opponent streak", report.opponent_form.streak.clone()),
        ("Opponent momentum", report.opponent_form.points_momentum.clone()),
    ];
    let mut rows = vec![vec!["Field".to_string(), "Value".to_string()]];
    rows.extend(pairs.into_iter().map(|(k, v)| vec![k.to_string(), v]));
    rows
}

fn factor_rows(report: &ScoutingReport) -> Vec<Vec<String>> {
    let mut rows = vec![vec!["#".to_string(), "Factor".to_string()]];
    rows.extend(
        report
            .prediction
            .key_factors
            .iter()
            .enumerate()
            .map(|(idx, f)| vec![(idx + 1).to_string(), f.clone()]),
    );
    rows
}

fn scenario_rows(report: &ScoutingReport) -> Vec<Vec<String>> {
    let mut rows = vec![
        ["Outcome", "Points", "Projected points", "New rank", "Change", "Likelihood"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
    ];
    rows.extend(report.prediction.points_scenario.scenarios.iter().map(|s| {
        vec![
            s.description.clone(),
            s.points_range.clone(),
            s.projected_points.to_string(),
            s.new_rank.to_string(),
            s.rank_change.clone(),
            s.likelihood.label().to_string(),
        ]
    }));
    rows
}

fn insight_text(report: &ScoutingReport, player: &Player, bowling: bool) -> String {
    report
        .player_cards
        .iter()
        .find(|c| c.name == player.name)
        .map(|c| {
            let list = if bowling { &c.bowling } else { &c.batting };
            list.iter()
                .map(|i| format!("{} {}", i.icon, i.text))
                .collect::<Vec<_>>()
                .join("; ")
        })
        .unwrap_or_default()
}

fn batsmen_rows(report: &ScoutingReport) -> Vec<Vec<String>> {
    let mut rows = vec![
        ["Group", "Rank", "Name", "Runs", "Innings", "Average", "Strike rate", "Highest", "4s", "6s", "Insights"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
    ];
    let analysis = &report.opponent_analysis;
    let groups = [
        ("Dangerous", &analysis.dangerous_batsmen),
        ("Weak", &analysis.weak_batsmen),
    ];
    for (group, players) in groups {
        for player in players {
            let Some(b) = player.batting.as_ref() else {
                continue;
            };
            rows.push(vec![
                group.to_string(),
                b.rank.to_string(),
                player.name.clone(),
                b.runs.to_string(),
                b.innings.to_string(),
                format!("{:.1}", b.average),
                format!("{:.1}", b.strike_rate),
                b.highest_score.clone(),
                b.fours.to_string(),
                b.sixes.to_string(),
                insight_text(report, player, false),
            ]);
        }
    }
    rows
}

fn bowler_rows(report: &ScoutingReport) -> Vec<Vec<String>> {
    let mut rows = vec![
        ["Rank", "Name", "Wickets", "Overs", "Runs", "Average", "Economy", "Insights"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
    ];
    for player in &report.opponent_analysis.dangerous_bowlers {
        let Some(b) = player.bowling.as_ref() else {
            continue;
        };
        rows.push(vec![
            b.rank.to_string(),
            player.name.clone(),
            b.wickets.to_string(),
            format!("{:.1}", b.overs),
            b.runs.to_string(),
            format!("{:.1}", b.average),
            format!("{:.2}", b.economy),
            insight_text(report, player, true),
        ]);
    }
    rows
}

fn strategy_rows(report: &ScoutingReport) -> Vec<Vec<String>> {
    let mut rows = vec![vec!["#".to_string(), "Recommendation".to_string()]];
    rows.extend(
        report
            .opponent_analysis
            .recommendations
            .iter()
            .enumerate()
            .map(|(idx, r)| vec![(idx + 1).to_string(), r.clone()]),
    );
    rows
}

fn yes_no(flag: bool) -> String {
    let label = if flag { "Yes" } else { "No" };
    label.to_string()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
