use std::path::PathBuf;

use anyhow::{Context, Result};

use arcl_scout::config;
use arcl_scout::sample_season::{SampleSeasonConfig, generate_sample_season};
use arcl_scout::snapshot;

fn main() -> Result<()> {
    config::load_dotenv();
    config::init_tracing();
    let cfg = config::global().context("load configuration")?;

    let mut args = std::env::args().skip(1);
    let out = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_season.json"));
    let seed = args
        .next()
        .map(|raw| raw.parse::<u64>().with_context(|| format!("invalid seed `{raw}`")))
        .transpose()?
        .unwrap_or(26);

    let season = generate_sample_season(&SampleSeasonConfig {
        seed,
        season: cfg.season,
        rules: cfg.rules,
        ..SampleSeasonConfig::default()
    });
    snapshot::save_snapshot(&out, &season)?;

    println!(
        "Wrote {} teams, {} batsmen, {} bowlers, {} matches to {}",
        season.teams.len(),
        season.batsmen.len(),
        season.bowlers.len(),
        season.matches.len(),
        out.display()
    );
    Ok(())
}
