use std::env;
use std::path::PathBuf;

use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::league::{LeagueRules, SeasonContext, division_name};

pub const ENV_DIVISION_ID: &str = "ARCL_DIVISION_ID";
pub const ENV_SEASON_ID: &str = "ARCL_SEASON_ID";
pub const ENV_MY_TEAM: &str = "ARCL_MY_TEAM";
pub const ENV_REGULAR_SEASON_GAMES: &str = "ARCL_REGULAR_SEASON_GAMES";
pub const ENV_PLAYOFF_CUTOFF: &str = "ARCL_PLAYOFF_CUTOFF";
pub const ENV_TOP_TEAM_RANK: &str = "ARCL_TOP_TEAM_RANK";
pub const ENV_PARALLELISM: &str = "ARCL_PARALLELISM";
pub const ENV_SNAPSHOT: &str = "ARCL_SNAPSHOT";
pub const ENV_EXPORT_JSON: &str = "ARCL_EXPORT_JSON";
pub const ENV_EXPORT_XLSX: &str = "ARCL_EXPORT_XLSX";

const DEFAULT_PARALLELISM: usize = 4;

static CONFIG: OnceCell<ScoutConfig> = OnceCell::new();

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {key}: {message}")]
    InvalidValue {
        key: &'static str,
        value: String,
        message: String,
    },

    #[error("missing required setting {key}")]
    MissingValue { key: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoutConfig {
    pub season: SeasonContext,
    pub my_team: Option<String>,
    pub rules: LeagueRules,
    pub parallelism: usize,
    pub snapshot: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
    pub export_xlsx: Option<PathBuf>,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            season: SeasonContext::default(),
            my_team: None,
            rules: LeagueRules::default(),
            parallelism: DEFAULT_PARALLELISM,
            snapshot: None,
            export_json: None,
            export_xlsx: None,
        }
    }
}

impl ScoutConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let division_id = parse_u32(ENV_DIVISION_ID, get(ENV_DIVISION_ID))?
            .unwrap_or(defaults.season.division_id);
        if division_name(division_id).is_none() {
            return Err(ConfigError::InvalidValue {
                key: ENV_DIVISION_ID,
                value: division_id.to_string(),
                message: "unknown division".to_string(),
            });
        }
        let season_id =
            parse_u32(ENV_SEASON_ID, get(ENV_SEASON_ID))?.unwrap_or(defaults.season.season_id);

        let mut rules = defaults.rules;
        if let Some(games) = parse_u32(ENV_REGULAR_SEASON_GAMES, get(ENV_REGULAR_SEASON_GAMES))? {
            rules.regular_season_games = positive(ENV_REGULAR_SEASON_GAMES, games)?;
        }
        if let Some(cutoff) = parse_u32(ENV_PLAYOFF_CUTOFF, get(ENV_PLAYOFF_CUTOFF))? {
            rules.playoff_cutoff = positive(ENV_PLAYOFF_CUTOFF, cutoff)?;
        }
        if let Some(top) = parse_u32(ENV_TOP_TEAM_RANK, get(ENV_TOP_TEAM_RANK))? {
            rules.top_team_rank = positive(ENV_TOP_TEAM_RANK, top)?;
        }

        let parallelism = get(ENV_PARALLELISM)
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_PARALLELISM)
            .clamp(1, 32);

        Ok(Self {
            season: SeasonContext::new(division_id, season_id),
            my_team: get(ENV_MY_TEAM),
            rules,
            parallelism,
            snapshot: get(ENV_SNAPSHOT).map(PathBuf::from),
            export_json: get(ENV_EXPORT_JSON).map(PathBuf::from),
            export_xlsx: get(ENV_EXPORT_XLSX).map(PathBuf::from),
        })
    }

    pub fn require_my_team(&self) -> Result<&str, ConfigError> {
        self.my_team.as_deref().ok_or(ConfigError::MissingValue { key: ENV_MY_TEAM })
    }
}

fn parse_u32(key: &'static str, raw: Option<String>) -> Result<Option<u32>, ConfigError> {
    raw.map(|value| {
        value.parse::<u32>().map_err(|e| ConfigError::InvalidValue {
            key,
            value: value.clone(),
            message: e.to_string(),
        })
    })
    .transpose()
}

fn positive(key: &'static str, value: u32) -> Result<u32, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    Ok(value)
}

/// Loads `.env.local` then `.env` if present. Existing variables win.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

/// Process-wide config read from the environment on first use.
pub fn global() -> Result<&'static ScoutConfig, ConfigError> {
    CONFIG.get_or_try_init(ScoutConfig::from_env)
}

/// Stderr logging with `RUST_LOG` override.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("arcl_scout=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
