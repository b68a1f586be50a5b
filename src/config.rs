//! Loading game configuration (generator knobs + optional level bank) from TOML.
//!
//! See `GameConfig` and `LevelCfg` for expected schema.

use serde::Deserialize;
use tracing::{error, info};

/// Every field is optional in TOML; missing values take the defaults below.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Requests above this difficulty are clamped down to it.
    pub max_difficulty: u32,
    /// Regeneration budget for degenerate procedural levels.
    pub max_attempts: usize,
    /// Serve curated bank levels before procedural ones.
    pub prefer_bank: bool,
    /// Fixed RNG seed for reproducible sessions.
    pub seed: Option<u64>,
    /// Capacity of the in-memory level store; oldest levels are evicted first.
    pub max_stored_levels: usize,
    pub levels: Vec<LevelCfg>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_difficulty: 12,
            max_attempts: 8,
            prefer_bank: false,
            seed: None,
            max_stored_levels: 512,
            levels: Vec::new(),
        }
    }
}

/// Curated level entry accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct LevelCfg {
    #[serde(default)]
    pub id: Option<String>,
    pub difficulty: u32,
    pub regex: String,
    #[serde(default)]
    pub description: Option<String>,
    pub candidates: Vec<String>,
}

pub fn parse_game_config(s: &str) -> Result<GameConfig, toml::de::Error> {
    toml::from_str::<GameConfig>(s)
}

/// Attempt to load `GameConfig` from GAME_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_game_config_from_env() -> Option<GameConfig> {
    let path = std::env::var("GAME_CONFIG_PATH").ok()?;
    match std::fs::read_to_string(&path) {
        Ok(s) => match parse_game_config(&s) {
            Ok(cfg) => {
                info!(target: "regexhunt_backend", %path, bank_levels = cfg.levels.len(), "Loaded game config (TOML)");
                Some(cfg)
            }
            Err(e) => {
                error!(target: "regexhunt_backend", %path, error = %e, "Failed to parse TOML config");
                None
            }
        },
        Err(e) => {
            error!(target: "regexhunt_backend", %path, error = %e, "Failed to read TOML config file");
            None
        }
    }
}
