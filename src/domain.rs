//! Domain models used by the backend: game modes, level sources, candidates and levels.

use serde::{Deserialize, Serialize};

/// Matching semantics the player is asked to apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
  /// Substring search (regex used as-is).
  #[default]
  Search,
  /// Anchored at the start (`^core`).
  Match,
  /// Whole string (`^core$`).
  FullMatch,
}

impl GameMode {
  /// Short hint appended to level descriptions.
  pub fn label(self) -> &'static str {
    match self {
      GameMode::Search => "(find substring)",
      GameMode::Match => "(must start with...)",
      GameMode::FullMatch => "(full match)",
    }
  }
}

/// Where did we get the level from?
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LevelSource {
  Procedural, // composed on the fly
  LocalBank,  // from user-provided TOML bank
  Seed,       // built-in curated levels
  Fallback,   // last resort when everything else was degenerate
}

/// One falling string, with the authoritative match verdict for the level's regex.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
  pub text: String,
  pub is_match: bool,
}

/// Curated level as written by a human: raw regex plus candidate strings.
#[derive(Clone, Debug)]
pub struct BankLevel {
  pub id: String,
  pub difficulty: u32,
  pub raw_regex: String,
  pub description: String,
  pub candidates: Vec<String>,
  pub source: LevelSource,
}

/// A level served to a client and kept in memory for answer checks.
#[derive(Clone, Debug, Serialize)]
pub struct Level {
  pub id: String,
  pub difficulty: u32,
  pub mode: GameMode,
  pub source: LevelSource,
  pub regex: String,
  pub description: String,
  pub candidates: Vec<Candidate>,
}
