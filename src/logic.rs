//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Serving a new level for (difficulty, mode)
//!   - Looking up a level that was already served
//!   - Checking a picked candidate against the served level's regex

use tracing::{debug, error, instrument};

use crate::domain::GameMode;
use crate::protocol::{to_out, LevelOut};
use crate::state::AppState;
use crate::util::trunc_for_log;

/// Missing difficulty starts at 1; missing mode is substring search.
#[instrument(level = "info", skip(state))]
pub async fn new_level(state: &AppState, difficulty: Option<u32>, mode: Option<GameMode>) -> Result<LevelOut, String> {
  let difficulty = difficulty.unwrap_or(1);
  let mode = mode.unwrap_or_default();
  match state.choose_level(difficulty, mode).await {
    Ok((level, origin)) => {
      debug!(target: "level", id = %level.id, %origin, "Level ready for client");
      Ok(to_out(&level))
    }
    Err(e) => {
      error!(target: "level", %difficulty, ?mode, error = %e, "Could not produce a level");
      Err(format!("Could not produce a level: {}", e))
    }
  }
}

/// A previously served level, if it is still in the store.
#[instrument(level = "info", skip(state), fields(%level_id))]
pub async fn fetch_level(state: &AppState, level_id: &str) -> Option<LevelOut> {
  state.get_level(level_id).await.map(|l| to_out(&l))
}

/// Returns `(known, is_match)`. Unknown or evicted levels never match.
#[instrument(level = "info", skip(state, text), fields(%level_id, text_len = text.len()))]
pub async fn check_candidate(state: &AppState, level_id: &str, text: &str) -> (bool, bool) {
  match state.check_candidate(level_id, text).await {
    Some(is_match) => {
      debug!(target: "level", %level_id, text = %trunc_for_log(text, 64), is_match, "Candidate checked");
      (true, is_match)
    }
    None => {
      debug!(target: "level", %level_id, "Candidate check for unknown level");
      (false, false)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::GameConfig;

  #[tokio::test]
  async fn defaults_are_difficulty_one_search() {
    let state = AppState::with_config(GameConfig { seed: Some(9), ..GameConfig::default() });
    let level = new_level(&state, None, None).await.expect("level");
    assert_eq!(level.difficulty, 1);
    assert_eq!(level.mode, GameMode::Search);
    assert!(!level.regex.starts_with('^'));
  }

  #[tokio::test]
  async fn check_reports_unknown_levels() {
    let state = AppState::with_config(GameConfig { seed: Some(10), ..GameConfig::default() });
    assert_eq!(check_candidate(&state, "missing", "123").await, (false, false));

    let level = new_level(&state, Some(3), Some(GameMode::FullMatch)).await.expect("level");
    let hit = level.candidates.iter().find(|c| c.is_match).expect("a match");
    let miss = level.candidates.iter().find(|c| !c.is_match).expect("a miss");
    assert_eq!(check_candidate(&state, &level.id, &hit.text).await, (true, true));
    assert_eq!(check_candidate(&state, &level.id, &miss.text).await, (true, false));

    let again = fetch_level(&state, &level.id).await.expect("stored level");
    assert_eq!(again.regex, level.regex);
    assert!(fetch_level(&state, "missing").await.is_none());
  }
}
