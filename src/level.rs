//! Level adapter: turns a composed pattern into the pattern and candidate list a
//! player actually sees for one game mode.
//!
//! `build_level` is the plain pipeline (compose, anchor, transform, shuffle).
//! `build_verified_level` re-applies the final regex to every candidate and
//! regenerates until the level has at least one match and one non-match.
//! `adapt_bank_level` runs curated levels through the same mode rules.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use tracing::{debug, warn};

use crate::composer::{compose, ComposedLevel};
use crate::domain::{BankLevel, Candidate, GameMode};

/// Alphabet for search-mode noise around correct samples.
pub const NOISE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789_-.";
/// Suffix appended to some correct samples in match mode.
pub const MATCH_TAIL: &str = "...";

const NOISE_MAX: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
  /// A regex that should compile did not.
  InvalidRegex { regex: String, reason: String },
  /// Every attempt produced a level with no matches or no non-matches.
  Degenerate { attempts: usize },
}

impl fmt::Display for LevelError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LevelError::InvalidRegex { regex, reason } => write!(f, "invalid regex {}: {}", regex, reason),
      LevelError::Degenerate { attempts } => {
        write!(f, "no playable level after {} attempts", attempts)
      }
    }
  }
}

impl std::error::Error for LevelError {}

/// Correct and wrong samples after the mode transformation, before shuffling.
#[derive(Clone, Debug)]
pub struct ModeAdapted {
  pub correct: Vec<String>,
  pub wrong: Vec<String>,
}

/// Adapter output: the regex to display/evaluate and the shuffled candidates.
#[derive(Clone, Debug)]
pub struct LevelResult {
  pub regex: String,
  pub core_regex: String,
  pub description: String,
  pub candidates: Vec<String>,
}

/// A level whose candidates have been classified against its final regex.
#[derive(Clone, Debug)]
pub struct ClassifiedLevel {
  pub regex: String,
  pub description: String,
  pub candidates: Vec<Candidate>,
  pub attempts: usize,
}

impl ClassifiedLevel {
  /// At least one candidate matches and at least one does not.
  pub fn is_playable(&self) -> bool {
    is_playable(&self.candidates)
  }
}

/// Wrap the core pattern with the anchors the mode calls for.
pub fn anchor(core: &str, mode: GameMode) -> String {
  match mode {
    GameMode::Search => core.to_string(),
    GameMode::Match => format!("^{}", core),
    GameMode::FullMatch => format!("^{}$", core),
  }
}

/// Apply the mode's per-candidate transformation. Wrong samples pass through unchanged.
pub fn adapt_to_mode<R: Rng + ?Sized>(composed: ComposedLevel, mode: GameMode, rng: &mut R) -> ModeAdapted {
  let correct = match mode {
    GameMode::FullMatch => composed.correct,
    GameMode::Match => composed
      .correct
      .into_iter()
      .map(|s| if rng.gen_bool(0.5) { s + MATCH_TAIL } else { s })
      .collect(),
    GameMode::Search => composed.correct.into_iter().map(|s| add_noise(&s, rng)).collect(),
  };
  ModeAdapted { correct, wrong: composed.wrong }
}

/// Compose, anchor, transform and shuffle one level.
pub fn build_level<R: Rng + ?Sized>(difficulty: u32, mode: GameMode, rng: &mut R) -> LevelResult {
  let composed = compose(difficulty, rng);
  let core_regex = composed.regex.clone();
  let description = format!("{} {}", composed.composition.describe(), mode.label());
  let adapted = adapt_to_mode(composed, mode, rng);

  let mut candidates = adapted.correct;
  candidates.extend(adapted.wrong);
  candidates.shuffle(rng);

  LevelResult {
    regex: anchor(&core_regex, mode),
    core_regex,
    description,
    candidates,
  }
}

/// Re-apply `regex` to every candidate. This verdict is authoritative; the
/// composer's own bookkeeping does not survive noise or anchoring.
pub fn classify(regex: &str, candidates: &[String]) -> Result<Vec<Candidate>, LevelError> {
  let re = compile(regex)?;
  Ok(
    candidates
      .iter()
      .map(|text| Candidate { text: text.clone(), is_match: re.is_match(text) })
      .collect(),
  )
}

pub fn compile(regex: &str) -> Result<Regex, LevelError> {
  Regex::new(regex).map_err(|e| LevelError::InvalidRegex {
    regex: regex.to_string(),
    reason: e.to_string(),
  })
}

/// `build_level` plus classification, regenerating degenerate levels up to `max_attempts` times.
pub fn build_verified_level<R: Rng + ?Sized>(
  difficulty: u32,
  mode: GameMode,
  max_attempts: usize,
  rng: &mut R,
) -> Result<ClassifiedLevel, LevelError> {
  let attempts = max_attempts.max(1);
  for attempt in 1..=attempts {
    let level = build_level(difficulty, mode, rng);
    let candidates = classify(&level.regex, &level.candidates)?;
    if is_playable(&candidates) {
      return Ok(ClassifiedLevel {
        regex: level.regex,
        description: level.description,
        candidates,
        attempts: attempt,
      });
    }
    debug!(target: "level", %difficulty, ?mode, attempt, core = %level.core_regex, "Degenerate level; regenerating");
  }
  Err(LevelError::Degenerate { attempts })
}

/// Run a curated level through the mode rules. When anchoring leaves no
/// matching candidate, the raw regex is served instead.
pub fn adapt_bank_level<R: Rng + ?Sized>(
  bank: &BankLevel,
  mode: GameMode,
  rng: &mut R,
) -> Result<ClassifiedLevel, LevelError> {
  let raw = bank.raw_regex.as_str();
  let mut regex = anchor_bank(raw, mode);

  let mut texts = bank.candidates.clone();
  texts.shuffle(rng);

  let mut candidates = classify(&regex, &texts)?;
  if mode != GameMode::Search && !candidates.iter().any(|c| c.is_match) {
    warn!(target: "level", id = %bank.id, ?mode, "Bank level has no match in this mode; reverting to raw regex");
    regex = raw.to_string();
    candidates = classify(&regex, &texts)?;
  }

  Ok(ClassifiedLevel {
    regex,
    description: format!("{} {}", bank.description, mode.label()),
    candidates,
    attempts: 1,
  })
}

fn anchor_bank(raw: &str, mode: GameMode) -> String {
  // A bare `a|b` would bind the anchors to the outer branches only.
  let core = if has_top_level_alternation(raw) && mode != GameMode::Search {
    format!("(?:{})", raw)
  } else {
    raw.to_string()
  };
  match mode {
    GameMode::Search => core,
    GameMode::FullMatch => {
      let mut out = core;
      if !out.starts_with('^') {
        out.insert(0, '^');
      }
      if !out.ends_with('$') {
        out.push('$');
      }
      out
    }
    GameMode::Match => {
      let mut out = core;
      if !out.starts_with('^') {
        out.insert(0, '^');
      }
      if out.ends_with('$') && !raw.ends_with('$') {
        out.pop();
      }
      out
    }
  }
}

fn has_top_level_alternation(pattern: &str) -> bool {
  let mut depth = 0i32;
  let mut in_class = false;
  let mut escaped = false;
  for ch in pattern.chars() {
    if escaped {
      escaped = false;
      continue;
    }
    match ch {
      '\\' => escaped = true,
      '[' if !in_class => in_class = true,
      ']' if in_class => in_class = false,
      '(' if !in_class => depth += 1,
      ')' if !in_class => depth -= 1,
      '|' if !in_class && depth == 0 => return true,
      _ => {}
    }
  }
  false
}

fn is_playable(candidates: &[Candidate]) -> bool {
  candidates.iter().any(|c| c.is_match) && candidates.iter().any(|c| !c.is_match)
}

fn noise<R: Rng + ?Sized>(rng: &mut R) -> String {
  let len = rng.gen_range(1..=NOISE_MAX);
  (0..len)
    .map(|_| NOISE_ALPHABET.choose(rng).copied().map(char::from).unwrap_or('_'))
    .collect()
}

fn add_noise<R: Rng + ?Sized>(sample: &str, rng: &mut R) -> String {
  match rng.gen_range(0..3) {
    0 => format!("{}{}", noise(rng), sample),
    1 => format!("{}{}", sample, noise(rng)),
    _ => {
      let prefix = noise(rng);
      let suffix = noise(rng);
      format!("{}{}{}", prefix, sample, suffix)
    }
  }
}
