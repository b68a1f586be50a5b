//! Application state: RNG handle, curated bank, level store, and selection logic.
//!
//! This module owns:
//!   - the generator RNG (seeded from config for reproducible sessions)
//!   - the curated bank (TOML entries first, then built-in seeds)
//!   - a bounded store of served levels, used to re-check player picks
//!
//! Selection policy: procedural levels by default, verified to contain at
//! least one match and one non-match. If generation keeps producing
//! degenerate levels we fall back to the bank, then to a hard fallback.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use regex::Regex;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::config::{load_game_config_from_env, GameConfig};
use crate::domain::{BankLevel, GameMode, Level, LevelSource};
use crate::level::{adapt_bank_level, build_verified_level, compile, ClassifiedLevel, LevelError};
use crate::seeds::{hard_fallback_level, seed_levels};
use crate::util::clamp_difficulty;

/// A served level plus its compiled matcher.
pub struct StoredLevel {
    pub level: Level,
    matcher: Regex,
}

impl StoredLevel {
    pub fn is_match(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }
}

/// Insertion-ordered map with a fixed capacity; the oldest level goes first.
pub struct LevelStore {
    by_id: HashMap<String, StoredLevel>,
    order: VecDeque<String>,
    capacity: usize,
}

impl LevelStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            by_id: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn insert(&mut self, level: Level, matcher: Regex) {
        while self.order.len() >= self.capacity {
            match self.order.pop_front() {
                Some(old) => {
                    self.by_id.remove(&old);
                }
                None => break,
            }
        }
        self.order.push_back(level.id.clone());
        self.by_id.insert(level.id.clone(), StoredLevel { level, matcher });
    }

    pub fn get(&self, id: &str) -> Option<&StoredLevel> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: GameConfig,
    pub bank: Arc<Vec<BankLevel>>,
    pub levels: Arc<RwLock<LevelStore>>,
    rng: Arc<Mutex<StdRng>>,
}

impl AppState {
    /// Build state from env: load config, then build the bank and RNG.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg = load_game_config_from_env().unwrap_or_default();
        Self::with_config(cfg)
    }

    pub fn with_config(config: GameConfig) -> Self {
        let mut bank = Vec::<BankLevel>::new();
        let mut ids = HashSet::<String>::new();

        // Config bank entries first; entries that do not compile are skipped.
        for lc in &config.levels {
            let id = lc.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
            if let Err(e) = validate_bank_regex(&lc.regex) {
                error!(target: "level", %id, regex = %lc.regex, error = %e, "Skipping bank level: invalid regex.");
                continue;
            }
            if !ids.insert(id.clone()) {
                warn!(target: "level", %id, "Skipping bank level: duplicate id.");
                continue;
            }
            bank.push(BankLevel {
                id,
                difficulty: lc.difficulty,
                raw_regex: lc.regex.clone(),
                description: lc.description.clone().unwrap_or_else(|| format!("Match /{}/", lc.regex)),
                candidates: lc.candidates.clone(),
                source: LevelSource::LocalBank,
            });
        }

        // Always add built-in seeds, but don't overwrite existing ids.
        for s in seed_levels() {
            if ids.insert(s.id.clone()) {
                bank.push(s);
            }
        }

        // Inventory summary by difficulty/source.
        let mut count_by_diff: HashMap<u32, (usize, usize)> = HashMap::new();
        for l in &bank {
            let entry = count_by_diff.entry(l.difficulty).or_insert((0, 0));
            match l.source {
                LevelSource::LocalBank => entry.0 += 1,
                _ => entry.1 += 1,
            }
        }
        for (difficulty, (local, seed)) in count_by_diff {
            info!(target: "level", %difficulty, local_bank = local, seed = seed, "Startup bank inventory");
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!(
            target: "regexhunt_backend",
            seeded = config.seed.is_some(),
            max_difficulty = config.max_difficulty,
            max_attempts = config.max_attempts,
            prefer_bank = config.prefer_bank,
            "Level generator ready"
        );

        Self {
            levels: Arc::new(RwLock::new(LevelStore::new(config.max_stored_levels))),
            bank: Arc::new(bank),
            rng: Arc::new(Mutex::new(rng)),
            config,
        }
    }

    /// Selection policy:
    /// (optional) curated bank first, then a verified procedural level,
    /// then the bank again, then the hard fallback.
    #[instrument(level = "info", skip(self), fields(%difficulty, ?mode))]
    pub async fn choose_level(&self, difficulty: u32, mode: GameMode) -> Result<(Level, &'static str), LevelError> {
        let difficulty = clamp_difficulty(difficulty, self.config.max_difficulty);
        let (classified, source, origin) = self.generate(difficulty, mode)?;
        let matcher = compile(&classified.regex)?;

        let level = Level {
            id: Uuid::new_v4().to_string(),
            difficulty,
            mode,
            source,
            regex: classified.regex,
            description: classified.description,
            candidates: classified.candidates,
        };
        let stored = {
            let mut store = self.levels.write().await;
            store.insert(level.clone(), matcher);
            store.len()
        };

        let matches = level.candidates.iter().filter(|c| c.is_match).count();
        info!(
            target: "level",
            id = %level.id,
            %difficulty,
            ?mode,
            regex = %level.regex,
            candidates = level.candidates.len(),
            matches,
            stored,
            %origin,
            "Level created"
        );
        Ok((level, origin))
    }

    /// Generation runs synchronously under the RNG lock; nothing here awaits.
    fn generate(
        &self,
        difficulty: u32,
        mode: GameMode,
    ) -> Result<(ClassifiedLevel, LevelSource, &'static str), LevelError> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        if self.config.prefer_bank {
            if let Some((level, source)) = self.try_bank(difficulty, mode, &mut rng) {
                return Ok((level, source, "bank_preferred"));
            }
        }

        match build_verified_level(difficulty, mode, self.config.max_attempts, &mut *rng) {
            Ok(level) => {
                debug!(target: "level", %difficulty, ?mode, attempts = level.attempts, "Procedural level verified");
                return Ok((level, LevelSource::Procedural, "procedural"));
            }
            Err(e) => {
                warn!(target: "level", %difficulty, ?mode, error = %e, "Procedural generation failed; trying bank");
            }
        }

        if let Some((level, source)) = self.try_bank(difficulty, mode, &mut rng) {
            return Ok((level, source, "bank_after_degenerate"));
        }

        let level = adapt_bank_level(&hard_fallback_level(difficulty), mode, &mut *rng)?;
        warn!(target: "level", %difficulty, ?mode, "Serving hard fallback level");
        Ok((level, LevelSource::Fallback, "hard_fallback"))
    }

    /// First playable entry of the difficulty band, visited in random order.
    fn try_bank(&self, difficulty: u32, mode: GameMode, rng: &mut StdRng) -> Option<(ClassifiedLevel, LevelSource)> {
        let mut pool = bank_band(&self.bank, difficulty);
        pool.shuffle(rng);
        for entry in pool {
            match adapt_bank_level(entry, mode, rng) {
                Ok(level) if level.is_playable() => return Some((level, entry.source)),
                Ok(_) => {
                    debug!(target: "level", id = %entry.id, ?mode, "Bank level not playable in this mode");
                }
                Err(e) => {
                    error!(target: "level", id = %entry.id, error = %e, "Bank level failed to adapt");
                }
            }
        }
        None
    }

    /// Re-apply a served level's regex to `text`. `None` if the level is unknown or evicted.
    #[instrument(level = "debug", skip(self, text), fields(%level_id, text_len = text.len()))]
    pub async fn check_candidate(&self, level_id: &str, text: &str) -> Option<bool> {
        let store = self.levels.read().await;
        store.get(level_id).map(|stored| stored.is_match(text))
    }

    /// Read-only access to a served level by id.
    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn get_level(&self, id: &str) -> Option<Level> {
        let store = self.levels.read().await;
        store.get(id).map(|stored| stored.level.clone())
    }
}

/// Bank entries for the requested difficulty band (1-3, 4-6, 7+); the whole bank if the band is empty.
fn bank_band(bank: &[BankLevel], difficulty: u32) -> Vec<&BankLevel> {
    let in_band = |l: &&BankLevel| {
        if difficulty <= 3 {
            l.difficulty <= 3
        } else if difficulty <= 6 {
            l.difficulty > 3 && l.difficulty <= 6
        } else {
            l.difficulty > 6
        }
    };
    let band: Vec<&BankLevel> = bank.iter().filter(in_band).collect();
    if band.is_empty() {
        bank.iter().collect()
    } else {
        band
    }
}

fn validate_bank_regex(regex: &str) -> Result<(), String> {
    Regex::new(regex).map(|_| ()).map_err(|e| format!("{}", e))
}
