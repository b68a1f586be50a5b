//! Pattern composer: turns a difficulty into a pattern plus correct and near-miss samples.
//!
//! Flow:
//! 1) Decide the shape up front (`Composition::roll`): either a composite of
//!    1-3 segments joined by a separator, or (difficulty > 3, 30%) an
//!    alternation of two `{3}` segments.
//! 2) Emit the regex source for that shape.
//! 3) Sample correct strings and near misses. A composite near miss breaks
//!    exactly one segment and leaves every other segment valid.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::atoms::Atom;
use crate::segment::Segment;

/// Separators a composite may use; `None` joins segments directly.
pub const SEPARATORS: [Option<char>; 6] = [Some('-'), Some('_'), Some('.'), Some(' '), Some(':'), None];

const ALTERNATION_MIN_DIFFICULTY: u32 = 4;
const ALTERNATION_CHANCE: f64 = 0.3;

/// Number of segments in a composite at this difficulty.
pub fn segment_count(difficulty: u32) -> usize {
  if difficulty <= 2 {
    1
  } else if difficulty <= 6 {
    2
  } else {
    3
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositePattern {
  pub segments: Vec<Segment>,
  pub separator: Option<char>,
}

/// A composite sample with one segment deliberately broken.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NearMiss {
  pub parts: Vec<String>,
  pub broken: usize,
}

impl NearMiss {
  pub fn join<R: Rng + ?Sized>(&self, separator: Option<char>, rng: &mut R) -> String {
    join_parts(&self.parts, separator, rng)
  }
}

impl CompositePattern {
  pub fn roll<R: Rng + ?Sized>(difficulty: u32, rng: &mut R) -> Self {
    let count = segment_count(difficulty);
    let separator = if difficulty > 2 {
      SEPARATORS.choose(rng).copied().flatten()
    } else {
      None
    };
    let segments = (0..count).map(|_| Segment::roll(difficulty, rng)).collect();
    Self { segments, separator }
  }

  pub fn regex(&self) -> String {
    let joiner = self
      .separator
      .map(|c| Atom::Literal(c).source().into_owned())
      .unwrap_or_default();
    self
      .segments
      .iter()
      .map(Segment::source)
      .collect::<Vec<_>>()
      .join(&joiner)
  }

  pub fn sample_parts<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
    self.segments.iter().map(|s| s.sample_match(rng)).collect()
  }

  pub fn sample_match<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
    let parts = self.sample_parts(rng);
    join_parts(&parts, self.separator, rng)
  }

  pub fn sample_near_miss<R: Rng + ?Sized>(&self, rng: &mut R) -> NearMiss {
    let broken = rng.gen_range(0..self.segments.len().max(1));
    let parts = self
      .segments
      .iter()
      .enumerate()
      .map(|(i, s)| if i == broken { s.sample_mismatch(rng) } else { s.sample_match(rng) })
      .collect();
    NearMiss { parts, broken }
  }

  pub fn describe(&self) -> String {
    let joiner = match self.separator {
      Some(c) => format!(", then {}, then ", Atom::Literal(c).describe_one()),
      None => ", then ".to_string(),
    };
    self
      .segments
      .iter()
      .map(Segment::describe)
      .collect::<Vec<_>>()
      .join(&joiner)
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlternationPattern {
  pub left: Segment,
  pub right: Segment,
}

impl AlternationPattern {
  /// Two difficulty-1 segments; `None` when both render to the same fragment.
  pub fn try_roll<R: Rng + ?Sized>(rng: &mut R) -> Option<Self> {
    let left = Segment::roll(1, rng);
    let right = Segment::roll(1, rng);
    if left.source() == right.source() {
      return None;
    }
    Some(Self { left, right })
  }

  pub fn regex(&self) -> String {
    format!("({}|{})", self.left.source(), self.right.source())
  }

  pub fn sample_correct<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
    vec![
      self.left.sample_match(rng),
      self.right.sample_match(rng),
      self.left.sample_match(rng),
      self.right.sample_match(rng),
    ]
  }

  /// One miss per side plus a hybrid (broken left followed by a valid right).
  pub fn sample_wrong<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
    let left_bad = self.left.sample_mismatch(rng);
    let right_bad = self.right.sample_mismatch(rng);
    let hybrid = format!("{}{}", self.left.sample_mismatch(rng), self.right.sample_match(rng));
    vec![left_bad, right_bad, hybrid]
  }

  pub fn describe(&self) -> String {
    format!("either {} or {}", self.left.describe(), self.right.describe())
  }
}

/// The two shapes a level pattern can take.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Composition {
  Composite(CompositePattern),
  Alternation(AlternationPattern),
}

impl Composition {
  pub fn roll<R: Rng + ?Sized>(difficulty: u32, rng: &mut R) -> Self {
    if difficulty >= ALTERNATION_MIN_DIFFICULTY && rng.gen_bool(ALTERNATION_CHANCE) {
      if let Some(alt) = AlternationPattern::try_roll(rng) {
        return Composition::Alternation(alt);
      }
    }
    Composition::Composite(CompositePattern::roll(difficulty, rng))
  }

  pub fn regex(&self) -> String {
    match self {
      Composition::Composite(c) => c.regex(),
      Composition::Alternation(a) => a.regex(),
    }
  }

  pub fn describe(&self) -> String {
    match self {
      Composition::Composite(c) => c.describe(),
      Composition::Alternation(a) => a.describe(),
    }
  }

  pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (Vec<String>, Vec<String>) {
    match self {
      Composition::Composite(c) => {
        let correct_count = rng.gen_range(3..=5);
        let wrong_count = rng.gen_range(5..=8);
        let correct = (0..correct_count).map(|_| c.sample_match(rng)).collect();
        let wrong = (0..wrong_count)
          .map(|_| {
            let miss = c.sample_near_miss(rng);
            trace!(target: "level", segment = miss.broken, "Near miss sampled");
            miss.join(c.separator, rng)
          })
          .collect();
        (correct, wrong)
      }
      Composition::Alternation(a) => (a.sample_correct(rng), a.sample_wrong(rng)),
    }
  }
}

/// Output of one composer run.
#[derive(Clone, Debug)]
pub struct ComposedLevel {
  pub regex: String,
  pub correct: Vec<String>,
  pub wrong: Vec<String>,
  pub composition: Composition,
}

/// Total over every difficulty; callers clamp out-of-range values themselves.
pub fn compose<R: Rng + ?Sized>(difficulty: u32, rng: &mut R) -> ComposedLevel {
  let composition = Composition::roll(difficulty, rng);
  let (correct, wrong) = composition.sample(rng);
  ComposedLevel {
    regex: composition.regex(),
    correct,
    wrong,
    composition,
  }
}

fn join_parts<R: Rng + ?Sized>(parts: &[String], separator: Option<char>, rng: &mut R) -> String {
  match separator {
    Some(c) => parts.join(Atom::Literal(c).sample_match(rng).to_string().as_str()),
    None => parts.concat(),
  }
}
