//! Segments: one atom plus a quantifier, with match and near-miss samplers.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::atoms::{pool_for, Atom};

/// Upper bound on the run length sampled for `+`.
pub const PLUS_CAP: usize = 5;

const EXACT_WEIGHT: f64 = 0.4;
const RANGE_WEIGHT: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quantifier {
  /// No quantifier: exactly one character.
  One,
  Exact(usize),
  Range { min: usize, max: usize },
  Plus { cap: usize },
}

impl Quantifier {
  /// Difficulty-gated draw. Difficulty 1 always yields `{3}`.
  pub fn roll<R: Rng + ?Sized>(difficulty: u32, rng: &mut R) -> Self {
    if difficulty <= 1 {
      return Quantifier::Exact(3);
    }
    let roll: f64 = rng.gen();
    if roll < EXACT_WEIGHT {
      Quantifier::Exact(rng.gen_range(2..=4))
    } else if roll < EXACT_WEIGHT + RANGE_WEIGHT && difficulty > 2 {
      Quantifier::Range { min: 2, max: 4 }
    } else if difficulty > 4 {
      Quantifier::Plus { cap: PLUS_CAP }
    } else {
      Quantifier::One
    }
  }

  pub fn suffix(&self) -> String {
    match *self {
      Quantifier::One => String::new(),
      Quantifier::Exact(n) => format!("{{{}}}", n),
      Quantifier::Range { min, max } => format!("{{{},{}}}", min, max),
      Quantifier::Plus { .. } => "+".to_string(),
    }
  }

  /// Inclusive length bounds used by the samplers.
  pub fn bounds(&self) -> (usize, usize) {
    match *self {
      Quantifier::One => (1, 1),
      Quantifier::Exact(n) => (n, n),
      Quantifier::Range { min, max } => (min, max),
      Quantifier::Plus { cap } => (1, cap.max(1)),
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
  pub atom: Atom,
  pub quantifier: Quantifier,
}

impl Segment {
  pub fn new(atom: Atom, quantifier: Quantifier) -> Self {
    Self { atom, quantifier }
  }

  /// Draw an atom from the difficulty's pool, then a quantifier.
  pub fn roll<R: Rng + ?Sized>(difficulty: u32, rng: &mut R) -> Self {
    let atom = pool_for(difficulty).choose(rng).copied().unwrap_or(Atom::Digit);
    let quantifier = Quantifier::roll(difficulty, rng);
    Self::new(atom, quantifier)
  }

  pub fn source(&self) -> String {
    format!("{}{}", self.atom.source(), self.quantifier.suffix())
  }

  pub fn sample_match<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
    let (min, max) = self.quantifier.bounds();
    let len = rng.gen_range(min..=max);
    (0..len).map(|_| self.atom.sample_match(rng)).collect()
  }

  /// A string that fails this segment's fragment: either the wrong length
  /// (fixed quantifiers above one only) or one character swapped for a
  /// character outside the class.
  pub fn sample_mismatch<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
    let (min, max) = self.quantifier.bounds();
    if min == max && min > 1 && rng.gen_bool(0.5) {
      let len = if rng.gen_bool(0.5) { min - 1 } else { min + 1 };
      return (0..len).map(|_| self.atom.sample_match(rng)).collect();
    }

    let len = rng.gen_range(min..=max);
    let bad_pos = rng.gen_range(0..len);
    (0..len)
      .map(|i| {
        if i == bad_pos {
          self.atom.sample_mismatch(rng)
        } else {
          self.atom.sample_match(rng)
        }
      })
      .collect()
  }

  pub fn describe(&self) -> String {
    match self.quantifier {
      Quantifier::One => self.atom.describe_one(),
      Quantifier::Exact(1) => self.atom.describe_one(),
      Quantifier::Exact(n) => format!("{} {}", n, self.atom.describe_many()),
      Quantifier::Range { min, max } => format!("{} to {} {}", min, max, self.atom.describe_many()),
      Quantifier::Plus { .. } => format!("one or more {}", self.atom.describe_many()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::StdRng;
  use rand::SeedableRng;
  use regex::Regex;

  fn full(seg: &Segment) -> Regex {
    Regex::new(&format!("^{}$", seg.source())).expect("segment source compiles")
  }

  #[test]
  fn difficulty_one_is_always_exactly_three() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..500 {
      let seg = Segment::roll(1, &mut rng);
      assert_eq!(seg.quantifier, Quantifier::Exact(3));
      assert!(matches!(seg.atom, Atom::Digit | Atom::Upper));
    }
  }

  #[test]
  fn quantifiers_are_gated_by_difficulty() {
    let mut rng = StdRng::seed_from_u64(12);
    for _ in 0..2000 {
      match Quantifier::roll(2, &mut rng) {
        Quantifier::Exact(n) => assert!((2..=4).contains(&n)),
        Quantifier::One => {}
        other => panic!("difficulty 2 rolled {:?}", other),
      }
      assert!(!matches!(Quantifier::roll(4, &mut rng), Quantifier::Plus { .. }));
    }
    let mut seen_plus = false;
    let mut seen_range = false;
    for _ in 0..2000 {
      match Quantifier::roll(6, &mut rng) {
        Quantifier::Plus { cap } => {
          assert_eq!(cap, PLUS_CAP);
          seen_plus = true;
        }
        Quantifier::Range { min: 2, max: 4 } => seen_range = true,
        Quantifier::One => panic!("difficulty 6 should never fall back to a single character"),
        _ => {}
      }
    }
    assert!(seen_plus && seen_range);
  }

  #[test]
  fn samples_honor_their_own_fragment_across_difficulties() {
    let mut rng = StdRng::seed_from_u64(2024);
    for difficulty in 1..=10 {
      for _ in 0..1000 {
        let seg = Segment::roll(difficulty, &mut rng);
        let re = full(&seg);
        let good = seg.sample_match(&mut rng);
        let bad = seg.sample_mismatch(&mut rng);
        assert!(re.is_match(&good), "d={} {} rejected match '{}'", difficulty, re, good);
        assert!(!re.is_match(&bad), "d={} {} accepted mismatch '{}'", difficulty, re, bad);
      }
    }
  }

  #[test]
  fn plus_samples_stay_under_the_cap() {
    let mut rng = StdRng::seed_from_u64(5);
    let seg = Segment::new(Atom::Word, Quantifier::Plus { cap: PLUS_CAP });
    for _ in 0..500 {
      let n = seg.sample_match(&mut rng).chars().count();
      assert!((1..=PLUS_CAP).contains(&n));
    }
  }

  #[test]
  fn exact_mismatches_use_both_strategies() {
    let mut rng = StdRng::seed_from_u64(99);
    let seg = Segment::new(Atom::Digit, Quantifier::Exact(3));
    let mut wrong_len = 0;
    let mut wrong_char = 0;
    for _ in 0..400 {
      let s = seg.sample_mismatch(&mut rng);
      if s.len() == 3 {
        assert!(s.chars().any(|c| !c.is_ascii_digit()));
        wrong_char += 1;
      } else {
        assert!(s.len() == 2 || s.len() == 4);
        assert!(s.chars().all(|c| c.is_ascii_digit()));
        wrong_len += 1;
      }
    }
    assert!(wrong_len > 100 && wrong_char > 100, "len={} char={}", wrong_len, wrong_char);
  }

  #[test]
  fn single_character_segments_only_change_content() {
    let mut rng = StdRng::seed_from_u64(6);
    let seg = Segment::new(Atom::Upper, Quantifier::One);
    assert_eq!(seg.source(), "[A-Z]");
    for _ in 0..200 {
      let s = seg.sample_mismatch(&mut rng);
      assert_eq!(s.len(), 1);
      assert!(s.chars().all(|c| c.is_ascii_digit()));
    }
  }

  #[test]
  fn descriptions_read_naturally() {
    assert_eq!(Segment::new(Atom::Digit, Quantifier::Exact(3)).describe(), "3 digits");
    assert_eq!(
      Segment::new(Atom::Lower, Quantifier::Range { min: 2, max: 4 }).describe(),
      "2 to 4 lowercase letters"
    );
    assert_eq!(
      Segment::new(Atom::Hex, Quantifier::Plus { cap: PLUS_CAP }).describe(),
      "one or more hex digits"
    );
    assert_eq!(Segment::new(Atom::Upper, Quantifier::One).describe(), "an uppercase letter");
  }
}
