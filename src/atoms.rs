//! Character-class atoms: the single-character building blocks of every generated pattern.
//!
//! The class table is a closed set of records looked up by `Atom`. Each record
//! carries the regex fragment, the alphabet its matching sampler draws from and
//! the alphabet its mismatching sampler draws from. Mismatch alphabets are
//! disjoint from the class they break, for every character they contain.

use std::borrow::Cow;

use rand::seq::SliceRandom;
use rand::Rng;

const DIGITS: &[u8] = b"0123456789";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const WORD: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";
const HEX: &[u8] = b"0123456789ABCDEF";
const NOT_HEX: &[u8] = b"GHIJKLMNOPQRSTUVWXYZ";
const NOT_WORD: &[u8] = b"-@.! ";

/// Characters that must be escaped when a literal is emitted into a pattern.
const REGEX_META: &str = r".^$|?*+()[]{}\";

/// One character class a segment can be built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Atom {
  Digit,
  Upper,
  Lower,
  Word,
  Hex,
  /// A single fixed character (used for separators).
  Literal(char),
}

struct AtomClass {
  source: &'static str,
  matching: &'static [u8],
  mismatching: &'static [u8],
  one: &'static str,
  many: &'static str,
}

const DIGIT_CLASS: AtomClass = AtomClass {
  source: r"\d",
  matching: DIGITS,
  mismatching: LOWER,
  one: "a digit",
  many: "digits",
};
const UPPER_CLASS: AtomClass = AtomClass {
  source: "[A-Z]",
  matching: UPPER,
  mismatching: DIGITS,
  one: "an uppercase letter",
  many: "uppercase letters",
};
const LOWER_CLASS: AtomClass = AtomClass {
  source: "[a-z]",
  matching: LOWER,
  mismatching: UPPER,
  one: "a lowercase letter",
  many: "lowercase letters",
};
const WORD_CLASS: AtomClass = AtomClass {
  source: r"\w",
  matching: WORD,
  mismatching: NOT_WORD,
  one: "a word character",
  many: "word characters",
};
const HEX_CLASS: AtomClass = AtomClass {
  source: "[0-9A-F]",
  matching: HEX,
  mismatching: NOT_HEX,
  one: "a hex digit",
  many: "hex digits",
};

const POOL_EASY: &[Atom] = &[Atom::Digit, Atom::Upper];
const POOL_MEDIUM: &[Atom] = &[Atom::Digit, Atom::Upper, Atom::Lower, Atom::Hex];
const POOL_HARD: &[Atom] = &[Atom::Digit, Atom::Upper, Atom::Lower, Atom::Word, Atom::Hex];

/// Atoms a segment may draw from at the given difficulty.
pub fn pool_for(difficulty: u32) -> &'static [Atom] {
  if difficulty <= 2 {
    POOL_EASY
  } else if difficulty <= 5 {
    POOL_MEDIUM
  } else {
    POOL_HARD
  }
}

/// What an atom resolves to: a table record or a fixed character.
enum AtomKind {
  Class(&'static AtomClass),
  Literal(char),
}

impl Atom {
  fn kind(self) -> AtomKind {
    match self {
      Atom::Digit => AtomKind::Class(&DIGIT_CLASS),
      Atom::Upper => AtomKind::Class(&UPPER_CLASS),
      Atom::Lower => AtomKind::Class(&LOWER_CLASS),
      Atom::Word => AtomKind::Class(&WORD_CLASS),
      Atom::Hex => AtomKind::Class(&HEX_CLASS),
      Atom::Literal(ch) => AtomKind::Literal(ch),
    }
  }

  /// Regex fragment denoting this class.
  pub fn source(self) -> Cow<'static, str> {
    match self.kind() {
      AtomKind::Class(class) => Cow::Borrowed(class.source),
      AtomKind::Literal(ch) => Cow::Owned(escape_literal(ch)),
    }
  }

  /// One character inside the class.
  pub fn sample_match<R: Rng + ?Sized>(self, rng: &mut R) -> char {
    match self.kind() {
      AtomKind::Class(class) => pick(class.matching, rng),
      AtomKind::Literal(ch) => ch,
    }
  }

  /// One character guaranteed to fall outside the class.
  pub fn sample_mismatch<R: Rng + ?Sized>(self, rng: &mut R) -> char {
    match self.kind() {
      AtomKind::Class(class) => pick(class.mismatching, rng),
      // Lowercase letters differ from any literal that is not one; digits cover the rest.
      AtomKind::Literal(ch) if ch.is_ascii_lowercase() => pick(DIGITS, rng),
      AtomKind::Literal(_) => pick(LOWER, rng),
    }
  }

  /// Human phrase for a single occurrence ("a digit").
  pub fn describe_one(self) -> String {
    match self.kind() {
      AtomKind::Class(class) => class.one.to_string(),
      AtomKind::Literal(ch) => format!("'{}'", ch),
    }
  }

  /// Human phrase for a counted run ("digits").
  pub fn describe_many(self) -> String {
    match self.kind() {
      AtomKind::Class(class) => class.many.to_string(),
      AtomKind::Literal(ch) => format!("'{}' characters", ch),
    }
  }
}

fn escape_literal(ch: char) -> String {
  if REGEX_META.contains(ch) {
    format!("\\{}", ch)
  } else {
    ch.to_string()
  }
}

/// Alphabets are non-empty constants; the fallback keeps the draw total.
fn pick<R: Rng + ?Sized>(alphabet: &[u8], rng: &mut R) -> char {
  alphabet.choose(rng).copied().map(char::from).unwrap_or('0')
}
