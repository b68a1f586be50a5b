//! Built-in curated levels and the hard fallback level.

use crate::domain::{BankLevel, LevelSource};

fn seed(id: &str, difficulty: u32, raw_regex: &str, description: &str, candidates: &[&str]) -> BankLevel {
  BankLevel {
    id: id.into(),
    difficulty,
    raw_regex: raw_regex.into(),
    description: description.into(),
    candidates: candidates.iter().map(|s| s.to_string()).collect(),
    source: LevelSource::Seed,
  }
}

/// Hand-written levels that keep the game playable without any configuration.
/// Every pattern stays inside what the `regex` crate supports (no lookaround, no backreferences).
pub fn seed_levels() -> Vec<BankLevel> {
  vec![
    seed("seed_digits3", 1, r"\d{3}", "Three digits in a row",
      &["123", "abc-999", "No 000", "a12b", "12", "1-2-3", "9999", "Test 555 Test", "NoDigit", "---", "007", "42"]),
    seed("seed_upper3", 1, "[A-Z]{3}", "Three uppercase letters in a row",
      &["ABC", "xXYZ", "Abc", "A-B-C", "123", "TEST", "Ha Noi", "USA", "V N", "uuu", "ABC1", "BBC"]),
    seed("seed_cat_dog", 2, "cat|dog", "Contains 'cat' or 'dog'",
      &["cat", "dog", "scat", "doggy", "bird", "ca t", "do g", "category", "hotdog", "cut", "dig", "fish"]),
    seed("seed_snake_number", 2, "[a-z]+_[0-9]+", "Lowercase letters, an underscore, then digits",
      &["user_123", "test_0", "abc_99", "User_1", "abc-123", "test_", "_123", "abc_def", "123_abc", "no_match", "onlytext", "user_123456"]),
    seed("seed_hex_color", 3, "#[0-9A-F]{3}", "Short hex colour (hash + 3 hex digits)",
      &["#FFF", "#A09", "#abc", "FFF", "#G00", "#12", "#1234", "Color #ABC", "#000", "#F0F", "#XYZ", "1#23"]),
    seed("seed_date", 4, r"\d{2}/\d{2}/\d{4}", "Date as dd/mm/yyyy",
      &["01/01/2024", "31/12/1999", "1/1/2024", "99/99/2022", "12-12-2022", "2024/01/01", "05/05/20", "Text 01/01/2024", "No date", "12/34/5678", "15/08/1945", "02/09/1945"]),
    seed("seed_user_mail", 5, r"user\d+@mail\.com", "user + digits @mail.com",
      &["user123@mail.com", "user@mail.com", "user99@mail.vn", "admin@mail.com", "user1@gmail.com", "user007@mail.com", "User1@mail.com", "user123@mail.common", "u1@mail.com", "@mail.com", "mail.com", "hey user1@mail.com"]),
    seed("seed_full_name", 5, "[A-Z][a-z]+ [A-Z][a-z]+", "Two capitalised words",
      &["John Doe", "Ha Noi", "tom cruise", "Mr Bean", "Java Script", "visual Basic", "ABC DEF", "John", "Doe", "Elon Musk", "Bill gates", "Steve Jobs"]),
    seed("seed_simple_url", 6, r"\b(https?://)\w+\.\w+", "Simple URL starting with http or https",
      &["https://google.com", "http://vnexpress.net", "www.com", "ftp://files.com", "https://site", "http:// abc.com", "https://test.vn", "click https://a.com", "http//bad.com", "abcd.com", "https://domain.org", "http://s"]),
    seed("seed_ipv4_octet", 7, r"^(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.", "First octet of an IPv4 address (0-255 and a dot)",
      &["192.", "255.", "0.", "256.", "1.", "999.", "25.", "123.", "abc.", "10.", "300.", "192.168"]),
  ]
}

/// Absolute last resort: playable in every mode.
pub fn hard_fallback_level(difficulty: u32) -> BankLevel {
  BankLevel {
    id: "fallback_digits3".into(),
    difficulty,
    raw_regex: r"\d{3}".into(),
    description: "Three digits in a row".into(),
    candidates: ["123", "007", "9999", "abc-999", "12", "4a2", "NoDigit", "1-2-3"]
      .iter()
      .map(|s| s.to_string())
      .collect(),
    source: LevelSource::Fallback,
  }
}
