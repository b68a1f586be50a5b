//! Small utility helpers used across modules.

/// Clamp a requested difficulty into `[1, max]`.
/// The composer itself accepts any value; this keeps requests within the tuned range.
pub fn clamp_difficulty(requested: u32, max: u32) -> u32 {
  requested.clamp(1, max.max(1))
}

/// Log-safe truncation for player-supplied strings.
/// Cuts on a char boundary so multi-byte input never panics.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn clamp_keeps_difficulty_in_range() {
    assert_eq!(clamp_difficulty(0, 10), 1);
    assert_eq!(clamp_difficulty(5, 10), 5);
    assert_eq!(clamp_difficulty(50, 10), 10);
    assert_eq!(clamp_difficulty(3, 0), 1);
  }

  #[test]
  fn truncation_respects_char_boundaries() {
    assert_eq!(trunc_for_log("abc", 10), "abc");
    assert_eq!(trunc_for_log("abcdef", 3), "abc… (6 bytes total)");
    assert_eq!(trunc_for_log("ééé", 3), "é… (6 bytes total)");
  }
}
