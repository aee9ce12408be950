//! Small string helpers shared across the pipeline.

use once_cell::sync::Lazy;
use regex::Regex;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[A-Za-z0-9_-]*\s*\n?(.*?)\n?\s*```$").unwrap());

/// Strip a markdown code fence wrapping a model reply, if present.
///
/// Models occasionally wrap plain-text answers in ```` ```json ... ``` ````
/// fences despite being told not to. The inner text is returned trimmed;
/// unfenced input passes through untouched (also trimmed).
pub fn strip_code_fences(s: &str) -> String {
    let trimmed = s.trim();
    match CODE_FENCE.captures(trimmed) {
        Some(caps) => caps[1].trim().to_string(),
        None => trimmed.to_string(),
    }
}

/// Truncate a string for logging, keeping at most `max` characters.
///
/// Truncation is by character, not byte, so multi-byte headlines never
/// split mid-codepoint.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max).collect();
    format!("{}…(+{} bytes)", kept, s.len() - kept.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let fenced = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"a\": 1}");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(strip_code_fences("```\nPolitics\n```"), "Politics");
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(strip_code_fences("  Technology \n"), "Technology");
    }

    #[test]
    fn leaves_inner_backticks_alone() {
        assert_eq!(strip_code_fences("use `cargo build`"), "use `cargo build`");
    }

    #[test]
    fn truncate_short_string() {
        assert_eq!(truncate_for_log("moo", 100), "moo");
    }

    #[test]
    fn truncate_long_string() {
        let s = "a".repeat(500);
        let out = truncate_for_log(&s, 100);
        assert!(out.starts_with(&"a".repeat(100)));
        assert!(out.contains("+400 bytes"));
    }

    #[test]
    fn truncate_is_char_safe() {
        let s = "🐮🐮🐮🐮";
        let out = truncate_for_log(s, 2);
        assert!(out.starts_with("🐮🐮"));
    }
}
