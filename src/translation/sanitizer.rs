/*!
 * Normalization of raw extracted page text.
 *
 * Upstream extraction failures surface as the literal marker `None`, either as
 * the whole page or as stray tokens inside it. Everything here is infallible:
 * one bad page must not abort a long batch run.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Marker emitted by the extractor for missing values
pub const PLACEHOLDER_MARKER: &str = "None";

static DOT_RUN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{3,}").unwrap());
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// Han ideographs, extension A, full-width parentheses, ASCII alphanumerics and whitespace
static CJK_CONTENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x{4e00}-\x{9fff}\x{3400}-\x{4dbf}\x{ff08}\x{ff09}A-Za-z0-9\s]+").unwrap()
});

/// Text normalization utilities
pub struct TextSanitizer;

impl TextSanitizer {
    /// Clean optional page text; `None` yields an empty string
    pub fn clean(raw: Option<&str>) -> String {
        raw.map(Self::clean_str).unwrap_or_default()
    }

    /// Collapse a raw page into one clean line
    pub fn clean_str(raw: &str) -> String {
        if raw.trim() == PLACEHOLDER_MARKER {
            return String::new();
        }

        let joined = raw
            .split_whitespace()
            .filter(|token| *token != PLACEHOLDER_MARKER)
            .collect::<Vec<_>>()
            .join(" ");

        if joined.is_empty() {
            return joined;
        }

        let collapsed = DOT_RUN_REGEX.replace_all(&joined, "...");
        WHITESPACE_REGEX.replace_all(&collapsed, " ").trim().to_string()
    }

    /// Clean every line on its own, keeping line and paragraph structure.
    ///
    /// Runs of blank lines become a single blank line so paragraph breaks
    /// survive for classification and chunking.
    pub fn clean_preserving_lines(raw: &str) -> String {
        if raw.trim() == PLACEHOLDER_MARKER {
            return String::new();
        }

        let mut lines: Vec<String> = Vec::new();
        let mut pending_break = false;

        for line in raw.lines() {
            let cleaned = Self::clean_str(line);
            if cleaned.is_empty() {
                pending_break = !lines.is_empty();
                continue;
            }
            if pending_break {
                lines.push(String::new());
                pending_break = false;
            }
            lines.push(cleaned);
        }

        lines.join("\n")
    }

    /// Keep only CJK runs and the alphanumerics around them
    pub fn extract_cjk_content(text: &str) -> String {
        let joined = CJK_CONTENT_REGEX
            .find_iter(text)
            .map(|m| m.as_str().trim())
            .filter(|m| !m.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        WHITESPACE_REGEX.replace_all(&joined, " ").trim().to_string()
    }

    /// Share of '.', '-' and '_' characters in the text
    pub fn formatting_symbol_ratio(text: &str) -> f64 {
        let total = text.chars().count();
        if total == 0 {
            return 0.0;
        }
        let symbols = text.chars().filter(|c| matches!(c, '.' | '-' | '_')).count();
        symbols as f64 / total as f64
    }
}
