use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// Document languages arrive as ISO 639-1 or 639-2 codes, optionally with a
/// region subtag ("zh-CN"). The Google endpoint wants the 639-1 form with the
/// region kept; LLM prompts want the English language name.

// ISO 639-2/B codes that differ from their 639-2/T form
const BIBLIOGRAPHIC_CODES: &[(&str, &str)] = &[
    ("chi", "zho"),
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("cze", "ces"),
    ("per", "fas"),
    ("may", "msa"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
    ("bur", "mya"),
];

/// A parsed language tag
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageTag {
    /// Resolved language
    pub language: Language,
    /// Region subtag as written, e.g. "CN"
    pub region: Option<String>,
}

/// Split off a region subtag and resolve the primary code
pub fn parse_language_tag(code: &str) -> Result<LanguageTag> {
    let trimmed = code.trim();
    let (primary, region) = match trimmed.split_once(['-', '_']) {
        Some((primary, region)) if !region.is_empty() => (primary, Some(region.to_uppercase())),
        _ => (trimmed, None),
    };

    let primary = primary.to_lowercase();
    let language = match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => {
            let part2t = BIBLIOGRAPHIC_CODES
                .iter()
                .find(|(bibliographic, _)| *bibliographic == primary)
                .map(|(_, terminologic)| *terminologic)
                .unwrap_or(primary.as_str());
            Language::from_639_3(part2t)
        }
        _ => None,
    };

    language
        .map(|language| LanguageTag { language, region })
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    Ok(parse_language_tag(code)?.language.to_639_3().to_string())
}

/// Code to send to the Google endpoint: 639-1 where it exists, region kept
pub fn provider_language_code(code: &str) -> Result<String> {
    if code.trim().eq_ignore_ascii_case("auto") {
        return Ok("auto".to_string());
    }

    let tag = parse_language_tag(code)?;
    let base = tag
        .language
        .to_639_1()
        .map(str::to_string)
        .unwrap_or_else(|| tag.language.to_639_3().to_string());

    Ok(match tag.region {
        Some(region) => format!("{}-{}", base, region),
        None => base,
    })
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (parse_language_tag(code1), parse_language_tag(code2)) {
        (Ok(a), Ok(b)) => a.language == b.language,
        _ => false,
    }
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    Ok(parse_language_tag(code)?.language.to_name().to_string())
}

/// Language name for prompts; "auto" becomes a neutral phrase
pub fn prompt_language_name(code: &str) -> String {
    if code.trim().eq_ignore_ascii_case("auto") {
        return "the source language".to_string();
    }
    get_language_name(code).unwrap_or_else(|_| code.to_string())
}
