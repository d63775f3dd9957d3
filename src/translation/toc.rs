/*!
 * Translation of table-of-contents pages.
 *
 * A TOC page is translated line by line. For entries only the title goes to
 * the provider, then the entry is rebuilt around the original section number
 * and page number. Other lines stay in place and are translated whole when
 * they hold Han text. Lines that fail keep their original text and are
 * counted.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

use crate::app_config::PacingConfig;
use crate::errors::TranslationFailure;

use super::core::TranslationClient;

/// Dot leader between a TOC title and its page: ASCII dots or ellipses
pub const DOT_LEADER: &str = r"(?:\.{2,}|…+)";

// Number, title, dot leader, then an optional "- N -" or bare page number
static TOC_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(\d+(?:\.\d+)*)\.?\s*(.+?)\s*{}\s*(?:-\s*(\d+)\s*-|(\d+))?\s*$",
        DOT_LEADER
    ))
    .unwrap()
});

// Sections that often appear unnumbered in Chinese specifications
const SECTION_KEYWORDS: [&str; 8] = [
    "术语",
    "概述",
    "前言",
    "更改记录",
    "terminology",
    "overview",
    "foreword",
    "revision history",
];

/// Width of the dot leader in rebuilt lines
const LEADER_WIDTH: usize = 20;

/// A numbered or keyword entry on a TOC page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Section number, empty for keyword entries
    pub number: String,
    pub title: String,
    pub page: Option<String>,
    pub original_line: String,
}

impl TocEntry {
    /// Rebuild the entry around a (translated) title
    pub fn render(&self, title: &str) -> String {
        if self.number.is_empty() {
            return title.to_string();
        }
        match &self.page {
            Some(page) => format!("{}. {} {} - {} -", self.number, title, ".".repeat(LEADER_WIDTH), page),
            None => format!("{}. {}", self.number, title),
        }
    }
}

/// One non-empty line of a TOC page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TocLine {
    Entry(TocEntry),
    /// Anything that is not an entry; kept in its place
    Text(String),
}

impl TocLine {
    pub fn entry(&self) -> Option<&TocEntry> {
        match self {
            TocLine::Entry(entry) => Some(entry),
            TocLine::Text(_) => None,
        }
    }
}

/// Whether a line names one of the well-known unnumbered sections
pub fn contains_section_keyword(line: &str) -> bool {
    let lower = line.to_lowercase();
    SECTION_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

fn contains_han(text: &str) -> bool {
    text.chars().any(|c| ('\u{4e00}'..='\u{9fff}').contains(&c) || ('\u{3400}'..='\u{4dbf}').contains(&c))
}

/// Split a block into entries and plain lines, in order
pub fn parse_toc_lines(text: &str) -> Vec<TocLine> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            if let Some(caps) = TOC_LINE_REGEX.captures(line) {
                let page = caps.get(3).or_else(|| caps.get(4)).map(|m| m.as_str().to_string());
                TocLine::Entry(TocEntry {
                    number: caps[1].to_string(),
                    title: caps[2].trim().to_string(),
                    page,
                    original_line: line.to_string(),
                })
            } else if contains_section_keyword(line) {
                TocLine::Entry(TocEntry {
                    number: String::new(),
                    title: line.to_string(),
                    page: None,
                    original_line: line.to_string(),
                })
            } else {
                TocLine::Text(line.to_string())
            }
        })
        .collect()
}

/// Result of translating a TOC page
#[derive(Debug, Clone, PartialEq)]
pub struct TocTranslation {
    /// One rendered line per source line, in order
    pub text: String,
    /// Entries found on the page
    pub items_total: usize,
    /// Non-entry lines kept on the page
    pub text_lines: usize,
    /// Entries and text lines that came back translated
    pub items_translated: usize,
    /// Entries and text lines kept untranslated after a failure
    pub items_failed: usize,
    /// Entries passed through because of `max_toc_items`
    pub items_skipped: usize,
    /// First hard failure seen, if any
    pub first_failure: Option<TranslationFailure>,
}

impl TocTranslation {
    pub fn is_complete(&self) -> bool {
        self.items_failed == 0 && self.items_skipped == 0
    }

    /// Lines that went through translation
    pub fn units(&self) -> usize {
        self.items_translated + self.items_failed
    }
}

/// Translates TOC pages entry by entry
#[derive(Debug, Clone)]
pub struct TocTranslator {
    item_delay: Duration,
    max_items: Option<usize>,
}

impl TocTranslator {
    pub fn new(pacing: &PacingConfig) -> Self {
        Self {
            item_delay: pacing.toc_item_delay(),
            max_items: pacing.max_toc_items,
        }
    }

    /// Translate every line of a TOC block.
    ///
    /// Returns `None` when no entry could be parsed, leaving the caller to
    /// translate the block as ordinary text.
    pub async fn translate_block(&self, client: &TranslationClient, text: &str) -> Option<TocTranslation> {
        let lines = parse_toc_lines(text);
        let entries = lines.iter().filter(|line| line.entry().is_some()).count();
        if entries == 0 {
            return None;
        }

        let limit = self.max_items.unwrap_or(entries).min(entries);
        debug!("TOC page: {} entries, translating {}", entries, limit);

        let mut rendered = Vec::with_capacity(lines.len());
        let mut entry_index = 0;
        let mut calls = 0;
        let mut translated = 0;
        let mut failed = 0;
        let mut first_failure = None;

        for line in &lines {
            let (source, original) = match line {
                TocLine::Entry(entry) => {
                    entry_index += 1;
                    // Titles this short are usually stray numbering artifacts
                    if entry_index > limit || entry.title.chars().count() < 2 {
                        rendered.push(entry.original_line.clone());
                        if entry_index <= limit {
                            translated += 1;
                        }
                        continue;
                    }
                    (entry.title.as_str(), entry.original_line.as_str())
                }
                TocLine::Text(text) if contains_han(text) => (text.as_str(), text.as_str()),
                TocLine::Text(text) => {
                    rendered.push(text.clone());
                    continue;
                }
            };

            if calls > 0 && !self.item_delay.is_zero() {
                tokio::time::sleep(self.item_delay).await;
            }
            calls += 1;

            let (outcome, _) = client.translate_unit(source).await;
            match outcome.into_result() {
                Ok(result) => {
                    rendered.push(match line {
                        TocLine::Entry(entry) => entry.render(&result),
                        TocLine::Text(_) => result,
                    });
                    translated += 1;
                }
                Err(failure) => {
                    warn!("TOC line '{}' kept untranslated: {}", original, failure);
                    rendered.push(original.to_string());
                    failed += 1;
                    first_failure.get_or_insert(failure);
                }
            }
        }

        Some(TocTranslation {
            text: rendered.join("\n"),
            items_total: entries,
            text_lines: lines.len() - entries,
            items_translated: translated,
            items_failed: failed,
            items_skipped: entries - limit,
            first_failure,
        })
    }
}
