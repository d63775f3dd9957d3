/*!
 * Content classification for cleaned page text.
 *
 * The extractor discards layout, so tables and tables of contents are
 * recognized from cheap lexical signals. Each signal is a named heuristic with
 * its threshold in `ClassifierConfig`; heuristics run in priority order and the
 * first one that fires decides the label. TOC heuristics come before table
 * heuristics because TOC pages are often table-like themselves.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::app_config::ClassifierConfig;

static TOC_MARKER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"目\s*录|(?i:table\s+of\s+contents)").unwrap());
static PAGE_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"-\s*\d+\s*-").unwrap());
static DEEP_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\.\d+\.\d+").unwrap());
static TABLE_CAPTION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"表\d+").unwrap());
static FUNCTION_MATRIX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"功能矩阵").unwrap());
static PIPE_ROW_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\|.*\|.*\|").unwrap());

const TABLE_BORDER_CHARS: &[char] = &['┃', '│', '├', '┤', '┬', '┴', '─', '║', '╠', '╣'];

/// Kind of content a block of text holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Ordinary prose
    #[default]
    Plain,
    /// Table or matrix
    Table,
    /// Table of contents
    Toc,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Plain => write!(f, "plain"),
            ContentKind::Table => write!(f, "table"),
            ContentKind::Toc => write!(f, "toc"),
        }
    }
}

/// Signature shared by all heuristics
pub type HeuristicFn = fn(&str, &ClassifierConfig) -> bool;

/// A named test that assigns `kind` when it fires
#[derive(Clone)]
pub struct Heuristic {
    pub name: &'static str,
    pub kind: ContentKind,
    pub test: HeuristicFn,
}

impl fmt::Debug for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heuristic")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Ordered heuristic classifier
#[derive(Debug, Clone)]
pub struct ContentClassifier {
    config: ClassifierConfig,
    heuristics: Vec<Heuristic>,
}

impl Default for ContentClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl ContentClassifier {
    /// Create a classifier with the built-in heuristics
    pub fn new(config: ClassifierConfig) -> Self {
        Self::with_heuristics(config, Self::default_heuristics())
    }

    /// Create a classifier with a custom heuristic list.
    ///
    /// The list is used as given; callers own the priority order.
    pub fn with_heuristics(config: ClassifierConfig, heuristics: Vec<Heuristic>) -> Self {
        Self { config, heuristics }
    }

    /// Built-in heuristics, TOC tests first
    pub fn default_heuristics() -> Vec<Heuristic> {
        vec![
            Heuristic { name: "toc_marker", kind: ContentKind::Toc, test: has_toc_marker },
            Heuristic { name: "toc_dot_ratio", kind: ContentKind::Toc, test: exceeds_dot_ratio },
            Heuristic { name: "toc_dash_ratio", kind: ContentKind::Toc, test: exceeds_dash_ratio },
            Heuristic { name: "toc_page_markers", kind: ContentKind::Toc, test: has_many_page_markers },
            Heuristic { name: "toc_deep_numbers", kind: ContentKind::Toc, test: has_many_deep_numbers },
            Heuristic { name: "table_border_chars", kind: ContentKind::Table, test: has_table_borders },
            Heuristic { name: "table_caption", kind: ContentKind::Table, test: has_table_caption },
            Heuristic { name: "table_uniform_lines", kind: ContentKind::Table, test: has_uniform_lines },
        ]
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Label the text; never fails, Plain when nothing fires
    pub fn classify(&self, text: &str) -> ContentKind {
        self.first_match(text).map(|h| h.kind).unwrap_or(ContentKind::Plain)
    }

    /// Name of the heuristic that decided the label, if any
    pub fn explain(&self, text: &str) -> Option<&'static str> {
        self.first_match(text).map(|h| h.name)
    }

    fn first_match(&self, text: &str) -> Option<&Heuristic> {
        self.heuristics.iter().find(|h| (h.test)(text, &self.config))
    }
}

fn char_ratio(text: &str, target: char) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    text.chars().filter(|c| *c == target).count() as f64 / total as f64
}

pub fn has_toc_marker(text: &str, _config: &ClassifierConfig) -> bool {
    TOC_MARKER_REGEX.is_match(text)
}

pub fn exceeds_dot_ratio(text: &str, config: &ClassifierConfig) -> bool {
    char_ratio(text, '.') > config.toc_dot_ratio
}

pub fn exceeds_dash_ratio(text: &str, config: &ClassifierConfig) -> bool {
    char_ratio(text, '-') > config.toc_dash_ratio
}

pub fn has_many_page_markers(text: &str, config: &ClassifierConfig) -> bool {
    PAGE_MARKER_REGEX.find_iter(text).count() > config.toc_page_marker_count
}

pub fn has_many_deep_numbers(text: &str, config: &ClassifierConfig) -> bool {
    DEEP_NUMBER_REGEX.find_iter(text).count() > config.toc_deep_number_count
}

pub fn has_table_borders(text: &str, config: &ClassifierConfig) -> bool {
    text.chars().filter(|c| TABLE_BORDER_CHARS.contains(c)).count() > config.table_border_chars
}

pub fn has_table_caption(text: &str, _config: &ClassifierConfig) -> bool {
    TABLE_CAPTION_REGEX.is_match(text) || FUNCTION_MATRIX_REGEX.is_match(text) || PIPE_ROW_REGEX.is_match(text)
}

/// Many non-empty lines of roughly the same length suggest rows of a table.
///
/// Only lines split into several cells count as rows; wrapped prose lines
/// are just as even but hold one run of text.
pub fn has_uniform_lines(text: &str, config: &ClassifierConfig) -> bool {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() <= config.uniform_min_lines {
        return false;
    }

    let rows: Vec<(usize, usize)> = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| (line.chars().count(), line.split_whitespace().count()))
        .collect();
    if rows.len() <= config.uniform_min_lines {
        return false;
    }

    let mean = rows.iter().map(|(len, _)| len).sum::<usize>() as f64 / rows.len() as f64;
    let similar = rows
        .iter()
        .filter(|(len, cells)| {
            *cells >= config.uniform_min_cells && (*len as f64 - mean).abs() < mean * config.uniform_line_tolerance
        })
        .count();

    similar as f64 > rows.len() as f64 * config.uniform_line_share
}
