/*!
 * Page input and per-page translation results.
 *
 * Pages come from an upstream extractor either as a JSON page list or as plain
 * text with form-feed page separators (the `pdftotext` layout). Loading never
 * enforces continuity; gaps and duplicate page numbers are only logged.
 */

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::errors::TranslationFailure;
use crate::file_utils::{FileManager, InputFormat};
use crate::translation::classifier::ContentKind;

/// Form feed, the page separator of plain text extractions
pub const PAGE_SEPARATOR: char = '\u{000C}';

/// One page of source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// 1-based page number
    pub page_number: u32,
    pub text: String,
}

impl Page {
    pub fn new(page_number: u32, text: impl Into<String>) -> Self {
        Self {
            page_number,
            text: text.into(),
        }
    }
}

// Extractors write null for pages they could not read
#[derive(Debug, Deserialize)]
struct RawPage {
    page_number: u32,
    #[serde(default)]
    text: Option<String>,
}

/// Parse a JSON page list
pub fn parse_json_pages(content: &str) -> Result<Vec<Page>> {
    let raw: Vec<RawPage> = serde_json::from_str(content).context("Invalid page list JSON")?;
    Ok(raw
        .into_iter()
        .map(|page| Page::new(page.page_number, page.text.unwrap_or_default()))
        .collect())
}

/// Split form-feed separated text into pages numbered from 1
pub fn parse_text_pages(content: &str) -> Vec<Page> {
    let mut parts: Vec<&str> = content.split(PAGE_SEPARATOR).collect();
    // pdftotext ends the last page with a separator too
    if parts.len() > 1 && parts.last().is_some_and(|last| last.trim().is_empty()) {
        parts.pop();
    }

    parts
        .into_iter()
        .enumerate()
        .map(|(index, text)| Page::new(index as u32 + 1, text))
        .collect()
}

/// Load pages from a file in either supported format
pub fn load_pages<P: AsRef<Path>>(path: P) -> Result<Vec<Page>> {
    let path = path.as_ref();
    let format = FileManager::detect_input_format(path)?;
    let content = FileManager::read_to_string(path)?;

    let pages = match format {
        InputFormat::PageJson => {
            parse_json_pages(&content).with_context(|| format!("Failed to load pages from {:?}", path))?
        }
        InputFormat::PlainText => parse_text_pages(&content),
    };

    debug!("Loaded {} pages from {:?} ({:?})", pages.len(), path, format);
    check_continuity(&pages).log();
    Ok(pages)
}

/// Gaps and duplicates in a page sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContinuityReport {
    /// Page numbers missing between the first and last page
    pub gaps: Vec<u32>,
    /// Page numbers seen more than once
    pub duplicates: Vec<u32>,
}

impl ContinuityReport {
    pub fn is_clean(&self) -> bool {
        self.gaps.is_empty() && self.duplicates.is_empty()
    }

    pub fn log(&self) {
        if !self.gaps.is_empty() {
            warn!("Missing page numbers: {:?}", self.gaps);
        }
        if !self.duplicates.is_empty() {
            warn!("Duplicate page numbers: {:?}", self.duplicates);
        }
    }
}

pub fn check_continuity(pages: &[Page]) -> ContinuityReport {
    let mut seen = HashSet::new();
    let mut duplicates = BTreeSet::new();
    for page in pages {
        if !seen.insert(page.page_number) {
            duplicates.insert(page.page_number);
        }
    }

    let gaps = match (seen.iter().min(), seen.iter().max()) {
        (Some(&first), Some(&last)) => (first..=last).filter(|n| !seen.contains(n)).collect(),
        _ => Vec::new(),
    };

    ContinuityReport {
        gaps,
        duplicates: duplicates.into_iter().collect(),
    }
}

/// Page-level status shown in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    /// Fully translated
    Success,
    /// Translated, but some chunks or TOC items failed
    Partial,
    /// Nothing usable came back
    Failed,
    /// Deliberately not sent to the provider
    Skipped,
}

impl PageStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Partial)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Partial => "Partial",
            Self::Failed => "Failed",
            Self::Skipped => "Skipped",
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Translation of one page, as handed to the report writers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub page_number: u32,
    pub original_text: String,
    /// Translation, or the bracketed failure marker
    pub translated_text: String,
    pub original_char_count: usize,
    pub translated_char_count: usize,
    pub elapsed_seconds: f64,
    pub status: PageStatus,
    #[serde(default)]
    pub content_kind: ContentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<TranslationFailure>,
}

impl TranslationResult {
    pub fn new(
        page: &Page,
        translated_text: String,
        status: PageStatus,
        content_kind: ContentKind,
        failure: Option<TranslationFailure>,
        elapsed_seconds: f64,
    ) -> Self {
        Self {
            page_number: page.page_number,
            original_char_count: page.text.chars().count(),
            original_text: page.text.clone(),
            translated_char_count: translated_text.chars().count(),
            translated_text,
            elapsed_seconds,
            status,
            content_kind,
            failure,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == PageStatus::Success
    }
}

/// Which pages a run should translate
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageSelection {
    #[default]
    All,
    Pages(BTreeSet<u32>),
}

impl PageSelection {
    pub fn contains(&self, page_number: u32) -> bool {
        match self {
            Self::All => true,
            Self::Pages(pages) => pages.contains(&page_number),
        }
    }

    /// Pages from `pages` that the selection keeps, in input order
    pub fn apply(&self, pages: &[Page]) -> Vec<Page> {
        pages.iter().filter(|p| self.contains(p.page_number)).cloned().collect()
    }

    /// Selection from the `--pages` list and the `--all` switch; `--all` wins
    pub fn from_flags(pages: Option<&str>, all: bool) -> Result<Self> {
        match pages {
            Some(spec) if !all => spec.parse(),
            _ => Ok(Self::All),
        }
    }
}

impl FromStr for PageSelection {
    type Err = anyhow::Error;

    /// Parse "all" or a list such as "2,3,10-12"
    fn from_str(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        if spec.is_empty() || spec.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        let mut pages = BTreeSet::new();
        for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('-') {
                Some((start, end)) => {
                    let start: u32 = start.trim().parse().with_context(|| format!("Invalid page range: {}", part))?;
                    let end: u32 = end.trim().parse().with_context(|| format!("Invalid page range: {}", part))?;
                    if start == 0 || start > end {
                        return Err(anyhow!("Invalid page range: {}", part));
                    }
                    pages.extend(start..=end);
                }
                None => {
                    let page: u32 = part.parse().with_context(|| format!("Invalid page number: {}", part))?;
                    if page == 0 {
                        return Err(anyhow!("Page numbers start at 1"));
                    }
                    pages.insert(page);
                }
            }
        }

        Ok(Self::Pages(pages))
    }
}

// Markers written into translated text by earlier versions
const LEGACY_FAILURE_MARKERS: [&str; 3] = ["[Translation failed", "[TOC -", "[Error"];

/// Page numbers whose previous translation failed.
///
/// Accepts a JSON summary (`{"pages": [...]}`) or a bare result array. Entries
/// carry either a `status` field or, in older reports, only the translated
/// text with its bracketed failure marker.
pub fn failed_pages_from_report(content: &str) -> Result<BTreeSet<u32>> {
    let value: Value = serde_json::from_str(content).context("Invalid report JSON")?;
    let entries = match &value {
        Value::Array(entries) => entries,
        Value::Object(map) => map
            .get("pages")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("Report has no \"pages\" array"))?,
        _ => return Err(anyhow!("Report must be a JSON array or object")),
    };

    let mut failed = BTreeSet::new();
    for entry in entries {
        let Some(page_number) = entry
            .get("page_number")
            .or_else(|| entry.get("page"))
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
        else {
            continue;
        };

        let status_failed = entry
            .get("status")
            .and_then(Value::as_str)
            .map(|status| {
                let status = status.to_lowercase();
                status == "failed" || status == "partial"
            });

        let is_failed = status_failed.unwrap_or_else(|| {
            entry
                .get("translated_text")
                .or_else(|| entry.get("translation"))
                .and_then(Value::as_str)
                .is_some_and(|text| LEGACY_FAILURE_MARKERS.iter().any(|m| text.starts_with(m)))
        });

        if is_failed {
            failed.insert(page_number);
        }
    }

    Ok(failed)
}
