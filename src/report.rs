/*!
 * Report writers for translated documents.
 *
 * Three outputs are produced from the per-page results:
 * - a JSON summary holding every page result,
 * - a CSV overview with truncated text samples for spreadsheet review,
 * - an optional structure report mapping pages to TOC sections.
 */

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::path::Path;

use crate::document::{Page, PageStatus, TranslationResult};
use crate::file_utils::FileManager;
use crate::toc_structure::{hierarchy_path, PageSectionMap, TocItem, TocNode, TocStructureParser};
use crate::translation::classifier::ContentClassifier;

/// Characters of text kept in CSV samples
pub const SAMPLE_CHARS: usize = 200;

/// Top-level JSON report
#[derive(Debug, Serialize)]
pub struct JsonSummary<'a> {
    pub total_pages_processed: usize,
    pub timestamp: String,
    pub successful_translations: usize,
    pub version: String,
    pub pages: &'a [TranslationResult],
}

impl<'a> JsonSummary<'a> {
    pub fn new(results: &'a [TranslationResult]) -> Self {
        Self {
            total_pages_processed: results.len(),
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            successful_translations: results.iter().filter(|r| r.is_success()).count(),
            version: format!("pagewise {}", env!("CARGO_PKG_VERSION")),
            pages: results,
        }
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Page")]
    page: u32,
    #[serde(rename = "Original_Sample")]
    original_sample: String,
    #[serde(rename = "Translation")]
    translation: String,
    #[serde(rename = "Original_Length")]
    original_length: usize,
    #[serde(rename = "Translation_Length")]
    translation_length: usize,
    #[serde(rename = "Status")]
    status: &'a str,
}

/// Page entry of the structure report
#[derive(Debug, Serialize)]
pub struct StructuredPage {
    pub page_number: u32,
    pub section: Option<String>,
    pub section_title: Option<String>,
    pub hierarchy_path: Vec<String>,
    pub status: Option<PageStatus>,
}

/// Document structure with every page placed in its section
#[derive(Debug, Serialize)]
pub struct StructureReport {
    pub toc_items: Vec<TocItem>,
    pub hierarchy: Vec<TocNode>,
    pub page_sections: PageSectionMap,
    pub pages: Vec<StructuredPage>,
}

impl StructureReport {
    /// Parse the TOC pages, map every page and attach translation statuses
    pub fn build(pages: &[Page], results: &[TranslationResult], classifier: &ContentClassifier) -> Self {
        let mut parser = TocStructureParser::new();
        parser.parse_pages(pages, classifier);
        let page_sections = TocStructureParser::map_pages(pages);

        let structured = pages
            .iter()
            .map(|page| {
                let section = page_sections.get(page.page_number).map(str::to_string);
                let section_title = section
                    .as_deref()
                    .and_then(|number| parser.section_info(number))
                    .map(|item| item.title.clone());
                StructuredPage {
                    page_number: page.page_number,
                    hierarchy_path: section.as_deref().map(hierarchy_path).unwrap_or_default(),
                    section,
                    section_title,
                    status: results
                        .iter()
                        .find(|r| r.page_number == page.page_number)
                        .map(|r| r.status),
                }
            })
            .collect();

        Self {
            toc_items: parser.items().to_vec(),
            hierarchy: parser.build_hierarchy(),
            page_sections,
            pages: structured,
        }
    }
}

/// Cut text to `SAMPLE_CHARS` characters, marking the cut with "..."
pub fn sample_text(text: &str) -> String {
    match text.char_indices().nth(SAMPLE_CHARS) {
        Some((byte, _)) => format!("{}...", &text[..byte]),
        None => text.to_string(),
    }
}

/// Render the CSV overview
pub fn render_csv(results: &[TranslationResult]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for result in results {
        writer
            .serialize(CsvRow {
                page: result.page_number,
                original_sample: sample_text(&result.original_text),
                translation: sample_text(&result.translated_text),
                original_length: result.original_char_count,
                translation_length: result.translated_char_count,
                status: result.status.label(),
            })
            .context("Failed to encode CSV row")?;
    }

    let bytes = writer.into_inner().context("Failed to flush CSV")?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

pub fn write_json_summary<P: AsRef<Path>>(path: P, results: &[TranslationResult]) -> Result<()> {
    let json = serde_json::to_string_pretty(&JsonSummary::new(results))?;
    FileManager::write_to_file(path, &json)
}

pub fn write_csv<P: AsRef<Path>>(path: P, results: &[TranslationResult]) -> Result<()> {
    FileManager::write_to_file(path, &render_csv(results)?)
}

pub fn write_structure<P: AsRef<Path>>(path: P, report: &StructureReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    FileManager::write_to_file(path, &json)
}
