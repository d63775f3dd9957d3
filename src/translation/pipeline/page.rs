/*!
 * Routing of a single page through the translation core.
 *
 * raw text → sanitize → pre-checks → classify, then one of:
 * - TOC: entry-by-entry title translation, other lines kept in place
 * - mostly formatting: translate only the CJK payload, or skip
 * - plain or table: whole-page call, or chunk, translate and merge
 */

use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::Instant;

use crate::app_config::Config;
use crate::document::{Page, PageStatus, TranslationResult};
use crate::errors::TranslationFailure;
use crate::translation::chunking::ChunkSplitter;
use crate::translation::classifier::{ContentClassifier, ContentKind};
use crate::translation::core::{TranslationClient, TranslationOutcome};
use crate::translation::sanitizer::TextSanitizer;
use crate::translation::toc::{TocTranslation, TocTranslator};

/// Prefix of translations made from the CJK payload of formatting-heavy text
pub const FORMATTING_PAYLOAD_PREFIX: &str = "[TOC] ";

/// Characters of cleaned text kept in a `MostlyFormatting` preview
const PREVIEW_CHARS: usize = 50;

/// Outcome of routing one page's text
#[derive(Debug, Clone, PartialEq)]
pub struct PageTranslation {
    pub outcome: TranslationOutcome,
    pub status: PageStatus,
    pub kind: ContentKind,
    /// Provider units attempted (chunks, TOC items or 1)
    pub units: usize,
}

impl PageTranslation {
    fn skipped(kind: ContentKind, failure: TranslationFailure) -> Self {
        Self {
            outcome: failure.into(),
            status: PageStatus::Skipped,
            kind,
            units: 0,
        }
    }

    fn single(kind: ContentKind, outcome: TranslationOutcome) -> Self {
        let status = if outcome.is_success() { PageStatus::Success } else { PageStatus::Failed };
        Self {
            outcome,
            status,
            kind,
            units: 1,
        }
    }

    fn from_toc(toc: TocTranslation) -> Self {
        let units = toc.units();
        let (outcome, status) = if toc.items_translated == 0 && toc.items_failed > 0 {
            let failure = toc
                .first_failure
                .unwrap_or(TranslationFailure::RetriesExhausted { attempts: 0 });
            (TranslationOutcome::Failed(failure), PageStatus::Failed)
        } else if toc.items_failed > 0 {
            (TranslationOutcome::Translated(toc.text), PageStatus::Partial)
        } else {
            (TranslationOutcome::Translated(toc.text), PageStatus::Success)
        };

        Self {
            outcome,
            status,
            kind: ContentKind::Toc,
            units,
        }
    }
}

/// Translates pages one at a time
#[derive(Debug, Clone)]
pub struct PageTranslator {
    client: TranslationClient,
    classifier: ContentClassifier,
    splitter: ChunkSplitter,
    toc: TocTranslator,
    chunk_delay: Duration,
    formatting_symbol_ratio: f64,
    min_cjk_payload: usize,
}

impl PageTranslator {
    pub fn new(client: TranslationClient, config: &Config) -> Self {
        Self {
            client,
            classifier: ContentClassifier::new(config.classifier.clone()),
            splitter: ChunkSplitter::new(config.chunking.clone()),
            toc: TocTranslator::new(&config.pacing),
            chunk_delay: config.pacing.chunk_delay(),
            formatting_symbol_ratio: config.translation.common.formatting_symbol_ratio,
            min_cjk_payload: config.translation.common.min_cjk_payload,
        }
    }

    pub fn client(&self) -> &TranslationClient {
        &self.client
    }

    pub fn classifier(&self) -> &ContentClassifier {
        &self.classifier
    }

    /// Translate one page and time it
    pub async fn translate_page(&self, page: &Page) -> TranslationResult {
        let start = Instant::now();
        let translation = self.translate_text(&page.text).await;
        let elapsed = start.elapsed().as_secs_f64();

        info!(
            "Page {}: {} ({}, {} units, {:.1}s)",
            page.page_number, translation.status, translation.kind, translation.units, elapsed
        );

        TranslationResult::new(
            page,
            translation.outcome.render(),
            translation.status,
            translation.kind,
            translation.outcome.failure().cloned(),
            elapsed,
        )
    }

    /// Route raw page text to the matching translation path
    pub async fn translate_text(&self, raw: &str) -> PageTranslation {
        let cleaned = match self.client.precheck(Some(raw)) {
            Ok(cleaned) => cleaned,
            Err(failure) => {
                debug!("Page skipped: {}", failure);
                return PageTranslation::skipped(ContentKind::Plain, failure);
            }
        };

        // Line structure matters for TOC parsing and paragraph splits
        let structured = TextSanitizer::clean_preserving_lines(raw);
        let kind = self.classifier.classify(&structured);
        if let Some(reason) = self.classifier.explain(&structured) {
            debug!("Classified as {} by {}", kind, reason);
        }

        match kind {
            ContentKind::Toc => {
                if let Some(toc) = self.toc.translate_block(&self.client, &structured).await {
                    return PageTranslation::from_toc(toc);
                }
                debug!("No TOC entries parsed, translating as text");
            }
            ContentKind::Table => {
                debug!("Table content passed through to text translation");
            }
            ContentKind::Plain => {}
        }

        if kind != ContentKind::Toc
            && TextSanitizer::formatting_symbol_ratio(&cleaned) > self.formatting_symbol_ratio
        {
            return self.translate_formatting_heavy(&cleaned, kind).await;
        }

        self.translate_chunked(&structured, kind).await
    }

    async fn translate_formatting_heavy(&self, cleaned: &str, kind: ContentKind) -> PageTranslation {
        let payload = TextSanitizer::extract_cjk_content(cleaned);
        if payload.chars().count() <= self.min_cjk_payload {
            let preview: String = cleaned.chars().take(PREVIEW_CHARS).collect();
            return PageTranslation::skipped(kind, TranslationFailure::MostlyFormatting { preview });
        }

        debug!("Formatting-heavy text, translating {} chars of payload", payload.chars().count());
        let (outcome, _) = self.client.translate_unit(&payload).await;
        let outcome = match outcome {
            TranslationOutcome::Translated(text) => {
                TranslationOutcome::Translated(format!("{}{}", FORMATTING_PAYLOAD_PREFIX, text))
            }
            failed => failed,
        };
        PageTranslation::single(kind, outcome)
    }

    async fn translate_chunked(&self, text: &str, kind: ContentKind) -> PageTranslation {
        if !self.splitter.needs_chunking(text) {
            let (outcome, _) = self.client.translate_unit(text).await;
            return PageTranslation::single(kind, outcome);
        }

        let chunks: Vec<_> = self
            .splitter
            .split(text)
            .into_iter()
            .filter(|chunk| !chunk.content.trim().is_empty())
            .collect();
        debug!("Split {} chars into {} chunks", text.chars().count(), chunks.len());

        let mut parts = Vec::with_capacity(chunks.len());
        let mut failed = 0;
        let mut first_failure = None;

        for (index, chunk) in chunks.iter().enumerate() {
            let (outcome, _) = self.client.translate_unit(&chunk.content).await;
            if let Some(failure) = outcome.failure() {
                warn!("Chunk {}/{} failed: {}", index + 1, chunks.len(), failure);
                failed += 1;
                first_failure.get_or_insert_with(|| failure.clone());
            }
            parts.push(outcome.render());

            if index + 1 < chunks.len() && !self.chunk_delay.is_zero() {
                tokio::time::sleep(self.chunk_delay).await;
            }
        }

        let units = chunks.len();
        if let Some(failure) = first_failure.filter(|_| failed == units) {
            return PageTranslation {
                outcome: TranslationOutcome::Failed(failure),
                status: PageStatus::Failed,
                kind,
                units,
            };
        }

        PageTranslation {
            outcome: TranslationOutcome::Translated(self.splitter.merge(&parts)),
            status: if failed > 0 { PageStatus::Partial } else { PageStatus::Success },
            kind,
            units,
        }
    }
}
