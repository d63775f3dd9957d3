/*!
 * Sequential run over all selected pages.
 *
 * Pages are translated strictly one after another with a pacing delay in
 * between. Results are kept in memory and handed back at the end.
 */

use log::info;
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

use crate::app_config::Config;
use crate::document::{Page, PageStatus, TranslationResult};
use crate::translation::core::TranslationClient;

use super::page::PageTranslator;

/// Progress notification sent after every page
#[derive(Debug, Clone, PartialEq)]
pub struct PageProgress {
    /// Pages finished so far
    pub completed: usize,
    pub total: usize,
    pub page_number: u32,
    pub status: PageStatus,
}

impl PageProgress {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 { 1.0 } else { self.completed as f32 / self.total as f32 }
    }
}

/// Totals of a finished run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub total_pages: usize,
    pub successful: usize,
    pub partial: usize,
    pub failed: usize,
    pub skipped: usize,
    pub elapsed_seconds: f64,
}

impl RunSummary {
    pub fn from_results(results: &[TranslationResult], elapsed: Duration) -> Self {
        let count = |status: PageStatus| results.iter().filter(|r| r.status == status).count();
        Self {
            total_pages: results.len(),
            successful: count(PageStatus::Success),
            partial: count(PageStatus::Partial),
            failed: count(PageStatus::Failed),
            skipped: count(PageStatus::Skipped),
            elapsed_seconds: elapsed.as_secs_f64(),
        }
    }

    /// Share of pages fully translated, in percent
    pub fn success_rate(&self) -> f64 {
        if self.total_pages == 0 {
            0.0
        } else {
            self.successful as f64 * 100.0 / self.total_pages as f64
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Translation Summary:\n\
             Pages processed: {}\n\
             Successful: {} ({:.1}%)\n\
             Partial: {}\n\
             Failed: {}\n\
             Skipped: {}\n\
             Elapsed time: {:.1} seconds",
            self.total_pages,
            self.successful,
            self.success_rate(),
            self.partial,
            self.failed,
            self.skipped,
            self.elapsed_seconds,
        )
    }
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub results: Vec<TranslationResult>,
    pub summary: RunSummary,
}

/// Page-by-page translation pipeline
#[derive(Debug, Clone)]
pub struct PagePipeline {
    translator: PageTranslator,
    page_delay: Duration,
}

impl PagePipeline {
    pub fn new(client: TranslationClient, config: &Config) -> Self {
        Self {
            translator: PageTranslator::new(client, config),
            page_delay: config.pacing.page_delay(),
        }
    }

    pub fn translator(&self) -> &PageTranslator {
        &self.translator
    }

    /// Translate pages in order, reporting progress after each one
    pub async fn translate_pages(
        &self,
        pages: &[Page],
        progress_callback: Option<Box<dyn Fn(PageProgress) + Send>>,
    ) -> PipelineRun {
        let start = Instant::now();
        let total = pages.len();
        let mut results = Vec::with_capacity(total);

        info!("Translating {} pages with {}", total, self.translator.client().provider_name());

        for (index, page) in pages.iter().enumerate() {
            let result = self.translator.translate_page(page).await;

            if let Some(callback) = &progress_callback {
                callback(PageProgress {
                    completed: index + 1,
                    total,
                    page_number: page.page_number,
                    status: result.status,
                });
            }
            results.push(result);

            if index + 1 < total && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        let summary = RunSummary::from_results(&results, start.elapsed());
        PipelineRun { results, summary }
    }
}
