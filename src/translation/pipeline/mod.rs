/*!
 * Page translation pipeline.
 *
 * - `page`: routes one page through classification, chunking and TOC handling
 * - `orchestrator`: runs the page router over a whole document with pacing
 */

pub mod orchestrator;
pub mod page;

pub use orchestrator::{PagePipeline, PageProgress, PipelineRun, RunSummary};
pub use page::{PageTranslation, PageTranslator, FORMATTING_PAYLOAD_PREFIX};
