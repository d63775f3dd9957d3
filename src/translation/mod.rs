/*!
 * Translation core for extracted document pages.
 *
 * This module contains the functionality that turns raw page text into
 * translated text. It is split into several submodules:
 *
 * - `sanitizer`: Normalization of raw extracted text
 * - `classifier`: TOC / table / plain content detection
 * - `chunking`: Boundary-aware splitting and merging of long text
 * - `core`: Retrying translation client
 * - `cache`: In-run translation memory
 * - `toc`: Entry-by-entry translation of table-of-contents pages
 * - `pipeline`: Page routing and the sequential page run
 */

// Re-export main types for easier usage
pub use self::chunking::{ChunkKind, ChunkSplitter, TextChunk};
pub use self::classifier::{ContentClassifier, ContentKind};
pub use self::core::{CallStats, RetryPolicy, TimeoutBudget, TranslationClient, TranslationOutcome};
pub use self::pipeline::{PagePipeline, PageTranslator, RunSummary};
pub use self::sanitizer::TextSanitizer;

// Submodules
pub mod cache;
pub mod chunking;
pub mod classifier;
pub mod core;
pub mod pipeline;
pub mod sanitizer;
pub mod toc;
