/*!
 * # pagewise - page-by-page document translation
 *
 * A Rust library for translating text extracted from paginated documents,
 * typically Chinese technical specifications, one page at a time.
 *
 * ## Features
 *
 * - Load pages from a JSON page list or form-feed separated text
 * - Clean extraction artifacts and detect tables of contents and tables
 * - Split long pages at paragraph, sentence or clause boundaries
 * - Translate with bounded retries and exponential backoff using:
 *   - Google web translation endpoint
 *   - Ollama (local LLM)
 *   - Anthropic API
 * - Translate TOC pages entry by entry, keeping numbers and page markers
 * - Recover the section structure and map every page to its section
 * - JSON, CSV and structure reports
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `document`: Page input, page selection and per-page results
 * - `translation`: The translation core:
 *   - `translation::sanitizer`: Text normalization
 *   - `translation::classifier`: Content classification
 *   - `translation::chunking`: Splitting and merging
 *   - `translation::core`: Retrying translation client
 *   - `translation::toc`: TOC page translation
 *   - `translation::pipeline`: Page routing and sequential runs
 * - `toc_structure`: TOC parsing and page to section mapping
 * - `report`: JSON, CSV and structure report writers
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `providers`: Translation provider clients
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod report;
pub mod toc_structure;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use document::{Page, PageSelection, PageStatus, TranslationResult};
pub use errors::{AppError, ProviderError, TranslationFailure};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t};
pub use toc_structure::{PageSectionMap, TocItem, TocStructureParser};
pub use translation::{TranslationClient, TranslationOutcome};
