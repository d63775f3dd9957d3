/*!
 * Splitting long page text into translation-sized chunks.
 *
 * Split points are chosen by descending preference: paragraph break, end of
 * sentence, clause separator, any whitespace, and finally a hard cut. Each
 * chunk after the first repeats `overlap` characters of the previous one so
 * the provider sees some context. All offsets count characters, not bytes.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::app_config::{ChunkingConfig, MergeStrategy};

static PARAGRAPH_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\n+").unwrap());
static SENTENCE_END_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[。！？.!?]\s*").unwrap());
static CLAUSE_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[，,;；]\s*").unwrap());
static WHITESPACE_RUN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// Shortest token run treated as a duplicated overlap when merging
const MIN_OVERLAP_TOKENS: usize = 3;

/// How a chunk came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    /// The whole text fit in one chunk
    Complete,
    /// Cut at a chosen split point
    Split,
    /// Remaining tail after the last split
    Final,
}

/// A bounded slice of page text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextChunk {
    pub content: String,
    /// Character offset of the first character
    pub start_index: usize,
    /// Character offset one past the last character
    pub end_index: usize,
    pub kind: ChunkKind,
}

impl TextChunk {
    pub fn char_len(&self) -> usize {
        self.end_index - self.start_index
    }
}

/// Boundary-aware text splitter
#[derive(Debug, Clone)]
pub struct ChunkSplitter {
    config: ChunkingConfig,
}

impl Default for ChunkSplitter {
    fn default() -> Self {
        Self::new(ChunkingConfig::default())
    }
}

impl ChunkSplitter {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Whether a page is long enough to be chunked at all
    pub fn needs_chunking(&self, text: &str) -> bool {
        text.chars().count() > self.config.chunking_threshold
    }

    /// Split text into ordered chunks
    pub fn split(&self, text: &str) -> Vec<TextChunk> {
        let max_length = self.config.max_length.max(1);
        let offsets = char_byte_offsets(text);
        let total = offsets.len() - 1;

        if total <= max_length {
            return vec![TextChunk {
                content: text.to_string(),
                start_index: 0,
                end_index: total,
                kind: ChunkKind::Complete,
            }];
        }

        let slice = |from: usize, to: usize| &text[offsets[from]..offsets[to]];
        let mut chunks = Vec::new();
        let mut position = 0;

        while position < total {
            if position + max_length >= total {
                chunks.push(TextChunk {
                    content: slice(position, total).to_string(),
                    start_index: position,
                    end_index: total,
                    kind: ChunkKind::Final,
                });
                break;
            }

            let window_end = (position + max_length + self.config.lookahead).min(total);
            let split_point = find_best_split_point(slice(position, window_end), max_length);
            let end = position + split_point;

            chunks.push(TextChunk {
                content: slice(position, end).to_string(),
                start_index: position,
                end_index: end,
                kind: ChunkKind::Split,
            });

            let next = end.saturating_sub(self.config.overlap);
            position = if next > position { next } else { end };
        }

        chunks
    }

    /// Join translated chunk texts using the configured strategy
    pub fn merge(&self, translated_parts: &[String]) -> String {
        merge_translations(translated_parts, self.config.merge_strategy)
    }
}

/// Byte offset of every character plus the end of the string
fn char_byte_offsets(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect()
}

/// Character-based prefix of `text`
fn char_prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// Pick the split point inside `window`, as a character count in `1..=max_length`
pub fn find_best_split_point(window: &str, max_length: usize) -> usize {
    let char_pos = |byte: usize| window[..byte].chars().count();
    let max = max_length as f64;

    // Paragraph break: split right after the first two newlines
    let paragraph = PARAGRAPH_BREAK_REGEX
        .find_iter(char_prefix(window, max_length + 100))
        .map(|m| char_pos(m.start()))
        .filter(|start| start + 2 <= max_length)
        .max();
    if let Some(start) = paragraph {
        if start as f64 > max * 0.7 {
            return start + 2;
        }
    }

    let best_end = |regex: &Regex, extent: usize| {
        regex
            .find_iter(char_prefix(window, max_length + extent))
            .map(|m| char_pos(m.end()))
            .filter(|end| *end <= max_length)
            .max()
    };

    if let Some(end) = best_end(&SENTENCE_END_REGEX, 50) {
        if end as f64 > max * 0.7 {
            return end;
        }
    }

    if let Some(end) = best_end(&CLAUSE_BREAK_REGEX, 20) {
        if end as f64 > max * 0.8 {
            return end;
        }
    }

    if let Some(end) = best_end(&WHITESPACE_RUN_REGEX, 10) {
        if end > 0 {
            return end;
        }
    }

    max_length
}

/// Join translated chunks.
///
/// `Concatenate` keeps whatever the overlap produced, so the repeated context
/// shows up twice. `DropOverlap` removes the longest run of whitespace tokens
/// that ends the text so far and also starts the next part.
pub fn merge_translations(parts: &[String], strategy: MergeStrategy) -> String {
    match strategy {
        MergeStrategy::Concatenate => parts.join(" "),
        MergeStrategy::DropOverlap => {
            let mut merged: Vec<&str> = Vec::new();
            for part in parts {
                let tokens: Vec<&str> = part.split_whitespace().collect();
                let shared = shared_token_run(&merged, &tokens);
                merged.extend_from_slice(&tokens[shared..]);
            }
            merged.join(" ")
        }
    }
}

fn shared_token_run(left: &[&str], right: &[&str]) -> usize {
    let limit = left.len().min(right.len());
    (MIN_OVERLAP_TOKENS..=limit)
        .rev()
        .find(|k| left[left.len() - k..] == right[..*k])
        .unwrap_or(0)
}
