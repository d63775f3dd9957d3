/*!
 * Document structure recovered from the table of contents.
 *
 * `TocStructureParser` turns TOC text into numbered section entries
 * (`"3.1.2"` is level 3 with parent `"3.1"`), builds the section forest, and
 * maps every page to the section it belongs to. A page's own section number
 * is detected from the first characters of its text; pages without one
 * inherit the section of the closest preceding page.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::document::Page;
use crate::translation::classifier::{ContentClassifier, ContentKind};
use crate::translation::sanitizer::TextSanitizer;
use crate::translation::toc::{contains_section_keyword, DOT_LEADER};

/// Only the start of a page is searched for its section number
const SECTION_SEARCH_CHARS: usize = 2000;
/// Longest accepted section number, in characters
const MAX_SECTION_LEN: usize = 10;
const MAX_SECTION_DOTS: usize = 4;

// Number, title, dot leader, page as "12" or "- 12 -"
static ENTRY_WITH_PAGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(\d+(?:\.\d+){{0,4}})\.?\s*([^\d\s.].*?)\s*{}\s*(?:-\s*(\d+)\s*-|(\d+))$",
        DOT_LEADER
    ))
    .unwrap()
});
// Number, title, dot leader without a page
static ENTRY_WITH_LEADER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(\d+(?:\.\d+){{0,4}})\.?\s*([^\d\s.].*?)\s*{}\s*$", DOT_LEADER)).unwrap()
});
// Number, digit-free title, optional page
static ENTRY_PLAIN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+(?:\.\d+){0,4})\.?\s+([^\d\s.][^\d]*?)(?:\s+(\d+))?$").unwrap()
});

static SECTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // "3.1.1 Title" at the very start
        r"^(\d+(?:\.\d+){0,4})\s+[^\d\n]",
        // "3.1.1 Title" at a line start
        r"\n(\d+(?:\.\d+){0,4})\s+[^\d\n]",
        // "第3章"
        r"第?\s*(\d+(?:\.\d+){0,4})\s*章",
        // "3.1、"
        r"(\d+(?:\.\d+){0,4})\s*[、，]",
        // number followed by a Han character
        r"(?:^|\n)(\d+(?:\.\d+){0,4})\s*[\x{4e00}-\x{9fff}]",
        // number followed by an uppercase Latin letter
        r"(?:^|\n)(\d+(?:\.\d+){0,4})\s+[A-Z]",
        // dotted number alone
        r"(?:^|\n)(\d+(?:\.\d+){1,4})(?:\s|$)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// One table-of-contents entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocItem {
    /// Dot-separated section number, empty for keyword entries
    pub number: String,
    pub title: String,
    /// count('.') + 1, or 0 for keyword entries
    pub level: usize,
    pub page: Option<u32>,
    /// Number with the last segment removed
    pub parent: Option<String>,
}

impl TocItem {
    pub fn new(number: &str, title: &str, page: Option<u32>) -> Self {
        let parent = number.rsplit_once('.').map(|(parent, _)| parent.to_string());
        Self {
            number: number.to_string(),
            title: title.trim().to_string(),
            level: section_level(number),
            page,
            parent,
        }
    }

    /// Unnumbered entry kept because it names a well-known section
    pub fn keyword(title: &str) -> Self {
        Self {
            number: String::new(),
            title: title.trim().to_string(),
            level: 0,
            page: None,
            parent: None,
        }
    }
}

/// Depth of a section number: "3" is 1, "3.1.2" is 3
pub fn section_level(number: &str) -> usize {
    if number.is_empty() { 0 } else { number.matches('.').count() + 1 }
}

/// A TOC entry with its subsections
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocNode {
    pub item: TocItem,
    pub children: Vec<TocNode>,
}

/// Page number to section number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageSectionMap {
    pub sections: BTreeMap<u32, String>,
    /// Pages whose own text named their section
    pub direct_hits: usize,
    /// Pages that inherited the section of a preceding page
    pub filled: usize,
}

impl PageSectionMap {
    pub fn get(&self, page_number: u32) -> Option<&str> {
        self.sections.get(&page_number).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Parser and index for a document's section structure
#[derive(Debug, Clone, Default)]
pub struct TocStructureParser {
    items: Vec<TocItem>,
}

impl TocStructureParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[TocItem] {
        &self.items
    }

    /// Parse TOC text, replacing any previously parsed entries
    pub fn parse(&mut self, toc_text: &str) -> &[TocItem] {
        self.items = parse_toc_text(toc_text);
        &self.items
    }

    /// Parse every page that classifies as a table of contents.
    ///
    /// Entries repeated on several TOC pages are kept once.
    pub fn parse_pages(&mut self, pages: &[Page], classifier: &ContentClassifier) -> &[TocItem] {
        let mut items: Vec<TocItem> = Vec::new();
        for page in pages {
            let text = TextSanitizer::clean_preserving_lines(&page.text);
            if classifier.classify(&text) != ContentKind::Toc {
                continue;
            }
            for item in parse_toc_text(&text) {
                let duplicate = !item.number.is_empty() && items.iter().any(|known| known.number == item.number);
                if !duplicate {
                    items.push(item);
                }
            }
        }
        debug!("Parsed {} TOC entries", items.len());
        self.items = items;
        &self.items
    }

    /// Find the TOC entry for a section number
    pub fn section_info(&self, number: &str) -> Option<&TocItem> {
        self.items.iter().find(|item| item.number == number)
    }

    /// Arrange the parsed entries into a forest.
    ///
    /// An entry whose ancestor is missing attaches to the deepest ancestor
    /// that exists, or becomes a root.
    pub fn build_hierarchy(&self) -> Vec<TocNode> {
        let mut roots: Vec<TocNode> = Vec::new();

        for item in &self.items {
            let path = hierarchy_path(&item.number);
            let ancestors = path.len().saturating_sub(1);

            let mut current = &mut roots;
            for ancestor in &path[..ancestors] {
                if let Some(pos) = current.iter().position(|node| &node.item.number == ancestor) {
                    current = &mut current[pos].children;
                }
            }

            current.push(TocNode {
                item: item.clone(),
                children: Vec::new(),
            });
        }

        roots
    }

    /// Section number named near the top of a page
    pub fn extract_section(page_text: &str) -> Option<String> {
        let search_text: String = page_text.chars().take(SECTION_SEARCH_CHARS).collect();

        SECTION_PATTERNS.iter().find_map(|pattern| {
            let section = pattern.captures(&search_text)?.get(1)?.as_str();
            let valid = section.chars().count() <= MAX_SECTION_LEN
                && section.matches('.').count() <= MAX_SECTION_DOTS;
            valid.then(|| section.to_string())
        })
    }

    /// Map pages to sections: direct detection first, then forward fill in
    /// ascending page order. Pages before the first detected section stay
    /// unmapped.
    pub fn map_pages(pages: &[Page]) -> PageSectionMap {
        let mut sections = BTreeMap::new();

        for page in pages {
            if let Some(section) = Self::extract_section(&page.text) {
                sections.insert(page.page_number, section);
            }
        }
        let direct_hits = sections.len();

        let mut page_numbers: Vec<u32> = pages.iter().map(|p| p.page_number).collect();
        page_numbers.sort_unstable();
        page_numbers.dedup();

        let mut current: Option<String> = None;
        let mut filled = 0;
        for page_number in page_numbers {
            match sections.get(&page_number) {
                Some(section) => current = Some(section.clone()),
                None => {
                    if let Some(section) = &current {
                        sections.insert(page_number, section.clone());
                        filled += 1;
                    }
                }
            }
        }

        debug!("Section map: {} direct, {} filled", direct_hits, filled);
        PageSectionMap {
            sections,
            direct_hits,
            filled,
        }
    }
}

/// Parse TOC text line by line; the first matching pattern wins
pub fn parse_toc_text(toc_text: &str) -> Vec<TocItem> {
    toc_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(parse_toc_line)
        .collect()
}

fn parse_toc_line(line: &str) -> Option<TocItem> {
    if let Some(caps) = ENTRY_WITH_PAGE_REGEX.captures(line) {
        let page = caps.get(3).or_else(|| caps.get(4)).and_then(|m| m.as_str().parse().ok());
        return Some(TocItem::new(&caps[1], &caps[2], page));
    }
    if let Some(caps) = ENTRY_WITH_LEADER_REGEX.captures(line) {
        return Some(TocItem::new(&caps[1], &caps[2], None));
    }
    if let Some(caps) = ENTRY_PLAIN_REGEX.captures(line) {
        let page = caps.get(3).and_then(|m| m.as_str().parse().ok());
        return Some(TocItem::new(&caps[1], &caps[2], page));
    }
    contains_section_keyword(line).then(|| TocItem::keyword(line))
}

/// Every ancestor of a section number, itself included: "3.1.2" gives
/// ["3", "3.1", "3.1.2"]
pub fn hierarchy_path(number: &str) -> Vec<String> {
    if number.is_empty() {
        return Vec::new();
    }
    let parts: Vec<&str> = number.split('.').collect();
    (1..=parts.len()).map(|n| parts[..n].join(".")).collect()
}

/// Section line indented two spaces per level below the first
pub fn format_hierarchy_text(number: &str, title: &str) -> String {
    let indent = "  ".repeat(section_level(number).saturating_sub(1));
    format!("{}{} {}", indent, number, title).trim_end().to_string()
}
