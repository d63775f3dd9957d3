/*!
 * Tests for TOC structure parsing and page to section mapping
 */

use pagewise::document::Page;
use pagewise::toc_structure::{
    format_hierarchy_text, hierarchy_path, parse_toc_text, section_level, TocItem, TocStructureParser,
};
use pagewise::translation::ContentClassifier;

const TWO_ITEM_TOC: &str = "1 系统概述 ........................... 1\n1.1 项目背景 ......................... 2";

#[test]
fn test_parse_withTwoEntries_shouldBuildNumberedItems() {
    let mut parser = TocStructureParser::new();
    let items = parser.parse(TWO_ITEM_TOC);

    assert_eq!(items.len(), 2);
    assert_eq!(items[0], TocItem {
        number: "1".to_string(),
        title: "系统概述".to_string(),
        level: 1,
        page: Some(1),
        parent: None,
    });
    assert_eq!(items[1], TocItem {
        number: "1.1".to_string(),
        title: "项目背景".to_string(),
        level: 2,
        page: Some(2),
        parent: Some("1".to_string()),
    });
}

#[test]
fn test_parse_toc_text_withLeaderButNoPage_shouldHaveNoPage() {
    let items = parse_toc_text("2.3 接口设计 ..........");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].number, "2.3");
    assert_eq!(items[0].title, "接口设计");
    assert_eq!(items[0].page, None);
}

#[test]
fn test_parse_toc_text_withPlainEntries_shouldReadOptionalPage() {
    let items = parse_toc_text("3 总体设计 12\n3.1 模块划分");
    assert_eq!(items[0].page, Some(12));
    assert_eq!(items[0].title, "总体设计");
    assert_eq!(items[1].page, None);
    assert_eq!(items[1].parent.as_deref(), Some("3"));
}

#[test]
fn test_parse_toc_text_withKeywordLine_shouldKeepUnnumberedEntry() {
    let items = parse_toc_text("目录\n前言\n1 概述 ..... 1");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0], TocItem::keyword("前言"));
    assert_eq!(items[0].level, 0);
    assert_eq!(items[1].number, "1");
}

#[test]
fn test_parse_withSecondCall_shouldReplaceEntries() {
    let mut parser = TocStructureParser::new();
    parser.parse(TWO_ITEM_TOC);
    parser.parse("5 附录 ..... 40");
    assert_eq!(parser.items().len(), 1);
    assert_eq!(parser.items()[0].number, "5");
}

#[test]
fn test_section_level_shouldCountSegments() {
    assert_eq!(section_level("3"), 1);
    assert_eq!(section_level("3.1.2"), 3);
    assert_eq!(section_level(""), 0);
}

#[test]
fn test_section_info_shouldFindByNumber() {
    let mut parser = TocStructureParser::new();
    parser.parse(TWO_ITEM_TOC);

    assert_eq!(parser.section_info("1.1").map(|i| i.title.as_str()), Some("项目背景"));
    assert!(parser.section_info("9").is_none());
}

#[test]
fn test_build_hierarchy_shouldNestChildrenUnderParents() {
    let mut parser = TocStructureParser::new();
    parser.parse("1 概述 ... 1\n1.1 背景 ... 1\n1.2 目标 ... 2\n2 架构 ... 3\n2.1.1 数据层 ... 4");

    let roots = parser.build_hierarchy();

    assert_eq!(roots.len(), 2);
    let children: Vec<&str> = roots[0].children.iter().map(|n| n.item.number.as_str()).collect();
    assert_eq!(children, vec!["1.1", "1.2"]);
    // 2.1 is missing, so 2.1.1 hangs under 2
    assert_eq!(roots[1].children.len(), 1);
    assert_eq!(roots[1].children[0].item.number, "2.1.1");
}

#[test]
fn test_build_hierarchy_withOrphan_shouldBecomeRoot() {
    let mut parser = TocStructureParser::new();
    parser.parse("4.2 部署 ... 9");
    let roots = parser.build_hierarchy();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].item.number, "4.2");
}

#[test]
fn test_extract_section_withNumberedHeading_shouldReturnNumber() {
    assert_eq!(
        TocStructureParser::extract_section("3.1.1 系统概述\n这是内容..."),
        Some("3.1.1".to_string())
    );
}

#[test]
fn test_extract_section_withHeadingOnLaterLine_shouldReturnNumber() {
    assert_eq!(
        TocStructureParser::extract_section("页眉文字\n4.2 部署方案\n正文"),
        Some("4.2".to_string())
    );
}

#[test]
fn test_extract_section_withChapterMarker_shouldReturnNumber() {
    assert_eq!(TocStructureParser::extract_section("第3章 总体设计"), Some("3".to_string()));
}

#[test]
fn test_extract_section_withoutNumber_shouldReturnNone() {
    assert_eq!(TocStructureParser::extract_section("这是一段没有编号的正文"), None);
    assert_eq!(TocStructureParser::extract_section(""), None);
}

#[test]
fn test_extract_section_withOverlongNumber_shouldReturnNone() {
    assert_eq!(TocStructureParser::extract_section("12345678901 系统"), None);
}

#[test]
fn test_extract_section_withNumberBeyondSearchWindow_shouldReturnNone() {
    let text = format!("{}\n5.1 测试", "字".repeat(2500));
    assert_eq!(TocStructureParser::extract_section(&text), None);
}

#[test]
fn test_map_pages_shouldForwardFillSections() {
    let pages = vec![
        Page::new(1, "企业文档管理系统 技术规范书"),
        Page::new(2, "1 概述\n正文内容"),
        Page::new(3, "正文内容继续"),
        Page::new(4, "2.1 总体设计\n正文"),
        Page::new(5, "更多正文"),
    ];

    let map = TocStructureParser::map_pages(&pages);

    assert_eq!(map.get(1), None);
    assert_eq!(map.get(2), Some("1"));
    assert_eq!(map.get(3), Some("1"));
    assert_eq!(map.get(4), Some("2.1"));
    assert_eq!(map.get(5), Some("2.1"));
    assert_eq!(map.direct_hits, 2);
    assert_eq!(map.filled, 2);
    assert_eq!(map.len(), 4);
}

#[test]
fn test_map_pages_withUnorderedInput_shouldFillInPageOrder() {
    let pages = vec![
        Page::new(3, "正文内容继续"),
        Page::new(1, "1 概述\n正文内容"),
        Page::new(2, "更多正文"),
    ];

    let map = TocStructureParser::map_pages(&pages);

    assert_eq!(map.get(2), Some("1"));
    assert_eq!(map.get(3), Some("1"));
}

#[test]
fn test_map_pages_withNoSections_shouldBeEmpty() {
    let map = TocStructureParser::map_pages(&[Page::new(1, "正文"), Page::new(2, "正文")]);
    assert!(map.is_empty());
}

#[test]
fn test_parse_pages_shouldOnlyReadTocPagesAndDedupe() {
    let classifier = ContentClassifier::default();
    let pages = vec![
        Page::new(1, "目录\n1 概述 ..... 1\n2 架构 ..... 3"),
        Page::new(2, "目录（续）\n2 架构 ..... 3\n3 部署 ..... 9"),
        Page::new(3, "4 这一页是正文内容的一部分 5"),
    ];

    let mut parser = TocStructureParser::new();
    let numbers: Vec<String> = parser
        .parse_pages(&pages, &classifier)
        .iter()
        .map(|i| i.number.clone())
        .collect();

    assert_eq!(numbers, vec!["1", "2", "3"]);
}

#[test]
fn test_hierarchy_path_shouldListAncestors() {
    assert_eq!(hierarchy_path("3.1.2"), vec!["3", "3.1", "3.1.2"]);
    assert!(hierarchy_path("").is_empty());
}

#[test]
fn test_format_hierarchy_text_shouldIndentByLevel() {
    assert_eq!(format_hierarchy_text("3.1.2", "数据流"), "    3.1.2 数据流");
    assert_eq!(format_hierarchy_text("1", ""), "1");
}
