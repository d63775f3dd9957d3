/*!
 * Tests for content classification
 */

use pagewise::app_config::ClassifierConfig;
use pagewise::translation::classifier::{has_table_caption, ContentClassifier, ContentKind, Heuristic};

fn classifier() -> ContentClassifier {
    ContentClassifier::default()
}

#[test]
fn test_classify_withSixtyPeriodsInTwoHundredChars_shouldBeToc() {
    let text = format!("{}{}", "概".repeat(140), ".".repeat(60));
    assert_eq!(text.chars().count(), 200);

    assert_eq!(classifier().classify(&text), ContentKind::Toc);
    assert_eq!(classifier().explain(&text), Some("toc_dot_ratio"));
}

#[test]
fn test_classify_withTocMarker_shouldBeToc() {
    assert_eq!(classifier().classify("目 录\n第一章 引言"), ContentKind::Toc);
    assert_eq!(classifier().explain("Table of Contents"), Some("toc_marker"));
    assert_eq!(classifier().classify("TABLE OF CONTENTS"), ContentKind::Toc);
}

#[test]
fn test_classify_withManyPageMarkers_shouldBeToc() {
    let text = (1..=11)
        .map(|i| format!("第{}章 系统功能的详细描述与说明文字内容 - {} -", i, i + 10))
        .collect::<Vec<_>>()
        .join("\n");

    assert_eq!(classifier().explain(&text), Some("toc_page_markers"));
}

#[test]
fn test_classify_withManyDeepSectionNumbers_shouldBeToc() {
    let text = (1..=16)
        .map(|i| format!("3.{}.1 系统功能的详细描述与说明文字", i))
        .collect::<Vec<_>>()
        .join("\n");

    assert_eq!(classifier().explain(&text), Some("toc_deep_numbers"));
}

#[test]
fn test_classify_withDashHeavyText_shouldBeToc() {
    assert_eq!(classifier().classify("概述 - 1 -\n架构 - 3 -"), ContentKind::Toc);
}

#[test]
fn test_classify_withBoxDrawingBorders_shouldBeTable() {
    let text = "┃名称┃类型┃说明┃\n├──────┤\n┃编号┃整数┃主键┃";
    assert_eq!(classifier().classify(text), ContentKind::Table);
    assert_eq!(classifier().explain(text), Some("table_border_chars"));
}

#[test]
fn test_classify_withTableCaption_shouldBeTable() {
    assert_eq!(classifier().classify("表3 接口参数说明如下所示"), ContentKind::Table);
    assert_eq!(classifier().classify("系统功能矩阵见下文"), ContentKind::Table);
}

#[test]
fn test_has_table_caption_withPipeRow_shouldMatch() {
    let config = ClassifierConfig::default();
    assert!(has_table_caption("| 名称 | 类型 | 说明 |", &config));
    assert!(!has_table_caption("普通的一句话", &config));
}

#[test]
fn test_classify_withUniformLines_shouldBeTable() {
    let text = "用户名称 字符串 必填\n用户编号 整数型 必填\n创建时间 日期型 可选\n更新时间 日期型 可选\n状态标志 整数型 必填";
    assert_eq!(classifier().explain(text), Some("table_uniform_lines"));
}

#[test]
fn test_classify_withWrappedProseLines_shouldBePlain() {
    let text = "本系统用于管理企业内部的文档资料并支持上传\n\
                检索和版本控制等常见的文档管理操作以及权限\n\
                分配功能，管理员可以为不同部门设置不同的访\n\
                问范围，普通用户只能查看授权范围内的文件。";
    assert_eq!(classifier().classify(text), ContentKind::Plain);
    assert_eq!(classifier().explain(text), None);
}

#[test]
fn test_classify_withSingleCellRowsAllowed_shouldTreatEvenLinesAsTable() {
    let config = ClassifierConfig {
        uniform_min_cells: 1,
        ..ClassifierConfig::default()
    };
    let text = "用户名称字段\n用户编号字段\n创建时间字段\n更新时间字段\n状态标志字段";
    assert_eq!(ContentClassifier::new(config).classify(text), ContentKind::Table);
}

#[test]
fn test_classify_withProse_shouldBePlain() {
    let text = "本系统用于管理企业内部的文档资料，支持上传、检索和版本控制。";
    assert_eq!(classifier().classify(text), ContentKind::Plain);
    assert_eq!(classifier().explain(text), None);
}

#[test]
fn test_classify_withEmptyText_shouldBePlain() {
    assert_eq!(classifier().classify(""), ContentKind::Plain);
}

#[test]
fn test_classify_withTocAndTableSignals_shouldPreferToc() {
    let text = "目录\n┃名称┃类型┃说明┃\n├──────┤";
    assert_eq!(classifier().classify(text), ContentKind::Toc);
}

#[test]
fn test_classify_withRaisedDotThreshold_shouldBePlain() {
    let config = ClassifierConfig {
        toc_dot_ratio: 0.5,
        ..ClassifierConfig::default()
    };
    let text = format!("{}{}", "概".repeat(140), ".".repeat(60));
    assert_eq!(ContentClassifier::new(config).classify(&text), ContentKind::Plain);
}

#[test]
fn test_with_heuristics_withEmptyList_shouldAlwaysBePlain() {
    let classifier = ContentClassifier::with_heuristics(ClassifierConfig::default(), Vec::new());
    assert_eq!(classifier.classify("目录"), ContentKind::Plain);
}

#[test]
fn test_with_heuristics_withCustomHeuristic_shouldUseIt() {
    fn mentions_appendix(text: &str, _config: &ClassifierConfig) -> bool {
        text.contains("附录")
    }

    let mut heuristics = vec![Heuristic {
        name: "appendix",
        kind: ContentKind::Table,
        test: mentions_appendix,
    }];
    heuristics.extend(ContentClassifier::default_heuristics());
    let classifier = ContentClassifier::with_heuristics(ClassifierConfig::default(), heuristics);

    assert_eq!(classifier.explain("附录 目录"), Some("appendix"));
}

#[test]
fn test_content_kind_shouldSerializeLowercase() {
    assert_eq!(serde_json::to_string(&ContentKind::Toc).unwrap(), "\"toc\"");
    assert_eq!(ContentKind::Table.to_string(), "table");
    assert_eq!(ContentKind::default(), ContentKind::Plain);
}
