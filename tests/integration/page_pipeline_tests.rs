/*!
 * End-to-end tests for page routing and sequential runs
 */

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pagewise::app_config::Config;
use pagewise::document::{Page, PageStatus};
use pagewise::errors::TranslationFailure;
use pagewise::translation::pipeline::{PageProgress, FORMATTING_PAYLOAD_PREFIX};
use pagewise::translation::{ContentKind, PagePipeline, PageTranslator};

use crate::common;
use crate::common::mock_providers::{configured_client_for, MockBehavior, MockProviderFactory};

fn translator(factory: &MockProviderFactory, config: &Config) -> PageTranslator {
    common::init_logging();
    PageTranslator::new(configured_client_for(factory, config), config)
}

fn single_attempt_config() -> Config {
    let mut config = common::fast_config();
    config.translation.common.retry_count = 1;
    config
}

fn long_prose() -> String {
    (0..80)
        .map(|i| format!("第{}条规定系统必须记录每一次登录操作的时间与来源地址。", i))
        .collect()
}

#[tokio::test]
async fn test_translate_text_withProse_shouldTranslateInOneCall() {
    let factory = MockProviderFactory::working();
    let page = translator(&factory, &common::fast_config()).translate_text(common::PROSE_PAGE).await;

    assert_eq!(page.status, PageStatus::Success);
    assert_eq!(page.kind, ContentKind::Plain);
    assert_eq!(page.units, 1);
    assert_eq!(page.outcome.text(), Some(format!("[EN] {}", common::PROSE_PAGE).as_str()));
}

#[tokio::test]
async fn test_translate_text_withPlaceholderPage_shouldSkip() {
    let factory = MockProviderFactory::working();
    let page = translator(&factory, &common::fast_config()).translate_text("None").await;

    assert_eq!(page.status, PageStatus::Skipped);
    assert_eq!(page.outcome.render(), "[Error: Invalid input]");
    assert_eq!(factory.counters().requests(), 0);
}

#[tokio::test]
async fn test_translate_text_withShortPage_shouldSkipAsTooShort() {
    let factory = MockProviderFactory::working();
    let page = translator(&factory, &common::fast_config()).translate_text("概述").await;

    assert_eq!(page.status, PageStatus::Skipped);
    assert_eq!(page.outcome.failure(), Some(&TranslationFailure::TooShort { text: "概述".to_string() }));
}

#[tokio::test]
async fn test_translate_text_withTocPage_shouldTranslateEntries() {
    let factory = MockProviderFactory::working();
    let page = translator(&factory, &common::fast_config()).translate_text(common::TOC_PAGE).await;

    assert_eq!(page.kind, ContentKind::Toc);
    assert_eq!(page.status, PageStatus::Success);
    assert_eq!(page.units, 4);
    let text = page.outcome.text().unwrap();
    assert!(text.starts_with("[EN] 目录\n1. [EN] 概述 "));
    assert!(text.ends_with(&format!("2.1. [EN] 总体设计 {} - 4 -", ".".repeat(20))));
    assert_eq!(factory.counters().received(), vec!["目录", "概述", "系统架构", "总体设计"]);
}

#[tokio::test]
async fn test_translate_text_withProseMentioningDirectory_shouldKeepEveryLine() {
    let factory = MockProviderFactory::working();
    let raw = "系统概述\n请将文件上传到共享目录中，然后通知管理员进行审核和归档处理。";

    let page = translator(&factory, &common::fast_config()).translate_text(raw).await;

    assert_eq!(page.kind, ContentKind::Toc);
    assert_eq!(page.status, PageStatus::Success);
    let text = page.outcome.text().unwrap();
    assert_eq!(text.lines().count(), raw.lines().count());
    for line in raw.lines() {
        assert!(text.contains(&format!("[EN] {}", line)), "missing line {:?} in {:?}", line, text);
    }
}

#[tokio::test]
async fn test_translate_text_withEllipsisLeaders_shouldKeepEveryEntry() {
    let factory = MockProviderFactory::working();
    let raw = "目录\n1 系统概述……1\n1.1 项目背景……2\n2 功能需求……5";

    let page = translator(&factory, &common::fast_config()).translate_text(raw).await;

    assert_eq!(page.status, PageStatus::Success);
    let text = page.outcome.text().unwrap();
    assert_eq!(text.lines().count(), 4);
    assert!(text.contains("1. [EN] 系统概述 "));
    assert!(text.contains("1.1. [EN] 项目背景 "));
    assert!(text.contains("2. [EN] 功能需求 "));
}

#[tokio::test]
async fn test_translate_text_withTocPageAndFailingProvider_shouldFailPage() {
    let factory = MockProviderFactory::failing();
    let page = translator(&factory, &single_attempt_config()).translate_text(common::TOC_PAGE).await;

    assert_eq!(page.status, PageStatus::Failed);
    assert_eq!(page.outcome.render(), "[Translation failed after 1 attempts]");
}

#[tokio::test]
async fn test_translate_text_withTocMarkerButNoEntries_shouldTranslateAsText() {
    let factory = MockProviderFactory::working();
    let page = translator(&factory, &common::fast_config()).translate_text("目录页暂时没有可用的条目").await;

    assert_eq!(page.kind, ContentKind::Toc);
    assert_eq!(page.status, PageStatus::Success);
    assert_eq!(page.outcome.text(), Some("[EN] 目录页暂时没有可用的条目"));
}

#[tokio::test]
async fn test_translate_text_withFormattingHeavyPage_shouldTranslatePayload() {
    let factory = MockProviderFactory::working();
    let raw = "审核人员签字确认栏目 __________ 批准人员签字确认栏目 __________";

    let page = translator(&factory, &common::fast_config()).translate_text(raw).await;

    assert_eq!(page.status, PageStatus::Success);
    assert_eq!(
        page.outcome.text(),
        Some(format!("{}[EN] 审核人员签字确认栏目 批准人员签字确认栏目", FORMATTING_PAYLOAD_PREFIX).as_str())
    );
}

#[tokio::test]
async fn test_translate_text_withFormattingOnlyPage_shouldSkip() {
    let factory = MockProviderFactory::working();
    let raw = format!("签字 {} 日期 {}", "_".repeat(20), "_".repeat(20));

    let page = translator(&factory, &common::fast_config()).translate_text(&raw).await;

    assert_eq!(page.status, PageStatus::Skipped);
    assert_eq!(page.outcome.render(), format!("[Skipped: Mostly formatting - {}...]", raw));
    assert_eq!(factory.counters().requests(), 0);
}

#[tokio::test]
async fn test_translate_text_withLongPage_shouldChunkAndMerge() {
    let factory = MockProviderFactory::working();
    let text = long_prose();

    let page = translator(&factory, &common::fast_config()).translate_text(&text).await;

    assert_eq!(page.status, PageStatus::Success);
    assert!(page.units > 1);
    assert_eq!(factory.counters().requests(), page.units);
    let merged = page.outcome.text().unwrap();
    assert_eq!(merged.matches("[EN] ").count(), page.units);
    assert!(merged.starts_with("[EN] 第0条"));
}

#[tokio::test]
async fn test_translate_text_withSomeChunksFailing_shouldBePartial() {
    let factory = MockProviderFactory::new(MockBehavior::Intermittent { fail_every: 2 });

    let page = translator(&factory, &single_attempt_config()).translate_text(&long_prose()).await;

    assert_eq!(page.status, PageStatus::Partial);
    let merged = page.outcome.text().unwrap();
    assert!(merged.contains("[Translation failed after 1 attempts]"));
    assert!(merged.contains("[EN] "));
}

#[tokio::test]
async fn test_translate_text_withAllChunksFailing_shouldFailPage() {
    let factory = MockProviderFactory::failing();

    let page = translator(&factory, &single_attempt_config()).translate_text(&long_prose()).await;

    assert_eq!(page.status, PageStatus::Failed);
    assert_eq!(page.outcome.failure(), Some(&TranslationFailure::RetriesExhausted { attempts: 1 }));
}

#[tokio::test]
async fn test_translate_text_withUnavailableProvider_shouldReportIt() {
    let factory = MockProviderFactory::unavailable("offline");

    let page = translator(&factory, &common::fast_config()).translate_text(common::PROSE_PAGE).await;

    assert_eq!(page.status, PageStatus::Failed);
    assert_eq!(page.outcome.render(), "[Error: Provider unavailable - offline]");
}

#[tokio::test]
async fn test_translate_page_shouldFillResult() {
    let factory = MockProviderFactory::working();
    let page = Page::new(12, common::PROSE_PAGE);

    let result = translator(&factory, &common::fast_config()).translate_page(&page).await;

    assert_eq!(result.page_number, 12);
    assert_eq!(result.original_text, common::PROSE_PAGE);
    assert_eq!(result.translated_char_count, result.translated_text.chars().count());
    assert!(result.failure.is_none());
}

#[tokio::test]
async fn test_translate_pages_withSampleDocument_shouldSummarizeRun() {
    let factory = MockProviderFactory::working();
    let config = common::fast_config();
    let pipeline = PagePipeline::new(configured_client_for(&factory, &config), &config);

    let progress: Arc<Mutex<Vec<PageProgress>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&progress);
    let run = pipeline
        .translate_pages(
            &common::sample_pages(),
            Some(Box::new(move |p: PageProgress| sink.lock().unwrap().push(p))),
        )
        .await;

    assert_eq!(run.summary.total_pages, 5);
    assert_eq!(run.summary.successful, 4);
    assert_eq!(run.summary.skipped, 1);
    assert_eq!(run.summary.failed, 0);
    assert_eq!(run.results[3].status, PageStatus::Skipped);
    assert_eq!(run.results[1].content_kind, ContentKind::Toc);

    let progress = progress.lock().unwrap();
    assert_eq!(progress.len(), 5);
    assert_eq!(progress[4].completed, 5);
    assert_eq!(progress[4].fraction(), 1.0);
}

#[tokio::test(start_paused = true)]
async fn test_translate_pages_withPageDelay_shouldPauseBetweenPages() {
    let factory = MockProviderFactory::working();
    let mut config = common::fast_config();
    config.pacing.page_delay_ms = 2000;
    let pipeline = PagePipeline::new(configured_client_for(&factory, &config), &config);
    let pages: Vec<Page> = (1..=3).map(|n| Page::new(n, common::PROSE_PAGE)).collect();

    let start = tokio::time::Instant::now();
    let run = pipeline.translate_pages(&pages, None).await;

    assert!(start.elapsed() >= Duration::from_secs(4));
    assert_eq!(run.summary.successful, 3);
    // Identical pages hit the cache after the first call
    assert_eq!(factory.counters().requests(), 1);
}

#[test]
fn test_run_summary_shouldReportSuccessRate() {
    let summary = pagewise::translation::RunSummary {
        total_pages: 4,
        successful: 3,
        partial: 0,
        failed: 1,
        skipped: 0,
        elapsed_seconds: 12.0,
    };

    assert_eq!(summary.success_rate(), 75.0);
    assert!(summary.summary().contains("Successful: 3 (75.0%)"));
}
