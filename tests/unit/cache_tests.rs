/*!
 * Tests for translation cache functionality
 */

use pagewise::translation::cache::TranslationCache;

#[test]
fn test_cache_store_shouldReturnStoredTranslation() {
    let cache = TranslationCache::new();
    cache.store("系统概述", "zh", "en", "System overview");

    assert_eq!(cache.get("系统概述", "zh", "en"), Some("System overview".to_string()));
}

#[test]
fn test_cache_get_withMissingKey_shouldReturnNone() {
    let cache = TranslationCache::new();
    assert!(cache.get("不存在", "zh", "en").is_none());
}

#[test]
fn test_cache_get_withDifferentLanguagePair_shouldMiss() {
    let cache = TranslationCache::new();
    cache.store("系统概述", "zh", "en", "System overview");

    assert!(cache.get("系统概述", "zh", "fr").is_none());
    assert!(cache.get("系统概述", "auto", "en").is_none());
}

#[test]
fn test_cache_stats_shouldCountHitsAndMisses() {
    let cache = TranslationCache::new();
    cache.store("页眉", "zh", "en", "Header");

    cache.get("页眉", "zh", "en");
    cache.get("页眉", "zh", "en");
    cache.get("页脚", "zh", "en");

    let stats = cache.stats();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.entries, 1);
    assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_cache_hit_rate_withNoLookups_shouldBeZero() {
    assert_eq!(TranslationCache::new().stats().hit_rate(), 0.0);
}

#[test]
fn test_cache_clone_shouldShareStorage() {
    let cache = TranslationCache::new();
    let clone = cache.clone();
    clone.store("页眉", "zh", "en", "Header");

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("页眉", "zh", "en"), Some("Header".to_string()));
}

#[test]
fn test_cache_clear_shouldResetEntriesAndCounters() {
    let cache = TranslationCache::default();
    cache.store("页眉", "zh", "en", "Header");
    cache.get("页眉", "zh", "en");

    cache.clear();

    assert!(cache.is_empty());
    assert_eq!(cache.stats().hits, 0);
}
