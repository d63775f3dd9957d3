/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::fs;
use std::path::Path;

use pagewise::file_utils::{FileManager, InputFormat};

use crate::common;

/// Test file existence check
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file_path = common::create_test_file(temp_dir.path(), "pages.json", "[]")?;

    assert!(FileManager::file_exists(&file_path));
    assert!(!FileManager::file_exists(temp_dir.path()));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.json")));
    Ok(())
}

#[test]
fn test_dir_exists_withDirectory_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    assert!(FileManager::dir_exists(temp_dir.path()));
    assert!(!FileManager::dir_exists(temp_dir.path().join("nope")));
    Ok(())
}

#[test]
fn test_ensure_dir_withNestedPath_shouldCreateParents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b").join("c");

    FileManager::ensure_dir(&nested)?;
    FileManager::ensure_dir(&nested)?;

    assert!(nested.is_dir());
    Ok(())
}

#[test]
fn test_generate_output_path_shouldIncludeLanguageAndKind() {
    let input = Path::new("/data/规范书.json");
    let out = Path::new("/tmp/out");

    assert_eq!(
        FileManager::generate_output_path(input, out, "en", "", "csv"),
        out.join("规范书.en.csv")
    );
    assert_eq!(
        FileManager::generate_output_path(input, out, "en", "structure", "json"),
        out.join("规范书.en.structure.json")
    );
}

#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("reports").join("spec.en.csv");

    FileManager::write_to_file(&path, "Page\n")?;

    assert_eq!(FileManager::read_to_string(&path)?, "Page\n");
    Ok(())
}

#[test]
fn test_append_to_log_file_shouldAppendTimestampedLines() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let log_path = temp_dir.path().join("pagewise.log");

    FileManager::append_to_log_file(&log_path, "first run")?;
    FileManager::append_to_log_file(&log_path, "second run")?;

    let content = fs::read_to_string(&log_path)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('[') && lines[0].ends_with("] first run"));
    assert!(lines[1].ends_with("second run"));
    Ok(())
}

#[test]
fn test_detect_input_format_shouldUseExtensionThenContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let json = common::create_test_file(temp_dir.path(), "a.json", "[]")?;
    let text = common::create_test_file(temp_dir.path(), "a.txt", "[not json]")?;
    let sniffed_json = common::create_test_file(temp_dir.path(), "pages", "  [{\"page_number\": 1}]")?;
    let sniffed_text = common::create_test_file(temp_dir.path(), "pages.out", "第一页")?;

    assert_eq!(FileManager::detect_input_format(&json)?, InputFormat::PageJson);
    assert_eq!(FileManager::detect_input_format(&text)?, InputFormat::PlainText);
    assert_eq!(FileManager::detect_input_format(&sniffed_json)?, InputFormat::PageJson);
    assert_eq!(FileManager::detect_input_format(&sniffed_text)?, InputFormat::PlainText);
    Ok(())
}

#[test]
fn test_detect_input_format_withMissingFile_shouldFail() {
    assert!(FileManager::detect_input_format("/definitely/not/here.json").is_err());
}
