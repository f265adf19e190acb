//! Ranked word list reports: JSON plus a numbered plain-text sibling.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::processor::RankedWord;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    total_unique_words: usize,
    total_word_count: u64,
    generated_at: String,
    words: &'a [RankedWord],
}

/// Write `words` to `path` as a JSON report, plus a `.txt` sibling for
/// quick reading. Returns the path of the text file.
pub fn write_report(path: &Path, words: &[RankedWord]) -> Result<PathBuf> {
    let report = Report {
        total_unique_words: words.len(),
        total_word_count: words.iter().map(|w| w.count).sum(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        words,
    };
    let json = serde_json::to_string_pretty(&report).context("serialize report")?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;

    let mut text = String::new();
    for (i, word) in words.iter().enumerate() {
        let _ = writeln!(text, "{}. {} - {}", i + 1, word.word, word.count);
    }
    let text_path = path.with_extension("txt");
    fs::write(&text_path, text).with_context(|| format!("write {}", text_path.display()))?;

    info!(
        "report written to {} and {}",
        path.display(),
        text_path.display()
    );
    Ok(text_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Vec<RankedWord> {
        vec![
            RankedWord { word: "bird".into(), count: 4 },
            RankedWord { word: "cat".into(), count: 3 },
        ]
    }

    #[test]
    fn writes_json_with_totals() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("book_words.json");
        write_report(&path, &sample()).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["totalUniqueWords"], 2);
        assert_eq!(value["totalWordCount"], 7);
        assert_eq!(value["words"][0]["word"], "bird");
        assert_eq!(value["words"][0]["count"], 4);
        assert!(value["generatedAt"].as_str().is_some());
    }

    #[test]
    fn writes_numbered_text_sibling() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("book_words.json");
        let text_path = write_report(&path, &sample()).unwrap();

        assert_eq!(text_path, dir.path().join("book_words.txt"));
        let text = fs::read_to_string(&text_path).unwrap();
        assert_eq!(text, "1. bird - 4\n2. cat - 3\n");
    }

    #[test]
    fn empty_report_is_valid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty_words.json");
        write_report(&path, &[]).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["totalUniqueWords"], 0);
        assert_eq!(value["words"].as_array().unwrap().len(), 0);
    }
}
