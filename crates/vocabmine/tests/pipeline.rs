//! End-to-end pipeline tests against a small on-disk lexicon.

use std::fs;
use std::sync::Arc;

use lexicon_db::Lexicon;
use lexicon_morph::Morph;
use tempfile::TempDir;

use vocabmine::processor::{ProcessorConfig, RankedWord, WordProcessor};
use vocabmine::resolver::LexiconLookup;

fn fixture_lexicon_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("index.noun"),
        "cat n 1 1 @ 1 5 00001000\n\
         bird n 1 1 @ 1 4 00001100\n\
         child n 1 1 @ 1 6 00001200\n\
         dog n 1 1 @ 1 5 00001300\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("index.verb"),
        "run v 1 1 @ 1 8 00002000\nfly v 1 1 @ 1 2 00002100\n",
    )
    .unwrap();
    fs::write(dir.path().join("index.adj"), "happy a 1 0 1 0 00003000\n").unwrap();
    fs::write(dir.path().join("index.adv"), "fast r 1 0 1 0 00004000\n").unwrap();
    fs::write(dir.path().join("noun.exc"), "children child\n").unwrap();
    fs::write(dir.path().join("verb.exc"), "ran run\nflew fly\n").unwrap();
    dir
}

fn processor(dir: &TempDir, known: &[&str], exclude_known_words: bool) -> WordProcessor {
    let lexicon = Lexicon::load(dir.path()).expect("load lexicon");
    let morph = Morph::load(dir.path()).expect("load morph");
    WordProcessor::new(
        Arc::new(LexiconLookup::new(lexicon, morph)),
        known.iter().map(|w| w.to_string()).collect(),
        ProcessorConfig {
            exclude_known_words,
        },
    )
}

#[tokio::test]
async fn lexicon_merges_irregular_and_inflected_forms() {
    let dir = fixture_lexicon_dir();
    let p = processor(&dir, &[], true);
    p.process_text("The cat ran. The children ran to the birds.")
        .await;

    let words = p.sorted_words(1);
    assert_eq!(
        words,
        vec![
            RankedWord { word: "run".into(), count: 2 },
            RankedWord { word: "bird".into(), count: 1 },
            RankedWord { word: "cat".into(), count: 1 },
            RankedWord { word: "child".into(), count: 1 },
        ]
    );
}

#[tokio::test]
async fn known_lemmas_are_excluded_even_for_unknown_surface_forms() {
    let dir = fixture_lexicon_dir();
    let p = processor(&dir, &["run"], true);
    p.process_text("ran ran running").await;

    assert!(p.sorted_words(1).is_empty());
}

#[tokio::test]
async fn known_surface_forms_are_excluded_but_the_rest_counted() {
    let dir = fixture_lexicon_dir();
    let p = processor(&dir, &["cat", "dog"], true);
    p.process_text("The cat and the dog are running. The bird is flying.")
        .await;

    let words = p.sorted_words(1);
    assert!(words.iter().any(|w| w.word == "run"));
    assert!(words.iter().any(|w| w.word == "fly"));
    assert!(words.iter().any(|w| w.word == "bird"));
    assert!(!words.iter().any(|w| w.word == "cat"));
    assert!(!words.iter().any(|w| w.word == "dog"));
}

#[tokio::test]
async fn repeated_words_populate_the_cache() {
    let dir = fixture_lexicon_dir();
    let p = processor(&dir, &[], true);
    p.process_text("ran ran ran").await;

    assert_eq!(p.cached_lemma("ran").as_deref(), Some("run"));
    assert!(p.lemma_cache_len() >= 1);
}

#[tokio::test]
async fn processing_is_cumulative_across_calls() {
    let dir = fixture_lexicon_dir();
    let p = processor(&dir, &[], true);
    p.process_text("birds birds").await;
    p.process_text("birds").await;

    assert_eq!(
        p.sorted_words(1),
        vec![RankedWord { word: "bird".into(), count: 3 }]
    );
}
