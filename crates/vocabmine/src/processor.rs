//! Word processing pipeline: normalize, resolve, aggregate, rank.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::resolver::{LemmaResolver, LexicalLookup};
use crate::stopwords::STOP_WORDS;
use crate::tokenize::tokenize;

/// Tokens resolved concurrently per batch. Caps the number of in-flight
/// lexicon lookups regardless of document length; batches run one after
/// another.
const BATCH_SIZE: usize = 300;

/// Processor options.
#[derive(Clone, Copy, Debug)]
pub struct ProcessorConfig {
    /// Drop words the user already knows, both by surface form and by
    /// resolved lemma.
    pub exclude_known_words: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            exclude_known_words: true,
        }
    }
}

/// A lemma and its occurrence count, as produced by ranked retrieval.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankedWord {
    pub word: String,
    pub count: u64,
}

/// Extracts normalized vocabulary and frequency statistics from text.
///
/// `process_text` may be called any number of times; counts and the lemma
/// cache accumulate across calls. `sorted_words` is a pure read over the
/// current state. Each processor owns its cache and frequency table; they
/// are never shared between instances except through the explicit cache
/// export/import methods.
pub struct WordProcessor {
    shared: Arc<Shared>,
}

struct Shared {
    resolver: LemmaResolver,
    frequency: DashMap<String, u64>,
    stop_words: HashSet<&'static str>,
    known_words: HashSet<String>,
    exclude_known: bool,
}

impl WordProcessor {
    /// Build a processor around an injected lexical lookup and the
    /// known-word set loaded by the caller. The known set is consulted
    /// only while `exclude_known_words` is on and is never refreshed
    /// mid-session.
    pub fn new(
        lookup: Arc<dyn LexicalLookup>,
        known_words: HashSet<String>,
        config: ProcessorConfig,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                resolver: LemmaResolver::new(lookup),
                frequency: DashMap::new(),
                stop_words: STOP_WORDS.iter().copied().collect(),
                known_words,
                exclude_known: config.exclude_known_words,
            }),
        }
    }

    /// Normalize a single token.
    ///
    /// Lowercases, strips every character that is neither alphanumeric nor
    /// whitespace, collapses whitespace runs and trims. Returns `None` for
    /// results that are empty, shorter than three characters, stop words,
    /// or (with exclusion on) already-known words. Idempotent on its own
    /// output.
    pub fn normalize(&self, token: &str) -> Option<String> {
        self.shared.normalize(token)
    }

    /// Resolve a normalized word to its lemma through the shared cache.
    pub fn resolve_lemma(&self, word: &str) -> String {
        self.shared.resolver.resolve(word)
    }

    /// Tokenize `text` and fold it into the frequency table.
    ///
    /// Tokens are processed in fixed-size batches: every token in a batch
    /// fans out into its own task, and the whole batch is awaited before
    /// the next one starts. That boundary is the backpressure control on
    /// the lexicon, not an optimization artifact. A failing token task is
    /// logged and skipped; it never takes the batch down with it.
    pub async fn process_text(&self, text: &str) {
        let tokens = tokenize(text);
        debug!(tokens = tokens.len(), "processing text");

        for batch in tokens.chunks(BATCH_SIZE) {
            let mut tasks = Vec::with_capacity(batch.len());
            for token in batch {
                let token = (*token).to_string();
                let shared = Arc::clone(&self.shared);
                tasks.push(tokio::spawn(async move { shared.process_token(&token) }));
            }
            for task in tasks {
                if let Err(err) = task.await {
                    warn!("token task failed: {err}");
                }
            }
        }
    }

    /// Frequency-ranked lemmas with at least `min_frequency` occurrences.
    ///
    /// Sorted by count descending; equal counts order lexicographically by
    /// lemma. Values of `min_frequency` below 1 admit everything, so they
    /// clamp to 1.
    pub fn sorted_words(&self, min_frequency: u64) -> Vec<RankedWord> {
        let min = min_frequency.max(1);
        let mut words: Vec<RankedWord> = self
            .shared
            .frequency
            .iter()
            .filter(|entry| *entry.value() >= min)
            .map(|entry| RankedWord {
                word: entry.key().clone(),
                count: *entry.value(),
            })
            .collect();
        words.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
        words
    }

    /// Number of distinct lemmas counted so far.
    pub fn unique_words(&self) -> usize {
        self.shared.frequency.len()
    }

    /// Cached lemma for a word, if resolution has happened.
    pub fn cached_lemma(&self, word: &str) -> Option<String> {
        self.shared.resolver.cached(word)
    }

    pub fn lemma_cache_len(&self) -> usize {
        self.shared.resolver.cache_len()
    }

    /// Snapshot of the lemma cache, for explicit copying into another
    /// processor.
    pub fn export_lemma_cache(&self) -> HashMap<String, String> {
        self.shared.resolver.export_cache()
    }

    /// Preload lemma cache entries exported from another processor.
    pub fn import_lemma_cache(&self, entries: HashMap<String, String>) {
        self.shared.resolver.import_cache(entries);
    }
}

impl Shared {
    fn normalize(&self, token: &str) -> Option<String> {
        let lowered = token.to_lowercase();
        let mut cleaned = String::with_capacity(lowered.len());
        for c in lowered.chars() {
            if c.is_alphanumeric() || c.is_whitespace() {
                cleaned.push(c);
            }
        }
        let normalized = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

        if normalized.chars().count() < 3 {
            return None;
        }
        if self.stop_words.contains(normalized.as_str()) {
            return None;
        }
        if self.exclude_known && self.known_words.contains(&normalized) {
            return None;
        }

        Some(normalized)
    }

    fn process_token(&self, token: &str) {
        let Some(normalized) = self.normalize(token) else {
            return;
        };
        let lemma = self.resolver.resolve(&normalized);

        // Lemmatization can land on a known word even when the surface form
        // did not match one; check again before counting.
        if self.exclude_known && self.known_words.contains(&lemma) {
            return;
        }

        *self.frequency.entry(lemma).or_insert(0) += 1;
    }
}
