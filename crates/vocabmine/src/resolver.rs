//! Lemma resolution: lexicon lookup with stemmer fallback and a cache.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use dashmap::DashMap;
use lexicon_db::Lexicon;
use lexicon_morph::Morph;
use lexicon_types::Pos;
use rust_stemmers::{Algorithm, Stemmer};

/// Ordered candidate base forms for a lowercase surface word.
///
/// The first candidate is the database's best guess; an empty result means
/// the word is unknown and the caller falls back to stemming. Faults are
/// not part of the contract: a lookup that cannot answer returns empty.
pub trait LexicalLookup: Send + Sync {
    fn candidates(&self, word: &str) -> Vec<String>;
}

/// Lexicon-backed lookup combining the index files with morphology.
///
/// Candidates are gathered across every part of speech and ranked by the
/// corpus tagged-sense count (the database's own frequency signal), then
/// by POS order, then by generation order.
pub struct LexiconLookup {
    lexicon: Lexicon,
    morph: Morph,
}

impl LexiconLookup {
    pub fn new(lexicon: Lexicon, morph: Morph) -> Self {
        Self { lexicon, morph }
    }

    /// A lookup that knows no words; every resolution falls through to the
    /// stemmer.
    pub fn unavailable() -> Self {
        Self {
            lexicon: Lexicon::empty(),
            morph: Morph::empty(),
        }
    }
}

impl LexicalLookup for LexiconLookup {
    fn candidates(&self, word: &str) -> Vec<String> {
        let mut ranked: Vec<(u32, usize, usize, String)> = Vec::new();
        for pos in Pos::ALL {
            for cand in self
                .morph
                .lemmas_for(pos, word, |p, l| self.lexicon.contains(p, l))
            {
                let tagsense = self
                    .lexicon
                    .stats(pos, &cand.lemma)
                    .map(|s| s.tagsense_cnt)
                    .unwrap_or(0);
                let seq = ranked.len();
                ranked.push((tagsense, pos.index(), seq, cand.lemma));
            }
        }

        ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

        let mut seen: HashSet<&str> = HashSet::new();
        let mut out = Vec::with_capacity(ranked.len());
        for (_, _, _, lemma) in &ranked {
            if seen.insert(lemma.as_str()) {
                out.push(lemma.clone());
            }
        }
        out
    }
}

/// Resolves normalized words to canonical base forms.
///
/// Resolution order: cache, then lexicon lookup (first candidate wins),
/// then the English suffix-stripping stemmer. Results are cached before
/// returning regardless of which path produced them, so a word repeated
/// across a document costs one lookup. The cache is append-only for the
/// lifetime of the resolver and never evicted.
///
/// Concurrent first-resolutions of the same word may both reach the
/// lookup; they resolve to the same value and the duplicate insert is
/// harmless, so no per-key serialization is done.
pub struct LemmaResolver {
    lookup: Arc<dyn LexicalLookup>,
    stemmer: Stemmer,
    cache: DashMap<String, String>,
}

impl LemmaResolver {
    pub fn new(lookup: Arc<dyn LexicalLookup>) -> Self {
        Self {
            lookup,
            stemmer: Stemmer::create(Algorithm::English),
            cache: DashMap::new(),
        }
    }

    /// Resolve a normalized word to its base form. Total: always returns a
    /// non-empty string, the input itself in the worst case.
    pub fn resolve(&self, word: &str) -> String {
        if let Some(hit) = self.cache.get(word) {
            return hit.clone();
        }

        let lemma = self
            .lookup
            .candidates(word)
            .into_iter()
            .next()
            .unwrap_or_else(|| self.stemmer.stem(word).into_owned());
        let lemma = if lemma.is_empty() {
            word.to_string()
        } else {
            lemma
        };

        self.cache.insert(word.to_string(), lemma.clone());
        lemma
    }

    /// Cached lemma for a word, if it has been resolved before.
    pub fn cached(&self, word: &str) -> Option<String> {
        self.cache.get(word).map(|hit| hit.clone())
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Snapshot of the cache, for explicit copying between resolvers.
    pub fn export_cache(&self) -> HashMap<String, String> {
        self.cache
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Preload cache entries exported from another resolver.
    pub fn import_cache(&self, entries: HashMap<String, String>) {
        for (word, lemma) in entries {
            self.cache.insert(word, lemma);
        }
    }
}
