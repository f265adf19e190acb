//! Morphological candidate generation for WordNet-format lexicons.
//!
//! Inflected surface forms ("running", "children") rarely appear in the
//! index files directly; this crate turns a surface form into the base
//! forms that might. The procedure is the classic one: emit the surface
//! form itself if the lexicon knows it, consult the irregular-form
//! exception lists (`*.exc`), then try part-of-speech-specific suffix
//! substitutions. Every candidate is validated through a caller-supplied
//! existence predicate, so the crate stays ignorant of any concrete
//! database layout.
//!
//! # Example
//! ```no_run
//! use lexicon_db::Lexicon;
//! use lexicon_morph::Morph;
//! use lexicon_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dir = "/path/to/lexicon";
//! let lex = Lexicon::load(dir)?;
//! let morph = Morph::load(dir)?;
//! for cand in morph.lemmas_for(Pos::Verb, "running", |p, l| lex.contains(p, l)) {
//!     println!("{} ({:?})", cand.lemma, cand.derivation);
//! }
//! # Ok(()) }
//! ```

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use lexicon_types::Pos;

/// How a candidate base form was derived from the surface form.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Derivation {
    /// The surface form itself exists in the lexicon.
    Surface,
    /// Listed in an irregular-form exception file.
    Exception,
    /// Produced by a suffix substitution rule.
    Suffix,
}

/// A validated candidate base form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Candidate {
    pub lemma: String,
    pub derivation: Derivation,
}

/// Exception tables plus the fixed suffix rules, one set per POS.
pub struct Morph {
    exceptions: [HashMap<String, Vec<String>>; 4],
}

impl Morph {
    /// A morphology with no exception lists; suffix rules still apply.
    pub fn empty() -> Self {
        Self {
            exceptions: std::array::from_fn(|_| HashMap::new()),
        }
    }

    /// Load the `noun.exc|verb.exc|adj.exc|adv.exc` files from a lexicon
    /// directory. Missing files are treated as empty lists.
    pub fn load(dict_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dict_dir.as_ref();
        let mut exceptions = std::array::from_fn(|_| HashMap::new());
        for pos in Pos::ALL {
            let path = dir.join(format!("{}.exc", pos.file_stem()));
            if path.exists() {
                exceptions[pos.index()] = load_exc(&path)?;
            }
        }
        Ok(Self { exceptions })
    }

    /// Number of exception entries loaded across all parts of speech.
    pub fn exception_count(&self) -> usize {
        self.exceptions.iter().map(HashMap::len).sum()
    }

    /// Generate validated base-form candidates for a surface form.
    ///
    /// Order is significant: the surface form (if it exists) comes first,
    /// then exception entries, then suffix-rule guesses, deduplicated in
    /// that order. `exists` typically delegates to `Lexicon::contains`.
    pub fn lemmas_for<F>(&self, pos: Pos, surface: &str, exists: F) -> Vec<Candidate>
    where
        F: Fn(Pos, &str) -> bool,
    {
        let surface = normalize(surface);
        let mut seen: HashSet<String> = HashSet::new();
        let mut out: Vec<Candidate> = Vec::new();

        if exists(pos, &surface) {
            push_unique(&mut out, &mut seen, &surface, Derivation::Surface);
        }

        if let Some(entries) = self.exceptions[pos.index()].get(&surface) {
            for lemma in entries {
                if exists(pos, lemma) {
                    push_unique(&mut out, &mut seen, lemma, Derivation::Exception);
                }
            }
        }

        for (suffix, replacement) in suffix_rules(pos) {
            if let Some(candidate) = apply_rule(&surface, suffix, replacement)
                && exists(pos, &candidate)
            {
                push_unique(&mut out, &mut seen, &candidate, Derivation::Suffix);
            }
        }

        out
    }
}

fn push_unique(out: &mut Vec<Candidate>, seen: &mut HashSet<String>, lemma: &str, d: Derivation) {
    if seen.insert(lemma.to_string()) {
        out.push(Candidate {
            lemma: lemma.to_string(),
            derivation: d,
        });
    }
}

/// Exception file format: one surface form per line followed by its base
/// forms, whitespace separated.
fn load_exc(path: &Path) -> Result<HashMap<String, Vec<String>>> {
    let file = File::open(path).with_context(|| format!("open exception file {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut map = HashMap::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("read line {} in {}", lineno + 1, path.display()))?;
        let mut parts = line.split_whitespace();
        let Some(surface) = parts.next() else {
            continue;
        };
        let lemmas: Vec<String> = parts.map(normalize).collect();
        if !lemmas.is_empty() {
            map.insert(normalize(surface), lemmas);
        }
    }
    Ok(map)
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase().replace(' ', "_")
}

fn apply_rule(surface: &str, suffix: &str, replacement: &str) -> Option<String> {
    let stem = surface.strip_suffix(suffix)?;
    let mut candidate = format!("{stem}{replacement}");

    // Undo consonant doubling from inflection ("running" -> "runn" -> "run").
    if replacement.is_empty() {
        let mut chars = candidate.chars();
        let last = chars.next_back();
        let prev = chars.next_back();
        if let (Some(a), Some(b)) = (last, prev)
            && a == b
        {
            candidate.pop();
        }
    }

    Some(candidate)
}

fn suffix_rules(pos: Pos) -> &'static [(&'static str, &'static str)] {
    const NOUN: &[(&str, &str)] = &[
        ("s", ""),
        ("ses", "s"),
        ("xes", "x"),
        ("zes", "z"),
        ("ches", "ch"),
        ("shes", "sh"),
        ("men", "man"),
        ("ies", "y"),
    ];
    const VERB: &[(&str, &str)] = &[
        ("s", ""),
        ("ies", "y"),
        ("es", "e"),
        ("es", ""),
        ("ed", "e"),
        ("ed", ""),
        ("ing", "e"),
        ("ing", ""),
    ];
    const ADJ_ADV: &[(&str, &str)] = &[("er", ""), ("er", "e"), ("est", ""), ("est", "e")];

    match pos {
        Pos::Noun => NOUN,
        Pos::Verb => VERB,
        Pos::Adj | Pos::Adv => ADJ_ADV,
    }
}
