//! Load the `index.*` files of a WordNet-format lexicon directory.
//!
//! The full dictionary format carries synset data, glosses, pointers and
//! verb frames; none of that is needed to answer the two questions this
//! crate exists for: *does this lemma exist for a given part of speech*,
//! and *how often is it tagged in the reference corpus*. Only the four
//! index files are read, and only the lemma key plus its sense counts are
//! retained. Callers choose between memory-mapped files and owned buffers
//! at runtime via [`LoadMode`]; either way the parsed table is owned and
//! the backing buffers are dropped after parsing.
//!
//! # Example
//! ```no_run
//! use lexicon_db::{Lexicon, LoadMode};
//! use lexicon_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let lex = Lexicon::load_with_mode("/path/to/lexicon", LoadMode::Mmap)?;
//! if lex.contains(Pos::Verb, "run") {
//!     println!("tagged senses: {:?}", lex.stats(Pos::Verb, "run"));
//! }
//! # Ok(()) }
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lexicon_types::{LemmaStats, Pos};
use memmap2::Mmap;

/// Strategy for reading the index files.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map each file (fast, no copy before parsing).
    Mmap,
    /// Read each file into an owned buffer (portable fallback).
    Owned,
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

/// Lemma table parsed from the four `index.*` files.
#[derive(Debug)]
pub struct Lexicon {
    entries: HashMap<(Pos, String), LemmaStats>,
}

impl Lexicon {
    /// A lexicon that knows no words. Every lookup misses, which pushes
    /// callers onto their fallback path.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Load from a directory containing `index.noun|verb|adj|adv`.
    ///
    /// Defaults to memory-mapping. Use [`Lexicon::load_with_mode`] to force
    /// owned buffers instead.
    pub fn load(dict_dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_mode(dict_dir, LoadMode::Mmap)
    }

    /// Load choosing between mmap and owned buffers at runtime.
    pub fn load_with_mode(dict_dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let dir = dict_dir.as_ref();
        for pos in Pos::ALL {
            let path = index_path(dir, pos);
            if !path.exists() {
                anyhow::bail!("missing required lexicon file: {}", path.display());
            }
        }

        let mut entries = HashMap::new();
        for pos in Pos::ALL {
            let path = index_path(dir, pos);
            let buffer = load_file(&path, mode)?;
            parse_index(buffer.as_slice(), pos, &path, &mut entries)?;
        }

        Ok(Self { entries })
    }

    /// Check whether a lemma exists for the given part of speech.
    pub fn contains(&self, pos: Pos, lemma: &str) -> bool {
        self.entries.contains_key(&(pos, normalize_lemma(lemma)))
    }

    /// Sense statistics for a lemma, if present.
    pub fn stats(&self, pos: Pos, lemma: &str) -> Option<LemmaStats> {
        self.entries.get(&(pos, normalize_lemma(lemma))).copied()
    }

    /// Number of `(pos, lemma)` entries loaded.
    pub fn lemma_count(&self) -> usize {
        self.entries.len()
    }
}

fn index_path(dir: &Path, pos: Pos) -> PathBuf {
    dir.join(format!("index.{}", pos.file_stem()))
}

fn load_file(path: &Path, mode: LoadMode) -> Result<Buffer> {
    match mode {
        LoadMode::Mmap => {
            let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .with_context(|| format!("mmap {}", path.display()))
        }
        LoadMode::Owned => {
            let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Buffer::Owned(buf))
        }
    }
}

/// Index line layout:
/// `lemma pos synset_cnt p_cnt [ptr_symbol...] sense_cnt tagsense_cnt offset...`
/// License header lines start with whitespace and are skipped.
fn parse_index(
    bytes: &[u8],
    pos: Pos,
    path: &Path,
    entries: &mut HashMap<(Pos, String), LemmaStats>,
) -> Result<()> {
    for (lineno, raw_line) in bytes.split(|b| *b == b'\n').enumerate() {
        let line = strip_cr(raw_line);
        if line.is_empty() || matches!(line.first(), Some(b' ' | b'\t')) {
            continue;
        }
        let line_str = std::str::from_utf8(line)
            .with_context(|| format!("{}:{} invalid utf8", path.display(), lineno + 1))?;
        let tokens: Vec<&str> = line_str.split_ascii_whitespace().collect();
        if tokens.len() < 6 {
            anyhow::bail!(
                "{}:{} malformed index line (too few tokens)",
                path.display(),
                lineno + 1
            );
        }

        let lemma = normalize_lemma(tokens[0]);
        let synset_cnt: u32 = tokens[2]
            .parse()
            .with_context(|| format!("{}:{} synset_cnt", path.display(), lineno + 1))?;
        let p_cnt: usize = tokens[3]
            .parse()
            .with_context(|| format!("{}:{} p_cnt", path.display(), lineno + 1))?;

        // Pointer symbols are skipped; the counts follow them.
        let idx = 4 + p_cnt;
        if tokens.len() < idx + 2 {
            anyhow::bail!(
                "{}:{} pointer count mismatch",
                path.display(),
                lineno + 1
            );
        }
        let sense_cnt: u32 = tokens[idx]
            .parse()
            .with_context(|| format!("{}:{} sense_cnt", path.display(), lineno + 1))?;
        let tagsense_cnt: u32 = tokens[idx + 1]
            .parse()
            .with_context(|| format!("{}:{} tagsense_cnt", path.display(), lineno + 1))?;

        let offsets = tokens.len() - (idx + 2);
        if offsets != synset_cnt as usize {
            anyhow::bail!(
                "{}:{} synset_cnt mismatch (expected {}, got {})",
                path.display(),
                lineno + 1,
                synset_cnt,
                offsets
            );
        }

        entries.insert(
            (pos, lemma),
            LemmaStats {
                sense_cnt,
                tagsense_cnt,
            },
        );
    }

    Ok(())
}

fn strip_cr(line: &[u8]) -> &[u8] {
    if line.ends_with(b"\r") {
        &line[..line.len() - 1]
    } else {
        line
    }
}

fn normalize_lemma(text: &str) -> String {
    let mut s = text.trim().to_string();
    s.make_ascii_lowercase();
    s.replace(' ', "_")
}
