use std::env;
use std::path::PathBuf;

use lexicon_db::{Lexicon, LoadMode};
use lexicon_types::Pos;

fn dict_dir() -> Option<PathBuf> {
    env::var("LEXICON_DIR").ok().map(PathBuf::from)
}

#[test]
fn loads_real_lexicon_directory() {
    let Some(dir) = dict_dir() else {
        eprintln!("skipping: LEXICON_DIR not set");
        return;
    };
    let lex = Lexicon::load_with_mode(&dir, LoadMode::Mmap).expect("load lexicon");

    assert!(lex.lemma_count() > 10_000, "index too small");
    assert!(lex.contains(Pos::Noun, "dog"));
    assert!(lex.contains(Pos::Verb, "run"));
    assert!(lex.stats(Pos::Verb, "run").unwrap().sense_cnt > 0);
}
