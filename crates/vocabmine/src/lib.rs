pub mod handlers;
pub mod known;
pub mod processor;
pub mod report;
pub mod resolver;
pub mod stopwords;
pub mod tokenize;

pub use handlers::{AppState, router};
pub use known::KnownWordStore;
pub use processor::{ProcessorConfig, RankedWord, WordProcessor};
pub use resolver::{LemmaResolver, LexicalLookup, LexiconLookup};
