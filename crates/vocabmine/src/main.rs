use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use lexicon_db::{Lexicon, LoadMode};
use lexicon_morph::Morph;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

use vocabmine::handlers::{AppState, router};
use vocabmine::known::KnownWordStore;
use vocabmine::processor::{ProcessorConfig, WordProcessor};
use vocabmine::report::write_report;
use vocabmine::resolver::LexiconLookup;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LEXICON_DIR: &str = "lexicon";
const DEFAULT_KNOWN_WORDS: &str = "known-words.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let Some(command) = parse_command()? else {
        usage();
        std::process::exit(2);
    };

    match command {
        Command::Process(args) => run_process(args).await,
        Command::Serve(args) => run_serve(args).await,
    }
}

async fn run_process(args: ProcessArgs) -> anyhow::Result<()> {
    let store = KnownWordStore::new(&args.known_file);
    let known = store.load();
    if !known.is_empty() && !args.include_known {
        info!(
            "excluding {} known words from {}",
            known.len(),
            args.known_file.display()
        );
    }

    let lookup = load_lookup(&args.lexicon_dir, args.lexicon_mode);
    let processor = WordProcessor::new(
        Arc::new(lookup),
        known,
        ProcessorConfig {
            exclude_known_words: !args.include_known,
        },
    );

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;

    let start = Instant::now();
    processor.process_text(&text).await;
    info!(
        "processed {} in {} ms",
        args.input.display(),
        start.elapsed().as_millis()
    );

    let all = processor.sorted_words(1);
    let filtered = processor.sorted_words(args.min_frequency);

    info!("unique lemmas: {}", all.len());
    if args.min_frequency > 1 {
        info!(
            "lemmas with frequency >= {}: {} ({} rare ones dropped)",
            args.min_frequency,
            filtered.len(),
            all.len() - filtered.len()
        );
    }
    info!(
        "total counted words: {}",
        all.iter().map(|w| w.count).sum::<u64>()
    );
    for (i, word) in filtered.iter().take(10).enumerate() {
        info!("  {}. {} - {}", i + 1, word.word, word.count);
    }

    let out = args
        .out
        .unwrap_or_else(|| default_report_path(&args.input));
    write_report(&out, &filtered)?;
    Ok(())
}

async fn run_serve(args: ServeArgs) -> anyhow::Result<()> {
    info!("binding to {}:{}", args.host, args.port);
    info!("serving reports from {}", args.reports_dir.display());
    info!("known words file: {}", args.known_file.display());

    let state = AppState {
        reports_dir: args.reports_dir,
        store: Arc::new(KnownWordStore::new(args.known_file)),
    };
    let app = router(state).layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .expect("invalid listen address");
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}

fn load_lookup(dir: &Path, mode: LoadMode) -> LexiconLookup {
    if !dir.is_dir() {
        warn!(
            "lexicon directory {} not found; resolving with the stemmer only",
            dir.display()
        );
        return LexiconLookup::unavailable();
    }
    let start = Instant::now();
    match (Lexicon::load_with_mode(dir, mode), Morph::load(dir)) {
        (Ok(lexicon), Ok(morph)) => {
            info!(
                "lexicon loaded in {} ms ({} lemmas, {} exceptions)",
                start.elapsed().as_millis(),
                lexicon.lemma_count(),
                morph.exception_count()
            );
            LexiconLookup::new(lexicon, morph)
        }
        (Err(err), _) | (_, Err(err)) => {
            warn!(
                "could not load lexicon from {}: {err:#}; resolving with the stemmer only",
                dir.display()
            );
            LexiconLookup::unavailable()
        }
    }
}

fn default_report_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "book".to_string());
    input.with_file_name(format!("{stem}_words.json"))
}

enum Command {
    Process(ProcessArgs),
    Serve(ServeArgs),
}

struct ProcessArgs {
    input: PathBuf,
    min_frequency: u64,
    include_known: bool,
    lexicon_dir: PathBuf,
    lexicon_mode: LoadMode,
    known_file: PathBuf,
    out: Option<PathBuf>,
}

struct ServeArgs {
    host: String,
    port: u16,
    reports_dir: PathBuf,
    known_file: PathBuf,
}

fn parse_command() -> anyhow::Result<Option<Command>> {
    let mut args = env::args().skip(1);
    let Some(first) = args.next() else {
        return Ok(None);
    };
    if first == "serve" {
        return parse_serve(args).map(|a| Some(Command::Serve(a)));
    }
    if first.starts_with('-') {
        return Ok(None);
    }
    parse_process(PathBuf::from(first), args).map(|a| Some(Command::Process(a)))
}

fn parse_process(
    input: PathBuf,
    mut args: impl Iterator<Item = String>,
) -> anyhow::Result<ProcessArgs> {
    let mut min_frequency = 1u64;
    let mut include_known = false;
    let mut lexicon_dir: Option<PathBuf> = None;
    let mut lexicon_mode: Option<LoadMode> = None;
    let mut known_file: Option<PathBuf> = None;
    let mut out: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--min-freq" => {
                let value = args.next().context("--min-freq needs a value")?;
                min_frequency = value
                    .parse()
                    .with_context(|| format!("invalid --min-freq: {value}"))?;
                if min_frequency < 1 {
                    anyhow::bail!("--min-freq must be >= 1");
                }
            }
            "--include-known" => include_known = true,
            "--lexicon-dir" => {
                let value = args.next().context("--lexicon-dir needs a value")?;
                lexicon_dir = Some(PathBuf::from(value));
            }
            "--lexicon-mode" => {
                let value = args.next().context("--lexicon-mode needs a value")?;
                lexicon_mode = Some(
                    parse_load_mode(&value)
                        .with_context(|| format!("invalid --lexicon-mode: {value}"))?,
                );
            }
            "--known-file" => {
                let value = args.next().context("--known-file needs a value")?;
                known_file = Some(PathBuf::from(value));
            }
            "--out" => {
                let value = args.next().context("--out needs a value")?;
                out = Some(PathBuf::from(value));
            }
            other => anyhow::bail!("unknown option: {other}"),
        }
    }

    Ok(ProcessArgs {
        input,
        min_frequency,
        include_known,
        lexicon_dir: lexicon_dir
            .or_else(|| env::var("LEXICON_DIR").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LEXICON_DIR)),
        lexicon_mode: lexicon_mode
            .or_else(|| {
                env::var("LEXICON_LOAD_MODE")
                    .ok()
                    .as_deref()
                    .and_then(parse_load_mode)
            })
            .unwrap_or(LoadMode::Mmap),
        known_file: known_file
            .or_else(|| env::var("KNOWN_WORDS_PATH").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_KNOWN_WORDS)),
        out,
    })
}

fn parse_serve(mut args: impl Iterator<Item = String>) -> anyhow::Result<ServeArgs> {
    let mut port: Option<u16> = None;
    let mut reports_dir: Option<PathBuf> = None;
    let mut known_file: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--port" => {
                let value = args.next().context("--port needs a value")?;
                port = Some(
                    value
                        .parse()
                        .with_context(|| format!("invalid --port: {value}"))?,
                );
            }
            "--reports-dir" => {
                let value = args.next().context("--reports-dir needs a value")?;
                reports_dir = Some(PathBuf::from(value));
            }
            "--known-file" => {
                let value = args.next().context("--known-file needs a value")?;
                known_file = Some(PathBuf::from(value));
            }
            other => anyhow::bail!("unknown option: {other}"),
        }
    }

    Ok(ServeArgs {
        host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
        port: port
            .or_else(|| env::var("PORT").ok().and_then(|p| p.parse().ok()))
            .unwrap_or(DEFAULT_PORT),
        reports_dir: reports_dir
            .or_else(|| env::var("REPORTS_DIR").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(".")),
        known_file: known_file
            .or_else(|| env::var("KNOWN_WORDS_PATH").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_KNOWN_WORDS)),
    })
}

fn parse_load_mode(raw: &str) -> Option<LoadMode> {
    match raw.to_ascii_lowercase().as_str() {
        "mmap" => Some(LoadMode::Mmap),
        "owned" => Some(LoadMode::Owned),
        _ => None,
    }
}

fn usage() {
    eprintln!(
        "vocabmine - vocabulary and frequency extraction from text

USAGE:
    vocabmine <text-file> [--min-freq N] [--include-known]
              [--lexicon-dir DIR] [--lexicon-mode mmap|owned]
              [--known-file PATH] [--out PATH]
    vocabmine serve [--port N] [--reports-dir DIR] [--known-file PATH]

Environment fallbacks: HOST, PORT, LEXICON_DIR, LEXICON_LOAD_MODE,
KNOWN_WORDS_PATH, REPORTS_DIR"
    );
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
