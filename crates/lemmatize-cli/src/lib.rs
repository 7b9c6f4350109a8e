// lemmatize-cli: shared utilities for the command-line front end.

use std::path::PathBuf;
use std::process;

use lemmatize_core::InitError;
use lemmatize_uk::config::ENV_LEXICON;
use lemmatize_uk::engine::{self, MorphEngine};
use lemmatize_uk::{BackendKind, Config};

/// Lexicon file name looked for in each search directory.
const LEXICON_FILE: &str = "lexicon.tsv";

/// Command-line options understood by every tool.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Options {
    pub lexicon: Option<String>,
    pub stats: bool,
    pub verbose: bool,
    pub help: bool,
}

/// Parse `-l PATH`/`--lexicon PATH`/`--lexicon=PATH`, `--stats`,
/// `-v`/`--verbose` and `-h`/`--help`.
pub fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if let Some(val) = arg.strip_prefix("--lexicon=") {
            options.lexicon = Some(val.to_string());
            continue;
        }
        match arg.as_str() {
            "-l" | "--lexicon" => match iter.next() {
                Some(val) => options.lexicon = Some(val.clone()),
                None => return Err(format!("{arg} requires a value")),
            },
            "--stats" => options.stats = true,
            "-v" | "--verbose" => options.verbose = true,
            "-h" | "--help" => options.help = true,
            other => return Err(format!("unknown argument '{other}'")),
        }
    }

    Ok(options)
}

/// Resolve the configuration and bring up an engine.
///
/// An explicit lexicon path selects the lexicon backend. Otherwise the
/// environment decides; for the lexicon backend without a configured path
/// the standard locations are searched.
pub fn load_engine(lexicon: Option<&str>) -> Result<Box<dyn MorphEngine>, String> {
    let mut config = Config::from_env().map_err(|e| e.to_string())?;

    if let Some(path) = lexicon {
        config.backend = BackendKind::Lexicon;
        config.lexicon_path = Some(PathBuf::from(path));
    } else if config.backend == BackendKind::Lexicon && config.lexicon_path.is_none() {
        config.lexicon_path = Some(find_lexicon()?);
    }

    engine::start(&config).map_err(|e: InitError| format!("failed to start engine: {e}"))
}

/// Find a lexicon file in the standard locations.
fn find_lexicon() -> Result<PathBuf, String> {
    let search_paths = build_search_paths();
    for dir in &search_paths {
        let path = dir.join(LEXICON_FILE);
        if path.is_file() {
            return Ok(path);
        }
    }

    Err(format!(
        "could not find {} in any of the search paths (or set {}):\n{}",
        LEXICON_FILE,
        ENV_LEXICON,
        search_paths
            .iter()
            .map(|p| format!("  - {}", p.display()))
            .collect::<Vec<_>>()
            .join("\n")
    ))
}

/// Build the list of directories to search for a lexicon.
fn build_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(home) = std::env::var("HOME").ok().map(PathBuf::from) {
        paths.push(home.join(".local").join("share").join("lemmatize-uk"));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd);
    }

    paths
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}
