// lemmatize-uk: lemmatize whitespace-separated tokens from stdin.
//
// Every input token goes through a lemmatizer session exactly as a search
// daemon's tokenizer would drive it. Output is one token per line:
//
//   <position>\t<token>
//
// Extra lemmas of an ambiguous token repeat the position of the token they
// came from.
//
// Usage:
//   lemmatize-uk [-l LEXICON] [--stats] [-v]
//
// Options:
//   -l, --lexicon PATH   Lexicon file (form<TAB>lemma...)
//       --stats          Print session counters to stderr
//   -v, --verbose        Log diagnostics to stderr
//   -h, --help           Print help

use std::io::{self, BufRead, Write};

use lemmatize_uk::{Session, logging};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = lemmatize_cli::parse_args(&args).unwrap_or_else(|e| lemmatize_cli::fatal(&e));

    if options.help {
        println!("lemmatize-uk: Lemmatize whitespace-separated tokens from stdin.");
        println!();
        println!("Usage: lemmatize-uk [-l LEXICON] [--stats] [-v]");
        println!();
        println!("Prints one output token per line as <position>\\t<token>.");
        println!("Ambiguous tokens expand to several lines sharing a position;");
        println!("tokens the analyzer does not know are printed unchanged.");
        println!();
        println!("Options:");
        println!("  -l, --lexicon PATH   Lexicon file (form<TAB>lemma...)");
        println!("      --stats          Print session counters to stderr");
        println!("  -v, --verbose        Log diagnostics to stderr");
        println!("  -h, --help           Print this help");
        return;
    }

    if options.verbose {
        logging::set_sink(Some(Box::new(|msg: &str| eprintln!("{msg}"))));
        logging::set_level(log::LevelFilter::Debug);
    }

    let engine = lemmatize_cli::load_engine(options.lexicon.as_deref())
        .unwrap_or_else(|e| lemmatize_cli::fatal(&e));
    let mut session = Session::new(&engine);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut position: u64 = 0;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("error reading stdin: {e}");
                break;
            }
        };

        for raw in line.split_whitespace() {
            position += 1;
            let (token, extra) = session.push_token(raw);
            let _ = writeln!(out, "{position}\t{token}");
            for _ in 0..extra {
                match session.pull_extra_token() {
                    Some(token) => {
                        let _ = writeln!(out, "{position}\t{token}");
                    }
                    None => break,
                }
            }
        }
    }
    let _ = out.flush();

    if options.stats {
        let stats = session.stats();
        eprintln!(
            "tokens in: {}, tokens out: {}, passed through: {}",
            stats.tokens_in, stats.tokens_out, stats.passed_through
        );
    }

    drop(session);
    engine.shutdown();
}
