//! Dump the lexical tokens of a PDF or FDF file
//!
//! Prints one line per token, or a JSON array of token records.
//!
//! Usage:
//!   cargo run --bin pdf_tokens -- file.pdf
//!   cargo run --bin pdf_tokens -- file.pdf --start 1024 --end 2048
//!   cargo run --bin pdf_tokens -- file.pdf --xref --json
//!   RUST_LOG=trace cargo run --bin pdf_tokens -- file.pdf

use pdf_tokenizer::{CosDocument, LexerOptions, Token, TokenRecord};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

struct DumpConfig {
    path: PathBuf,
    start: Option<usize>,
    end: Option<usize>,
    xref_only: bool,
    json: bool,
    verbose: bool,
    max_tokens: usize,
}

impl DumpConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut path = None;
        let mut start = None;
        let mut end = None;
        let mut xref_only = false;
        let mut json = false;
        let mut verbose = false;
        let mut max_tokens = 0;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--start" => {
                    i += 1;
                    start = Some(parse_offset(args.get(i), "--start")?);
                },
                "--end" => {
                    i += 1;
                    end = Some(parse_offset(args.get(i), "--end")?);
                },
                "--max-tokens" => {
                    i += 1;
                    max_tokens = parse_offset(args.get(i), "--max-tokens")?;
                },
                "--xref" => {
                    xref_only = true;
                },
                "--json" => {
                    json = true;
                },
                "--verbose" | "-v" => {
                    verbose = true;
                },
                other if other.starts_with('-') => {
                    return Err(format!("Unknown option: {}", other));
                },
                other => {
                    if path.replace(PathBuf::from(other)).is_some() {
                        return Err("Only one input file may be given".to_string());
                    }
                },
            }
            i += 1;
        }

        let path = path.ok_or_else(|| "Missing input file".to_string())?;
        if xref_only && (start.is_some() || end.is_some()) {
            return Err("--xref cannot be combined with --start/--end".to_string());
        }

        Ok(Self {
            path,
            start,
            end,
            xref_only,
            json,
            verbose,
            max_tokens,
        })
    }
}

fn parse_offset(value: Option<&String>, flag: &str) -> Result<usize, String> {
    let value = value.ok_or_else(|| format!("{} needs a value", flag))?;
    value
        .parse()
        .map_err(|_| format!("{} expects a byte offset, got '{}'", flag, value))
}

fn print_usage() {
    eprintln!("Usage: pdf_tokens <file> [--start N] [--end N] [--xref] [--json] [--max-tokens N] [--verbose]");
}

fn write_tokens(out: &mut impl Write, tokens: &[Token<'_>], json: bool) -> io::Result<()> {
    if json {
        let records: Vec<TokenRecord> = tokens.iter().map(TokenRecord::from).collect();
        serde_json::to_writer_pretty(&mut *out, &records)?;
        writeln!(out)?;
    } else {
        for token in tokens {
            writeln!(out, "{:>10}  {:<12} {}", token.start, token.class(), token)?;
        }
    }
    out.flush()
}

fn main() -> ExitCode {
    let config = match DumpConfig::from_args() {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            print_usage();
            return ExitCode::from(2);
        },
    };

    let default_filter = if config.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let options = LexerOptions::default().with_max_tokens(config.max_tokens);
    let doc = match CosDocument::open_with_options(&config.path, options) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error: {}: {}", config.path.display(), e);
            return ExitCode::FAILURE;
        },
    };

    let range = if config.xref_only {
        match doc.xref_section() {
            Some(range) => range,
            None => {
                eprintln!("Error: {}: no cross-reference section found", config.path.display());
                return ExitCode::FAILURE;
            },
        }
    } else {
        config.start.unwrap_or(0)..config.end.unwrap_or(doc.len())
    };

    if config.verbose {
        eprintln!(
            "{}: {:?} {}.{}, {} bytes, scanning {}..{}",
            config.path.display(),
            doc.kind(),
            doc.version().0,
            doc.version().1,
            doc.len(),
            range.start,
            range.end
        );
    }

    let partial = doc.scan_partial(range.start, range.end);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if let Err(e) = write_tokens(&mut out, &partial.tokens, config.json) {
        eprintln!("Error writing output: {}", e);
        return ExitCode::FAILURE;
    }

    match partial.error {
        None => ExitCode::SUCCESS,
        Some(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}
