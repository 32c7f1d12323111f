//! MIB inspection tool.
//!
//! Usage:
//!   mibtool translate [-O FORMAT] [-B] [-d] <object>...
//!   mibtool tokenize <file>
//!   mibtool tree [root]
//!
//! The search path comes from `MIBDIRS`/`MIBS`, layered under `-M`/`-m`.
//! Logging goes to stderr and follows `RUST_LOG`.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mibtree_core::lexer::{Lexer, TokenKind};
use mibtree_core::{CommentMode, Mib, OidFormat, Settings};
use mibtree_std::{load_configured, load_file, open, SearchConfig, SearchPath};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mibtool")]
#[command(version)]
#[command(about = "Translate object identifiers and inspect MIB modules", long_about = None)]
struct Args {
    /// Directories to search, layered over MIBDIRS (`+dir` appends, `-dir` prepends)
    #[arg(short = 'M', long, global = true)]
    mibdirs: Option<String>,

    /// Modules to load, layered over MIBS (`ALL` loads every module found)
    #[arg(short = 'm', long, global = true)]
    mibs: Option<String>,

    /// Extra module files to load
    #[arg(short = 'f', long = "file", global = true)]
    files: Vec<PathBuf>,

    /// Directory for cached module indexes
    #[arg(long, global = true)]
    persistent_dir: Option<PathBuf>,

    /// Setting as `key=value`, e.g. `quickPrinting=yes`
    #[arg(short = 'S', long = "set", global = true, value_parser = parse_key_value)]
    settings: Vec<(String, String)>,

    /// Enable debug logging when RUST_LOG is unset
    #[arg(short, long, global = true, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate names to OIDs and OIDs to names
    Translate {
        objects: Vec<String>,

        /// Output format: module, suffix, full, numeric, ucd
        #[arg(short = 'O', long, default_value = "module")]
        format: String,

        /// Treat each object as a regular expression and use the best match
        #[arg(short = 'B', long)]
        best_match: bool,

        /// Print the definition of each object
        #[arg(short = 'd', long)]
        describe: bool,
    },
    /// Dump the lexer tokens of a file
    Tokenize {
        file: PathBuf,

        /// End comments at a second `--` on the same line
        #[arg(long)]
        strict_comments: bool,
    },
    /// Print the tree below an object
    Tree { root: Option<String> },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| format!("expected key=value, got {s:?}"))
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("mibtool: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    if let Command::Tokenize {
        file,
        strict_comments,
    } = &args.command
    {
        return tokenize(file, *strict_comments);
    }

    let mut mib = load(&args)?;
    match args.command {
        Command::Translate {
            objects,
            format,
            best_match,
            describe,
        } => {
            let format = OidFormat::from_name(&format)
                .ok_or_else(|| format!("unknown output format {format:?}"))?;
            for object in &objects {
                let oid = if best_match {
                    mib.best_match(object)
                } else {
                    mib.resolve_input(object)
                }
                .map_err(|err| format!("{object}: {err}"))?;

                if describe {
                    let text = mib
                        .tree()
                        .longest_match(&oid)
                        .and_then(|(id, _)| mib.describe(id))
                        .unwrap_or_default();
                    println!("{}", mib.render_oid_as(&oid, format));
                    println!("{text}");
                } else {
                    println!("{}", mib.render_oid_as(&oid, format));
                }
            }
        }
        Command::Tree { root } => {
            let root = match root {
                Some(name) => {
                    let oid = mib.resolve_name(&name).map_err(|err| format!("{name}: {err}"))?;
                    Some(
                        mib.tree()
                            .node_at(&oid)
                            .ok_or_else(|| format!("{name}: not a tree node"))?,
                    )
                }
                None => None,
            };
            print!("{}", mib.dump_tree(root));
        }
        Command::Tokenize { .. } => {}
    }
    Ok(())
}

/// Registry with the configured modules and `--file`s loaded. Module
/// failures are logged; the tool carries on with what did load.
fn load(args: &Args) -> Result<Mib, String> {
    let mut settings = Settings::default();
    for (key, value) in &args.settings {
        settings.apply(key, value).map_err(|err| err.to_string())?;
    }

    let home = std::env::var("HOME").ok();
    let mut path = SearchPath::from_env(&SearchConfig::default());
    if let Some(dirs) = &args.mibdirs {
        path.apply_dirs(dirs, home.as_deref());
    }
    if let Some(mibs) = &args.mibs {
        path.apply_modules(mibs);
    }
    debug!(dirs = ?path.dirs(), modules = ?path.modules(), "search path");

    let mut mib = open(&path, args.persistent_dir.as_deref(), settings);
    if let Err(err) = load_configured(&mut mib, &path) {
        warn!("{err}");
    }
    for file in &args.files {
        load_file(&mut mib, file).map_err(|err| err.to_string())?;
    }
    Ok(mib)
}

fn tokenize(path: &PathBuf, strict_comments: bool) -> Result<(), String> {
    let source = fs::read(path).map_err(|err| format!("{}: {err}", path.display()))?;
    let mode = if strict_comments {
        CommentMode::Strict
    } else {
        CommentMode::EndOfLine
    };
    let (tokens, diagnostics) = Lexer::new(&source).with_comment_mode(mode).tokenize();

    for token in &tokens {
        let start = token.span.start as usize;
        let end = token.span.end as usize;
        let text = source.get(start..end).unwrap_or_default();
        println!("{}\t{:?}\t{}", token.line, token.kind, escape_text(text));
        if token.kind == TokenKind::Eof {
            break;
        }
    }
    for diag in &diagnostics {
        eprintln!(
            "{}:{}: {}: {}",
            path.display(),
            diag.line,
            diag.severity.as_str(),
            diag.message
        );
    }
    Ok(())
}

/// Escape line breaks and tabs for one-line output.
fn escape_text(text: &[u8]) -> String {
    let text = String::from_utf8_lossy(text);
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            _ => result.push(c),
        }
    }
    result
}
