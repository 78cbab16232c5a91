use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;

use freq::{Config, CountMode, OutputFormat};

/// Count how many times each distinct Unicode code point appears in the input
/// and print one `hex glyph<TAB>count` line per code point, in ascending order.
#[derive(Parser)]
#[command(name = "freq", version)]
struct Args {
    /// Count bytes instead of code points
    #[arg(short = 'b', long = "bytes")]
    bytes: bool,
    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the report to a file instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Print unit totals to standard error after the report
    #[arg(long)]
    summary: bool,
    /// Log per-source progress to standard error
    #[arg(short, long)]
    verbose: bool,
    /// Input files; standard input is read when none are given
    files: Vec<PathBuf>,
}

/// Options that consume the following argument as their value.
const VALUE_FLAGS: &[&str] = &["-o", "--output", "--format"];

/// Parse a Go-style spelling of the bytes flag (`-bytes`, `-b=true`,
/// `--bytes=0`, ...) into its value. `None` if `arg` is some other flag or
/// carries a value that is not a boolean.
fn bytes_flag(arg: &str) -> Option<bool> {
    let name = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-'))?;
    let (name, value) = match name.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (name, None),
    };
    if name != "bytes" && name != "b" {
        return None;
    }
    match value {
        None | Some("1" | "t" | "T" | "true" | "TRUE" | "True") => Some(true),
        Some("0" | "f" | "F" | "false" | "FALSE" | "False") => Some(false),
        Some(_) => None,
    }
}

/// Rewrite the bytes flag into the single `--bytes` clap expects and end flag
/// parsing at the first file argument, so `freq a.txt -b` names two files.
fn normalize_args<I: IntoIterator<Item = OsString>>(args: I) -> Vec<OsString> {
    let mut args = args.into_iter();
    let mut out: Vec<OsString> = args.next().into_iter().collect();
    let mut bytes = false;
    let mut takes_value = false;
    let mut rest = Vec::new();
    for arg in args.by_ref() {
        if takes_value {
            takes_value = false;
            out.push(arg);
            continue;
        }
        let text = match arg.to_str() {
            Some("--") => break,
            Some(text) if text.len() > 1 && text.starts_with('-') => text,
            _ => {
                rest.push(arg);
                break;
            }
        };
        match bytes_flag(text) {
            Some(value) => bytes = value,
            None => {
                takes_value = VALUE_FLAGS.contains(&text);
                out.push(arg);
            }
        }
    }
    if bytes {
        out.push(OsString::from("--bytes"));
    }
    out.push(OsString::from("--"));
    out.extend(rest);
    out.extend(args);
    out
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse_from(normalize_args(std::env::args_os()));
    init_tracing(args.verbose);
    let to_stdout = args.output.is_none();
    match run(args) {
        Ok(()) => {}
        // The reader of a piped report went away; nothing is left to say.
        Err(e) if to_stdout && e.is_broken_pipe() => {}
        Err(e) => {
            eprintln!("freq: {e}");
            std::process::exit(1);
        }
    }
}

fn run(args: Args) -> freq::Result<()> {
    let mode = if args.bytes {
        CountMode::Bytes
    } else {
        CountMode::CodePoints
    };
    let mut config = Config::new(mode, args.files);
    config.format = args.format;
    config.output = args.output;

    let tally = freq::run(&config)?;

    if args.summary {
        eprintln!("#units: {}", tally.table().total());
        eprintln!("#distinct: {}", tally.table().distinct());
        eprintln!("#errors: {}", tally.errors());
    }
    Ok(())
}
