//! csvcols - parse a CSV file against a column format and dump it

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use csvcols::config::{CoercionPolicy, OutputFormat, OutputOptions, ParseOptions};
use csvcols::output::render_to_stdout;
use csvcols::TableParser;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Json,
    Summary,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Summary => OutputFormat::Summary,
        }
    }
}

/// Parse delimiter-separated text into typed columns
#[derive(Parser, Debug)]
#[command(name = "csvcols")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file, or `-` for stdin
    file: PathBuf,

    /// Column types, one character per column:
    /// s=text f=f32 L=i32 d=i16 c=i8 x=hex i32 -=skip
    #[arg(short, long)]
    format: String,

    /// The first row is data, not labels
    #[arg(long)]
    no_header: bool,

    /// Field delimiter
    #[arg(short, long, default_value = ",")]
    delimiter: char,

    /// Quote character
    #[arg(short, long, default_value = "\"")]
    quote: char,

    /// Fail on numeric fields that are not clean numbers or do not fit
    #[arg(long)]
    strict: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    output: CliOutputFormat,

    /// Print at most this many rows in terminal output
    #[arg(long, value_name = "N")]
    max_rows: Option<usize>,

    /// Write JSON output on a single line
    #[arg(long)]
    compact: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("csvcols=debug"),
        _ => EnvFilter::new("csvcols=trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn ascii_byte(name: &str, c: char) -> Result<u8> {
    if !c.is_ascii() {
        bail!("{} must be an ASCII character, got '{}'", name, c);
    }
    Ok(c as u8)
}

fn run(cli: Cli) -> Result<()> {
    let options = ParseOptions::new()
        .with_header(!cli.no_header)
        .with_delimiter(ascii_byte("delimiter", cli.delimiter)?)
        .with_quote(ascii_byte("quote", cli.quote)?)
        .with_coercion(if cli.strict {
            CoercionPolicy::Strict
        } else {
            CoercionPolicy::Lenient
        });

    let parser = TableParser::new(&cli.format, options)?;
    debug!(file = %cli.file.display(), "parsing");

    let table = if cli.file.as_os_str() == "-" {
        parser.parse_reader(std::io::stdin().lock())?
    } else {
        parser.parse_path(&cli.file)?
    };

    let output_options = OutputOptions {
        max_rows: cli.max_rows,
        compact: cli.compact,
    };
    render_to_stdout(&table, cli.output.into(), &output_options)
}
