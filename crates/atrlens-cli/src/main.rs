use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use atrlens_core::{AtrRecord, CardList, decode_atr};
use clap::{Parser, Subcommand, ValueEnum};
use glob::glob;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod render;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("ATRLENS_BUILD_COMMIT"),
    ", ",
    env!("ATRLENS_BUILD_DATE"),
    ")"
);

const DEFAULT_CARD_LISTS: [&str; 2] = [
    "/usr/share/pcsc/smartcard_list.txt",
    "/usr/local/share/pcsc/smartcard_list.txt",
];

#[derive(Parser, Debug)]
#[command(name = "atrlens")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decode smart card Answer-To-Reset (ISO/IEC 7816-3) byte sequences.",
    long_about = None,
    after_help = "Examples:\n  atrlens decode 3B A7 00 40 18 80 65 A2 08 01 01 52\n  atrlens decode 3B:8E:80:01:80:31:80:66:B1:84:0C:01:6E:01:83:00:90:00:1C --format json --pretty\n  atrlens batch smartcard_list.txt"
)]
struct Cli {
    /// Log decoder details to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode one ATR and describe every field.
    #[command(alias = "parse")]
    Decode {
        /// ATR hex bytes, space- or colon-separated (several arguments are joined)
        #[arg(required = true, num_args = 1..)]
        atr: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = FormatMode::Text)]
        format: FormatMode,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Write output to a file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// smartcard_list.txt used to identify the card
        #[arg(long, env = "ATRLENS_CARD_LIST")]
        card_list: Option<PathBuf>,

        /// Skip card identification
        #[arg(long)]
        no_card_list: bool,

        /// Exit with a non-zero code if the ATR carries warnings or a bad checksum
        #[arg(long)]
        strict: bool,

        /// Suppress non-error output on stderr
        #[arg(long)]
        quiet: bool,
    },
    /// Decode every literal ATR of a card list and summarize anomalies.
    Batch {
        /// Path (or glob matching one file) to a smartcard_list.txt
        list: PathBuf,

        /// Exit with a non-zero code if any ATR fails or carries anomalies
        #[arg(long)]
        strict: bool,

        /// Only print the summary line
        #[arg(long)]
        quiet: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatMode {
    /// Human-readable report
    Text,
    /// Standalone HTML table
    Html,
    /// Structured record (templates and arguments)
    Json,
    /// Flat record with rendered descriptions
    SimpleJson,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Decode {
            atr,
            format,
            pretty,
            output,
            card_list,
            no_card_list,
            strict,
            quiet,
        } => cmd_decode(DecodeArgs {
            atr: atr.join(" "),
            format,
            pretty,
            output,
            card_list,
            no_card_list,
            strict,
            quiet,
        }),
        Commands::Batch {
            list,
            strict,
            quiet,
        } => cmd_batch(&list, strict, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

#[derive(Debug)]
struct DecodeArgs {
    atr: String,
    format: FormatMode,
    pretty: bool,
    output: Option<PathBuf>,
    card_list: Option<PathBuf>,
    no_card_list: bool,
    strict: bool,
    quiet: bool,
}

fn cmd_decode(args: DecodeArgs) -> Result<(), CliError> {
    let record = decode_atr(&args.atr).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some("expected hex byte pairs, e.g. \"3B A7 00 40\" or \"3B:A7:00:40\"".to_string()),
        )
    })?;

    let cards = if args.no_card_list {
        None
    } else {
        load_card_list(args.card_list.as_deref())?
    };
    let hex = record.to_hex_string();
    let hits = cards
        .as_ref()
        .map(|list| list.lookup(&hex))
        .unwrap_or_default();
    debug!(matches = hits.len(), "card identification");

    let body = match args.format {
        FormatMode::Text => render::render_text(&record, &hits),
        FormatMode::Html => render::render_html(&record, &hits),
        FormatMode::Json => serialize_json(&record, args.pretty)?,
        FormatMode::SimpleJson => serialize_json(&record.simplified(), args.pretty)?,
    };

    match args.output.as_ref() {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(path, &body)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            if !args.quiet {
                eprintln!("OK: output written -> {}", path.display());
            }
        }
        None => print!("{}", body),
    }

    check_strict(&record, args.strict)
}

fn check_strict(record: &AtrRecord, strict: bool) -> Result<(), CliError> {
    if strict && record.has_anomalies() {
        return Err(CliError::new(
            "ATR anomalies detected",
            Some("run without --strict to inspect the warnings".to_string()),
        ));
    }
    Ok(())
}

fn serialize_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.map(|mut text| {
        text.push('\n');
        text
    })
    .context("JSON serialization failed")
    .map_err(Into::into)
}

fn load_card_list(explicit: Option<&Path>) -> Result<Option<CardList>, CliError> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(CliError::new(
                format!("card list not found: {}", path.display()),
                Some("pass --card-list, set ATRLENS_CARD_LIST, or use --no-card-list".to_string()),
            ));
        }
        return read_card_list(path).map(Some);
    }

    let home_cache = std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".cache").join("smartcard_list.txt"));
    let candidates = home_cache
        .into_iter()
        .chain(DEFAULT_CARD_LISTS.iter().map(PathBuf::from));
    for path in candidates {
        if path.is_file() {
            info!(path = %path.display(), "using card list");
            return read_card_list(&path).map(Some);
        }
    }
    Ok(None)
}

fn read_card_list(path: &Path) -> Result<CardList, CliError> {
    CardList::from_path(path).map_err(|err| {
        CliError::new(
            format!("failed to load card list {}: {}", path.display(), err),
            None,
        )
    })
}

fn cmd_batch(list: &Path, strict: bool, quiet: bool) -> Result<(), CliError> {
    let resolved = resolve_input_path(list)?;
    let text = fs::read_to_string(&resolved)
        .with_context(|| format!("Failed to read card list: {}", resolved.display()))?;

    let mut decoded = 0u64;
    let mut anomalies = 0u64;
    let mut failed = 0u64;
    for (number, line) in text.lines().enumerate() {
        if !line.starts_with('3') || is_pattern(line) {
            continue;
        }
        let atr = line.trim();
        match decode_atr(atr) {
            Ok(record) => {
                decoded += 1;
                if record.has_anomalies() {
                    anomalies += 1;
                    if !quiet {
                        println!("line {}: {}", number + 1, atr);
                        for warning in &record.warnings {
                            println!("  warning: {}", warning);
                        }
                        if let Some(tck) = record.get(atrlens_core::FieldId::Tck) {
                            for msg in &tck.description {
                                println!("  TCK: {}", msg.render());
                            }
                        }
                    }
                }
            }
            Err(err) => {
                failed += 1;
                if !quiet {
                    println!("line {}: {}", number + 1, atr);
                    println!("  error: {}", err);
                }
            }
        }
    }

    println!(
        "decoded: {}, with anomalies: {}, failed: {}",
        decoded, anomalies, failed
    );
    if strict && (anomalies > 0 || failed > 0) {
        return Err(CliError::new(
            "card list contains malformed or anomalous ATRs",
            Some("run without --strict --quiet to list them".to_string()),
        ));
    }
    Ok(())
}

fn is_pattern(line: &str) -> bool {
    line.contains(['.', '*', '[', '?'])
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        if !input.is_file() {
            return Err(CliError::new(
                format!("input file not found: {}", input.display()),
                Some("pass a smartcard_list.txt file".to_string()),
            ));
        }
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        n => {
            let listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let more = if n > 3 { ", ..." } else { "" };
            Err(CliError::new(
                format!(
                    "multiple files match pattern '{}' ({} matches); matches: {}{}",
                    pattern, n, listed, more
                ),
                Some("pass a single card list, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
