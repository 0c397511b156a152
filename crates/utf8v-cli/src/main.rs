//! utf8v - Check, encode and upgrade text to UTF-8
//!
//! This tool exposes the utf8v codec on the command line: validating
//! files, encoding code points, upgrading Latin-1 files, and normalizing
//! raw protocol logs line by line.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::EnvFilter;
use utf8v_core::codec::{
    encode_scalar_into, parse_scalar_literal, upgrade_latin1_to_vec, valid_up_to, Scalars,
    MAX_SEQUENCE_LEN,
};
use utf8v_core::file::{check_file, read_file, write_file};
use utf8v_core::{ConversionMode, LineNormalizer, NormalizerConfig, Outcome};
use walkdir::WalkDir;

/// Check, encode and upgrade text to UTF-8
#[derive(Parser, Debug)]
#[command(name = "utf8v")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report whether files are well-formed UTF-8
    Check(CheckArgs),
    /// Encode code points as UTF-8
    Encode(EncodeArgs),
    /// Convert a Latin-1 file to UTF-8
    Upgrade(UpgradeArgs),
    /// Forward UTF-8 lines untouched and upgrade the rest from Latin-1
    Normalize(NormalizeArgs),
    /// List the code points of a UTF-8 file
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
#[group(required = false, multiple = false)]
struct InputMode {
    /// Path to a single file (stdin if omitted)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Path to a directory to check recursively
    #[arg(short, long)]
    directory: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[command(flatten)]
    input: InputMode,

    /// Only print files that are not valid UTF-8
    #[arg(long)]
    invalid_only: bool,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Code points as U+XXXX, 0xXXXX or decimal
    #[arg(required = true)]
    scalars: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "hex")]
    format: OutputFormat,

    /// Refuse to encode UTF-16 surrogates
    #[arg(long)]
    strict: bool,
}

#[derive(Args, Debug)]
struct UpgradeArgs {
    /// Latin-1 input file (stdin if omitted)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Copy the input unchanged if it is already valid UTF-8
    #[arg(long)]
    if_needed: bool,

    /// Overwrite existing output file
    #[arg(long)]
    force: bool,
}

#[derive(Args, Debug)]
struct NormalizeArgs {
    /// Input file of raw lines (stdin if omitted)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Maximum size of an upgraded line in bytes
    #[arg(long, default_value_t = utf8v_core::normalize::DEFAULT_MAX_OUTPUT_BYTES)]
    max_bytes: usize,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// UTF-8 input file (stdin if omitted)
    #[arg(short, long)]
    file: Option<PathBuf>,
}

/// Output format for encoded code points
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One line per code point with the bytes in hex
    Hex,
    /// The raw UTF-8 bytes
    Raw,
}

/// Result of checking one input
#[derive(Debug, Clone, PartialEq, Eq)]
struct CheckReport {
    name: String,
    len: usize,
    valid_up_to: usize,
}

impl CheckReport {
    fn new(name: impl Into<String>, data: &[u8]) -> Self {
        Self {
            name: name.into(),
            len: data.len(),
            valid_up_to: valid_up_to(data),
        }
    }

    fn from_counts(name: impl Into<String>, (len, valid_up_to): (usize, usize)) -> Self {
        Self {
            name: name.into(),
            len,
            valid_up_to,
        }
    }

    fn is_valid(&self) -> bool {
        self.valid_up_to == self.len
    }

    fn describe(&self) -> String {
        if self.is_valid() {
            format!("{}: ok", self.name)
        } else {
            format!("{}: invalid (valid up to {})", self.name, self.valid_up_to)
        }
    }
}

/// Counters for the normalize command
#[derive(Debug, Default, PartialEq, Eq)]
struct NormalizeStats {
    unchanged: usize,
    upgraded: usize,
    truncated: usize,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match &cli.command {
        Command::Check(args) => run_check(args),
        Command::Encode(args) => run_encode(args).map(|()| ExitCode::SUCCESS),
        Command::Upgrade(args) => run_upgrade(args).map(|()| ExitCode::SUCCESS),
        Command::Normalize(args) => run_normalize(args).map(|()| ExitCode::SUCCESS),
        Command::Inspect(args) => run_inspect(args),
    }
}

/// Read a file, or all of stdin when no path is given
fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            read_file(path).with_context(|| format!("Failed to read input: {}", path.display()))
        }
        None => {
            let mut data = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut data)
                .context("Failed to read stdin")?;
            Ok(data)
        }
    }
}

fn run_check(args: &CheckArgs) -> Result<ExitCode> {
    let reports = if let Some(ref directory) = args.input.directory {
        check_directory(directory)?
    } else {
        let name = args
            .input
            .file
            .as_deref()
            .map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string());
        let data = read_input(args.input.file.as_deref())?;
        vec![CheckReport::new(name, &data)]
    };

    let mut stdout = io::stdout().lock();
    let mut invalid = 0;
    for report in &reports {
        if !report.is_valid() {
            invalid += 1;
        } else if args.invalid_only {
            continue;
        }
        writeln!(stdout, "{}", report.describe())?;
    }

    info!("Checked {} input(s), {} invalid", reports.len(), invalid);

    Ok(if invalid == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Check every visible file under a directory
fn check_directory(directory: &Path) -> Result<Vec<CheckReport>> {
    if !directory.exists() {
        bail!("Directory does not exist: {}", directory.display());
    }
    if !directory.is_dir() {
        bail!("Path is not a directory: {}", directory.display());
    }

    info!("Scanning directory: {}", directory.display());

    let mut reports = Vec::new();
    for entry in WalkDir::new(directory)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error walking {}: {}", directory.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        match check_file(path) {
            Ok(counts) => {
                reports.push(CheckReport::from_counts(path.display().to_string(), counts))
            }
            Err(e) => warn!("Skipping unreadable file: {}", e),
        }
    }

    debug!("Checked {} files", reports.len());
    Ok(reports)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

fn run_encode(args: &EncodeArgs) -> Result<()> {
    let mode = if args.strict {
        ConversionMode::Strict
    } else {
        ConversionMode::Lenient
    };

    let mut stdout = io::stdout().lock();
    for literal in &args.scalars {
        let value = parse_scalar_literal(literal)?;
        let mut buf = [0u8; MAX_SEQUENCE_LEN];
        let outcome = encode_scalar_into(value, mode, &mut buf)
            .with_context(|| format!("Failed to encode {}", literal))?;
        if outcome.replaced {
            warn!("{} is not a legal scalar, encoded U+FFFD instead", literal);
        }

        let bytes = &buf[..outcome.written];
        match args.format {
            OutputFormat::Hex => writeln!(stdout, "U+{:04X}: {}", value, hex_bytes(bytes))?,
            OutputFormat::Raw => stdout.write_all(bytes)?,
        }
    }
    stdout.flush()?;
    Ok(())
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

fn run_upgrade(args: &UpgradeArgs) -> Result<()> {
    let data = read_input(args.file.as_deref())?;

    let converted = if args.if_needed && utf8v_core::is_valid_utf8(&data) {
        info!("Input is already valid UTF-8, copying unchanged");
        data
    } else {
        let converted = upgrade_latin1_to_vec(&data);
        debug!("Upgraded {} bytes to {} bytes", data.len(), converted.len());
        converted
    };

    match args.output {
        Some(ref output) => write_output_file(output, &converted, args.force),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&converted)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Write an output file, refusing to clobber unless forced
fn write_output_file(output_path: &Path, content: &[u8], force: bool) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    if output_path.exists() && !force {
        bail!(
            "File already exists: {} (use --force to overwrite)",
            output_path.display()
        );
    }

    write_file(output_path, content)?;
    info!("Wrote {}", output_path.display());
    Ok(())
}

fn run_normalize(args: &NormalizeArgs) -> Result<()> {
    let data = read_input(args.file.as_deref())?;
    let normalizer =
        LineNormalizer::with_config(NormalizerConfig::new().max_output_bytes(args.max_bytes));

    let mut stdout = io::stdout().lock();
    let stats = normalize_lines(&normalizer, &data, &mut stdout)?;
    stdout.flush()?;

    info!(
        "Summary: {} unchanged, {} upgraded, {} truncated",
        stats.unchanged, stats.upgraded, stats.truncated
    );
    Ok(())
}

/// Normalize each line of `data`, keeping the original terminators
fn normalize_lines(
    normalizer: &LineNormalizer,
    data: &[u8],
    out: &mut impl Write,
) -> io::Result<NormalizeStats> {
    let mut stats = NormalizeStats::default();

    for raw in data.split_inclusive(|&b| b == b'\n') {
        let (line, terminator) = split_terminator(raw);
        let normalized = normalizer.normalize(line);
        match normalized.outcome {
            Outcome::Unchanged => stats.unchanged += 1,
            Outcome::Upgraded => stats.upgraded += 1,
            Outcome::Truncated { needed } => {
                warn!("Line truncated: {} bytes needed", needed);
                stats.truncated += 1;
            }
        }
        out.write_all(&normalized.bytes)?;
        out.write_all(terminator)?;
    }

    Ok(stats)
}

/// Split a trailing `\n` or `\r\n` off a line
fn split_terminator(raw: &[u8]) -> (&[u8], &[u8]) {
    let len = if raw.ends_with(b"\r\n") {
        2
    } else if raw.ends_with(b"\n") {
        1
    } else {
        0
    };
    raw.split_at(raw.len() - len)
}

fn run_inspect(args: &InspectArgs) -> Result<ExitCode> {
    let data = read_input(args.file.as_deref())?;
    let mut stdout = io::stdout().lock();
    let complete = write_scalar_table(&data, &mut stdout)?;
    stdout.flush()?;

    Ok(if complete {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Write one `offset U+XXXX len` row per scalar; decode errors go to the log
fn write_scalar_table(data: &[u8], out: &mut impl Write) -> io::Result<bool> {
    for scalar in Scalars::new(data) {
        match scalar {
            Ok(decoded) => writeln!(
                out,
                "{}\tU+{:04X}\t{}",
                decoded.offset, decoded.value, decoded.len
            )?,
            Err(e) => {
                warn!("{}", e);
                return Ok(false);
            }
        }
    }
    Ok(true)
}
