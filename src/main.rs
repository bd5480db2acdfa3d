use clap::{ArgAction, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use quill_config::Config;
use quill_fs::{DocumentState, Encoding, FormatDescriptor, LineEnding, detect_file, load_file, save_file};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "quill - encoding and line-ending aware text files", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file to use instead of the discovered one
    #[arg(long, global = true, env = "QUILL_CONFIG")]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the detected format of a file
    Detect {
        file: PathBuf,
    },
    /// Re-save a file in another format
    Convert {
        input: PathBuf,
        output: PathBuf,

        /// Target encoding (utf-8 or utf-16)
        #[arg(long)]
        encoding: Option<Encoding>,

        /// Target line ending (unix or windows)
        #[arg(long)]
        eol: Option<LineEnding>,

        /// Write a byte order mark
        #[arg(long, conflicts_with = "no_bom")]
        bom: bool,

        /// Omit the byte order mark
        #[arg(long)]
        no_bom: bool,
    },
    /// Print a file as UTF-8 with its line endings kept canonical
    Cat {
        file: PathBuf,
    },
    /// Create an empty file in the default save format
    New {
        file: PathBuf,
    },
    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    }
    .into_diagnostic()?;

    init_tracing(&config.log.level, cli.verbose);
    debug!(path = ?cli.config, "configuration loaded");

    match cli.command {
        Commands::Detect { file } => detect(&config, &file),
        Commands::Convert {
            input,
            output,
            encoding,
            eol,
            bom,
            no_bom,
        } => {
            let bom = match (bom, no_bom) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            convert(&config, &input, &output, encoding, eol, bom)
        }
        Commands::Cat { file } => cat(&config, &file),
        Commands::New { file } => new_file(&config, &file),
        Commands::Config => {
            print!("{}", config.to_toml_string().into_diagnostic()?);
            Ok(())
        }
    }
}

/// `QUILL_LOG` wins, then `RUST_LOG`, then `-v`, then the configured level.
fn init_tracing(configured: &str, verbose: u8) {
    let fallback = match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_env("QUILL_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Convert an engine error into a diagnostic, bailing out at once on
/// allocation failure.
fn check<T>(result: quill_fs::Result<T>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) if err.is_fatal() => {
            error!(%err, "fatal error");
            eprintln!("quill: {err}");
            std::process::exit(2);
        }
        Err(err) => Err(err).into_diagnostic(),
    }
}

fn detect(config: &Config, file: &Path) -> Result<()> {
    let format = check(detect_file(file, &config.load_options()))?;
    println!("{}: {}", file.display(), format);
    Ok(())
}

fn convert(
    config: &Config,
    input: &Path,
    output: &Path,
    encoding: Option<Encoding>,
    eol: Option<LineEnding>,
    bom: Option<bool>,
) -> Result<()> {
    let mut doc = check(load_file(input, &config.load_options()))?;
    let from = doc.format();
    let to = target_format(from, encoding, eol, bom);
    doc.change_format(to);

    let saved = check(save_file(&mut doc, output, &config.save_options()))?;
    info!(from = %from, to = %saved.format, bytes = saved.bytes_written, "converted");
    println!("{} ({}) -> {} ({})", input.display(), from, saved.path.display(), saved.format);
    Ok(())
}

fn cat(config: &Config, file: &Path) -> Result<()> {
    let doc = check(load_file(file, &config.load_options()))?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(doc.text_string().as_bytes()).into_diagnostic()?;
    stdout.flush().into_diagnostic()
}

fn new_file(config: &Config, file: &Path) -> Result<()> {
    if file.exists() {
        return Err(miette::miette!("{} already exists", file.display()));
    }

    let mut doc = DocumentState::new_document(config.default_format());
    let saved = check(save_file(&mut doc, file, &config.save_options()))?;
    println!("{}: {} ({} bytes)", saved.path.display(), saved.format, saved.bytes_written);
    Ok(())
}

/// Overlay the requested fields onto the detected format.
fn target_format(
    detected: FormatDescriptor,
    encoding: Option<Encoding>,
    eol: Option<LineEnding>,
    bom: Option<bool>,
) -> FormatDescriptor {
    FormatDescriptor::new(
        encoding.unwrap_or(detected.encoding),
        eol.unwrap_or(detected.line_ending),
        bom.unwrap_or(detected.has_bom),
    )
}
