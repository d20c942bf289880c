use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dtb_export::config::DEFAULT_YEAR;
use dtb_export::pipeline;
use dtb_export::{Destination, DtbError, ExportOptions, Format, Result};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so that stdout only carries exported data.
fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| DtbError::Logging(err.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Export(args) => execute_export(args),
        Command::Formats => {
            for format in Format::ALL {
                println!("{format}");
            }
            Ok(())
        }
    }
}

fn execute_export(args: ExportArgs) -> Result<()> {
    let format: Format = args.format.parse()?;
    let options = ExportOptions::new(format, args.minified);
    let destination = Destination::from_request(args.output, format);

    match args.input {
        Some(input) => {
            if !input.exists() {
                return Err(DtbError::MissingInput(input));
            }
            pipeline::export_file(&input, &options, &destination)
        }
        None => pipeline::export_year(args.year.unwrap_or(DEFAULT_YEAR), &options, &destination),
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Export the Brazilian territorial division (DTB) into CSV, JSON, SQL, XML or YAML."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download (or read) the dataset and export it.
    Export(ExportArgs),
    /// List the supported output formats.
    Formats,
}

#[derive(clap::Args)]
struct ExportArgs {
    /// Dataset year to download.
    #[arg(long, conflicts_with = "input")]
    year: Option<u16>,

    /// Read a local .xls/.xlsx spreadsheet instead of downloading.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output format: csv, json, sql, xml or yaml.
    #[arg(long, default_value = "json")]
    format: String,

    /// Produce the size-minimized variant of the format.
    #[arg(long)]
    minified: bool,

    /// Write to a file instead of stdout; without a value writes dtb.<format>.
    #[arg(long, num_args = 0..=1, value_name = "FILE")]
    output: Option<Option<PathBuf>>,
}
