use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use bibnorm::ingest::{ImportFormat, IngestOptions, ingest};
use bibnorm::{CitationStyle, JsonParser, Reference, ReferenceParser, format_record, validate_record};
use clap::{Parser, Subcommand};
use itertools::Itertools;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bibnorm", about = "Import, validate and format bibliographic references")]
struct Cli {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import a reference file and print the import report
    Import {
        /// File to import
        file: PathBuf,

        /// Input format; guessed from the extension or content when absent
        #[arg(long)]
        format: Option<String>,

        /// Style for records that do not name one
        #[arg(long, env = "BIBNORM_STYLE", default_value = "abnt")]
        style: String,

        /// Keep HTML and plain text markup in the formatted reference
        #[arg(long)]
        preserve_formatting: bool,

        /// Reject records missing fields the style requires
        #[arg(long)]
        strict: bool,

        /// Render the type-aware long form
        #[arg(long)]
        long_form: bool,
    },
    /// Render every record of a JSON file
    Format {
        file: PathBuf,

        #[arg(long, env = "BIBNORM_STYLE", default_value = "abnt")]
        style: String,

        #[arg(long)]
        long_form: bool,
    },
    /// Validate every record of a JSON file against a style
    Validate {
        file: PathBuf,

        #[arg(long, env = "BIBNORM_STYLE", default_value = "abnt")]
        style: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Import {
            file,
            format,
            style,
            preserve_formatting,
            strict,
            long_form,
        } => {
            let raw = read(&file)?;
            let file_name = file.file_name().and_then(|name| name.to_str());
            let format = ImportFormat::resolve(format.as_deref(), file_name, &raw)?;
            let style = CitationStyle::from_name(&style)
                .ok_or_else(|| {
                    anyhow!(
                        "unknown style: {style} (expected one of {})",
                        CitationStyle::ALL.iter().join(", ")
                    )
                })?;
            let options = IngestOptions::new()
                .with_style(style)
                .with_preserve_formatting(preserve_formatting)
                .with_strict(strict)
                .with_type_aware(long_form);
            let report = ingest(format, &raw, &options)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            print_json(&report, cli.pretty)
        }
        Command::Format {
            file,
            style,
            long_form,
        } => {
            for record in load_records(&file)? {
                println!("{}", format_record(&record, &style, long_form));
            }
            Ok(())
        }
        Command::Validate { file, style } => {
            let reports: Vec<_> = load_records(&file)?
                .iter()
                .map(|record| validate_record(record, &style))
                .collect();
            print_json(&reports, cli.pretty)
        }
    }
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_records(path: &Path) -> Result<Vec<Reference>> {
    let raw = read(path)?;
    let text = std::str::from_utf8(&raw)
        .with_context(|| format!("{} is not UTF-8", path.display()))?;
    JsonParser::new()
        .parse(text)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
