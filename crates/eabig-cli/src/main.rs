//! Command-line front end for inspecting EA BIG archives.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use eabig::BigArchive;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "eabig",
    about = "Inspect and extract entries from EA BIG archives",
    version
)]
struct Cli {
    /// Set the logging level
    #[arg(short, long, value_enum, default_value = "warn")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the archive header summary
    Info {
        /// Path to the .big archive
        file: PathBuf,
    },
    /// List the archive's entries
    List {
        /// Path to the .big archive
        file: PathBuf,

        /// Include sentinel and empty entries
        #[arg(short, long)]
        all: bool,
    },
    /// Extract one entry's decompressed payload
    Extract {
        /// Path to the .big archive
        file: PathBuf,

        /// Entry name as listed by `list`
        name: String,

        /// Output path (defaults to the entry name in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(Level::from(cli.log_level).into())
                .from_env_lossy(),
        )
        .init();

    match cli.command {
        Commands::Info { file } => info(&file),
        Commands::List { file, all } => list(&file, all),
        Commands::Extract { file, name, output } => extract(&file, &name, output),
    }
}

fn open(file: &PathBuf) -> anyhow::Result<BigArchive> {
    BigArchive::open(file).with_context(|| format!("opening archive {}", file.display()))
}

fn info(file: &PathBuf) -> anyhow::Result<()> {
    let archive = open(file)?;
    println!("variant:       {:?}", archive.variant());
    println!("declared size: {}", archive.declared_size());
    println!("entries:       {}", archive.len());
    Ok(())
}

fn list(file: &PathBuf, all: bool) -> anyhow::Result<()> {
    let archive = open(file)?;
    println!(
        "{:<24} {:<4} {:<6} {:>10} {:>12}",
        "NAME", "TYPE", "COMP", "RAW SIZE", "DECOMPRESSED"
    );
    for entry in archive.entries() {
        if !all && entry.data.is_empty() {
            continue;
        }
        println!(
            "{:<24} {:<4} {:<6} {:>10} {:>12}",
            entry.name,
            entry.kind.as_str(),
            entry.compression.to_string(),
            entry.raw_size,
            entry.decompressed_size()
        );
    }
    Ok(())
}

fn extract(file: &PathBuf, name: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    let archive = open(file)?;
    let Some(entry) = archive.get(name) else {
        bail!("no entry named {name:?} in {}", file.display());
    };

    let output = output.unwrap_or_else(|| PathBuf::from(name));
    fs::write(&output, &entry.data)
        .with_context(|| format!("writing {} bytes to {}", entry.data.len(), output.display()))?;
    println!(
        "extracted {name:?} ({} bytes, {}) to {}",
        entry.data.len(),
        entry.kind,
        output.display()
    );
    Ok(())
}
