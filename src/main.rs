//! remdu - explore the disk usage of a storage backend.
//!
//! Usage:
//!   remdu [PATH]        Explore a local directory
//!   remdu --demo        Explore a built-in sample tree
//!   remdu --help        Show help

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};

use remdu_core::{Backend, LocalBackend, MemoryBackend};
use remdu_tui::{SortKey, TuiConfig};

#[derive(Parser)]
#[command(
    name = "remdu",
    version,
    about = "Explore the disk usage of a storage backend",
    long_about = "remdu answers the question \"what is using all my space?\" \
                  for a storage backend.\n\n\
                  The backend is scanned in the background; navigate, sort, \
                  select and delete entries while the scan is still running. \
                  Press ? inside the interface for the key bindings."
)]
struct Cli {
    /// Directory to explore (defaults to the current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Explore a built-in in-memory sample tree instead of the filesystem
    #[arg(long)]
    demo: bool,

    /// Show the object-count column at startup
    #[arg(long)]
    counts: bool,

    /// Show the average-size column at startup
    #[arg(long)]
    average: bool,

    /// Hide the usage graph at startup
    #[arg(long)]
    no_graph: bool,

    /// Print raw byte values instead of human-readable sizes
    #[arg(long)]
    bytes: bool,

    /// Initial sort key
    #[arg(long, value_enum, default_value_t = SortArg::Size)]
    sort: SortArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Name,
    Size,
    Count,
    Average,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortKey::Name,
            SortArg::Size => SortKey::Size,
            SortArg::Count => SortKey::Count,
            SortArg::Average => SortKey::AverageSize,
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let config = TuiConfig::new()
        .with_human_readable(!cli.bytes)
        .with_graph(!cli.no_graph)
        .with_counts(cli.counts)
        .with_average(cli.average)
        .with_sort_key(cli.sort.into());

    let backend: Arc<dyn Backend> = if cli.demo {
        Arc::new(MemoryBackend::demo())
    } else {
        Arc::new(LocalBackend::new(&cli.path).context("invalid path")?)
    };

    remdu_tui::run_with_config(backend, config)
}
