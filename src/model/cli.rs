use std::path::PathBuf;

use clap::Parser;

use crate::agg::sort::SortSpec;

#[derive(Parser, Debug)]
#[command(
    name = "req-scope",
    about = "Per-endpoint latency profiler for LTSV access logs",
    long_about = None
)]
pub struct Cli {
    /// Access log to profile (LTSV, one request per line)
    #[arg(short, long)]
    pub file: PathBuf,

    /// Follow the file as it grows and show a live dashboard
    #[arg(long)]
    pub tail: bool,

    /// Sort rows by "metric,direction", e.g. "max,desc" or "p99,asc"
    #[arg(long, default_value = "count,asc")]
    pub sort_by: String,

    /// Add P10/P50/P90/P95/P99 columns
    #[arg(long)]
    pub expand: bool,

    /// YAML document overriding the LTSV label names
    #[arg(long, value_name = "YAML")]
    pub label_as: Option<PathBuf>,

    /// Raw records kept for the inspector pane in tail mode
    #[arg(long, default_value_t = 1000)]
    pub limit: usize,

    /// Parser threads (defaults to the number of cpus)
    #[arg(long)]
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
pub enum RunMode {
    Batch,
    Tail,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub file: PathBuf,
    pub mode: RunMode,
    pub sort: SortSpec,
    pub expand: bool,
    pub limit: usize,
    pub workers: usize,
}

impl RunConfig {
    pub fn from_cli(cli: Cli) -> Self {
        Self {
            file: cli.file,
            mode: if cli.tail { RunMode::Tail } else { RunMode::Batch },
            sort: SortSpec::parse(&cli.sort_by),
            expand: cli.expand,
            limit: cli.limit,
            workers: cli.workers.unwrap_or_else(num_cpus::get).max(1),
        }
    }
}
