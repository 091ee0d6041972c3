mod agg;
mod error;
mod model;
mod parse;
mod pipeline;
mod ui;

use std::process::ExitCode;

use clap::Parser;

use crate::{
    error::ProfileError,
    model::{
        cli::{Cli, RunConfig, RunMode},
        label::LabelSet,
    },
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), ProfileError> {
    let labels = match &cli.label_as {
        Some(path) => LabelSet::from_yaml(path)?,
        None => LabelSet::default(),
    };
    let config = RunConfig::from_cli(cli);

    match config.mode {
        RunMode::Batch => pipeline::run_batch(&config, &labels),
        RunMode::Tail => pipeline::run_tail(&config, &labels),
    }
}

fn report_error(err: &ProfileError) {
    eprintln!("Error:\n  {err}");
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}
