//! datacard2ws CLI

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod generate;

#[derive(Parser)]
#[command(name = "datacard2ws")]
#[command(about = "Translate a counting-experiment datacard into a workspace-factory script")]
#[command(version)]
struct Cli {
    /// Input datacard
    datacard: PathBuf,

    /// Statistics only: drop every systematic
    #[arg(short, long)]
    stat: bool,

    /// Replace observations with the background-only expectation (Asimov dataset)
    #[arg(short, long)]
    asimov: bool,

    /// Output file for the factory script. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the model description (after --stat/--asimov) as pretty JSON.
    #[arg(long)]
    dump_model: Option<PathBuf>,

    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let options = dc_translate::FactoryOptions { stat_only: cli.stat, asimov: cli.asimov };
    generate::cmd_generate(&cli.datacard, options, cli.output.as_ref(), cli.dump_model.as_ref())
}
