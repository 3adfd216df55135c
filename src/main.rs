use anyhow::Result;
use clap::Parser;
use nob_universe_lib::{run_from_file, RunOverrides};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path (TOML, or JSON when it ends in .json)
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Where to write the trajectory log (overrides output.path)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Random seed (overrides seed)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of closed-loop steps (overrides simulation.steps)
    #[arg(long)]
    steps: Option<usize>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    nob_core::init_logging(&args.log_level);

    let overrides = RunOverrides {
        output: args.output,
        seed: args.seed,
        steps: args.steps,
    };
    let report = run_from_file(&args.config, &overrides)?;

    println!(
        "Saved {} steps to {}",
        report.log.len(),
        report.output.display()
    );
    Ok(())
}
