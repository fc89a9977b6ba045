use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sweep_core::analyze;

mod args;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = args::Args::parse();

    let summary = analyze(&args.source_dir, &args.build_dir, args.jobs)?;

    tracing::info!(
        analyzed = summary.analyzed,
        skipped = summary.skipped,
        "analysis complete"
    );

    Ok(())
}
