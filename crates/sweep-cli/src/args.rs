use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "sweep",
    version,
    about = "Run static analysis over a compilation database in parallel"
)]
pub struct Args {
    /// Root of the source tree; entries under external/ are skipped
    pub source_dir: PathBuf,

    /// Build directory containing compile_commands.json
    pub build_dir: PathBuf,

    /// Number of parallel analyzer processes (default: available processing units)
    #[arg(long)]
    pub jobs: Option<usize>,
}
