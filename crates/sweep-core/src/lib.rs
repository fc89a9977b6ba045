pub mod db;
pub mod exec;
pub mod filter;
pub mod rewrite;

use anyhow::Result;
use std::path::Path;
use tracing::debug;

/// Outcome of a run: how many entries were dispatched to the analyzer and
/// how many were filtered out as third-party sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub analyzed: usize,
    pub skipped: usize,
}

/// Analyze every first-party entry of a build directory's compilation
/// database.
///
/// Single linear pass: load the database, drop entries under `external/`,
/// rewrite and dispatch the rest on a bounded worker pool, and return once
/// every analyzer process has exited. A database that cannot be read aborts
/// the run before anything is spawned.
pub fn analyze(source_dir: &Path, build_dir: &Path, jobs: Option<usize>) -> Result<RunSummary> {
    let entries = db::load(build_dir)?;

    let (selected, skipped): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|entry| filter::should_analyze(source_dir, entry));

    debug!(
        selected = selected.len(),
        skipped = skipped.len(),
        "filtered compilation database"
    );

    exec::run_all(source_dir, &selected, jobs)?;

    Ok(RunSummary {
        analyzed: selected.len(),
        skipped: skipped.len(),
    })
}
