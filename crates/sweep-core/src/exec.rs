//! Concurrent dispatch of analyzer invocations.
//!
//! Every selected entry becomes one independent subprocess. Tasks share no
//! mutable state and no ordering is guaranteed; progress lines from
//! different workers may interleave. There is no timeout: a hung analyzer
//! process occupies its worker until it exits.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::num::NonZeroUsize;
use std::path::Path;
use std::process::Command;
use std::thread;
use tracing::debug;

use crate::db::CompileCommand;
use crate::{filter, rewrite};

/// Number of workers: an explicit override, else the number of available
/// processing units, else 1.
pub fn worker_count(jobs: Option<usize>) -> usize {
    match jobs {
        Some(n) => n.max(1),
        None => thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1),
    }
}

/// Run the analyzer for every entry on a fixed-size worker pool.
///
/// Returns once every spawned subprocess has exited. Individual analyzer
/// failures are not collected or surfaced; whatever the subprocess printed
/// on its inherited stdout/stderr is the only report of them.
pub fn run_all(source_dir: &Path, entries: &[CompileCommand], jobs: Option<usize>) -> Result<()> {
    let workers = worker_count(jobs);
    debug!(workers, tasks = entries.len(), "dispatching analyzer invocations");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .context("failed to build worker pool")?;

    pool.install(|| {
        entries
            .par_iter()
            .for_each(|entry| run_analyzer(source_dir, entry));
    });

    Ok(())
}

/// Run one analyzer invocation and wait for it to exit.
///
/// The command runs through the shell in the entry's recorded working
/// directory with inherited stdio. The exit status is deliberately
/// discarded: analysis findings and analyzer failures alike belong to the
/// subprocess's own output.
fn run_analyzer(source_dir: &Path, entry: &CompileCommand) {
    let relative = filter::source_path(source_dir, entry);
    println!("Analyzing {}", relative.display());

    let invocation = rewrite::analyzer_invocation(&entry.command);

    let status = Command::new("sh")
        .arg("-c")
        .arg(&invocation)
        .current_dir(&entry.directory)
        .status();

    match status {
        Ok(status) if !status.success() => {
            debug!(file = %relative.display(), %status, "analyzer exited with failure");
        }
        Err(e) => {
            debug!(file = %relative.display(), error = %e, "failed to spawn analyzer");
        }
        Ok(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch_entry(dir: &TempDir, marker: &str) -> CompileCommand {
        CompileCommand {
            directory: dir.path().display().to_string(),
            file: format!("{marker}.cpp"),
            command: format!("touch {marker}"),
        }
    }

    #[test]
    fn explicit_job_count_wins() {
        assert_eq!(worker_count(Some(3)), 3);
    }

    #[test]
    fn zero_jobs_clamps_to_one() {
        assert_eq!(worker_count(Some(0)), 1);
    }

    #[test]
    fn detected_worker_count_is_at_least_one() {
        assert!(worker_count(None) >= 1);
    }

    #[test]
    fn dispatches_every_task_with_fewer_workers_than_tasks() {
        let dir = TempDir::new().unwrap();
        let entries: Vec<CompileCommand> =
            (0..5).map(|i| touch_entry(&dir, &format!("marker_{i}"))).collect();

        run_all(dir.path(), &entries, Some(2)).expect("dispatch succeeds");

        // run_all returning means every subprocess has already exited, so
        // all markers must exist.
        for i in 0..5 {
            assert!(
                dir.path().join(format!("marker_{i}")).exists(),
                "task {i} was not dispatched"
            );
        }
    }

    #[test]
    fn runs_in_the_entry_directory() {
        let outer = TempDir::new().unwrap();
        let inner = TempDir::new().unwrap();
        let entry = CompileCommand {
            directory: inner.path().display().to_string(),
            file: "main.cpp".to_string(),
            command: "touch here".to_string(),
        };

        run_all(outer.path(), &[entry], Some(1)).unwrap();

        assert!(inner.path().join("here").exists());
        assert!(!outer.path().join("here").exists());
    }

    #[test]
    fn failing_subprocess_does_not_fail_the_run() {
        let dir = TempDir::new().unwrap();
        let entry = CompileCommand {
            directory: dir.path().display().to_string(),
            file: "broken.cpp".to_string(),
            command: "exit 7".to_string(),
        };

        run_all(dir.path(), &[entry], Some(1)).expect("run ignores task failures");
    }

    #[test]
    fn unspawnable_subprocess_does_not_fail_the_run() {
        // Nonexistent working directory: the spawn itself fails.
        let dir = TempDir::new().unwrap();
        let entry = CompileCommand {
            directory: dir.path().join("gone").display().to_string(),
            file: "main.cpp".to_string(),
            command: "true".to_string(),
        };

        run_all(dir.path(), &[entry], Some(1)).expect("run ignores spawn failures");
    }

    #[test]
    fn empty_task_set_is_a_no_op() {
        let dir = TempDir::new().unwrap();

        run_all(dir.path(), &[], Some(4)).unwrap();
    }
}
