//! End-to-end `pack` pipeline: pre-clean → walk → archive → cleanup.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument};

use readmepack_shared::{PackOptions, ReadmePackError, Result};

use crate::archive::{self, ArchiveLayout, ArchiveSummary};
use crate::walker::{self, WalkPolicy, WalkStats};

/// Result of the `pack` pipeline.
#[derive(Debug)]
pub struct PackResult {
    /// Intermediate tree (already removed on success).
    pub working_dir: PathBuf,
    /// The produced archive.
    pub archive: ArchiveSummary,
    /// Walker counters.
    pub walk: WalkStats,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each normalized document is written.
    fn file_written(&self, path: &Path, count: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &PackResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn file_written(&self, _path: &Path, _count: usize) {}
    fn done(&self, _result: &PackResult) {}
}

/// Run the full `pack` pipeline.
///
/// 1. Check that the root exists and does not overlap the working tree
/// 2. Remove the previous run's working tree and archive
/// 3. Create the working tree
/// 4. Walk the root into it
/// 5. Zip it and remove it
///
/// Any error aborts the run. A failure after step 3 can leave a partial
/// working tree and no archive.
#[instrument(skip_all, fields(root = %options.root_dir.display(), variant = %options.variant))]
pub async fn run_pack(options: &PackOptions, progress: &dyn ProgressReporter) -> Result<PackResult> {
    let start = Instant::now();
    let working_dir = options.working_dir();
    let archive_path = options.archive_path();

    info!(
        working_dir = %working_dir.display(),
        archive = %archive_path.display(),
        "starting pack pipeline"
    );

    check_layout(options)?;

    // --- Phase 1: Pre-clean ---
    progress.phase("Removing previous output");
    pre_clean(&working_dir, &archive_path)?;

    // --- Phase 2: Walk ---
    progress.phase("Normalizing documents");
    fs::create_dir_all(&working_dir).map_err(|e| ReadmePackError::io(&working_dir, e))?;

    let policy = WalkPolicy::from_options(options);
    let walk = walker::walk(&options.root_dir, &working_dir, 0, &policy, progress)?;

    info!(
        files = walk.files_written,
        indexes = walk.indexes_promoted,
        pruned = walk.dirs_pruned,
        "documentation tree normalized"
    );

    // --- Phase 3: Archive ---
    progress.phase("Compressing archive");
    let archive = archive::assemble(
        &working_dir,
        &archive_path,
        ArchiveLayout::from(options.variant),
    )
    .await?;

    let result = PackResult {
        working_dir,
        archive,
        walk,
        elapsed: start.elapsed(),
    };

    info!(
        archive = %result.archive.path.display(),
        size_bytes = result.archive.size_bytes,
        sha256 = %result.archive.sha256,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "pack complete"
    );
    progress.done(&result);

    Ok(result)
}

/// Remove leftovers of a previous run.
fn pre_clean(working_dir: &Path, archive_path: &Path) -> Result<()> {
    if working_dir.exists() {
        debug!(path = %working_dir.display(), "removing stale working tree");
        fs::remove_dir_all(working_dir).map_err(|e| ReadmePackError::io(working_dir, e))?;
    }
    if archive_path.exists() {
        debug!(path = %archive_path.display(), "removing stale archive");
        fs::remove_file(archive_path).map_err(|e| ReadmePackError::io(archive_path, e))?;
    }
    Ok(())
}

/// The root must be a directory, and the working tree must sit neither
/// inside it nor around it: pre-clean deletes the working tree.
fn check_layout(options: &PackOptions) -> Result<()> {
    let root = fs::canonicalize(&options.root_dir).map_err(|e| {
        ReadmePackError::validation(format!(
            "root directory '{}' is not accessible: {e}",
            options.root_dir.display()
        ))
    })?;
    if !root.is_dir() {
        return Err(ReadmePackError::validation(format!(
            "root directory '{}' is not a directory",
            options.root_dir.display()
        )));
    }

    let destination = fs::canonicalize(&options.destination_dir)
        .or_else(|_| std::path::absolute(&options.destination_dir))
        .map_err(|e| ReadmePackError::io(&options.destination_dir, e))?;
    let working = destination.join(options.working_dir_name());

    if working.starts_with(&root) || root.starts_with(&working) {
        return Err(ReadmePackError::validation(format!(
            "working directory '{}' overlaps root directory '{}'",
            working.display(),
            root.display()
        )));
    }

    Ok(())
}
