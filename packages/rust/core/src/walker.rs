//! Tree walker: mirrors a documentation tree into the working directory.
//!
//! Directories are recreated, Markdown files are normalized on the way
//! through, and index files are renamed after the directory that holds them.
//! Level gates, the index target and empty-directory pruning come from
//! [`WalkPolicy`].

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, trace, warn};

use readmepack_markdown::{NormalizeOptions, normalize_document};
use readmepack_shared::{
    LineEnding, PackOptions, PackVariant, ReadmePackError, Result, TocMarkers,
};

use crate::classify::{EntryKind, MARKDOWN_EXTENSION, classify};
use crate::pipeline::ProgressReporter;

/// Where a promoted index file is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexTarget {
    /// Next to the files of its own directory.
    SameDir,
    /// One directory up, beside the directory it came from.
    ParentDir,
}

/// Renaming, flattening and pruning rules for one walk.
#[derive(Debug, Clone)]
pub struct WalkPolicy {
    /// Name fragment identifying index files.
    pub index_marker: String,
    /// Index files at `level >= index_min_level` are renamed.
    pub index_min_level: u32,
    /// Destination of renamed index files.
    pub index_target: IndexTarget,
    /// Markdown files below this level are skipped.
    pub markdown_min_level: u32,
    /// Remove created directories that end up empty.
    pub prune_empty: bool,
    /// Options passed to the normalizer for every document.
    pub normalize: NormalizeOptions,
}

impl WalkPolicy {
    /// Copy everything; index files renamed in place.
    pub fn mirror(index_marker: impl Into<String>, line_ending: LineEnding) -> Self {
        Self {
            index_marker: index_marker.into(),
            index_min_level: 0,
            index_target: IndexTarget::SameDir,
            markdown_min_level: 0,
            prune_empty: false,
            normalize: NormalizeOptions {
                line_ending,
                ..Default::default()
            },
        }
    }

    /// Skip root-level files, lift nested index files one level up, prune
    /// empty directories, strip generated TOCs and mark pages visible.
    pub fn versioned(
        index_marker: impl Into<String>,
        toc_markers: TocMarkers,
        line_ending: LineEnding,
    ) -> Self {
        Self {
            index_marker: index_marker.into(),
            index_min_level: 2,
            index_target: IndexTarget::ParentDir,
            markdown_min_level: 1,
            prune_empty: true,
            normalize: NormalizeOptions {
                hidden: Some(false),
                toc_markers: Some(toc_markers),
                skip_blank_after_front_matter: true,
                line_ending,
            },
        }
    }

    /// Policy matching the configured variant.
    pub fn from_options(options: &PackOptions) -> Self {
        match options.variant {
            PackVariant::Mirror => Self::mirror(&*options.index_name, options.line_ending),
            PackVariant::Versioned => Self::versioned(
                &*options.index_name,
                options.toc_markers.clone(),
                options.line_ending,
            ),
        }
    }
}

/// Counters collected during a walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub dirs_created: usize,
    pub dirs_pruned: usize,
    pub files_written: usize,
    pub indexes_promoted: usize,
    pub skipped: usize,
}

/// Mirror `source` into `dest`, starting at traversal depth `level`.
///
/// `dest` must already exist. Entries are visited in file-name order. The
/// first filesystem error aborts the walk; whatever was written so far stays
/// on disk.
#[instrument(skip_all, fields(source = %source.display(), dest = %dest.display(), depth = level))]
pub fn walk(
    source: &Path,
    dest: &Path,
    level: u32,
    policy: &WalkPolicy,
    progress: &dyn ProgressReporter,
) -> Result<WalkStats> {
    let mut stats = WalkStats::default();
    walk_dir(source, dest, level, policy, progress, &mut stats)?;

    debug!(
        files = stats.files_written,
        indexes = stats.indexes_promoted,
        pruned = stats.dirs_pruned,
        skipped = stats.skipped,
        "walk complete"
    );
    Ok(stats)
}

fn walk_dir(
    source: &Path,
    dest: &Path,
    level: u32,
    policy: &WalkPolicy,
    progress: &dyn ProgressReporter,
    stats: &mut WalkStats,
) -> Result<()> {
    trace!(source = %source.display(), depth = level, "entering directory");

    for file_name in sorted_entries(source)? {
        let name = file_name.to_string_lossy();
        let origin = source.join(&file_name);

        match classify(&name, &policy.index_marker) {
            EntryKind::Directory => {
                let target = dest.join(&file_name);
                fs::create_dir(&target).map_err(|e| ReadmePackError::io(&target, e))?;
                stats.dirs_created += 1;

                walk_dir(&origin, &target, level + 1, policy, progress, stats)?;

                if policy.prune_empty && is_empty_dir(&target)? {
                    fs::remove_dir(&target).map_err(|e| ReadmePackError::io(&target, e))?;
                    stats.dirs_pruned += 1;
                    debug!(path = %target.display(), "pruned empty directory");
                }
            }
            EntryKind::IndexFile if level >= policy.index_min_level => {
                let target_dir = match policy.index_target {
                    IndexTarget::SameDir => dest,
                    IndexTarget::ParentDir => dest.parent().ok_or_else(|| {
                        ReadmePackError::validation(format!(
                            "cannot lift index file out of {}",
                            dest.display()
                        ))
                    })?,
                };
                let target =
                    target_dir.join(format!("{}{MARKDOWN_EXTENSION}", dir_name(source)?));

                debug!(
                    from = %origin.display(),
                    to = %target.display(),
                    "renaming index file"
                );
                write_normalized(&origin, &target, policy, progress, stats)?;
                stats.indexes_promoted += 1;
            }
            EntryKind::MarkdownFile if level >= policy.markdown_min_level => {
                let target = dest.join(&file_name);
                debug!(from = %origin.display(), to = %target.display(), "copying file");
                write_normalized(&origin, &target, policy, progress, stats)?;
            }
            kind => {
                trace!(path = %origin.display(), ?kind, depth = level, "skipping entry");
                stats.skipped += 1;
            }
        }
    }

    Ok(())
}

/// Read, normalize and write one document.
fn write_normalized(
    origin: &Path,
    target: &Path,
    policy: &WalkPolicy,
    progress: &dyn ProgressReporter,
    stats: &mut WalkStats,
) -> Result<()> {
    let raw = fs::read_to_string(origin).map_err(|e| ReadmePackError::io(origin, e))?;
    let result = normalize_document(&raw, &policy.normalize);

    if target.exists() {
        warn!(path = %target.display(), "overwriting previously written file");
    }
    fs::write(target, &result.markdown).map_err(|e| ReadmePackError::io(target, e))?;

    stats.files_written += 1;
    progress.file_written(target, stats.files_written);
    Ok(())
}

/// Entry names of `dir`, sorted so output does not depend on listing order.
fn sorted_entries(dir: &Path) -> Result<Vec<OsString>> {
    let mut names = fs::read_dir(dir)
        .map_err(|e| ReadmePackError::io(dir, e))?
        .map(|entry| {
            entry
                .map(|e| e.file_name())
                .map_err(|e| ReadmePackError::io(dir, e))
        })
        .collect::<Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}

fn is_empty_dir(dir: &Path) -> Result<bool> {
    let mut entries = fs::read_dir(dir).map_err(|e| ReadmePackError::io(dir, e))?;
    Ok(entries.next().is_none())
}

/// Last path component of `dir`, resolving `.` and similar through the
/// filesystem.
fn dir_name(dir: &Path) -> Result<String> {
    if let Some(name) = dir.file_name() {
        return Ok(name.to_string_lossy().into_owned());
    }

    let resolved: PathBuf = fs::canonicalize(dir).map_err(|e| ReadmePackError::io(dir, e))?;
    resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ReadmePackError::validation(format!(
                "cannot name index file after {}",
                dir.display()
            ))
        })
}
