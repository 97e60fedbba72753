//! Archive assembler: zips the working tree, then removes it.
//!
//! Encoding runs on a blocking worker; the worker's join handle is the
//! completion signal. The working tree is deleted only after that signal
//! resolves successfully.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use readmepack_shared::{PackVariant, ReadmePackError, Result};

const FILE_PERMISSIONS: u32 = 0o644;
const DIR_PERMISSIONS: u32 = 0o755;

/// How the working tree maps onto archive entry names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveLayout {
    /// Each top-level entry of the tree is added on its own, named under the
    /// tree's directory name. No entry is written for the tree itself.
    TopLevelEntries,
    /// The tree itself is one directory entry holding everything else.
    SingleRoot,
}

impl From<PackVariant> for ArchiveLayout {
    fn from(variant: PackVariant) -> Self {
        match variant {
            PackVariant::Mirror => Self::TopLevelEntries,
            PackVariant::Versioned => Self::SingleRoot,
        }
    }
}

/// Outcome of a finished archive.
#[derive(Debug, Clone)]
pub struct ArchiveSummary {
    /// Path of the written archive.
    pub path: PathBuf,
    /// Number of file entries.
    pub file_entries: usize,
    /// Number of directory entries.
    pub dir_entries: usize,
    /// Archive size on disk.
    pub size_bytes: u64,
    /// Hex SHA-256 of the archive bytes.
    pub sha256: String,
}

#[derive(Debug, Default)]
struct EntryCounts {
    files: usize,
    dirs: usize,
}

/// Zip `source` into `output` and remove `source` once the archive is complete.
///
/// Entries are added in file-name order with a fixed timestamp and fixed
/// permissions, so identical trees give byte-identical archives. On failure
/// `source` is left in place and `output` may hold a partial archive.
#[instrument(skip_all, fields(source = %source.display(), output = %output.display(), layout = ?layout))]
pub async fn assemble(
    source: &Path,
    output: &Path,
    layout: ArchiveLayout,
) -> Result<ArchiveSummary> {
    info!("compressing working tree");

    let worker = {
        let source = source.to_path_buf();
        let output = output.to_path_buf();
        tokio::task::spawn_blocking(move || write_archive(&source, &output, layout))
    };

    let counts = worker
        .await
        .map_err(|e| ReadmePackError::archive(format!("archive worker did not finish: {e}")))??;

    info!(
        files = counts.files,
        dirs = counts.dirs,
        "archive written, removing working tree"
    );
    fs::remove_dir_all(source).map_err(|e| ReadmePackError::io(source, e))?;

    let (size_bytes, sha256) = digest(output)?;
    debug!(size_bytes, %sha256, "archive digest");

    Ok(ArchiveSummary {
        path: output.to_path_buf(),
        file_entries: counts.files,
        dir_entries: counts.dirs,
        size_bytes,
        sha256,
    })
}

/// Encode the tree. Runs on the blocking pool.
fn write_archive(source: &Path, output: &Path, layout: ArchiveLayout) -> Result<EntryCounts> {
    let file = File::create(output).map_err(|e| ReadmePackError::io(output, e))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let mut counts = EntryCounts::default();

    let root = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ReadmePackError::validation(format!(
                "cannot name archive root after {}",
                source.display()
            ))
        })?;
    if layout == ArchiveLayout::SingleRoot {
        zip.add_directory(root.clone(), entry_options(DIR_PERMISSIONS))
            .map_err(ReadmePackError::archive)?;
        counts.dirs += 1;
    }

    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            ReadmePackError::io(path, io::Error::from(e))
        })?;
        let path = entry.path();
        let name = entry_name(&root, source, path)?;

        if entry.file_type().is_dir() {
            debug!(entry = %name, "archiving directory");
            zip.add_directory(name, entry_options(DIR_PERMISSIONS))
                .map_err(ReadmePackError::archive)?;
            counts.dirs += 1;
        } else if entry.file_type().is_file() {
            debug!(entry = %name, "archiving file");
            zip.start_file(name, entry_options(FILE_PERMISSIONS))
                .map_err(ReadmePackError::archive)?;
            let mut input = File::open(path).map_err(|e| ReadmePackError::io(path, e))?;
            io::copy(&mut input, &mut zip).map_err(|e| ReadmePackError::io(path, e))?;
            counts.files += 1;
        }
    }

    let mut writer = zip.finish().map_err(ReadmePackError::archive)?;
    writer.flush().map_err(|e| ReadmePackError::io(output, e))?;

    Ok(counts)
}

fn entry_options(permissions: u32) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(permissions)
}

/// Archive entry name for `path`: relative to `source`, `/`-separated,
/// under `root`.
fn entry_name(root: &str, source: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(source).map_err(|_| {
        ReadmePackError::validation(format!(
            "{} is outside {}",
            path.display(),
            source.display()
        ))
    })?;

    let mut parts = vec![root.to_string()];
    parts.extend(
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    Ok(parts.join("/"))
}

/// Size and hex SHA-256 of a file.
fn digest(path: &Path) -> Result<(u64, String)> {
    let mut file = File::open(path).map_err(|e| ReadmePackError::io(path, e))?;
    let mut hasher = Sha256::new();
    let size = io::copy(&mut file, &mut hasher).map_err(|e| ReadmePackError::io(path, e))?;
    Ok((size, format!("{:x}", hasher.finalize())))
}
