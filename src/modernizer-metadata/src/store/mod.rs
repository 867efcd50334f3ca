//! Metadata store scanning and record persistence.
//!
//! The store is a directory tree where every plugin owns a
//! `modernization-metadata` folder holding one JSON file per migration run.

mod error;
mod scanned;

pub use error::StoreError;
pub use scanned::ScannedRecord;

use crate::record::{parse_file_timestamp, MigrationRecord};
use serde_json::{Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Name of the directories holding migration records.
pub const METADATA_DIR_NAME: &str = "modernization-metadata";

/// Records collected from a store scan.
#[derive(Debug, Clone, Default)]
pub struct RecordScan {
    /// Successfully loaded records, in scan order.
    pub records: Vec<ScannedRecord>,

    /// Number of metadata directories visited.
    pub metadata_dirs: usize,

    /// Number of files that could not be read or parsed.
    pub skipped: usize,
}

/// Finds every metadata directory below `root`.
///
/// The result is sorted by path so repeated scans visit records in the same
/// order.
///
/// # Errors
///
/// Returns [`StoreError::MissingRoot`] if `root` does not exist.
pub fn find_metadata_dirs(root: &Path) -> Result<Vec<PathBuf>, StoreError> {
    if !root.is_dir() {
        return Err(StoreError::MissingRoot {
            path: root.display().to_string(),
        });
    }

    let mut dirs = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };

        if entry.file_type().is_dir() && entry.file_name() == METADATA_DIR_NAME {
            dirs.push(entry.into_path());
        }
    }

    Ok(dirs)
}

/// Lists the `.json` files of a metadata directory, sorted by name.
///
/// With `recursive` set, nested folders are included as well.
///
/// # Errors
///
/// Returns [`StoreError::WalkError`] if the directory itself cannot be read.
pub fn record_files(metadata_dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, StoreError> {
    let mut walker = WalkDir::new(metadata_dir).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            // The directory itself must be readable; nested failures are skipped.
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable metadata entry");
                continue;
            }
        };

        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Scans `root` and loads every migration record found in metadata directories.
///
/// Unreadable or malformed files are logged and counted in
/// [`RecordScan::skipped`]; they never abort the scan.
///
/// # Errors
///
/// Returns an error if `root` does not exist.
pub fn scan_records(root: &Path) -> Result<RecordScan, StoreError> {
    info!(path = %root.display(), "Scanning metadata store");

    let dirs = find_metadata_dirs(root)?;
    let mut scan = RecordScan {
        metadata_dirs: dirs.len(),
        ..Default::default()
    };

    for dir in &dirs {
        let files = match record_files(dir, false) {
            Ok(files) => files,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "Failed to list metadata directory");
                continue;
            }
        };

        for file in files {
            match load_scanned(dir, &file) {
                Ok(scanned) => scan.records.push(scanned),
                Err(e) => {
                    warn!(path = %file.display(), error = %e, "Skipping unreadable record");
                    scan.skipped += 1;
                }
            }
        }
    }

    info!(
        directories = scan.metadata_dirs,
        records = scan.records.len(),
        skipped = scan.skipped,
        "Scan complete"
    );
    Ok(scan)
}

/// Loads one record and tags it with its plugin and filename timestamp.
fn load_scanned(metadata_dir: &Path, file: &Path) -> Result<ScannedRecord, StoreError> {
    let record = load_record(file)?;

    let file_stem = file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let timestamp = parse_file_timestamp(&file_stem);
    if timestamp.is_none() {
        warn!(path = %file.display(), "Record file name is not a timestamp");
    }

    let plugin_dir = metadata_dir
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let plugin = record
        .plugin_name
        .clone()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| dir_name(&plugin_dir));

    debug!(path = %file.display(), plugin = %plugin, "Loaded record");
    Ok(ScannedRecord {
        record,
        path: file.to_path_buf(),
        plugin,
        plugin_dir,
        file_stem,
        timestamp,
    })
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Reads a single migration record.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid record.
pub fn load_record(path: &Path) -> Result<MigrationRecord, StoreError> {
    let content = std::fs::read_to_string(path).map_err(|e| StoreError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    let json_error = |source| StoreError::JsonError {
        path: path.display().to_string(),
        source,
    };
    let source: Map<String, Value> = serde_json::from_str(&content).map_err(json_error)?;
    MigrationRecord::from_json_map(source).map_err(json_error)
}

/// Writes a migration record, replacing the existing file atomically.
///
/// Keys keep the order of the file the record was loaded from.
///
/// # Errors
///
/// Returns an error if the record cannot be serialized or written.
pub fn save_record(path: &Path, record: &MigrationRecord) -> Result<(), StoreError> {
    let json_error = |source| StoreError::JsonError {
        path: path.display().to_string(),
        source,
    };
    let fields = record.to_json_map().map_err(json_error)?;
    let content = serde_json::to_string_pretty(&fields).map_err(json_error)?;
    write_atomic(path, content.as_bytes())
}

/// Mode of newly created files; temporary files start out owner-only.
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// Writes `content` to a temporary file next to `path`, then renames it over `path`.
///
/// An existing file keeps its permissions.
pub(crate) fn write_atomic(path: &Path, content: &[u8]) -> Result<(), StoreError> {
    let io_error = |source| StoreError::IoError {
        path: path.display().to_string(),
        source,
    };

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(io_error)?;

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(io_error)?;
    file.write_all(content).map_err(io_error)?;
    if let Some(permissions) = target_permissions(path) {
        file.as_file()
            .set_permissions(permissions)
            .map_err(io_error)?;
    }
    file.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}

fn target_permissions(path: &Path) -> Option<std::fs::Permissions> {
    match std::fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        #[cfg(unix)]
        Err(_) => {
            use std::os::unix::fs::PermissionsExt;
            Some(std::fs::Permissions::from_mode(NEW_FILE_MODE))
        }
        #[cfg(not(unix))]
        Err(_) => None,
    }
}
