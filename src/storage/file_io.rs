//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure: content
//! is written to a temporary file in the destination directory, synced, and
//! only then moved into place.

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use crate::error::{AegisError, AegisResult};

/// Prefix of in-flight temporary files
pub const TEMP_PREFIX: &str = ".aegis-";

/// Suffix of in-flight temporary files
pub const TEMP_SUFFIX: &str = ".tmp";

/// Whether a file name looks like a temporary file left by an interrupted write
pub fn is_temp_file_name(name: &OsStr) -> bool {
    let bytes = name.as_encoded_bytes();
    bytes.len() >= TEMP_PREFIX.len() + TEMP_SUFFIX.len()
        && bytes.starts_with(TEMP_PREFIX.as_bytes())
        && bytes.ends_with(TEMP_SUFFIX.as_bytes())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn temp_file_for(path: &Path) -> AegisResult<NamedTempFile> {
    let dir = parent_dir(path);

    // Same directory as the target so the final rename never crosses devices
    tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)
        .map_err(|e| AegisError::io_at(dir, format!("Failed to create temp file: {}", e)))
}

/// Write bytes to a new file atomically, refusing to replace an existing one
///
/// Either `path` ends up holding exactly `data`, or it is left untouched; an
/// existing file at `path` yields [`AegisError::OutputExists`]. On Unix the
/// new file is created with mode 0600.
pub fn write_new_atomic(path: &Path, data: &[u8]) -> AegisResult<()> {
    let mut temp = temp_file_for(path)?;

    temp.write_all(data)
        .map_err(|e| AegisError::io_at(temp.path(), format!("Failed to write data: {}", e)))?;

    // Sync to disk before the file becomes visible under its real name
    temp.as_file()
        .sync_all()
        .map_err(|e| AegisError::io_at(temp.path(), format!("Failed to sync data: {}", e)))?;

    // The temp file is removed on drop if persisting fails
    temp.persist_noclobber(path).map_err(|e| {
        if e.error.kind() == ErrorKind::AlreadyExists {
            AegisError::OutputExists(path.to_path_buf())
        } else {
            AegisError::io_at(path, format!("Failed to move file into place: {}", e.error))
        }
    })?;

    Ok(())
}

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> AegisResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| AegisError::io_at(path, format!("Failed to open: {}", e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| AegisError::Json(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename)
///
/// Unlike [`write_new_atomic`] this replaces an existing file.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> AegisResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    // Ensure parent directory exists
    let dir = parent_dir(path);
    fs::create_dir_all(dir)
        .map_err(|e| AegisError::io_at(dir, format!("Failed to create directory: {}", e)))?;

    let temp = temp_file_for(path)?;

    let mut writer = BufWriter::new(temp);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| AegisError::Json(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| AegisError::Io(format!("Failed to flush data: {}", e)))?;

    let temp = writer
        .into_inner()
        .map_err(|e| AegisError::Io(format!("Failed to flush data: {}", e.error())))?;

    temp.as_file()
        .sync_all()
        .map_err(|e| AegisError::Io(format!("Failed to sync data: {}", e)))?;

    temp.persist(path).map_err(|e| {
        AegisError::io_at(path, format!("Failed to rename temp file: {}", e.error))
    })?;

    Ok(())
}
