//! Output file names
//!
//! Sealing `dir/notes.txt` produces `dir/notes.aegis` and embeds `.txt` in the
//! artifact; unsealing reverses it. Outputs always land in the same directory
//! as their source.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::error::{AegisError, AegisResult};
use crate::traversal::{has_artifact_suffix, ARTIFACT_SUFFIX};

/// Where a sealed file goes and which extension tag it carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealTarget {
    pub output: PathBuf,
    /// `.` followed by the source's final extension, or empty
    pub extension: Vec<u8>,
}

#[cfg(unix)]
fn os_from_bytes(bytes: &[u8]) -> Option<OsString> {
    use std::os::unix::ffi::OsStrExt;
    Some(OsStr::from_bytes(bytes).to_os_string())
}

#[cfg(not(unix))]
fn os_from_bytes(bytes: &[u8]) -> Option<OsString> {
    std::str::from_utf8(bytes).ok().map(OsString::from)
}

fn file_name(path: &Path) -> AegisResult<&OsStr> {
    path.file_name()
        .ok_or_else(|| AegisError::Io(format!("{}: path has no file name", path.display())))
}

/// Compute the artifact path and extension tag for a source file
///
/// Only the final extension is split off: `archive.tar.gz` becomes
/// `archive.tar.aegis` carrying `.gz`. Dotfiles such as `.bashrc` have no
/// extension and become `.bashrc.aegis`.
pub fn seal_target(source: &Path) -> AegisResult<SealTarget> {
    let name = file_name(source)?;
    let stem = Path::new(name).file_stem().unwrap_or(name);

    let extension = match Path::new(name).extension() {
        Some(ext) => {
            let mut tag = Vec::with_capacity(ext.len() + 1);
            tag.push(b'.');
            tag.extend_from_slice(ext.as_encoded_bytes());
            tag
        }
        None => Vec::new(),
    };

    let mut output_name = stem.to_os_string();
    output_name.push(ARTIFACT_SUFFIX);

    Ok(SealTarget {
        output: source.with_file_name(output_name),
        extension,
    })
}

fn validate_extension(extension: &[u8]) -> AegisResult<()> {
    if extension.is_empty() {
        return Ok(());
    }
    if extension[0] != b'.' {
        return Err(AegisError::InvalidExtension(
            "recovered extension does not start with '.'".to_string(),
        ));
    }
    if extension.iter().any(|&b| matches!(b, b'/' | b'\\' | 0)) {
        return Err(AegisError::InvalidExtension(
            "recovered extension contains a path separator".to_string(),
        ));
    }
    Ok(())
}

/// Compute the restored path for an artifact
///
/// `extension` is the tag recovered from the artifact, or `None` for a legacy
/// artifact, in which case the suffix is simply dropped. The result never
/// leaves the artifact's directory.
pub fn unseal_output(artifact: &Path, extension: Option<&[u8]>) -> AegisResult<PathBuf> {
    let name = file_name(artifact)?;
    if !has_artifact_suffix(name) {
        return Err(AegisError::InvalidExtension(format!(
            "{} does not end in {}",
            artifact.display(),
            ARTIFACT_SUFFIX
        )));
    }

    let extension = extension.unwrap_or_default();
    validate_extension(extension)?;

    let name_bytes = name.as_encoded_bytes();
    let mut restored = name_bytes[..name_bytes.len() - ARTIFACT_SUFFIX.len()].to_vec();
    restored.extend_from_slice(extension);

    if matches!(restored.as_slice(), b"" | b"." | b"..") {
        return Err(AegisError::InvalidExtension(format!(
            "{} would restore to an unusable file name",
            artifact.display()
        )));
    }

    let restored = os_from_bytes(&restored).ok_or_else(|| {
        AegisError::InvalidExtension("restored file name is not valid on this platform".into())
    })?;

    Ok(artifact.with_file_name(restored))
}
