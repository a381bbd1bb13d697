//! Extension-tagged plaintext
//!
//! Before encryption a file's bytes are prefixed with its extension and a
//! single NUL separator: `".txt" 0x00 content`. The extension therefore sits
//! inside the authenticated plaintext and cannot be altered without the
//! password.

use zeroize::Zeroizing;

use crate::error::{AegisError, AegisResult};

/// Separator between the extension tag and the file content
pub const SEPARATOR: u8 = 0x00;

/// Build the envelope for a file's content
///
/// The returned buffer is zeroed when dropped.
pub fn build(extension: &[u8], content: &[u8]) -> AegisResult<Zeroizing<Vec<u8>>> {
    if extension.contains(&SEPARATOR) {
        return Err(AegisError::InvalidExtension(
            "extension contains a NUL byte".to_string(),
        ));
    }

    let mut envelope = Zeroizing::new(Vec::with_capacity(extension.len() + 1 + content.len()));
    envelope.extend_from_slice(extension);
    envelope.push(SEPARATOR);
    envelope.extend_from_slice(content);
    Ok(envelope)
}

/// A split view over a decrypted envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split<'a> {
    /// Extension and content separated at the first NUL
    Tagged { extension: &'a [u8], content: &'a [u8] },
    /// No separator found; the whole buffer is content
    Legacy { content: &'a [u8] },
}

impl<'a> Split<'a> {
    /// The file content regardless of format
    pub fn content(&self) -> &'a [u8] {
        match self {
            Split::Tagged { content, .. } | Split::Legacy { content } => *content,
        }
    }

    /// The recovered extension, if the envelope carried one
    pub fn extension(&self) -> Option<&'a [u8]> {
        match self {
            Split::Tagged { extension, .. } => Some(*extension),
            Split::Legacy { .. } => None,
        }
    }
}

/// Split an envelope at the first NUL
///
/// Everything before the first NUL is the extension; everything after it,
/// including any further NUL bytes, is content.
pub fn split(envelope: &[u8]) -> Split<'_> {
    match envelope.iter().position(|&b| b == SEPARATOR) {
        Some(i) => Split::Tagged {
            extension: &envelope[..i],
            content: &envelope[i + 1..],
        },
        None => Split::Legacy { content: envelope },
    }
}
