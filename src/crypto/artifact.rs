//! Sealed artifact byte layout
//!
//! ```text
//! offset 0..16   salt
//! offset 16..28  nonce
//! offset 28..    AES-256-GCM ciphertext with appended 16-byte tag
//! ```
//!
//! There are no length prefixes and no version byte; sizes are fixed by the
//! cipher.

use crate::error::{AegisError, AegisResult};

/// Size of the per-file KDF salt in bytes
pub const SALT_SIZE: usize = 16;

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the GCM authentication tag appended to the ciphertext
pub const TAG_SIZE: usize = 16;

/// Smallest byte count that can be split into salt and nonce
pub const HEADER_SIZE: usize = SALT_SIZE + NONCE_SIZE;

/// A decoded artifact borrowing its ciphertext from the input buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedArtifact<'a> {
    pub salt: [u8; SALT_SIZE],
    pub nonce: [u8; NONCE_SIZE],
    pub ciphertext: &'a [u8],
}

impl<'a> SealedArtifact<'a> {
    /// Split raw artifact bytes into salt, nonce and ciphertext
    pub fn decode(bytes: &'a [u8]) -> AegisResult<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(AegisError::MalformedArtifact {
                len: bytes.len(),
                min: HEADER_SIZE,
            });
        }

        let (salt, rest) = bytes.split_at(SALT_SIZE);
        let (nonce, ciphertext) = rest.split_at(NONCE_SIZE);

        let mut artifact = Self {
            salt: [0u8; SALT_SIZE],
            nonce: [0u8; NONCE_SIZE],
            ciphertext,
        };
        artifact.salt.copy_from_slice(salt);
        artifact.nonce.copy_from_slice(nonce);
        Ok(artifact)
    }

    /// Serialize to the on-disk layout
    pub fn encode(&self) -> Vec<u8> {
        encode(&self.salt, &self.nonce, self.ciphertext)
    }
}

/// Concatenate salt, nonce and ciphertext
pub fn encode(salt: &[u8; SALT_SIZE], nonce: &[u8; NONCE_SIZE], ciphertext: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_SIZE + ciphertext.len());
    out.extend_from_slice(salt);
    out.extend_from_slice(nonce);
    out.extend_from_slice(ciphertext);
    out
}
