//! AES-256-GCM file sealing
//!
//! Seals a file's bytes and extension into an artifact and back. Every call
//! to [`seal`] draws a fresh salt and nonce, so sealing the same file twice
//! never reuses either.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use zeroize::Zeroizing;

use crate::error::{AegisError, AegisResult};

use super::artifact::{self, SealedArtifact, NONCE_SIZE, SALT_SIZE};
use super::envelope;
use super::key_derivation::{derive_key, DerivedKey, KdfParams};

/// Plaintext recovered from an artifact
#[derive(Debug)]
pub struct Unsealed {
    /// File content, zeroed on drop
    pub content: Zeroizing<Vec<u8>>,
    /// Recovered extension tag (e.g. `.txt`, possibly empty), or `None` for a
    /// legacy artifact that carried no extension
    pub extension: Option<Vec<u8>>,
}

impl Unsealed {
    /// Whether the artifact predates extension embedding
    pub fn is_legacy(&self) -> bool {
        self.extension.is_none()
    }
}

fn cipher_for(key: &DerivedKey) -> AegisResult<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| AegisError::Encryption(format!("Failed to create cipher: {}", e)))
}

/// Seal file content and its extension under a password
pub fn seal(
    content: &[u8],
    extension: &[u8],
    password: &[u8],
    params: &KdfParams,
) -> AegisResult<Vec<u8>> {
    let envelope = envelope::build(extension, content)?;

    // Fresh salt and nonce for every artifact
    let mut salt = [0u8; SALT_SIZE];
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut nonce_bytes);

    let key = derive_key(password, &salt, params)?;
    let cipher = cipher_for(&key)?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), envelope.as_slice())
        .map_err(|e| AegisError::Encryption(format!("Encryption failed: {}", e)))?;

    Ok(artifact::encode(&salt, &nonce_bytes, &ciphertext))
}

/// Unseal an artifact with a password
///
/// A wrong password and a corrupted artifact both surface as
/// [`AegisError::AuthenticationFailed`]. Input too short to hold a salt and
/// nonce fails with [`AegisError::MalformedArtifact`] before any key
/// derivation.
pub fn unseal(bytes: &[u8], password: &[u8], params: &KdfParams) -> AegisResult<Unsealed> {
    let sealed = SealedArtifact::decode(bytes)?;

    let key = derive_key(password, &sealed.salt, params)?;
    let cipher = cipher_for(&key)?;

    let plaintext = Zeroizing::new(
        cipher
            .decrypt(Nonce::from_slice(&sealed.nonce), sealed.ciphertext)
            .map_err(|_| AegisError::AuthenticationFailed)?,
    );

    if let envelope::Split::Tagged { extension, content } = envelope::split(&plaintext) {
        return Ok(Unsealed {
            content: Zeroizing::new(content.to_vec()),
            extension: Some(extension.to_vec()),
        });
    }

    Ok(Unsealed {
        content: plaintext,
        extension: None,
    })
}
