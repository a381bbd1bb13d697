//! Key derivation using scrypt
//!
//! Derives a 32-byte AES-256 key from a password and a per-file salt using
//! scrypt, a memory-hard key derivation function resistant to GPU/ASIC
//! attacks.
//!
//! The cost parameters are not stored in sealed artifacts. Every artifact is
//! unsealed with [`KdfParams::STANDARD`] (N = 2^15, r = 8, p = 1), so changing
//! those values makes all previously sealed files unreadable.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{AegisError, AegisResult};

use super::artifact::SALT_SIZE;

/// Length of the derived key in bytes (AES-256)
pub const KEY_SIZE: usize = 32;

/// scrypt cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// CPU/memory cost factor as a power of two (N = 2^log_n)
    pub log_n: u8,
    /// Block size
    pub r: u32,
    /// Parallelism
    pub p: u32,
}

impl KdfParams {
    /// Parameters every artifact is sealed and unsealed with
    pub const STANDARD: KdfParams = KdfParams {
        log_n: 15, // 32 MiB with r = 8
        r: 8,
        p: 1,
    };

    /// Create params with specific values
    ///
    /// Artifacts sealed with anything other than [`KdfParams::STANDARD`] can
    /// only be unsealed by an engine configured with the same values.
    pub fn with_values(log_n: u8, r: u32, p: u32) -> Self {
        Self { log_n, r, p }
    }

    fn to_scrypt(self) -> AegisResult<scrypt::Params> {
        scrypt::Params::new(self.log_n, self.r, self.p, KEY_SIZE)
            .map_err(|e| AegisError::KeyDerivation(format!("Invalid scrypt parameters: {}", e)))
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// A derived encryption key, zeroed on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_SIZE],
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive an encryption key from a password and salt
pub fn derive_key(
    password: &[u8],
    salt: &[u8; SALT_SIZE],
    params: &KdfParams,
) -> AegisResult<DerivedKey> {
    let scrypt_params = params.to_scrypt()?;

    let mut key = DerivedKey {
        key: [0u8; KEY_SIZE],
    };
    scrypt::scrypt(password, salt, &scrypt_params, &mut key.key)
        .map_err(|e| AegisError::KeyDerivation(e.to_string()))?;

    Ok(key)
}
