//! Cryptographic core for aegis
//!
//! Provides AES-256-GCM sealing with scrypt key derivation, the sealed
//! artifact byte layout, and the extension-tagged plaintext envelope.

pub mod artifact;
pub mod cipher;
pub mod envelope;
pub mod key_derivation;
pub mod secure_memory;

pub use artifact::{SealedArtifact, HEADER_SIZE, NONCE_SIZE, SALT_SIZE};
pub use cipher::{seal, unseal, Unsealed};
pub use key_derivation::{derive_key, DerivedKey, KdfParams};
pub use secure_memory::Password;
