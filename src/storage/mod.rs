//! Storage layer for aegis
//!
//! Provides crash-safe file writes: sealed and unsealed outputs are never
//! visible half-written and never replace an existing file.

pub mod file_io;

pub use file_io::{is_temp_file_name, read_json, write_json_atomic, write_new_atomic};
