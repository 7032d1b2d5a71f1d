//! Cryptographic primitives for cryptorious.
//!
//! This module provides:
//! - AES-256 field encryption and decryption (`encryption`)
//! - The symmetric key file and its in-memory wrapper (`keyfile`)

pub mod encryption;
pub mod keyfile;

pub use encryption::{decrypt, encrypt};
pub use keyfile::{generate_key_file, load_key, SymmetricKey};
