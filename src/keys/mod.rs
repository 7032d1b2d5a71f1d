//! Key lifecycle: key pair generation and loading, staged installation of
//! new key files, and the re-keying pass used by rotation.

pub mod pair;
pub mod rotation;
pub mod staging;

pub use pair::{generate_key_pair, GeneratedKeys, KeyAlgorithm, KeyPair, PrivateKey, PublicKey};
pub use rotation::rotate;
