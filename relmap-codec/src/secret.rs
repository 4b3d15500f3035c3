//! Random secret generation.

use rand::RngCore;

/// Secret length in bytes used when none is configured.
pub const DEFAULT_SECRET_LENGTH: usize = 20;

/// Generates `length` random bytes from the OS RNG.
pub fn random_bytes(length: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; length];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    bytes
}
