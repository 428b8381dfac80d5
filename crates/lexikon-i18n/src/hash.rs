//! Opaque message keys
//!
//! The extractor names every source phrase with the first four bytes of its
//! SHA-256 digest, written as eight lowercase hex characters. The same phrase
//! therefore gets the same key in every locale.

use sha2::{Digest, Sha256};

/// Length of an opaque key in characters
pub const KEY_LENGTH: usize = 8;

/// Derive the opaque key for a source phrase
pub fn message_key(source: &str) -> String {
    let digest = Sha256::digest(source.as_bytes());
    digest
        .iter()
        .take(KEY_LENGTH / 2)
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Whether a string has the shape of an opaque key
pub fn is_message_key(candidate: &str) -> bool {
    candidate.len() == KEY_LENGTH
        && candidate
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
