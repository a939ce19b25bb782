//! Random identifier generation.

use std::fmt::Write;

use rand::RngCore;
use rand::rngs::OsRng;

/// Generate a lower-case hex identifier from `bytes` random bytes.
///
/// Used for locally assigned app identifiers when the configuration does not
/// supply one; 16 bytes yields the 32-character form the remote API expects.
pub fn random_hex_id(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buffer);

    buffer.iter().fold(String::with_capacity(bytes * 2), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    })
}
