//! Invite token generation for parties.
//!
//! Tokens are 32-character strings drawn from a mixed-case
//! alphanumeric-plus-symbol alphabet. Uniqueness is NOT guaranteed here:
//! callers insert and retry on the unique constraint.

use rand::distributions::Uniform;
use rand::prelude::*;
use rand::rngs::OsRng;

const ALPHABET: &[u8] = b"abcdefghijklmnoprstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789+-_$";

/// Fixed token length, shared with the column width checks in tests.
pub const TOKEN_LEN: usize = 32;

/// Generate a random invite token using the OS's cryptographically secure RNG.
pub fn generate() -> String {
    let mut rng = OsRng;
    let dist = Uniform::from(0..ALPHABET.len());

    let mut s = String::with_capacity(TOKEN_LEN);
    for _ in 0..TOKEN_LEN {
        s.push(ALPHABET[dist.sample(&mut rng)] as char);
    }
    s
}
