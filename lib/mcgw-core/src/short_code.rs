//! Deterministic short codes for DNS-safe identifiers

use num_bigint::BigUint;
use sha2::{Digest, Sha224};

/// Length of the short codes used for gateway and cluster gateway names
pub const SHORT_CODE_LEN: usize = 7;

/// Hash `s` with SHA-224 and encode the full digest in lowercase base-36.
///
/// Each leading zero byte of the digest contributes a leading `'0'`.
pub fn to_base36_hash(s: &str) -> String {
    let digest = Sha224::digest(s.as_bytes());

    let leading_zeros = digest.iter().take_while(|b| **b == 0).count();
    let mut encoded = "0".repeat(leading_zeros);

    let value = BigUint::from_bytes_be(&digest);
    if value.bits() > 0 {
        encoded.push_str(&value.to_str_radix(36));
    }
    encoded.to_lowercase()
}

/// The first `len` characters of [`to_base36_hash`], or all of it if shorter
pub fn to_base36_hash_len(s: &str, len: usize) -> String {
    let mut hash = to_base36_hash(s);
    hash.truncate(len);
    hash
}
