//! Salt source quality checks.
//!
//! Shannon entropy thresholds are set well below the expected value for
//! uniform bytes at each sample size (32 B ~4.9, 1 KiB ~7.8 bits/byte) so
//! they only trip on degenerate output.

use scrypt_params_core::{generate_salt, get_salt};

#[allow(clippy::cast_precision_loss)]
fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut freq = [0u64; 256];
    for &b in data {
        freq[b as usize] = freq[b as usize].saturating_add(1);
    }
    let len = data.len() as f64;
    freq.iter()
        .filter(|&&f| f > 0)
        .map(|&f| {
            let p = f as f64 / len;
            -p * p.log2()
        })
        .sum()
}

#[test]
fn salt_overwrites_zero_buffer() {
    let mut salt = [0u8; 32];
    get_salt(&mut salt).expect("salt source should succeed");
    let entropy = shannon_entropy(&salt);
    assert!(entropy > 4.0, "32-byte salt entropy too low: {entropy:.4}");
}

#[test]
fn large_salt_entropy() {
    let salt = generate_salt(1024).expect("salt source should succeed");
    let entropy = shannon_entropy(&salt);
    assert!(entropy > 7.5, "1 KiB salt entropy too low: {entropy:.4}");
}

#[test]
fn consecutive_salts_differ() {
    let a = generate_salt(32).expect("salt source should succeed");
    let b = generate_salt(32).expect("salt source should succeed");
    assert_ne!(a, b);
}
