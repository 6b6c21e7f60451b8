//! Seed parsing: `0x`-prefixed hex, 1-64 digits, folded to 32 bits by
//! XOR of 32-bit words ("hash-the-hash", spec §6).

use crate::error::EngineError;

pub fn parse_seed_hex(input: &str) -> Result<u32, EngineError> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .ok_or_else(|| EngineError::InvalidSeed(format!("missing 0x prefix: {input}")))?;

    if digits.is_empty() || digits.len() > 64 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EngineError::InvalidSeed(input.to_string()));
    }

    Ok(fold_hash_the_hash_hex(digits))
}

/// Folds an arbitrary-length hex digit string into a 32-bit seed by
/// XOR-ing its 32-bit little-endian words. A bare 8-digit (or shorter)
/// input folds to itself.
pub fn fold_hash_the_hash_hex(digits: &str) -> u32 {
    // Pad on the left so the digit count is a multiple of 8 (one u32 per group).
    let pad = (8 - digits.len() % 8) % 8;
    let padded: String = std::iter::repeat('0').take(pad).chain(digits.chars()).collect();

    let mut acc: u32 = 0;
    for chunk in padded.as_bytes().chunks(8) {
        let word_str = std::str::from_utf8(chunk).expect("hex digits are ascii");
        let word = u32::from_str_radix(word_str, 16).expect("validated hex digits");
        acc ^= word;
    }
    acc
}
