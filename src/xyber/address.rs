//! Base-58 text form of 32-byte public keys
//!
//! Pure helpers, usable without going through `Pubkey`'s Display impl.

use crate::error::{Error, Result};

/// Length of a raw public key
pub const PUBKEY_BYTES: usize = 32;

/// Encode raw key bytes as base-58 text
pub fn encode_pubkey(bytes: &[u8; PUBKEY_BYTES]) -> String {
    bs58::encode(bytes).into_string()
}

/// Decode base-58 text back into raw key bytes
pub fn decode_pubkey(text: &str) -> Result<[u8; PUBKEY_BYTES]> {
    let decoded = bs58::decode(text.trim())
        .into_vec()
        .map_err(|e| Error::InvalidPubkey(format!("{}: {}", text, e)))?;

    decoded.try_into().map_err(|v: Vec<u8>| {
        Error::InvalidPubkey(format!(
            "{}: expected {} bytes, got {}",
            text,
            PUBKEY_BYTES,
            v.len()
        ))
    })
}
