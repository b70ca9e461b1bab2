//! Xyber program constants and account layout sizes
//!
//! # WARNING: These constants may change without notice
//! The program has no versioned account layouts. If it ever adds an account
//! type whose size collides with one of the sizes below, decoding will
//! silently pick the wrong layout.

use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

/// Default Xyber bonding-curve program ID (devnet deployment)
pub const XYBER_PROGRAM_ID_STR: &str = "HL1jyNFAJa8EhuuqpZJfLLTsXsfk1yCGMX8XpGssrxQQ";

lazy_static::lazy_static! {
    /// Xyber program ID as Pubkey
    pub static ref XYBER_PROGRAM_ID: Pubkey =
        Pubkey::from_str(XYBER_PROGRAM_ID_STR).expect("Invalid xyber program ID");
}

/// Account sizes (total account data length, discriminator included)
#[allow(non_snake_case)]
pub mod ACCOUNT_SIZES {
    /// XyberCore configuration account. Exact size, used as the layout tag.
    pub const CURVE_CONFIG: usize = 118;

    /// Minimum size of a pool state account. Real accounts are usually longer.
    pub const POOL_STATE_MIN: usize = 105;
}

/// Byte offsets inside the XyberCore account
#[allow(non_snake_case)]
pub mod CURVE_CONFIG_OFFSETS {
    pub const DISCRIMINATOR: usize = 0;
    pub const ADMIN: usize = 8;
    pub const GRAD_THRESHOLD: usize = 40;
    pub const A_TOTAL_TOKENS: usize = 42;
    pub const K_VIRTUAL_POOL_OFFSET: usize = 50;
    pub const C_BONDING_SCALE_FACTOR: usize = 66;
    pub const X_TOTAL_BASE_DEPOSIT: usize = 74;
    pub const ACCEPTED_BASE_MINT: usize = 82;
    pub const GRADUATE_DOLLARS_AMOUNT: usize = 114;
    pub const END: usize = 118;
}

/// Byte offsets inside a pool state account
#[allow(non_snake_case)]
pub mod POOL_STATE_OFFSETS {
    pub const DISCRIMINATOR: usize = 0;
    pub const IS_GRADUATED: usize = 8;
    pub const MINT: usize = 9;
    pub const VAULT: usize = 41;
    pub const CREATOR: usize = 73;
    pub const END: usize = 105;
}

/// Placeholder mint written by the program before a real mint is attached.
/// All-zero key, rendered as `11111111111111111111111111111111`.
pub const NATIVE_PLACEHOLDER_MINT: Pubkey = Pubkey::new_from_array([0u8; 32]);

/// Check if a key is the native placeholder (byte comparison, not text)
pub fn is_native_placeholder(key: &Pubkey) -> bool {
    *key == NATIVE_PLACEHOLDER_MINT
}

/// Lamports per SOL, the base unit of `x` and `C` on chain
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
