//! Xyber account structures
//!
//! # WARNING: These structures may change without notice
//! The program does not tag its accounts with a layout version. The total
//! data length is the only thing used to tell the two layouts apart.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::pubkey::Pubkey;

use super::curve::SmoothBondingCurve;
use super::program::{ACCOUNT_SIZES, POOL_STATE_OFFSETS};
use crate::error::{Error, Result};

/// XyberCore account - global curve configuration
///
/// 118 bytes, Borsh packed (little-endian, no padding):
/// discriminator, admin, grad_threshold, bonding curve (40 bytes),
/// accepted_base_mint, graduate_dollars_amount.
#[derive(Debug, Clone, PartialEq, Eq, BorshDeserialize, BorshSerialize)]
pub struct CurveConfigRecord {
    /// Account discriminator (first 8 bytes), not interpreted
    pub discriminator: [u8; 8],

    /// Administrator of the configuration
    pub admin: Pubkey,

    /// Graduation threshold count
    pub grad_threshold: u16,

    /// Curve parameters and the running base deposit
    pub bonding_curve: SmoothBondingCurve,

    /// Mint of the asset accepted as deposit
    pub accepted_base_mint: Pubkey,

    /// Dollar-denominated graduation target
    pub graduate_dollars_amount: u32,
}

impl CurveConfigRecord {
    pub const LEN: usize = ACCOUNT_SIZES::CURVE_CONFIG;

    /// Deserialize from account data. Bytes past `LEN` are ignored.
    pub fn from_account_data(data: &[u8]) -> Result<Self> {
        ensure_len(data, Self::LEN, "curve config")?;

        let mut slice = &data[..Self::LEN];
        <Self as BorshDeserialize>::deserialize(&mut slice)
            .map_err(|e| Error::InvalidEncoding(format!("Borsh decode failed: {}", e)))
    }
}

/// Per-token pool state account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStateRecord {
    /// Account discriminator (first 8 bytes), not interpreted
    pub discriminator: [u8; 8],

    /// Any non-zero byte means graduated
    pub is_graduated: bool,

    /// Token mint of the pool
    pub mint: Pubkey,

    /// Custody vault
    pub vault: Pubkey,

    /// Pool creator
    pub creator: Pubkey,
}

impl PoolStateRecord {
    pub const MIN_LEN: usize = ACCOUNT_SIZES::POOL_STATE_MIN;

    /// Read the fixed fields by offset; trailing bytes are ignored.
    ///
    /// Not Borsh: Borsh only accepts 0 or 1 for a bool, while the flag here
    /// is any non-zero byte.
    pub fn from_account_data(data: &[u8]) -> Result<Self> {
        ensure_len(data, Self::MIN_LEN, "pool state")?;

        Ok(Self {
            discriminator: read_array(data, POOL_STATE_OFFSETS::DISCRIMINATOR),
            is_graduated: data[POOL_STATE_OFFSETS::IS_GRADUATED] != 0,
            mint: read_pubkey(data, POOL_STATE_OFFSETS::MINT),
            vault: read_pubkey(data, POOL_STATE_OFFSETS::VAULT),
            creator: read_pubkey(data, POOL_STATE_OFFSETS::CREATOR),
        })
    }
}

/// A decoded Xyber account, one variant per known layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XyberAccount {
    CurveConfig(CurveConfigRecord),
    PoolState(PoolStateRecord),
}

impl XyberAccount {
    /// Decode raw account data, picking the layout by length alone
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() == CurveConfigRecord::LEN {
            CurveConfigRecord::from_account_data(data).map(XyberAccount::CurveConfig)
        } else {
            PoolStateRecord::from_account_data(data).map(XyberAccount::PoolState)
        }
    }

    /// Short label for logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            XyberAccount::CurveConfig(_) => "XyberCore",
            XyberAccount::PoolState(_) => "PoolState",
        }
    }

    pub fn discriminator(&self) -> &[u8; 8] {
        match self {
            XyberAccount::CurveConfig(r) => &r.discriminator,
            XyberAccount::PoolState(r) => &r.discriminator,
        }
    }

    pub fn as_curve_config(&self) -> Option<&CurveConfigRecord> {
        match self {
            XyberAccount::CurveConfig(r) => Some(r),
            XyberAccount::PoolState(_) => None,
        }
    }

    pub fn as_pool_state(&self) -> Option<&PoolStateRecord> {
        match self {
            XyberAccount::PoolState(r) => Some(r),
            XyberAccount::CurveConfig(_) => None,
        }
    }
}

/// Decode raw account data (see [`XyberAccount::decode`])
pub fn decode(data: &[u8]) -> Result<XyberAccount> {
    XyberAccount::decode(data)
}

fn ensure_len(data: &[u8], required: usize, layout: &'static str) -> Result<()> {
    if data.len() < required {
        return Err(Error::MalformedRecord {
            layout,
            required,
            actual: data.len(),
        });
    }
    Ok(())
}

// Callers check the length first
fn read_array<const N: usize>(data: &[u8], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&data[offset..offset + N]);
    out
}

fn read_pubkey(data: &[u8], offset: usize) -> Pubkey {
    Pubkey::new_from_array(read_array(data, offset))
}

/// Raw account buffers laid out by hand, offset by offset
#[cfg(test)]
pub(crate) mod test_data {
    use super::super::program::CURVE_CONFIG_OFFSETS as C;
    use super::super::program::POOL_STATE_OFFSETS as P;
    use solana_sdk::pubkey::Pubkey;

    pub struct CurveConfigFields {
        pub discriminator: [u8; 8],
        pub admin: Pubkey,
        pub grad_threshold: u16,
        pub a_total_tokens: u64,
        pub k_virtual_pool_offset: u128,
        pub c_bonding_scale_factor: u64,
        pub x_total_base_deposit: u64,
        pub accepted_base_mint: Pubkey,
        pub graduate_dollars_amount: u32,
    }

    impl Default for CurveConfigFields {
        fn default() -> Self {
            Self {
                discriminator: [1, 2, 3, 4, 5, 6, 7, 8],
                admin: Pubkey::new_from_array([0xAA; 32]),
                grad_threshold: 0x1234,
                a_total_tokens: 1_073_000_191,
                k_virtual_pool_offset: 32_190_005_730 * 1_000_000_000,
                c_bonding_scale_factor: 30 * 1_000_000_000,
                x_total_base_deposit: 0,
                accepted_base_mint: Pubkey::new_from_array([0xBB; 32]),
                graduate_dollars_amount: 70_000,
            }
        }
    }

    pub fn curve_config_data(f: &CurveConfigFields) -> Vec<u8> {
        let mut data = vec![0u8; C::END];
        data[C::DISCRIMINATOR..C::ADMIN].copy_from_slice(&f.discriminator);
        data[C::ADMIN..C::GRAD_THRESHOLD].copy_from_slice(f.admin.as_ref());
        data[C::GRAD_THRESHOLD..C::A_TOTAL_TOKENS].copy_from_slice(&f.grad_threshold.to_le_bytes());
        data[C::A_TOTAL_TOKENS..C::K_VIRTUAL_POOL_OFFSET]
            .copy_from_slice(&f.a_total_tokens.to_le_bytes());
        data[C::K_VIRTUAL_POOL_OFFSET..C::C_BONDING_SCALE_FACTOR]
            .copy_from_slice(&f.k_virtual_pool_offset.to_le_bytes());
        data[C::C_BONDING_SCALE_FACTOR..C::X_TOTAL_BASE_DEPOSIT]
            .copy_from_slice(&f.c_bonding_scale_factor.to_le_bytes());
        data[C::X_TOTAL_BASE_DEPOSIT..C::ACCEPTED_BASE_MINT]
            .copy_from_slice(&f.x_total_base_deposit.to_le_bytes());
        data[C::ACCEPTED_BASE_MINT..C::GRADUATE_DOLLARS_AMOUNT]
            .copy_from_slice(f.accepted_base_mint.as_ref());
        data[C::GRADUATE_DOLLARS_AMOUNT..C::END]
            .copy_from_slice(&f.graduate_dollars_amount.to_le_bytes());
        data
    }

    /// Pool state buffer of `len` bytes (trailing bytes filled with 0xEE)
    pub fn pool_state_data(
        graduated_byte: u8,
        mint: &Pubkey,
        vault: &Pubkey,
        creator: &Pubkey,
        len: usize,
    ) -> Vec<u8> {
        let mut data = vec![0xEEu8; len.max(P::END)];
        data[P::DISCRIMINATOR..P::IS_GRADUATED].copy_from_slice(&[9, 9, 9, 9, 8, 8, 8, 8]);
        data[P::IS_GRADUATED] = graduated_byte;
        data[P::MINT..P::VAULT].copy_from_slice(mint.as_ref());
        data[P::VAULT..P::CREATOR].copy_from_slice(vault.as_ref());
        data[P::CREATOR..P::END].copy_from_slice(creator.as_ref());
        data.truncate(len);
        data
    }
}
