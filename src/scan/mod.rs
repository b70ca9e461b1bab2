//! Account scan driver
//!
//! Pulls raw program accounts from an [`AccountSource`], decodes each buffer
//! and keeps going when one of them is malformed.

pub mod rpc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::xyber::accounts::XyberAccount;

pub use rpc::RpcAccountSource;

/// One account as fetched, before decoding
#[derive(Debug, Clone)]
pub struct RawAccount {
    pub pubkey: Pubkey,
    pub data: Vec<u8>,
}

/// One successfully decoded account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAccount {
    pub pubkey: Pubkey,
    pub data_len: usize,
    pub account: XyberAccount,
}

/// Account that could not be decoded
#[derive(Debug)]
pub struct SkippedAccount {
    pub pubkey: Pubkey,
    pub error: Error,
}

/// Anything that can hand out raw program accounts
#[async_trait]
pub trait AccountSource: Send + Sync {
    /// Every account owned by `program_id`
    async fn program_accounts(&self, program_id: &Pubkey) -> Result<Vec<RawAccount>>;

    /// A single account's data
    async fn account(&self, pubkey: &Pubkey) -> Result<RawAccount>;
}

/// Outcome of one scan
#[derive(Debug)]
pub struct ScanResult {
    pub program_id: Pubkey,
    pub scanned_at: DateTime<Utc>,
    pub decoded: Vec<DecodedAccount>,
    pub skipped: Vec<SkippedAccount>,
}

impl ScanResult {
    /// Accounts returned by the source
    pub fn total(&self) -> usize {
        self.decoded.len() + self.skipped.len()
    }
}

/// Decode one raw account
pub fn decode_raw(raw: &RawAccount) -> Result<DecodedAccount> {
    let account = XyberAccount::decode(&raw.data)?;
    Ok(DecodedAccount {
        pubkey: raw.pubkey,
        data_len: raw.data.len(),
        account,
    })
}

/// Decode a batch; malformed accounts are logged and collected, not fatal
pub fn decode_batch(accounts: Vec<RawAccount>) -> (Vec<DecodedAccount>, Vec<SkippedAccount>) {
    let mut decoded = Vec::with_capacity(accounts.len());
    let mut skipped = Vec::new();

    for raw in accounts {
        match decode_raw(&raw) {
            Ok(account) => {
                debug!(
                    "Decoded {} account {} ({} bytes)",
                    account.account.kind(),
                    raw.pubkey,
                    raw.data.len()
                );
                decoded.push(account);
            }
            Err(e) => {
                if e.is_decode_failure() {
                    warn!("Skipping account {}: {}", raw.pubkey, e);
                } else {
                    error!("Unexpected error decoding account {}: {}", raw.pubkey, e);
                }
                skipped.push(SkippedAccount {
                    pubkey: raw.pubkey,
                    error: e,
                });
            }
        }
    }

    (decoded, skipped)
}

/// Scan every account of `program_id`
pub async fn scan_program<S: AccountSource + ?Sized>(
    source: &S,
    program_id: &Pubkey,
) -> Result<ScanResult> {
    let scanned_at = Utc::now();
    let accounts = source.program_accounts(program_id).await?;
    info!("Fetched {} accounts for program {}", accounts.len(), program_id);

    let (decoded, skipped) = decode_batch(accounts);
    if !skipped.is_empty() {
        warn!("{} accounts could not be decoded", skipped.len());
    }

    Ok(ScanResult {
        program_id: *program_id,
        scanned_at,
        decoded,
        skipped,
    })
}

/// Fetch and decode a single account
pub async fn fetch_decoded<S: AccountSource + ?Sized>(
    source: &S,
    pubkey: &Pubkey,
) -> Result<DecodedAccount> {
    let raw = source.account(pubkey).await?;
    decode_raw(&raw)
}


#[cfg(test)]
mod tests {
    use super::memory::MemorySource;
    use super::*;
    use crate::xyber::accounts::test_data::{curve_config_data, pool_state_data, CurveConfigFields};

    fn fixture() -> (Pubkey, Vec<RawAccount>) {
        let program_id = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let accounts = vec![
            RawAccount {
                pubkey: Pubkey::new_unique(),
                data: curve_config_data(&CurveConfigFields::default()),
            },
            RawAccount {
                pubkey: Pubkey::new_unique(),
                data: pool_state_data(1, &mint, &Pubkey::new_unique(), &Pubkey::new_unique(), 150),
            },
            RawAccount {
                pubkey: Pubkey::new_unique(),
                data: vec![0u8; 40],
            },
        ];
        (program_id, accounts)
    }

    #[tokio::test]
    async fn test_scan_skips_malformed() {
        let (program_id, accounts) = fixture();
        let bad_key = accounts[2].pubkey;
        let source = MemorySource::with_program(program_id, accounts);

        let result = scan_program(&source, &program_id).await.unwrap();
        assert_eq!(result.total(), 3);
        assert_eq!(result.decoded.len(), 2);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].pubkey, bad_key);
        assert!(matches!(
            result.skipped[0].error,
            Error::MalformedRecord { actual: 40, .. }
        ));

        assert_eq!(result.decoded[0].account.kind(), "XyberCore");
        assert_eq!(result.decoded[1].account.kind(), "PoolState");
        assert_eq!(result.decoded[1].data_len, 150);
    }

    #[tokio::test]
    async fn test_scan_unknown_program_is_empty() {
        let (program_id, accounts) = fixture();
        let source = MemorySource::with_program(program_id, accounts);

        let result = scan_program(&source, &Pubkey::new_unique()).await.unwrap();
        assert_eq!(result.total(), 0);
    }

    #[tokio::test]
    async fn test_fetch_decoded() {
        let (program_id, accounts) = fixture();
        let key = accounts[0].pubkey;
        let source = MemorySource::with_program(program_id, accounts);

        let decoded = fetch_decoded(&source, &key).await.unwrap();
        assert!(decoded.account.as_curve_config().is_some());

        let missing = fetch_decoded(&source, &Pubkey::new_unique()).await;
        assert!(matches!(missing, Err(Error::AccountNotFound(_))));
    }
}
