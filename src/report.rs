//! Text and JSON rendering of decoded accounts

use serde_json::{json, Value};
use solana_sdk::pubkey::Pubkey;

use crate::scan::{DecodedAccount, ScanResult};
use crate::xyber::accounts::{CurveConfigRecord, PoolStateRecord, XyberAccount};
use crate::xyber::address::encode_pubkey;
use crate::xyber::program::is_native_placeholder;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Whether an account belongs in the report
///
/// Pool states still pointing at the all-zero placeholder mint are dropped
/// when `skip_placeholder` is set. The check is on the raw key bytes.
pub fn should_display(account: &DecodedAccount, skip_placeholder: bool) -> bool {
    match &account.account {
        XyberAccount::PoolState(pool) => !(skip_placeholder && is_native_placeholder(&pool.mint)),
        XyberAccount::CurveConfig(_) => true,
    }
}

/// Label for a buffer that did not come from a fetched account
pub const INPUT_LABEL: &str = "<input>";

fn key_text(key: &Pubkey) -> String {
    encode_pubkey(&key.to_bytes())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Labeled dump of every field, in layout order
pub fn render_text(account: &DecodedAccount) -> String {
    text_with_label(&key_text(&account.pubkey), account)
}

/// Same as [`render_text`] for a buffer given directly, with no address
pub fn render_input_text(account: &DecodedAccount) -> String {
    text_with_label(INPUT_LABEL, account)
}

fn text_with_label(label: &str, account: &DecodedAccount) -> String {
    match &account.account {
        XyberAccount::CurveConfig(record) => render_curve_config(label, record),
        XyberAccount::PoolState(record) => render_pool_state(label, account.data_len, record),
    }
}

fn render_curve_config(label: &str, record: &CurveConfigRecord) -> String {
    let curve = &record.bonding_curve;
    let minted = match curve.minted_now() {
        Ok(minted) => minted.to_string(),
        Err(e) => format!("n/a ({})", e),
    };

    format!(
        r#"=== XyberCore ({} bytes) Account: {} ===
  discriminator:           {}
  admin:                   {}
  grad_threshold:          {}
  -- bonding_curve --
    a_total_tokens:          {}
    k_virtual_pool_offset:   {}
    c_bonding_scale_factor:  {}
    x_total_base_deposit:    {}
  accepted_base_mint:      {}
  graduate_dollars_amount: {}
  minted_at_deposit:       {}
"#,
        CurveConfigRecord::LEN,
        label,
        hex(&record.discriminator),
        key_text(&record.admin),
        record.grad_threshold,
        curve.a_total_tokens,
        curve.k_virtual_pool_offset,
        curve.c_bonding_scale_factor,
        curve.x_total_base_deposit,
        key_text(&record.accepted_base_mint),
        record.graduate_dollars_amount,
        minted,
    )
}

fn render_pool_state(label: &str, data_len: usize, record: &PoolStateRecord) -> String {
    format!(
        r#"--- PoolState Account: {} ---
  discriminator: {}
  is_graduated:  {}
  mint:          {}
  vault:         {}
  creator:       {}
  raw_data_len:  {}
"#,
        label,
        hex(&record.discriminator),
        record.is_graduated,
        key_text(&record.mint),
        key_text(&record.vault),
        key_text(&record.creator),
        data_len,
    )
}

/// JSON form; 64/128-bit integers are strings so no reader rounds them
pub fn render_json(account: &DecodedAccount) -> Value {
    json_with_key(Some(key_text(&account.pubkey)), account)
}

/// Same as [`render_json`] for a buffer given directly; `pubkey` is null
pub fn render_input_json(account: &DecodedAccount) -> Value {
    json_with_key(None, account)
}

fn json_with_key(pubkey: Option<String>, account: &DecodedAccount) -> Value {
    match &account.account {
        XyberAccount::CurveConfig(record) => {
            let curve = &record.bonding_curve;
            json!({
                "type": "XyberCore",
                "pubkey": pubkey,
                "data_len": account.data_len,
                "discriminator": hex(&record.discriminator),
                "admin": key_text(&record.admin),
                "grad_threshold": record.grad_threshold,
                "bonding_curve": {
                    "a_total_tokens": curve.a_total_tokens.to_string(),
                    "k_virtual_pool_offset": curve.k_virtual_pool_offset.to_string(),
                    "c_bonding_scale_factor": curve.c_bonding_scale_factor.to_string(),
                    "x_total_base_deposit": curve.x_total_base_deposit.to_string(),
                },
                "accepted_base_mint": key_text(&record.accepted_base_mint),
                "graduate_dollars_amount": record.graduate_dollars_amount,
            })
        }
        XyberAccount::PoolState(record) => json!({
            "type": "PoolState",
            "pubkey": pubkey,
            "data_len": account.data_len,
            "discriminator": hex(&record.discriminator),
            "is_graduated": record.is_graduated,
            "mint": key_text(&record.mint),
            "vault": key_text(&record.vault),
            "creator": key_text(&record.creator),
        }),
    }
}

/// Render a whole scan
pub fn render_scan(result: &ScanResult, format: ReportFormat, skip_placeholder: bool) -> String {
    let shown: Vec<&DecodedAccount> = result
        .decoded
        .iter()
        .filter(|a| should_display(a, skip_placeholder))
        .collect();
    let filtered = result.decoded.len() - shown.len();

    match format {
        ReportFormat::Text => {
            let mut out = format!(
                "Program ID: {}\nScanned at: {}\nTotal Program Accounts: {}\n\n",
                key_text(&result.program_id),
                result.scanned_at.to_rfc3339(),
                result.total()
            );
            for account in &shown {
                out.push_str(&render_text(account));
                out.push('\n');
            }
            for skipped in &result.skipped {
                out.push_str(&format!(
                    "!!! Skipped {}: {}\n",
                    key_text(&skipped.pubkey),
                    skipped.error
                ));
            }
            out.push_str(&format!(
                "Total: {} (shown {}, placeholder {}, malformed {})\n",
                result.total(),
                shown.len(),
                filtered,
                result.skipped.len()
            ));
            out
        }
        ReportFormat::Json => {
            let value = json!({
                "program_id": key_text(&result.program_id),
                "scanned_at": result.scanned_at.to_rfc3339(),
                "total": result.total(),
                "placeholder_filtered": filtered,
                "accounts": shown.iter().map(|a| render_json(a)).collect::<Vec<_>>(),
                "skipped": result.skipped.iter().map(|s| json!({
                    "pubkey": key_text(&s.pubkey),
                    "error": s.error.to_string(),
                })).collect::<Vec<_>>(),
            });
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
        }
    }
}
