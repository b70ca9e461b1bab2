//! CLI command implementations

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::ValueEnum;
use solana_sdk::pubkey::Pubkey;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

use crate::chart::render_curve_chart;
use crate::config::Config;
use crate::error::Error;
use crate::report::{render_input_json, render_input_text, render_scan, ReportFormat};
use crate::scan::{decode_raw, fetch_decoded, scan_program, RawAccount, RpcAccountSource};
use crate::xyber::curve::{CurveParams, Quote, SmoothBondingCurve};
use crate::xyber::program::LAMPORTS_PER_SOL;

/// Trade direction for `quote`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QuoteKind {
    /// Spend exactly AMOUNT base units
    BuyExactIn,
    /// Receive exactly AMOUNT tokens
    BuyExactOut,
    /// Sell exactly AMOUNT tokens
    SellExactIn,
    /// Receive exactly AMOUNT base units
    SellExactOut,
}

impl QuoteKind {
    /// Evaluate against `curve` at deposit `x`
    pub fn evaluate(self, curve: &SmoothBondingCurve, x: u64, amount: u64) -> crate::Result<Quote> {
        match self {
            QuoteKind::BuyExactIn => curve.buy_exact_input(x, amount),
            QuoteKind::BuyExactOut => curve.buy_exact_output(x, amount),
            QuoteKind::SellExactIn => curve.sell_exact_input(x, amount),
            QuoteKind::SellExactOut => curve.sell_exact_output(x, amount),
        }
    }

    fn amount_label(self) -> &'static str {
        match self {
            QuoteKind::BuyExactIn => "tokens minted",
            QuoteKind::BuyExactOut => "base required",
            QuoteKind::SellExactIn => "base returned",
            QuoteKind::SellExactOut => "tokens burned",
        }
    }
}

fn report_format(json: bool) -> ReportFormat {
    if json {
        ReportFormat::Json
    } else {
        ReportFormat::Text
    }
}

fn parse_pubkey(value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value).map_err(|_| Error::InvalidPubkey(value.to_string()).into())
}

/// Enumerate and print every program account
pub async fn scan(config: &Config, json: bool, include_placeholder: bool) -> Result<()> {
    let program_id = config.program_id()?;
    info!("Scanning accounts of program {}", program_id);

    let source = RpcAccountSource::from_config(&config.rpc)?;
    let result = scan_program(&source, &program_id)
        .await
        .context("Program account scan failed")?;

    let skip_placeholder = config.scan.skip_placeholder_mints && !include_placeholder;
    println!("{}", render_scan(&result, report_format(json), skip_placeholder));
    Ok(())
}

/// Raw account bytes from a base64 argument or a file of raw bytes
pub fn read_account_bytes(base64: Option<&str>, file: Option<&Path>) -> Result<Vec<u8>> {
    match (base64, file) {
        (Some(text), None) => STANDARD
            .decode(text.trim())
            .map_err(|e| Error::InvalidEncoding(e.to_string()).into()),
        (None, Some(path)) => std::fs::read(path)
            .with_context(|| format!("Failed to read account data from {}", path.display())),
        (Some(_), Some(_)) => anyhow::bail!("Pass either BASE64 data or --file, not both"),
        (None, None) => anyhow::bail!("Pass BASE64 account data or --file <PATH>"),
    }
}

/// Decode a single account buffer given on the command line
pub fn decode(base64: Option<&str>, file: Option<&Path>, json: bool) -> Result<()> {
    let data = read_account_bytes(base64, file)?;
    debug!("Decoding {} bytes", data.len());

    // no address for a bare buffer; the renderers label it as input
    let decoded = decode_raw(&RawAccount {
        pubkey: Pubkey::default(),
        data,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&render_input_json(&decoded))?);
    } else {
        print!("{}", render_input_text(&decoded));
    }
    Ok(())
}

/// Render the bonding curve chart
///
/// With `account`, the curve constants come from that XyberCore account,
/// with the base asset expressed in whole SOL on the x axis.
pub async fn plot(config: &Config, account: Option<&str>, output: Option<PathBuf>) -> Result<()> {
    let mut chart = config.chart.clone();
    if let Some(path) = output {
        chart.output_path = path;
    }

    let params = match account {
        Some(account) => {
            let curve = fetch_curve(config, account).await?;
            let params = CurveParams::from_curve_scaled(&curve, LAMPORTS_PER_SOL);
            info!(
                "Using curve from {}: A={} K={} C={}",
                account, params.a, params.k, params.c
            );
            Some(params)
        }
        None => None,
    };

    let written = render_curve_chart(&chart, params)?;
    println!("Chart written to {}", written.display());
    Ok(())
}

async fn fetch_curve(config: &Config, account: &str) -> Result<SmoothBondingCurve> {
    let pubkey = parse_pubkey(account)?;
    let source = RpcAccountSource::from_config(&config.rpc)?;
    let decoded = fetch_decoded(&source, &pubkey)
        .await
        .with_context(|| format!("Failed to fetch account {}", account))?;

    decoded
        .account
        .as_curve_config()
        .map(|record| record.bonding_curve)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Account {} is a {}, not a XyberCore config",
                account,
                decoded.account.kind()
            )
        })
}

/// Exact-integer quote against a live XyberCore account
pub async fn quote(
    config: &Config,
    account: &str,
    kind: QuoteKind,
    amount: u64,
    x: Option<u64>,
) -> Result<()> {
    let curve = fetch_curve(config, account).await?;
    println!("{}", format_quote(&curve, kind, amount, x)?);
    Ok(())
}

/// Quote at `x` (defaults to the curve's current deposit) as display text
pub fn format_quote(
    curve: &SmoothBondingCurve,
    kind: QuoteKind,
    amount: u64,
    x: Option<u64>,
) -> Result<String> {
    let x = x.unwrap_or(curve.x_total_base_deposit);
    let quote = kind.evaluate(curve, x, amount)?;
    let price_before = curve.marginal_price_at(x)?;
    let price_after = curve.marginal_price_at(quote.new_x)?;

    Ok(format!(
        "{:?} {} at x={}\n  {}: {}\n  new x: {}\n  price: {:.6e} -> {:.6e} base per token",
        kind,
        amount,
        x,
        kind.amount_label(),
        quote.amount,
        quote.new_x,
        price_before.to_f64(),
        price_after.to_f64(),
    ))
}

/// Show current configuration (secrets masked)
pub fn show_config(config: &Config) -> Result<()> {
    println!("{}", config.masked_display());
    Ok(())
}
