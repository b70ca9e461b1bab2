//! Configuration loading and validation
//!
//! Sources, later ones win: built-in defaults, the config file (optional),
//! then `XYBER__<SECTION>__<KEY>` environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use std::path::Path;
use std::str::FromStr;

// Re-export chart config
pub use crate::chart::ChartConfig;
use crate::xyber::program::{XYBER_PROGRAM_ID, XYBER_PROGRAM_ID_STR};

/// Inspector settings, one section per concern
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rpc: RpcConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub chart: ChartConfig,
}

/// JSON-RPC connection and retry policy
#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    #[serde(default = "default_rpc_endpoint")]
    pub endpoint: String,
    /// processed, confirmed or finalized
    #[serde(default = "default_commitment")]
    pub commitment: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Retries after the first attempt on transient RPC failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Program whose accounts are enumerated
    #[serde(default = "default_program_id")]
    pub program_id: String,
    /// Drop pool states whose mint is still the all-zero placeholder
    #[serde(default = "default_true")]
    pub skip_placeholder_mints: bool,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: default_rpc_endpoint(),
            commitment: default_commitment(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            program_id: default_program_id(),
            skip_placeholder_mints: true,
        }
    }
}

fn default_rpc_endpoint() -> String {
    std::env::var("RPC_ENDPOINT").unwrap_or_else(|_| "https://api.devnet.solana.com".into())
}

fn default_commitment() -> String {
    "confirmed".to_string()
}

fn default_timeout_ms() -> u64 {
    30000
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    250
}

fn default_program_id() -> String {
    XYBER_PROGRAM_ID_STR.to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let settings = config::Config::builder()
            .set_default("rpc.endpoint", default_rpc_endpoint())?
            .set_default("rpc.commitment", default_commitment())?
            .set_default("scan.program_id", default_program_id())?
            // file is optional; serde defaults cover the rest
            .add_source(config::File::from(path).required(false))
            // e.g. XYBER__RPC__ENDPOINT
            .add_source(
                config::Environment::with_prefix("XYBER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: Config = settings
            .try_deserialize()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would only fail later, mid-command
    pub fn validate(&self) -> Result<()> {
        if self.rpc.timeout_ms == 0 {
            anyhow::bail!("rpc.timeout_ms must be positive");
        }
        self.commitment()?;
        self.program_id()?;

        let chart = &self.chart;
        if !chart.x_min.is_finite() || !chart.x_max.is_finite() {
            anyhow::bail!("chart.x_min and chart.x_max must be finite numbers");
        }
        if chart.x_min >= chart.x_max {
            anyhow::bail!(
                "chart.x_min ({}) must be below chart.x_max ({})",
                chart.x_min,
                chart.x_max
            );
        }
        if chart.sample_count < 2 {
            anyhow::bail!("chart.sample_count must be at least 2");
        }
        if chart.k == 0.0 {
            anyhow::bail!("chart.k must be non-zero");
        }
        if chart.output_path.as_os_str().is_empty() {
            anyhow::bail!("chart.output_path must not be empty");
        }
        if chart.width == 0 || chart.height == 0 {
            anyhow::bail!("chart.width and chart.height must be positive");
        }

        Ok(())
    }

    /// Parsed program ID
    pub fn program_id(&self) -> Result<Pubkey> {
        if self.scan.program_id == XYBER_PROGRAM_ID_STR {
            return Ok(*XYBER_PROGRAM_ID);
        }
        Pubkey::from_str(&self.scan.program_id)
            .with_context(|| format!("Invalid scan.program_id: {}", self.scan.program_id))
    }

    /// Parsed RPC commitment level
    pub fn commitment(&self) -> Result<CommitmentConfig> {
        CommitmentConfig::from_str(&self.rpc.commitment)
            .map_err(|_| anyhow::anyhow!("Invalid rpc.commitment: {}", self.rpc.commitment))
    }

    /// Settings as text, with endpoint query strings masked
    pub fn masked_display(&self) -> String {
        format!(
            r#"Configuration:
  RPC:
    endpoint: {}
    commitment: {}
    timeout: {}ms
    max_retries: {}
  Scan:
    program_id: {}
    skip_placeholder_mints: {}
  Chart:
    A: {}
    K: {}
    C: {}
    x range: [{}, {}] ({} samples)
    output: {} ({}x{})
"#,
            mask_url(&self.rpc.endpoint),
            self.rpc.commitment,
            self.rpc.timeout_ms,
            self.rpc.max_retries,
            self.scan.program_id,
            self.scan.skip_placeholder_mints,
            self.chart.a,
            self.chart.k,
            self.chart.c,
            self.chart.x_min,
            self.chart.x_max,
            self.chart.sample_count,
            self.chart.output_path.display(),
            self.chart.width,
            self.chart.height,
        )
    }
}

// RPC providers put API keys in the query string
fn mask_url(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => format!("{}?***", base),
        None => url.to_string(),
    }
}
