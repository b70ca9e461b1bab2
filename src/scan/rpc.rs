//! JSON-RPC account source

use async_trait::async_trait;
use backoff::{future::retry, ExponentialBackoff};
use solana_account_decoder::UiAccountEncoding;
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use std::future::Future;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tracing::{error, warn};

use super::{AccountSource, RawAccount};
use crate::config::RpcConfig;
use crate::error::{Error, Result};

/// Fetches accounts over Solana JSON-RPC
pub struct RpcAccountSource {
    client: RpcClient,
    timeout: Duration,
    retry_base_delay: Duration,
    max_retries: u32,
}

impl RpcAccountSource {
    /// Wrap an existing client; `timeout` is the one it was built with
    pub fn new(
        client: RpcClient,
        timeout: Duration,
        retry_base_delay: Duration,
        max_retries: u32,
    ) -> Self {
        Self {
            client,
            timeout,
            retry_base_delay,
            max_retries,
        }
    }

    /// Build a client from RPC settings
    pub fn from_config(config: &RpcConfig) -> Result<Self> {
        let commitment = CommitmentConfig::from_str(&config.commitment)
            .map_err(|_| Error::Config(format!("unknown commitment {}", config.commitment)))?;
        let timeout = Duration::from_millis(config.timeout_ms);
        let client =
            RpcClient::new_with_timeout_and_commitment(config.endpoint.clone(), timeout, commitment);
        Ok(Self::new(
            client,
            timeout,
            Duration::from_millis(config.retry_base_delay_ms),
            config.max_retries,
        ))
    }

    fn backoff(&self) -> ExponentialBackoff {
        // attempts are capped in with_retry, not by elapsed time
        ExponentialBackoff {
            initial_interval: self.retry_base_delay,
            max_interval: self.retry_base_delay * 4,
            max_elapsed_time: None,
            ..Default::default()
        }
    }

    /// Run an RPC call, retrying transient failures up to `max_retries` times
    async fn with_retry<T, F, Fut>(&self, what: &str, call: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let call = &call;
        let attempts = &AtomicU32::new(0);
        let max_retries = self.max_retries;
        retry(self.backoff(), move || async move {
            let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
            match call().await {
                Ok(value) => Ok(value),
                Err(e) if e.is_retryable() && attempt <= max_retries => {
                    warn!(
                        "Retryable RPC error during {} (attempt {}/{}): {}",
                        what,
                        attempt,
                        max_retries.saturating_add(1),
                        e
                    );
                    Err(backoff::Error::transient(e))
                }
                Err(e) => {
                    error!("RPC error during {} after {} attempt(s): {}", what, attempt, e);
                    Err(backoff::Error::permanent(e))
                }
            }
        })
        .await
    }
}

// Client timeouts carry no duration, so report the configured one
fn rpc_error(e: ClientError, timeout: Duration) -> Error {
    match e.kind() {
        ClientErrorKind::Reqwest(inner) if inner.is_timeout() => {
            Error::RpcTimeout(timeout.as_millis() as u64)
        }
        _ => Error::from(e),
    }
}

#[async_trait]
impl AccountSource for RpcAccountSource {
    async fn program_accounts(&self, program_id: &Pubkey) -> Result<Vec<RawAccount>> {
        let config = RpcProgramAccountsConfig {
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                ..RpcAccountInfoConfig::default()
            },
            ..RpcProgramAccountsConfig::default()
        };

        let client = &self.client;
        let config = &config;
        let timeout = self.timeout;
        let accounts = self
            .with_retry("getProgramAccounts", move || async move {
                client
                    .get_program_accounts_with_config(program_id, config.clone())
                    .await
                    .map_err(|e| rpc_error(e, timeout))
            })
            .await?;

        Ok(accounts
            .into_iter()
            .map(|(pubkey, account)| RawAccount {
                pubkey,
                data: account.data,
            })
            .collect())
    }

    async fn account(&self, pubkey: &Pubkey) -> Result<RawAccount> {
        let client = &self.client;
        let timeout = self.timeout;
        let account = self
            .with_retry("getAccountInfo", move || async move {
                client
                    .get_account_with_commitment(pubkey, client.commitment())
                    .await
                    .map_err(|e| rpc_error(e, timeout))
            })
            .await?
            .value
            .ok_or_else(|| Error::AccountNotFound(pubkey.to_string()))?;

        Ok(RawAccount {
            pubkey: *pubkey,
            data: account.data,
        })
    }
}
