//! Solana JSON-RPC account source.
//!
//! Speaks `getProgramAccounts` over HTTP with base64-encoded account data.
//! Read-only; this client never signs or submits anything.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::{AccountData, AccountSource};

const SOURCE_NAME: &str = "solana-rpc";

/// Per-request timeout. Program scans over public RPC can be slow.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// RPC response types (JSON → Rust)
// ---------------------------------------------------------------------------

/// `getProgramAccounts` envelope. Only the fields we need.
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Vec<RpcKeyedAccount>>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcKeyedAccount {
    account: RpcAccount,
}

#[derive(Debug, Deserialize)]
struct RpcAccount {
    data: AccountData,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Account source backed by a Solana JSON-RPC endpoint.
pub struct HttpAccountSource {
    http: Client,
    url: String,
}

impl HttpAccountSource {
    pub fn new(url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build RPC HTTP client")?;
        Ok(Self {
            http,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl AccountSource for HttpAccountSource {
    async fn program_accounts(&self, program_id: &str) -> Result<Vec<AccountData>> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getProgramAccounts",
            "params": [program_id, {"encoding": "base64"}],
        });

        let response: RpcResponse = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .context("getProgramAccounts request failed")?
            .error_for_status()
            .context("getProgramAccounts returned an HTTP error")?
            .json()
            .await
            .context("Failed to parse getProgramAccounts response")?;

        if let Some(err) = response.error {
            anyhow::bail!("RPC error {}: {}", err.code, err.message);
        }

        let accounts = response.result.unwrap_or_default();
        debug!(program_id, count = accounts.len(), "Program accounts fetched");

        Ok(accounts.into_iter().map(|a| a.account.data).collect())
    }

    fn name(&self) -> &str {
        SOURCE_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
