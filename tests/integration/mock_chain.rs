//! Mock on-chain capabilities for integration testing.
//!
//! Deterministic `AccountSource`, `DeploymentSink`, and `LedgerSink`
//! implementations, all in-memory with no external dependencies. Account
//! payloads, deployment outcomes, and recorded ledger rows are fully
//! controllable from test code.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use prospector::chain::{AccountData, AccountSource, DeployReceipt, DeploymentSink};
use prospector::engine::ledger::LedgerSink;
use prospector::types::{LedgerRecord, RoundState, LAMPORTS_PER_SOL, TILE_COUNT};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Build a round with a known id and a stake on the first tile.
pub fn make_round(id: u64, first_tile_lamports: u64) -> RoundState {
    let mut deployed = [0u64; TILE_COUNT];
    deployed[0] = first_tile_lamports;
    RoundState {
        id,
        deployed,
        slot_hash: [0x11; 32],
        counts: [0u64; TILE_COUNT],
        expires_at: 500,
        motherlode: 5 * LAMPORTS_PER_SOL,
        rent_payer: [0x22; 32],
        top_miner: [0x33; 32],
        top_miner_reward: 0,
        total_deployed: first_tile_lamports,
        total_vaulted: 0,
        total_winnings: 0,
    }
}

/// Encode a round the way the JSON-RPC transport delivers it.
pub fn as_base64_pair(round: &RoundState) -> AccountData {
    AccountData::Base64Pair(vec![BASE64.encode(round.to_bytes()), "base64".into()])
}

// ---------------------------------------------------------------------------
// Mock account source
// ---------------------------------------------------------------------------

/// A mock account source holding a fixed set of account payloads.
pub struct MockChain {
    accounts: Vec<AccountData>,
    /// If set, all fetches return this error.
    force_error: Option<String>,
}

impl MockChain {
    pub fn with_accounts(accounts: Vec<AccountData>) -> Self {
        Self {
            accounts,
            force_error: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            accounts: Vec::new(),
            force_error: Some(msg.to_string()),
        }
    }
}

#[async_trait]
impl AccountSource for MockChain {
    async fn program_accounts(&self, _program_id: &str) -> Result<Vec<AccountData>> {
        if let Some(err) = &self.force_error {
            return Err(anyhow!("{err}"));
        }
        Ok(self.accounts.clone())
    }

    fn name(&self) -> &str {
        "mock-chain"
    }
}

// ---------------------------------------------------------------------------
// Mock deployment sink
// ---------------------------------------------------------------------------

/// Records every deployment attempt; selected tiles can be made to fail.
pub struct RecordingSink {
    calls: Mutex<Vec<(u8, Decimal)>>,
    fail_tiles: HashSet<u8>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_tiles: HashSet::new(),
        }
    }

    pub fn failing_on(tiles: &[u8]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_tiles: tiles.iter().copied().collect(),
        }
    }

    pub fn calls(&self) -> Vec<(u8, Decimal)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeploymentSink for RecordingSink {
    async fn deploy(&self, tile_id: u8, amount_sol: Decimal) -> Result<DeployReceipt> {
        self.calls.lock().unwrap().push((tile_id, amount_sol));
        if self.fail_tiles.contains(&tile_id) {
            return Err(anyhow!("transaction rejected for tile {tile_id}"));
        }
        Ok(DeployReceipt {
            signature: format!("mock-sig-{tile_id}"),
            tile_id,
            amount_sol,
            timestamp: Utc::now(),
        })
    }

    fn name(&self) -> &str {
        "mock-sink"
    }
}

// ---------------------------------------------------------------------------
// Memory ledger
// ---------------------------------------------------------------------------

/// Ledger sink writing into shared memory so tests can inspect rows.
#[derive(Clone, Default)]
pub struct MemoryLedger(Arc<Mutex<Vec<LedgerRecord>>>);

impl MemoryLedger {
    pub fn records(&self) -> Vec<LedgerRecord> {
        self.0.lock().unwrap().clone()
    }
}

impl LedgerSink for MemoryLedger {
    fn append(&mut self, record: &LedgerRecord) -> Result<()> {
        self.0.lock().unwrap().push(record.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_chain_returns_accounts() {
        let chain = MockChain::with_accounts(vec![as_base64_pair(&make_round(1, 0))]);
        let accounts = chain.program_accounts("ore-test").await.unwrap();
        assert_eq!(accounts.len(), 1);
    }

    #[tokio::test]
    async fn test_mock_chain_forced_error() {
        let chain = MockChain::failing("simulated RPC outage");
        let result = chain.program_accounts("ore-test").await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("outage"));
    }

    #[tokio::test]
    async fn test_recording_sink_tracks_calls() {
        let sink = RecordingSink::new();
        sink.deploy(3, Decimal::new(1, 2)).await.unwrap();
        sink.deploy(5, Decimal::new(1, 2)).await.unwrap();
        assert_eq!(sink.calls().len(), 2);
        assert_eq!(sink.calls()[0].0, 3);
    }

    #[tokio::test]
    async fn test_recording_sink_fails_selected_tiles() {
        let sink = RecordingSink::failing_on(&[7]);
        assert!(sink.deploy(7, Decimal::ONE).await.is_err());
        assert!(sink.deploy(8, Decimal::ONE).await.is_ok());
        // Both attempts were recorded, including the failed one.
        assert_eq!(sink.calls().len(), 2);
    }
}
