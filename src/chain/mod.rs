//! On-chain capability boundaries.
//!
//! Defines the `AccountSource` and `DeploymentSink` traits the engine
//! consumes, the tagged union of wire shapes an account's data field may
//! arrive in, and the normalizer that collapses those shapes into bytes.
//! The JSON-RPC account source lives in [`rpc`]; transaction signing and
//! submission belong to whatever sink the embedding process wires in.

pub mod rpc;

use anyhow::Result;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

// ---------------------------------------------------------------------------
// Account data shapes
// ---------------------------------------------------------------------------

/// Wire shapes observed for a program account's `data` field. RPC nodes
/// and client libraries disagree on the representation, so each shape is
/// matched explicitly rather than assuming one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AccountData {
    /// `["<base64>", "base64"]`, the JSON-RPC encoded pair.
    Base64Pair(Vec<String>),
    /// A keyed wrapper holding the encoded pair under `data`.
    KeyedWrapper { data: Vec<String> },
    /// Already-binary bytes.
    RawBytes(Vec<u8>),
    /// Anything unrecognized; rejected by [`normalize`].
    Other(serde_json::Value),
}

/// Rejection reasons for a single account's data field. The caller skips
/// the account and moves on; reporting is the caller's job.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("unrecognized account data encoding")]
    UnrecognizedEncoding,
    #[error("invalid base64 in account data: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Collapse one account data field into a plain byte sequence.
pub fn normalize(data: AccountData) -> Result<Vec<u8>, NormalizeError> {
    match data {
        AccountData::Base64Pair(pair) => match pair.first() {
            Some(blob) => Ok(BASE64.decode(blob)?),
            None => Err(NormalizeError::UnrecognizedEncoding),
        },
        AccountData::KeyedWrapper { data } => match data.first() {
            Some(blob) => Ok(BASE64.decode(blob)?),
            None => Err(NormalizeError::UnrecognizedEncoding),
        },
        AccountData::RawBytes(bytes) => Ok(bytes),
        AccountData::Other(_) => Err(NormalizeError::UnrecognizedEncoding),
    }
}

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Read-only view of a program's accounts.
///
/// Implementors fetch the raw data field of every account owned by a
/// program. Transport errors surface as `Err`; the engine treats them as
/// an empty scan, never as a reason to stop.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AccountSource: Send + Sync {
    /// Fetch the data fields of all accounts owned by `program_id`.
    async fn program_accounts(&self, program_id: &str) -> Result<Vec<AccountData>>;

    /// Source name for logging and identification.
    fn name(&self) -> &str;
}

/// Receipt returned once a deployment has been accepted.
#[derive(Debug, Clone)]
pub struct DeployReceipt {
    /// Transaction signature, or a synthetic id for simulated deployments.
    pub signature: String,
    pub tile_id: u8,
    pub amount_sol: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// Commits funds to tiles of the current round.
///
/// Requires externally-resolved wallet credentials; a sink that cannot be
/// constructed is represented as an absent handle, and the engine reports
/// that loudly instead of pretending to deploy.
#[async_trait]
pub trait DeploymentSink: Send + Sync {
    /// Commit `amount_sol` to one tile. One rejection is independent of
    /// any other tile's attempt.
    async fn deploy(&self, tile_id: u8, amount_sol: Decimal) -> Result<DeployReceipt>;

    /// Sink name for logging and identification.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
