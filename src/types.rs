//! Shared types for the PROSPECTOR agent.
//!
//! These types form the data model used across all modules: the decoded
//! on-chain round account, the per-round snapshot the strategy consumes,
//! and the ledger record the loop persists.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of deployable tiles per round.
pub const TILE_COUNT: usize = 25;

/// Smallest indivisible unit of SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Convert a lamport amount to SOL.
pub fn lamports_to_sol(lamports: u64) -> Decimal {
    Decimal::from(lamports) / Decimal::from(LAMPORTS_PER_SOL)
}

// ---------------------------------------------------------------------------
// Round account
// ---------------------------------------------------------------------------

/// Decoded on-chain round account.
///
/// Field order and widths mirror the Ore program's account layout; the
/// byte-level contract lives in [`crate::codec`]. All amounts are lamports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    /// Monotonically-assigned round identifier.
    pub id: u64,
    /// Lamports deployed per tile, index 0..24.
    pub deployed: [u64; TILE_COUNT],
    /// Randomness seed for the round.
    pub slot_hash: [u8; 32],
    /// Number of deployments per tile.
    pub counts: [u64; TILE_COUNT],
    /// Round expiry slot.
    pub expires_at: u64,
    /// Jackpot pool size.
    pub motherlode: u64,
    pub rent_payer: [u8; 32],
    pub top_miner: [u8; 32],
    pub top_miner_reward: u64,
    pub total_deployed: u64,
    pub total_vaulted: u64,
    pub total_winnings: u64,
}

// ---------------------------------------------------------------------------
// Round snapshot
// ---------------------------------------------------------------------------

/// One tile's standing within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileStake {
    /// Tile identifier, 1..=25.
    pub tile_id: u8,
    /// SOL already deployed on this tile.
    pub sol_deployed: Decimal,
}

impl fmt::Display for TileStake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile {} ({} SOL)", self.tile_id, self.sol_deployed)
    }
}

/// The decoded, immutable view of the most recent round, rebuilt on every
/// loop iteration and discarded once the round's decision is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSnapshot {
    pub round_id: u64,
    /// One entry per tile, ordered by tile id.
    pub tiles: Vec<TileStake>,
    /// Jackpot pool, lamports.
    pub motherlode: u64,
    /// Sum deployed across all tiles, lamports.
    pub total_deployed: u64,
}

impl fmt::Display for RoundSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Round #{} | tiles={} | total_deployed={} SOL | motherlode={} SOL",
            self.round_id,
            self.tiles.len(),
            lamports_to_sol(self.total_deployed),
            lamports_to_sol(self.motherlode),
        )
    }
}

impl RoundSnapshot {
    /// Build a snapshot from a decoded round account, converting per-tile
    /// lamports to SOL. Aggregates stay in lamports.
    pub fn from_round(round: &RoundState) -> Self {
        let tiles = round
            .deployed
            .iter()
            .enumerate()
            .map(|(i, &lamports)| TileStake {
                tile_id: (i + 1) as u8,
                sol_deployed: lamports_to_sol(lamports),
            })
            .collect();

        Self {
            round_id: round.id,
            tiles,
            motherlode: round.motherlode,
            total_deployed: round.total_deployed,
        }
    }

    /// Placeholder snapshot used when no round account could be observed.
    /// Carries a single synthetic tile so downstream strategies always have
    /// something to rank.
    pub fn fallback() -> Self {
        Self {
            round_id: 0,
            tiles: vec![TileStake {
                tile_id: 1,
                sol_deployed: dec!(0.1),
            }],
            motherlode: 0,
            total_deployed: 0,
        }
    }

    /// Whether this is the placeholder produced by [`Self::fallback`].
    pub fn is_fallback(&self) -> bool {
        self.round_id == 0
    }

    /// SOL deployed on a specific tile, if the snapshot carries it.
    pub fn sol_on_tile(&self, tile_id: u8) -> Option<Decimal> {
        self.tiles
            .iter()
            .find(|t| t.tile_id == tile_id)
            .map(|t| t.sol_deployed)
    }

    /// Helper to build a test snapshot with uniform stakes.
    #[cfg(test)]
    pub fn sample(round_id: u64, lamports_per_tile: u64) -> Self {
        Self {
            round_id,
            tiles: (1..=TILE_COUNT as u8)
                .map(|tile_id| TileStake {
                    tile_id,
                    sol_deployed: lamports_to_sol(lamports_per_tile),
                })
                .collect(),
            motherlode: 5 * LAMPORTS_PER_SOL,
            total_deployed: lamports_per_tile * TILE_COUNT as u64,
        }
    }
}

// ---------------------------------------------------------------------------
// Ledger record
// ---------------------------------------------------------------------------

/// One row of the profit ledger, appended after every round and never
/// rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub round_id: u64,
    pub chosen_tiles: Vec<u8>,
    /// Simulated profit for this round, SOL.
    pub round_profit: Decimal,
    /// Running total across the life of the loop, SOL.
    pub cumulative_profit: Decimal,
    pub recorded_at: DateTime<Utc>,
}

impl fmt::Display for LedgerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "round #{} tiles={:?} profit={} total={}",
            self.round_id, self.chosen_tiles, self.round_profit, self.cumulative_profit,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
