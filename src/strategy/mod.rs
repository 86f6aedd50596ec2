//! Strategy engine: tile selection and profit simulation.
//!
//! Both halves are pure functions of the snapshot, deterministic and
//! I/O-free, so that a round's decision is reproducible after the fact.
//! The numeric policy is pluggable; the defaults shipped here are a
//! least-crowded tile picker and a pot-share expectation model.

pub mod cold;
pub mod payout;

pub use cold::ColdTileStrategy;
pub use payout::PotShareModel;

use rust_decimal::Decimal;

use crate::types::RoundSnapshot;

/// Chooses which tiles to deploy on for one round.
pub trait TileStrategy: Send + Sync {
    /// Duplicate-free tile ids drawn from 1..=25, in deployment order.
    /// An empty set is a legal decision: sit the round out.
    fn choose(&self, snapshot: &RoundSnapshot) -> Vec<u8>;

    /// Strategy name for logging.
    fn name(&self) -> &str;
}

/// Estimates the signed profit, in SOL, of deploying on a chosen tile set.
///
/// The estimate is a simulation. It is deliberately decoupled from real
/// settlement, which is asynchronous and tracked elsewhere.
pub trait ProfitModel: Send + Sync {
    fn estimate(&self, snapshot: &RoundSnapshot, chosen: &[u8]) -> Decimal;

    /// Model name for logging.
    fn name(&self) -> &str;
}
