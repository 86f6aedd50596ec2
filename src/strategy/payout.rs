//! Pot-share profit simulation.
//!
//! Coarse expected-value model: exactly one of the 25 tiles wins the
//! round, and a winning tile splits the pot (total deployed plus the
//! motherlode) pro rata by stake. Each chosen tile therefore contributes
//!
//!   pot * unit / (stake_on_tile + unit) / 25 - unit
//!
//! to the round estimate. Crude, but deterministic and directionally
//! useful for ranking rounds in the ledger.

use rust_decimal::Decimal;

use super::ProfitModel;
use crate::types::{lamports_to_sol, RoundSnapshot, TILE_COUNT};

const MODEL_NAME: &str = "pot-share";

pub struct PotShareModel {
    /// SOL committed per chosen tile.
    unit: Decimal,
}

impl PotShareModel {
    pub fn new(unit: Decimal) -> Self {
        Self { unit }
    }
}

impl ProfitModel for PotShareModel {
    fn estimate(&self, snapshot: &RoundSnapshot, chosen: &[u8]) -> Decimal {
        if chosen.is_empty() || self.unit <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let pot = lamports_to_sol(snapshot.total_deployed) + lamports_to_sol(snapshot.motherlode);
        let odds = Decimal::from(TILE_COUNT as u64);

        let mut profit = Decimal::ZERO;
        for &tile in chosen {
            let stake = snapshot.sol_on_tile(tile).unwrap_or(Decimal::ZERO);
            let share = self.unit / (stake + self.unit);
            profit += pot * share / odds - self.unit;
        }
        profit
    }

    fn name(&self) -> &str {
        MODEL_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
