//! Cold-tile selection.
//!
//! Prefers the tiles with the least SOL already deployed, on the theory
//! that a win there shares the pot with fewer miners. Ties break toward
//! the lower tile id so the choice is stable across runs.

use tracing::debug;

use super::TileStrategy;
use crate::types::{RoundSnapshot, TILE_COUNT};

const STRATEGY_NAME: &str = "cold-tile";

pub struct ColdTileStrategy {
    max_tiles: usize,
}

impl ColdTileStrategy {
    pub fn new(max_tiles: usize) -> Self {
        Self {
            max_tiles: max_tiles.min(TILE_COUNT),
        }
    }
}

impl Default for ColdTileStrategy {
    fn default() -> Self {
        Self::new(3)
    }
}

impl TileStrategy for ColdTileStrategy {
    fn choose(&self, snapshot: &RoundSnapshot) -> Vec<u8> {
        let mut ranked: Vec<_> = snapshot.tiles.iter().collect();
        ranked.sort_by(|a, b| {
            a.sol_deployed
                .cmp(&b.sol_deployed)
                .then(a.tile_id.cmp(&b.tile_id))
        });

        let mut chosen: Vec<u8> = ranked
            .into_iter()
            .take(self.max_tiles)
            .map(|t| t.tile_id)
            .collect();

        // Guard against a snapshot carrying duplicate tile ids.
        chosen.sort_unstable();
        chosen.dedup();

        debug!(
            round = snapshot.round_id,
            tiles = ?chosen,
            "Cold tiles chosen"
        );
        chosen
    }

    fn name(&self) -> &str {
        STRATEGY_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
