//! The mining loop: fetch → decide → act → record → pace.
//!
//! Strictly sequential; one round fully completes before the next begins,
//! and the only suspension point is the pacing sleep. Nothing below this
//! layer may kill the process. The loop stops when its configured round
//! bound is reached, or runs until the embedding task is cancelled.

use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{error, info};

use crate::engine::deployer::Deployer;
use crate::engine::ledger::LedgerSink;
use crate::engine::observer::RoundObserver;
use crate::strategy::{ProfitModel, TileStrategy};
use crate::types::LedgerRecord;

// ---------------------------------------------------------------------------
// Round report
// ---------------------------------------------------------------------------

/// Summary of one completed round.
#[derive(Debug, Clone)]
pub struct RoundReport {
    /// Loop iteration counter, 1-based.
    pub round_no: u64,
    /// On-chain round id; 0 when the fallback snapshot was used.
    pub round_id: u64,
    pub chosen_tiles: Vec<u8>,
    pub deployed: usize,
    pub failed: usize,
    pub simulated: bool,
    pub round_profit: Decimal,
    pub cumulative_profit: Decimal,
}

// ---------------------------------------------------------------------------
// Mining loop
// ---------------------------------------------------------------------------

pub struct MiningLoop {
    observer: RoundObserver,
    strategy: Box<dyn TileStrategy>,
    profit: Box<dyn ProfitModel>,
    deployer: Deployer,
    ledger: Box<dyn LedgerSink>,
    pacing: Duration,
    /// `None` means run until externally stopped.
    max_rounds: Option<u64>,
    /// Running PnL owned by this loop instance. Starts at zero per run;
    /// resuming from an earlier ledger is the embedder's concern.
    cumulative_profit: Decimal,
    rounds_run: u64,
}

impl MiningLoop {
    pub fn new(
        observer: RoundObserver,
        strategy: Box<dyn TileStrategy>,
        profit: Box<dyn ProfitModel>,
        deployer: Deployer,
        ledger: Box<dyn LedgerSink>,
        pacing: Duration,
        max_rounds: Option<u64>,
    ) -> Self {
        Self {
            observer,
            strategy,
            profit,
            deployer,
            ledger,
            pacing,
            max_rounds,
            cumulative_profit: Decimal::ZERO,
            rounds_run: 0,
        }
    }

    pub fn cumulative_profit(&self) -> Decimal {
        self.cumulative_profit
    }

    pub fn rounds_run(&self) -> u64 {
        self.rounds_run
    }

    fn more_rounds_remain(&self) -> bool {
        self.max_rounds.map_or(true, |max| self.rounds_run < max)
    }

    /// Run to the configured bound (or forever when unbounded) and return
    /// the final cumulative profit.
    pub async fn run(&mut self) -> Decimal {
        info!(
            strategy = self.strategy.name(),
            profit_model = self.profit.name(),
            max_rounds = ?self.max_rounds,
            pacing_secs = self.pacing.as_secs_f64(),
            "Mining loop starting"
        );

        while self.more_rounds_remain() {
            let report = self.run_round().await;
            info!(
                round_no = report.round_no,
                round_id = report.round_id,
                tiles = ?report.chosen_tiles,
                deployed = report.deployed,
                failed = report.failed,
                profit = %report.round_profit,
                total_pnl = %report.cumulative_profit,
                "Round complete"
            );

            if self.more_rounds_remain() && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        info!(
            rounds = self.rounds_run,
            total_pnl = %self.cumulative_profit,
            "Mining loop finished"
        );
        self.cumulative_profit
    }

    /// One fetch → decide → act → record pass.
    pub async fn run_round(&mut self) -> RoundReport {
        self.rounds_run += 1;

        // Fetch. Never fails; at worst the fallback snapshot.
        let snapshot = self.observer.snapshot().await;

        // Decide.
        let chosen = self.strategy.choose(&snapshot);

        // Act. Per-tile outcomes do not feed back into the profit
        // estimate; settlement is asynchronous and tracked off-chain.
        let deployment = self.deployer.deploy_round(&chosen).await;

        // Record.
        let round_profit = self.profit.estimate(&snapshot, &chosen);
        self.cumulative_profit += round_profit;

        let record = LedgerRecord {
            round_id: snapshot.round_id,
            chosen_tiles: chosen.clone(),
            round_profit,
            cumulative_profit: self.cumulative_profit,
            recorded_at: Utc::now(),
        };
        if let Err(e) = self.ledger.append(&record) {
            error!(
                round_id = snapshot.round_id,
                error = %e,
                "Ledger append failed; continuing"
            );
        }

        RoundReport {
            round_no: self.rounds_run,
            round_id: snapshot.round_id,
            chosen_tiles: chosen,
            deployed: deployment.deployed.len(),
            failed: deployment.failed.len(),
            simulated: deployment.simulated,
            round_profit,
            cumulative_profit: self.cumulative_profit,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
