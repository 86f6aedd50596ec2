//! Deployment dispatch for the acting half of a round.
//!
//! In dry-run mode the sink is never touched. In live mode each chosen
//! tile gets its own attempt; one rejection does not stop the rest of the
//! round, and the round's accounting is unaffected either way.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::chain::{DeployReceipt, DeploymentSink};

// ---------------------------------------------------------------------------
// Deployment report
// ---------------------------------------------------------------------------

/// Result of dispatching one round's chosen tiles.
#[derive(Debug, Clone)]
pub struct DeploymentReport {
    pub deployed: Vec<DeployReceipt>,
    pub failed: Vec<FailedDeployment>,
    /// SOL committed (or simulated) this round.
    pub total_committed: Decimal,
    /// Whether this round ran in dry-run mode.
    pub simulated: bool,
}

#[derive(Debug, Clone)]
pub struct FailedDeployment {
    pub tile_id: u8,
    pub reason: String,
}

impl DeploymentReport {
    fn empty(simulated: bool) -> Self {
        Self {
            deployed: Vec::new(),
            failed: Vec::new(),
            total_committed: Decimal::ZERO,
            simulated,
        }
    }
}

// ---------------------------------------------------------------------------
// Deployer
// ---------------------------------------------------------------------------

pub struct Deployer {
    sink: Option<Arc<dyn DeploymentSink>>,
    dry_run: bool,
    /// SOL committed per tile; a configuration constant, not derived from
    /// the snapshot.
    unit_amount: Decimal,
}

impl Deployer {
    pub fn new(sink: Option<Arc<dyn DeploymentSink>>, dry_run: bool, unit_amount: Decimal) -> Self {
        Self {
            sink,
            dry_run,
            unit_amount,
        }
    }

    pub fn unit_amount(&self) -> Decimal {
        self.unit_amount
    }

    /// Dispatch deployments for one round's chosen tiles, strictly one at
    /// a time in the given order.
    pub async fn deploy_round(&self, tiles: &[u8]) -> DeploymentReport {
        let mut report = DeploymentReport::empty(self.dry_run);

        if tiles.is_empty() {
            info!("No tiles chosen; nothing to deploy");
            return report;
        }

        if self.dry_run {
            for &tile in tiles {
                info!(tile, amount_sol = %self.unit_amount, "[DRY RUN] Would deploy");
                report
                    .deployed
                    .push(DeployReceipt::simulated(tile, self.unit_amount));
                report.total_committed += self.unit_amount;
            }
            return report;
        }

        let Some(sink) = &self.sink else {
            // Live mode without a configured sink is a loud per-round
            // failure, never a silent fall-back to simulation.
            error!(
                tiles = tiles.len(),
                "Live deployment requested but no deployment sink is configured"
            );
            for &tile in tiles {
                report.failed.push(FailedDeployment {
                    tile_id: tile,
                    reason: "deployment sink not configured".to_string(),
                });
            }
            return report;
        };

        for &tile in tiles {
            match sink.deploy(tile, self.unit_amount).await {
                Ok(receipt) => {
                    info!(
                        tile,
                        signature = %receipt.signature,
                        amount_sol = %self.unit_amount,
                        "Deployment submitted"
                    );
                    report.deployed.push(receipt);
                    report.total_committed += self.unit_amount;
                }
                Err(e) => {
                    warn!(tile, sink = sink.name(), error = %e, "Deployment failed");
                    report.failed.push(FailedDeployment {
                        tile_id: tile,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            deployed = report.deployed.len(),
            failed = report.failed.len(),
            committed_sol = %report.total_committed,
            "Round deployments complete"
        );
        report
    }
}

impl DeployReceipt {
    /// Receipt for a simulated deployment; nothing reached the chain.
    pub fn simulated(tile_id: u8, amount_sol: Decimal) -> Self {
        Self {
            signature: format!("dry-run-{}", Uuid::new_v4()),
            tile_id,
            amount_sol,
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
