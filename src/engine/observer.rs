//! Round observer: turns a raw program-account scan into a snapshot.
//!
//! Every failure below this layer is absorbed: a bad account is skipped,
//! a failed or absent transport yields the fallback snapshot. The loop
//! above always gets something to decide on.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::chain::{normalize, AccountSource};
use crate::codec::decode_round;
use crate::types::{lamports_to_sol, RoundSnapshot, RoundState};

/// What one scan of the program's accounts produced.
#[derive(Debug, Default)]
struct ScanOutcome {
    rounds: Vec<RoundState>,
    skipped: usize,
}

/// Observes the current round of a program.
///
/// The account source is an optional handle fixed at construction; it is
/// never reconstructed mid-run.
pub struct RoundObserver {
    source: Option<Arc<dyn AccountSource>>,
    program_id: String,
}

impl RoundObserver {
    pub fn new(source: Option<Arc<dyn AccountSource>>, program_id: &str) -> Self {
        Self {
            source,
            program_id: program_id.to_string(),
        }
    }

    /// Observe the most recent round. Never fails: with no usable data the
    /// fallback snapshot is returned so the caller can still decide.
    pub async fn snapshot(&self) -> RoundSnapshot {
        let outcome = self.scan().await;
        info!(
            parsed = outcome.rounds.len(),
            skipped = outcome.skipped,
            "Round accounts scanned"
        );

        let Some(latest) = outcome.rounds.into_iter().max_by_key(|r| r.id) else {
            warn!("No round accounts decoded; using fallback snapshot");
            return RoundSnapshot::fallback();
        };

        let snapshot = RoundSnapshot::from_round(&latest);
        info!(
            round = snapshot.round_id,
            total_deployed_sol = %lamports_to_sol(snapshot.total_deployed),
            motherlode_sol = %lamports_to_sol(snapshot.motherlode),
            "Round observed"
        );
        snapshot
    }

    /// Best-effort fold over the program's accounts. One malformed account
    /// must never abort the scan.
    async fn scan(&self) -> ScanOutcome {
        let Some(source) = &self.source else {
            warn!("Account source not configured; scan yields nothing");
            return ScanOutcome::default();
        };

        let blobs = match source.program_accounts(&self.program_id).await {
            Ok(blobs) => blobs,
            Err(e) => {
                warn!(
                    source = source.name(),
                    program_id = %self.program_id,
                    error = %e,
                    "Program account fetch failed"
                );
                return ScanOutcome::default();
            }
        };

        let mut outcome = ScanOutcome::default();
        for data in blobs {
            let bytes = match normalize(data) {
                Ok(bytes) => bytes,
                Err(e) => {
                    debug!(error = %e, "Skipping account: bad encoding");
                    outcome.skipped += 1;
                    continue;
                }
            };
            match decode_round(&bytes) {
                Ok(round) => outcome.rounds.push(round),
                Err(e) => {
                    debug!(error = %e, "Skipping account: bad layout");
                    outcome.skipped += 1;
                }
            }
        }
        outcome
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
