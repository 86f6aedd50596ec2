//! End-to-end mining loop tests.
//!
//! Drives the full fetch→decide→act→record pipeline over mock on-chain
//! capabilities: crafted account bytes in, ledger rows and deployment
//! attempts out.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use prospector::chain::AccountData;
use prospector::engine::deployer::Deployer;
use prospector::engine::observer::RoundObserver;
use prospector::engine::runner::MiningLoop;
use prospector::strategy::{ColdTileStrategy, PotShareModel};
use prospector::types::LAMPORTS_PER_SOL;

use crate::mock_chain::{as_base64_pair, make_round, MemoryLedger, MockChain, RecordingSink};

const UNIT: Decimal = dec!(0.01);

fn make_miner(
    chain: MockChain,
    sink: Option<Arc<RecordingSink>>,
    dry_run: bool,
    ledger: MemoryLedger,
    max_rounds: Option<u64>,
) -> MiningLoop {
    let observer = RoundObserver::new(Some(Arc::new(chain)), "ore-test");
    let deployer = Deployer::new(
        sink.map(|s| s as Arc<dyn prospector::chain::DeploymentSink>),
        dry_run,
        UNIT,
    );
    MiningLoop::new(
        observer,
        Box::new(ColdTileStrategy::new(3)),
        Box::new(PotShareModel::new(UNIT)),
        deployer,
        Box::new(ledger),
        Duration::ZERO,
        max_rounds,
    )
}

#[tokio::test]
async fn test_loop_decodes_and_records_the_latest_round() {
    let chain = MockChain::with_accounts(vec![
        as_base64_pair(&make_round(3, LAMPORTS_PER_SOL)),
        as_base64_pair(&make_round(12, 2 * LAMPORTS_PER_SOL)),
        as_base64_pair(&make_round(7, 0)),
    ]);
    let ledger = MemoryLedger::default();
    let mut miner = make_miner(chain, None, true, ledger.clone(), Some(1));

    miner.run().await;

    let records = ledger.records();
    assert_eq!(records.len(), 1);
    // Highest round id wins regardless of listing order.
    assert_eq!(records[0].round_id, 12);
    assert_eq!(records[0].chosen_tiles.len(), 3);
}

#[tokio::test]
async fn test_malformed_account_is_skipped_not_fatal() {
    let chain = MockChain::with_accounts(vec![
        as_base64_pair(&make_round(5, 0)),
        AccountData::Base64Pair(vec!["&&& definitely not base64".into(), "base64".into()]),
        AccountData::RawBytes(vec![0u8; 42]),
        as_base64_pair(&make_round(9, 0)),
    ]);
    let ledger = MemoryLedger::default();
    let mut miner = make_miner(chain, None, true, ledger.clone(), Some(1));

    miner.run().await;

    let records = ledger.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].round_id, 9);
}

#[tokio::test]
async fn test_transport_failure_falls_back_and_keeps_mining() {
    let chain = MockChain::failing("connection reset by peer");
    let ledger = MemoryLedger::default();
    let mut miner = make_miner(chain, None, true, ledger.clone(), Some(2));

    let total = miner.run().await;

    let records = ledger.records();
    assert_eq!(records.len(), 2);
    for record in &records {
        assert_eq!(record.round_id, 0); // fallback snapshot
        assert_eq!(record.chosen_tiles, vec![1]);
    }
    // Fallback pot is empty, so each round costs exactly the stake.
    assert_eq!(total, dec!(-0.02));
}

#[tokio::test]
async fn test_cumulative_profit_matches_per_round_sum() {
    let chain = MockChain::with_accounts(vec![as_base64_pair(&make_round(4, LAMPORTS_PER_SOL))]);
    let ledger = MemoryLedger::default();
    let mut miner = make_miner(chain, None, true, ledger.clone(), Some(5));

    let total = miner.run().await;

    let records = ledger.records();
    assert_eq!(records.len(), 5);
    let mut running = Decimal::ZERO;
    for record in &records {
        running += record.round_profit;
        assert_eq!(record.cumulative_profit, running);
    }
    assert_eq!(total, running);
}

#[tokio::test]
async fn test_dry_run_never_invokes_the_sink() {
    let chain = MockChain::with_accounts(vec![as_base64_pair(&make_round(2, 0))]);
    let sink = Arc::new(RecordingSink::new());
    let ledger = MemoryLedger::default();
    let mut miner = make_miner(chain, Some(sink.clone()), true, ledger.clone(), Some(3));

    miner.run().await;

    assert!(sink.calls().is_empty());
    assert_eq!(ledger.records().len(), 3);
}

#[tokio::test]
async fn test_live_mode_deploys_chosen_tiles_with_unit_amount() {
    let chain = MockChain::with_accounts(vec![as_base64_pair(&make_round(2, LAMPORTS_PER_SOL))]);
    let sink = Arc::new(RecordingSink::new());
    let ledger = MemoryLedger::default();
    let mut miner = make_miner(chain, Some(sink.clone()), false, ledger.clone(), Some(1));

    miner.run().await;

    let calls = sink.calls();
    assert_eq!(calls.len(), 3);
    for (tile, amount) in &calls {
        assert!((1..=25).contains(tile));
        assert_eq!(*amount, UNIT);
    }
    // Tile 1 carries the stake, so the cold-tile picker avoids it.
    assert!(calls.iter().all(|(tile, _)| *tile != 1));
}

#[tokio::test]
async fn test_failed_deployment_does_not_stop_the_round_or_the_ledger() {
    let chain = MockChain::with_accounts(vec![as_base64_pair(&make_round(2, LAMPORTS_PER_SOL))]);
    let sink = Arc::new(RecordingSink::failing_on(&[2]));
    let ledger = MemoryLedger::default();
    let mut miner = make_miner(chain, Some(sink.clone()), false, ledger.clone(), Some(1));

    let report = miner.run_round().await;

    // Every chosen tile was attempted despite one rejection.
    assert_eq!(sink.calls().len(), 3);
    assert_eq!(report.failed, 1);
    assert_eq!(report.deployed, 2);

    // Profit accounting and the ledger entry are unaffected.
    let records = ledger.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].round_profit, report.round_profit);
    assert_eq!(miner.cumulative_profit(), report.round_profit);
}

#[tokio::test]
async fn test_live_mode_without_sink_fails_loudly_but_keeps_accounting() {
    let chain = MockChain::with_accounts(vec![as_base64_pair(&make_round(8, 0))]);
    let ledger = MemoryLedger::default();
    let mut miner = make_miner(chain, None, false, ledger.clone(), Some(1));

    let report = miner.run_round().await;

    assert_eq!(report.deployed, 0);
    assert_eq!(report.failed, report.chosen_tiles.len());
    assert!(!report.simulated);
    // The round is still ledgered; missing configuration never halts the loop.
    assert_eq!(ledger.records().len(), 1);
}

#[tokio::test]
async fn test_decisions_are_reproducible_across_identical_rounds() {
    let accounts = vec![as_base64_pair(&make_round(6, 3 * LAMPORTS_PER_SOL))];
    let ledger_a = MemoryLedger::default();
    let ledger_b = MemoryLedger::default();

    let mut first = make_miner(
        MockChain::with_accounts(accounts.clone()),
        None,
        true,
        ledger_a.clone(),
        Some(1),
    );
    let mut second = make_miner(
        MockChain::with_accounts(accounts),
        None,
        true,
        ledger_b.clone(),
        Some(1),
    );

    first.run().await;
    second.run().await;

    let a = ledger_a.records();
    let b = ledger_b.records();
    assert_eq!(a[0].chosen_tiles, b[0].chosen_tiles);
    assert_eq!(a[0].round_profit, b[0].round_profit);
}
