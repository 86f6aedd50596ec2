//! PROSPECTOR: Autonomous Ore round-mining agent
//!
//! Entry point. Loads configuration, initialises structured logging,
//! wires the on-chain capabilities, and runs the main fetch→decide→
//! deploy→record loop with graceful shutdown.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use prospector::chain::rpc::HttpAccountSource;
use prospector::chain::{AccountSource, DeploymentSink};
use prospector::config::AppConfig;
use prospector::engine::deployer::Deployer;
use prospector::engine::ledger::JsonlLedger;
use prospector::engine::observer::RoundObserver;
use prospector::engine::runner::MiningLoop;
use prospector::strategy::{ColdTileStrategy, PotShareModel};

const BANNER: &str = r#"
 ____  ____   ___  ____  ____  _____ ____ _____ ___  ____
|  _ \|  _ \ / _ \/ ___||  _ \| ____/ ___|_   _/ _ \|  _ \
| |_) | |_) | | | \___ \| |_) |  _|| |     | || | | | |_) |
|  __/|  _ <| |_| |___) |  __/| |__| |___  | || |_| |  _ <
|_|   |_| \_\\___/|____/|_|   |_____\____| |_| \___/|_| \_\

  Autonomous Ore Round-Mining Agent
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        agent_name = %cfg.agent.name,
        dry_run = cfg.agent.dry_run,
        program_id = %cfg.rpc.program_id,
        round_interval_secs = cfg.agent.round_interval_secs,
        deploy_amount_sol = %cfg.agent.deploy_amount_sol,
        "PROSPECTOR starting up"
    );

    // -- Wire components -------------------------------------------------

    // Account source. A failed client build degrades to fallback rounds
    // rather than aborting the agent.
    let source: Option<Arc<dyn AccountSource>> = match HttpAccountSource::new(&cfg.rpc.url) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            warn!(error = %e, "RPC client unavailable; rounds will use fallback data");
            None
        }
    };
    let observer = RoundObserver::new(source, &cfg.rpc.program_id);

    // Deployment sink. On-chain submission needs an external signer
    // integration; until one is wired in, live mode fails loudly per
    // round instead of silently simulating.
    let sink: Option<Arc<dyn DeploymentSink>> = None;
    if !cfg.agent.dry_run {
        match (
            AppConfig::resolve_env(&cfg.wallet.keypair_path_env),
            AppConfig::resolve_env(&cfg.wallet.destination_env),
        ) {
            (Ok(_), Ok(_)) => warn!(
                "Wallet resolved but no deployment sink is integrated; live deployments will fail"
            ),
            (Err(e), _) | (_, Err(e)) => warn!(
                error = %e,
                "Live mode requested without wallet configuration; deployments will fail"
            ),
        }
    }
    let deployer = Deployer::new(sink, cfg.agent.dry_run, cfg.agent.deploy_amount_sol);

    // Ledger, strategy, profit model
    let ledger = JsonlLedger::open(&cfg.ledger.path)?;
    let strategy = ColdTileStrategy::new(cfg.agent.max_tiles_per_round);
    let profit = PotShareModel::new(cfg.agent.deploy_amount_sol);

    let mut miner = MiningLoop::new(
        observer,
        Box::new(strategy),
        Box::new(profit),
        deployer,
        Box::new(ledger),
        cfg.agent.pacing(),
        cfg.agent.round_bound(),
    );

    // -- Main loop -------------------------------------------------------

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!("Entering mining loop. Press Ctrl+C to stop.");

    tokio::select! {
        total = miner.run() => {
            info!(total_pnl = %total, "Configured round bound reached");
        }
        _ = &mut shutdown => {
            info!("Shutdown signal received.");
        }
    }

    info!(
        rounds = miner.rounds_run(),
        total_pnl = %miner.cumulative_profit(),
        "PROSPECTOR shut down cleanly."
    );

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("prospector=info"));

    let json_logging = std::env::var("PROSPECTOR_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
