//! Core engine: the observe, decide, deploy, record loop.

pub mod deployer;
pub mod ledger;
pub mod observer;
pub mod runner;
