//! Append-only profit ledger.
//!
//! One JSON line per round. A failed append is the caller's problem to
//! report; losing a ledger entry must never stop mining.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::types::LedgerRecord;

/// Abstraction over the round ledger. Append-only; records are never
/// rewritten.
pub trait LedgerSink: Send {
    fn append(&mut self, record: &LedgerRecord) -> Result<()>;
}

/// JSON-lines ledger on local disk.
pub struct JsonlLedger {
    path: PathBuf,
}

impl JsonlLedger {
    /// Open a ledger, creating the file and its parent directory if
    /// needed, so the first round's append cannot fail on a missing path.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create ledger directory {}", parent.display())
                })?;
            }
        }

        let existed = Path::new(&path).exists();
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open ledger file {}", path.display()))?;

        if !existed {
            info!(path = %path.display(), "Ledger initialised");
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerSink for JsonlLedger {
    fn append(&mut self, record: &LedgerRecord) -> Result<()> {
        let mut line =
            serde_json::to_string(record).context("Failed to serialise ledger record")?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open ledger file {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("Failed to append to ledger {}", self.path.display()))?;

        debug!(
            path = %self.path.display(),
            round = record.round_id,
            "Ledger record appended"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
