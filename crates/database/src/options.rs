use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const MAX_CONNECTIONS: u32 = 4;
const ACQUIRE_TIMEOUT_MS: u64 = 5_000;

/// Tunables for materializing and querying a package database.
///
/// Every member has a default, so hosts can embed this in their own
/// configuration and only set what they care about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Directory the scratch copy of the database is written to. Defaults to
    /// the system temporary directory.
    pub scratch_dir: Option<PathBuf>,
    /// Upper bound on simultaneously open streams (each holds a connection).
    /// One more connection is kept for eager lookups.
    pub max_connections: u32,
    /// How long a query waits for SQLite to hand out a connection.
    pub acquire_timeout_ms: u64,
}
impl Options {
    pub(crate) fn max_streams(&self) -> u32 {
        self.max_connections.max(1)
    }

    pub(crate) fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }
}
impl Default for Options {
    fn default() -> Self {
        Self { scratch_dir: None, max_connections: MAX_CONNECTIONS, acquire_timeout_ms: ACQUIRE_TIMEOUT_MS }
    }
}
