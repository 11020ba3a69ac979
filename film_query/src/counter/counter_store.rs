// counter/counter_store.rs
use std::collections::BTreeMap;
use std::io;
use thiserror::Error;

use crate::util::Signature;

/// Signature -> number of times a query with that signature was executed.
pub type CounterTable = BTreeMap<Signature, u64>;

#[derive(Error, Debug)]
pub enum CounterError {
    #[error("Failed to persist counter table: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to encode counter table: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Keeps the popularity count of every executed query signature.
///
/// Implementations are single-writer: nothing guards against two stores
/// mutating the same backing storage at once.
pub trait CounterStore {
    /// Returns the stored table. Missing or unreadable storage yields an empty
    /// table rather than an error.
    fn load(&self) -> CounterTable;

    /// Bumps the count for `signature` by one, persists the table and returns
    /// the new count.
    fn record(&mut self, signature: &str) -> Result<u64, CounterError>;

    /// Returns up to `n` entries from a fresh load, highest count first.
    fn top(&self, n: usize) -> Vec<(Signature, u64)> {
        rank(self.load(), n)
    }
}

/// Orders by count descending, then by signature ascending so that ties come
/// out the same way every run.
pub fn rank(table: CounterTable, n: usize) -> Vec<(Signature, u64)> {
    let mut entries: Vec<(Signature, u64)> = table.into_iter().collect();
    entries.sort_by(|(sig_a, count_a), (sig_b, count_b)| {
        count_b.cmp(count_a).then_with(|| sig_a.cmp(sig_b))
    });
    entries.truncate(n);
    entries
}
