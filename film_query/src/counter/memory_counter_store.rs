// counter/memory_counter_store.rs
use super::counter_store::{CounterError, CounterStore, CounterTable};

/// Counter store that never touches the filesystem.
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    table: CounterTable,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CounterStore for MemoryCounterStore {
    fn load(&self) -> CounterTable {
        self.table.clone()
    }

    fn record(&mut self, signature: &str) -> Result<u64, CounterError> {
        let count = self.table.entry(signature.to_string()).or_insert(0);
        *count += 1;
        Ok(*count)
    }
}
