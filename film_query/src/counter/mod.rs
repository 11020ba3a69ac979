pub mod counter_store;
pub mod file_counter_store;
pub mod memory_counter_store;

pub use counter_store::{CounterError, CounterStore, CounterTable};
pub use file_counter_store::FileCounterStore;
pub use memory_counter_store::MemoryCounterStore;
