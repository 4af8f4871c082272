//! In-memory [`LedgerStore`], used for simulations and handler tests.

use super::{LedgerError, LedgerStore};
use alloy_primitives::{Log, B256, U256};
use std::collections::BTreeMap;

/// Ledger slots and events kept in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: BTreeMap<B256, U256>,
    logs: Vec<Log>,
    block_time: u64,
}

impl MemoryStore {
    /// Creates an empty store whose block time is `block_time`.
    pub fn at_block_time(block_time: u64) -> Self {
        Self {
            block_time,
            ..Default::default()
        }
    }

    /// Moves the block clock.
    pub fn set_block_time(&mut self, block_time: u64) {
        self.block_time = block_time;
    }

    /// Current value of a slot.
    pub fn slot(&self, key: B256) -> U256 {
        self.slots.get(&key).copied().unwrap_or_default()
    }

    /// Overwrites a slot without going through a checkpoint.
    pub fn set_slot(&mut self, key: B256, value: U256) {
        if value.is_zero() {
            self.slots.remove(&key);
        } else {
            self.slots.insert(key, value);
        }
    }

    /// Events committed so far.
    pub fn logs(&self) -> &[Log] {
        &self.logs
    }
}

impl LedgerStore for MemoryStore {
    fn load(&mut self, key: B256) -> Result<U256, LedgerError> {
        Ok(self.slot(key))
    }

    fn store(&mut self, key: B256, value: U256) -> Result<(), LedgerError> {
        self.set_slot(key, value);
        Ok(())
    }

    fn emit(&mut self, log: Log) {
        self.logs.push(log);
    }

    fn block_time(&self) -> u64 {
        self.block_time
    }
}
