use super::LedgerError;
use serde::{Deserialize, Serialize};

/// Per-call ledger gas counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasMeter {
    limit: u64,
    consumed: u64,
}

impl GasMeter {
    /// Creates a meter that fails once `limit` is exceeded.
    pub const fn new(limit: u64) -> Self {
        Self { limit, consumed: 0 }
    }

    /// Gas limit of the meter.
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Gas consumed so far.
    pub const fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Gas left before the limit.
    pub const fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.consumed)
    }

    /// Charges `amount`. On failure the meter is left saturated at its limit.
    pub fn consume(&mut self, amount: u64, descriptor: &'static str) -> Result<(), LedgerError> {
        let used = self.consumed.saturating_add(amount);
        if used > self.limit {
            self.consumed = self.limit;
            return Err(LedgerError::OutOfGas {
                descriptor,
                limit: self.limit,
                used,
            });
        }
        self.consumed = used;
        Ok(())
    }
}

/// Gas charged for ledger storage access.
///
/// The default charges nothing, so a call costs exactly its fixed method gas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KvGasConfig {
    /// Flat cost of a read.
    pub read_cost_flat: u64,
    /// Cost per byte read.
    pub read_cost_per_byte: u64,
    /// Flat cost of a write.
    pub write_cost_flat: u64,
    /// Cost per byte written.
    pub write_cost_per_byte: u64,
}

impl KvGasConfig {
    /// Configuration that charges nothing.
    pub const fn free() -> Self {
        Self {
            read_cost_flat: 0,
            read_cost_per_byte: 0,
            write_cost_flat: 0,
            write_cost_per_byte: 0,
        }
    }

    /// Key-value store costs of the native ledger's own transactions.
    pub const fn metered() -> Self {
        Self {
            read_cost_flat: 1_000,
            read_cost_per_byte: 3,
            write_cost_flat: 2_000,
            write_cost_per_byte: 30,
        }
    }
}
