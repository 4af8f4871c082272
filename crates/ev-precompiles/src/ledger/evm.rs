//! [`LedgerStore`] backed by EVM account storage.
//!
//! Ledger slots live in the storage of [`LEDGER_ADDRESS`] and ledger events go
//! straight into the EVM log journal. Both are journaled by revm, so a revert
//! of the enclosing frame unwinds committed ledger writes and events together
//! with the rest of the frame's state.

use super::{LedgerError, LedgerStore};
use alloy_evm::{EvmInternals, EvmInternalsError};
use alloy_primitives::{address, Address, Bytes, Log, B256, U256};
use revm::bytecode::Bytecode;
use std::{fmt, sync::OnceLock};

/// Account whose storage holds the ledger.
pub const LEDGER_ADDRESS: Address = address!("0x000000000000000000000000000000000000F200");

/// Ledger view over the journal of the executing EVM.
pub struct EvmLedgerStore<'a, 'b> {
    internals: &'a mut EvmInternals<'b>,
}

impl fmt::Debug for EvmLedgerStore<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvmLedgerStore")
            .field("address", &LEDGER_ADDRESS)
            .finish_non_exhaustive()
    }
}

impl<'a, 'b> EvmLedgerStore<'a, 'b> {
    /// Wraps the internals handed to a precompile call.
    pub fn new(internals: &'a mut EvmInternals<'b>) -> Self {
        Self { internals }
    }

    /// Marker code for the ledger account.
    ///
    /// `0xFE` keeps the account from being pruned as empty and makes direct
    /// calls to it fail.
    fn bytecode() -> &'static Bytecode {
        static BYTECODE: OnceLock<Bytecode> = OnceLock::new();
        BYTECODE.get_or_init(|| Bytecode::new_raw(Bytes::from_static(&[0xFE])))
    }

    fn map_internals_error(err: EvmInternalsError) -> LedgerError {
        LedgerError::Store(err.to_string())
    }

    fn ensure_account_created(&mut self) -> Result<(), LedgerError> {
        let account = self
            .internals
            .load_account(LEDGER_ADDRESS)
            .map_err(Self::map_internals_error)?;

        if account.is_loaded_as_not_existing() {
            self.internals
                .set_code(LEDGER_ADDRESS, Self::bytecode().clone());
            self.internals.nonce_bump_journal_entry(LEDGER_ADDRESS);
            self.internals.touch_account(LEDGER_ADDRESS);
        }

        Ok(())
    }
}

impl LedgerStore for EvmLedgerStore<'_, '_> {
    fn load(&mut self, key: B256) -> Result<U256, LedgerError> {
        self.internals
            .load_account(LEDGER_ADDRESS)
            .map_err(Self::map_internals_error)?;
        let value = self
            .internals
            .sload(LEDGER_ADDRESS, U256::from_be_bytes(key.0))
            .map_err(Self::map_internals_error)?;
        Ok(*value)
    }

    fn store(&mut self, key: B256, value: U256) -> Result<(), LedgerError> {
        self.ensure_account_created()?;
        self.internals
            .sstore(LEDGER_ADDRESS, U256::from_be_bytes(key.0), value)
            .map_err(Self::map_internals_error)?;
        self.internals.touch_account(LEDGER_ADDRESS);
        Ok(())
    }

    fn emit(&mut self, log: Log) {
        self.internals.log(log);
    }

    fn block_time(&self) -> u64 {
        self.internals.block_timestamp().saturating_to()
    }
}
