//! Native token ledger as seen by the ERC-20 precompiles.
//!
//! The ledger is a flat key/value space of 32-byte slots plus an event sink.
//! Balances, supplies, spending grants and token-pair ownership overrides all
//! live in that space under keys derived with [`keccak256`]:
//!
//! | Key | Fields | Value |
//! |-----|--------|-------|
//! | [`balance_key`] | account, denom | balance |
//! | [`supply_key`] | denom | total supply |
//! | [`grant_limit_key`] | granter, grantee, denom | remaining spend limit |
//! | [`grant_expiration_key`] | granter, grantee, denom | unix expiration, `0` = none |
//! | [`token_pair_owner_key`] | contract | owner override, bit 160 set when present |
//!
//! Handlers never touch a [`LedgerStore`] directly. Every call opens a
//! [`LedgerContext`], which buffers writes and events in a [`Checkpoint`] and
//! meters each access against a [`GasMeter`]. Nothing reaches the parent store
//! until [`LedgerContext::commit`] replays the journal.

pub mod authz;
mod bank;
mod checkpoint;
pub mod evm;
mod gas;
pub mod memory;

pub use authz::SpendingGrant;
pub use checkpoint::{Checkpoint, JournalEntry};
pub use evm::{EvmLedgerStore, LEDGER_ADDRESS};
pub use gas::{GasMeter, KvGasConfig};
pub use memory::MemoryStore;

use alloy_primitives::{address, keccak256, Address, Log, B256, U256};

/// Account that holds freshly minted coins before they reach a recipient, and
/// burned coins before they leave the supply.
pub const ERC20_MODULE_ADDRESS: Address = address!("0x47eeb2eac350e1923b8cbdfa4396a077b36e62a0");

/// Errors raised by the ledger layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The per-call ledger gas limit was exceeded.
    #[error("out of gas in location: {descriptor}; gasWanted: {limit}, gasUsed: {used}")]
    OutOfGas {
        /// Access that exhausted the meter.
        descriptor: &'static str,
        /// Limit of the meter.
        limit: u64,
        /// Consumption the access would have reached.
        used: u64,
    },
    /// The account does not hold enough coins.
    #[error(
        "spendable balance {balance}{denom} is smaller than {amount}{denom}: insufficient funds"
    )]
    InsufficientFunds {
        /// Account being debited.
        address: Address,
        /// Denomination of the coins.
        denom: String,
        /// Balance at the time of the debit.
        balance: U256,
        /// Amount requested.
        amount: U256,
    },
    /// The grantee asked for more than the grant allows, or no grant exists.
    #[error(
        "requested amount {requested} exceeds spend limit {remaining} granted by {granter} to {grantee}"
    )]
    SpendLimitExceeded {
        /// Account that issued the grant.
        granter: Address,
        /// Account spending on behalf of the granter.
        grantee: Address,
        /// Amount requested.
        requested: U256,
        /// Limit left on the grant.
        remaining: U256,
    },
    /// A balance or supply would exceed `U256::MAX`.
    #[error("ledger arithmetic overflow")]
    Overflow,
    /// The backing store failed.
    #[error("ledger store: {0}")]
    Store(String),
}

impl LedgerError {
    /// Returns `true` for gas exhaustion.
    pub const fn is_out_of_gas(&self) -> bool {
        matches!(self, Self::OutOfGas { .. })
    }
}

/// Backing storage of the ledger.
pub trait LedgerStore {
    /// Reads a slot. Unset slots read as zero.
    fn load(&mut self, key: B256) -> Result<U256, LedgerError>;

    /// Writes a slot.
    fn store(&mut self, key: B256, value: U256) -> Result<(), LedgerError>;

    /// Records an event.
    fn emit(&mut self, log: Log);

    /// Unix time of the block being executed.
    fn block_time(&self) -> u64;
}

/// Metered, checkpointed view of a [`LedgerStore`] owned by a single call.
#[derive(Debug)]
pub struct LedgerContext<'p, S: ?Sized> {
    checkpoint: Checkpoint<'p, S>,
    gas: GasMeter,
    kv_gas: KvGasConfig,
}

impl<'p, S: LedgerStore + ?Sized> LedgerContext<'p, S> {
    /// Opens a checkpoint over `store` with a gas meter limited to `gas_limit`.
    pub fn new(store: &'p mut S, gas_limit: u64, kv_gas: KvGasConfig) -> Self {
        Self {
            checkpoint: Checkpoint::new(store),
            gas: GasMeter::new(gas_limit),
            kv_gas,
        }
    }

    /// Gas consumed by ledger accesses so far.
    pub const fn gas_meter(&self) -> &GasMeter {
        &self.gas
    }

    /// Unix time of the block being executed.
    pub fn block_time(&self) -> u64 {
        self.checkpoint.block_time()
    }

    /// Entries buffered since the context was opened.
    pub fn journal(&self) -> &[JournalEntry] {
        self.checkpoint.journal()
    }

    /// Replays the buffered entries into the parent store.
    ///
    /// Dropping the context instead discards them.
    pub fn commit(self) -> Result<usize, LedgerError> {
        self.checkpoint.commit()
    }

    pub(crate) fn read(&mut self, key: B256) -> Result<U256, LedgerError> {
        self.gas.consume(self.kv_gas.read_cost_flat, "ReadFlat")?;
        let value = self.checkpoint.load(key)?;
        let per_byte = self.kv_gas.read_cost_per_byte.saturating_mul(SLOT_ACCESS_BYTES);
        self.gas.consume(per_byte, "ReadPerByte")?;
        Ok(value)
    }

    pub(crate) fn write(&mut self, key: B256, value: U256) -> Result<(), LedgerError> {
        self.gas.consume(self.kv_gas.write_cost_flat, "WriteFlat")?;
        let per_byte = self.kv_gas.write_cost_per_byte.saturating_mul(SLOT_ACCESS_BYTES);
        self.gas.consume(per_byte, "WritePerByte")?;
        self.checkpoint.store(key, value)
    }

    pub(crate) fn emit(&mut self, log: Log) {
        self.checkpoint.emit(log);
    }
}

/// Bytes metered per slot access: a 32-byte key and a 32-byte value.
const SLOT_ACCESS_BYTES: u64 = 64;

fn derive_key(prefix: &[u8], fields: &[&[u8]]) -> B256 {
    let len = prefix.len() + fields.iter().map(|f| f.len()).sum::<usize>();
    let mut preimage = Vec::with_capacity(len);
    preimage.extend_from_slice(prefix);
    for field in fields {
        preimage.extend_from_slice(field);
    }
    keccak256(preimage)
}

/// Slot holding the balance of `address` in `denom`.
pub fn balance_key(address: Address, denom: &str) -> B256 {
    derive_key(b"bank/balance", &[address.as_slice(), denom.as_bytes()])
}

/// Slot holding the total supply of `denom`.
pub fn supply_key(denom: &str) -> B256 {
    derive_key(b"bank/supply", &[denom.as_bytes()])
}

/// Slot holding the remaining spend limit of a grant.
pub fn grant_limit_key(granter: Address, grantee: Address, denom: &str) -> B256 {
    derive_key(
        b"authz/grant/limit",
        &[granter.as_slice(), grantee.as_slice(), denom.as_bytes()],
    )
}

/// Slot holding the expiration of a grant.
pub fn grant_expiration_key(granter: Address, grantee: Address, denom: &str) -> B256 {
    derive_key(
        b"authz/grant/expiration",
        &[granter.as_slice(), grantee.as_slice(), denom.as_bytes()],
    )
}

/// Slot holding the owner override of the token pair at `contract`.
pub fn token_pair_owner_key(contract: Address) -> B256 {
    derive_key(b"erc20/owner", &[contract.as_slice()])
}
