//! # ERC-20 Precompiles over the Native Ledger
//!
//! This crate serves registered native denominations as ERC-20 contracts.
//! Each token pair gets a stateful precompile at its contract address; every
//! call is translated into operations on the native token ledger instead of
//! contract storage.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`erc20`] | ABI dispatch, gas schedule and the execution bridge |
//! | [`ledger`] | Balances, supply and spending grants with checkpoints and metered gas |
//! | [`token_pair`] | Contract address ⇄ denomination registry |
//! | [`config`] | Token pair configuration loaded from JSON or the environment |
//!
//! ## Execution
//!
//! A call runs in four steps:
//!
//! 1. **Dispatch**: the selector picks a [`erc20::Method`] and the arguments
//!    are ABI-decoded
//! 2. **Checkpoint**: a [`ledger::LedgerContext`] buffers all ledger writes and
//!    events of the call
//! 3. **Gas**: the fixed method cost is charged up front, the metered ledger
//!    cost after the handler returns
//! 4. **Commit**: the buffered journal is replayed into the EVM journal, or
//!    dropped on any failure
//!
//! Write protection under static calls is only enforced when the caller of
//! [`erc20::Erc20Precompile::run`] passes the flag. The revm adapter has no
//! way to observe it and runs every call as writable.
//!
//! ## Integration
//!
//! Precompiles are registered via `ev_revm::factory::EvEvmFactory`, which
//! wraps the standard `EthEvmFactory` and installs one precompile per
//! configured token pair.
//!
//! ```ignore
//! use ev_precompiles::config::Erc20Config;
//! use ev_revm::factory::EvEvmFactory;
//!
//! let config = Erc20Config::from_env()?;
//! let factory = EvEvmFactory::new(EthEvmFactory::default())
//!     .with_erc20(config.precompiles()?);
//! ```

pub mod config;
pub mod erc20;
pub mod ledger;
pub mod token_pair;

#[cfg(test)]
mod test_utils;
