//! `revm` integration for the native-ledger ERC-20 precompiles.

pub mod can_transfer;
pub mod factory;
pub mod precompiles;

pub use can_transfer::{can_transfer, CanTransferError, PendingTransfer};
pub use factory::{with_erc20_precompiles, EvEvmFactory};
pub use precompiles::{active_precompiles, available_precompiles};
