//! Admission check for a pending value transfer.
//!
//! The check runs against a throwaway EVM over a caching view of the state,
//! so nothing it loads or touches is ever persisted.

use alloy_evm::EvmEnv;
use alloy_primitives::{Address, U256};
use reth_revm::{
    inspector::NoOpInspector,
    revm::{
        context::{BlockEnv, Context},
        context_interface::{journaled_state::JournalTr, ContextTr},
        database::CacheDB,
        database_interface::DatabaseRef,
        primitives::hardfork::SpecId,
        MainBuilder, MainContext,
    },
};
use thiserror::Error;

/// Sender, value and fee cap of a transfer waiting for admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransfer {
    /// Account the value is taken from.
    pub from: Address,
    /// Value moved by the transfer.
    pub value: U256,
    /// Maximum fee per gas the sender is willing to pay.
    pub gas_fee_cap: u128,
}

/// Reasons a pending transfer is refused.
#[derive(Debug, Error)]
pub enum CanTransferError<DbError> {
    /// Fee cap below the block base fee.
    #[error("max fee per gas less than block base fee ({fee_cap} < {base_fee})")]
    InsufficientFee {
        /// Fee cap of the transfer.
        fee_cap: u128,
        /// Base fee of the block.
        base_fee: u128,
    },
    /// Sender balance below the value.
    #[error(
        "failed to transfer {value} from address {from} using the EVM block context transfer \
         function"
    )]
    InsufficientFunds {
        /// Sender.
        from: Address,
        /// Value requested.
        value: U256,
    },
    /// Underlying database error.
    #[error("failed to load sender account: {0}")]
    Database(#[from] DbError),
}

/// Checks that `tx` could move its value under `evm_env`.
///
/// From London on the fee cap must cover the block base fee. A positive value
/// must be covered by the sender's balance, read through a fresh EVM with no
/// coinbase that is discarded on return.
pub fn can_transfer<DB>(
    db: DB,
    evm_env: &EvmEnv<SpecId, BlockEnv>,
    tx: &PendingTransfer,
) -> Result<(), CanTransferError<DB::Error>>
where
    DB: DatabaseRef,
{
    if evm_env.cfg_env.spec.is_enabled_in(SpecId::LONDON) {
        let base_fee = u128::from(evm_env.block_env.basefee);
        if tx.gas_fee_cap < base_fee {
            tracing::warn!(
                target: "ev_revm",
                from = ?tx.from,
                fee_cap = tx.gas_fee_cap,
                base_fee,
                "transfer refused: fee cap below base fee"
            );
            return Err(CanTransferError::InsufficientFee {
                fee_cap: tx.gas_fee_cap,
                base_fee,
            });
        }
    }

    if tx.value.is_zero() {
        return Ok(());
    }

    let block = BlockEnv {
        beneficiary: Address::ZERO,
        ..evm_env.block_env.clone()
    };
    let mut evm = Context::mainnet()
        .with_db(CacheDB::new(db))
        .with_cfg(evm_env.cfg_env.clone())
        .with_block(block)
        .build_mainnet_with_inspector(NoOpInspector {});

    let balance = evm
        .ctx
        .journal_mut()
        .load_account(tx.from)?
        .data
        .info
        .balance;

    if balance < tx.value {
        tracing::warn!(
            target: "ev_revm",
            from = ?tx.from,
            value = %tx.value,
            %balance,
            "transfer refused: insufficient balance"
        );
        return Err(CanTransferError::InsufficientFunds {
            from: tx.from,
            value: tx.value,
        });
    }

    tracing::debug!(target: "ev_revm", from = ?tx.from, value = %tx.value, "transfer admitted");
    Ok(())
}
