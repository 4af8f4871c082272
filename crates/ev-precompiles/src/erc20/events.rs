use super::{abi::IERC20Precompile, Erc20Precompile};
use crate::ledger::{LedgerContext, LedgerStore};
use alloy::sol_types::SolEvent;
use alloy_primitives::{Address, Log, U256};

impl Erc20Precompile {
    pub(crate) fn emit_transfer<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        from: Address,
        to: Address,
        value: U256,
    ) {
        let event = IERC20Precompile::Transfer { from, to, value };
        self.emit(ctx, &event);
    }

    pub(crate) fn emit_approval<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        owner: Address,
        spender: Address,
        value: U256,
    ) {
        let event = IERC20Precompile::Approval {
            owner,
            spender,
            value,
        };
        self.emit(ctx, &event);
    }

    pub(crate) fn emit_ownership_transferred<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        previous_owner: Address,
        new_owner: Address,
    ) {
        let event = IERC20Precompile::OwnershipTransferred {
            previousOwner: previous_owner,
            newOwner: new_owner,
        };
        self.emit(ctx, &event);
    }

    fn emit<S: LedgerStore + ?Sized, E: SolEvent>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        event: &E,
    ) {
        ctx.emit(Log {
            address: self.address(),
            data: event.encode_log_data(),
        });
    }
}
