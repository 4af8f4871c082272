//! Allowances expressed as ledger spending grants from owner to spender.

use super::{
    args::{check_arg_count, parse_address, parse_amount},
    Contract, Erc20Error, Erc20Precompile,
};
use crate::ledger::{LedgerContext, LedgerError, LedgerStore, SpendingGrant};
use alloy::{dyn_abi::DynSolValue, sol_types::SolValue};
use alloy_primitives::{Address, Bytes, U256};

impl Erc20Precompile {
    /// `approve(spender, amount)`. An amount of zero revokes the grant.
    pub fn approve<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        contract: &Contract,
        args: &[DynSolValue],
    ) -> Result<Bytes, Erc20Error> {
        check_arg_count(args, 2)?;
        let spender = parse_address(&args[0], "spender")?;
        let amount = parse_amount(&args[1])?.non_negative(self.denom())?;

        let owner = contract.caller();
        if owner == spender {
            return Err(Erc20Error::SelfApproval);
        }

        if amount.is_zero() {
            ctx.delete_grant(owner, spender, self.denom())?;
        } else {
            let expiration = self.approval_deadline(ctx)?;
            self.put_grant(ctx, owner, spender, amount, Some(expiration))?;
        }
        self.emit_approval(ctx, owner, spender, amount);

        Ok(true.abi_encode().into())
    }

    /// `increaseAllowance(spender, addedValue)`. Creates the grant when none
    /// is live.
    pub fn increase_allowance<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        contract: &Contract,
        args: &[DynSolValue],
    ) -> Result<Bytes, Erc20Error> {
        check_arg_count(args, 2)?;
        let spender = parse_address(&args[0], "spender")?;
        let added = parse_amount(&args[1])?.positive(self.denom())?;

        let owner = contract.caller();
        if owner == spender {
            return Err(Erc20Error::SelfApproval);
        }

        let (limit, expiration) = match ctx.get_grant(owner, spender, self.denom())? {
            Some(grant) => (grant.spend_limit, grant.expiration),
            None => (U256::ZERO, Some(self.approval_deadline(ctx)?)),
        };
        let new_limit = limit.checked_add(added).ok_or(LedgerError::Overflow)?;

        self.put_grant(ctx, owner, spender, new_limit, expiration)?;
        self.emit_approval(ctx, owner, spender, new_limit);

        Ok(true.abi_encode().into())
    }

    /// `decreaseAllowance(spender, subtractedValue)`. Fails when the grant
    /// does not cover the subtraction; a result of zero deletes the grant.
    pub fn decrease_allowance<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        contract: &Contract,
        args: &[DynSolValue],
    ) -> Result<Bytes, Erc20Error> {
        check_arg_count(args, 2)?;
        let spender = parse_address(&args[0], "spender")?;
        let subtracted = parse_amount(&args[1])?.positive(self.denom())?;

        let owner = contract.caller();
        if owner == spender {
            return Err(Erc20Error::SelfApproval);
        }

        let grant = ctx.get_grant(owner, spender, self.denom())?;
        let (limit, expiration) =
            grant.map_or((U256::ZERO, None), |g| (g.spend_limit, g.expiration));
        let Some(new_limit) = limit.checked_sub(subtracted) else {
            return Err(Erc20Error::DecreasedAllowanceBelowZero {
                subtracted,
                remaining: limit,
            });
        };

        if new_limit.is_zero() {
            ctx.delete_grant(owner, spender, self.denom())?;
        } else {
            self.put_grant(ctx, owner, spender, new_limit, expiration)?;
        }
        self.emit_approval(ctx, owner, spender, new_limit);

        Ok(true.abi_encode().into())
    }

    /// `allowance(owner, spender)`: the live grant limit, zero without one.
    pub fn allowance<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        _contract: &Contract,
        args: &[DynSolValue],
    ) -> Result<Bytes, Erc20Error> {
        check_arg_count(args, 2)?;
        let owner = parse_address(&args[0], "owner")?;
        let spender = parse_address(&args[1], "spender")?;

        let limit = ctx
            .get_grant(owner, spender, self.denom())?
            .map_or(U256::ZERO, |grant| grant.spend_limit);

        Ok(limit.abi_encode().into())
    }

    /// Spends `amount` of the grant from `owner` to `spender` and emits the
    /// new allowance. `exceeded` builds the error from the requested amount
    /// and the limit left.
    pub(crate) fn spend_allowance<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        owner: Address,
        spender: Address,
        amount: U256,
        exceeded: impl FnOnce(U256, U256) -> Erc20Error,
    ) -> Result<U256, Erc20Error> {
        let left = ctx
            .consume_grant(owner, spender, self.denom(), amount)
            .map_err(|err| match err {
                LedgerError::SpendLimitExceeded {
                    requested,
                    remaining,
                    ..
                } => exceeded(requested, remaining),
                other => other.into(),
            })?;
        self.emit_approval(ctx, owner, spender, left);
        Ok(left)
    }

    fn put_grant<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        granter: Address,
        grantee: Address,
        spend_limit: U256,
        expiration: Option<u64>,
    ) -> Result<(), LedgerError> {
        ctx.save_grant(&SpendingGrant {
            granter,
            grantee,
            denom: self.denom().to_string(),
            spend_limit,
            expiration,
        })
    }

    fn approval_deadline<S: LedgerStore + ?Sized>(
        &self,
        ctx: &LedgerContext<'_, S>,
    ) -> Result<u64, LedgerError> {
        ctx.block_time()
            .checked_add(self.approval_expiration)
            .ok_or(LedgerError::Overflow)
    }
}
