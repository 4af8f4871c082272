//! State-changing handlers: transfers, supply changes and ownership.

use super::{
    args::{check_arg_count, parse_address, parse_amount},
    Contract, Erc20Error, Erc20Precompile,
};
use crate::ledger::{LedgerContext, LedgerError, LedgerStore, ERC20_MODULE_ADDRESS};
use alloy::{dyn_abi::DynSolValue, sol_types::SolValue};
use alloy_primitives::{Address, Bytes, U256};

impl Erc20Precompile {
    /// `transfer(to, amount)` from the caller.
    pub fn transfer<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        contract: &Contract,
        args: &[DynSolValue],
    ) -> Result<Bytes, Erc20Error> {
        check_arg_count(args, 2)?;
        let to = parse_address(&args[0], "to")?;
        let amount = parse_amount(&args[1])?.positive(self.denom())?;

        let from = contract.caller();
        self.transfer_helper(ctx, from, from, to, amount)
    }

    /// `transferFrom(from, to, amount)`, spending the caller's grant from
    /// `from` unless the caller is `from`.
    pub fn transfer_from<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        contract: &Contract,
        args: &[DynSolValue],
    ) -> Result<Bytes, Erc20Error> {
        check_arg_count(args, 3)?;
        let from = parse_address(&args[0], "from")?;
        let to = parse_address(&args[1], "to")?;
        let amount = parse_amount(&args[2])?.positive(self.denom())?;

        self.transfer_helper(ctx, contract.caller(), from, to, amount)
    }

    fn transfer_helper<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<Bytes, Erc20Error> {
        if spender != from {
            self.spend_allowance(ctx, from, spender, amount, |requested, remaining| {
                Erc20Error::InsufficientAllowance {
                    requested,
                    remaining,
                }
            })?;
        }

        ctx.send(from, to, self.denom(), amount)
            .map_err(Self::transfer_exceeds_balance)?;
        self.emit_transfer(ctx, from, to, amount);

        Ok(true.abi_encode().into())
    }

    /// `mint(to, amount)`: new supply paid to `to`. Owner only.
    pub fn mint<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        contract: &Contract,
        args: &[DynSolValue],
    ) -> Result<Bytes, Erc20Error> {
        check_arg_count(args, 2)?;
        let to = parse_address(&args[0], "to")?;
        let amount = parse_amount(&args[1])?;

        let minter = contract.caller();
        let owner = self.current_owner(ctx)?;
        if minter != owner {
            tracing::warn!(
                target: "erc20_precompile",
                ?minter,
                ?owner,
                denom = self.denom(),
                "mint denied"
            );
            return Err(Erc20Error::MinterIsNotOwner);
        }

        let denom = self.denom();
        let amount = amount.positive(denom)?;
        ctx.mint_coins(ERC20_MODULE_ADDRESS, denom, amount)?;
        ctx.send_from_module_to_account(ERC20_MODULE_ADDRESS, to, denom, amount)?;
        self.emit_transfer(ctx, Address::ZERO, to, amount);

        Ok(true.abi_encode().into())
    }

    /// `burn(amount)` from the caller's balance.
    pub fn burn<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        contract: &Contract,
        args: &[DynSolValue],
    ) -> Result<Bytes, Erc20Error> {
        check_arg_count(args, 1)?;
        let amount = parse_amount(&args[0])?.positive(self.denom())?;

        self.burn_helper(ctx, contract.caller(), amount)
    }

    /// `burn(spender, amount)`: the owner burns from any account, no grant
    /// needed.
    pub fn burn0<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        contract: &Contract,
        args: &[DynSolValue],
    ) -> Result<Bytes, Erc20Error> {
        check_arg_count(args, 2)?;
        let spender = parse_address(&args[0], "spender")?;
        let amount = parse_amount(&args[1])?.positive(self.denom())?;

        self.ensure_owner(ctx, contract.caller())?;
        self.burn_helper(ctx, spender, amount)
    }

    /// `burnFrom(from, amount)`, spending the caller's grant from `from`
    /// unless the caller is `from`.
    pub fn burn_from<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        contract: &Contract,
        args: &[DynSolValue],
    ) -> Result<Bytes, Erc20Error> {
        check_arg_count(args, 2)?;
        let from = parse_address(&args[0], "from")?;
        let amount = parse_amount(&args[1])?.positive(self.denom())?;

        let spender = contract.caller();
        if spender != from {
            self.spend_allowance(ctx, from, spender, amount, |subtracted, remaining| {
                Erc20Error::DecreasedAllowanceBelowZero {
                    subtracted,
                    remaining,
                }
            })?;
        }
        self.burn_helper(ctx, from, amount)
    }

    fn burn_helper<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        from: Address,
        amount: U256,
    ) -> Result<Bytes, Erc20Error> {
        let denom = self.denom();
        ctx.send_from_account_to_module(from, ERC20_MODULE_ADDRESS, denom, amount)
            .map_err(|err| match err {
                LedgerError::InsufficientFunds {
                    balance, amount, ..
                } => Erc20Error::BurnAmountExceedsBalance { balance, amount },
                other => other.into(),
            })?;
        ctx.burn_coins(ERC20_MODULE_ADDRESS, denom, amount)?;
        self.emit_transfer(ctx, from, Address::ZERO, amount);

        Ok(Bytes::new())
    }

    /// `transferOwnership(newOwner)`. Owner only.
    pub fn transfer_ownership<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        contract: &Contract,
        args: &[DynSolValue],
    ) -> Result<Bytes, Erc20Error> {
        check_arg_count(args, 1)?;
        let new_owner = parse_address(&args[0], "new owner")?;
        if new_owner.is_zero() {
            return Err(Erc20Error::InvalidAddress {
                role: "new owner",
                value: new_owner.to_string(),
            });
        }

        let previous_owner = self.ensure_owner(ctx, contract.caller())?;
        self.set_owner(ctx, new_owner)?;
        self.emit_ownership_transferred(ctx, previous_owner, new_owner);
        tracing::debug!(
            target: "erc20_precompile",
            denom = self.denom(),
            ?previous_owner,
            ?new_owner,
            "ownership transferred"
        );

        Ok(Bytes::new())
    }

    fn ensure_owner<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        sender: Address,
    ) -> Result<Address, Erc20Error> {
        let owner = self.current_owner(ctx)?;
        if sender == owner {
            Ok(owner)
        } else {
            tracing::warn!(
                target: "erc20_precompile",
                ?sender,
                ?owner,
                denom = self.denom(),
                "owner-only call denied"
            );
            Err(Erc20Error::SenderIsNotOwner)
        }
    }

    fn transfer_exceeds_balance(err: LedgerError) -> Erc20Error {
        match err {
            LedgerError::InsufficientFunds {
                balance, amount, ..
            } => Erc20Error::TransferAmountExceedsBalance { balance, amount },
            other => other.into(),
        }
    }
}
