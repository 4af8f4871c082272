//! ERC-20 precompile backed by the native token ledger.
//!
//! One [`Erc20Precompile`] is installed per registered [`TokenPair`] at the
//! pair's contract address. Calls are served straight from the ledger: a
//! `transfer` moves native coins, an `approve` writes a spending grant, and
//! `mint`/`burn` change the denomination's supply through the erc20 module
//! account.
//!
//! ## Execution
//!
//! [`Erc20Precompile::run`] executes one call:
//!
//! 1. Calls carrying value are refused.
//! 2. The calldata is decoded and a [`LedgerContext`] is opened over the
//!    store with the call's remaining gas as its limit.
//! 3. The handler for the decoded [`Method`] runs against the context.
//! 4. The ledger gas consumed is charged to the [`Contract`].
//! 5. The buffered writes and events are replayed into the store.
//!
//! Any failure drops the context, so the store never sees a partial call.
//! Ledger gas exhaustion on any path surfaces as [`Erc20Error::OutOfGas`].
//!
//! ## Gas
//!
//! The EVM adapter charges the fixed per-method cost from [`gas`] up front,
//! then the metered ledger cost (see [`KvGasConfig`]) after the handler.
//!
//! ## Static calls
//!
//! `run` refuses transactions when `read_only` is set. The [`Precompile`]
//! impl cannot tell a `STATICCALL` apart from a regular call, because
//! [`PrecompileInput`] carries no static flag, so it always runs with
//! `read_only = false`. A state-changing method reached through a static
//! call therefore writes the ledger and emits its events.

pub mod abi;
mod approve;
mod args;
mod errors;
mod events;
pub mod gas;
mod query;
mod tx;

pub use abi::{decode_call, IERC20Precompile, Method};
pub use errors::Erc20Error;

use crate::{
    ledger::{
        token_pair_owner_key, EvmLedgerStore, KvGasConfig, LedgerContext, LedgerError,
        LedgerStore,
    },
    token_pair::{DenomMetadata, TokenPair},
};
use alloy::dyn_abi::DynSolValue;
use alloy_evm::{
    precompiles::{Precompile, PrecompileInput},
    revm::precompile::{PrecompileError, PrecompileId, PrecompileResult},
};
use alloy_primitives::{Address, Bytes, B256, U256};
use revm::precompile::PrecompileOutput;

/// Default lifetime of an approval: one year.
pub const DEFAULT_APPROVAL_EXPIRATION_SECS: u64 = 365 * 24 * 60 * 60;

/// Caller, attached value and remaining gas of a precompile call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contract {
    caller: Address,
    value: U256,
    gas: u64,
}

impl Contract {
    /// Creates the call frame with `gas` available.
    pub const fn new(caller: Address, value: U256, gas: u64) -> Self {
        Self { caller, value, gas }
    }

    /// Account that made the call.
    pub const fn caller(&self) -> Address {
        self.caller
    }

    /// Value attached to the call.
    pub const fn value(&self) -> U256 {
        self.value
    }

    /// Gas still available.
    pub const fn gas(&self) -> u64 {
        self.gas
    }

    /// Deducts `amount`, or returns `false` and leaves the gas untouched when
    /// it does not cover it.
    pub fn use_gas(&mut self, amount: u64) -> bool {
        match self.gas.checked_sub(amount) {
            Some(left) => {
                self.gas = left;
                true
            }
            None => false,
        }
    }
}

/// ERC-20 view of one token pair.
#[derive(Debug, Clone)]
pub struct Erc20Precompile {
    id: PrecompileId,
    token_pair: TokenPair,
    metadata: Option<DenomMetadata>,
    kv_gas: KvGasConfig,
    approval_expiration: u64,
}

impl Erc20Precompile {
    /// Creates the precompile for `token_pair` with default ledger gas and
    /// approval lifetime.
    pub fn new(token_pair: TokenPair, metadata: Option<DenomMetadata>) -> Self {
        Self {
            id: PrecompileId::custom(format!("erc20_{}", token_pair.denom)),
            token_pair,
            metadata,
            kv_gas: KvGasConfig::default(),
            approval_expiration: DEFAULT_APPROVAL_EXPIRATION_SECS,
        }
    }

    /// Overrides the ledger storage gas costs.
    pub const fn with_kv_gas(mut self, kv_gas: KvGasConfig) -> Self {
        self.kv_gas = kv_gas;
        self
    }

    /// Overrides how long approvals stay valid, in seconds.
    pub const fn with_approval_expiration(mut self, secs: u64) -> Self {
        self.approval_expiration = secs;
        self
    }

    /// Contract address the precompile is served at.
    pub const fn address(&self) -> Address {
        self.token_pair.erc20_address
    }

    /// Token pair served by this precompile.
    pub const fn token_pair(&self) -> &TokenPair {
        &self.token_pair
    }

    /// Native denomination backing the token.
    pub fn denom(&self) -> &str {
        &self.token_pair.denom
    }

    /// Fixed gas charged for `input` before execution.
    ///
    /// Input shorter than a selector or carrying an unknown selector costs
    /// nothing, so estimation never fails on it.
    pub fn required_gas(input: &[u8]) -> u64 {
        input
            .first_chunk::<4>()
            .and_then(|selector| Method::from_selector(*selector))
            .map_or(0, Method::required_gas)
    }

    /// Whether `method` mutates the ledger.
    pub const fn is_transaction(method: Method) -> bool {
        method.is_transaction()
    }

    /// Executes one call against `store`.
    ///
    /// Ledger gas is charged to `contract`. Transactions fail with
    /// [`Erc20Error::WriteProtection`] when `read_only` is set.
    pub fn run<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        contract: &mut Contract,
        input: &[u8],
        read_only: bool,
    ) -> Result<Bytes, Erc20Error> {
        if !contract.value().is_zero() {
            return Err(Erc20Error::CannotReceiveFunds(contract.value()));
        }

        self.execute(store, contract, input, read_only)
            .map_err(|err| Self::handle_gas_error(contract, err))
    }

    fn execute<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        contract: &mut Contract,
        input: &[u8],
        read_only: bool,
    ) -> Result<Bytes, Erc20Error> {
        let (method, args, mut ctx, initial_gas) =
            self.run_setup(store, contract, input, read_only)?;

        let bz = self.handle_method(&mut ctx, contract, method, &args)?;

        let cost = ctx.gas_meter().consumed() - initial_gas;
        if !contract.use_gas(cost) {
            return Err(Erc20Error::OutOfGas);
        }

        let entries = ctx.commit()?;
        tracing::info!(
            target: "erc20_precompile",
            denom = %self.token_pair.denom,
            %method,
            cost,
            entries,
            "call committed"
        );
        Ok(bz)
    }

    fn run_setup<'s, S: LedgerStore + ?Sized>(
        &self,
        store: &'s mut S,
        contract: &Contract,
        input: &[u8],
        read_only: bool,
    ) -> Result<(Method, Vec<DynSolValue>, LedgerContext<'s, S>, u64), Erc20Error> {
        let (method, args) = decode_call(input)?;
        tracing::debug!(
            target: "erc20_precompile",
            denom = %self.token_pair.denom,
            %method,
            caller = ?contract.caller(),
            gas = contract.gas(),
            read_only,
            "dispatching call"
        );

        if read_only && Self::is_transaction(method) {
            return Err(Erc20Error::WriteProtection);
        }

        let ctx = LedgerContext::new(store, contract.gas(), self.kv_gas);
        let initial_gas = ctx.gas_meter().consumed();
        Ok((method, args, ctx, initial_gas))
    }

    fn handle_method<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        contract: &Contract,
        method: Method,
        args: &[DynSolValue],
    ) -> Result<Bytes, Erc20Error> {
        match method {
            // transactions
            Method::Transfer => self.transfer(ctx, contract, args),
            Method::TransferFrom => self.transfer_from(ctx, contract, args),
            Method::Approve => self.approve(ctx, contract, args),
            Method::IncreaseAllowance => self.increase_allowance(ctx, contract, args),
            Method::DecreaseAllowance => self.decrease_allowance(ctx, contract, args),
            Method::Mint => self.mint(ctx, contract, args),
            Method::Burn => self.burn(ctx, contract, args),
            Method::Burn0 => self.burn0(ctx, contract, args),
            Method::BurnFrom => self.burn_from(ctx, contract, args),
            Method::TransferOwnership => self.transfer_ownership(ctx, contract, args),
            // queries
            Method::Name => self.name(ctx, contract, args),
            Method::Symbol => self.symbol(ctx, contract, args),
            Method::Decimals => self.decimals(ctx, contract, args),
            Method::TotalSupply => self.total_supply(ctx, contract, args),
            Method::BalanceOf => self.balance_of(ctx, contract, args),
            Method::Owner => self.owner(ctx, contract, args),
            Method::Allowance => self.allowance(ctx, contract, args),
        }
    }

    fn handle_gas_error(contract: &mut Contract, err: Erc20Error) -> Erc20Error {
        if err.is_out_of_gas() {
            let left = contract.gas();
            contract.use_gas(left);
            return Erc20Error::OutOfGas;
        }
        err
    }

    /// Current owner of the token pair: the last `transferOwnership` target,
    /// or the genesis owner when ownership never moved.
    pub(crate) fn current_owner<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
    ) -> Result<Address, LedgerError> {
        let raw = ctx.read(token_pair_owner_key(self.address()))?;
        if raw.bit(OWNER_OVERRIDE_BIT) {
            Ok(Address::from_word(B256::from(raw.to_be_bytes::<32>())))
        } else {
            Ok(self.token_pair.owner_address)
        }
    }

    pub(crate) fn set_owner<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        owner: Address,
    ) -> Result<(), LedgerError> {
        let mut raw = U256::from_be_bytes(owner.into_word().0);
        raw.set_bit(OWNER_OVERRIDE_BIT, true);
        ctx.write(token_pair_owner_key(self.address()), raw)
    }
}

/// Set in the owner slot once ownership has been transferred, so the zero
/// address stays distinguishable from "never transferred".
const OWNER_OVERRIDE_BIT: usize = 160;

impl Precompile for Erc20Precompile {
    fn precompile_id(&self) -> &PrecompileId {
        &self.id
    }

    fn call(&self, mut input: PrecompileInput<'_>) -> PrecompileResult {
        let gas_limit = input.gas;
        let required = Self::required_gas(input.data);
        let Some(available) = gas_limit.checked_sub(required) else {
            tracing::debug!(
                target: "erc20_precompile",
                gas_limit,
                required,
                "not enough gas for fixed cost"
            );
            return Err(PrecompileError::OutOfGas);
        };

        let data = input.data;
        let mut contract = Contract::new(input.caller, input.value, available);
        let mut store = EvmLedgerStore::new(input.internals_mut());

        // TODO: thread the frame's static flag through once `PrecompileInput` exposes it.
        let output = self.run(&mut store, &mut contract, data, false)?;

        Ok(PrecompileOutput::new(gas_limit - contract.gas(), output))
    }

    fn is_pure(&self) -> bool {
        false
    }
}
