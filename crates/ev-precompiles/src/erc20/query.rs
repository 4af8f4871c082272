//! Read-only handlers.

use super::{
    args::{check_arg_count, parse_address},
    Contract, Erc20Error, Erc20Precompile,
};
use crate::{
    ledger::{LedgerContext, LedgerStore},
    token_pair::DenomMetadata,
};
use alloy::{dyn_abi::DynSolValue, sol_types::SolValue};
use alloy_primitives::{Bytes, U256};

impl Erc20Precompile {
    /// `name()` from the denomination metadata.
    pub fn name<S: LedgerStore + ?Sized>(
        &self,
        _ctx: &mut LedgerContext<'_, S>,
        _contract: &Contract,
        args: &[DynSolValue],
    ) -> Result<Bytes, Erc20Error> {
        check_arg_count(args, 0)?;
        Ok(self.require_metadata()?.name.abi_encode().into())
    }

    /// `symbol()` from the denomination metadata.
    pub fn symbol<S: LedgerStore + ?Sized>(
        &self,
        _ctx: &mut LedgerContext<'_, S>,
        _contract: &Contract,
        args: &[DynSolValue],
    ) -> Result<Bytes, Erc20Error> {
        check_arg_count(args, 0)?;
        Ok(self.require_metadata()?.symbol.abi_encode().into())
    }

    /// `decimals()` from the denomination metadata.
    pub fn decimals<S: LedgerStore + ?Sized>(
        &self,
        _ctx: &mut LedgerContext<'_, S>,
        _contract: &Contract,
        args: &[DynSolValue],
    ) -> Result<Bytes, Erc20Error> {
        check_arg_count(args, 0)?;
        Ok(U256::from(self.require_metadata()?.decimals).abi_encode().into())
    }

    /// `totalSupply()` of the denomination.
    pub fn total_supply<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        _contract: &Contract,
        args: &[DynSolValue],
    ) -> Result<Bytes, Erc20Error> {
        check_arg_count(args, 0)?;
        let supply = ctx.total_supply(self.denom())?;
        Ok(supply.abi_encode().into())
    }

    /// `balanceOf(account)`.
    pub fn balance_of<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        _contract: &Contract,
        args: &[DynSolValue],
    ) -> Result<Bytes, Erc20Error> {
        check_arg_count(args, 1)?;
        let account = parse_address(&args[0], "account")?;
        let balance = ctx.balance(account, self.denom())?;
        Ok(balance.abi_encode().into())
    }

    /// `owner()`: the current token-pair owner.
    pub fn owner<S: LedgerStore + ?Sized>(
        &self,
        ctx: &mut LedgerContext<'_, S>,
        _contract: &Contract,
        args: &[DynSolValue],
    ) -> Result<Bytes, Erc20Error> {
        check_arg_count(args, 0)?;
        let owner = self.current_owner(ctx)?;
        Ok(owner.abi_encode().into())
    }

    fn require_metadata(&self) -> Result<&DenomMetadata, Erc20Error> {
        self.metadata
            .as_ref()
            .ok_or_else(|| Erc20Error::MetadataNotFound(self.denom().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        erc20::{Contract, Erc20Error, Erc20Precompile},
        ledger::{KvGasConfig, LedgerContext, MemoryStore, ERC20_MODULE_ADDRESS},
        token_pair::{DenomMetadata, OwnerKind, TokenPair},
    };
    use alloy::{dyn_abi::DynSolValue, sol_types::SolValue};
    use alloy_primitives::{address, Address, U256};

    const DENOM: &str = "xmpl";
    const TOKEN: Address = address!("0x80b5a32e4f032b2a058b4f29ec95eefeeb87adcd");
    const OWNER: Address = address!("0x00000000000000000000000000000000000000a1");
    const HOLDER: Address = address!("0x00000000000000000000000000000000000000b1");

    fn metadata() -> DenomMetadata {
        DenomMetadata {
            name: "Xmpl".to_string(),
            symbol: "XMPL".to_string(),
            decimals: 18,
        }
    }

    fn pair() -> TokenPair {
        TokenPair::new(TOKEN, DENOM).with_owner(OwnerKind::External, OWNER)
    }

    fn ctx(store: &mut MemoryStore) -> LedgerContext<'_, MemoryStore> {
        LedgerContext::new(store, u64::MAX, KvGasConfig::free())
    }

    fn contract() -> Contract {
        Contract::new(HOLDER, U256::ZERO, u64::MAX)
    }

    #[test]
    fn metadata_queries() {
        let p = Erc20Precompile::new(pair(), Some(metadata()));
        let mut store = MemoryStore::default();
        let mut ctx = ctx(&mut store);

        let name = p.name(&mut ctx, &contract(), &[]).unwrap();
        assert_eq!(String::abi_decode(&name).unwrap(), "Xmpl");
        let symbol = p.symbol(&mut ctx, &contract(), &[]).unwrap();
        assert_eq!(String::abi_decode(&symbol).unwrap(), "XMPL");
        let decimals = p.decimals(&mut ctx, &contract(), &[]).unwrap();
        assert_eq!(u8::abi_decode(&decimals).unwrap(), 18);
    }

    #[test]
    fn metadata_queries_fail_without_metadata() {
        let p = Erc20Precompile::new(pair(), None);
        let mut store = MemoryStore::default();
        let mut ctx = ctx(&mut store);

        for result in [
            p.name(&mut ctx, &contract(), &[]),
            p.symbol(&mut ctx, &contract(), &[]),
            p.decimals(&mut ctx, &contract(), &[]),
        ] {
            assert_eq!(result.unwrap_err(), Erc20Error::MetadataNotFound(DENOM.into()));
        }
    }

    #[test]
    fn supply_and_balance() {
        let p = Erc20Precompile::new(pair(), None);
        let mut store = MemoryStore::default();
        let mut ctx = ctx(&mut store);
        ctx.mint_coins(ERC20_MODULE_ADDRESS, DENOM, U256::from(500)).unwrap();
        ctx.send_from_module_to_account(ERC20_MODULE_ADDRESS, HOLDER, DENOM, U256::from(200))
            .unwrap();

        let supply = p.total_supply(&mut ctx, &contract(), &[]).unwrap();
        assert_eq!(U256::abi_decode(&supply).unwrap(), U256::from(500));

        let balance = p
            .balance_of(&mut ctx, &contract(), &[DynSolValue::Address(HOLDER)])
            .unwrap();
        assert_eq!(U256::abi_decode(&balance).unwrap(), U256::from(200));

        let err = p
            .balance_of(&mut ctx, &contract(), &[DynSolValue::String(String::new())])
            .unwrap_err();
        assert!(err.to_string().starts_with("invalid account address"));

        let err = p.total_supply(&mut ctx, &contract(), &[DynSolValue::Bool(true)]).unwrap_err();
        assert_eq!(
            err,
            Erc20Error::InvalidArgCount {
                expected: 0,
                got: 1
            }
        );
    }

    #[test]
    fn owner_query_reports_genesis_owner() {
        let p = Erc20Precompile::new(pair(), None);
        let mut store = MemoryStore::default();
        let mut ctx = ctx(&mut store);

        let owner = p.owner(&mut ctx, &contract(), &[]).unwrap();
        assert_eq!(Address::abi_decode(&owner).unwrap(), OWNER);
    }
}
