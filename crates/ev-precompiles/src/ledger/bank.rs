//! Coin balances and supply.

use super::{balance_key, supply_key, LedgerContext, LedgerError, LedgerStore};
use alloy_primitives::{Address, U256};

impl<S: LedgerStore + ?Sized> LedgerContext<'_, S> {
    /// Balance of `address` in `denom`.
    pub fn balance(&mut self, address: Address, denom: &str) -> Result<U256, LedgerError> {
        self.read(balance_key(address, denom))
    }

    /// Total supply of `denom`.
    pub fn total_supply(&mut self, denom: &str) -> Result<U256, LedgerError> {
        self.read(supply_key(denom))
    }

    /// Moves `amount` of `denom` from `from` to `to`.
    pub fn send(
        &mut self,
        from: Address,
        to: Address,
        denom: &str,
        amount: U256,
    ) -> Result<(), LedgerError> {
        self.sub_balance(from, denom, amount)?;
        self.add_balance(to, denom, amount)?;
        tracing::debug!(target: "ledger", ?from, ?to, denom, %amount, "coins sent");
        Ok(())
    }

    /// Creates `amount` of `denom` in the `module` account.
    pub fn mint_coins(
        &mut self,
        module: Address,
        denom: &str,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let supply = self.total_supply(denom)?;
        let supply = supply.checked_add(amount).ok_or(LedgerError::Overflow)?;
        self.add_balance(module, denom, amount)?;
        self.write(supply_key(denom), supply)?;
        tracing::debug!(target: "ledger", ?module, denom, %amount, %supply, "coins minted");
        Ok(())
    }

    /// Destroys `amount` of `denom` held by the `module` account.
    pub fn burn_coins(
        &mut self,
        module: Address,
        denom: &str,
        amount: U256,
    ) -> Result<(), LedgerError> {
        self.sub_balance(module, denom, amount)?;
        let supply = self.total_supply(denom)?;
        // Supply always covers a module balance unless slots were written directly.
        let supply = supply.saturating_sub(amount);
        self.write(supply_key(denom), supply)?;
        tracing::debug!(target: "ledger", ?module, denom, %amount, %supply, "coins burned");
        Ok(())
    }

    /// Pays out of a module account.
    pub fn send_from_module_to_account(
        &mut self,
        module: Address,
        to: Address,
        denom: &str,
        amount: U256,
    ) -> Result<(), LedgerError> {
        self.send(module, to, denom, amount)
    }

    /// Pays into a module account.
    pub fn send_from_account_to_module(
        &mut self,
        from: Address,
        module: Address,
        denom: &str,
        amount: U256,
    ) -> Result<(), LedgerError> {
        self.send(from, module, denom, amount)
    }

    fn add_balance(
        &mut self,
        address: Address,
        denom: &str,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let balance = self.balance(address, denom)?;
        let balance = balance.checked_add(amount).ok_or(LedgerError::Overflow)?;
        self.write(balance_key(address, denom), balance)
    }

    fn sub_balance(
        &mut self,
        address: Address,
        denom: &str,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let balance = self.balance(address, denom)?;
        let Some(remaining) = balance.checked_sub(amount) else {
            return Err(LedgerError::InsufficientFunds {
                address,
                denom: denom.to_string(),
                balance,
                amount,
            });
        };
        self.write(balance_key(address, denom), remaining)
    }
}

#[cfg(test)]
mod tests {
    use crate::ledger::{KvGasConfig, LedgerContext, LedgerError, MemoryStore, ERC20_MODULE_ADDRESS};
    use alloy_primitives::{address, U256};

    const DENOM: &str = "xmpl";

    #[test]
    fn mint_then_pay_out() {
        let holder = address!("0x00000000000000000000000000000000000000a1");
        let mut store = MemoryStore::default();
        let mut ctx = LedgerContext::new(&mut store, u64::MAX, KvGasConfig::free());

        ctx.mint_coins(ERC20_MODULE_ADDRESS, DENOM, U256::from(1_000))
            .unwrap();
        ctx.send_from_module_to_account(ERC20_MODULE_ADDRESS, holder, DENOM, U256::from(400))
            .unwrap();

        assert_eq!(ctx.balance(holder, DENOM).unwrap(), U256::from(400));
        assert_eq!(
            ctx.balance(ERC20_MODULE_ADDRESS, DENOM).unwrap(),
            U256::from(600)
        );
        assert_eq!(ctx.total_supply(DENOM).unwrap(), U256::from(1_000));
    }

    #[test]
    fn burn_reduces_supply() {
        let holder = address!("0x00000000000000000000000000000000000000a2");
        let mut store = MemoryStore::default();
        let mut ctx = LedgerContext::new(&mut store, u64::MAX, KvGasConfig::free());

        ctx.mint_coins(ERC20_MODULE_ADDRESS, DENOM, U256::from(50))
            .unwrap();
        ctx.send_from_module_to_account(ERC20_MODULE_ADDRESS, holder, DENOM, U256::from(50))
            .unwrap();
        ctx.send_from_account_to_module(holder, ERC20_MODULE_ADDRESS, DENOM, U256::from(20))
            .unwrap();
        ctx.burn_coins(ERC20_MODULE_ADDRESS, DENOM, U256::from(20))
            .unwrap();

        assert_eq!(ctx.total_supply(DENOM).unwrap(), U256::from(30));
        assert_eq!(ctx.balance(holder, DENOM).unwrap(), U256::from(30));
    }

    #[test]
    fn overdraft_reports_both_amounts() {
        let holder = address!("0x00000000000000000000000000000000000000a3");
        let other = address!("0x00000000000000000000000000000000000000b3");
        let mut store = MemoryStore::default();
        let mut ctx = LedgerContext::new(&mut store, u64::MAX, KvGasConfig::free());

        let err = ctx.send(holder, other, DENOM, U256::from(5)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "spendable balance 0xmpl is smaller than 5xmpl: insufficient funds"
        );
        assert!(matches!(err, LedgerError::InsufficientFunds { address, .. } if address == holder));
    }

    #[test]
    fn self_send_keeps_balance() {
        let holder = address!("0x00000000000000000000000000000000000000a4");
        let mut store = MemoryStore::default();
        let mut ctx = LedgerContext::new(&mut store, u64::MAX, KvGasConfig::free());

        ctx.mint_coins(ERC20_MODULE_ADDRESS, DENOM, U256::from(10))
            .unwrap();
        ctx.send_from_module_to_account(ERC20_MODULE_ADDRESS, holder, DENOM, U256::from(10))
            .unwrap();
        ctx.send(holder, holder, DENOM, U256::from(10)).unwrap();

        assert_eq!(ctx.balance(holder, DENOM).unwrap(), U256::from(10));
    }
}
