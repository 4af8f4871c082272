//! Spending grants: a grantee may move up to a limit of a granter's coins.

use super::{grant_expiration_key, grant_limit_key, LedgerContext, LedgerError, LedgerStore};
use alloy_primitives::{Address, U256};

/// Permission for `grantee` to spend up to `spend_limit` of `granter`'s
/// `denom` coins until `expiration`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendingGrant {
    /// Owner of the coins.
    pub granter: Address,
    /// Account allowed to spend them.
    pub grantee: Address,
    /// Denomination covered by the grant.
    pub denom: String,
    /// Amount still spendable.
    pub spend_limit: U256,
    /// Unix time after which the grant is void.
    pub expiration: Option<u64>,
}

impl SpendingGrant {
    /// Whether the grant is void at `now`.
    pub fn is_expired(&self, now: u64) -> bool {
        self.expiration.is_some_and(|expiration| expiration <= now)
    }
}

impl<S: LedgerStore + ?Sized> LedgerContext<'_, S> {
    /// Live grant from `granter` to `grantee`, if any.
    ///
    /// Grants with a zero limit or an expiration at or before the block time
    /// are reported as absent.
    pub fn get_grant(
        &mut self,
        granter: Address,
        grantee: Address,
        denom: &str,
    ) -> Result<Option<SpendingGrant>, LedgerError> {
        let spend_limit = self.read(grant_limit_key(granter, grantee, denom))?;
        if spend_limit.is_zero() {
            return Ok(None);
        }
        let expiration = self.read(grant_expiration_key(granter, grantee, denom))?;
        let grant = SpendingGrant {
            granter,
            grantee,
            denom: denom.to_string(),
            spend_limit,
            expiration: (!expiration.is_zero()).then(|| expiration.saturating_to()),
        };
        if grant.is_expired(self.block_time()) {
            tracing::debug!(target: "ledger", ?granter, ?grantee, denom, "grant expired");
            return Ok(None);
        }
        Ok(Some(grant))
    }

    /// Stores `grant`, replacing any previous grant for the same triple.
    pub fn save_grant(&mut self, grant: &SpendingGrant) -> Result<(), LedgerError> {
        let SpendingGrant {
            granter,
            grantee,
            denom,
            spend_limit,
            expiration,
        } = grant;
        self.write(grant_limit_key(*granter, *grantee, denom), *spend_limit)?;
        self.write(
            grant_expiration_key(*granter, *grantee, denom),
            U256::from(expiration.unwrap_or_default()),
        )?;
        tracing::debug!(
            target: "ledger",
            ?granter,
            ?grantee,
            denom = %denom,
            %spend_limit,
            ?expiration,
            "grant saved"
        );
        Ok(())
    }

    /// Removes the grant from `granter` to `grantee`.
    pub fn delete_grant(
        &mut self,
        granter: Address,
        grantee: Address,
        denom: &str,
    ) -> Result<(), LedgerError> {
        self.write(grant_limit_key(granter, grantee, denom), U256::ZERO)?;
        self.write(grant_expiration_key(granter, grantee, denom), U256::ZERO)?;
        tracing::debug!(target: "ledger", ?granter, ?grantee, denom, "grant deleted");
        Ok(())
    }

    /// Spends `amount` from the grant and returns the limit left.
    ///
    /// A grant drained to zero is deleted.
    pub fn consume_grant(
        &mut self,
        granter: Address,
        grantee: Address,
        denom: &str,
        amount: U256,
    ) -> Result<U256, LedgerError> {
        let remaining = match self.get_grant(granter, grantee, denom)? {
            Some(grant) => grant.spend_limit,
            None => U256::ZERO,
        };
        let Some(left) = remaining.checked_sub(amount) else {
            tracing::warn!(
                target: "ledger",
                ?granter,
                ?grantee,
                denom,
                %amount,
                %remaining,
                "spend limit exceeded"
            );
            return Err(LedgerError::SpendLimitExceeded {
                granter,
                grantee,
                requested: amount,
                remaining,
            });
        };
        if left.is_zero() {
            self.delete_grant(granter, grantee, denom)?;
        } else {
            self.write(grant_limit_key(granter, grantee, denom), left)?;
        }
        Ok(left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{KvGasConfig, MemoryStore};
    use alloy_primitives::address;

    const DENOM: &str = "xmpl";
    const GRANTER: Address = address!("0x00000000000000000000000000000000000000a1");
    const GRANTEE: Address = address!("0x00000000000000000000000000000000000000b1");

    fn grant(limit: u64, expiration: Option<u64>) -> SpendingGrant {
        SpendingGrant {
            granter: GRANTER,
            grantee: GRANTEE,
            denom: DENOM.to_string(),
            spend_limit: U256::from(limit),
            expiration,
        }
    }

    #[test]
    fn saved_grant_reads_back() {
        let mut store = MemoryStore::at_block_time(100);
        let mut ctx = LedgerContext::new(&mut store, u64::MAX, KvGasConfig::free());

        ctx.save_grant(&grant(300, Some(200))).unwrap();
        assert_eq!(
            ctx.get_grant(GRANTER, GRANTEE, DENOM).unwrap(),
            Some(grant(300, Some(200)))
        );
        assert_eq!(ctx.get_grant(GRANTEE, GRANTER, DENOM).unwrap(), None);
    }

    #[test]
    fn expired_grant_is_absent() {
        let mut store = MemoryStore::at_block_time(200);
        let mut ctx = LedgerContext::new(&mut store, u64::MAX, KvGasConfig::free());

        ctx.save_grant(&grant(300, Some(200))).unwrap();
        assert_eq!(ctx.get_grant(GRANTER, GRANTEE, DENOM).unwrap(), None);

        let err = ctx
            .consume_grant(GRANTER, GRANTEE, DENOM, U256::from(1))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::SpendLimitExceeded { remaining, .. } if remaining.is_zero()
        ));
    }

    #[test]
    fn consume_decrements_then_deletes() {
        let mut store = MemoryStore::default();
        let mut ctx = LedgerContext::new(&mut store, u64::MAX, KvGasConfig::free());
        ctx.save_grant(&grant(300, None)).unwrap();

        let left = ctx
            .consume_grant(GRANTER, GRANTEE, DENOM, U256::from(100))
            .unwrap();
        assert_eq!(left, U256::from(200));

        let err = ctx
            .consume_grant(GRANTER, GRANTEE, DENOM, U256::from(250))
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::SpendLimitExceeded {
                granter: GRANTER,
                grantee: GRANTEE,
                requested: U256::from(250),
                remaining: U256::from(200),
            }
        );

        let left = ctx
            .consume_grant(GRANTER, GRANTEE, DENOM, U256::from(200))
            .unwrap();
        assert!(left.is_zero());
        assert_eq!(ctx.get_grant(GRANTER, GRANTEE, DENOM).unwrap(), None);
    }
}
