//! Mapping between ERC-20 contract addresses and native denominations.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Who controls the supply of a token pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    /// Coin native to the chain, owned by the erc20 module.
    Module,
    /// Token registered from an external contract.
    External,
}

/// A registered ERC-20 contract address bound to a native denomination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Contract address the precompile is installed at.
    pub erc20_address: Address,
    /// Native denomination backing the token.
    pub denom: String,
    /// Who controls the supply.
    pub owner_kind: OwnerKind,
    /// Account allowed to mint, burn on behalf of others and transfer ownership.
    #[serde(default)]
    pub owner_address: Address,
}

impl TokenPair {
    /// Creates a module-owned pair with no owner account.
    pub fn new(erc20_address: Address, denom: impl Into<String>) -> Self {
        Self {
            erc20_address,
            denom: denom.into(),
            owner_kind: OwnerKind::Module,
            owner_address: Address::ZERO,
        }
    }

    /// Sets the owner account at genesis.
    pub fn with_owner(mut self, owner_kind: OwnerKind, owner_address: Address) -> Self {
        self.owner_kind = owner_kind;
        self.owner_address = owner_address;
        self
    }
}

/// Display metadata of a denomination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenomMetadata {
    /// Token name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Decimal places of the display unit.
    pub decimals: u8,
}

/// Errors raised while building a [`TokenPairRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The contract address is already bound.
    #[error("token pair already registered at {0}")]
    DuplicateAddress(Address),
    /// The denomination is already bound.
    #[error("token pair already registered for denom {0}")]
    DuplicateDenom(String),
    /// The denomination is empty.
    #[error("token pair at {0} has an empty denom")]
    EmptyDenom(Address),
}

/// Registered token pairs, unique by address and by denomination.
///
/// Pairs are never removed. The registry is built once and then shared
/// read-only between precompile instances.
#[derive(Debug, Clone, Default)]
pub struct TokenPairRegistry {
    pairs: BTreeMap<Address, (TokenPair, Option<DenomMetadata>)>,
    by_denom: HashMap<String, Address>,
}

impl TokenPairRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pair with optional display metadata.
    pub fn register(
        &mut self,
        pair: TokenPair,
        metadata: Option<DenomMetadata>,
    ) -> Result<(), RegistryError> {
        if pair.denom.is_empty() {
            return Err(RegistryError::EmptyDenom(pair.erc20_address));
        }
        if self.pairs.contains_key(&pair.erc20_address) {
            return Err(RegistryError::DuplicateAddress(pair.erc20_address));
        }
        if self.by_denom.contains_key(&pair.denom) {
            return Err(RegistryError::DuplicateDenom(pair.denom));
        }

        tracing::debug!(
            target: "erc20_precompile",
            address = ?pair.erc20_address,
            denom = %pair.denom,
            owner_kind = ?pair.owner_kind,
            "registered token pair"
        );
        self.by_denom.insert(pair.denom.clone(), pair.erc20_address);
        self.pairs.insert(pair.erc20_address, (pair, metadata));
        Ok(())
    }

    /// Pair installed at `address`.
    pub fn get(&self, address: &Address) -> Option<&TokenPair> {
        self.pairs.get(address).map(|(pair, _)| pair)
    }

    /// Display metadata of the pair installed at `address`.
    pub fn metadata(&self, address: &Address) -> Option<&DenomMetadata> {
        self.pairs
            .get(address)
            .and_then(|(_, metadata)| metadata.as_ref())
    }

    /// Pair backed by `denom`.
    pub fn by_denom(&self, denom: &str) -> Option<&TokenPair> {
        self.by_denom.get(denom).and_then(|address| self.get(address))
    }

    /// Pairs with their metadata, ordered by address.
    pub fn iter(&self) -> impl Iterator<Item = (&TokenPair, Option<&DenomMetadata>)> {
        self.pairs
            .values()
            .map(|(pair, metadata)| (pair, metadata.as_ref()))
    }

    /// Number of registered pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no pair is registered.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const XMPL: Address = address!("0x80b5a32e4f032b2a058b4f29ec95eefeeb87adcd");
    const OTHER: Address = address!("0x80b5a32e4f032b2a058b4f29ec95eefeeb87adce");

    #[test]
    fn lookups_by_address_and_denom() {
        let mut registry = TokenPairRegistry::new();
        let metadata = DenomMetadata {
            name: "Example".into(),
            symbol: "XMPL".into(),
            decimals: 18,
        };
        registry
            .register(TokenPair::new(XMPL, "xmpl"), Some(metadata.clone()))
            .unwrap();

        assert_eq!(registry.get(&XMPL).unwrap().denom, "xmpl");
        assert_eq!(registry.by_denom("xmpl").unwrap().erc20_address, XMPL);
        assert_eq!(registry.metadata(&XMPL), Some(&metadata));
        assert!(registry.get(&OTHER).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn rejects_duplicates() {
        let mut registry = TokenPairRegistry::new();
        registry
            .register(TokenPair::new(XMPL, "xmpl"), None)
            .unwrap();

        assert_eq!(
            registry.register(TokenPair::new(XMPL, "other"), None),
            Err(RegistryError::DuplicateAddress(XMPL))
        );
        assert_eq!(
            registry.register(TokenPair::new(OTHER, "xmpl"), None),
            Err(RegistryError::DuplicateDenom("xmpl".into()))
        );
        assert_eq!(
            registry.register(TokenPair::new(OTHER, ""), None),
            Err(RegistryError::EmptyDenom(OTHER))
        );
    }

    #[test]
    fn pair_deserializes_with_snake_case_owner_kind() {
        let pair: TokenPair = serde_json::from_str(
            r#"{
                "erc20_address": "0x80b5a32e4f032b2a058b4f29ec95eefeeb87adcd",
                "denom": "xmpl",
                "owner_kind": "external",
                "owner_address": "0x00000000000000000000000000000000000000a1"
            }"#,
        )
        .unwrap();

        assert_eq!(pair.owner_kind, OwnerKind::External);
        assert_eq!(
            pair.owner_address,
            address!("0x00000000000000000000000000000000000000a1")
        );
    }
}
