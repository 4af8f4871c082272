//! Baseline precompile set the ERC-20 precompiles are installed next to.

use alloy_primitives::Address;
use revm::precompile::Precompiles;
use std::sync::OnceLock;

/// Every precompile the chain can activate.
pub fn available_precompiles() -> &'static Precompiles {
    static INSTANCE: OnceLock<Precompiles> = OnceLock::new();
    INSTANCE.get_or_init(|| Precompiles::prague().clone())
}

/// The subset of [`available_precompiles`] at `addresses`, in the given order.
///
/// # Panics
///
/// Panics when an address has no available precompile. The active list comes
/// from chain configuration, so an unknown entry is a configuration fault.
pub fn active_precompiles(addresses: &[Address]) -> Precompiles {
    let available = available_precompiles();
    let mut active = Precompiles::default();
    for address in addresses {
        let Some(precompile) = available.get(address) else {
            panic!("precompiled contract not initialized: {address}");
        };
        active.extend([precompile.clone()]);
    }
    active
}
