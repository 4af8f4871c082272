//! Helpers for wrapping Reth EVM factories with the ERC-20 precompiles.

use crate::precompiles::{active_precompiles, available_precompiles};
use alloy_evm::{
    eth::{EthBlockExecutorFactory, EthEvm, EthEvmContext, EthEvmFactory},
    precompiles::{DynPrecompile, Precompile, PrecompilesMap},
    Database, Evm, EvmEnv, EvmFactory,
};
use alloy_primitives::Address;
use ev_precompiles::erc20::Erc20Precompile;
use reth_evm_ethereum::EthEvmConfig;
use reth_revm::{
    inspector::NoOpInspector,
    revm::{
        context::{
            result::{EVMError, HaltReason},
            BlockEnv, TxEnv,
        },
        context_interface::result::InvalidTransaction,
        primitives::hardfork::SpecId,
        Inspector,
    },
};
use std::sync::Arc;

/// Wrapper around an existing `EvmFactory` that installs one ERC-20
/// precompile per registered token pair.
#[derive(Debug, Clone)]
pub struct EvEvmFactory<F> {
    inner: F,
    erc20: Arc<[Arc<Erc20Precompile>]>,
    active_precompiles: Option<Arc<[Address]>>,
}

impl<F> EvEvmFactory<F> {
    /// Creates a factory that adds nothing to `inner`.
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            erc20: Arc::new([]),
            active_precompiles: None,
        }
    }

    /// Installs `precompiles`, each at its token pair's contract address.
    pub fn with_erc20(
        mut self,
        precompiles: impl IntoIterator<Item = Erc20Precompile>,
    ) -> Self {
        self.erc20 = precompiles.into_iter().map(Arc::new).collect();
        self
    }

    /// Keeps only the baseline precompiles at `addresses`.
    ///
    /// Creating an EVM panics if an address has no baseline precompile.
    pub fn with_active_precompiles(
        mut self,
        addresses: impl IntoIterator<Item = Address>,
    ) -> Self {
        self.active_precompiles = Some(addresses.into_iter().collect());
        self
    }

    /// ERC-20 precompiles installed into every EVM.
    pub fn erc20_precompiles(&self) -> impl Iterator<Item = &Erc20Precompile> {
        self.erc20.iter().map(Arc::as_ref)
    }

    fn restrict_to_active(&self, precompiles: &mut PrecompilesMap) {
        let Some(active) = self.active_precompiles.as_deref() else { return };
        let active = active_precompiles(active);

        for address in available_precompiles().addresses() {
            if !active.contains(address) {
                precompiles.apply_precompile(address, |_| None);
            }
        }
    }

    fn install_erc20_precompiles(&self, precompiles: &mut PrecompilesMap) {
        for erc20 in self.erc20.iter() {
            let address = erc20.address();
            let id = erc20.precompile_id().clone();
            let erc20 = Arc::clone(erc20);

            precompiles.apply_precompile(&address, move |_| {
                Some(DynPrecompile::new_stateful(id, move |input| erc20.call(input)))
            });
            tracing::debug!(target: "ev_revm", ?address, "installed ERC-20 precompile");
        }
    }

    fn configure(&self, precompiles: &mut PrecompilesMap) {
        self.restrict_to_active(precompiles);
        self.install_erc20_precompiles(precompiles);
    }
}

impl EvmFactory for EvEvmFactory<EthEvmFactory> {
    type Evm<DB: Database, I: Inspector<Self::Context<DB>>> = EthEvm<DB, I, PrecompilesMap>;
    type Context<DB: Database> = EthEvmContext<DB>;
    type Tx = TxEnv;
    type Error<DBError: std::error::Error + Send + Sync + 'static> =
        EVMError<DBError, InvalidTransaction>;
    type HaltReason = HaltReason;
    type Spec = SpecId;
    type BlockEnv = BlockEnv;
    type Precompiles = PrecompilesMap;

    fn create_evm<DB: Database>(
        &self,
        db: DB,
        evm_env: EvmEnv<Self::Spec, Self::BlockEnv>,
    ) -> Self::Evm<DB, NoOpInspector> {
        let mut evm = self.inner.create_evm(db, evm_env);
        self.configure(evm.components_mut().2);
        evm
    }

    fn create_evm_with_inspector<DB: Database, I: Inspector<Self::Context<DB>>>(
        &self,
        db: DB,
        input: EvmEnv<Self::Spec, Self::BlockEnv>,
        inspector: I,
    ) -> Self::Evm<DB, I> {
        let mut evm = self.inner.create_evm_with_inspector(db, input, inspector);
        self.configure(evm.components_mut().2);
        evm
    }
}

/// Wraps an [`EthEvmConfig`] so that its EVMs serve `precompiles`.
///
/// `active_precompiles`, when set, restricts the baseline set to those
/// addresses.
pub fn with_erc20_precompiles<ChainSpec>(
    config: EthEvmConfig<ChainSpec, EthEvmFactory>,
    precompiles: Vec<Erc20Precompile>,
    active_precompiles: Option<Vec<Address>>,
) -> EthEvmConfig<ChainSpec, EvEvmFactory<EthEvmFactory>> {
    let EthEvmConfig {
        executor_factory,
        block_assembler,
    } = config;

    let mut wrapped_factory =
        EvEvmFactory::new(*executor_factory.evm_factory()).with_erc20(precompiles);
    if let Some(active) = active_precompiles {
        wrapped_factory = wrapped_factory.with_active_precompiles(active);
    }
    tracing::info!(
        target: "ev_revm",
        erc20_precompiles = wrapped_factory.erc20.len(),
        restricted = wrapped_factory.active_precompiles.is_some(),
        "wrapped EVM factory"
    );

    let new_executor_factory = EthBlockExecutorFactory::new(
        *executor_factory.receipt_builder(),
        executor_factory.spec().clone(),
        wrapped_factory,
    );

    EthEvmConfig {
        executor_factory: new_executor_factory,
        block_assembler,
    }
}
