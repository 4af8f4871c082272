use crate::{
    erc20::{Erc20Precompile, DEFAULT_APPROVAL_EXPIRATION_SECS},
    ledger::KvGasConfig,
    token_pair::{DenomMetadata, RegistryError, TokenPair, TokenPairRegistry},
};
use eyre::WrapErr;
use serde::{Deserialize, Serialize};
use std::{env::VarError, path::Path};

/// Path to the JSON file listing the token pairs.
pub const TOKEN_PAIRS_ENV: &str = "EV_ERC20_TOKEN_PAIRS";
/// Optional override of the approval lifetime, in seconds.
pub const APPROVAL_EXPIRATION_ENV: &str = "EV_ERC20_APPROVAL_EXPIRATION_SECS";

/// Errors in an otherwise well-formed configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Two pairs collide or a pair is malformed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// Approvals would expire in the block that grants them.
    #[error("approval expiration must be positive")]
    ZeroApprovalExpiration,
}

/// A token pair entry of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPairConfig {
    /// The pair itself.
    #[serde(flatten)]
    pub pair: TokenPair,
    /// Display metadata served by `name`, `symbol` and `decimals`.
    #[serde(default)]
    pub metadata: Option<DenomMetadata>,
}

/// Configuration for the ERC-20 precompiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc20Config {
    /// Pairs to install, one precompile each.
    #[serde(default)]
    pub token_pairs: Vec<TokenPairConfig>,
    /// How long an approval stays valid after the block that grants it.
    #[serde(default = "default_approval_expiration")]
    pub approval_expiration_secs: u64,
    /// Gas charged for ledger storage access.
    #[serde(default)]
    pub kv_gas: KvGasConfig,
}

const fn default_approval_expiration() -> u64 {
    DEFAULT_APPROVAL_EXPIRATION_SECS
}

impl Default for Erc20Config {
    fn default() -> Self {
        Self {
            token_pairs: Vec::new(),
            approval_expiration_secs: DEFAULT_APPROVAL_EXPIRATION_SECS,
            kv_gas: KvGasConfig::default(),
        }
    }
}

impl Erc20Config {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> eyre::Result<Self> {
        let config: Self =
            serde_json::from_str(json).wrap_err("failed to parse ERC-20 precompile config")?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&json).wrap_err_with(|| format!("invalid config in {}", path.display()))
    }

    /// Creates a new `Erc20Config` from environment variables.
    ///
    /// [`TOKEN_PAIRS_ENV`] names the JSON file; [`APPROVAL_EXPIRATION_ENV`],
    /// when set, overrides the approval lifetime it carries.
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key))
    }

    fn from_lookup(var: impl Fn(&str) -> Result<String, VarError>) -> eyre::Result<Self> {
        let path = var(TOKEN_PAIRS_ENV).wrap_err_with(|| format!("{TOKEN_PAIRS_ENV} not set"))?;
        let mut config = Self::from_file(path)?;

        match var(APPROVAL_EXPIRATION_ENV) {
            Ok(secs) => {
                config.approval_expiration_secs = secs
                    .trim()
                    .parse()
                    .wrap_err_with(|| format!("invalid {APPROVAL_EXPIRATION_ENV}"))?;
                config.validate()?;
            }
            Err(VarError::NotPresent) => {}
            Err(err) => {
                return Err(err).wrap_err_with(|| format!("invalid {APPROVAL_EXPIRATION_ENV}"))
            }
        }

        tracing::info!(
            target: "erc20_precompile",
            token_pairs = config.token_pairs.len(),
            approval_expiration_secs = config.approval_expiration_secs,
            "loaded ERC-20 precompile config"
        );
        Ok(config)
    }

    /// Checks the configuration without building anything from it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.approval_expiration_secs == 0 {
            return Err(ConfigError::ZeroApprovalExpiration);
        }
        self.registry().map(|_| ())
    }

    /// Registry of the configured pairs.
    pub fn registry(&self) -> Result<TokenPairRegistry, ConfigError> {
        let mut registry = TokenPairRegistry::new();
        for entry in &self.token_pairs {
            registry.register(entry.pair.clone(), entry.metadata.clone())?;
        }
        Ok(registry)
    }

    /// One precompile per configured pair, ordered by contract address.
    pub fn precompiles(&self) -> Result<Vec<Erc20Precompile>, ConfigError> {
        self.validate()?;
        Ok(self
            .registry()?
            .iter()
            .map(|(pair, metadata)| {
                Erc20Precompile::new(pair.clone(), metadata.cloned())
                    .with_kv_gas(self.kv_gas)
                    .with_approval_expiration(self.approval_expiration_secs)
            })
            .collect())
    }
}
