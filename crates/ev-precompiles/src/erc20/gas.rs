//! Fixed gas charged per method before any ledger access.

use super::abi::Method;

/// `transfer`, `transferFrom` and every burn variant.
pub const GAS_TRANSFER: u64 = 3_000_000;
/// `approve`
pub const GAS_APPROVE: u64 = 30_956;
/// `increaseAllowance`
pub const GAS_INCREASE_ALLOWANCE: u64 = 34_605;
/// `decreaseAllowance`
pub const GAS_DECREASE_ALLOWANCE: u64 = 34_519;
/// `mint`
pub const GAS_MINT: u64 = 50_000;
/// `transferOwnership`
pub const GAS_TRANSFER_OWNERSHIP: u64 = 25_000;
/// `name`
pub const GAS_NAME: u64 = 3_421;
/// `symbol`
pub const GAS_SYMBOL: u64 = 3_464;
/// `decimals`
pub const GAS_DECIMALS: u64 = 427;
/// `totalSupply`
pub const GAS_TOTAL_SUPPLY: u64 = 2_477;
/// `balanceOf`
pub const GAS_BALANCE_OF: u64 = 2_851;
/// `allowance`
pub const GAS_ALLOWANCE: u64 = 3_246;
/// `owner`, a single slot read like `totalSupply`.
pub const GAS_OWNER: u64 = GAS_TOTAL_SUPPLY;

impl Method {
    /// Fixed cost of the method.
    pub const fn required_gas(self) -> u64 {
        match self {
            Self::Transfer | Self::TransferFrom | Self::Burn | Self::Burn0 | Self::BurnFrom => {
                GAS_TRANSFER
            }
            Self::Approve => GAS_APPROVE,
            Self::IncreaseAllowance => GAS_INCREASE_ALLOWANCE,
            Self::DecreaseAllowance => GAS_DECREASE_ALLOWANCE,
            Self::Mint => GAS_MINT,
            Self::TransferOwnership => GAS_TRANSFER_OWNERSHIP,
            Self::Name => GAS_NAME,
            Self::Symbol => GAS_SYMBOL,
            Self::Decimals => GAS_DECIMALS,
            Self::TotalSupply => GAS_TOTAL_SUPPLY,
            Self::BalanceOf => GAS_BALANCE_OF,
            Self::Allowance => GAS_ALLOWANCE,
            Self::Owner => GAS_OWNER,
        }
    }
}
