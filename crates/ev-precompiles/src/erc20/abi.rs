//! ABI surface of the ERC-20 precompile and selector dispatch.

use super::errors::Erc20Error;
use alloy::{
    dyn_abi::{DynSolType, DynSolValue},
    sol,
    sol_types::SolCall,
};
use alloy_primitives::hex;
use std::fmt;

sol! {
    /// ERC-20 interface served by every token-pair precompile.
    interface IERC20Precompile {
        event Transfer(address indexed from, address indexed to, uint256 value);
        event Approval(address indexed owner, address indexed spender, uint256 value);
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);

        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function owner() external view returns (address);

        function transfer(address to, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
        function increaseAllowance(address spender, uint256 addedValue) external returns (bool);
        function decreaseAllowance(address spender, uint256 subtractedValue) external returns (bool);
        function mint(address to, uint256 amount) external returns (bool);
        // Overloads are generated as `burn_0Call` and `burn_1Call`.
        function burn(uint256 amount) external;
        function burn(address spender, uint256 amount) external;
        function burnFrom(address from, uint256 amount) external;
        function transferOwnership(address newOwner) external;
    }
}

/// Every method the precompile serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `name()`
    Name,
    /// `symbol()`
    Symbol,
    /// `decimals()`
    Decimals,
    /// `totalSupply()`
    TotalSupply,
    /// `balanceOf(address)`
    BalanceOf,
    /// `allowance(address,address)`
    Allowance,
    /// `owner()`
    Owner,
    /// `transfer(address,uint256)`
    Transfer,
    /// `transferFrom(address,address,uint256)`
    TransferFrom,
    /// `approve(address,uint256)`
    Approve,
    /// `increaseAllowance(address,uint256)`
    IncreaseAllowance,
    /// `decreaseAllowance(address,uint256)`
    DecreaseAllowance,
    /// `mint(address,uint256)`
    Mint,
    /// `burn(uint256)`
    Burn,
    /// `burn(address,uint256)`, the owner-only burn.
    Burn0,
    /// `burnFrom(address,uint256)`
    BurnFrom,
    /// `transferOwnership(address)`
    TransferOwnership,
}

const NO_ARGS: &[DynSolType] = &[];
const ADDRESS: &[DynSolType] = &[DynSolType::Address];
const AMOUNT: &[DynSolType] = &[DynSolType::Uint(256)];
const ADDRESS_AMOUNT: &[DynSolType] = &[DynSolType::Address, DynSolType::Uint(256)];
const ADDRESS_ADDRESS: &[DynSolType] = &[DynSolType::Address, DynSolType::Address];
const ADDRESS_ADDRESS_AMOUNT: &[DynSolType] =
    &[DynSolType::Address, DynSolType::Address, DynSolType::Uint(256)];

impl Method {
    /// All methods, queries first.
    pub const ALL: [Self; 17] = [
        Self::Name,
        Self::Symbol,
        Self::Decimals,
        Self::TotalSupply,
        Self::BalanceOf,
        Self::Allowance,
        Self::Owner,
        Self::Transfer,
        Self::TransferFrom,
        Self::Approve,
        Self::IncreaseAllowance,
        Self::DecreaseAllowance,
        Self::Mint,
        Self::Burn,
        Self::Burn0,
        Self::BurnFrom,
        Self::TransferOwnership,
    ];

    /// Four-byte selector of the method.
    pub const fn selector(self) -> [u8; 4] {
        use IERC20Precompile as I;
        match self {
            Self::Name => I::nameCall::SELECTOR,
            Self::Symbol => I::symbolCall::SELECTOR,
            Self::Decimals => I::decimalsCall::SELECTOR,
            Self::TotalSupply => I::totalSupplyCall::SELECTOR,
            Self::BalanceOf => I::balanceOfCall::SELECTOR,
            Self::Allowance => I::allowanceCall::SELECTOR,
            Self::Owner => I::ownerCall::SELECTOR,
            Self::Transfer => I::transferCall::SELECTOR,
            Self::TransferFrom => I::transferFromCall::SELECTOR,
            Self::Approve => I::approveCall::SELECTOR,
            Self::IncreaseAllowance => I::increaseAllowanceCall::SELECTOR,
            Self::DecreaseAllowance => I::decreaseAllowanceCall::SELECTOR,
            Self::Mint => I::mintCall::SELECTOR,
            Self::Burn => I::burn_0Call::SELECTOR,
            Self::Burn0 => I::burn_1Call::SELECTOR,
            Self::BurnFrom => I::burnFromCall::SELECTOR,
            Self::TransferOwnership => I::transferOwnershipCall::SELECTOR,
        }
    }

    /// Method with the given selector.
    pub fn from_selector(selector: [u8; 4]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|method| method.selector() == selector)
    }

    /// ABI name of the method. The owner-only burn is named `burn0`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Symbol => "symbol",
            Self::Decimals => "decimals",
            Self::TotalSupply => "totalSupply",
            Self::BalanceOf => "balanceOf",
            Self::Allowance => "allowance",
            Self::Owner => "owner",
            Self::Transfer => "transfer",
            Self::TransferFrom => "transferFrom",
            Self::Approve => "approve",
            Self::IncreaseAllowance => "increaseAllowance",
            Self::DecreaseAllowance => "decreaseAllowance",
            Self::Mint => "mint",
            Self::Burn => "burn",
            Self::Burn0 => "burn0",
            Self::BurnFrom => "burnFrom",
            Self::TransferOwnership => "transferOwnership",
        }
    }

    /// Method with the given ABI name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.name() == name)
    }

    /// Whether the method mutates the ledger.
    ///
    /// Transactions are refused under a read-only call.
    pub const fn is_transaction(self) -> bool {
        match self {
            Self::Name
            | Self::Symbol
            | Self::Decimals
            | Self::TotalSupply
            | Self::BalanceOf
            | Self::Allowance
            | Self::Owner => false,
            Self::Transfer
            | Self::TransferFrom
            | Self::Approve
            | Self::IncreaseAllowance
            | Self::DecreaseAllowance
            | Self::Mint
            | Self::Burn
            | Self::Burn0
            | Self::BurnFrom
            | Self::TransferOwnership => true,
        }
    }

    /// Parameter types, in order.
    pub const fn input_types(self) -> &'static [DynSolType] {
        match self {
            Self::Name | Self::Symbol | Self::Decimals | Self::TotalSupply | Self::Owner => NO_ARGS,
            Self::BalanceOf | Self::TransferOwnership => ADDRESS,
            Self::Burn => AMOUNT,
            Self::Allowance => ADDRESS_ADDRESS,
            Self::TransferFrom => ADDRESS_ADDRESS_AMOUNT,
            Self::Transfer
            | Self::Approve
            | Self::IncreaseAllowance
            | Self::DecreaseAllowance
            | Self::Mint
            | Self::Burn0
            | Self::BurnFrom => ADDRESS_AMOUNT,
        }
    }

    /// Decodes the ABI-encoded parameters that follow the selector.
    pub fn decode_args(self, data: &[u8]) -> Result<Vec<DynSolValue>, Erc20Error> {
        let types = self.input_types();
        if types.is_empty() {
            return Ok(Vec::new());
        }
        let decoded = DynSolType::Tuple(types.to_vec())
            .abi_decode_params(data)
            .map_err(|err| Erc20Error::Decode {
                method: self.name(),
                reason: err.to_string(),
            })?;
        match decoded {
            DynSolValue::Tuple(values) => Ok(values),
            value => Ok(vec![value]),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Splits calldata into the called method and its decoded arguments.
pub fn decode_call(input: &[u8]) -> Result<(Method, Vec<DynSolValue>), Erc20Error> {
    let Some((selector, data)) = input.split_first_chunk::<4>() else {
        return Err(Erc20Error::InputTooShort(input.len()));
    };
    let method = Method::from_selector(*selector)
        .ok_or_else(|| Erc20Error::UnknownMethod(hex::encode_prefixed(selector)))?;
    let args = method.decode_args(data)?;
    Ok((method, args))
}
