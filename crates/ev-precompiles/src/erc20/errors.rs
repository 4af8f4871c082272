use crate::ledger::LedgerError;
use alloy_evm::revm::precompile::PrecompileError;
use alloy_primitives::U256;

/// Failure of a single precompile call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Erc20Error {
    /// Value was attached to the call.
    #[error("cannot receive funds, received: {0}")]
    CannotReceiveFunds(U256),
    /// Calldata shorter than a selector.
    #[error("invalid input length: {0}")]
    InputTooShort(usize),
    /// Selector matches no method.
    #[error("unknown method: {0}")]
    UnknownMethod(String),
    /// Arguments do not match the method signature.
    #[error("failed to decode {method} arguments: {reason}")]
    Decode {
        /// Method being decoded.
        method: &'static str,
        /// Decoder message.
        reason: String,
    },
    /// Transaction attempted under a read-only call.
    #[error("write protection")]
    WriteProtection,
    /// Wrong number of arguments.
    #[error("invalid number of arguments; expected {expected}; got: {got}")]
    InvalidArgCount {
        /// Arguments the method takes.
        expected: usize,
        /// Arguments supplied.
        got: usize,
    },
    /// An address argument is malformed.
    #[error("invalid {role} address: {value}")]
    InvalidAddress {
        /// Parameter the address was passed as.
        role: &'static str,
        /// Offending value.
        value: String,
    },
    /// An amount argument is not an integer.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// An amount argument is zero or negative.
    #[error("coin {amount}{denom} amount is not positive")]
    NonPositiveAmount {
        /// Offending amount.
        amount: String,
        /// Denomination of the token pair.
        denom: String,
    },
    /// Sender balance below the transfer amount.
    #[error("ERC20: transfer amount exceeds balance (balance {balance}, amount {amount})")]
    TransferAmountExceedsBalance {
        /// Balance of the sender.
        balance: U256,
        /// Amount requested.
        amount: U256,
    },
    /// Holder balance below the burn amount.
    #[error("ERC20: burn amount exceeds balance (balance {balance}, amount {amount})")]
    BurnAmountExceedsBalance {
        /// Balance of the holder.
        balance: U256,
        /// Amount requested.
        amount: U256,
    },
    /// The caller's grant does not cover the transfer.
    #[error("ERC20: insufficient allowance (requested {requested}, remaining {remaining})")]
    InsufficientAllowance {
        /// Amount requested.
        requested: U256,
        /// Limit left on the grant.
        remaining: U256,
    },
    /// Allowance would go below zero.
    #[error("subtracted value cannot be greater than existing allowance: {subtracted} > {remaining}")]
    DecreasedAllowanceBelowZero {
        /// Amount subtracted.
        subtracted: U256,
        /// Allowance before the subtraction.
        remaining: U256,
    },
    /// Mint by someone other than the token-pair owner.
    #[error("minter is not the owner")]
    MinterIsNotOwner,
    /// Owner-only method called by someone else.
    #[error("sender is not the owner")]
    SenderIsNotOwner,
    /// Approval where the spender is the caller.
    #[error("spender cannot be the owner")]
    SelfApproval,
    /// Display metadata was not registered for the denomination.
    #[error("metadata for denom {0} not found")]
    MetadataNotFound(String),
    /// Remaining call gas cannot cover the ledger cost.
    #[error("out of gas")]
    OutOfGas,
    /// Ledger failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl Erc20Error {
    /// Whether the error is gas exhaustion, from either gas counter.
    pub const fn is_out_of_gas(&self) -> bool {
        match self {
            Self::OutOfGas => true,
            Self::Ledger(err) => err.is_out_of_gas(),
            _ => false,
        }
    }
}

impl From<Erc20Error> for PrecompileError {
    fn from(err: Erc20Error) -> Self {
        if err.is_out_of_gas() {
            Self::OutOfGas
        } else {
            Self::Other(err.to_string().into())
        }
    }
}
