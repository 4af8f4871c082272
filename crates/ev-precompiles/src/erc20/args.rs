//! Argument validation shared by the handlers.
//!
//! Handlers check, in order: argument count, address arguments, amount
//! arguments. Business rules come after all three.

use super::errors::Erc20Error;
use alloy::dyn_abi::DynSolValue;
use alloy_primitives::{Address, I256, U256};

/// An integer argument before its sign is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Amount {
    Unsigned(U256),
    Negative(I256),
}

impl Amount {
    /// Requires a strictly positive amount.
    pub(crate) fn positive(self, denom: &str) -> Result<U256, Erc20Error> {
        match self {
            Self::Unsigned(value) if !value.is_zero() => Ok(value),
            other => Err(other.not_positive(denom)),
        }
    }

    /// Requires a non-negative amount.
    pub(crate) fn non_negative(self, denom: &str) -> Result<U256, Erc20Error> {
        match self {
            Self::Unsigned(value) => Ok(value),
            other => Err(other.not_positive(denom)),
        }
    }

    fn not_positive(self, denom: &str) -> Erc20Error {
        let amount = match self {
            Self::Unsigned(value) => value.to_string(),
            Self::Negative(value) => value.to_string(),
        };
        Erc20Error::NonPositiveAmount {
            amount,
            denom: denom.to_string(),
        }
    }
}

pub(crate) fn check_arg_count(args: &[DynSolValue], expected: usize) -> Result<(), Erc20Error> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(Erc20Error::InvalidArgCount {
            expected,
            got: args.len(),
        })
    }
}

pub(crate) fn parse_address(arg: &DynSolValue, role: &'static str) -> Result<Address, Erc20Error> {
    match arg {
        DynSolValue::Address(address) => Ok(*address),
        other => Err(Erc20Error::InvalidAddress {
            role,
            value: describe(other),
        }),
    }
}

pub(crate) fn parse_amount(arg: &DynSolValue) -> Result<Amount, Erc20Error> {
    match arg {
        DynSolValue::Uint(value, _) => Ok(Amount::Unsigned(*value)),
        DynSolValue::Int(value, _) if value.is_negative() => Ok(Amount::Negative(*value)),
        DynSolValue::Int(value, _) => Ok(Amount::Unsigned(value.into_raw())),
        other => Err(Erc20Error::InvalidAmount(describe(other))),
    }
}

fn describe(value: &DynSolValue) -> String {
    match value {
        DynSolValue::String(s) => format!("{s:?}"),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn count_mismatch_quotes_both_numbers() {
        let err = check_arg_count(&[], 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid number of arguments; expected 1; got: 0"
        );
    }

    #[test]
    fn address_role_is_named() {
        let to = address!("0x00000000000000000000000000000000000000b1");
        assert_eq!(
            parse_address(&DynSolValue::Address(to), "to").unwrap(),
            to
        );

        let err = parse_address(&DynSolValue::String(String::new()), "new owner").unwrap_err();
        assert!(err.to_string().starts_with("invalid new owner address"));
    }

    #[test]
    fn amounts() {
        let positive = parse_amount(&DynSolValue::Uint(U256::from(5), 256)).unwrap();
        assert_eq!(positive.positive("xmpl").unwrap(), U256::from(5));

        let zero = parse_amount(&DynSolValue::Uint(U256::ZERO, 256)).unwrap();
        assert_eq!(
            zero.positive("xmpl").unwrap_err().to_string(),
            "coin 0xmpl amount is not positive"
        );
        assert_eq!(zero.non_negative("xmpl").unwrap(), U256::ZERO);

        let negative = parse_amount(&DynSolValue::Int(I256::MINUS_ONE, 256)).unwrap();
        assert_eq!(
            negative.positive("xmpl").unwrap_err().to_string(),
            "coin -1xmpl amount is not positive"
        );

        let err = parse_amount(&DynSolValue::String(String::new())).unwrap_err();
        assert!(err.to_string().starts_with("invalid amount"));
    }
}
