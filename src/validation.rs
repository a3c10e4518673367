//! Row-level validation of balance entries

use alloy::primitives::{Address, U256};
use serde::Serialize;
use thiserror::Error;

/// A balance entry that passed validation and is eligible for the airdrop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceRecord {
    pub address: Address,
    pub amount_wei: U256,
}

/// Reason a CSV row was excluded from the distribution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowRejection {
    #[error("Insufficient data in line: {0}")]
    Malformed(String),

    #[error("{0} is NOT a valid address")]
    InvalidAddress(String),

    #[error("{0} is NOT a valid amount")]
    InvalidAmount(String),

    #[error("{amount} for {address} is outside the eligible range (0, {ceiling})")]
    OutOfRange {
        address: Address,
        amount: U256,
        ceiling: U256,
    },
}

impl RowRejection {
    /// Short label used when tallying rejections.
    pub fn kind(&self) -> &'static str {
        match self {
            RowRejection::Malformed(_) => "malformed",
            RowRejection::InvalidAddress(_) => "invalid_address",
            RowRejection::InvalidAmount(_) => "invalid_amount",
            RowRejection::OutOfRange { .. } => "out_of_range",
        }
    }
}

/// Parse an account identifier the way wallets accept it: 40 hex digits with an
/// optional `0x` prefix. All-lowercase and all-uppercase forms are accepted as is,
/// mixed case must carry a valid EIP-55 checksum.
pub fn parse_account_address(raw: &str) -> Option<Address> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);

    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());

    if has_lower && has_upper {
        Address::parse_checksummed(format!("0x{}", digits), None).ok()
    } else {
        digits.parse::<Address>().ok()
    }
}

/// Parse a non-negative base-10 integer amount of wei.
pub fn parse_wei_amount(raw: &str) -> Option<U256> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    U256::from_str_radix(raw, 10).ok()
}

/// Validate one `(address, balance_wei)` pair against the eligibility ceiling.
pub fn validate_entry(
    address: &str,
    amount_wei: &str,
    ceiling: U256,
) -> Result<BalanceRecord, RowRejection> {
    let address = parse_account_address(address)
        .ok_or_else(|| RowRejection::InvalidAddress(address.to_string()))?;

    let amount = parse_wei_amount(amount_wei)
        .ok_or_else(|| RowRejection::InvalidAmount(amount_wei.to_string()))?;

    if amount.is_zero() || amount >= ceiling {
        return Err(RowRejection::OutOfRange {
            address,
            amount,
            ceiling,
        });
    }

    Ok(BalanceRecord {
        address,
        amount_wei: amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ELIGIBILITY_CEILING_WEI;

    const CHECKSUMMED: &str = "0x5423d45f8870EbB9CE04e35C63d5246303B7601e";

    #[test]
    fn test_accepts_checksummed_address() {
        let address = parse_account_address(CHECKSUMMED).unwrap();
        assert_eq!(address.to_checksum(None), CHECKSUMMED);
    }

    #[test]
    fn test_accepts_single_case_addresses() {
        let lower = CHECKSUMMED.to_lowercase();
        let upper = format!("0x{}", CHECKSUMMED[2..].to_uppercase());
        let bare = &lower[2..];

        assert!(parse_account_address(&lower).is_some());
        assert!(parse_account_address(&upper).is_some());
        assert!(parse_account_address(bare).is_some());
    }

    #[test]
    fn test_rejects_bad_checksum() {
        // flip the case of one letter
        let broken = CHECKSUMMED.replacen("EbB9", "ebB9", 1);
        assert!(parse_account_address(&broken).is_none());
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        assert!(parse_account_address("").is_none());
        assert!(parse_account_address("0x1234").is_none());
        assert!(parse_account_address("0xzz23d45f8870ebb9ce04e35c63d5246303b7601e").is_none());
        assert!(parse_account_address("0x5423d45f8870ebb9ce04e35c63d5246303b7601e00").is_none());
    }

    #[test]
    fn test_parse_wei_amount() {
        assert_eq!(parse_wei_amount("5"), Some(U256::from(5u64)));
        assert_eq!(
            parse_wei_amount("94847424649592560463380480"),
            Some(U256::from(94847424649592560463380480u128))
        );
        assert_eq!(parse_wei_amount("not-a-number"), None);
        assert_eq!(parse_wei_amount("-5"), None);
        assert_eq!(parse_wei_amount("1.5"), None);
        assert_eq!(parse_wei_amount(""), None);
        // one past the 256-bit domain
        assert_eq!(
            parse_wei_amount(
                "115792089237316195423570985008687907853269984665640564039457584007913129639936"
            ),
            None
        );
    }

    #[test]
    fn test_validate_entry_range() {
        let ok = validate_entry(CHECKSUMMED, "5", ELIGIBILITY_CEILING_WEI).unwrap();
        assert_eq!(ok.amount_wei, U256::from(5u64));

        let zero = validate_entry(CHECKSUMMED, "0", ELIGIBILITY_CEILING_WEI).unwrap_err();
        assert_eq!(zero.kind(), "out_of_range");

        let at_ceiling = ELIGIBILITY_CEILING_WEI.to_string();
        let rejected = validate_entry(CHECKSUMMED, &at_ceiling, ELIGIBILITY_CEILING_WEI).unwrap_err();
        assert_eq!(rejected.kind(), "out_of_range");

        let below = (ELIGIBILITY_CEILING_WEI - U256::from(1u64)).to_string();
        assert!(validate_entry(CHECKSUMMED, &below, ELIGIBILITY_CEILING_WEI).is_ok());
    }

    #[test]
    fn test_validate_entry_reports_first_failure() {
        let err = validate_entry("nope", "not-a-number", ELIGIBILITY_CEILING_WEI).unwrap_err();
        assert_eq!(err, RowRejection::InvalidAddress("nope".to_string()));

        let err = validate_entry(CHECKSUMMED, "abc", ELIGIBILITY_CEILING_WEI).unwrap_err();
        assert_eq!(err, RowRejection::InvalidAmount("abc".to_string()));
    }
}
