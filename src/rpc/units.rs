use num_bigint::BigUint;
use num_traits::{Num, Zero};

use super::error::{RpcError, RpcResult};

pub const WEI_DECIMALS: u32 = 18;
pub const GWEI_DECIMALS: u32 = 9;
pub const LAMPORT_DECIMALS: u32 = 9;

pub const ETHER_PLACES: u32 = 6;
pub const GWEI_PLACES: u32 = 2;
pub const SOL_PLACES: u32 = 4;

/// Formats `value / 10^decimals` with exactly `places` fractional digits,
/// rounding half-up on the exact integer value.
pub fn format_units(value: &BigUint, decimals: u32, places: u32) -> String {
    let divisor = BigUint::from(10u32).pow(decimals);
    let scale = BigUint::from(10u32).pow(places);
    let scaled = (value * &scale + (&divisor >> 1u32)) / &divisor;

    let whole = &scaled / &scale;
    if places == 0 {
        return whole.to_string();
    }

    let fraction = (&scaled % &scale).to_string();
    format!("{whole}.{fraction:0>width$}", width = places as usize)
}

pub fn wei_to_ether(wei: &BigUint) -> String {
    format_units(wei, WEI_DECIMALS, ETHER_PLACES)
}

pub fn wei_to_gwei(wei: &BigUint) -> String {
    format_units(wei, GWEI_DECIMALS, GWEI_PLACES)
}

pub fn lamports_to_sol(lamports: u64) -> String {
    format_units(&BigUint::from(lamports), LAMPORT_DECIMALS, SOL_PLACES)
}

/// Parses an Ethereum hex quantity. `0x` on its own decodes to zero.
pub fn parse_hex_quantity(raw: &str) -> RpcResult<BigUint> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .ok_or_else(|| RpcError::MalformedResponse(format!("expected hex quantity, got '{raw}'")))?;

    if digits.is_empty() {
        return Ok(BigUint::zero());
    }

    BigUint::from_str_radix(digits, 16)
        .map_err(|_| RpcError::MalformedResponse(format!("invalid hex quantity '{raw}'")))
}

pub fn parse_hex_u64(raw: &str) -> RpcResult<u64> {
    let value = parse_hex_quantity(raw)?;
    u64::try_from(&value)
        .map_err(|_| RpcError::MalformedResponse(format!("hex quantity '{raw}' exceeds u64")))
}
