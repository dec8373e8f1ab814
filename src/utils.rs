//! Utility functions for identifiers and money rounding

use bech32::Bech32m;
use uuid7::uuid7;

/// Human readable part used for order identifiers.
pub const ORDER_HRP: &str = "ord_";

// construct a time-ordered unique id then encode using bech32m
pub fn new_uuid_to_bech32(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encode)
}

/// Rounds an amount to whole cents for display.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
