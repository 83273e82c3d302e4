//! Fixed-point monetary units.
//!
//! Rates are never stored as floating point. A [`Rate`] says how many fiat
//! smallest units buy a given number of coin base units.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Base units in one whole coin.
pub const COIN: i64 = 100_000_000;

/// Decimal places of a fiat smallest unit (1 USD = 10 000 units).
pub const FIAT_SMALLEST_UNIT_EXPONENT: u32 = 4;

/// Decimal places used when turning a floating-point price into text.
const PRICE_FORMAT_PRECISION: usize = 8;

/// Exchange rate as a ratio of coin base units to fiat smallest units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rate {
    /// Coin base units on the left side of the ratio
    pub coin: i64,
    /// Fiat smallest units on the right side of the ratio
    pub fiat: i64,
}

impl Rate {
    /// A rate quoted against one whole coin.
    pub fn per_coin(fiat: i64) -> Self {
        Self { coin: COIN, fiat }
    }

    /// The fiat price of one whole coin as a decimal.
    ///
    /// Returns `None` when the coin side is zero.
    pub fn fiat_per_coin(&self) -> Option<Decimal> {
        if self.coin == 0 {
            return None;
        }
        let fiat = Decimal::new(self.fiat, FIAT_SMALLEST_UNIT_EXPONENT);
        let coin = Decimal::new(self.coin, 8);
        fiat.checked_div(coin)
    }

    pub fn is_positive(&self) -> bool {
        self.coin > 0 && self.fiat > 0
    }
}

/// Parses a decimal string into fiat smallest units, truncating extra digits.
///
/// `"1.23456"` becomes `12345`. Returns `None` for text that is not a
/// decimal number or that does not fit into an `i64`.
pub fn parse_fiat_inexact(text: &str) -> Option<i64> {
    let value = Decimal::from_str(text.trim()).ok()?;
    let scaled = value.checked_mul(Decimal::from(10_i64.pow(FIAT_SMALLEST_UNIT_EXPONENT)))?;
    scaled.trunc().to_i64()
}

/// Converts a floating-point fiat-per-coin price into fiat smallest units.
///
/// The price goes through an 8-place decimal string first so binary
/// rounding noise below that precision never reaches the integer value.
pub fn fiat_from_price(price: f64) -> Option<i64> {
    if !price.is_finite() {
        return None;
    }
    let text = format!("{:.*}", PRICE_FORMAT_PRECISION, price);
    parse_fiat_inexact(&text)
}
