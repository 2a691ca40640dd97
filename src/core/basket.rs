//! Reference USD prices for the basket units

use crate::core::unit::BasketItem;

/// Global average Big Mac price (2022).
pub const BIGMAC_USD: f64 = 5.65;
/// Global average medium fries.
pub const FRIES_USD: f64 = 2.50;
/// Global average medium drink.
pub const DRINK_USD: f64 = 1.80;

impl BasketItem {
    pub fn usd_price(&self) -> f64 {
        match self {
            BasketItem::BigMac => BIGMAC_USD,
            BasketItem::Fries => FRIES_USD,
            BasketItem::Drink => DRINK_USD,
        }
    }
}
