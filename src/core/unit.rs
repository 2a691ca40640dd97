//! Units a conversion can start from or end in

use crate::core::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// A 3-letter fiat currency code, always stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FiatCode(String);

impl FiatCode {
    pub fn usd() -> Self {
        FiatCode("USD".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-case form used in request paths and query strings.
    pub fn to_api(&self) -> String {
        self.0.to_lowercase()
    }
}

impl FromStr for FiatCode {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(FiatCode(code.to_uppercase()))
        } else {
            Err(ConvertError::UnknownUnit(s.to_string()))
        }
    }
}

impl Display for FiatCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum CryptoId {
    Bitcoin,
    Ethereum,
    Litecoin,
    Dogecoin,
    Xrp,
    BinanceCoin,
    Solana,
    Cardano,
    Polkadot,
    Tether,
}

impl CryptoId {
    pub const ALL: [CryptoId; 10] = [
        CryptoId::Bitcoin,
        CryptoId::Ethereum,
        CryptoId::Litecoin,
        CryptoId::Dogecoin,
        CryptoId::Xrp,
        CryptoId::BinanceCoin,
        CryptoId::Solana,
        CryptoId::Cardano,
        CryptoId::Polkadot,
        CryptoId::Tether,
    ];

    /// Coin id understood by the simple-price API.
    pub fn api_id(&self) -> &'static str {
        match self {
            CryptoId::Bitcoin => "bitcoin",
            CryptoId::Ethereum => "ethereum",
            CryptoId::Litecoin => "litecoin",
            CryptoId::Dogecoin => "dogecoin",
            CryptoId::Xrp => "xrp",
            CryptoId::BinanceCoin => "binancecoin",
            CryptoId::Solana => "solana",
            CryptoId::Cardano => "cardano",
            CryptoId::Polkadot => "polkadot",
            CryptoId::Tether => "tether",
        }
    }
}

impl Display for CryptoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.api_id())
    }
}

impl FromStr for CryptoId {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_lowercase();
        CryptoId::ALL
            .into_iter()
            .find(|coin| coin.api_id() == id)
            .ok_or_else(|| ConvertError::UnknownUnit(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum BasketItem {
    BigMac,
    Fries,
    Drink,
}

impl BasketItem {
    pub const ALL: [BasketItem; 3] = [BasketItem::BigMac, BasketItem::Fries, BasketItem::Drink];
}

impl Display for BasketItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                BasketItem::BigMac => "BigMac",
                BasketItem::Fries => "Fries",
                BasketItem::Drink => "Drink",
            }
        )
    }
}

impl FromStr for BasketItem {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bigmac" => Ok(BasketItem::BigMac),
            "fries" => Ok(BasketItem::Fries),
            "drink" => Ok(BasketItem::Drink),
            _ => Err(ConvertError::UnknownUnit(s.to_string())),
        }
    }
}

/// Coarse classification used by the resolver dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitClass {
    Fiat,
    Crypto,
    Basket,
}

impl Display for UnitClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                UnitClass::Fiat => "Fiat",
                UnitClass::Crypto => "Crypto",
                UnitClass::Basket => "Basket",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    Fiat(FiatCode),
    Crypto(CryptoId),
    Basket(BasketItem),
}

impl Unit {
    pub fn class(&self) -> UnitClass {
        match self {
            Unit::Fiat(_) => UnitClass::Fiat,
            Unit::Crypto(_) => UnitClass::Crypto,
            Unit::Basket(_) => UnitClass::Basket,
        }
    }
}

impl FromStr for Unit {
    type Err = ConvertError;

    /// Basket names win over coin ids, and coin ids over fiat codes. Matching
    /// is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(item) = s.parse::<BasketItem>() {
            return Ok(Unit::Basket(item));
        }
        if let Ok(coin) = s.parse::<CryptoId>() {
            return Ok(Unit::Crypto(coin));
        }
        s.parse::<FiatCode>().map(Unit::Fiat)
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unit::Fiat(code) => write!(f, "{code}"),
            Unit::Crypto(coin) => write!(f, "{coin}"),
            Unit::Basket(item) => write!(f, "{item}"),
        }
    }
}
