use serde::{Deserialize, Serialize};

use stallbook_core::{DomainError, Money};

/// Menu item sold at the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SaleVariation {
    Small,
    Medium,
    Large,
    BunBurger,
}

impl SaleVariation {
    pub const ALL: [SaleVariation; 4] = [
        SaleVariation::Small,
        SaleVariation::Medium,
        SaleVariation::Large,
        SaleVariation::BunBurger,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SaleVariation::Small => "small",
            SaleVariation::Medium => "medium",
            SaleVariation::Large => "large",
            SaleVariation::BunBurger => "bun-burger",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SaleVariation::Small => "Small Shawarma",
            SaleVariation::Medium => "Medium Shawarma",
            SaleVariation::Large => "Large Shawarma",
            SaleVariation::BunBurger => "Bun Burger",
        }
    }

    /// Menu price in paisa.
    pub fn default_price(&self) -> Money {
        match self {
            SaleVariation::Small => 80_000,
            SaleVariation::Medium => 100_000,
            SaleVariation::Large => 120_000,
            SaleVariation::BunBurger => 90_000,
        }
    }
}

impl core::fmt::Display for SaleVariation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for SaleVariation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SaleVariation::ALL
            .into_iter()
            .find(|v| v.as_str() == wanted)
            .ok_or_else(|| DomainError::validation(format!("unknown sale variation '{s}'")))
    }
}

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Easypaisa,
    Jazzcash,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Cash,
        PaymentMethod::Easypaisa,
        PaymentMethod::Jazzcash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Easypaisa => "easypaisa",
            PaymentMethod::Jazzcash => "jazzcash",
        }
    }
}

impl core::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        PaymentMethod::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| DomainError::validation("payment type must be one of: cash, easypaisa, jazzcash"))
    }
}
