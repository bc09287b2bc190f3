use serde::{Deserialize, Serialize};

use stallbook_core::DomainError;

/// Unit an ingredient is stocked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Kilograms (mass, large).
    Kg,
    /// Grams (mass, small).
    G,
    /// Litres (volume, large).
    L,
    /// Millilitres (volume, small).
    Ml,
    /// Pieces (count).
    Pcs,
}

impl Unit {
    pub const ALL: [Unit; 5] = [Unit::Kg, Unit::G, Unit::L, Unit::Ml, Unit::Pcs];

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::G => "g",
            Unit::L => "l",
            Unit::Ml => "ml",
            Unit::Pcs => "pcs",
        }
    }

    pub fn is_count(&self) -> bool {
        matches!(self, Unit::Pcs)
    }

    /// Quantity below which an item in this unit is flagged for reordering.
    pub fn low_stock_threshold(&self) -> f64 {
        if self.is_count() { 20.0 } else { 10.0 }
    }
}

impl core::fmt::Display for Unit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Unit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Unit::ALL
            .into_iter()
            .find(|u| u.as_str() == wanted)
            .ok_or_else(|| DomainError::validation("unit must be one of: kg, g, l, ml, pcs"))
    }
}
