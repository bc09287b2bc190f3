use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stallbook_core::{DomainError, DomainResult, Entity, Money, TransactionId};

use crate::item::ItemKey;
use crate::unit::Unit;

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Purchase,
    Usage,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Purchase => "purchase",
            TransactionKind::Usage => "usage",
        }
    }

    /// Sign of this movement's effect on stock.
    pub fn sign(&self) -> f64 {
        match self {
            TransactionKind::Purchase => 1.0,
            TransactionKind::Usage => -1.0,
        }
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The editable fields of a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionValues {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub name: String,
    pub quantity: f64,
    pub unit: Unit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<Money>,
}

impl TransactionValues {
    /// Validate and normalise: trims the name and drops `cost` on usage.
    pub fn normalized(mut self) -> DomainResult<Self> {
        self.name = validate_name(&self.name)?;
        validate_quantity(self.quantity)?;
        match self.kind {
            TransactionKind::Purchase => validate_cost(self.cost)?,
            TransactionKind::Usage => self.cost = None,
        }
        Ok(self)
    }

    /// Signed effect on stock.
    pub fn delta(&self) -> f64 {
        self.kind.sign() * self.quantity
    }

    pub fn key(&self) -> ItemKey {
        ItemKey::new(&self.name, self.unit)
    }
}

/// One entry of a transaction's edit history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEdit {
    pub edited_at: DateTime<Utc>,
    /// Field values immediately before this edit was applied.
    pub original_values: TransactionValues,
}

/// A recorded purchase or usage of an ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryTransaction {
    pub id: TransactionId,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub name: String,
    pub quantity: f64,
    pub unit: Unit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<Money>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edit_history: Vec<TransactionEdit>,
}

impl InventoryTransaction {
    /// Current field values.
    pub fn values(&self) -> TransactionValues {
        TransactionValues {
            kind: self.kind,
            name: self.name.clone(),
            quantity: self.quantity,
            unit: self.unit,
            cost: self.cost,
        }
    }

    pub fn key(&self) -> ItemKey {
        ItemKey::new(&self.name, self.unit)
    }

    /// Number of edits applied so far (0 = as originally recorded).
    pub fn revision(&self) -> usize {
        self.edit_history.len()
    }

    /// Field values as they stood at `revision` (0 = as originally recorded).
    ///
    /// Returns `None` for revisions that do not exist yet.
    pub fn values_at_revision(&self, revision: usize) -> Option<TransactionValues> {
        match revision.cmp(&self.edit_history.len()) {
            core::cmp::Ordering::Less => Some(self.edit_history[revision].original_values.clone()),
            core::cmp::Ordering::Equal => Some(self.values()),
            core::cmp::Ordering::Greater => None,
        }
    }

    pub(crate) fn overwrite(&mut self, values: TransactionValues, edited_at: DateTime<Utc>) {
        let original_values = self.values();
        self.edit_history.push(TransactionEdit {
            edited_at,
            original_values,
        });
        self.kind = values.kind;
        self.name = values.name;
        self.quantity = values.quantity;
        self.unit = values.unit;
        self.cost = values.cost;
    }
}

impl Entity for InventoryTransaction {
    type Id = TransactionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

pub(crate) fn validate_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("ingredient name is required"));
    }
    Ok(name.to_string())
}

pub(crate) fn validate_quantity(quantity: f64) -> DomainResult<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(DomainError::validation("quantity must be a positive number"));
    }
    Ok(())
}

pub(crate) fn validate_cost(cost: Option<Money>) -> DomainResult<()> {
    match cost {
        Some(c) if c < 0 => Err(DomainError::validation("cost cannot be negative")),
        _ => Ok(()),
    }
}
