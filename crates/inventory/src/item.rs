use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stallbook_core::{Entity, ItemId};

use crate::unit::Unit;

/// Matching key for inventory items: lowercased name plus unit.
///
/// Two purchases land on the same item when their keys are equal, whatever
/// casing the name was typed in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    name: String,
    unit: Unit,
}

impl ItemKey {
    pub fn new(name: &str, unit: Unit) -> Self {
        Self {
            name: name.trim().to_lowercase(),
            unit,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }
}

/// Current stock of one ingredient in one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: ItemId,
    /// Display name, as first entered.
    pub name: String,
    pub quantity: f64,
    pub unit: Unit,
    pub last_updated: DateTime<Utc>,
}

impl InventoryItem {
    pub fn key(&self) -> ItemKey {
        ItemKey::new(&self.name, self.unit)
    }
}

impl Entity for InventoryItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
