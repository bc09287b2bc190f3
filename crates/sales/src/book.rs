//! The sales book: every counter sale, with edit history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stallbook_core::{entity, Aggregate, DomainError, DomainResult, Entity, Money, SaleId};

use crate::variation::{PaymentMethod, SaleVariation};

/// The editable fields of a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleValues {
    pub variation: SaleVariation,
    pub quantity: u32,
    #[serde(rename = "type")]
    pub payment: PaymentMethod,
    pub amount: Money,
}

impl SaleValues {
    fn validate(&self) -> DomainResult<()> {
        validate_quantity(self.quantity)?;
        validate_amount(self.amount)
    }
}

/// One entry of a sale's edit history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleEdit {
    pub edited_at: DateTime<Utc>,
    pub original_values: SaleValues,
}

/// A recorded sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: SaleId,
    pub date: DateTime<Utc>,
    pub variation: SaleVariation,
    pub quantity: u32,
    pub amount: Money,
    #[serde(rename = "type")]
    pub payment: PaymentMethod,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edit_history: Vec<SaleEdit>,
}

impl Sale {
    pub fn values(&self) -> SaleValues {
        SaleValues {
            variation: self.variation,
            quantity: self.quantity,
            payment: self.payment,
            amount: self.amount,
        }
    }
}

impl Entity for Sale {
    type Id = SaleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Sale form input. `amount` defaults to the menu price times quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSale {
    pub variation: SaleVariation,
    pub quantity: u32,
    #[serde(rename = "type")]
    pub payment: PaymentMethod,
    #[serde(default)]
    pub amount: Option<Money>,
}

/// Command: RecordSale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSale {
    pub sale_id: SaleId,
    pub sale: NewSale,
    pub occurred_at: DateTime<Utc>,
}

/// Command: EditSale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSale {
    pub sale_id: SaleId,
    pub values: SaleValues,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalesCommand {
    RecordSale(RecordSale),
    EditSale(EditSale),
}

/// Event: SaleRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecorded {
    pub sale_id: SaleId,
    pub values: SaleValues,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SaleEdited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleEdited {
    pub sale_id: SaleId,
    pub values: SaleValues,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalesEvent {
    SaleRecorded(SaleRecorded),
    SaleEdited(SaleEdited),
}

impl SalesEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            SalesEvent::SaleRecorded(_) => "sales.sale_recorded",
            SalesEvent::SaleEdited(_) => "sales.sale_edited",
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SalesEvent::SaleRecorded(e) => e.occurred_at,
            SalesEvent::SaleEdited(e) => e.occurred_at,
        }
    }
}

/// Aggregate: all sales of the shop, in recording order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesBook {
    sales: Vec<Sale>,
    version: u64,
}

impl SalesBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the book from persisted records.
    pub fn from_records(sales: Vec<Sale>) -> DomainResult<Self> {
        if let Some(id) = entity::first_duplicate_id(&sales) {
            return Err(DomainError::invariant(format!("duplicate sale id {id}")));
        }
        if let Some(s) = sales.iter().find(|s| s.quantity == 0 || s.amount < 0) {
            return Err(DomainError::invariant(format!("sale {} has invalid values", s.id)));
        }
        Ok(Self { sales, version: 0 })
    }

    pub fn records(&self) -> &[Sale] {
        &self.sales
    }

    pub fn into_records(self) -> Vec<Sale> {
        self.sales
    }

    pub fn get(&self, id: &SaleId) -> Option<&Sale> {
        entity::find(&self.sales, id)
    }

    pub fn newest_first(&self) -> Vec<&Sale> {
        let mut out: Vec<&Sale> = self.sales.iter().collect();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        out
    }

    pub fn record_sale(&mut self, input: NewSale, occurred_at: DateTime<Utc>) -> DomainResult<Sale> {
        let sale_id = SaleId::new();
        self.execute(&SalesCommand::RecordSale(RecordSale {
            sale_id,
            sale: input,
            occurred_at,
        }))?;
        self.recorded(&sale_id)
    }

    /// Overwrite a sale's fields, keeping the previous values in its history.
    pub fn edit_sale(
        &mut self,
        sale_id: SaleId,
        values: SaleValues,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Sale> {
        self.execute(&SalesCommand::EditSale(EditSale {
            sale_id,
            values,
            occurred_at,
        }))?;
        self.recorded(&sale_id)
    }

    fn recorded(&self, id: &SaleId) -> DomainResult<Sale> {
        self.get(id)
            .cloned()
            .ok_or_else(|| DomainError::invariant(format!("sale {id} missing after apply")))
    }

    fn handle_record(&self, cmd: &RecordSale) -> DomainResult<Vec<SalesEvent>> {
        if self.get(&cmd.sale_id).is_some() {
            return Err(DomainError::invalid_id(format!("sale {} already exists", cmd.sale_id)));
        }
        validate_quantity(cmd.sale.quantity)?;

        let amount = match cmd.sale.amount {
            Some(amount) => amount,
            None => cmd
                .sale
                .variation
                .default_price()
                .checked_mul(i64::from(cmd.sale.quantity))
                .ok_or_else(|| DomainError::validation("amount is too large"))?,
        };
        validate_amount(amount)?;

        Ok(vec![SalesEvent::SaleRecorded(SaleRecorded {
            sale_id: cmd.sale_id,
            values: SaleValues {
                variation: cmd.sale.variation,
                quantity: cmd.sale.quantity,
                payment: cmd.sale.payment,
                amount,
            },
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_edit(&self, cmd: &EditSale) -> DomainResult<Vec<SalesEvent>> {
        if self.get(&cmd.sale_id).is_none() {
            return Err(DomainError::not_found("sale"));
        }
        cmd.values.validate()?;

        Ok(vec![SalesEvent::SaleEdited(SaleEdited {
            sale_id: cmd.sale_id,
            values: cmd.values.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }
}

impl Aggregate for SalesBook {
    type Command = SalesCommand;
    type Event = SalesEvent;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            SalesEvent::SaleRecorded(e) => {
                self.sales.push(Sale {
                    id: e.sale_id,
                    date: e.occurred_at,
                    variation: e.values.variation,
                    quantity: e.values.quantity,
                    amount: e.values.amount,
                    payment: e.values.payment,
                    edit_history: Vec::new(),
                });
            }
            SalesEvent::SaleEdited(e) => {
                if let Some(sale) = entity::find_mut(&mut self.sales, &e.sale_id) {
                    let original_values = sale.values();
                    sale.edit_history.push(SaleEdit {
                        edited_at: e.occurred_at,
                        original_values,
                    });
                    sale.variation = e.values.variation;
                    sale.quantity = e.values.quantity;
                    sale.payment = e.values.payment;
                    sale.amount = e.values.amount;
                }
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            SalesCommand::RecordSale(cmd) => self.handle_record(cmd),
            SalesCommand::EditSale(cmd) => self.handle_edit(cmd),
        }
    }
}

fn validate_quantity(quantity: u32) -> DomainResult<()> {
    if quantity == 0 {
        return Err(DomainError::validation("quantity must be at least 1"));
    }
    Ok(())
}

fn validate_amount(amount: Money) -> DomainResult<()> {
    if amount <= 0 {
        return Err(DomainError::validation("amount must be positive"));
    }
    Ok(())
}
