use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stallbook_core::{entity, DomainError, DomainResult, Entity, ExpenseId, Money};

/// Longest description accepted from the expense form.
pub const MAX_DESCRIPTION_CHARS: usize = 100;

/// Expense category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Rent,
    Utilities,
    Salaries,
    Supplies,
    Marketing,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 6] = [
        ExpenseCategory::Rent,
        ExpenseCategory::Utilities,
        ExpenseCategory::Salaries,
        ExpenseCategory::Supplies,
        ExpenseCategory::Marketing,
        ExpenseCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Rent => "rent",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Salaries => "salaries",
            ExpenseCategory::Supplies => "supplies",
            ExpenseCategory::Marketing => "marketing",
            ExpenseCategory::Other => "other",
        }
    }
}

impl core::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for ExpenseCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ExpenseCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                DomainError::validation(
                    "category must be one of: rent, utilities, salaries, supplies, marketing, other",
                )
            })
    }
}

/// A recorded expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub date: DateTime<Utc>,
    pub amount: Money,
    pub category: ExpenseCategory,
    pub description: String,
}

impl Entity for Expense {
    type Id = ExpenseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Input for a new expense (id and timestamp are assigned on record).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpense {
    pub amount: Money,
    pub category: ExpenseCategory,
    pub description: String,
}

impl NewExpense {
    /// Supplies expense derived from a costed ingredient purchase.
    pub fn from_purchase(name: &str, quantity: f64, unit: &str, cost: Money) -> Self {
        Self {
            amount: cost,
            category: ExpenseCategory::Supplies,
            description: format!("Purchase: {quantity} {unit} of {name}"),
        }
    }

    fn validate_amount(&self) -> DomainResult<()> {
        if self.amount <= 0 {
            return Err(DomainError::validation("amount must be positive"));
        }
        Ok(())
    }

    fn validate_form(&self) -> DomainResult<()> {
        self.validate_amount()?;
        let description = self.description.trim();
        if description.is_empty() {
            return Err(DomainError::validation("description is required"));
        }
        if description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(DomainError::validation(format!(
                "description must be at most {MAX_DESCRIPTION_CHARS} characters"
            )));
        }
        Ok(())
    }
}

/// All expenses of the shop, in recording order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseBook {
    expenses: Vec<Expense>,
}

impl ExpenseBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the book from persisted records.
    pub fn from_records(expenses: Vec<Expense>) -> DomainResult<Self> {
        if let Some(id) = entity::first_duplicate_id(&expenses) {
            return Err(DomainError::invariant(format!("duplicate expense id {id}")));
        }
        if let Some(e) = expenses.iter().find(|e| e.amount < 0) {
            return Err(DomainError::invariant(format!("expense {} has a negative amount", e.id)));
        }
        Ok(Self { expenses })
    }

    pub fn records(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn into_records(self) -> Vec<Expense> {
        self.expenses
    }

    pub fn get(&self, id: &ExpenseId) -> Option<&Expense> {
        entity::find(&self.expenses, id)
    }

    /// Newest first, the order the dashboard lists them in.
    pub fn newest_first(&self) -> Vec<&Expense> {
        let mut out: Vec<&Expense> = self.expenses.iter().collect();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        out
    }

    /// Record an expense entered through the expense form.
    pub fn record_expense(
        &mut self,
        id: ExpenseId,
        input: NewExpense,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<&Expense> {
        input.validate_form()?;
        Ok(self.push(id, input, occurred_at))
    }

    /// Record an expense derived from another operation (e.g. a costed purchase).
    ///
    /// The description is generated, so only the amount is checked.
    pub fn record_derived(
        &mut self,
        id: ExpenseId,
        input: NewExpense,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<&Expense> {
        input.validate_amount()?;
        Ok(self.push(id, input, occurred_at))
    }

    fn push(&mut self, id: ExpenseId, input: NewExpense, occurred_at: DateTime<Utc>) -> &Expense {
        self.expenses.push(Expense {
            id,
            date: occurred_at,
            amount: input.amount,
            category: input.category,
            description: input.description.trim().to_string(),
        });
        let last = self.expenses.len() - 1;
        &self.expenses[last]
    }
}
