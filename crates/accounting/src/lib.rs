//! Expense bookkeeping.
//!
//! Business rules for the shop's outgoing money, implemented as deterministic
//! domain logic (no IO, no HTTP, no storage).

pub mod expense;

pub use expense::{Expense, ExpenseBook, ExpenseCategory, NewExpense};
