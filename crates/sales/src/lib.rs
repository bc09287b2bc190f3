//! Sales domain module.
//!
//! This crate contains the counter sales book: menu variations, payment
//! methods, recorded sales and their edit history. Deterministic domain
//! logic only (no IO, no HTTP, no storage).

pub mod book;
pub mod variation;

pub use book::{
    EditSale, NewSale, RecordSale, Sale, SaleEdit, SaleEdited, SaleRecorded, SaleValues,
    SalesBook, SalesCommand, SalesEvent,
};
pub use variation::{PaymentMethod, SaleVariation};
