//! Infrastructure layer: snapshot persistence, the application service, reports.

pub mod reports;
pub mod service;
pub mod shop;
pub mod store;

pub use service::{Collection, ServiceError, ShopService};
pub use shop::{PurchaseReceipt, ShopState};
