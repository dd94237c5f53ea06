pub mod models;

pub use models::{DropdownItem, InsertOutcome, PriceHistoryRow, Refund};
