pub mod refund;

pub use refund::{DropdownItem, InsertOutcome, PriceHistoryRow, Refund};
