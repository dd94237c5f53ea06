// Drug Refund Price Tracker - Core
//
// This crate scrapes the Ministry of Health's reimbursement announcements,
// normalizes their spreadsheet attachments into refund records, stores the
// price history in Postgres and builds the price-trend chart data.
//
// Domain logic is organized per-domain in domains/*; infrastructure in kernel/.

pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
