//! Kernel module - infrastructure behind the ingestion run.

pub mod http_fetcher;
pub mod ingestion;
pub mod postgres_store;
pub mod test_dependencies;
pub mod traits;

pub use http_fetcher::HttpFetcher;
pub use ingestion::{archive_date, IngestionReport, Ingestor};
pub use postgres_store::PostgresRefundStore;
pub use test_dependencies::{InMemoryRefundStore, MockPageFetcher};
pub use traits::*;
