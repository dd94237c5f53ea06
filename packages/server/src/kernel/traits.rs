// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Ingestion logic lives in domain functions and kernel::ingestion, which use these traits.
//
// Naming convention: Base* for trait names (e.g., BasePageFetcher, BaseRefundStore)

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domains::refunds::{InsertOutcome, Refund};

// =============================================================================
// Page Fetcher Trait (Infrastructure - HTTP)
// =============================================================================

#[async_trait]
pub trait BasePageFetcher: Send + Sync {
    /// Fetch a page as text (HTML)
    async fn fetch_text(&self, url: &str) -> Result<String>;

    /// Fetch a binary resource (spreadsheet attachment)
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

// =============================================================================
// Refund Store Trait (Infrastructure - Persistence)
// =============================================================================

#[async_trait]
pub trait BaseRefundStore: Send + Sync {
    /// Most recent announcement date already stored
    async fn latest_announcement_date(&self) -> Result<Option<NaiveDate>>;

    /// Whether any record exists for exactly this announcement date
    async fn has_announcement(&self, announcement_date: NaiveDate) -> Result<bool>;

    /// Insert records; identities already stored come back as duplicates
    async fn insert_refunds(&self, records: &[Refund]) -> Result<Vec<InsertOutcome>>;
}
