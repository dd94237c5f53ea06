// Test dependencies - mock implementations for testing
//
// Provides an in-memory fetcher and store that can be injected into the Ingestor.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{BasePageFetcher, BaseRefundStore};
use crate::domains::refunds::{InsertOutcome, Refund};

// =============================================================================
// Mock Page Fetcher
// =============================================================================

pub struct MockPageFetcher {
    pages: Arc<Mutex<HashMap<String, String>>>,
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Default for MockPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self {
            pages: Arc::new(Mutex::new(HashMap::new())),
            files: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Serve `html` for `url`
    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), html.to_string());
        self
    }

    /// Serve `bytes` for `url`
    pub fn with_file(self, url: &str, bytes: Vec<u8>) -> Self {
        self.files.lock().unwrap().insert(url.to_string(), bytes);
        self
    }

    /// URLs requested so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BasePageFetcher for MockPageFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());
        self.pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("HTTP 404 Not Found for {}", url))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(url.to_string());
        self.files
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("HTTP 404 Not Found for {}", url))
    }
}

// =============================================================================
// In-memory Refund Store
// =============================================================================

/// Refund store keeping records in memory with the same identity rule as
/// the `refunds` table.
#[derive(Default)]
pub struct InMemoryRefundStore {
    records: Mutex<Vec<Refund>>,
}

impl InMemoryRefundStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Refund>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn records(&self) -> Vec<Refund> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseRefundStore for InMemoryRefundStore {
    async fn latest_announcement_date(&self) -> Result<Option<NaiveDate>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .map(|record| record.announcement_date)
            .max())
    }

    async fn has_announcement(&self, announcement_date: NaiveDate) -> Result<bool> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .any(|record| record.announcement_date == announcement_date))
    }

    async fn insert_refunds(&self, records: &[Refund]) -> Result<Vec<InsertOutcome>> {
        let mut stored = self.records.lock().unwrap();
        let outcomes = records
            .iter()
            .map(|record| {
                let exists = stored.iter().any(|existing| {
                    existing.ean == record.ean
                        && existing.announcement_date == record.announcement_date
                        && existing.refund_level == record.refund_level
                });
                if exists {
                    InsertOutcome::Duplicate
                } else {
                    stored.push(record.clone());
                    InsertOutcome::Inserted
                }
            })
            .collect();
        Ok(outcomes)
    }
}
