use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use super::BaseRefundStore;
use crate::domains::refunds::{InsertOutcome, Refund};

/// Refund store backed by the `refunds` table.
pub struct PostgresRefundStore {
    pool: PgPool,
}

impl PostgresRefundStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseRefundStore for PostgresRefundStore {
    async fn latest_announcement_date(&self) -> Result<Option<NaiveDate>> {
        Refund::latest_announcement_date(&self.pool).await
    }

    async fn has_announcement(&self, announcement_date: NaiveDate) -> Result<bool> {
        Refund::exists_for_date(announcement_date, &self.pool).await
    }

    async fn insert_refunds(&self, records: &[Refund]) -> Result<Vec<InsertOutcome>> {
        Refund::insert_batch(records, &self.pool).await
    }
}
