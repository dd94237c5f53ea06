use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Reimbursed price of one drug package, in one refund tier, as of one
/// announcement. Identity is (ean, announcement_date, refund_level).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Refund {
    pub ean: String,
    pub announcement_date: NaiveDate,
    pub refund_level: String,
    pub active_ingredient: String,
    pub form: String,
    pub dose: String, // canonical, see domains::dosage
    pub unit_price: Decimal,
    pub description_label: String,
    pub description_dropdown: String,
    pub description_list_item: String,
}

/// Result of inserting one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A record with the same identity already exists; nothing changed.
    Duplicate,
}

/// Entry of the drug selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DropdownItem {
    pub ean: String,
    pub description_dropdown: String,
}

/// Price history of one package variant in one refund tier.
/// Dates and prices are aligned and ordered by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PriceHistoryRow {
    pub refund_level: String,
    pub description_label: String,
    pub description_list_item: String,
    pub announcement_dates: Vec<NaiveDate>,
    pub unit_prices: Vec<Decimal>,
}

// =============================================================================
// Refund Queries
// =============================================================================

impl Refund {
    /// Insert a batch in one transaction. Existing identities are left
    /// untouched and reported as duplicates.
    pub async fn insert_batch(records: &[Refund], pool: &PgPool) -> Result<Vec<InsertOutcome>> {
        let mut tx = pool.begin().await.context("Failed to begin transaction")?;
        let mut outcomes = Vec::with_capacity(records.len());

        for record in records {
            let result = sqlx::query(
                r#"
                INSERT INTO refunds (
                    ean, announcement_date, refund_level, active_ingredient, form, dose,
                    unit_price, description_label, description_dropdown, description_list_item
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ON CONFLICT (ean, announcement_date, refund_level) DO NOTHING
                "#,
            )
            .bind(&record.ean)
            .bind(record.announcement_date)
            .bind(&record.refund_level)
            .bind(&record.active_ingredient)
            .bind(&record.form)
            .bind(&record.dose)
            .bind(record.unit_price)
            .bind(&record.description_label)
            .bind(&record.description_dropdown)
            .bind(&record.description_list_item)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert refund for EAN {}", record.ean))?;

            outcomes.push(if result.rows_affected() == 0 {
                InsertOutcome::Duplicate
            } else {
                InsertOutcome::Inserted
            });
        }

        tx.commit().await.context("Failed to commit refunds")?;
        Ok(outcomes)
    }

    /// Most recent announcement date in the store (the high-water mark).
    pub async fn latest_announcement_date(pool: &PgPool) -> Result<Option<NaiveDate>> {
        sqlx::query_scalar::<_, Option<NaiveDate>>("SELECT MAX(announcement_date) FROM refunds")
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Whether any record was published on exactly this date.
    pub async fn exists_for_date(announcement_date: NaiveDate, pool: &PgPool) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM refunds WHERE announcement_date = $1)",
        )
        .bind(announcement_date)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Distinct (ean, dropdown label) pairs ordered by ean.
    pub async fn dropdown_items(pool: &PgPool) -> Result<Vec<DropdownItem>> {
        sqlx::query_as::<_, DropdownItem>(
            r#"
            SELECT DISTINCT ean, description_dropdown
            FROM refunds
            ORDER BY ean, description_dropdown
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Price histories of every variant of the same drug as `ean`, i.e.
    /// all records sharing its (active_ingredient, dose, form), grouped
    /// per refund tier and display label.
    pub async fn price_histories_for_ean(ean: &str, pool: &PgPool) -> Result<Vec<PriceHistoryRow>> {
        sqlx::query_as::<_, PriceHistoryRow>(
            r#"
            SELECT
                refund_level,
                description_label,
                description_list_item,
                ARRAY_AGG(announcement_date ORDER BY announcement_date) AS announcement_dates,
                ARRAY_AGG(unit_price ORDER BY announcement_date) AS unit_prices
            FROM refunds
            WHERE (active_ingredient, dose, form) IN (
                SELECT DISTINCT active_ingredient, dose, form
                FROM refunds
                WHERE ean = $1
            )
            GROUP BY refund_level, description_label, description_list_item
            ORDER BY refund_level, description_label, description_list_item
            "#,
        )
        .bind(ean)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// All records of one package, oldest first.
    pub async fn find_by_ean(ean: &str, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Refund>(
            "SELECT * FROM refunds WHERE ean = $1 ORDER BY announcement_date, refund_level",
        )
        .bind(ean)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
