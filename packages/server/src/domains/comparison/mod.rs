//! Same-drug comparison: ranking of package variants and the chart view
//! built from them.

pub mod chart;
pub mod ranking;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::domains::refunds::Refund;

pub use chart::{build_chart_view, plot_height, ChartView, TierChart, Visibility};
pub use ranking::{
    rank_variants, PricePoint, Variant, DEFAULT_VISIBLE_VARIANTS, DISPLAY_WINDOW_DAYS,
};

/// Load the chart view of one drug from the store.
pub async fn load_chart_view(ean: &str, today: NaiveDate, pool: &PgPool) -> Result<ChartView> {
    let rows = Refund::price_histories_for_ean(ean, pool).await?;
    if rows.is_empty() {
        anyhow::bail!("No refunds recorded for EAN {}", ean);
    }
    Ok(build_chart_view(ean, rows, today))
}

/// Write the chart view as `<ean>.json` into `out_dir`.
pub async fn write_report(view: &ChartView, out_dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let path = out_dir.join(format!("{}.json", view.ean));
    let body = serde_json::to_vec_pretty(view).context("Failed to serialize chart view")?;
    tokio::fs::write(&path, body)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(path)
}
