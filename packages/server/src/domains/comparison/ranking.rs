use std::cmp::Ordering;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domains::refunds::PriceHistoryRow;

/// Trailing window of price history shown on charts.
pub const DISPLAY_WINDOW_DAYS: i64 = 3 * 365;

/// Ranked variants shown by default; the rest start collapsed in the legend.
pub const DEFAULT_VISIBLE_VARIANTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: Decimal,
}

/// One package variant of a drug within a refund tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variant {
    pub refund_level: String,
    pub description_label: String,
    pub description_list_item: String,
    /// Ordered by date.
    pub points: Vec<PricePoint>,
}

impl Variant {
    pub fn from_history(row: PriceHistoryRow) -> Self {
        let mut points: Vec<PricePoint> = row
            .announcement_dates
            .into_iter()
            .zip(row.unit_prices)
            .map(|(date, price)| PricePoint { date, price })
            .collect();
        points.sort_by_key(|point| point.date);

        Self {
            refund_level: row.refund_level,
            description_label: row.description_label,
            description_list_item: row.description_list_item,
            points,
        }
    }

    /// Drop points older than the display window ending at `today`.
    pub fn within_window(mut self, today: NaiveDate) -> Self {
        let cutoff = today - Duration::days(DISPLAY_WINDOW_DAYS);
        self.points.retain(|point| point.date >= cutoff);
        self
    }

    /// Newest point; the first one published on that date when several are.
    pub fn latest(&self) -> Option<&PricePoint> {
        let latest_date = self.points.iter().map(|point| point.date).max()?;
        self.points.iter().find(|point| point.date == latest_date)
    }
}

/// Most recently published first, then cheapest first.
fn compare_variants(a: &Variant, b: &Variant) -> Ordering {
    match (a.latest(), b.latest()) {
        (Some(a), Some(b)) => b.date.cmp(&a.date).then(a.price.cmp(&b.price)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Rank the variants of one tier. Variants with no points are dropped.
pub fn rank_variants(variants: Vec<Variant>) -> Vec<Variant> {
    let mut ranked: Vec<Variant> = variants
        .into_iter()
        .filter(|variant| !variant.points.is_empty())
        .collect();
    ranked.sort_by(compare_variants);
    ranked
}

/// Group consecutive rows by refund tier, keeping the incoming tier order.
pub fn group_by_tier(rows: Vec<PriceHistoryRow>) -> Vec<(String, Vec<PriceHistoryRow>)> {
    let mut groups: Vec<(String, Vec<PriceHistoryRow>)> = Vec::new();
    for row in rows {
        if let Some((_, members)) = groups
            .last_mut()
            .filter(|(level, _)| *level == row.refund_level)
        {
            members.push(row);
            continue;
        }
        groups.push((row.refund_level.clone(), vec![row]));
    }
    groups
}
