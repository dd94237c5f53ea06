//! Chart figures for the price-trend view, in plotly's figure schema.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use super::ranking::{group_by_tier, rank_variants, Variant, DEFAULT_VISIBLE_VARIANTS};
use crate::domains::refunds::PriceHistoryRow;

const BASE_HEIGHT: u32 = 600;
const HEIGHT_PER_LEGEND_ROW: u32 = 30;
const Y_AXIS_TITLE: &str = "Cena za jednostkę leku [zł]";

// plotly marker symbol codes
const MARKER_SYMBOLS: [u32; 4] = [37, 38, 39, 40];
const MARKER_COLORS: [&str; 10] = [
    "rgb(31, 119, 180)",
    "rgb(255, 127, 14)",
    "rgb(44, 160, 44)",
    "rgb(214, 39, 40)",
    "rgb(148, 103, 189)",
    "rgb(140, 86, 75)",
    "rgb(227, 119, 194)",
    "rgb(127, 127, 127)",
    "rgb(188, 189, 34)",
    "rgb(23, 190, 207)",
];

/// Everything shown for one selected drug.
#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    pub ean: String,
    pub tiers: Vec<TierChart>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TierChart {
    pub refund_level: String,
    /// `"{rank}. {description_label}"` per ranked variant.
    pub legend: Vec<String>,
    pub figure: Figure,
}

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    pub x: Vec<NaiveDate>,
    pub y: Vec<Decimal>,
    pub name: String,
    pub mode: &'static str,
    pub marker: Marker,
    pub hoverinfo: &'static str,
    pub text: Vec<String>,
    pub visible: Visibility,
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub line: MarkerLine,
    pub size: u32,
    pub symbol: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkerLine {
    pub color: &'static str,
    pub width: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: String,
    pub showlegend: bool,
    pub yaxis: Axis,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub title: &'static str,
    pub automargin: bool,
    pub rangemode: &'static str,
}

/// Trace visibility: drawn, or listed in the legend only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    LegendOnly,
}

impl Serialize for Visibility {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Visibility::Visible => serializer.serialize_bool(true),
            Visibility::LegendOnly => serializer.serialize_str("legendonly"),
        }
    }
}

pub fn marker_for(index: usize) -> Marker {
    Marker {
        line: MarkerLine {
            color: MARKER_COLORS[index % MARKER_COLORS.len()],
            width: 2,
        },
        size: 15,
        symbol: MARKER_SYMBOLS[index % MARKER_SYMBOLS.len()],
    }
}

/// Plot height that fits `legend_rows` legend entries without scrolling.
pub fn plot_height(legend_rows: usize) -> u32 {
    let fitting = (BASE_HEIGHT / HEIGHT_PER_LEGEND_ROW) as usize;
    let extra = legend_rows.saturating_sub(fitting) as u32;
    BASE_HEIGHT + HEIGHT_PER_LEGEND_ROW * extra
}

fn trace_for(index: usize, variant: &Variant) -> Trace {
    let rank = index + 1;
    Trace {
        x: variant.points.iter().map(|point| point.date).collect(),
        y: variant.points.iter().map(|point| point.price).collect(),
        name: format!("{}. {}", rank, variant.description_list_item),
        mode: "lines+markers",
        marker: marker_for(index),
        hoverinfo: "text",
        text: variant
            .points
            .iter()
            .map(|point| format!("{}. {} zł", rank, point.price))
            .collect(),
        visible: if index < DEFAULT_VISIBLE_VARIANTS {
            Visibility::Visible
        } else {
            Visibility::LegendOnly
        },
    }
}

/// Build the per-tier charts for a drug from its same-drug price histories.
///
/// `today` anchors the display window.
pub fn build_chart_view(ean: &str, rows: Vec<PriceHistoryRow>, today: NaiveDate) -> ChartView {
    let tiers = group_by_tier(rows);
    let legend_rows = tiers.iter().map(|(_, rows)| rows.len()).max().unwrap_or(0);
    let height = plot_height(legend_rows);

    let tiers = tiers
        .into_iter()
        .map(|(refund_level, rows)| {
            let ranked = rank_variants(
                rows.into_iter()
                    .map(|row| Variant::from_history(row).within_window(today))
                    .collect(),
            );

            TierChart {
                legend: ranked
                    .iter()
                    .enumerate()
                    .map(|(i, variant)| format!("{}. {}", i + 1, variant.description_label))
                    .collect(),
                figure: Figure {
                    data: ranked
                        .iter()
                        .enumerate()
                        .map(|(i, variant)| trace_for(i, variant))
                        .collect(),
                    layout: Layout {
                        title: refund_level.clone(),
                        showlegend: true,
                        yaxis: Axis {
                            title: Y_AXIS_TITLE,
                            automargin: true,
                            rangemode: "tozero",
                        },
                        height,
                    },
                },
                refund_level,
            }
        })
        .collect();

    ChartView {
        ean: ean.to_string(),
        tiers,
    }
}
