//! Announcement attachments: spreadsheet rows to refund records.
//!
//! Pipeline per attachment:
//! 1. read the six used columns, drop exact duplicates
//! 2. drop combination products (`+` in the active ingredient)
//! 3. split "name, form, dose" and keep only accepted dosage forms
//! 4. normalize the dose, compute the price per unit

pub mod details;
pub mod forms;
pub mod workbook;

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domains::dosage::Dose;
use crate::domains::refunds::models::Refund;

pub use details::{expand_abbreviations, extract_details, DrugDetails};
pub use forms::{is_multi_ingredient, DosageForm};

/// Fractional digits kept for unit prices.
pub const UNIT_PRICE_SCALE: u32 = 4;

lazy_static! {
    static ref PACKAGE_UNITS_REGEX: Regex = Regex::new(r"(\d+) (szt|tabl|kaps)").unwrap();
}

#[derive(Error, Debug)]
pub enum AttachmentError {
    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Workbook has no worksheet")]
    NoWorksheet,

    #[error("Dosage form not accepted: {0}")]
    UnsupportedForm(String),
}

/// The used columns of one spreadsheet row, as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttachmentRow {
    pub active_ingredient: String,
    pub name_form_dose: String,
    pub package_contents: String,
    pub ean: String,
    pub refund_level: String,
    pub copay: String,
}

impl AttachmentRow {
    pub fn is_blank(&self) -> bool {
        self.active_ingredient.is_empty()
            && self.name_form_dose.is_empty()
            && self.package_contents.is_empty()
            && self.ean.is_empty()
            && self.refund_level.is_empty()
            && self.copay.is_empty()
    }
}

/// Number of dispensing units in a package description such as `30 tabl.`.
pub fn package_unit_count(package_contents: &str) -> Option<u32> {
    PACKAGE_UNITS_REGEX
        .captures(package_contents)
        .and_then(|captures| captures[1].parse().ok())
}

/// Parse a copay amount that may use a decimal comma.
pub fn parse_copay(copay: &str) -> Option<Decimal> {
    Decimal::from_str(copay.trim().replace(',', ".").as_str()).ok()
}

/// Copay divided by the unit count, rounded to the stored scale.
pub fn unit_price(copay: Decimal, units: u32) -> Option<Decimal> {
    if units == 0 {
        return None;
    }
    copay.checked_div(Decimal::from(units)).map(|price| {
        price.round_dp_with_strategy(UNIT_PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
    })
}

/// Turn one row into a record, or `None` when the row is excluded.
pub fn build_record(row: &AttachmentRow, announcement_date: NaiveDate) -> Option<Refund> {
    if is_multi_ingredient(&row.active_ingredient) {
        debug!(ean = %row.ean, "Skipping combination product");
        return None;
    }

    let details = extract_details(&row.name_form_dose)?;
    let form = match DosageForm::from_str(&details.form) {
        Ok(form) => form,
        Err(_) => {
            debug!(ean = %row.ean, form = %details.form, "Skipping dosage form");
            return None;
        }
    };

    let dose = match Dose::from_str(&details.dose) {
        Ok(dose) => dose,
        Err(e) => {
            warn!(ean = %row.ean, error = %e, "Skipping row with unusable dose");
            return None;
        }
    };
    if dose.has_unparsed() {
        warn!(ean = %row.ean, dose = %dose, "Dose kept partly unnormalized");
    }
    let dose = dose.to_string();

    let Some(units) = package_unit_count(&row.package_contents) else {
        warn!(
            ean = %row.ean,
            package = %row.package_contents,
            "No unit count in package description"
        );
        return None;
    };
    let Some(copay) = parse_copay(&row.copay) else {
        warn!(ean = %row.ean, copay = %row.copay, "Copay is not a number");
        return None;
    };
    let Some(unit_price) = unit_price(copay, units) else {
        warn!(ean = %row.ean, "Package holds zero units");
        return None;
    };

    let concise_form = form.concise_label();

    Some(Refund {
        ean: row.ean.clone(),
        announcement_date,
        refund_level: row.refund_level.clone(),
        active_ingredient: row.active_ingredient.clone(),
        form: concise_form.to_string(),
        description_label: format!("{} {} {}", details.name, form.label(), row.package_contents),
        description_dropdown: format!(
            "{} {} {} {} {}",
            details.name, concise_form, row.package_contents, row.active_ingredient, dose
        ),
        description_list_item: details.name,
        dose,
        unit_price,
    })
}

/// Build the records of one attachment. Exact duplicate rows count once.
pub fn build_records(rows: &[AttachmentRow], announcement_date: NaiveDate) -> Vec<Refund> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|row| seen.insert(*row))
        .filter_map(|row| build_record(row, announcement_date))
        .collect()
}

/// Parse a downloaded attachment.
pub fn parse_attachment_bytes(
    bytes: Vec<u8>,
    announcement_date: NaiveDate,
) -> Result<Vec<Refund>, AttachmentError> {
    let rows = workbook::read_rows_from_bytes(bytes)?;
    Ok(build_records(&rows, announcement_date))
}

/// Parse an archived attachment from disk.
pub fn parse_attachment_file(
    path: &Path,
    announcement_date: NaiveDate,
) -> Result<Vec<Refund>, AttachmentError> {
    let rows = workbook::read_rows_from_path(path)?;
    Ok(build_records(&rows, announcement_date))
}
