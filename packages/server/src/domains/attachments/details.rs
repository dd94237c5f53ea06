//! Splitting of the combined "name, form, dose" column.

use lazy_static::lazy_static;
use regex::Regex;

/// Abbreviation fixes, applied in this order before extraction.
const ABBREVIATIONS: [(&str, &str); 7] = [
    ("tabl.", "tabletki"),
    ("tabletka", "tabletki"),
    ("kaps.", "kapsułki"),
    ("powl.", "powlekane"),
    ("powlekana", "powlekane"),
    ("przedł.", "przedłużonym"),
    ("tabletkipowlekane", "tabletki powlekane"),
];

lazy_static! {
    // name: up to the first comma; form: no digits; dose: from the first digit on
    static ref DETAILS_REGEX: Regex =
        Regex::new(r"^\s*([^,]*),\s*([^\d]*),\s*(\d.*\S)\s*$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrugDetails {
    pub name: String,
    pub form: String,
    pub dose: String,
}

/// Expand the abbreviations used in the source spreadsheets.
pub fn expand_abbreviations(text: &str) -> String {
    ABBREVIATIONS
        .iter()
        .fold(text.to_string(), |acc, (abbreviation, full)| {
            acc.replace(abbreviation, full)
        })
}

/// Extract name, form and dose. Returns `None` when the field does not
/// have the three-part shape.
pub fn extract_details(combined: &str) -> Option<DrugDetails> {
    let expanded = expand_abbreviations(combined);
    let captures = DETAILS_REGEX.captures(&expanded)?;

    Some(DrugDetails {
        name: captures[1].to_string(),
        form: captures[2].to_string(),
        dose: captures[3].to_string(),
    })
}
