//! Reading announcement spreadsheets with calamine.

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader};

use super::{AttachmentError, AttachmentRow};

/// Row holding the column headers; data follows it.
const HEADER_ROW: usize = 2;

// Zero-based column positions (B, C, D, E, O, P)
const COL_ACTIVE_INGREDIENT: usize = 1;
const COL_NAME_FORM_DOSE: usize = 2;
const COL_PACKAGE_CONTENTS: usize = 3;
const COL_EAN: usize = 4;
const COL_REFUND_LEVEL: usize = 14;
const COL_COPAY: usize = 15;

/// Read attachment rows from an in-memory workbook (xlsx or xls).
pub fn read_rows_from_bytes(bytes: Vec<u8>) -> Result<Vec<AttachmentRow>, AttachmentError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(AttachmentError::NoWorksheet)??;
    Ok(rows_from_range(&range))
}

/// Read attachment rows from a workbook on disk.
pub fn read_rows_from_path(path: &Path) -> Result<Vec<AttachmentRow>, AttachmentError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(AttachmentError::NoWorksheet)??;
    Ok(rows_from_range(&range))
}

/// Pick the six used columns out of every data row below the header.
///
/// Positions are relative to the sheet origin, not to the first used cell.
pub fn rows_from_range(range: &Range<Data>) -> Vec<AttachmentRow> {
    let first_data_row = HEADER_ROW as u32 + 1;
    let (last_row, _) = match range.end() {
        Some(end) => end,
        None => return Vec::new(),
    };

    (first_data_row..=last_row)
        .map(|row| {
            let cell = |col: usize| cell_text(range, row, col as u32);
            AttachmentRow {
                active_ingredient: cell(COL_ACTIVE_INGREDIENT),
                name_form_dose: cell(COL_NAME_FORM_DOSE),
                package_contents: cell(COL_PACKAGE_CONTENTS),
                ean: cell(COL_EAN),
                refund_level: cell(COL_REFUND_LEVEL),
                copay: cell(COL_COPAY),
            }
        })
        .filter(|row| !row.is_blank())
        .collect()
}

fn cell_text(range: &Range<Data>, row: u32, col: u32) -> String {
    match range.get_value((row, col)) {
        None | Some(Data::Empty) => String::new(),
        Some(value) => value.to_string().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet_with_rows(rows: &[[&str; 6]]) -> Range<Data> {
        let last_row = HEADER_ROW as u32 + rows.len() as u32;
        let mut range = Range::new((0, 0), (last_row, COL_COPAY as u32));
        let columns = [
            COL_ACTIVE_INGREDIENT,
            COL_NAME_FORM_DOSE,
            COL_PACKAGE_CONTENTS,
            COL_EAN,
            COL_REFUND_LEVEL,
            COL_COPAY,
        ];

        range.set_value((0, 0), Data::String("Obwieszczenie".to_string()));
        range.set_value((HEADER_ROW as u32, 1), Data::String("Substancja czynna".to_string()));

        for (i, row) in rows.iter().enumerate() {
            let r = HEADER_ROW as u32 + 1 + i as u32;
            for (col, value) in columns.iter().zip(row.iter()) {
                range.set_value((r, *col as u32), Data::String(value.to_string()));
            }
        }
        range
    }

    #[test]
    fn test_reads_columns_by_position() {
        let range = sheet_with_rows(&[[
            "Paracetamolum",
            "Apap, tabletki, 500 mg",
            "10 tabl.",
            "5909990000001",
            "ryczałt",
            "3,20",
        ]]);

        let rows = rows_from_range(&range);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].active_ingredient, "Paracetamolum");
        assert_eq!(rows[0].name_form_dose, "Apap, tabletki, 500 mg");
        assert_eq!(rows[0].package_contents, "10 tabl.");
        assert_eq!(rows[0].ean, "5909990000001");
        assert_eq!(rows[0].refund_level, "ryczałt");
        assert_eq!(rows[0].copay, "3,20");
    }

    #[test]
    fn test_numeric_cells_become_text() {
        let mut range = sheet_with_rows(&[[
            "Ibuprofenum",
            "Ibum, tabletki, 200 mg",
            "20 szt.",
            "",
            "50%",
            "",
        ]]);
        range.set_value((3, COL_EAN as u32), Data::Float(5909990000018.0));
        range.set_value((3, COL_COPAY as u32), Data::Float(4.5));

        let rows = rows_from_range(&range);

        assert_eq!(rows[0].ean, "5909990000018");
        assert_eq!(rows[0].copay, "4.5");
    }

    #[test]
    fn test_header_and_blank_rows_are_skipped() {
        let range = sheet_with_rows(&[["", "", "", "", "", ""]]);
        assert!(rows_from_range(&range).is_empty());
    }
}
