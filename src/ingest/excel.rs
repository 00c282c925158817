//! Spreadsheet input. The first worksheet is read into the same header and
//! record shape the CSV reader produces, so validation and conversion do not
//! care where a table came from.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use csv::StringRecord;

use crate::error::{Error, Result};

/// File extensions read through calamine instead of the CSV reader.
pub const EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

/// Read the first worksheet: the first row is the header, fully blank rows
/// are skipped.
pub fn read_first_sheet(path: &Path) -> Result<(StringRecord, Vec<StringRecord>)> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::Excel(format!("{} has no worksheets", path.display())))??;

    let mut rows = range.rows();
    let headers: StringRecord = match rows.next() {
        Some(cells) => cells.iter().map(|c| super::normalize_header(&cell_text(c))).collect(),
        None => StringRecord::new(),
    };
    let records = rows
        .map(|cells| cells.iter().map(|c| cell_text(c).trim().to_string()).collect::<StringRecord>())
        .filter(|record| record.iter().any(|cell| !cell.is_empty()))
        .collect();
    Ok((headers, records))
}

/// Render a cell the way it would appear in a CSV export.
///
/// Date cells become `YYYY-MM-DD`, time-of-day cells `HH:MM:SS`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ts) if dt.as_f64() < 1.0 => ts.format("%H:%M:%S").to_string(),
            Some(ts) if dt.as_f64().fract() == 0.0 => ts.format("%Y-%m-%d").to_string(),
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::Error(e) => format!("#{e:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spreadsheet_extensions() {
        assert!(is_spreadsheet(Path::new("data/employees.xlsx")));
        assert!(is_spreadsheet(Path::new("EMPLOYEES.XLS")));
        assert!(!is_spreadsheet(Path::new("employees.csv")));
        assert!(!is_spreadsheet(Path::new("employees")));
    }

    #[test]
    fn test_numeric_cells_render_like_csv() {
        assert_eq!(cell_text(&Data::Float(1001.0)), "1001");
        assert_eq!(cell_text(&Data::Float(15000.5)), "15000.5");
        assert_eq!(cell_text(&Data::Int(42)), "42");
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("Sales".into())), "Sales");
    }

    #[test]
    fn test_missing_workbook_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_first_sheet(&dir.path().join("nope.xlsx")).is_err());
    }
}
