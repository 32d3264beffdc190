use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use tracing::{debug, info};

use crate::error::{BudgetError, Result};
use crate::intake::check_file;
use crate::model::row::RawRecord;
use crate::repository::traits::RecordSource;

/// Decodes the first sheet of an xlsx/xls buffer into header-keyed records.
///
/// Cells are read as text. Any codec failure collapses into
/// `BudgetError::FileRead`; nothing is returned on failure.
pub fn decode_workbook(bytes: &[u8]) -> Result<Vec<RawRecord>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| BudgetError::FileRead("Skoroszyt nie zawiera arkuszy".to_string()))??;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|c| cell_text(c).trim().to_string()).collect(),
        None => return Ok(Vec::new()),
    };

    let mut records = Vec::new();
    for row in rows {
        if row.iter().all(|c| cell_text(c).trim().is_empty()) {
            continue;
        }
        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .filter(|(h, _)| !h.is_empty())
            .map(|(h, c)| (h.clone(), cell_text(c)))
            .collect();
        records.push(record);
    }

    debug!(rows = records.len(), columns = headers.len(), "decoded first sheet");
    Ok(records)
}

/// Loose text rendering of a cell.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) => match cell.as_date() {
            Some(d) => d.format("%Y-%m-%d").to_string(),
            None => cell.to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

/// A workbook on disk; intake checks run before the file is read.
#[derive(Clone)]
pub struct WorkbookSource {
    path: PathBuf,
}

impl WorkbookSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for WorkbookSource {
    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn load(&self) -> Result<Vec<RawRecord>> {
        let metadata = fs::metadata(&self.path)?;
        check_file(&self.name(), metadata.len())?;

        let bytes = fs::read(&self.path)
            .map_err(|e| BudgetError::FileRead(e.to_string()))?;
        let records = decode_workbook(&bytes)?;
        info!(file = %self.path.display(), rows = records.len(), "loaded workbook");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    fn sample_workbook() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let headers = ["data", "typ_programu", "nazwa_programu", "dzialanie", "liczba_osob", "liczba_dzialan"];
        for (col, h) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *h).unwrap();
        }

        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let date = ExcelDateTime::from_ymd(2024, 1, 15).unwrap();
        sheet.write_datetime_with_format(1, 0, &date, &date_format).unwrap();
        sheet.write_string(1, 1, "Edukacja").unwrap();
        sheet.write_string(1, 2, "Program A").unwrap();
        sheet.write_string(1, 3, "Warsztaty").unwrap();
        sheet.write_number(1, 4, 10.0).unwrap();
        sheet.write_number(1, 5, 5.0).unwrap();

        // Row 2 left blank on purpose.

        sheet.write_string(3, 0, "2024-02-01").unwrap();
        sheet.write_string(3, 1, "Akcja").unwrap();
        sheet.write_string(3, 4, "3").unwrap();

        let second = workbook.add_worksheet();
        second.write_string(0, 0, "ignored").unwrap();

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_decode_first_sheet_as_text() {
        let records = decode_workbook(&sample_workbook()).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first["data"], "2024-01-15");
        assert_eq!(first["typ_programu"], "Edukacja");
        assert_eq!(first["liczba_osob"], "10");
        assert_eq!(first["liczba_dzialan"], "5");

        let second = &records[1];
        assert_eq!(second["data"], "2024-02-01");
        assert_eq!(second["liczba_osob"], "3");
    }

    #[test]
    fn test_corrupt_buffer_is_file_read_error() {
        let result = decode_workbook(b"definitely not a spreadsheet");
        assert!(matches!(result, Err(BudgetError::FileRead(_))));
    }

    #[test]
    fn test_cell_text_floats() {
        assert_eq!(cell_text(&Data::Float(12.0)), "12");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn test_source_rejects_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dane.csv");
        fs::write(&path, "a,b").unwrap();
        let result = WorkbookSource::new(&path).load();
        assert!(matches!(result, Err(BudgetError::InvalidFileType(_))));
    }

    #[test]
    fn test_source_loads_workbook_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dane.xlsx");
        fs::write(&path, sample_workbook()).unwrap();

        let source = WorkbookSource::new(&path);
        assert_eq!(source.name(), "dane.xlsx");
        assert_eq!(source.load().unwrap().len(), 2);
    }
}
