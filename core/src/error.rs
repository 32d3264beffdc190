//! Error types for the budget-meter pipeline.
//!
//! Every failure a user action can hit maps to one variant here. The session
//! layer turns them into a single display string, so the messages are written
//! for the person who picked the file.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BudgetError {
    /// Extension outside the spreadsheet allow-list
    #[error("Nieprawidłowy typ pliku '{0}'. Dozwolone są pliki .xlsx i .xls")]
    InvalidFileType(String),

    /// File larger than the intake ceiling
    #[error("Plik jest za duży ({size} B). Maksymalny rozmiar to {max} B")]
    FileTooLarge { size: u64, max: u64 },

    /// The spreadsheet codec could not read the buffer
    #[error("Błąd odczytu pliku: {0}")]
    FileRead(String),

    /// A row failed shape validation; aborts the whole aggregation
    #[error("Nieprawidłowe dane w wierszu {row}: pole '{field}' {reason} (odczytano: '{value}')")]
    InvalidRow {
        row: usize,
        field: String,
        reason: String,
        value: String,
    },

    /// Unparseable date under the strict date policy
    #[error("Nieprawidłowa data w wierszu {row}: '{value}'")]
    InvalidDate { row: usize, value: String },

    #[error("Wybierz co najmniej jeden miesiąc")]
    NoMonthsSelected,

    #[error("Nieprawidłowy miesiąc: {0}. Dozwolone wartości to 1-12")]
    InvalidMonth(u32),

    #[error("Brak wczytanych danych")]
    NoData,

    #[error("Błąd eksportu: {0}")]
    Export(String),

    #[error("Błąd konfiguracji: {0}")]
    Config(String),

    #[error("Błąd wejścia/wyjścia: {0}")]
    Io(#[from] std::io::Error),
}

impl From<calamine::Error> for BudgetError {
    fn from(err: calamine::Error) -> Self {
        BudgetError::FileRead(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for BudgetError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        BudgetError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BudgetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_error_names_field_and_value() {
        let err = BudgetError::InvalidRow {
            row: 4,
            field: "liczba_osob".to_string(),
            reason: "musi być liczbą całkowitą".to_string(),
            value: "abc".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("wierszu 4"));
        assert!(msg.contains("liczba_osob"));
        assert!(msg.contains("'abc'"));
    }

    #[test]
    fn test_codec_errors_become_file_read() {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "zip");
        let err: BudgetError = calamine::Error::Io(io).into();
        assert!(matches!(err, BudgetError::FileRead(_)));
    }
}
