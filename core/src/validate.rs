//! Structural check of a decoded record.

use serde::Serialize;

use crate::config::ColumnMap;
use crate::error::BudgetError;
use crate::model::row::{BudgetRow, RawRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RowViolations {
    pub violations: Vec<FieldViolation>,
}

impl RowViolations {
    fn push(&mut self, field: &str, reason: &str, value: &str) {
        self.violations.push(FieldViolation {
            field: field.to_string(),
            reason: reason.to_string(),
            value: value.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// The error a fold aborts with; names the first offending field.
    pub fn into_error(self, row: usize) -> BudgetError {
        match self.violations.into_iter().next() {
            Some(v) => BudgetError::InvalidRow {
                row,
                field: v.field,
                reason: v.reason,
                value: v.value,
            },
            None => BudgetError::InvalidRow {
                row,
                field: String::new(),
                reason: "nieznany błąd".to_string(),
                value: String::new(),
            },
        }
    }
}

/// Case- and whitespace-insensitive header lookup.
pub fn lookup<'a>(record: &'a RawRecord, header: &str) -> Option<&'a str> {
    if let Some(v) = record.get(header) {
        return Some(v.as_str());
    }
    let wanted = header.trim().to_lowercase();
    record
        .iter()
        .find(|(k, _)| k.trim().to_lowercase() == wanted)
        .map(|(_, v)| v.as_str())
}

pub fn validate_row(record: &RawRecord, columns: &ColumnMap) -> Result<BudgetRow, RowViolations> {
    let mut violations = RowViolations::default();

    let mut required = |header: &str| -> String {
        match lookup(record, header).map(str::trim) {
            Some(v) if !v.is_empty() => v.to_string(),
            Some(v) => {
                violations.push(header, "jest wymagane", v);
                String::new()
            }
            None => {
                violations.push(header, "jest wymagane (brak kolumny)", "");
                String::new()
            }
        }
    };

    let date = required(&columns.date);
    let program_type = required(&columns.program_type);
    let program_name = required(&columns.program_name);
    let action_name = required(&columns.action_name);

    let people = count_field(record, &columns.people, &mut violations);
    let actions = count_field(record, &columns.actions, &mut violations);

    let main_category = optional_text(record, &columns.main_category);
    let sub_category = optional_text(record, &columns.sub_category);

    if !violations.is_empty() {
        return Err(violations);
    }

    Ok(BudgetRow {
        date,
        program_type,
        program_name,
        action_name,
        people,
        actions,
        main_category,
        sub_category,
    })
}

fn count_field(record: &RawRecord, header: &str, violations: &mut RowViolations) -> u64 {
    let Some(raw) = lookup(record, header) else {
        violations.push(header, "jest wymagane (brak kolumny)", "");
        return 0;
    };
    match parse_count(raw) {
        Some(n) => n,
        None => {
            violations.push(header, "musi być liczbą całkowitą od 0 do 4294967295", raw);
            0
        }
    }
}

/// Largest count a single row may carry.
pub const MAX_COUNT: u64 = u32::MAX as u64;

/// Accepts "12", " 12 ", "12.0" and "12,0"; rejects fractions, negatives,
/// exponents and anything above `MAX_COUNT`.
pub fn parse_count(raw: &str) -> Option<u64> {
    let s = raw.trim();
    let (whole, fraction) = match s.find(|c| c == '.' || c == ',') {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(fraction) = fraction {
        if fraction.is_empty() || !fraction.bytes().all(|b| b == b'0') {
            return None;
        }
    }
    whole.parse::<u64>().ok().filter(|n| *n <= MAX_COUNT)
}

/// Empty text and a literal "0" count as absent.
fn optional_text(record: &RawRecord, header: &str) -> Option<String> {
    lookup(record, header)
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "0")
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn full_record() -> RawRecord {
        record(&[
            ("data", "2024-01-15"),
            ("typ_programu", "Edukacja"),
            ("nazwa_programu", "Program A"),
            ("dzialanie", "Warsztaty"),
            ("liczba_osob", "10"),
            ("liczba_dzialan", "5"),
        ])
    }

    #[test]
    fn test_valid_row() {
        let row = validate_row(&full_record(), &ColumnMap::default()).unwrap();
        assert_eq!(row, BudgetRow::new("2024-01-15", "Edukacja", "Program A", "Warsztaty", 10, 5));
    }

    #[test]
    fn test_headers_match_loosely() {
        let rec = record(&[
            (" Data ", "2024-01-15"),
            ("TYP_PROGRAMU", "Edukacja"),
            ("Nazwa_Programu", "Program A"),
            ("dzialanie", "Warsztaty"),
            ("liczba_osob", " 10.0 "),
            ("liczba_dzialan", "5"),
            ("kategoria_glowna", "Zapobieganie otyłości"),
            ("podkategoria", "0"),
        ]);
        let row = validate_row(&rec, &ColumnMap::default()).unwrap();
        assert_eq!(row.people, 10);
        assert_eq!(row.main_category.as_deref(), Some("Zapobieganie otyłości"));
        assert_eq!(row.sub_category, None);
    }

    #[test]
    fn test_reports_every_violation_in_field_order() {
        let mut rec = full_record();
        rec.insert("typ_programu".to_string(), "  ".to_string());
        rec.insert("liczba_osob".to_string(), "abc".to_string());
        rec.remove("liczba_dzialan");

        let errs = validate_row(&rec, &ColumnMap::default()).unwrap_err();
        let fields: Vec<_> = errs.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["typ_programu", "liczba_osob", "liczba_dzialan"]);
        assert_eq!(errs.violations[1].value, "abc");

        let err = errs.into_error(7);
        assert!(matches!(err, BudgetError::InvalidRow { row: 7, ref field, .. } if field == "typ_programu"));
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("0"), Some(0));
        assert_eq!(parse_count("12,0"), Some(12));
        assert_eq!(parse_count("-1"), None);
        assert_eq!(parse_count("2.5"), None);
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("NaN"), None);
        assert_eq!(parse_count(" 7 "), Some(7));
        assert_eq!(parse_count("12.00"), Some(12));
        assert_eq!(parse_count("12."), None);
    }

    #[test]
    fn test_parse_count_rejects_exponents_and_huge_values() {
        assert_eq!(parse_count("1e3"), None);
        assert_eq!(parse_count("1E3"), None);
        assert_eq!(parse_count("+5"), None);
        assert_eq!(parse_count("4294967295"), Some(MAX_COUNT));
        assert_eq!(parse_count("4294967296"), None);
        assert_eq!(parse_count("18446744073709551615"), None);
        assert_eq!(parse_count("99999999999999999999999"), None);
    }
}
