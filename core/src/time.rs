use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

// Excel day 0 is 1899-12-30 once the 1900 leap-year bug is accounted for.
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
// Serial numbers outside this window are more likely counts than dates.
const EXCEL_SERIAL_RANGE: std::ops::RangeInclusive<f64> = 1.0..=2_958_465.0;
// Serials read from text must fall on or after 1970-01-01; smaller numbers are years or counts.
const TEXT_SERIAL_MIN: f64 = 25_569.0;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%Y/%m/%d", "%Y.%m.%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

/// Parses the date cell of an input row.
pub fn parse_row_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Empty date"));
    }

    // 1. Plain dates
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(input, fmt) {
            return Ok(d);
        }
    }

    // 2. Date with time of day
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return Ok(dt.date());
        }
    }

    // 3. Excel serial number read as text
    if let Some(serial) = text_serial(input) {
        return from_excel_serial(serial);
    }

    Err(anyhow!("Could not parse date: {}", input))
}

/// Month number (1-12) of a row date, `None` if the text is not a date.
pub fn row_month(input: &str) -> Option<u32> {
    parse_row_date(input).ok().map(|d| d.month())
}

/// Plain `digits[.digits]` within the text serial window.
fn text_serial(input: &str) -> Option<f64> {
    let (whole, fraction) = match input.find(|c| c == '.' || c == ',') {
        Some(i) => (&input[..i], &input[i + 1..]),
        None => (input, "0"),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(whole) || !digits(fraction) {
        return None;
    }
    let serial = format!("{}.{}", whole, fraction).parse::<f64>().ok()?;
    (serial >= TEXT_SERIAL_MIN).then_some(serial)
}

pub fn from_excel_serial(serial: f64) -> Result<NaiveDate> {
    if !serial.is_finite() || !EXCEL_SERIAL_RANGE.contains(&serial) {
        return Err(anyhow!("Serial date out of range: {}", serial));
    }
    let (y, m, d) = EXCEL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| anyhow!("Invalid epoch"))?;
    epoch
        .checked_add_signed(Duration::days(serial.trunc() as i64))
        .ok_or_else(|| anyhow!("Serial date out of range: {}", serial))
}
