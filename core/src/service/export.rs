use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use crate::error::Result;
use crate::model::aggregate::MonthlyAggregate;
use crate::model::months::month_name;
use crate::service::dto::{SummaryCell, SummaryLine};

pub const SUMMARY_SHEET_NAME: &str = "Podsumowanie";
const EXPORT_FILE_PREFIX: &str = "miernik_budzetowy";
const INDENT: &str = "    ";

pub fn export_file_name(date: NaiveDate) -> String {
    format!("{}_{}.xlsx", EXPORT_FILE_PREFIX, date.format("%Y-%m-%d"))
}

/// Human-readable rows of the summary sheet.
///
/// Header and totals come first, then one line per program type, program
/// and action, indented by level.
pub fn summary_lines(aggregate: &MonthlyAggregate) -> Vec<SummaryLine> {
    let months = aggregate
        .months
        .iter()
        .map(|m| month_name(*m))
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines = vec![
        SummaryLine::new("Miernik budżetowy - podsumowanie", Vec::new()),
        SummaryLine::new("Wybrane miesiące", vec![SummaryCell::Text(months)]),
        SummaryLine::new("Łączna liczba działań", vec![SummaryCell::Count(aggregate.all_actions)]),
        SummaryLine::new("Łączna liczba osób", vec![SummaryCell::Count(aggregate.all_people)]),
        SummaryLine::blank(),
    ];

    if aggregate.is_empty() {
        return lines;
    }

    lines.push(SummaryLine::new(
        "Zestawienie",
        vec![
            SummaryCell::Text("Liczba osób".to_string()),
            SummaryCell::Text("Liczba działań".to_string()),
        ],
    ));

    for (program_type, programs) in &aggregate.data {
        let t = aggregate.program_type_totals(program_type);
        lines.push(SummaryLine::new(
            format!("Typ programu: {}", program_type),
            vec![SummaryCell::Count(t.people), SummaryCell::Count(t.action_number)],
        ));

        for (program_name, actions) in programs {
            let p = aggregate.program_totals(program_type, program_name);
            lines.push(SummaryLine::new(
                format!("{}Program: {}", INDENT, program_name),
                vec![SummaryCell::Count(p.people), SummaryCell::Count(p.action_number)],
            ));

            for (action_name, totals) in actions {
                lines.push(SummaryLine::new(
                    format!("{}{}Działanie: {}", INDENT, INDENT, action_name),
                    vec![
                        SummaryCell::Count(totals.people),
                        SummaryCell::Count(totals.action_number),
                    ],
                ));
            }
        }
    }

    lines
}

pub fn build_workbook(aggregate: &MonthlyAggregate) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SUMMARY_SHEET_NAME)?;
    sheet.set_column_width(0, 48)?;
    sheet.set_column_width(1, 16)?;
    sheet.set_column_width(2, 16)?;

    for (row, line) in summary_lines(aggregate).iter().enumerate() {
        let row = row as u32;
        if line.label.starts_with("Typ programu") || row == 0 {
            sheet.write_string_with_format(row, 0, &line.label, &bold)?;
        } else if !line.label.is_empty() {
            sheet.write_string(row, 0, &line.label)?;
        }

        for (col, cell) in line.cells.iter().enumerate() {
            let col = col as u16 + 1;
            match cell {
                SummaryCell::Text(text) => {
                    sheet.write_string(row, col, text)?;
                }
                SummaryCell::Count(n) => {
                    sheet.write_number(row, col, *n as f64)?;
                }
            }
        }
    }

    Ok(workbook)
}

pub fn export_to_bytes(aggregate: &MonthlyAggregate) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(aggregate)?;
    Ok(workbook.save_to_buffer()?)
}

/// Writes `miernik_budzetowy_<date>.xlsx` into `dir` and returns its path.
pub fn export_to_dir(aggregate: &MonthlyAggregate, dir: &Path, date: NaiveDate) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(date));
    let bytes = export_to_bytes(aggregate)?;
    fs::write(&path, bytes)?;
    info!(path = %path.display(), "exported summary");
    Ok(path)
}
