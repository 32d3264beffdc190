use tracing::{debug, info};

use crate::config::{ColumnMap, DatePolicy};
use crate::error::{BudgetError, Result};
use crate::model::aggregate::MonthlyAggregate;
use crate::model::months::MonthSelection;
use crate::model::row::RawRecord;
use crate::time::row_month;
use crate::validate::validate_row;

/// Folds records into the program type / program / action tree for the
/// selected months.
///
/// Each record is validated as it is folded and the first invalid one aborts
/// the run. A record whose date does not parse is dropped under
/// `DatePolicy::Lenient` and aborts under `DatePolicy::Strict`.
pub fn aggregate_monthly(
    records: &[RawRecord],
    months: &MonthSelection,
    columns: &ColumnMap,
    policy: DatePolicy,
) -> Result<MonthlyAggregate> {
    if months.is_empty() {
        return Err(BudgetError::NoMonthsSelected);
    }

    let mut aggregate = MonthlyAggregate::new(months.selected());

    for (idx, record) in records.iter().enumerate() {
        // Spreadsheet row number: header is row 1.
        let row_number = idx + 2;
        let row = validate_row(record, columns).map_err(|v| v.into_error(row_number))?;

        let month = match row_month(&row.date) {
            Some(m) => m,
            None => match policy {
                DatePolicy::Lenient => {
                    debug!(row = row_number, date = %row.date, "skipping row with unparseable date");
                    aggregate.skipped_rows += 1;
                    continue;
                }
                DatePolicy::Strict => {
                    return Err(BudgetError::InvalidDate {
                        row: row_number,
                        value: row.date,
                    });
                }
            },
        };

        if !months.is_selected(month) {
            continue;
        }

        aggregate.add(
            &row.program_type,
            &row.program_name,
            &row.action_name,
            row.people,
            row.actions,
        );
    }

    info!(
        rows = records.len(),
        included = aggregate.included_rows,
        skipped = aggregate.skipped_rows,
        people = aggregate.all_people,
        actions = aggregate.all_actions,
        "monthly aggregation finished"
    );
    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::aggregate::ActionTotals;

    fn record(date: &str, ptype: &str, pname: &str, action: &str, people: &str, actions: &str) -> RawRecord {
        [
            ("data", date),
            ("typ_programu", ptype),
            ("nazwa_programu", pname),
            ("dzialanie", action),
            ("liczba_osob", people),
            ("liczba_dzialan", actions),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn january() -> MonthSelection {
        MonthSelection::from_months([1]).unwrap()
    }

    #[test]
    fn test_single_row_scenario() {
        let records = vec![record("2024-01-15", "Edukacja", "Program A", "Warsztaty", "10", "5")];
        let agg = aggregate_monthly(&records, &january(), &ColumnMap::default(), DatePolicy::Lenient).unwrap();

        assert_eq!(
            agg.data["Edukacja"]["Program A"]["Warsztaty"],
            ActionTotals { people: 10, action_number: 5 }
        );
        assert_eq!(agg.all_people, 10);
        assert_eq!(agg.all_actions, 5);
        assert_eq!(agg.months, vec![1]);
    }

    #[test]
    fn test_unselected_month_excluded() {
        let records = vec![
            record("2024-01-15", "Edukacja", "Program A", "Warsztaty", "10", "5"),
            record("2024-02-15", "Edukacja", "Program A", "Warsztaty", "7", "3"),
        ];
        let agg = aggregate_monthly(&records, &january(), &ColumnMap::default(), DatePolicy::Lenient).unwrap();
        assert_eq!(agg.all_people, 10);
        assert_eq!(agg.all_actions, 5);
        assert_eq!(agg.included_rows, 1);
    }

    #[test]
    fn test_no_months_rejects_before_reading_rows() {
        // The bad row would fail validation if it were read.
        let records = vec![record("2024-01-15", "", "", "", "x", "y")];
        let result = aggregate_monthly(&records, &MonthSelection::new(), &ColumnMap::default(), DatePolicy::Lenient);
        assert!(matches!(result, Err(BudgetError::NoMonthsSelected)));
    }

    #[test]
    fn test_bad_shape_aborts_whole_run() {
        let records = vec![
            record("2024-01-15", "Edukacja", "Program A", "Warsztaty", "10", "5"),
            record("2024-01-16", "Edukacja", "Program A", "Warsztaty", "dziesięć", "5"),
        ];
        let err = aggregate_monthly(&records, &january(), &ColumnMap::default(), DatePolicy::Lenient).unwrap_err();
        match err {
            BudgetError::InvalidRow { row, field, value, .. } => {
                assert_eq!(row, 3);
                assert_eq!(field, "liczba_osob");
                assert_eq!(value, "dziesięć");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_shape_in_unselected_month_still_aborts() {
        let records = vec![record("2024-05-01", "Edukacja", "", "Warsztaty", "1", "1")];
        let result = aggregate_monthly(&records, &january(), &ColumnMap::default(), DatePolicy::Lenient);
        assert!(matches!(result, Err(BudgetError::InvalidRow { .. })));
    }

    #[test]
    fn test_date_policy() {
        let records = vec![
            record("kiedyś", "Edukacja", "Program A", "Warsztaty", "4", "1"),
            record("2024-01-20", "Edukacja", "Program A", "Warsztaty", "6", "1"),
        ];

        let lenient = aggregate_monthly(&records, &january(), &ColumnMap::default(), DatePolicy::Lenient).unwrap();
        assert_eq!(lenient.all_people, 6);
        assert_eq!(lenient.skipped_rows, 1);

        let strict = aggregate_monthly(&records, &january(), &ColumnMap::default(), DatePolicy::Strict);
        assert!(matches!(strict, Err(BudgetError::InvalidDate { row: 2, .. })));
    }

    #[test]
    fn test_bare_numbers_are_not_dates() {
        let records = vec![
            record("2024", "Edukacja", "Program A", "Warsztaty", "4", "1"),
            record("12", "Edukacja", "Program A", "Warsztaty", "3", "1"),
            record("2024-01-20", "Edukacja", "Program A", "Warsztaty", "6", "1"),
        ];
        let everything = MonthSelection::all();

        let lenient = aggregate_monthly(&records, &everything, &ColumnMap::default(), DatePolicy::Lenient).unwrap();
        assert_eq!(lenient.all_people, 6);
        assert_eq!(lenient.skipped_rows, 2);

        let strict = aggregate_monthly(&records, &everything, &ColumnMap::default(), DatePolicy::Strict);
        assert!(matches!(strict, Err(BudgetError::InvalidDate { row: 2, ref value }) if value == "2024"));
    }

    #[test]
    fn test_oversized_counts_are_rejected() {
        let records = vec![
            record("2024-01-15", "Edukacja", "Program A", "Warsztaty", "1e19", "1"),
            record("2024-01-16", "Edukacja", "Program A", "Warsztaty", "1e19", "1"),
        ];
        let result = aggregate_monthly(&records, &january(), &ColumnMap::default(), DatePolicy::Lenient);
        assert!(matches!(result, Err(BudgetError::InvalidRow { row: 2, ref field, .. }) if field == "liczba_osob"));

        let at_limit = vec![
            record("2024-01-15", "Edukacja", "Program A", "Warsztaty", "4294967295", "4294967295"),
            record("2024-01-16", "Edukacja", "Program A", "Warsztaty", "4294967295", "1"),
        ];
        let agg = aggregate_monthly(&at_limit, &january(), &ColumnMap::default(), DatePolicy::Lenient).unwrap();
        assert_eq!(agg.all_people, 2 * 4_294_967_295);
        assert_eq!(agg.leaf_totals().people, agg.all_people);
    }

    #[test]
    fn test_rerun_is_identical() {
        let records = vec![
            record("2024-03-01", "Zdrowie", "B", "Wykład", "20", "2"),
            record("2024-01-15", "Edukacja", "A", "Warsztaty", "10", "5"),
            record("2024-03-04", "Zdrowie", "B", "Wykład", "1", "1"),
        ];
        let months = MonthSelection::from_months([1, 3]).unwrap();
        let first = aggregate_monthly(&records, &months, &ColumnMap::default(), DatePolicy::Lenient).unwrap();
        let second = aggregate_monthly(&records, &months, &ColumnMap::default(), DatePolicy::Lenient).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
