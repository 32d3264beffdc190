use tracing::info;

use crate::config::ColumnMap;
use crate::error::Result;
use crate::model::category::{normalize_category, CategoryAggregate, GroupKey};
use crate::model::row::RawRecord;
use crate::validate::validate_row;

/// Five-bucket breakdown over every record, regardless of month selection.
pub fn aggregate_categories(records: &[RawRecord], columns: &ColumnMap) -> Result<CategoryAggregate> {
    let mut aggregate = CategoryAggregate::default();

    for (idx, record) in records.iter().enumerate() {
        let row = validate_row(record, columns).map_err(|v| v.into_error(idx + 2))?;

        let category = normalize_category(row.main_category.as_deref());
        let key = match row.sub_category_label() {
            Some(label) => GroupKey::SubCategory(label.to_string()),
            None => GroupKey::Program {
                program_type: row.program_type.clone(),
                program_name: row.program_name.clone(),
            },
        };

        let breakdown = aggregate.get_mut(category);
        let group = breakdown.group_mut(key);
        group.record_program(&row.program_name);
        group.add_action(&row.action_name, row.people, row.actions);

        breakdown.total_people += row.people;
        breakdown.total_actions += row.actions;
        aggregate.total_people += row.people;
        aggregate.total_actions += row.actions;
    }

    info!(
        rows = records.len(),
        people = aggregate.total_people,
        actions = aggregate.total_actions,
        "category aggregation finished"
    );
    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BudgetError;
    use crate::model::category::MainCategory;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        let mut rec: RawRecord = [
            ("data", "2024-01-15"),
            ("typ_programu", "Edukacja"),
            ("nazwa_programu", "Program A"),
            ("dzialanie", "Warsztaty"),
            ("liczba_osob", "10"),
            ("liczba_dzialan", "1"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (k, v) in pairs {
            rec.insert(k.to_string(), v.to_string());
        }
        rec
    }

    #[test]
    fn test_each_row_lands_in_one_bucket() {
        let records = vec![
            record(&[("kategoria_glowna", "ZAPOBIEGANIE OTYŁOŚCI")]),
            record(&[("kategoria_glowna", "Profilaktyka HIV")]),
            record(&[("kategoria_glowna", "coś innego")]),
            record(&[]),
        ];
        let agg = aggregate_categories(&records, &ColumnMap::default()).unwrap();

        assert_eq!(agg.get(MainCategory::Obesity).total_people, 10);
        assert_eq!(agg.get(MainCategory::Hiv).total_people, 10);
        assert_eq!(agg.get(MainCategory::Other).total_people, 20);
        assert_eq!(agg.get(MainCategory::Tobacco).groups.len(), 0);

        let bucket_sum: u64 = agg.categories.iter().map(|c| c.total_people).sum();
        assert_eq!(bucket_sum, agg.total_people);
        assert_eq!(agg.total_actions, 4);
    }

    #[test]
    fn test_sub_category_groups_programs() {
        let records = vec![
            record(&[("podkategoria", "Szkoły"), ("nazwa_programu", "P1")]),
            record(&[("podkategoria", "Szkoły"), ("nazwa_programu", "P2"), ("dzialanie", "Wykład")]),
            record(&[("podkategoria", "Szkoły"), ("nazwa_programu", "P1"), ("liczba_osob", "5")]),
            record(&[("podkategoria", "0"), ("nazwa_programu", "P9")]),
        ];
        let agg = aggregate_categories(&records, &ColumnMap::default()).unwrap();
        let other = agg.get(MainCategory::Other);
        assert_eq!(other.groups.len(), 2);

        let schools = &other.groups[0];
        assert_eq!(schools.key, GroupKey::SubCategory("Szkoły".to_string()));
        assert_eq!(schools.example_programs, vec!["P1", "P2"]);
        assert_eq!(schools.program_count, 2);
        assert_eq!(schools.actions.len(), 2);
        assert_eq!(schools.actions[0].action_name, "Warsztaty");
        assert_eq!(schools.actions[0].people, 15);
        assert_eq!(schools.total_people, 25);

        // "0" sub-category falls back to the program key.
        assert_eq!(
            other.groups[1].key,
            GroupKey::Program {
                program_type: "Edukacja".to_string(),
                program_name: "P9".to_string(),
            }
        );
    }

    #[test]
    fn test_ignores_month_but_validates() {
        let records = vec![record(&[("data", "nie data")])];
        let agg = aggregate_categories(&records, &ColumnMap::default()).unwrap();
        assert_eq!(agg.total_people, 10);

        let bad = vec![record(&[("liczba_dzialan", "-2")])];
        assert!(matches!(
            aggregate_categories(&bad, &ColumnMap::default()),
            Err(BudgetError::InvalidRow { row: 2, .. })
        ));
    }

    #[test]
    fn test_oversized_counts_are_rejected() {
        let records = vec![
            record(&[("liczba_osob", "18446744073709551615")]),
            record(&[("liczba_osob", "1")]),
        ];
        assert!(matches!(
            aggregate_categories(&records, &ColumnMap::default()),
            Err(BudgetError::InvalidRow { row: 2, ref field, .. }) if field == "liczba_osob"
        ));

        let at_limit = vec![
            record(&[("liczba_osob", "4294967295")]),
            record(&[("liczba_osob", "4294967295")]),
        ];
        let agg = aggregate_categories(&at_limit, &ColumnMap::default()).unwrap();
        assert_eq!(agg.get(MainCategory::Other).groups[0].actions[0].people, 2 * 4_294_967_295);
        assert_eq!(agg.total_people, 2 * 4_294_967_295);
    }
}
