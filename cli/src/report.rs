use miernik_core::model::months::month_name;
use miernik_core::{ActionRow, CategoryAggregate, CategoryRow, MonthlyAggregate};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const MAX_LABEL_WIDTH: usize = 40;

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Typ programu")]
    program_type: String,
    #[tabled(rename = "Program")]
    program: String,
    #[tabled(rename = "Działanie")]
    action: String,
    #[tabled(rename = "Osoby")]
    people: u64,
    #[tabled(rename = "Działania")]
    actions: u64,
}

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Grupa")]
    group: String,
    #[tabled(rename = "Przykładowe programy")]
    examples: String,
    #[tabled(rename = "Programy")]
    programs: usize,
    #[tabled(rename = "Rodzaje działań")]
    kinds: usize,
    #[tabled(rename = "Osoby")]
    people: u64,
    #[tabled(rename = "Działania")]
    actions: u64,
}

pub fn show_summary(aggregate: &MonthlyAggregate) {
    let months: Vec<_> = aggregate.months.iter().map(|m| month_name(*m)).collect();
    println!("\n\x1b[1;36mMiesiące: {}\x1b[0m", months.join(", "));
    println!("Łączna liczba działań: {}", aggregate.all_actions);
    println!("Łączna liczba osób:    {}", aggregate.all_people);
    if aggregate.skipped_rows > 0 {
        println!("Pominięte wiersze (nieczytelna data): {}", aggregate.skipped_rows);
    }

    if aggregate.is_empty() {
        println!("\nBrak danych dla wybranych miesięcy.");
        return;
    }

    // Only the first line of each program type / program shows its name.
    let mut rows = Vec::new();
    let mut last_type = String::new();
    let mut last_program = String::new();
    for row in ActionRow::from_aggregate(aggregate) {
        let type_col = if row.program_type != last_type {
            last_program.clear();
            truncate(&row.program_type)
        } else {
            String::new()
        };
        let program_col = if row.program_name != last_program {
            truncate(&row.program_name)
        } else {
            String::new()
        };
        last_type = row.program_type.clone();
        last_program = row.program_name.clone();

        rows.push(SummaryRow {
            program_type: type_col,
            program: program_col,
            action: truncate(&row.action_name),
            people: row.people,
            actions: row.actions,
        });
    }

    print_table(Table::new(rows));
}

pub fn show_categories(categories: &CategoryAggregate) {
    println!(
        "\n\x1b[1;36mKategorie główne\x1b[0m (osoby: {}, działania: {})",
        categories.total_people, categories.total_actions
    );

    let rows = CategoryRow::from_aggregate(categories);
    for breakdown in &categories.categories {
        println!(
            "\n\x1b[1m{}\x1b[0m (osoby: {}, działania: {})",
            breakdown.label, breakdown.total_people, breakdown.total_actions
        );

        let group_rows: Vec<GroupRow> = rows
            .iter()
            .filter(|r| r.category == breakdown.label)
            .map(|r| GroupRow {
                group: truncate(&r.group),
                examples: truncate(&r.examples),
                programs: r.program_count,
                kinds: r.action_kinds,
                people: r.people,
                actions: r.actions,
            })
            .collect();

        if group_rows.is_empty() {
            println!("  brak wpisów");
            continue;
        }
        print_table(Table::new(group_rows));
    }
}

fn print_table(mut table: Table) {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
}

/// Cuts a label to the table column budget, counting display width.
fn truncate(label: &str) -> String {
    if label.width() <= MAX_LABEL_WIDTH {
        return label.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for c in label.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > MAX_LABEL_WIDTH - 1 {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Warsztaty"), "Warsztaty");
        let long = "a".repeat(60);
        let cut = truncate(&long);
        assert_eq!(cut.width(), MAX_LABEL_WIDTH);
        assert!(cut.ends_with('…'));
    }
}
