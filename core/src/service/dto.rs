use serde::{Deserialize, Serialize};

use crate::model::aggregate::MonthlyAggregate;
use crate::model::category::CategoryAggregate;

/// One flattened leaf of the monthly tree, for tables and charts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ActionRow {
    pub program_type: String,
    pub program_name: String,
    pub action_name: String,
    pub people: u64,
    pub actions: u64,
}

impl ActionRow {
    pub fn from_aggregate(aggregate: &MonthlyAggregate) -> Vec<Self> {
        let mut rows = Vec::new();
        for (program_type, programs) in &aggregate.data {
            for (program_name, actions) in programs {
                for (action_name, totals) in actions {
                    rows.push(ActionRow {
                        program_type: program_type.clone(),
                        program_name: program_name.clone(),
                        action_name: action_name.clone(),
                        people: totals.people,
                        actions: totals.action_number,
                    });
                }
            }
        }
        rows
    }
}

/// One group of the category breakdown, flattened.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    pub category: String,
    pub group: String,
    pub examples: String,
    pub program_count: usize,
    pub action_kinds: usize,
    pub people: u64,
    pub actions: u64,
}

impl CategoryRow {
    pub fn from_aggregate(aggregate: &CategoryAggregate) -> Vec<Self> {
        aggregate
            .categories
            .iter()
            .flat_map(|breakdown| {
                breakdown.groups.iter().map(move |group| CategoryRow {
                    category: breakdown.label.clone(),
                    group: group.key.display_name(),
                    examples: group.example_programs.join(", "),
                    program_count: group.program_count,
                    action_kinds: group.actions.len(),
                    people: group.total_people,
                    actions: group.total_actions,
                })
            })
            .collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum SummaryCell {
    Text(String),
    Count(u64),
}

/// A line of the exported summary sheet: a label and the cells to its right.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub label: String,
    pub cells: Vec<SummaryCell>,
}

impl SummaryLine {
    pub fn new(label: impl Into<String>, cells: Vec<SummaryCell>) -> Self {
        Self {
            label: label.into(),
            cells,
        }
    }

    pub fn blank() -> Self {
        Self::new("", Vec::new())
    }
}
