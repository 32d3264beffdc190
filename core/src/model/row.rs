use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One decoded spreadsheet record: header text -> cell text.
pub type RawRecord = HashMap<String, String>;

/// A record that passed shape validation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BudgetRow {
    pub date: String,
    pub program_type: String,
    pub program_name: String,
    pub action_name: String,
    pub people: u64,
    pub actions: u64,
    pub main_category: Option<String>,
    pub sub_category: Option<String>,
}

impl BudgetRow {
    pub fn new(
        date: &str,
        program_type: &str,
        program_name: &str,
        action_name: &str,
        people: u64,
        actions: u64,
    ) -> Self {
        Self {
            date: date.to_string(),
            program_type: program_type.to_string(),
            program_name: program_name.to_string(),
            action_name: action_name.to_string(),
            people,
            actions,
            main_category: None,
            sub_category: None,
        }
    }

    /// Sub-category label, if it is usable as a grouping key.
    ///
    /// Empty text and a literal "0" both mean "no sub-category".
    pub fn sub_category_label(&self) -> Option<&str> {
        self.sub_category
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "0")
    }
}
