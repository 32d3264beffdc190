use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionTotals {
    pub people: u64,
    #[serde(rename = "actionNumber")]
    pub action_number: u64,
}

/// action name -> totals
pub type ActionMap = BTreeMap<String, ActionTotals>;
/// program name -> actions
pub type ProgramMap = BTreeMap<String, ActionMap>;
/// program type -> programs
pub type ProgramTypeMap = BTreeMap<String, ProgramMap>;

/// Result of one monthly aggregation run.
///
/// `all_people` and `all_actions` always equal the sums over every leaf of
/// `data`; `add` is the only way counts get in.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlyAggregate {
    pub data: ProgramTypeMap,
    #[serde(rename = "allPeople")]
    pub all_people: u64,
    #[serde(rename = "allActions")]
    pub all_actions: u64,
    pub months: Vec<u32>,
    pub included_rows: usize,
    pub skipped_rows: usize,
}

impl MonthlyAggregate {
    pub fn new(months: Vec<u32>) -> Self {
        Self {
            months,
            ..Default::default()
        }
    }

    pub fn add(
        &mut self,
        program_type: &str,
        program_name: &str,
        action_name: &str,
        people: u64,
        actions: u64,
    ) {
        let leaf = self
            .data
            .entry(program_type.to_string())
            .or_default()
            .entry(program_name.to_string())
            .or_default()
            .entry(action_name.to_string())
            .or_default();
        leaf.people += people;
        leaf.action_number += actions;

        self.all_people += people;
        self.all_actions += actions;
        self.included_rows += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn program_type_totals(&self, program_type: &str) -> ActionTotals {
        self.data
            .get(program_type)
            .map(|programs| {
                programs
                    .values()
                    .flat_map(|actions| actions.values())
                    .fold(ActionTotals::default(), sum)
            })
            .unwrap_or_default()
    }

    pub fn program_totals(&self, program_type: &str, program_name: &str) -> ActionTotals {
        self.data
            .get(program_type)
            .and_then(|programs| programs.get(program_name))
            .map(|actions| actions.values().fold(ActionTotals::default(), sum))
            .unwrap_or_default()
    }

    /// Recomputes the totals from the leaves.
    pub fn leaf_totals(&self) -> ActionTotals {
        self.data
            .values()
            .flat_map(|programs| programs.values())
            .flat_map(|actions| actions.values())
            .fold(ActionTotals::default(), sum)
    }
}

fn sum(acc: ActionTotals, t: &ActionTotals) -> ActionTotals {
    ActionTotals {
        people: acc.people + t.people,
        action_number: acc.action_number + t.action_number,
    }
}
