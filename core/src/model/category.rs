use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MainCategory {
    Obesity,
    Tobacco,
    Hiv,
    Addictions,
    Other,
}

impl MainCategory {
    /// Display order of the category report.
    pub const ALL: [MainCategory; 5] = [
        MainCategory::Obesity,
        MainCategory::Tobacco,
        MainCategory::Hiv,
        MainCategory::Addictions,
        MainCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MainCategory::Obesity => "Zapobieganie otyłości",
            MainCategory::Tobacco => "Profilaktyka palenia tytoniu",
            MainCategory::Hiv => "Profilaktyka HIV/AIDS",
            MainCategory::Addictions => "Profilaktyka uzależnień",
            MainCategory::Other => "Pozostałe",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            MainCategory::Obesity => 0,
            MainCategory::Tobacco => 1,
            MainCategory::Hiv => 2,
            MainCategory::Addictions => 3,
            MainCategory::Other => 4,
        }
    }
}

type Matcher = fn(&str) -> bool;

fn is_obesity(s: &str) -> bool {
    s.contains("otyłoś") || s.contains("otylos")
}

fn is_tobacco(s: &str) -> bool {
    s.contains("tyto") || s.contains("nikotyn") || s.contains("palen")
}

fn is_hiv(s: &str) -> bool {
    s.contains("hiv") || s.contains("aids")
}

fn is_addiction(s: &str) -> bool {
    ["uzależn", "uzalezn", "narkot", "alkohol", "dopalacz"]
        .iter()
        .any(|k| s.contains(k))
}

// Checked top to bottom against the lowercased, trimmed value. First hit wins.
const CATEGORY_RULES: [(Matcher, MainCategory); 4] = [
    (is_obesity, MainCategory::Obesity),
    (is_tobacco, MainCategory::Tobacco),
    (is_hiv, MainCategory::Hiv),
    (is_addiction, MainCategory::Addictions),
];

/// Maps free-text category input onto one of the five buckets.
pub fn normalize_category(value: Option<&str>) -> MainCategory {
    let Some(value) = value else {
        return MainCategory::Other;
    };
    let needle = value.trim().to_lowercase();
    if needle.is_empty() {
        return MainCategory::Other;
    }

    CATEGORY_RULES
        .iter()
        .find(|(matches, _)| matches(needle.as_str()))
        .map(|(_, category)| *category)
        .unwrap_or(MainCategory::Other)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    SubCategory(String),
    Program {
        program_type: String,
        program_name: String,
    },
}

impl GroupKey {
    pub fn display_name(&self) -> String {
        match self {
            GroupKey::SubCategory(label) => label.clone(),
            GroupKey::Program { program_type, program_name } => {
                format!("{} / {}", program_type, program_name)
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ActionEntry {
    pub action_name: String,
    pub people: u64,
    pub action_number: u64,
}

pub const MAX_EXAMPLE_PROGRAMS: usize = 3;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProgramGroup {
    pub key: GroupKey,
    /// Up to three distinct program names; sub-category groups only.
    pub example_programs: Vec<String>,
    pub program_count: usize,
    pub actions: Vec<ActionEntry>,
    pub total_people: u64,
    pub total_actions: u64,
    #[serde(skip)]
    programs_seen: Vec<String>,
}

impl ProgramGroup {
    pub fn new(key: GroupKey) -> Self {
        Self {
            key,
            example_programs: Vec::new(),
            program_count: 0,
            actions: Vec::new(),
            total_people: 0,
            total_actions: 0,
            programs_seen: Vec::new(),
        }
    }

    pub fn record_program(&mut self, program_name: &str) {
        if self.programs_seen.iter().any(|p| p == program_name) {
            return;
        }
        self.programs_seen.push(program_name.to_string());
        self.program_count = self.programs_seen.len();

        if matches!(self.key, GroupKey::SubCategory(_))
            && self.example_programs.len() < MAX_EXAMPLE_PROGRAMS
        {
            self.example_programs.push(program_name.to_string());
        }
    }

    /// Same action name merges into the existing entry.
    pub fn add_action(&mut self, action_name: &str, people: u64, actions: u64) {
        match self.actions.iter_mut().find(|a| a.action_name == action_name) {
            Some(entry) => {
                entry.people += people;
                entry.action_number += actions;
            }
            None => self.actions.push(ActionEntry {
                action_name: action_name.to_string(),
                people,
                action_number: actions,
            }),
        }
        self.total_people += people;
        self.total_actions += actions;
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CategoryBreakdown {
    pub category: MainCategory,
    pub label: String,
    pub groups: Vec<ProgramGroup>,
    pub total_people: u64,
    pub total_actions: u64,
}

impl CategoryBreakdown {
    pub fn new(category: MainCategory) -> Self {
        Self {
            category,
            label: category.label().to_string(),
            groups: Vec::new(),
            total_people: 0,
            total_actions: 0,
        }
    }

    pub fn group_mut(&mut self, key: GroupKey) -> &mut ProgramGroup {
        let pos = match self.groups.iter().position(|g| g.key == key) {
            Some(pos) => pos,
            None => {
                self.groups.push(ProgramGroup::new(key));
                self.groups.len() - 1
            }
        };
        &mut self.groups[pos]
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CategoryAggregate {
    pub categories: Vec<CategoryBreakdown>,
    pub total_people: u64,
    pub total_actions: u64,
}

impl Default for CategoryAggregate {
    fn default() -> Self {
        Self {
            categories: MainCategory::ALL.iter().map(|c| CategoryBreakdown::new(*c)).collect(),
            total_people: 0,
            total_actions: 0,
        }
    }
}

impl CategoryAggregate {
    pub fn get(&self, category: MainCategory) -> &CategoryBreakdown {
        &self.categories[category.index()]
    }

    pub fn get_mut(&mut self, category: MainCategory) -> &mut CategoryBreakdown {
        &mut self.categories[category.index()]
    }
}
