use serde::{Deserialize, Serialize};

use crate::error::{BudgetError, Result};

pub const MONTH_NAMES: [&str; 12] = [
    "styczeń",
    "luty",
    "marzec",
    "kwiecień",
    "maj",
    "czerwiec",
    "lipiec",
    "sierpień",
    "wrzesień",
    "październik",
    "listopad",
    "grudzień",
];

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthEntry {
    pub month: u32,
    pub selected: bool,
}

/// Twelve month toggles, all off at creation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MonthSelection {
    entries: [MonthEntry; 12],
}

impl Default for MonthSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl MonthSelection {
    pub fn new() -> Self {
        let mut entries = [MonthEntry { month: 1, selected: false }; 12];
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.month = i as u32 + 1;
        }
        Self { entries }
    }

    pub fn from_months<I: IntoIterator<Item = u32>>(months: I) -> Result<Self> {
        let mut selection = Self::new();
        for month in months {
            let idx = index_of(month)?;
            selection.entries[idx].selected = true;
        }
        Ok(selection)
    }

    pub fn all() -> Self {
        let mut selection = Self::new();
        selection.select_all();
        selection
    }

    pub fn toggle(&mut self, month: u32) -> Result<bool> {
        let idx = index_of(month)?;
        let entry = &mut self.entries[idx];
        entry.selected = !entry.selected;
        Ok(entry.selected)
    }

    pub fn select_all(&mut self) {
        self.entries.iter_mut().for_each(|e| e.selected = true);
    }

    pub fn deselect_all(&mut self) {
        self.entries.iter_mut().for_each(|e| e.selected = false);
    }

    /// Out-of-range months are never selected.
    pub fn is_selected(&self, month: u32) -> bool {
        index_of(month)
            .map(|idx| self.entries[idx].selected)
            .unwrap_or(false)
    }

    pub fn selected(&self) -> Vec<u32> {
        self.entries
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.month)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        !self.entries.iter().any(|e| e.selected)
    }

    pub fn entries(&self) -> &[MonthEntry] {
        &self.entries
    }
}

pub fn month_name(month: u32) -> &'static str {
    index_of(month).map(|idx| MONTH_NAMES[idx]).unwrap_or("?")
}

fn index_of(month: u32) -> Result<usize> {
    if (1..=12).contains(&month) {
        Ok(month as usize - 1)
    } else {
        Err(BudgetError::InvalidMonth(month))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_selection_is_empty() {
        let selection = MonthSelection::new();
        assert!(selection.is_empty());
        assert_eq!(selection.entries().len(), 12);
        assert_eq!(selection.entries()[0].month, 1);
        assert_eq!(selection.entries()[11].month, 12);
    }

    #[test]
    fn test_toggle_and_bulk_operations() {
        let mut selection = MonthSelection::new();
        assert!(selection.toggle(3).unwrap());
        assert!(selection.is_selected(3));
        assert!(!selection.toggle(3).unwrap());
        assert!(selection.is_empty());

        selection.select_all();
        assert_eq!(selection.selected(), (1..=12).collect::<Vec<_>>());

        selection.deselect_all();
        assert!(selection.selected().is_empty());
    }

    #[test]
    fn test_out_of_range_month_is_rejected() {
        let mut selection = MonthSelection::new();
        assert!(matches!(selection.toggle(0), Err(BudgetError::InvalidMonth(0))));
        assert!(matches!(selection.toggle(13), Err(BudgetError::InvalidMonth(13))));
        assert!(!selection.is_selected(13));
        assert!(MonthSelection::from_months([1, 14]).is_err());
    }

    #[test]
    fn test_from_months_sorted_output() {
        let selection = MonthSelection::from_months([12, 1, 6]).unwrap();
        assert_eq!(selection.selected(), vec![1, 6, 12]);
    }
}
