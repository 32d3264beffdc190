use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::warn;

use crate::config::Config;
use crate::error::{BudgetError, Result};
use crate::intake::check_file;
use crate::model::aggregate::MonthlyAggregate;
use crate::model::category::CategoryAggregate;
use crate::model::months::MonthSelection;
use crate::model::row::RawRecord;
use crate::repository::{decode_workbook, RecordSource, WorkbookSource};
use crate::service::category::aggregate_categories;
use crate::service::export::export_to_dir;
use crate::service::monthly::aggregate_monthly;

/// State of one analysis session.
///
/// Every operation is a single writer: it runs to completion, and any
/// failure ends up in `error` as one display string instead of propagating.
#[derive(Debug, Default)]
pub struct Session {
    config: Config,
    pub file_name: Option<String>,
    pub records: Vec<RawRecord>,
    pub months: MonthSelection,
    pub aggregate: Option<MonthlyAggregate>,
    pub categories: Option<CategoryAggregate>,
    pub error: Option<String>,
    pub loading: bool,
    pub processing: bool,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn has_data(&self) -> bool {
        self.file_name.is_some()
    }

    /// Replaces the loaded data. Clears any previous error and results.
    pub fn load_file(&mut self, path: &Path) -> bool {
        let source = WorkbookSource::new(path);
        self.load_from(&source)
    }

    pub fn load_from<S: RecordSource>(&mut self, source: &S) -> bool {
        self.begin_load();
        let result = source.load();
        self.finish_load(source.name(), result)
    }

    pub fn load_bytes(&mut self, name: &str, bytes: &[u8]) -> bool {
        self.begin_load();
        let result = check_file(name, bytes.len() as u64).and_then(|_| decode_workbook(bytes));
        self.finish_load(name.to_string(), result)
    }

    pub fn toggle_month(&mut self, month: u32) {
        self.reset_results();
        if let Err(e) = self.months.toggle(month) {
            self.fail(e);
        }
    }

    pub fn select_all_months(&mut self) {
        self.reset_results();
        self.months.select_all();
    }

    pub fn deselect_all_months(&mut self) {
        self.reset_results();
        self.months.deselect_all();
    }

    pub fn set_months(&mut self, months: MonthSelection) {
        self.reset_results();
        self.months = months;
    }

    /// Runs both aggregations; either both results are stored or neither.
    pub fn process(&mut self) -> bool {
        self.processing = true;
        self.reset_results();
        let result = self.run_aggregations();
        self.processing = false;

        match result {
            Ok((aggregate, categories)) => {
                self.aggregate = Some(aggregate);
                self.categories = Some(categories);
                true
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    pub fn export(&mut self, dir: &Path, date: NaiveDate) -> Option<PathBuf> {
        let result = match &self.aggregate {
            Some(aggregate) => export_to_dir(aggregate, dir, date),
            None => Err(BudgetError::Export("Brak danych do eksportu. Najpierw przetwórz plik".to_string())),
        };
        match result {
            Ok(path) => {
                self.error = None;
                Some(path)
            }
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    pub fn clear(&mut self) {
        let config = std::mem::take(&mut self.config);
        *self = Self::new(config);
    }

    fn run_aggregations(&self) -> Result<(MonthlyAggregate, CategoryAggregate)> {
        if !self.has_data() {
            return Err(BudgetError::NoData);
        }
        let monthly = aggregate_monthly(
            &self.records,
            &self.months,
            &self.config.columns,
            self.config.date_policy,
        )?;
        let categories = aggregate_categories(&self.records, &self.config.columns)?;
        Ok((monthly, categories))
    }

    fn begin_load(&mut self) {
        self.loading = true;
        self.reset_results();
        self.file_name = None;
        self.records.clear();
    }

    fn finish_load(&mut self, name: String, result: Result<Vec<RawRecord>>) -> bool {
        self.loading = false;
        match result {
            Ok(records) => {
                self.file_name = Some(name);
                self.records = records;
                true
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    fn reset_results(&mut self) {
        self.error = None;
        self.aggregate = None;
        self.categories = None;
    }

    fn fail(&mut self, err: BudgetError) {
        warn!(error = %err, "session operation failed");
        self.error = Some(err.to_string());
    }
}
