pub mod config;
pub mod error;
pub mod input;
pub mod intake;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;
pub mod validate;

pub use config::{ColumnMap, Config, DatePolicy};
pub use error::{BudgetError, Result};
pub use input::parse_months;
pub use intake::{check_file, check_path, MAX_FILE_BYTES};
pub use model::aggregate::{ActionTotals, MonthlyAggregate};
pub use model::category::{normalize_category, CategoryAggregate, MainCategory};
pub use model::months::MonthSelection;
pub use model::row::{BudgetRow, RawRecord};
pub use repository::{decode_workbook, RecordSource, WorkbookSource};
pub use service::category::aggregate_categories;
pub use service::dto::{ActionRow, CategoryRow, SummaryCell, SummaryLine};
pub use service::export::{export_file_name, export_to_dir, summary_lines};
pub use service::monthly::aggregate_monthly;
pub use usecase::session::Session;
pub use validate::validate_row;
