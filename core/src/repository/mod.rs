pub mod traits;
pub mod workbook;

pub use traits::RecordSource;
pub use workbook::{decode_workbook, WorkbookSource};
