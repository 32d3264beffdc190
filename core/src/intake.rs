//! File intake checks, run before any byte of the file is decoded.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::{BudgetError, Result};

pub const ALLOWED_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];
/// Inclusive ceiling: a file of exactly this size is accepted.
pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

pub fn check_file(name: &str, size: u64) -> Result<()> {
    let extension = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext) => {}
        _ => {
            warn!(file = name, "rejected file type");
            return Err(BudgetError::InvalidFileType(name.to_string()));
        }
    }

    if size > MAX_FILE_BYTES {
        warn!(file = name, size, "rejected oversized file");
        return Err(BudgetError::FileTooLarge {
            size,
            max: MAX_FILE_BYTES,
        });
    }

    Ok(())
}

/// Same check using only filesystem metadata.
pub fn check_path(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    check_file(&name, metadata.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_ceiling_is_inclusive() {
        assert!(check_file("dane.xlsx", MAX_FILE_BYTES).is_ok());
        let err = check_file("dane.xlsx", MAX_FILE_BYTES + 1).unwrap_err();
        assert!(matches!(
            err,
            BudgetError::FileTooLarge { size, max } if size == MAX_FILE_BYTES + 1 && max == MAX_FILE_BYTES
        ));
    }

    #[test]
    fn test_extension_allow_list() {
        assert!(check_file("raport.xls", 10).is_ok());
        assert!(check_file("RAPORT.XLSX", 10).is_ok());
        assert!(matches!(check_file("raport.csv", 10), Err(BudgetError::InvalidFileType(_))));
        assert!(matches!(check_file("raport", 10), Err(BudgetError::InvalidFileType(_))));
        assert!(matches!(check_file("xlsx", 10), Err(BudgetError::InvalidFileType(_))));
    }

    #[test]
    fn test_type_is_checked_before_size() {
        let err = check_file("film.mp4", MAX_FILE_BYTES * 4).unwrap_err();
        assert!(matches!(err, BudgetError::InvalidFileType(_)));
    }

    #[test]
    fn test_check_path_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pusty.xlsx");
        fs::write(&path, b"").unwrap();
        assert!(check_path(&path).is_ok());
        assert!(matches!(
            check_path(&dir.path().join("brak.xlsx")),
            Err(BudgetError::Io(_))
        ));
    }
}
