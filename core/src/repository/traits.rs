use crate::error::Result;
use crate::model::row::RawRecord;

/// Where decoded rows come from.
pub trait RecordSource {
    /// Display name of the source (usually the file name).
    fn name(&self) -> String;
    fn load(&self) -> Result<Vec<RawRecord>>;
}
