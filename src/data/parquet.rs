//! Parquet file handling for invocation events

use crate::coupling::InvocationEvent;
use crate::error::{AnalyzerError, AnalyzerResult};
use polars::prelude::*;
use std::path::Path;

/// Column holding the calling class
pub const CALLER_COLUMN: &str = "caller";

/// Column holding the called class
pub const CALLEE_COLUMN: &str = "callee";

/// Load invocation events from a Parquet file with `caller` and `callee`
/// string columns. Rows with a null in either column are skipped.
pub fn load_invocation_events(path: &Path) -> AnalyzerResult<Vec<InvocationEvent>> {
    log::info!("Reading parquet file: {}", path.display());

    if !path.exists() {
        return Err(AnalyzerError::FileNotFound(path.to_path_buf()));
    }

    let path_str = path.to_string_lossy();
    let df = LazyFrame::scan_parquet(&*path_str, Default::default())?
        .select([col(CALLER_COLUMN), col(CALLEE_COLUMN)])
        .collect()?;

    log::debug!("File schema: {:?}", df.schema());

    let caller_col = df.column(CALLER_COLUMN)?.str()?;
    let callee_col = df.column(CALLEE_COLUMN)?.str()?;

    let row_count = df.height();
    let mut events = Vec::with_capacity(row_count);
    let mut skipped = 0usize;

    for i in 0..row_count {
        match (caller_col.get(i), callee_col.get(i)) {
            (Some(caller), Some(callee)) => events.push(InvocationEvent::new(caller, callee)),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {} rows with missing class names", skipped);
    }
    log::info!("Loaded {} invocation events", events.len());

    Ok(events)
}
