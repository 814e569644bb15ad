use csv::StringRecord;

use crate::error::BatchError;

/// Resolves a column selector against a header record, returning the
/// zero-based field index.
///
/// A selector that parses as an integer is taken as a 1-based column
/// position, the convention of the form exports this pipeline consumes.
/// Anything else is matched exactly (case-sensitive) against the header
/// field names. Both forms fail with [`BatchError::ColumnNotFound`] when
/// they resolve to nothing, so a bad selector surfaces before any data
/// row is processed.
///
/// # Examples
///
/// ```
/// use csv::StringRecord;
/// use geotrace2wkt::geotrace::column::resolve_column;
///
/// let header = StringRecord::from(vec!["id", "trace"]);
/// assert_eq!(resolve_column(&header, "trace").unwrap(), 1);
/// assert_eq!(resolve_column(&header, "2").unwrap(), 1);
/// assert!(resolve_column(&header, "elevation").is_err());
/// ```
pub fn resolve_column(header: &StringRecord, selector: &str) -> Result<usize, BatchError> {
    if let Ok(position) = selector.trim().parse::<i64>() {
        if position >= 1 && position as usize <= header.len() {
            return Ok(position as usize - 1);
        }
        return Err(BatchError::ColumnNotFound(format!(
            "column {position} is out of range for a header with {} fields",
            header.len()
        )));
    }

    header
        .iter()
        .position(|field| field == selector)
        .ok_or_else(|| BatchError::ColumnNotFound(selector.to_string()))
}
