use thiserror::Error;

#[derive(Error, Debug)]
/// Batch error
pub enum BatchError {
    /// The input file or stream could not be opened or read.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// A name selector matched no header field, or a numeric selector
    /// pointed outside the header.
    #[error("Column not found in header: {0}")]
    ColumnNotFound(String),

    /// A data row is too short to contain the resolved coordinate column.
    #[error("Row {line} has {fields} fields, coordinate column is index {index}")]
    RowShape {
        /// 1-based data row number, header excluded.
        line: u64,
        /// Field count of the offending row.
        fields: usize,
        /// Zero-based index of the resolved coordinate column.
        index: usize,
    },

    /// The output file or stream could not be created or written.
    #[error("Destination unwritable: {0}")]
    DestinationUnwritable(String),

    #[error("ItemReader from: {0}")]
    ItemReader(String),

    #[error("ItemProcessor from: {0}")]
    ItemProcessor(String),

    #[error("ItemWriter from: {0}")]
    ItemWriter(String),

    #[error("Step failed: {0}")]
    Step(String),
}
