use std::cell::Cell;

use csv::StringRecord;
use log::warn;

use crate::{
    core::item::{ItemProcessor, ItemProcessorResult},
    error::BatchError,
    geotrace::wkt::wkt_from_trace,
};

/// What to do with a data row too short to contain the resolved
/// coordinate column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortRowPolicy {
    /// Fail the run with [`BatchError::RowShape`].
    #[default]
    Abort,
    /// Drop the row from the output with a warning.
    Skip,
}

/// Processor that replaces the geotrace field of each record with its WKT
/// rendering.
///
/// Every other field passes through unchanged, so the output record keeps
/// the shape and field order of the input. A trace with no usable node
/// produces the configured null token instead of a geometry (empty string
/// unless overridden).
///
/// The processor is stateless per record apart from a row counter used
/// for error reporting, so records can be processed in any chunking
/// arrangement without affecting the result.
pub struct TraceToWktProcessor {
    column_index: usize,
    null_token: String,
    short_row_policy: ShortRowPolicy,
    row: Cell<u64>,
}

impl TraceToWktProcessor {
    /// Creates a processor for the given zero-based coordinate column,
    /// typically obtained from
    /// [`resolve_column`](crate::geotrace::column::resolve_column).
    pub fn new(column_index: usize) -> Self {
        Self {
            column_index,
            null_token: String::new(),
            short_row_policy: ShortRowPolicy::default(),
            row: Cell::new(0),
        }
    }

    /// Sets the text written in place of a null geometry (default: empty
    /// string).
    pub fn null_token(mut self, token: impl Into<String>) -> Self {
        self.null_token = token.into();
        self
    }

    /// Sets the policy for rows shorter than the coordinate column
    /// (default: [`ShortRowPolicy::Abort`]).
    pub fn short_row_policy(mut self, policy: ShortRowPolicy) -> Self {
        self.short_row_policy = policy;
        self
    }
}

impl ItemProcessor<StringRecord, StringRecord> for TraceToWktProcessor {
    fn process(&self, item: &StringRecord) -> ItemProcessorResult<StringRecord> {
        let line = self.row.get() + 1;
        self.row.set(line);

        let Some(trace) = item.get(self.column_index) else {
            return match self.short_row_policy {
                ShortRowPolicy::Abort => Err(BatchError::RowShape {
                    line,
                    fields: item.len(),
                    index: self.column_index,
                }),
                ShortRowPolicy::Skip => {
                    warn!(
                        "Row {} has {} fields, coordinate column is index {}: row skipped",
                        line,
                        item.len(),
                        self.column_index
                    );
                    Ok(None)
                }
            };
        };

        let geometry = wkt_from_trace(trace);

        let mut output = StringRecord::new();
        for (index, field) in item.iter().enumerate() {
            if index == self.column_index {
                output.push_field(geometry.as_deref().unwrap_or(&self.null_token));
            } else {
                output.push_field(field);
            }
        }

        Ok(Some(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn replaces_only_the_trace_field() {
        let processor = TraceToWktProcessor::new(1);

        let output = processor
            .process(&record(&["42", "1.0 2.0;3.0 4.0", "note"]))
            .unwrap()
            .unwrap();

        assert_eq!(
            output,
            vec!["42", "LINESTRING(2.0 1.0, 4.0 3.0)", "note"]
        );
    }

    #[test]
    fn null_geometry_becomes_empty_string_by_default() {
        let processor = TraceToWktProcessor::new(0);

        let output = processor.process(&record(&["", "kept"])).unwrap().unwrap();

        assert_eq!(output, vec!["", "kept"]);
    }

    #[test]
    fn null_geometry_uses_configured_token() {
        let processor = TraceToWktProcessor::new(0).null_token("NULL");

        let output = processor
            .process(&record(&["nonsense", "kept"]))
            .unwrap()
            .unwrap();

        assert_eq!(output, vec!["NULL", "kept"]);
    }

    #[test]
    fn short_row_aborts_by_default() {
        let processor = TraceToWktProcessor::new(5);

        let error = processor.process(&record(&["a", "b"])).unwrap_err();

        assert!(matches!(
            error,
            BatchError::RowShape {
                line: 1,
                fields: 2,
                index: 5
            }
        ));
    }

    #[test]
    fn short_row_is_dropped_under_skip_policy() {
        let processor = TraceToWktProcessor::new(5).short_row_policy(ShortRowPolicy::Skip);

        assert!(processor.process(&record(&["a", "b"])).unwrap().is_none());
    }

    #[test]
    fn row_counter_names_the_failing_row() {
        let processor = TraceToWktProcessor::new(2);

        processor.process(&record(&["1", "1.0 2.0", "x"])).unwrap();
        processor.process(&record(&["2", "1.0 2.0", "x"])).unwrap();
        let error = processor.process(&record(&["3"])).unwrap_err();

        assert!(matches!(error, BatchError::RowShape { line: 3, .. }));
    }

    #[test]
    fn field_count_is_preserved() {
        let processor = TraceToWktProcessor::new(1);
        let input = record(&["1", "7.0 8.0", "", "last"]);

        let output = processor.process(&input).unwrap().unwrap();

        assert_eq!(output.len(), input.len());
    }
}
