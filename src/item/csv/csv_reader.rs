use std::{cell::RefCell, fs::File, io::Read, path::Path};

use csv::{Reader, ReaderBuilder, StringRecord};

use crate::{
    core::item::{ItemReader, ItemReaderResult},
    error::BatchError,
};

/// A CSV item reader that streams raw records.
///
/// Unlike a typed reader, this one does not deserialize rows into structs:
/// the pipeline must carry records of arbitrary, unknown shape through to
/// the output untouched, so each row is surfaced as a [`StringRecord`].
/// The header row is captured at construction time and exposed through
/// [`header`](CsvRecordReader::header); the record stream starts at the
/// first data row.
///
/// The `csv` crate imposes no per-field length limit, so very long field
/// values (multi-kilobyte geotraces are common) stream through without
/// truncation.
///
/// # Examples
///
/// ```
/// use geotrace2wkt::core::item::ItemReader;
/// use geotrace2wkt::item::csv::csv_reader::CsvRecordReaderBuilder;
///
/// let data = "id,trace\n1,7.1 38.5 0.0 4.0\n";
///
/// let reader = CsvRecordReaderBuilder::new()
///     .from_reader(data.as_bytes())
///     .unwrap();
///
/// assert_eq!(reader.header(), &vec!["id", "trace"]);
///
/// let record = reader.read().unwrap().unwrap();
/// assert_eq!(record.get(1), Some("7.1 38.5 0.0 4.0"));
/// assert!(reader.read().unwrap().is_none());
/// ```
pub struct CsvRecordReader<R> {
    reader: RefCell<Reader<R>>,
    header: StringRecord,
}

impl<R> CsvRecordReader<R> {
    /// The header record, unmodified. Field values are used only for
    /// name-to-index column resolution; the record itself is passed
    /// through to the output as-is.
    pub fn header(&self) -> &StringRecord {
        &self.header
    }
}

impl<R: Read> ItemReader<StringRecord> for CsvRecordReader<R> {
    /// Reads the next data record, or `Ok(None)` once the source is
    /// exhausted. The record keeps its position information so later
    /// stages can report line numbers.
    fn read(&self) -> ItemReaderResult<StringRecord> {
        let mut record = StringRecord::new();
        match self.reader.borrow_mut().read_record(&mut record) {
            Ok(true) => Ok(Some(record)),
            Ok(false) => Ok(None),
            Err(error) => Err(BatchError::ItemReader(error.to_string())),
        }
    }
}

/// A builder for configuring CSV record reading.
///
/// Defaults: comma delimiter, strict field counts (a ragged row is a read
/// error), default read-buffer capacity.
pub struct CsvRecordReaderBuilder {
    delimiter: u8,
    flexible: bool,
    buffer_capacity: Option<usize>,
}

impl Default for CsvRecordReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvRecordReaderBuilder {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            flexible: false,
            buffer_capacity: None,
        }
    }

    /// Sets the field delimiter (default: comma).
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Allows records with varying field counts. With strict parsing
    /// (the default) a ragged row surfaces as a read error; flexible
    /// parsing lets it through so a short-row policy downstream can
    /// decide its fate.
    pub fn flexible(mut self, yes: bool) -> Self {
        self.flexible = yes;
        self
    }

    /// Sets the capacity of the read buffer, in bytes. The buffer grows
    /// past this as needed, so this is a tuning knob for workloads with
    /// very large fields, never a ceiling on field size.
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = Some(capacity);
        self
    }

    fn configure(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .flexible(self.flexible)
            // Header handling is ours: the first record is captured once
            // and the rest of the stream is data.
            .has_headers(false);
        if let Some(capacity) = self.buffer_capacity {
            builder.buffer_capacity(capacity);
        }
        builder
    }

    /// Creates a [`CsvRecordReader`] from any `Read` source.
    ///
    /// Fails with [`BatchError::SourceUnavailable`] when the header record
    /// cannot be read.
    pub fn from_reader<R: Read>(self, rdr: R) -> Result<CsvRecordReader<R>, BatchError> {
        let mut reader = self.configure().from_reader(rdr);
        let header = read_header(&mut reader)?;

        Ok(CsvRecordReader {
            reader: RefCell::new(reader),
            header,
        })
    }

    /// Creates a [`CsvRecordReader`] from a file path.
    ///
    /// Fails with [`BatchError::SourceUnavailable`] when the file cannot
    /// be opened or the header record cannot be read.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvRecordReader<File>, BatchError> {
        let mut reader = self
            .configure()
            .from_path(path.as_ref())
            .map_err(|error| BatchError::SourceUnavailable(error.to_string()))?;
        let header = read_header(&mut reader)?;

        Ok(CsvRecordReader {
            reader: RefCell::new(reader),
            header,
        })
    }
}

fn read_header<R: Read>(reader: &mut Reader<R>) -> Result<StringRecord, BatchError> {
    let mut header = StringRecord::new();
    match reader.read_record(&mut header) {
        Ok(true) => Ok(header),
        Ok(false) => Err(BatchError::SourceUnavailable(
            "source is empty, no header record".to_string(),
        )),
        Err(error) => Err(BatchError::SourceUnavailable(error.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_header_then_data_records_in_order() {
        let data = "id,name,trace\n1,alpha,1.0 2.0\n2,beta,3.0 4.0;5.0 6.0\n";

        let reader = CsvRecordReaderBuilder::new()
            .from_reader(data.as_bytes())
            .unwrap();

        assert_eq!(reader.header(), &vec!["id", "name", "trace"]);

        let first = reader.read().unwrap().unwrap();
        assert_eq!(first, vec!["1", "alpha", "1.0 2.0"]);

        let second = reader.read().unwrap().unwrap();
        assert_eq!(second, vec!["2", "beta", "3.0 4.0;5.0 6.0"]);

        assert!(reader.read().unwrap().is_none());
    }

    #[test]
    fn quoted_fields_may_contain_delimiter_and_newline() {
        let data = "id,note\n1,\"a,b\nc\"\n";

        let reader = CsvRecordReaderBuilder::new()
            .from_reader(data.as_bytes())
            .unwrap();

        let record = reader.read().unwrap().unwrap();
        assert_eq!(record.get(1), Some("a,b\nc"));
    }

    #[test]
    fn custom_delimiter() {
        let data = "id;trace\n1;2.5 3.5\n";

        let reader = CsvRecordReaderBuilder::new()
            .delimiter(b';')
            .from_reader(data.as_bytes())
            .unwrap();

        assert_eq!(reader.header(), &vec!["id", "trace"]);
        let record = reader.read().unwrap().unwrap();
        assert_eq!(record.get(1), Some("2.5 3.5"));
    }

    #[test]
    fn ragged_row_is_a_read_error_under_strict_parsing() {
        let data = "id,trace\n1\n";

        let reader = CsvRecordReaderBuilder::new()
            .from_reader(data.as_bytes())
            .unwrap();

        assert!(reader.read().is_err());
    }

    #[test]
    fn ragged_row_passes_through_when_flexible() {
        let data = "id,trace\n1\n";

        let reader = CsvRecordReaderBuilder::new()
            .flexible(true)
            .from_reader(data.as_bytes())
            .unwrap();

        let record = reader.read().unwrap().unwrap();
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn empty_source_fails_as_unavailable() {
        let result = CsvRecordReaderBuilder::new().from_reader("".as_bytes());

        assert!(matches!(result, Err(BatchError::SourceUnavailable(_))));
    }

    #[test]
    fn very_long_field_is_not_truncated() {
        let trace = "1.0 2.0;".repeat(50_000);
        let data = format!("id,trace\n1,{trace}\n");

        let reader = CsvRecordReaderBuilder::new()
            .buffer_capacity(1 << 10)
            .from_reader(data.as_bytes())
            .unwrap();

        let record = reader.read().unwrap().unwrap();
        assert_eq!(record.get(1).unwrap().len(), trace.len());
    }
}
