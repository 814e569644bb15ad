use std::{
    cell::RefCell,
    fs::File,
    io,
    path::{Path, PathBuf},
};

use csv::{StringRecord, Writer, WriterBuilder};
use log::info;

use crate::{
    core::item::{ItemWriter, ItemWriterResult},
    error::BatchError,
};

/// A CSV item writer that streams raw records.
///
/// The writer emits the configured header record first (on `open`), then
/// every data record in the order received, using the same delimiter and
/// quoting conventions as the reader side. When built from a path, the
/// destination is reported with an `info` log entry on `close` so callers
/// can surface it as a completion message.
pub struct CsvRecordWriter<W: io::Write> {
    wrapper: RefCell<Writer<W>>,
    header: Option<StringRecord>,
    path: Option<PathBuf>,
}

impl<W: io::Write> ItemWriter<StringRecord> for CsvRecordWriter<W> {
    fn write(&self, items: &[StringRecord]) -> ItemWriterResult {
        let mut writer = self.wrapper.borrow_mut();
        for item in items {
            writer
                .write_record(item)
                .map_err(|error| BatchError::ItemWriter(error.to_string()))?;
        }
        Ok(())
    }

    /// Flushes the internal buffer to the underlying writer.
    fn flush(&self) -> ItemWriterResult {
        self.wrapper
            .borrow_mut()
            .flush()
            .map_err(|error| BatchError::ItemWriter(error.to_string()))
    }

    /// Writes the header record, if one was configured. Called once before
    /// the first chunk, so the header always precedes the data and is
    /// emitted byte-for-byte as captured from the input.
    fn open(&self) -> ItemWriterResult {
        if let Some(header) = &self.header {
            self.wrapper
                .borrow_mut()
                .write_record(header)
                .map_err(|error| BatchError::DestinationUnwritable(error.to_string()))?;
        }
        Ok(())
    }

    fn close(&self) -> ItemWriterResult {
        self.flush()?;
        if let Some(path) = &self.path {
            info!("Created output file at: {}", path.display());
        }
        Ok(())
    }
}

impl<W: io::Write> CsvRecordWriter<W> {
    /// Consumes the writer, returning the underlying `Write` value.
    pub fn into_inner(self) -> Result<W, BatchError> {
        self.wrapper
            .into_inner()
            .into_inner()
            .map_err(|error| BatchError::ItemWriter(error.to_string()))
    }
}

/// A builder for configuring CSV record writing.
pub struct CsvRecordWriterBuilder {
    delimiter: u8,
    header: Option<StringRecord>,
}

impl Default for CsvRecordWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvRecordWriterBuilder {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            header: None,
        }
    }

    /// Sets the field delimiter (default: comma). Should match the
    /// reader's delimiter so input and output share one convention.
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the header record to emit before any data record.
    pub fn header(mut self, header: StringRecord) -> Self {
        self.header = Some(header);
        self
    }

    fn configure(&self) -> WriterBuilder {
        let mut builder = WriterBuilder::new();
        builder.delimiter(self.delimiter).flexible(false);
        builder
    }

    /// Creates a [`CsvRecordWriter`] writing to a file path.
    ///
    /// Fails with [`BatchError::DestinationUnwritable`] when the file
    /// cannot be created.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvRecordWriter<File>, BatchError> {
        let writer = self
            .configure()
            .from_path(path.as_ref())
            .map_err(|error| BatchError::DestinationUnwritable(error.to_string()))?;

        Ok(CsvRecordWriter {
            wrapper: RefCell::new(writer),
            header: self.header,
            path: Some(path.as_ref().to_path_buf()),
        })
    }

    /// Creates a [`CsvRecordWriter`] writing to any `Write` value.
    pub fn from_writer<W: io::Write>(self, wtr: W) -> CsvRecordWriter<W> {
        let writer = self.configure().from_writer(wtr);

        CsvRecordWriter {
            wrapper: RefCell::new(writer),
            header: self.header,
            path: None,
        }
    }
}
