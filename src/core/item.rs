use crate::error::BatchError;

/// Result of a read attempt: `Ok(Some(item))` while items remain,
/// `Ok(None)` once the source is exhausted.
pub type ItemReaderResult<R> = Result<Option<R>, BatchError>;

/// Result of processing one item: `Ok(Some(item))` to keep it,
/// `Ok(None)` to filter it out of the output.
pub type ItemProcessorResult<W> = Result<Option<W>, BatchError>;

/// Result of a write or lifecycle operation on a writer.
pub type ItemWriterResult = Result<(), BatchError>;

pub trait ItemReader<R> {
    fn read(&self) -> ItemReaderResult<R>;
}

pub trait ItemProcessor<R, W> {
    fn process(&self, item: &R) -> ItemProcessorResult<W>;
}

pub trait ItemWriter<W> {
    fn write(&self, items: &[W]) -> ItemWriterResult;

    fn flush(&self) -> ItemWriterResult {
        Ok(())
    }

    fn open(&self) -> ItemWriterResult {
        Ok(())
    }

    fn close(&self) -> ItemWriterResult {
        Ok(())
    }
}

/// Processor that forwards every item unchanged. Used when a step is built
/// without an explicit processor.
#[derive(Default)]
pub struct PassThroughProcessor {}

impl<R: Clone> ItemProcessor<R, R> for PassThroughProcessor {
    fn process(&self, item: &R) -> ItemProcessorResult<R> {
        Ok(Some(item.clone()))
    }
}
