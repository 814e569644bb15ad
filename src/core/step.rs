use std::{
    cell::Cell,
    time::{Duration, Instant},
};

use log::{debug, error, warn};

use crate::BatchError;

use super::item::{ItemProcessor, ItemReader, ItemWriter};

#[derive(Debug, PartialEq)]
enum ChunkStatus {
    Error,
    Finished,
    Full,
}

/// Final status of a step execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Success,
    Error,
    Started,
}

/// Counters and timing collected over one step execution.
#[derive(Debug)]
pub struct StepExecution {
    pub start: Instant,
    pub end: Instant,
    pub duration: Duration,
    pub status: StepStatus,
    /// Records pulled from the reader.
    pub read_count: usize,
    /// Records handed to the writer.
    pub write_count: usize,
    /// Records the processor filtered out.
    pub filter_count: usize,
    pub read_error_count: usize,
    pub process_error_count: usize,
    pub write_error_count: usize,
}

/// A step that can be executed as part of a job.
pub trait Step {
    fn execute(&self) -> Result<StepExecution, BatchError>;
    fn get_name(&self) -> &str;
    fn get_status(&self) -> StepStatus;
}

/// Chunk-oriented step: reads up to `chunk_size` items, processes them,
/// writes the chunk, and repeats until the reader is exhausted or the
/// error count exceeds the skip limit.
pub struct StepInstance<'a, R, W> {
    name: String,
    reader: &'a dyn ItemReader<R>,
    processor: &'a dyn ItemProcessor<R, W>,
    writer: &'a dyn ItemWriter<W>,
    chunk_size: usize,
    skip_limit: usize,
    status: Cell<StepStatus>,
    read_count: Cell<usize>,
    write_count: Cell<usize>,
    filter_count: Cell<usize>,
    read_error_count: Cell<usize>,
    process_error_count: Cell<usize>,
    write_error_count: Cell<usize>,
}

impl<R, W> Step for StepInstance<'_, R, W> {
    fn execute(&self) -> Result<StepExecution, BatchError> {
        let start = Instant::now();

        debug!("Start of step: {}", self.name);

        self.writer.open()?;

        let mut read_items: Vec<R> = Vec::with_capacity(self.chunk_size);
        let mut step_status;

        loop {
            let read_chunk_status = self.read_chunk(&mut read_items);

            if read_chunk_status == ChunkStatus::Error {
                step_status = StepStatus::Error;
                break;
            }

            let (processed_items, process_chunk_status) = self.process_chunk(&read_items);

            if process_chunk_status == ChunkStatus::Error {
                step_status = StepStatus::Error;
                break;
            }

            let write_chunk_status = self.write_chunk(&processed_items);

            step_status = self.to_step_status(&read_chunk_status, &write_chunk_status);

            if step_status != StepStatus::Started {
                break;
            }
        }

        self.status.set(step_status);

        self.writer.close()?;

        debug!("End of step: {}", self.name);

        let execution = StepExecution {
            start,
            end: Instant::now(),
            duration: start.elapsed(),
            status: step_status,
            read_count: self.read_count.get(),
            write_count: self.write_count.get(),
            filter_count: self.filter_count.get(),
            read_error_count: self.read_error_count.get(),
            process_error_count: self.process_error_count.get(),
            write_error_count: self.write_error_count.get(),
        };

        if step_status == StepStatus::Error {
            return Err(BatchError::Step(self.name.clone()));
        }

        Ok(execution)
    }

    fn get_name(&self) -> &str {
        &self.name
    }

    fn get_status(&self) -> StepStatus {
        self.status.get()
    }
}

impl<R, W> StepInstance<'_, R, W> {
    fn is_skip_limit_reached(&self) -> bool {
        self.read_error_count.get()
            + self.process_error_count.get()
            + self.write_error_count.get()
            > self.skip_limit
    }

    fn to_step_status(&self, read: &ChunkStatus, write: &ChunkStatus) -> StepStatus {
        if *read == ChunkStatus::Error || *write == ChunkStatus::Error {
            StepStatus::Error
        } else if *read == ChunkStatus::Finished {
            StepStatus::Success
        } else {
            StepStatus::Started
        }
    }

    fn read_chunk(&self, read_items: &mut Vec<R>) -> ChunkStatus {
        debug!("Start reading chunk");
        read_items.clear();

        loop {
            match self.reader.read() {
                Ok(Some(item)) => {
                    read_items.push(item);
                    self.read_count.set(self.read_count.get() + 1);

                    if read_items.len() == self.chunk_size {
                        debug!("End reading chunk: full");
                        return ChunkStatus::Full;
                    }
                }
                Ok(None) => {
                    debug!("End reading chunk: finished");
                    return ChunkStatus::Finished;
                }
                Err(err) => {
                    self.read_error_count.set(self.read_error_count.get() + 1);
                    error!("Error occurred during read item: {}", err);

                    if self.is_skip_limit_reached() {
                        return ChunkStatus::Error;
                    }
                }
            }
        }
    }

    fn process_chunk(&self, read_items: &[R]) -> (Vec<W>, ChunkStatus) {
        let mut processed_items = Vec::with_capacity(read_items.len());

        debug!("Start processing chunk");
        for item in read_items {
            match self.processor.process(item) {
                Ok(Some(processed)) => processed_items.push(processed),
                Ok(None) => {
                    self.filter_count.set(self.filter_count.get() + 1);
                }
                Err(err) => {
                    self.process_error_count
                        .set(self.process_error_count.get() + 1);
                    error!("Error occurred during process item: {}", err);

                    if self.is_skip_limit_reached() {
                        return (processed_items, ChunkStatus::Error);
                    }
                    warn!("Item skipped, {} skips tolerated", self.skip_limit);
                }
            }
        }
        debug!("End processing chunk");

        (processed_items, ChunkStatus::Full)
    }

    fn write_chunk(&self, processed_items: &[W]) -> ChunkStatus {
        debug!("Start writing chunk");

        let result = self
            .writer
            .write(processed_items)
            .and_then(|()| self.writer.flush());

        match result {
            Ok(()) => {
                self.write_count
                    .set(self.write_count.get() + processed_items.len());
                debug!("End writing chunk");
                ChunkStatus::Full
            }
            Err(err) => {
                self.write_error_count
                    .set(self.write_error_count.get() + processed_items.len());
                error!("Error occurred during write chunk: {}", err);
                if self.is_skip_limit_reached() {
                    ChunkStatus::Error
                } else {
                    ChunkStatus::Full
                }
            }
        }
    }
}

pub struct StepBuilder<'a, R, W> {
    name: Option<String>,
    reader: Option<&'a dyn ItemReader<R>>,
    processor: Option<&'a dyn ItemProcessor<R, W>>,
    writer: Option<&'a dyn ItemWriter<W>>,
    chunk_size: usize,
    skip_limit: usize,
}

impl<'a, R, W> Default for StepBuilder<'a, R, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, R, W> StepBuilder<'a, R, W> {
    pub fn new() -> StepBuilder<'a, R, W> {
        Self {
            name: None,
            reader: None,
            processor: None,
            writer: None,
            chunk_size: 1,
            skip_limit: 0,
        }
    }

    pub fn name(mut self, name: String) -> StepBuilder<'a, R, W> {
        self.name = Some(name);
        self
    }

    pub fn reader(mut self, reader: &'a impl ItemReader<R>) -> StepBuilder<'a, R, W> {
        self.reader = Some(reader);
        self
    }

    pub fn processor(mut self, processor: &'a impl ItemProcessor<R, W>) -> StepBuilder<'a, R, W> {
        self.processor = Some(processor);
        self
    }

    pub fn writer(mut self, writer: &'a impl ItemWriter<W>) -> StepBuilder<'a, R, W> {
        self.writer = Some(writer);
        self
    }

    /// Sets the commit interval: how many records are read and processed
    /// before the chunk is handed to the writer.
    pub fn chunk(mut self, chunk_size: usize) -> StepBuilder<'a, R, W> {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the number of read/process/write errors tolerated before the
    /// step fails.
    pub fn skip_limit(mut self, skip_limit: usize) -> StepBuilder<'a, R, W> {
        self.skip_limit = skip_limit;
        self
    }

    /// Builds the step.
    ///
    /// # Panics
    /// Panics if no reader or no writer has been set. Both are mandatory
    /// parts of a chunk-oriented step, so failing fast at assembly time is
    /// preferred over a runtime error.
    pub fn build(self) -> StepInstance<'a, R, W>
    where
        super::item::PassThroughProcessor: ItemProcessor<R, W>,
    {
        static PASS_THROUGH: super::item::PassThroughProcessor =
            super::item::PassThroughProcessor {};

        StepInstance {
            name: self.name.unwrap_or_else(super::build_name),
            reader: self.reader.expect("a step requires a reader"),
            processor: self.processor.unwrap_or(&PASS_THROUGH),
            writer: self.writer.expect("a step requires a writer"),
            chunk_size: self.chunk_size,
            skip_limit: self.skip_limit,
            status: Cell::new(StepStatus::Started),
            read_count: Cell::new(0),
            write_count: Cell::new(0),
            filter_count: Cell::new(0),
            read_error_count: Cell::new(0),
            process_error_count: Cell::new(0),
            write_error_count: Cell::new(0),
        }
    }
}
