use std::fmt::Debug;

use log::info;

use crate::core::item::{ItemWriter, ItemWriterResult};

/// Writer that logs each record instead of persisting it. Useful as a
/// progress sink when debugging a conversion.
#[derive(Default)]
pub struct LoggerWriter {}

impl LoggerWriter {
    pub fn new() -> Self {
        Self {}
    }
}

impl<T> ItemWriter<T> for LoggerWriter
where
    T: Debug,
{
    fn write(&self, items: &[T]) -> ItemWriterResult {
        items.iter().for_each(|item| info!("Record:{:?}", item));
        Ok(())
    }
}
