/// This module provides a raw-record CSV item reader and writer.
pub mod csv;

/// This module provides a logger item writer, useful for debugging purposes.
pub mod logger;
