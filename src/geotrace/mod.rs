/// Column selector resolution against a header record.
pub mod column;

/// Item processor that rewrites the trace field of each record.
pub mod processor;

/// Pure conversion from raw geotrace text to Well-Known Text.
pub mod wkt;
