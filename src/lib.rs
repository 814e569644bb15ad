#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # geotrace2wkt

 A streaming batch pipeline that converts the geotrace columns of
 delimited text files into Well-Known Text (WKT) geometries.

 Mobile data-collection forms (ODK and friends) export a recorded trace as
 one text field: nodes separated by semicolons, each node holding
 whitespace-separated latitude, longitude and optional elevation/accuracy
 tokens. GIS tools want WKT. This crate reads such a file record by
 record, rewrites the trace field as `POINT(...)` or `LINESTRING(...)`,
 and writes a file with the exact same header, shape and row order.

 ## Core Concepts

 - **Job / Step:** a `Job` runs one or more `Step`s; a chunk-oriented
   `Step` reads, processes and writes records in commit intervals.
 - **ItemReader:** streams input one record at a time
   ([`CsvRecordReader`](item::csv::csv_reader::CsvRecordReader)).
 - **ItemProcessor:** the business logic; here,
   [`TraceToWktProcessor`](geotrace::processor::TraceToWktProcessor)
   swaps the trace field for its WKT rendering.
 - **ItemWriter:** writes records chunk by chunk
   ([`CsvRecordWriter`](item::csv::csv_writer::CsvRecordWriter)).

 The conversion itself is a pure function,
 [`wkt_from_trace`](geotrace::wkt::wkt_from_trace), usable on its own
 without any file plumbing.

 ## Getting Started

```rust
use geotrace2wkt::{
    core::{
        job::{Job, JobBuilder},
        step::{Step, StepBuilder, StepInstance, StepStatus},
    },
    error::BatchError,
    geotrace::{column::resolve_column, processor::TraceToWktProcessor},
    item::csv::{csv_reader::CsvRecordReaderBuilder, csv_writer::CsvRecordWriterBuilder},
};

fn main() -> Result<(), BatchError> {
    let csv = "\
name,geotrace,team
path one,1.0 2.0 0.0 5.0;3.0 4.0 0.0 5.0,alpha
spot two,5.5 6.5,beta
";

    let reader = CsvRecordReaderBuilder::new()
        .delimiter(b',')
        .from_reader(csv.as_bytes())?;

    let column_index = resolve_column(reader.header(), "geotrace")?;
    let processor = TraceToWktProcessor::new(column_index);

    let writer = CsvRecordWriterBuilder::new()
        .header(reader.header().clone())
        .from_writer(vec![]);

    let step: StepInstance<_, _> = StepBuilder::new()
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .chunk(100)
        .build();

    let job = JobBuilder::new().start(&step).build();
    job.run()?;

    assert_eq!(step.get_status(), StepStatus::Success);

    let output = String::from_utf8(writer.into_inner()?).unwrap();
    assert_eq!(
        output,
        "\
name,geotrace,team
path one,\"LINESTRING(2.0 1.0, 4.0 3.0)\",alpha
spot two,POINT(6.5 5.5),beta
"
    );

    Ok(())
}
```
 */

/// Core module for batch operations
pub mod core;

/// Error types for batch operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// Geotrace domain logic: column resolution, WKT building, the processor
pub mod geotrace;

/// Set of item readers / writers (CSV records, log sink)
pub mod item;
