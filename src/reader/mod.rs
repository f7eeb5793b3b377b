//! Report file reading
//!
//! A completed export points at a CSV or JSON file. [`ReportReader`]
//! downloads it and decodes it into [`ReportRow`]s held in memory.

mod decoders;
mod report;
mod types;


pub use decoders::{decoder_for, CsvReportDecoder, JsonReportDecoder};
pub use report::ReportReader;
pub use types::{ReportDecoder, ReportRow};
