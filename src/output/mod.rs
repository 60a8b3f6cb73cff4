//! Output module for the crawl result files
//!
//! Both crawl variants write flat CSV files through the same sink:
//! - discovery: `(category, product link)` rows
//! - reviews: one normalized review record per row

mod csv_sink;

pub use csv_sink::{CsvSink, OutputError, OutputResult, PRODUCT_LINKS_HEADER};
