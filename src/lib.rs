//! Cleanup of Bloodhound drilling-log exports.
//!
//! A Bloodhound export is a whitespace-delimited text table with one row per
//! depth. Real exports repeat depths, skip depths and run past the interval
//! of interest. This crate loads such an export into a [`WorkingSet`], trims
//! it to a depth window, collapses duplicate depths and flat-fills gaps, so
//! the result has exactly one row per foot with no holes.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use mudlog_cleanup::{CleanupConfig, pipeline};
//!
//! let cleaned = pipeline::run(Path::new("well_7.xls"), &CleanupConfig::default()).unwrap();
//! print!("{}", cleaned.working_set);
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;

pub use config::{CleanupConfig, OutputFormat};
pub use data::clean::CleanReport;
pub use data::model::{Measurement, WorkingSet};
pub use error::{CleanupError, Result};
