//! cityatlas - A viewer for the European Cities Atlas
//!
//! The atlas is a table of standardized indicators for roughly 700 European
//! cities (one row per city, one column per indicator, plus the city
//! geometry) together with a codebook that documents each indicator.
//! This crate loads both, lets you pick which columns to view, inspects a
//! single column against its codebook entry, and summarizes the table.
//!
//! # Design Principles
//!
//! 1. **Load once** - `DataStore` fetches both sources on first use and
//!    shares the snapshot read-only afterwards
//! 2. **Arrow throughout** - GeoJSON, CSV and Parquet all become
//!    `RecordBatch`es; geometries are kept as WKT text
//! 3. **Recoverable panels** - an empty selection or an undocumented column
//!    yields a warning or placeholder, never an error
//!
//! # Quick Start
//!
//! ```no_run
//! use cityatlas::{panel, DataStore, ViewerConfig};
//!
//! # fn main() -> cityatlas::Result<()> {
//! let config = ViewerConfig::default();
//! let store = DataStore::from_config(&config)?;
//! let atlas = store.get_or_load()?;
//!
//! let selection = panel::select(atlas.table(), &["city", "population"])?;
//! if let Some(warning) = selection.warning() {
//!     println!("{warning}");
//! }
//!
//! let details = panel::inspect("population", atlas.table(), atlas.codebook())?;
//! println!("{:?}", details.statistics);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::cast_lossless,
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss,
        clippy::redundant_clone,
        clippy::too_many_lines,
        clippy::float_cmp,
        clippy::similar_names,
        clippy::unreadable_literal
    )
)]
// Allow some pedantic lints for cleaner code
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::map_unwrap_or)]

pub mod backend;
/// CLI module for command-line interface
#[cfg(feature = "cli")]
pub mod cli;
pub mod codebook;
pub mod column;
pub mod config;
pub mod dataset;
pub mod error;
pub mod geo;
pub mod html;
pub mod panel;
pub mod stats;
pub mod store;
/// Terminal viewer widgets
pub mod tui;

// Re-exports for convenience
// Re-export arrow types commonly needed
pub use arrow::{
    array::RecordBatch,
    datatypes::{Schema, SchemaRef},
};
pub use codebook::{Codebook, CodebookColumns, CodebookEntry};
pub use column::ColumnKind;
pub use config::ViewerConfig;
pub use dataset::{ArrowDataset, CsvOptions, Dataset, SourceFormat};
pub use error::{Error, Result};
pub use html::{escape_html, render_error_page, render_page, PageView};
pub use stats::{CategoricalSummary, ColumnStatistics, NumericSummary};
pub use store::{AtlasData, DataStore, Sources};
pub use tui::{TuiError, TuiResult, ViewerApp};
