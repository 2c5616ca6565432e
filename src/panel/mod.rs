//! The viewer's panels as pure functions of the loaded atlas.
//!
//! - [`select`] projects the main table onto the chosen columns.
//! - [`inspect`] gathers codebook metadata and statistics for one column.
//! - [`summarize`] totals rows, columns and missing cells.

mod inspector;
mod selector;
mod summary;

pub use inspector::{inspect, inspect_as, Details, Link, MetadataState, NO_METADATA_PLACEHOLDER};
pub use selector::{default_selection, select, Projection, Selection, EMPTY_SELECTION_WARNING};
pub use summary::{group_thousands, summarize, Summary};
