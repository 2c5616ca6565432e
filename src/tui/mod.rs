//! Terminal viewer for the atlas
//!
//! Text-mode widgets that render to plain `String` lines, so every frame can
//! be tested without a terminal. The `view` command draws them with
//! crossterm.
//!
//! # Architecture
//!
//! - `TableAdapter` - row/column access to a projected table
//! - `TableView` - scrollable data table
//! - `ColumnChecklist` - column selector
//! - `InspectorPane` - column information and dataset summary
//! - `ViewerApp` - focus, key handling and screen layout
//!
//! # Example
//!
//! ```ignore
//! use cityatlas::tui::{Key, ViewerApp};
//!
//! let mut app = ViewerApp::new(data, &config)?;
//! app.handle_key(Key::Tab);
//! for line in app.render_lines(120, 40) {
//!     println!("{line}");
//! }
//! ```

mod adapter;
mod app;
mod error;
mod format;
mod inspector;
mod scroll;
mod selector;
mod table;

// Public exports
pub use adapter::TableAdapter;
pub use app::{Focus, Key, ViewerApp};
pub use error::{TuiError, TuiResult};
pub use format::{
    display_width, fit_to_width, format_array_value, truncate_string, wrap_text, MISSING_MARKER,
};
pub use inspector::InspectorPane;
pub use scroll::ScrollState;
pub use selector::ColumnChecklist;
pub use table::TableView;
