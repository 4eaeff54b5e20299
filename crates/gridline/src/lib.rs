//! # Gridline - Tabular Data View Engine
//!
//! Gridline turns a flat list of JSON records into a browsable table. It owns
//! the state behind the table (columns, sort, filters, current page, open
//! menu) and derives everything else on demand:
//!
//! - Column descriptors derived from a sample record and a [`ColumnPolicy`]
//! - Exact, substring, and clause filters, always combined with AND
//! - A stable single-key sort toggled by header clicks
//! - Fixed-size pagination that re-clamps whenever the data changes
//! - Row and header menus, at most one open at a time
//! - Spreadsheet, CSV, and print-ready HTML exports
//!
//! Rendering is left to the host. [`RenderedTable`] is a plain grid of
//! strings; a custom [`RowRenderer`] controls how each row's cells look.
//!
//! ## Quick Start
//!
//! ```rust
//! use gridline::{DataView, Dataset, ViewConfig, ColumnPolicy, ExportScope};
//!
//! let data = Dataset::from_json_str(r#"[
//!     {"postId": 1, "id": 1, "name": "first", "email": "a@x"},
//!     {"postId": 1, "id": 2, "name": "second", "email": "b@x"},
//!     {"postId": 2, "id": 3, "name": "third", "email": "c@x"}
//! ]"#).unwrap();
//!
//! let config = ViewConfig {
//!     title: "Comments List".into(),
//!     exact_filter_field: "postId".into(),
//!     columns: ColumnPolicy::new().hide("email"),
//!     ..ViewConfig::default()
//! };
//!
//! let mut view = DataView::new(&config).unwrap();
//! view.replace_dataset(data);
//! view.set_exact_filter_text("1");
//! view.handle_sort("id");
//! view.handle_sort("id");
//!
//! let ids: Vec<String> = view.page().items.iter().map(|r| r.cell_text("id")).collect();
//! assert_eq!(ids, vec!["2", "1"]);
//!
//! let csv = view.export_csv(ExportScope::AllData).unwrap();
//! assert_eq!(csv.file_name, "Comments List.csv");
//! assert_eq!(String::from_utf8(csv.bytes).unwrap(), "postId,id,name\n1,2,second\n1,1,first\n");
//! ```
//!
//! ## Configuration
//!
//! [`ViewConfig`] loads from YAML or JSON; see the [`config`] module.
//!
//! ## Logging
//!
//! Mutations are reported with `tracing` at debug level. Failed exports are
//! logged once: empty data as a warning, anything else as an error. Install
//! a subscriber to see them.

pub mod columns;
pub mod config;
mod error;
pub mod export;
pub mod filter;
pub mod menu;
pub mod pagination;
pub mod record;
pub mod render;
pub mod sort;
mod view;

pub use columns::{display_order, humanize, shown_columns, ColumnDescriptor, ColumnPolicy};
pub use config::{PaginationConfig, ViewConfig, DEFAULT_TITLE};
pub use error::{ActionError, ConfigError, DatasetError, ExportError, RecordError, SurfaceError};
pub use export::{
    artifact_name, Artifact, DirectorySurface, ExportRequest, ExportScope, PrintDocument,
    PrintSurface,
};
pub use filter::{apply_filters, FilterSpec, RecordMatcher};
pub use menu::{
    ActionHandler, ActionOutcome, Boundary, HeaderAction, MenuState, MenuTarget, Point, Rect,
    RowAction,
};
pub use pagination::{Page, PageSize, Paginator, DEFAULT_PAGE_SIZE};
pub use record::{Dataset, Record, RecordId, ID_FIELD};
pub use render::{
    HeaderCell, RenderedRow, RenderedTable, RowRenderer, TextRowRenderer, ACTIONS_HEADER,
};
pub use sort::{sort_records, SortState};
pub use view::DataView;

// Seeker types that appear in this crate's public API.
pub use gridline_seeker::{Clause, Dir, Number, Op};
