//! Row rendering.
//!
//! The engine does not decide how a cell looks. A [`RowRenderer`] turns one
//! record into display cells, and [`RenderedTable::build`] assembles the
//! header and the rendered rows of a page. Consumers pick the renderer.

use gridline_seeker::Dir;

use crate::columns::{display_order, ColumnDescriptor};
use crate::menu::RowAction;
use crate::record::{Record, RecordId};
use crate::sort::SortState;

/// Header text of the trailing row-actions column.
pub const ACTIONS_HEADER: &str = "Actions";

/// Strategy for turning a record into display cells.
pub trait RowRenderer: Send + Sync {
    /// Renders `record` for the given display columns.
    ///
    /// `cells` must hold one entry per column, in the order given.
    fn render_row(
        &self,
        record: &Record,
        columns: &[&ColumnDescriptor],
        actions: &[RowAction],
    ) -> RenderedRow;
}

/// Renders each cell as the field's plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRowRenderer;

impl RowRenderer for TextRowRenderer {
    fn render_row(
        &self,
        record: &Record,
        columns: &[&ColumnDescriptor],
        actions: &[RowAction],
    ) -> RenderedRow {
        RenderedRow {
            id: record.id().clone(),
            cells: columns.iter().map(|c| record.cell_text(&c.name)).collect(),
            actions: actions.iter().map(|a| a.label().to_string()).collect(),
        }
    }
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    /// Identity of the source record, used to target its menu.
    pub id: RecordId,
    /// One display string per column.
    pub cells: Vec<String>,
    /// Labels offered in the row's menu.
    pub actions: Vec<String>,
}

/// One header cell.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub text: String,
    /// Source field, `None` for the actions column.
    pub field: Option<String>,
    pub sortable: bool,
    /// Direction arrow when this is the active sort key.
    pub sort: Option<Dir>,
}

/// A page ready for display.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedTable {
    /// No records or no columns: show an empty state.
    Empty,
    Rows {
        headers: Vec<HeaderCell>,
        rows: Vec<RenderedRow>,
    },
}

impl RenderedTable {
    /// Renders `records` with the shown columns in display order.
    ///
    /// An actions column is appended when `actions` is non-empty.
    pub fn build(
        records: &[&Record],
        columns: &[ColumnDescriptor],
        sort: &SortState,
        actions: &[RowAction],
        renderer: &dyn RowRenderer,
    ) -> RenderedTable {
        let shown = display_order(columns);
        if records.is_empty() || shown.is_empty() {
            return RenderedTable::Empty;
        }

        let mut headers: Vec<HeaderCell> = shown
            .iter()
            .map(|c| HeaderCell {
                text: c.header(),
                field: Some(c.name.clone()),
                sortable: c.is_sortable,
                sort: sort.indicator(&c.name),
            })
            .collect();
        if !actions.is_empty() {
            headers.push(HeaderCell {
                text: ACTIONS_HEADER.to_string(),
                field: None,
                sortable: false,
                sort: None,
            });
        }

        let rows = records
            .iter()
            .map(|r| renderer.render_row(r, &shown, actions))
            .collect();

        RenderedTable::Rows { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RenderedTable::Empty)
    }

    pub fn headers(&self) -> &[HeaderCell] {
        match self {
            RenderedTable::Rows { headers, .. } => headers,
            RenderedTable::Empty => &[],
        }
    }

    pub fn rows(&self) -> &[RenderedRow] {
        match self {
            RenderedTable::Rows { rows, .. } => rows,
            RenderedTable::Empty => &[],
        }
    }

    /// The table as plain text: header texts and one line per row.
    ///
    /// When there is an actions column, each row's last cell lists its
    /// action labels.
    pub fn grid(&self) -> (Vec<String>, Vec<Vec<String>>) {
        let headers: Vec<String> = self.headers().iter().map(|h| h.text.clone()).collect();
        let has_actions = self.headers().iter().any(|h| h.field.is_none());

        let rows = self
            .rows()
            .iter()
            .map(|row| {
                let mut cells = row.cells.clone();
                if has_actions {
                    cells.push(row.actions.join(", "));
                }
                cells
            })
            .collect();

        (headers, rows)
    }
}
