//! Row and header action menus.
//!
//! At most one menu is open at a time: either a row's menu or the header
//! menu. The state machine is:
//!
//! ```text
//! Closed      --toggle(t)-->        OpenFor(t)
//! OpenFor(t)  --toggle(t)-->        Closed
//! OpenFor(t)  --toggle(u), u != t--> OpenFor(u)
//! OpenFor(t)  --outside click-->    Closed
//! OpenFor(t)  --dispatch-->         Closed
//! ```
//!
//! Dispatch closes the menu before the handler runs, so a failing or
//! panicking handler can never leave a menu open.

use std::fmt;
use std::sync::Arc;

use crate::error::ActionError;
use crate::record::{Record, RecordId};

/// What a menu belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MenuTarget {
    Row(RecordId),
    Header,
}

/// Which menu, if any, is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MenuState {
    #[default]
    Closed,
    OpenFor(MenuTarget),
}

impl MenuState {
    /// Opens `target`, or closes it if it is already open.
    pub fn toggle(&mut self, target: MenuTarget) {
        *self = match self {
            MenuState::OpenFor(open) if *open == target => MenuState::Closed,
            _ => MenuState::OpenFor(target),
        };
    }

    /// Closes any open menu. Returns `true` if one was open.
    pub fn close(&mut self) -> bool {
        std::mem::take(self) != MenuState::Closed
    }

    pub fn is_open(&self) -> bool {
        matches!(self, MenuState::OpenFor(_))
    }

    pub fn is_open_for(&self, target: &MenuTarget) -> bool {
        self.open_target() == Some(target)
    }

    pub fn open_target(&self) -> Option<&MenuTarget> {
        match self {
            MenuState::OpenFor(target) => Some(target),
            MenuState::Closed => None,
        }
    }

    /// Handles a pointer interaction. Closes the menu when `point` falls
    /// outside `boundary`; returns `true` if that happened.
    pub fn outside_interaction(&mut self, point: Point, boundary: &dyn Boundary) -> bool {
        if !self.is_open() || boundary.is_inside(point) {
            return false;
        }
        self.close()
    }

    /// Closes the menu, then runs `action` on `record`.
    pub fn dispatch(
        &mut self,
        action: &RowAction,
        record: &Record,
    ) -> Result<ActionOutcome, ActionError> {
        self.close();
        action.invoke(record)
    }
}

/// A position in the host's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Answers whether a point lies within the table.
pub trait Boundary {
    fn is_inside(&self, point: Point) -> bool;
}

/// An axis-aligned rectangle boundary.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

impl Boundary for Rect {
    fn is_inside(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

impl<F> Boundary for F
where
    F: Fn(Point) -> bool,
{
    fn is_inside(&self, point: Point) -> bool {
        self(point)
    }
}

/// Handler signature for custom row actions.
pub type ActionHandler = dyn Fn(&Record) -> anyhow::Result<()> + Send + Sync;

/// What the view should do after an action ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Nothing beyond the handler's own effects.
    Done,
    /// Remove the record from the dataset.
    DeleteRow(RecordId),
}

#[derive(Clone)]
enum Effect {
    Call(Arc<ActionHandler>),
    DeleteRow,
}

/// One entry in a row's action menu.
///
/// Handlers receive the full raw record, including hidden fields.
#[derive(Clone)]
pub struct RowAction {
    label: String,
    effect: Effect,
}

impl RowAction {
    /// An action that calls `handler` with the row's record.
    pub fn new<F>(label: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Record) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        RowAction {
            label: label.into(),
            effect: Effect::Call(Arc::new(handler)),
        }
    }

    /// An action that removes the row from the dataset.
    pub fn delete_row(label: impl Into<String>) -> Self {
        RowAction {
            label: label.into(),
            effect: Effect::DeleteRow,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Runs the action on `record`.
    pub fn invoke(&self, record: &Record) -> Result<ActionOutcome, ActionError> {
        match &self.effect {
            Effect::Call(handler) => {
                handler(record).map_err(|source| ActionError::Handler {
                    label: self.label.clone(),
                    source,
                })?;
                Ok(ActionOutcome::Done)
            }
            Effect::DeleteRow => Ok(ActionOutcome::DeleteRow(record.id().clone())),
        }
    }
}

impl fmt::Debug for RowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.effect {
            Effect::Call(_) => "call",
            Effect::DeleteRow => "delete_row",
        };
        f.debug_struct("RowAction")
            .field("label", &self.label)
            .field("effect", &kind)
            .finish()
    }
}

/// Entries in the table header's menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderAction {
    /// Spreadsheet of the current page.
    ExportSpreadsheet,
    /// Print document of the current page.
    PrintCurrentPage,
    /// Print document of every filtered, sorted record.
    PrintAll,
    /// CSV of the current page.
    ExportCsv,
}

impl HeaderAction {
    pub const ALL: [HeaderAction; 4] = [
        HeaderAction::ExportSpreadsheet,
        HeaderAction::PrintCurrentPage,
        HeaderAction::PrintAll,
        HeaderAction::ExportCsv,
    ];

    pub fn label(self) -> &'static str {
        match self {
            HeaderAction::ExportSpreadsheet => "Export to Excel",
            HeaderAction::PrintCurrentPage => "Print",
            HeaderAction::PrintAll => "Print All",
            HeaderAction::ExportCsv => "Export to CSV",
        }
    }
}

impl fmt::Display for HeaderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
