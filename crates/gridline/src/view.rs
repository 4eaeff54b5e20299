//! The data view: one owner for dataset, columns, and interaction state.
//!
//! [`DataView`] holds the dataset and every piece of state the engines need
//! (column descriptors, sort, filters, current page, open menu). Derived
//! sequences are never cached: [`visible`](DataView::visible),
//! [`page`](DataView::page) and [`render`](DataView::render) recompute from
//! the current state on every call.
//!
//! Every mutation that can change the number of visible records re-clamps
//! the current page, so `1 <= current_page <= total_pages` always holds.

use std::fmt;

use gridline_seeker::{Clause, Dir};
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, error, warn};

use crate::columns::{ColumnDescriptor, ColumnPolicy};
use crate::config::ViewConfig;
use crate::error::{ActionError, ConfigError, DatasetError, ExportError};
use crate::export::{
    build_sheet, print_all, print_current_page, to_csv, Artifact, ExportRequest, ExportScope,
    PrintDocument, PrintSurface,
};
use crate::filter::{apply_filters, FilterSpec};
use crate::menu::{ActionOutcome, Boundary, HeaderAction, MenuState, MenuTarget, Point, RowAction};
use crate::pagination::{Page, PageSize, Paginator};
use crate::record::{Dataset, Record, RecordId, ID_FIELD};
use crate::render::{RenderedTable, RowRenderer, TextRowRenderer};
use crate::sort::{sort_records, SortState};

/// A paginated, sortable, filterable view over a dataset.
pub struct DataView {
    title: String,
    dataset: Dataset,
    policy: ColumnPolicy,
    columns: Vec<ColumnDescriptor>,
    sort: SortState,
    filter: FilterSpec,
    paginator: Paginator,
    menu: MenuState,
    actions: Vec<RowAction>,
    renderer: Box<dyn RowRenderer>,
}

impl DataView {
    /// Creates an empty view from `config`.
    pub fn new(config: &ViewConfig) -> Result<Self, ConfigError> {
        Ok(DataView {
            title: config.title.clone(),
            dataset: Dataset::default(),
            policy: config.columns.clone(),
            columns: Vec::new(),
            sort: SortState::unsorted(),
            filter: FilterSpec::new(config.exact_filter_field.clone()),
            paginator: Paginator::new(config.page_size()?),
            menu: MenuState::Closed,
            actions: Vec::new(),
            renderer: Box::new(TextRowRenderer),
        })
    }

    pub fn with_actions(mut self, actions: Vec<RowAction>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_renderer(mut self, renderer: impl RowRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn add_action(&mut self, action: RowAction) {
        self.actions.push(action);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Column descriptors in canonical order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn menu(&self) -> &MenuState {
        &self.menu
    }

    pub fn actions(&self) -> &[RowAction] {
        &self.actions
    }

    // ========================================================================
    // Dataset
    // ========================================================================

    /// Swaps in a new dataset.
    ///
    /// Columns are derived again when none are known yet or when the view
    /// goes from empty to non-empty. A row menu whose record disappeared is
    /// closed.
    pub fn replace_dataset(&mut self, dataset: Dataset) {
        let was_empty = self.dataset.is_empty();
        self.dataset = dataset;
        debug!(records = self.dataset.len(), "dataset replaced");

        if self.columns.is_empty() || (was_empty && !self.dataset.is_empty()) {
            self.columns = self.policy.derive_for(&self.dataset);
            debug!(columns = self.columns.len(), "columns derived");
        }

        if let Some(MenuTarget::Row(id)) = self.menu.open_target() {
            if !self.dataset.contains(id) {
                self.menu.close();
            }
        }

        self.sync_page();
    }

    /// Removes the record with `id`. Returns `false` if there was none.
    pub fn delete_row(&mut self, id: &RecordId) -> bool {
        if !self.dataset.contains(id) {
            return false;
        }
        let dataset = self.dataset.without(id);
        self.replace_dataset(dataset);
        debug!(%id, "row deleted");
        true
    }

    /// Appends a record built from `fields`, assigning the next integer id.
    ///
    /// Any `id` in `fields` is ignored.
    pub fn add_row(&mut self, fields: Map<String, JsonValue>) -> Result<RecordId, DatasetError> {
        let id = self.dataset.next_id();
        let mut map = Map::new();
        map.insert(ID_FIELD.to_string(), JsonValue::from(id));
        map.extend(fields.into_iter().filter(|(k, _)| k != ID_FIELD));

        let record = Record::new(map).map_err(|source| DatasetError::Record {
            index: self.dataset.len(),
            source,
        })?;
        let dataset = self.dataset.with(record)?;
        self.replace_dataset(dataset);
        Ok(RecordId::Int(id))
    }

    /// Permanently reorders the dataset by one field.
    pub fn reorder_by(&mut self, field: &str, dir: Dir) {
        let dataset = self.dataset.reordered_by(field, dir);
        self.replace_dataset(dataset);
    }

    // ========================================================================
    // Columns
    // ========================================================================

    /// Shows or hides a column. Returns `false` for an unknown column.
    pub fn set_column_shown(&mut self, name: &str, shown: bool) -> bool {
        self.update_column(name, |c| c.is_shown = shown)
    }

    pub fn set_column_sortable(&mut self, name: &str, sortable: bool) -> bool {
        self.update_column(name, |c| c.is_sortable = sortable)
    }

    pub fn set_column_fixed(&mut self, name: &str, fixed: bool) -> bool {
        self.update_column(name, |c| c.is_fixed = fixed)
    }

    fn update_column(&mut self, name: &str, apply: impl FnOnce(&mut ColumnDescriptor)) -> bool {
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(column) => {
                apply(column);
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Filtering and sorting
    // ========================================================================

    /// Sets the exact filter from user text. Returns whether it is active.
    pub fn set_exact_filter_text(&mut self, text: &str) -> bool {
        let active = self.filter.set_exact_text(text);
        debug!(text, active, "exact filter changed");
        self.sync_page();
        active
    }

    pub fn set_search(&mut self, text: &str) {
        self.filter.set_search(text);
        debug!(text, "search changed");
        self.sync_page();
    }

    pub fn add_clause(&mut self, clause: Clause) {
        debug!(%clause, "clause added");
        self.filter.clauses.push(clause);
        self.sync_page();
    }

    pub fn clear_filters(&mut self) {
        self.filter = FilterSpec::new(self.filter.exact_field.clone());
        self.sync_page();
    }

    /// Applies a header click on `key`.
    pub fn handle_sort(&mut self, key: &str) {
        self.sort = self.sort.handle_sort(key);
        debug!(sort = %self.sort, "sort changed");
    }

    // ========================================================================
    // Pagination
    // ========================================================================

    pub fn current_page(&self) -> usize {
        self.paginator.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.paginator.total_pages(self.visible_len())
    }

    pub fn page_numbers(&self) -> std::ops::RangeInclusive<usize> {
        self.paginator.page_numbers(self.visible_len())
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        let len = self.visible_len();
        self.paginator.set_page_size(size, len);
    }

    /// Moves to `page`; out-of-range pages are rejected.
    pub fn set_page(&mut self, page: usize) -> bool {
        let len = self.visible_len();
        self.paginator.set_page(page, len)
    }

    pub fn next_page(&mut self) -> bool {
        let len = self.visible_len();
        self.paginator.next_page(len)
    }

    pub fn prev_page(&mut self) -> bool {
        self.paginator.prev_page()
    }

    pub fn has_next(&self) -> bool {
        self.paginator.has_next(self.visible_len())
    }

    pub fn has_prev(&self) -> bool {
        self.paginator.has_prev()
    }

    fn sync_page(&mut self) {
        let len = self.visible_len();
        let before = self.paginator.current_page();
        if self.paginator.sync(len) {
            debug!(
                from = before,
                to = self.paginator.current_page(),
                "current page clamped"
            );
        }
    }

    // ========================================================================
    // Derived views
    // ========================================================================

    /// Filtered, then sorted records.
    pub fn visible(&self) -> Vec<&Record> {
        sort_records(apply_filters(&self.dataset, &self.filter), &self.sort)
    }

    fn visible_len(&self) -> usize {
        apply_filters(&self.dataset, &self.filter).len()
    }

    /// The current page of visible records.
    pub fn page(&self) -> Page<&Record> {
        self.paginator.paginate(&self.visible())
    }

    /// The current page, rendered with the configured renderer.
    pub fn render(&self) -> RenderedTable {
        let page = self.page();
        RenderedTable::build(
            &page.items,
            &self.columns,
            &self.sort,
            &self.actions,
            self.renderer.as_ref(),
        )
    }

    // ========================================================================
    // Menus
    // ========================================================================

    pub fn toggle_menu(&mut self, target: MenuTarget) {
        self.menu.toggle(target);
    }

    pub fn close_menu(&mut self) -> bool {
        self.menu.close()
    }

    /// Closes the open menu if `point` is outside `boundary`.
    pub fn outside_interaction(&mut self, point: Point, boundary: &dyn Boundary) -> bool {
        self.menu.outside_interaction(point, boundary)
    }

    /// Runs the row action labelled `label` on the record with `id`.
    ///
    /// The menu is closed before the handler runs, whatever the outcome.
    pub fn dispatch_row_action(&mut self, id: &RecordId, label: &str) -> Result<(), ActionError> {
        let Some(record) = self.dataset.get(id) else {
            self.menu.close();
            return Err(ActionError::UnknownRecord(id.clone()));
        };
        let Some(action) = self.actions.iter().find(|a| a.label() == label) else {
            self.menu.close();
            return Err(ActionError::UnknownAction(label.to_string()));
        };

        let outcome = self.menu.dispatch(action, record).inspect_err(|e| {
            warn!(error = %e, "row action failed");
        })?;

        if let ActionOutcome::DeleteRow(id) = outcome {
            self.delete_row(&id);
        }
        Ok(())
    }

    /// Runs a header menu entry.
    ///
    /// Spreadsheet and CSV exports return the artifact for the caller to
    /// save; print entries hand their document to `surface`.
    pub fn dispatch_header(
        &mut self,
        action: HeaderAction,
        surface: &mut dyn PrintSurface,
    ) -> Result<Option<Artifact>, ExportError> {
        self.menu.close();
        debug!(%action, "header action");
        match action {
            HeaderAction::ExportSpreadsheet => {
                self.export_spreadsheet(ExportScope::CurrentPage).map(Some)
            }
            HeaderAction::ExportCsv => self.export_csv(ExportScope::CurrentPage).map(Some),
            HeaderAction::PrintCurrentPage => self
                .print(ExportScope::CurrentPage, surface)
                .map(|_| None),
            HeaderAction::PrintAll => self.print(ExportScope::AllData, surface).map(|_| None),
        }
    }

    // ========================================================================
    // Exports
    // ========================================================================

    /// Builds the export inputs for `scope`.
    pub fn export_request(&self, scope: ExportScope) -> ExportRequest<'_> {
        let records = match scope {
            ExportScope::CurrentPage => self.page().items,
            ExportScope::AllData => self.visible(),
        };
        ExportRequest::new(scope, &self.columns, records, &self.title)
    }

    pub fn export_spreadsheet(&self, scope: ExportScope) -> Result<Artifact, ExportError> {
        let request = self.export_request(scope);
        report(build_sheet(&request).and_then(|sheet| sheet.to_artifact()))
    }

    pub fn export_csv(&self, scope: ExportScope) -> Result<Artifact, ExportError> {
        report(to_csv(&self.export_request(scope)))
    }

    /// Builds the print document for `scope` and opens it on `surface`.
    pub fn print(
        &self,
        scope: ExportScope,
        surface: &mut dyn PrintSurface,
    ) -> Result<PrintDocument, ExportError> {
        let document = match scope {
            ExportScope::CurrentPage => print_current_page(&self.render(), &self.title),
            ExportScope::AllData => print_all(&self.export_request(scope)),
        };
        report(document.and_then(|doc| {
            surface.open(&doc)?;
            Ok(doc)
        }))
    }
}

/// Logs an export failure once, then passes the result through.
fn report<T>(result: Result<T, ExportError>) -> Result<T, ExportError> {
    match &result {
        Err(ExportError::NoData) => warn!("no data to export"),
        Err(e) => error!(error = %e, "export failed"),
        Ok(_) => {}
    }
    result
}

impl fmt::Debug for DataView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataView")
            .field("title", &self.title)
            .field("records", &self.dataset.len())
            .field("columns", &self.columns)
            .field("sort", &self.sort)
            .field("filter", &self.filter)
            .field("paginator", &self.paginator)
            .field("menu", &self.menu)
            .field("actions", &self.actions)
            .finish_non_exhaustive()
    }
}
