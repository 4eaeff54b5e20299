//! End-to-end tests driving a DataView the way a host application would.

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use calamine::{open_workbook_from_rs, Reader, Xlsx};
use gridline::{
    ColumnPolicy, DataView, Dataset, Dir, ExportError, ExportScope, HeaderAction, MenuTarget,
    PaginationConfig, Point, PrintDocument, PrintSurface, RecordId, Rect, RowAction, SortState,
    SurfaceError, ViewConfig,
};
use serde_json::json;

// ============================================================================
// Helpers
// ============================================================================

fn comments(n: i64) -> Dataset {
    let values = (1..=n)
        .map(|i| {
            json!({
                "postId": (i - 1) / 5 + 1,
                "id": i,
                "name": format!("name {}", i),
                "email": format!("user{}@example.com", i),
                "body": format!("body of comment {}", i)
            })
        })
        .collect();
    Dataset::from_values(values).unwrap()
}

fn comments_config(page_size: usize) -> ViewConfig {
    ViewConfig {
        title: "Comments List".into(),
        pagination: PaginationConfig {
            enabled: true,
            page_size,
        },
        columns: ColumnPolicy::new()
            .exclude_sort("body")
            .hide("email")
            .fix("id")
            .fix("postId"),
        exact_filter_field: "id".into(),
    }
}

fn loaded(n: i64, page_size: usize) -> DataView {
    let mut view = DataView::new(&comments_config(page_size)).unwrap();
    view.replace_dataset(comments(n));
    view
}

fn page_ids(view: &DataView) -> Vec<i64> {
    view.page()
        .items
        .iter()
        .filter_map(|r| r.id().as_int())
        .collect()
}

/// Records every document it is asked to open.
#[derive(Default)]
struct RecordingSurface {
    opened: Vec<PrintDocument>,
}

impl PrintSurface for RecordingSurface {
    fn open(&mut self, document: &PrintDocument) -> Result<(), SurfaceError> {
        self.opened.push(document.clone());
        Ok(())
    }
}

struct BlockedSurface;

impl PrintSurface for BlockedSurface {
    fn open(&mut self, _document: &PrintDocument) -> Result<(), SurfaceError> {
        Err(SurfaceError::Unavailable("popup blocked".into()))
    }
}

// ============================================================================
// Pagination scenarios
// ============================================================================

#[test]
fn deleting_rows_clamps_current_page() {
    let mut view = loaded(250, 100);
    assert_eq!(view.total_pages(), 3);

    assert!(view.set_page(3));
    let page = view.page();
    assert_eq!(page.items.len(), 50);
    assert_eq!(page.first_item(), 201);
    assert_eq!(page.last_item(), 250);

    for id in 91..=250 {
        assert!(view.delete_row(&RecordId::Int(id)));
    }

    assert_eq!(view.dataset().len(), 90);
    assert_eq!(view.total_pages(), 1);
    assert_eq!(view.current_page(), 1);
    assert_eq!(page_ids(&view), (1..=90).collect::<Vec<_>>());
}

#[test]
fn exact_filter_relocates_match_to_first_page() {
    let mut view = loaded(250, 100);
    view.set_page(3);

    assert!(view.set_exact_filter_text("42"));
    assert_eq!(view.current_page(), 1);
    assert_eq!(page_ids(&view), vec![42]);

    // Unparseable text disables the predicate instead of matching nothing.
    assert!(!view.set_exact_filter_text("forty-two"));
    assert_eq!(view.page().total_items, 250);
}

#[test]
fn exact_filter_pulls_page_two_rows_to_first_page() {
    let mut config = comments_config(100);
    config.exact_filter_field = "postId".into();
    let mut view = DataView::new(&config).unwrap();
    view.replace_dataset(comments(250));
    assert!(view.set_page(2));

    // postId 30 covers ids 146-150, all on page 2 before filtering.
    assert!(view.set_exact_filter_text("30"));
    assert_eq!(view.total_pages(), 1);
    assert_eq!(view.current_page(), 1);
    assert_eq!(page_ids(&view), (146..=150).collect::<Vec<_>>());
}

#[test]
fn filters_combine_with_and() {
    let mut view = loaded(50, 100);
    view.set_search("NAME 1");
    // name 1, name 10..name 19
    assert_eq!(view.page().total_items, 11);

    view.set_exact_filter_text("15");
    assert_eq!(page_ids(&view), vec![15]);

    view.set_exact_filter_text("21");
    assert!(view.page().items.is_empty());
    assert_eq!(view.total_pages(), 1);
    assert!(view.render().is_empty());

    view.clear_filters();
    assert_eq!(view.page().total_items, 50);
}

#[test]
fn search_covers_hidden_columns() {
    let mut view = loaded(30, 100);
    view.set_search("user7@");
    assert_eq!(page_ids(&view), vec![7]);
}

#[test]
fn disabled_pagination_shows_everything() {
    let mut config = comments_config(10);
    config.pagination.enabled = false;
    let mut view = DataView::new(&config).unwrap();
    view.replace_dataset(comments(250));

    assert_eq!(view.total_pages(), 1);
    assert_eq!(view.page().items.len(), 250);
    assert!(!view.next_page());
}

// ============================================================================
// Sorting
// ============================================================================

#[test]
fn header_clicks_toggle_direction() {
    let mut view = loaded(12, 100);

    view.handle_sort("name");
    assert_eq!(view.sort_state(), &SortState::by("name", Dir::Asc));
    let names: Vec<String> = view.page().items.iter().map(|r| r.cell_text("name")).collect();
    assert_eq!(names[..4], ["name 1", "name 10", "name 11", "name 12"]);

    view.handle_sort("name");
    assert_eq!(view.sort_state(), &SortState::by("name", Dir::Desc));
    assert_eq!(view.page().items[0].cell_text("name"), "name 9");

    view.handle_sort("postId");
    assert_eq!(view.sort_state(), &SortState::by("postId", Dir::Asc));
    // Ties keep input order.
    assert_eq!(page_ids(&view), (1..=12).collect::<Vec<_>>());
}

#[test]
fn rendered_headers_follow_sort_and_column_flags() {
    let mut view = loaded(3, 100);
    view.handle_sort("id");
    let table = view.render();

    let texts: Vec<&str> = table.headers().iter().map(|h| h.text.as_str()).collect();
    assert_eq!(texts, vec!["Post Id", "Id", "Name", "Body"]);

    let id = &table.headers()[1];
    assert_eq!(id.sort, Some(Dir::Asc));
    assert!(id.sortable);
    assert!(!table.headers()[3].sortable);
}

#[test]
fn reorder_is_permanent_but_sort_is_not() {
    let mut view = loaded(12, 100);
    view.reorder_by("postId", Dir::Desc);
    assert_eq!(page_ids(&view)[..2], [11, 12]);

    view.handle_sort("id");
    assert_eq!(page_ids(&view)[0], 1);
    assert_eq!(view.dataset().records()[0].cell_text("id"), "11");
}

// ============================================================================
// Menus and actions
// ============================================================================

#[test]
fn only_one_menu_is_open() {
    let mut view = loaded(5, 100);
    let row1 = MenuTarget::Row(RecordId::Int(1));
    let row2 = MenuTarget::Row(RecordId::Int(2));

    view.toggle_menu(row1.clone());
    assert!(view.menu().is_open_for(&row1));

    view.toggle_menu(row2.clone());
    assert!(view.menu().is_open_for(&row2));
    assert!(!view.menu().is_open_for(&row1));

    view.toggle_menu(MenuTarget::Header);
    assert!(view.menu().is_open_for(&MenuTarget::Header));

    view.toggle_menu(MenuTarget::Header);
    assert!(!view.menu().is_open());
}

#[test]
fn outside_click_closes_menu() {
    let mut view = loaded(5, 100);
    let menu_area = Rect::new(0.0, 0.0, 100.0, 50.0);
    view.toggle_menu(MenuTarget::Header);

    assert!(!view.outside_interaction(Point::new(10.0, 10.0), &menu_area));
    assert!(view.menu().is_open());

    assert!(view.outside_interaction(Point::new(150.0, 10.0), &menu_area));
    assert!(!view.menu().is_open());
}

#[test]
fn view_action_sees_the_record() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let view_action = RowAction::new("View", move |record| {
        sink.lock().unwrap().push(record.summary());
        Ok(())
    });

    let mut view = DataView::new(&comments_config(100))
        .unwrap()
        .with_actions(vec![view_action, RowAction::delete_row("Delete")]);
    view.replace_dataset(comments(3));
    view.toggle_menu(MenuTarget::Row(RecordId::Int(2)));

    view.dispatch_row_action(&RecordId::Int(2), "View").unwrap();
    assert!(!view.menu().is_open());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].starts_with("postId: 1\nid: 2\nname: name 2"));
}

#[test]
fn failing_action_closes_menu_and_reports() {
    let failing = RowAction::new("Edit", |_| anyhow::bail!("read only"));
    let mut view = DataView::new(&comments_config(100))
        .unwrap()
        .with_actions(vec![failing]);
    view.replace_dataset(comments(3));
    view.toggle_menu(MenuTarget::Row(RecordId::Int(1)));

    let err = view.dispatch_row_action(&RecordId::Int(1), "Edit").unwrap_err();
    assert!(err.to_string().contains("Edit"));
    assert!(!view.menu().is_open());
    assert_eq!(view.dataset().len(), 3);
}

#[test]
fn actions_column_is_rendered() {
    let mut view = DataView::new(&comments_config(100))
        .unwrap()
        .with_actions(vec![RowAction::delete_row("Delete")]);
    view.replace_dataset(comments(2));

    let (headers, rows) = view.render().grid();
    assert_eq!(headers.last().map(String::as_str), Some("Actions"));
    assert_eq!(rows[0].last().map(String::as_str), Some("Delete"));
}

// ============================================================================
// Exports
// ============================================================================

fn two_rows() -> DataView {
    let mut view = DataView::new(&ViewConfig {
        title: "People".into(),
        columns: ColumnPolicy::new().hide("email"),
        ..ViewConfig::default()
    })
    .unwrap();
    view.replace_dataset(
        Dataset::from_json_str(
            r#"[
                {"id": 1, "name": "A", "email": "a@x"},
                {"id": 2, "name": "B", "email": "b@x"}
            ]"#,
        )
        .unwrap(),
    );
    view
}

#[test]
fn exports_project_shown_columns() {
    let view = two_rows();

    let csv = view.export_csv(ExportScope::AllData).unwrap();
    assert_eq!(csv.file_name, "People.csv");
    assert_eq!(String::from_utf8(csv.bytes).unwrap(), "id,name\n1,A\n2,B\n");

    let request = view.export_request(ExportScope::AllData);
    let sheet = gridline::export::build_sheet(&request).unwrap();
    assert_eq!(sheet.headers, vec!["Id", "Name"]);
    assert_eq!(sheet.rows.len(), 2);
    assert_eq!(sheet.rows[1][1].text(), "B");

}

#[test]
fn spreadsheet_opens_with_header_and_rows() {
    let view = two_rows();
    let xlsx = view.export_spreadsheet(ExportScope::AllData).unwrap();
    assert_eq!(xlsx.file_name, "People.xlsx");

    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(xlsx.bytes)).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Data".to_string()]);

    let range = workbook.worksheet_range("Data").unwrap();
    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();
    assert_eq!(
        rows,
        vec![
            vec!["Id".to_string(), "Name".to_string()],
            vec!["1".to_string(), "A".to_string()],
            vec!["2".to_string(), "B".to_string()],
        ]
    );
    assert!(!rows.iter().flatten().any(|cell| cell.contains("@x")));
}

#[test]
fn print_current_page_omits_hidden_and_actions() {
    let mut view = two_rows().with_actions(vec![RowAction::delete_row("Delete")]);
    view.handle_sort("id");
    let mut surface = RecordingSurface::default();

    let doc = view.print(ExportScope::CurrentPage, &mut surface).unwrap();
    assert_eq!(surface.opened.len(), 1);
    assert_eq!(doc.title, "People");
    assert!(doc.html.contains("<td>A</td>"));
    assert!(!doc.html.contains("a@x"));
    assert!(!doc.html.contains("Actions"));
}

#[test]
fn print_all_spans_every_page() {
    let mut view = loaded(25, 10);
    let mut surface = RecordingSurface::default();

    view.dispatch_header(HeaderAction::PrintAll, &mut surface).unwrap();
    let html = &surface.opened[0].html;
    assert!(html.contains("<td>25</td>"));
    assert!(html.contains("<td>1</td>"));
    assert!(!html.contains("user1@example.com"));
}

#[test]
fn header_export_closes_menu() {
    let mut view = two_rows();
    view.toggle_menu(MenuTarget::Header);

    let artifact = view
        .dispatch_header(HeaderAction::ExportSpreadsheet, &mut RecordingSurface::default())
        .unwrap();
    assert!(!view.menu().is_open());
    assert_eq!(artifact.map(|a| a.file_name), Some("People.xlsx".to_string()));
}

#[test]
fn blocked_surface_is_an_error() {
    let view = two_rows();
    let err = view
        .print(ExportScope::AllData, &mut BlockedSurface)
        .unwrap_err();
    assert!(matches!(
        err,
        ExportError::Surface(SurfaceError::Unavailable(_))
    ));
}

#[test]
fn empty_view_exports_nothing() {
    let mut view = two_rows();
    view.set_exact_filter_text("99");
    let mut surface = RecordingSurface::default();

    assert!(matches!(
        view.export_spreadsheet(ExportScope::CurrentPage),
        Err(ExportError::NoData)
    ));
    assert!(matches!(
        view.print(ExportScope::CurrentPage, &mut surface),
        Err(ExportError::NoData)
    ));
    assert!(surface.opened.is_empty());
}

#[test]
fn artifacts_are_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let view = two_rows();
    let path = view
        .export_csv(ExportScope::CurrentPage)
        .unwrap()
        .write_to(dir.path())
        .unwrap();
    assert_eq!(path, dir.path().join("People.csv"));
    assert!(std::fs::read_to_string(path).unwrap().starts_with("id,name"));
}
