//! Plain-text table output.
//!
//! Widths are measured with `console`, so wide characters and ANSI codes
//! line up correctly.

use console::{measure_text_width, pad_str, truncate_str, Alignment, Style};
use gridline::{ColumnDescriptor, Dir, Page, Record, RenderedRow, RenderedTable, RowAction, RowRenderer};

const ELLIPSIS: &str = "…";
const SEPARATOR: &str = "  ";

/// Renders cells as text cut to a maximum display width.
#[derive(Debug, Clone, Copy)]
pub struct TruncatingRenderer {
    pub max_width: usize,
}

impl RowRenderer for TruncatingRenderer {
    fn render_row(
        &self,
        record: &Record,
        columns: &[&ColumnDescriptor],
        actions: &[RowAction],
    ) -> RenderedRow {
        RenderedRow {
            id: record.id().clone(),
            cells: columns
                .iter()
                .map(|c| truncate_end(&record.cell_text(&c.name), self.max_width))
                .collect(),
            actions: actions.iter().map(|a| a.label().to_string()).collect(),
        }
    }
}

/// Cuts `s` to `max_width` columns, ending with an ellipsis when cut.
pub fn truncate_end(s: &str, max_width: usize) -> String {
    truncate_str(s, max_width, ELLIPSIS).into_owned()
}

fn sort_marker(dir: Option<Dir>) -> &'static str {
    match dir {
        Some(Dir::Asc) => " ▲",
        Some(Dir::Desc) => " ▼",
        None => "",
    }
}

/// Formats the table and a pagination footer.
///
/// An empty table prints "No data".
pub fn format_table<T>(table: &RenderedTable, page: &Page<T>, bold: bool) -> String {
    if table.is_empty() {
        return "No data\n".to_string();
    }

    let headers: Vec<String> = table
        .headers()
        .iter()
        .map(|h| format!("{}{}", h.text, sort_marker(h.sort)))
        .collect();
    let (_, rows) = table.grid();

    let mut widths: Vec<usize> = headers.iter().map(|h| measure_text_width(h)).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(measure_text_width(cell));
        }
    }

    let header_style = if bold { Style::new().bold() } else { Style::new() };
    let mut out = String::new();
    out.push_str(&format_line(&headers, &widths, &header_style));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format_line(&rule, &widths, &Style::new()));
    for row in &rows {
        out.push_str(&format_line(row, &widths, &Style::new()));
    }

    out.push_str(&format!(
        "\nPage {} of {} ({}-{} of {})\n",
        page.current_page,
        page.total_pages,
        page.first_item(),
        page.last_item(),
        page.total_items
    ));
    out
}

fn format_line(cells: &[String], widths: &[usize], style: &Style) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let padded = pad_str(cell, *width, Alignment::Left, None);
            style.apply_to(padded).to_string()
        })
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    format!("{}\n", line.trim_end())
}
