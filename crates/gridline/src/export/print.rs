//! Print-ready HTML documents.
//!
//! Documents are rendered with minijinja from an embedded template. The
//! template name ends in `.html`, so every interpolated value (title,
//! headers, cells) is HTML-escaped.

use std::fs;
use std::path::{Path, PathBuf};

use minijinja::{context, Environment};
use tracing::debug;

use super::{artifact_name, ExportRequest};
use crate::error::{ExportError, SurfaceError};
use crate::render::{RenderedTable, ACTIONS_HEADER};

const TEMPLATE_NAME: &str = "print.html";
const TEMPLATE_SOURCE: &str = include_str!("../../templates/print.html");

/// A standalone HTML document ready for printing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintDocument {
    pub title: String,
    pub html: String,
}

impl PrintDocument {
    /// File name for saving, `<title>.html`.
    pub fn file_name(&self) -> String {
        artifact_name(&self.title, "html")
    }
}

/// Somewhere a print document can be sent.
pub trait PrintSurface {
    /// Hands `document` to the surface.
    ///
    /// A missing or refusing surface is reported as
    /// [`SurfaceError::Unavailable`]; the caller does not retry.
    fn open(&mut self, document: &PrintDocument) -> Result<(), SurfaceError>;
}

/// Writes each document as `<title>.html` into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySurface {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySurface {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySurface {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, oldest first.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl PrintSurface for DirectorySurface {
    fn open(&mut self, document: &PrintDocument) -> Result<(), SurfaceError> {
        if !self.dir.is_dir() {
            return Err(SurfaceError::Unavailable(format!(
                "{} is not a directory",
                self.dir.display()
            )));
        }
        let path = self.dir.join(document.file_name());
        fs::write(&path, &document.html)?;
        debug!(path = %path.display(), "wrote print document");
        self.written.push(path);
        Ok(())
    }
}

/// Prints every record of the request.
pub fn print_all(request: &ExportRequest<'_>) -> Result<PrintDocument, ExportError> {
    request.ensure_rows()?;
    let columns = request.projected_columns();

    let headers: Vec<String> = columns.iter().map(|c| c.header()).collect();
    let rows: Vec<Vec<String>> = request
        .records
        .iter()
        .map(|r| columns.iter().map(|c| r.cell_text(&c.name)).collect())
        .collect();

    render(request.title, &headers, &rows)
}

/// Prints the table as it is currently rendered, minus any actions column.
pub fn print_current_page(
    table: &RenderedTable,
    title: &str,
) -> Result<PrintDocument, ExportError> {
    if table.is_empty() {
        return Err(ExportError::NoData);
    }
    let (mut headers, mut rows) = table.grid();
    remove_actions_column(&mut headers, &mut rows);
    render(title, &headers, &rows)
}

/// Drops the column whose header reads "actions", ignoring case and
/// surrounding whitespace.
fn remove_actions_column(headers: &mut Vec<String>, rows: &mut [Vec<String>]) {
    let Some(index) = headers
        .iter()
        .rposition(|h| h.trim().eq_ignore_ascii_case(ACTIONS_HEADER))
    else {
        return;
    };
    headers.remove(index);
    for row in rows.iter_mut() {
        if index < row.len() {
            row.remove(index);
        }
    }
}

fn render(
    title: &str,
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<PrintDocument, ExportError> {
    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, TEMPLATE_SOURCE)?;
    let html = env
        .get_template(TEMPLATE_NAME)?
        .render(context! { title, headers, rows })?;

    Ok(PrintDocument {
        title: title.to_string(),
        html,
    })
}
