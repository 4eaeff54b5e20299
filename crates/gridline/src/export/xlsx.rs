//! Spreadsheet export.

use rust_xlsxwriter::{Format, Workbook};
use serde_json::Value as JsonValue;

use super::{artifact_name, Artifact, ExportRequest};
use crate::error::ExportError;

/// Name of the single worksheet.
pub const SHEET_NAME: &str = "Data";

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl Cell {
    fn from_json(value: Option<&JsonValue>) -> Cell {
        match value {
            Some(JsonValue::String(s)) => Cell::Text(s.clone()),
            Some(JsonValue::Number(n)) => n.as_f64().map_or(Cell::Empty, Cell::Number),
            Some(JsonValue::Bool(b)) => Cell::Bool(*b),
            _ => Cell::Empty,
        }
    }

    /// Display text of the cell. Empty cells are `""`.
    pub fn text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

/// The tabular content of a spreadsheet export.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    /// Artifact name, `<title>.xlsx`.
    pub file_name: String,
    /// Humanized header row.
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Projects the request into a sheet.
pub fn build_sheet(request: &ExportRequest<'_>) -> Result<Sheet, ExportError> {
    request.ensure_rows()?;
    let columns = request.projected_columns();

    let rows = request
        .records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|c| Cell::from_json(record.get(&c.name)))
                .collect()
        })
        .collect();

    Ok(Sheet {
        file_name: artifact_name(request.title, "xlsx"),
        headers: columns.iter().map(|c| c.header()).collect(),
        rows,
    })
}

impl Sheet {
    /// Encodes the sheet as an `.xlsx` workbook with one `Data` worksheet.
    pub fn to_xlsx(&self) -> Result<Vec<u8>, ExportError> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, header) in self.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, header, &bold)?;
        }

        for (i, row) in self.rows.iter().enumerate() {
            let r = (i + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                let c = col as u16;
                match cell {
                    Cell::Text(s) => {
                        worksheet.write_string(r, c, s)?;
                    }
                    Cell::Number(n) => {
                        worksheet.write_number(r, c, *n)?;
                    }
                    Cell::Bool(b) => {
                        worksheet.write_boolean(r, c, *b)?;
                    }
                    Cell::Empty => {}
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }

    /// Encodes the sheet and names the result.
    pub fn to_artifact(&self) -> Result<Artifact, ExportError> {
        Ok(Artifact {
            file_name: self.file_name.clone(),
            bytes: self.to_xlsx()?,
        })
    }
}
