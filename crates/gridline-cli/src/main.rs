//! `gridline` - browse, filter, sort, and export JSON record files.
//!
//! ```text
//! gridline comments.json --filter 3 --sort name --page 2
//! gridline comments.json --search lorem --export xlsx --out ./exports
//! gridline comments.json --print all --out ./exports
//! ```
//!
//! Logging goes to stderr and is controlled by `GRIDLINE_LOG`
//! (e.g. `GRIDLINE_LOG=debug`).

mod table;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use gridline::{
    Clause, DataView, Dataset, DirectorySurface, ExportScope, RecordId, ViewConfig,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::table::{format_table, TruncatingRenderer};

const LOG_ENV: &str = "GRIDLINE_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    Xlsx,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PrintScope {
    /// The page being shown.
    Current,
    /// Every record that passes the filters.
    All,
}

/// Browse a JSON array of records as a paginated table
#[derive(Debug, Parser)]
#[command(name = "gridline", version)]
struct Cli {
    /// JSON file holding an array of objects, or `-` for stdin
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// View configuration (YAML or JSON)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Table title, also used for export file names
    #[arg(long)]
    title: Option<String>,

    /// Page to show
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Rows per page
    #[arg(long, value_name = "N", conflicts_with = "no_pagination")]
    page_size: Option<usize>,

    /// Show every row on one page
    #[arg(long)]
    no_pagination: bool,

    /// Click a column header; repeat the same key to flip direction
    #[arg(short, long, value_name = "KEY")]
    sort: Vec<String>,

    /// Keep rows whose exact-filter field equals this number
    #[arg(short, long, value_name = "NUMBER")]
    filter: Option<String>,

    /// Field the exact filter compares
    #[arg(long, value_name = "FIELD")]
    filter_field: Option<String>,

    /// Case-insensitive text every row must contain
    #[arg(long)]
    search: Option<String>,

    /// Extra condition such as `postId>=3` or `name~lorem`
    #[arg(short = 'w', long = "where", value_name = "CLAUSE")]
    clauses: Vec<String>,

    /// Hide a column
    #[arg(long, value_name = "FIELD")]
    hide: Vec<String>,

    /// Show a column the configuration hides
    #[arg(long, value_name = "FIELD")]
    show: Vec<String>,

    /// Make a column unsortable
    #[arg(long, value_name = "FIELD")]
    no_sort: Vec<String>,

    /// Pin a column to the left
    #[arg(long, value_name = "FIELD")]
    fix: Vec<String>,

    /// Delete a row before display
    #[arg(long, value_name = "ID")]
    delete: Vec<String>,

    /// Print every field of one row and exit
    #[arg(long, value_name = "ID")]
    view: Option<String>,

    /// Export the current page (or all rows with --all)
    #[arg(short, long, value_enum)]
    export: Option<ExportFormat>,

    /// Write a print-ready HTML document
    #[arg(long, value_enum, value_name = "SCOPE")]
    print: Option<PrintScope>,

    /// Export every filtered row instead of the current page
    #[arg(long)]
    all: bool,

    /// Directory for exports and print documents
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out: PathBuf,

    /// Cut cells to this many columns
    #[arg(long, value_name = "N", default_value_t = 40)]
    max_width: usize,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let mut view = DataView::new(&config)?.with_renderer(TruncatingRenderer {
        max_width: cli.max_width,
    });
    view.replace_dataset(load_dataset(&cli.input)?);
    info!(records = view.dataset().len(), "loaded dataset");

    for field in &cli.show {
        if !view.set_column_shown(field, true) {
            bail!("unknown column `{}`", field);
        }
    }
    for raw in &cli.delete {
        let id: RecordId = raw.parse()?;
        if !view.delete_row(&id) {
            bail!("no record with id `{}`", id);
        }
    }

    if let Some(raw) = &cli.view {
        let id: RecordId = raw.parse()?;
        let record = view
            .dataset()
            .get(&id)
            .with_context(|| format!("no record with id `{}`", id))?;
        println!("{}", record.summary());
        return Ok(());
    }

    apply_filters(&mut view, cli)?;
    for key in &cli.sort {
        if !view.columns().iter().any(|c| &c.name == key && c.is_sortable) {
            bail!("column `{}` is not sortable", key);
        }
        view.handle_sort(key);
    }
    if !view.set_page(cli.page) {
        bail!(
            "page {} is out of range (1-{})",
            cli.page,
            view.total_pages()
        );
    }

    let scope = if cli.all {
        ExportScope::AllData
    } else {
        ExportScope::CurrentPage
    };
    if let Some(format) = cli.export {
        let artifact = match format {
            ExportFormat::Xlsx => view.export_spreadsheet(scope)?,
            ExportFormat::Csv => view.export_csv(scope)?,
        };
        let path = artifact
            .write_to(&cli.out)
            .with_context(|| format!("cannot write to {}", cli.out.display()))?;
        println!("{}", path.display());
        return Ok(());
    }
    if let Some(print) = cli.print {
        let scope = match print {
            PrintScope::Current => ExportScope::CurrentPage,
            PrintScope::All => ExportScope::AllData,
        };
        let mut surface = DirectorySurface::new(&cli.out);
        view.print(scope, &mut surface)?;
        for path in surface.written() {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let bold = console::Term::stdout().features().colors_supported();
    let output = format_table(&view.render(), &view.page(), bold);
    io::stdout().lock().write_all(output.as_bytes())?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<ViewConfig> {
    let mut config = match &cli.config {
        Some(path) => ViewConfig::from_path(path)?,
        None => ViewConfig::default(),
    };

    if let Some(title) = &cli.title {
        config.title = title.clone();
    }
    if let Some(field) = &cli.filter_field {
        config.exact_filter_field = field.clone();
    }
    if cli.no_pagination {
        config.pagination.enabled = false;
    }
    if let Some(size) = cli.page_size {
        config.pagination.enabled = true;
        config.pagination.page_size = size;
    }
    for field in &cli.hide {
        config.columns.hidden_fields.insert(field.clone());
    }
    for field in &cli.no_sort {
        config.columns.sortable_excludes.insert(field.clone());
    }
    for field in &cli.fix {
        config.columns.fixed_fields.insert(field.clone());
    }

    // Catches a zero --page-size too.
    let config = config.validated()?;
    debug!(?config, "resolved configuration");
    Ok(config)
}

fn load_dataset(input: &Path) -> Result<Dataset> {
    if input == Path::new("-") {
        return Dataset::from_reader(io::stdin().lock()).context("cannot parse stdin");
    }
    let file =
        File::open(input).with_context(|| format!("cannot open {}", input.display()))?;
    Dataset::from_reader(BufReader::new(file))
        .with_context(|| format!("cannot parse {}", input.display()))
}

fn apply_filters(view: &mut DataView, cli: &Cli) -> Result<()> {
    if let Some(text) = &cli.filter {
        if !view.set_exact_filter_text(text) {
            tracing::warn!(text = %text, "filter is not a number; ignoring it");
        }
    }
    if let Some(text) = &cli.search {
        view.set_search(text);
    }
    for raw in &cli.clauses {
        let clause = Clause::parse(raw).with_context(|| format!("bad --where `{}`", raw))?;
        view.add_clause(clause);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use gridline::PageSize;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn page_size_overrides_config() {
        let cli = Cli::parse_from(["gridline", "data.json", "--page-size", "5", "--hide", "email"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.page_size().unwrap(), PageSize::limited(5).unwrap());
        assert!(config.columns.hidden_fields.contains("email"));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let cli = Cli::parse_from(["gridline", "data.json", "--page-size", "0"]);
        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn no_pagination() {
        let cli = Cli::parse_from(["gridline", "data.json", "--no-pagination"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.page_size().unwrap(), PageSize::Unbounded);
    }

    #[test]
    fn conflicting_page_flags() {
        let result =
            Cli::try_parse_from(["gridline", "data.json", "--no-pagination", "--page-size", "3"]);
        assert!(result.is_err());
    }
}
